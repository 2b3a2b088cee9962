//! Database-level default character set and collation

use mortise_types::ddl::Schema;
use mortise_types::escape_identifier;

use crate::error::StatementError;
use crate::modifiers::StatementModifiers;
use crate::traits::{Diff, DiffType, ObjectKey, ObjectType};

/// Attributes of the database itself, as opposed to its objects
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DatabaseAttributes {
    pub name: String,
    pub charset: String,
    pub collation: String,
}

impl From<&Schema> for DatabaseAttributes {
    fn from(schema: &Schema) -> Self {
        Self {
            name: schema.name.clone(),
            charset: schema.charset.clone(),
            collation: schema.collation.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseDiff {
    pub from: Option<DatabaseAttributes>,
    pub to: Option<DatabaseAttributes>,
}

impl DatabaseDiff {
    /// # Panics
    ///
    /// Panics if both sides are `None`.
    #[must_use]
    pub fn new(from: Option<DatabaseAttributes>, to: Option<DatabaseAttributes>) -> Self {
        assert!(
            from.is_some() || to.is_some(),
            "DatabaseDiff requires at least one side"
        );
        Self { from, to }
    }

    fn name(&self) -> &str {
        self.to
            .as_ref()
            .or(self.from.as_ref())
            .map_or("", |attrs| attrs.name.as_str())
    }
}

impl Diff for DatabaseDiff {
    fn diff_type(&self) -> DiffType {
        match (&self.from, &self.to) {
            (None, _) => DiffType::Create,
            (_, None) => DiffType::Drop,
            (Some(from), Some(to)) if from.charset == to.charset && from.collation == to.collation => {
                DiffType::None
            }
            _ => DiffType::Alter,
        }
    }

    fn object_key(&self) -> ObjectKey {
        ObjectKey::new(ObjectType::Database, self.name())
    }

    fn statement(&self, _mods: &StatementModifiers) -> Result<String, StatementError> {
        let name = escape_identifier(self.name());
        match (&self.from, &self.to) {
            (None, Some(to)) => {
                let mut sql = format!("CREATE DATABASE {name}");
                if !to.charset.is_empty() {
                    sql.push_str(&format!(" CHARACTER SET {}", to.charset));
                }
                if !to.collation.is_empty() {
                    sql.push_str(&format!(" COLLATE {}", to.collation));
                }
                Ok(sql)
            }
            (Some(from), Some(to)) => {
                let mut parts = Vec::new();
                if from.charset != to.charset {
                    parts.push(format!("CHARACTER SET {}", to.charset));
                }
                if from.collation != to.collation {
                    parts.push(format!("COLLATE {}", to.collation));
                }
                if parts.is_empty() {
                    return Ok(String::new());
                }
                Ok(format!("ALTER DATABASE {name} {}", parts.join(" ")))
            }
            _ => Err(StatementError::Forbidden {
                key: self.object_key(),
                statement: format!("DROP DATABASE {name}"),
                reason: "dropping a database is never permitted".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn attrs(charset: &str, collation: &str) -> DatabaseAttributes {
        DatabaseAttributes::from(&Schema::new("app").charset(charset, collation))
    }

    #[test]
    fn test_alter_only_differing_parts() {
        let diff = DatabaseDiff::new(
            Some(attrs("utf8mb4", "utf8mb4_0900_ai_ci")),
            Some(attrs("utf8mb4", "utf8mb4_unicode_ci")),
        );
        assert_eq!(diff.diff_type(), DiffType::Alter);
        assert_eq!(
            diff.statement(&StatementModifiers::default()),
            Ok("ALTER DATABASE `app` COLLATE utf8mb4_unicode_ci".to_string())
        );
    }

    #[test]
    fn test_drop_always_forbidden() {
        let diff = DatabaseDiff::new(Some(attrs("latin1", "latin1_swedish_ci")), None);
        for allow in [false, true] {
            let mods = StatementModifiers::default().with_allow_unsafe(allow);
            let err = diff.statement(&mods).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Forbidden);
            assert_eq!(err.statement(), "DROP DATABASE `app`");
        }
    }

    #[test]
    fn test_create() {
        let diff = DatabaseDiff::new(None, Some(attrs("latin1", "latin1_swedish_ci")));
        assert_eq!(
            diff.statement(&StatementModifiers::default()),
            Ok("CREATE DATABASE `app` CHARACTER SET latin1 COLLATE latin1_swedish_ci".to_string())
        );
    }
}
