//! Foreign key DDL types

use crate::ident::escape_identifier;

/// A foreign key constraint
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    /// Referenced schema; empty when it is the same schema as the table
    #[cfg_attr(feature = "serde", serde(default))]
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub update_rule: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub delete_rule: String,
}

impl ForeignKey {
    #[must_use]
    pub fn new<I, S, J, T>(
        name: impl Into<String>,
        columns: I,
        referenced_table: impl Into<String>,
        referenced_columns: J,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            referenced_schema: String::new(),
            referenced_table: referenced_table.into(),
            referenced_columns: referenced_columns.into_iter().map(Into::into).collect(),
            update_rule: "RESTRICT".to_string(),
            delete_rule: "RESTRICT".to_string(),
        }
    }

    #[must_use]
    pub fn referenced_schema(mut self, schema: impl Into<String>) -> Self {
        self.referenced_schema = schema.into();
        self
    }

    #[must_use]
    pub fn on_update(mut self, rule: impl Into<String>) -> Self {
        self.update_rule = rule.into();
        self
    }

    #[must_use]
    pub fn on_delete(mut self, rule: impl Into<String>) -> Self {
        self.delete_rule = rule.into();
        self
    }

    /// Functionally identical: ignores the constraint name. Rules are compared
    /// treating `NO ACTION` and `RESTRICT` as the same, which InnoDB does.
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        fn rule(r: &str) -> &str {
            match r {
                "" | "NO ACTION" => "RESTRICT",
                other => other,
            }
        }
        self.columns == other.columns
            && self.referenced_schema == other.referenced_schema
            && self.referenced_table == other.referenced_table
            && self.referenced_columns == other.referenced_columns
            && rule(&self.update_rule) == rule(&other.update_rule)
            && rule(&self.delete_rule) == rule(&other.delete_rule)
    }

    /// Render the constraint as it appears in `SHOW CREATE TABLE`
    #[must_use]
    pub fn definition(&self) -> String {
        let join = |names: &[String]| {
            names
                .iter()
                .map(|n| escape_identifier(n))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let table = if self.referenced_schema.is_empty() {
            escape_identifier(&self.referenced_table)
        } else {
            format!(
                "{}.{}",
                escape_identifier(&self.referenced_schema),
                escape_identifier(&self.referenced_table)
            )
        };
        let mut def = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {table} ({})",
            escape_identifier(&self.name),
            join(&self.columns),
            join(&self.referenced_columns),
        );
        if !matches!(self.delete_rule.as_str(), "" | "RESTRICT") {
            def.push_str(" ON DELETE ");
            def.push_str(&self.delete_rule);
        }
        if !matches!(self.update_rule.as_str(), "" | "RESTRICT") {
            def.push_str(" ON UPDATE ");
            def.push_str(&self.update_rule);
        }
        def
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition() {
        let fk = ForeignKey::new("fk_author", ["author_id"], "users", ["id"]).on_delete("CASCADE");
        assert_eq!(
            fk.definition(),
            "CONSTRAINT `fk_author` FOREIGN KEY (`author_id`) REFERENCES `users` (`id`) ON DELETE CASCADE"
        );

        let cross = ForeignKey::new("fk_x", ["a", "b"], "t", ["x", "y"])
            .referenced_schema("other")
            .on_update("SET NULL");
        assert_eq!(
            cross.definition(),
            "CONSTRAINT `fk_x` FOREIGN KEY (`a`, `b`) REFERENCES `other`.`t` (`x`, `y`) ON UPDATE SET NULL"
        );
    }

    #[test]
    fn test_equivalent_ignores_name() {
        let a = ForeignKey::new("a", ["x"], "t", ["id"]);
        let b = ForeignKey::new("b", ["x"], "t", ["id"]).on_delete("NO ACTION");
        assert!(a.equivalent(&b));
        assert!(!a.equivalent(&b.clone().on_delete("CASCADE")));
    }
}
