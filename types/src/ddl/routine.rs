//! Stored routine DDL types

use std::fmt;

use crate::ident::{escape_identifier, quote_string};

/// Kind of stored routine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RoutineType {
    Procedure,
    Function,
}

impl RoutineType {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Procedure => "PROCEDURE",
            Self::Function => "FUNCTION",
        }
    }
}

impl fmt::Display for RoutineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A stored procedure or function
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Routine {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub routine_type: RoutineType,
    pub body: String,
    /// Parameter list, without the surrounding parentheses
    #[cfg_attr(feature = "serde", serde(default))]
    pub param_string: String,
    /// Return type; functions only
    #[cfg_attr(feature = "serde", serde(default))]
    pub return_data_type: String,
    /// `user@host`
    #[cfg_attr(feature = "serde", serde(default))]
    pub definer: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub deterministic: bool,
    /// `CONTAINS SQL`, `NO SQL`, `READS SQL DATA` or `MODIFIES SQL DATA`
    #[cfg_attr(feature = "serde", serde(default))]
    pub sql_data_access: String,
    /// `DEFINER` or `INVOKER`
    #[cfg_attr(feature = "serde", serde(default))]
    pub security_type: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub comment: String,
    /// Canonical `SHOW CREATE` output, as introspected
    #[cfg_attr(feature = "serde", serde(default))]
    pub create_statement: String,

    // Creation-time environment
    #[cfg_attr(feature = "serde", serde(default))]
    pub sql_mode: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub db_collation: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub character_set_client: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub collation_connection: String,
}

impl Routine {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        routine_type: RoutineType,
        body: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            routine_type,
            body: body.into(),
            param_string: String::new(),
            return_data_type: String::new(),
            definer: "root@%".to_string(),
            deterministic: false,
            sql_data_access: "CONTAINS SQL".to_string(),
            security_type: "DEFINER".to_string(),
            comment: String::new(),
            create_statement: String::new(),
            sql_mode: String::new(),
            db_collation: String::new(),
            character_set_client: String::new(),
            collation_connection: String::new(),
        }
    }

    #[must_use]
    pub fn params(mut self, params: impl Into<String>) -> Self {
        self.param_string = params.into();
        self
    }

    #[must_use]
    pub fn returns(mut self, data_type: impl Into<String>) -> Self {
        self.return_data_type = data_type.into();
        self
    }

    #[must_use]
    pub fn definer(mut self, definer: impl Into<String>) -> Self {
        self.definer = definer.into();
        self
    }

    #[must_use]
    pub fn deterministic(mut self) -> Self {
        self.deterministic = true;
        self
    }

    #[must_use]
    pub fn sql_data_access(mut self, access: impl Into<String>) -> Self {
        self.sql_data_access = access.into();
        self
    }

    #[must_use]
    pub fn security_invoker(mut self) -> Self {
        self.security_type = "INVOKER".to_string();
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the creation-time environment
    #[must_use]
    pub fn environment(
        mut self,
        sql_mode: impl Into<String>,
        db_collation: impl Into<String>,
        character_set_client: impl Into<String>,
        collation_connection: impl Into<String>,
    ) -> Self {
        self.sql_mode = sql_mode.into();
        self.db_collation = db_collation.into();
        self.character_set_client = character_set_client.into();
        self.collation_connection = collation_connection.into();
        self
    }

    /// Use the generated DDL as the canonical create statement
    #[must_use]
    pub fn with_canonical_ddl(mut self) -> Self {
        self.create_statement = self.definition();
        self
    }

    /// Generate `SHOW CREATE PROCEDURE` / `SHOW CREATE FUNCTION` output
    #[must_use]
    pub fn definition(&self) -> String {
        let mut ddl = String::from("CREATE ");
        if !self.definer.is_empty() {
            let (user, host) = self.definer.rsplit_once('@').unwrap_or((self.definer.as_str(), "%"));
            ddl.push_str(&format!(
                "DEFINER={}@{} ",
                escape_identifier(user),
                escape_identifier(host)
            ));
        }
        ddl.push_str(&format!(
            "{} {}({})",
            self.routine_type.as_sql(),
            escape_identifier(&self.name),
            self.param_string
        ));
        if self.routine_type == RoutineType::Function {
            ddl.push_str(" RETURNS ");
            ddl.push_str(&self.return_data_type);
        }
        ddl.push('\n');

        let mut characteristics = Vec::new();
        if self.deterministic {
            characteristics.push("DETERMINISTIC".to_string());
        }
        if !self.sql_data_access.is_empty() && self.sql_data_access != "CONTAINS SQL" {
            characteristics.push(self.sql_data_access.clone());
        }
        if self.security_type == "INVOKER" {
            characteristics.push("SQL SECURITY INVOKER".to_string());
        }
        if !self.comment.is_empty() {
            characteristics.push(format!("COMMENT {}", quote_string(&self.comment)));
        }
        for characteristic in characteristics {
            ddl.push_str("    ");
            ddl.push_str(&characteristic);
            ddl.push('\n');
        }
        ddl.push_str(&self.body);
        ddl
    }

    /// The create statement, generated when none was introspected
    #[must_use]
    pub fn create_sql(&self) -> String {
        if self.create_statement.is_empty() {
            self.definition()
        } else {
            self.create_statement.clone()
        }
    }

    /// Whether only the creation-time environment differs
    #[must_use]
    pub fn metadata_differs(&self, other: &Self) -> bool {
        self.sql_mode != other.sql_mode
            || self.db_collation != other.db_collation
            || self.character_set_client != other.character_set_client
            || self.collation_connection != other.collation_connection
    }
}
