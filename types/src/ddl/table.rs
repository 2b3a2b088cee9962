//! Table DDL types

use crate::flavor::Flavor;
use crate::ident::{escape_identifier, quote_string};

use super::{Check, Column, ForeignKey, Index, TablePartitioning};

/// A table and everything it owns
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Table {
    pub name: String,
    pub engine: String,
    pub charset: String,
    pub collation: String,
    /// Whether `collation` is the default collation of `charset`
    #[cfg_attr(feature = "serde", serde(default))]
    pub collation_is_default: bool,
    /// Remaining creation options, space separated (`ROW_FORMAT=DYNAMIC ...`)
    #[cfg_attr(feature = "serde", serde(default))]
    pub create_options: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub comment: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub tablespace: Option<String>,
    /// Next auto-increment value; 0 or 1 means none is shown
    #[cfg_attr(feature = "serde", serde(default))]
    pub next_auto_increment: u64,
    pub columns: Vec<Column>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub primary_key: Option<Index>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub secondary_indexes: Vec<Index>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub foreign_keys: Vec<ForeignKey>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub checks: Vec<Check>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub partitioning: Option<TablePartitioning>,
    /// Canonical `SHOW CREATE TABLE` output, as introspected
    #[cfg_attr(feature = "serde", serde(default))]
    pub create_statement: String,
}

impl Table {
    /// Create an empty InnoDB utf8mb4 table
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine: "InnoDB".to_string(),
            charset: "utf8mb4".to_string(),
            collation: "utf8mb4_0900_ai_ci".to_string(),
            collation_is_default: true,
            create_options: String::new(),
            comment: String::new(),
            tablespace: None,
            next_auto_increment: 0,
            columns: Vec::new(),
            primary_key: None,
            secondary_indexes: Vec::new(),
            foreign_keys: Vec::new(),
            checks: Vec::new(),
            partitioning: None,
            create_statement: String::new(),
        }
    }

    #[must_use]
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Set the default character set and collation
    #[must_use]
    pub fn charset(
        mut self,
        charset: impl Into<String>,
        collation: impl Into<String>,
        collation_is_default: bool,
    ) -> Self {
        self.charset = charset.into();
        self.collation = collation.into();
        self.collation_is_default = collation_is_default;
        self
    }

    #[must_use]
    pub fn create_options(mut self, options: impl Into<String>) -> Self {
        self.create_options = options.into();
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn tablespace(mut self, tablespace: impl Into<String>) -> Self {
        self.tablespace = Some(tablespace.into());
        self
    }

    #[must_use]
    pub fn next_auto_increment(mut self, next: u64) -> Self {
        self.next_auto_increment = next;
        self
    }

    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn primary_key(mut self, index: Index) -> Self {
        self.primary_key = Some(index);
        self
    }

    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.secondary_indexes.push(index);
        self
    }

    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    #[must_use]
    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    #[must_use]
    pub fn partitioning(mut self, partitioning: TablePartitioning) -> Self {
        self.partitioning = Some(partitioning);
        self
    }

    /// Use the generated DDL as the canonical create statement
    #[must_use]
    pub fn with_canonical_ddl(mut self, flavor: &Flavor) -> Self {
        self.create_statement = self.generated_create_statement(flavor);
        self
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Find a column by name
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether the named column takes part in the primary key or any unique index
    #[must_use]
    pub fn column_in_unique_index(&self, name: &str) -> bool {
        self.primary_key
            .iter()
            .chain(self.secondary_indexes.iter())
            .any(|idx| idx.unique && idx.covers_column(name))
    }

    /// Primary key followed by secondary indexes
    pub fn indexes(&self) -> impl Iterator<Item = &Index> {
        self.primary_key.iter().chain(self.secondary_indexes.iter())
    }

    #[must_use]
    pub fn has_auto_increment(&self) -> bool {
        self.columns.iter().any(|c| c.auto_increment)
    }

    // =========================================================================
    // DDL generation
    // =========================================================================

    /// Generate `SHOW CREATE TABLE` output from the structured fields
    #[must_use]
    pub fn generated_create_statement(&self, flavor: &Flavor) -> String {
        let mut defs: Vec<String> = self.columns.iter().map(|c| c.definition(flavor)).collect();
        defs.extend(self.indexes().map(|idx| idx.definition(flavor)));
        defs.extend(self.foreign_keys.iter().map(ForeignKey::definition));
        defs.extend(self.checks.iter().map(|c| c.definition(flavor)));

        let mut ddl = format!(
            "CREATE TABLE {} (\n  {}\n) ",
            escape_identifier(&self.name),
            defs.join(",\n  ")
        );
        if let Some(tablespace) = &self.tablespace {
            ddl.push_str(&format!(
                "/*!50100 TABLESPACE {} */ ",
                escape_identifier(tablespace)
            ));
        }
        ddl.push_str(&format!("ENGINE={}", self.engine));
        if self.next_auto_increment > 1 {
            ddl.push_str(&format!(" AUTO_INCREMENT={}", self.next_auto_increment));
        }
        ddl.push_str(&format!(" DEFAULT CHARSET={}", self.charset));
        if flavor.always_shows_collation() || !self.collation_is_default {
            ddl.push_str(&format!(" COLLATE={}", self.collation));
        }
        if !self.create_options.is_empty() {
            ddl.push(' ');
            ddl.push_str(&self.create_options);
        }
        if !self.comment.is_empty() {
            ddl.push_str(&format!(" COMMENT={}", quote_string(&self.comment)));
        }
        if let Some(partitioning) = &self.partitioning {
            ddl.push('\n');
            ddl.push_str(&partitioning.definition(flavor));
        }
        ddl
    }

    /// Returns `(expected, actual)` when the introspected create statement
    /// cannot be reproduced from the structured fields
    #[must_use]
    pub fn canonical_mismatch(&self, flavor: &Flavor) -> Option<(String, String)> {
        if self.create_statement.is_empty() {
            return None;
        }
        let generated = self.generated_create_statement(flavor);
        if generated == self.create_statement {
            None
        } else {
            Some((self.create_statement.clone(), generated))
        }
    }

    /// Whether this table uses features the model cannot represent
    #[must_use]
    pub fn unsupported_ddl(&self, flavor: &Flavor) -> bool {
        self.canonical_mismatch(flavor).is_some()
    }

    /// The create statement, generated when none was introspected
    #[must_use]
    pub fn create_sql(&self, flavor: &Flavor) -> String {
        if self.create_statement.is_empty() {
            self.generated_create_statement(flavor)
        } else {
            self.create_statement.clone()
        }
    }
}
