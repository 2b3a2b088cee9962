//! Statement rendering configuration
//!
//! [`StatementModifiers`] is a plain value threaded through every render call.
//! It can be built in code with the `with_*` methods or loaded from TOML:
//!
//! ```
//! use mortise_diff::{NextAutoInc, StatementModifiers};
//!
//! let mods = StatementModifiers::from_toml_str(r#"
//!     allow-unsafe = true
//!     next-auto-inc = "if-increased"
//!     flavor = "mariadb:10.11"
//! "#).unwrap();
//! assert!(mods.allow_unsafe);
//! assert_eq!(mods.next_auto_inc, NextAutoInc::IfIncreased);
//! assert!(mods.flavor.is_mariadb());
//! ```

#[cfg(feature = "serde")]
use std::path::Path;

use mortise_types::Flavor;

#[cfg(feature = "serde")]
use crate::error::ConfigError;

/// When to include a change to a table's next auto-increment value
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum NextAutoInc {
    /// Never include it
    #[default]
    Ignore,
    /// Only when the new value is higher
    IfIncreased,
    /// Only when the table already had a value above 1
    IfAlready,
    /// Whenever it differs
    Always,
}

/// How to treat partitioning differences
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PartitioningMode {
    /// Render partitioning changes as computed
    #[default]
    Permissive,
    /// Never partition a table; strip partitioning from CREATEs
    Remove,
    /// Never remove partitioning from a table
    Keep,
}

/// Options that affect how diffs are rendered to DDL
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct StatementModifiers {
    /// Permit rendering of statements that risk data loss
    pub allow_unsafe: bool,
    pub next_auto_inc: NextAutoInc,
    pub partitioning: PartitioningMode,
    /// Value for a `LOCK=` prefix on ALTER TABLE
    pub lock_clause: Option<String>,
    /// Value for an `ALGORITHM=` prefix on ALTER TABLE
    pub algorithm_clause: Option<String>,
    /// Preserve index order exactly, reordering indexes when needed
    pub strict_index_order: bool,
    /// Render check constraint renames and reorders
    pub strict_check_constraints: bool,
    /// Render foreign key renames
    pub strict_foreign_key_naming: bool,
    /// Render integer display width differences
    pub strict_column_definition: bool,
    /// Ignore column position differences
    pub lax_column_order: bool,
    /// Ignore comment-only differences on columns
    pub lax_comments: bool,
    /// Replace routines whose only change is creation-time metadata
    pub compare_metadata: bool,
    /// Append `WITH VALIDATION` when virtual columns change
    pub virtual_col_validation: bool,
    /// Omit partition-shedding ALTERs before dropping partitioned tables
    pub skip_pre_drop_alters: bool,
    pub flavor: Flavor,
}

impl StatementModifiers {
    #[must_use]
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            ..Self::default()
        }
    }

    /// Parse modifiers from a TOML document. Missing keys take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Read and parse modifiers from a TOML file
    #[cfg(feature = "serde")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    #[must_use]
    pub fn with_allow_unsafe(mut self, allow: bool) -> Self {
        self.allow_unsafe = allow;
        self
    }

    #[must_use]
    pub fn with_next_auto_inc(mut self, mode: NextAutoInc) -> Self {
        self.next_auto_inc = mode;
        self
    }

    #[must_use]
    pub fn with_partitioning(mut self, mode: PartitioningMode) -> Self {
        self.partitioning = mode;
        self
    }

    #[must_use]
    pub fn with_lock_clause(mut self, lock: impl Into<String>) -> Self {
        self.lock_clause = Some(lock.into());
        self
    }

    #[must_use]
    pub fn with_algorithm_clause(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm_clause = Some(algorithm.into());
        self
    }

    #[must_use]
    pub fn with_strict_index_order(mut self, strict: bool) -> Self {
        self.strict_index_order = strict;
        self
    }

    #[must_use]
    pub fn with_strict_check_constraints(mut self, strict: bool) -> Self {
        self.strict_check_constraints = strict;
        self
    }

    #[must_use]
    pub fn with_strict_foreign_key_naming(mut self, strict: bool) -> Self {
        self.strict_foreign_key_naming = strict;
        self
    }

    #[must_use]
    pub fn with_strict_column_definition(mut self, strict: bool) -> Self {
        self.strict_column_definition = strict;
        self
    }

    #[must_use]
    pub fn with_lax_column_order(mut self, lax: bool) -> Self {
        self.lax_column_order = lax;
        self
    }

    #[must_use]
    pub fn with_lax_comments(mut self, lax: bool) -> Self {
        self.lax_comments = lax;
        self
    }

    #[must_use]
    pub fn with_compare_metadata(mut self, compare: bool) -> Self {
        self.compare_metadata = compare;
        self
    }

    #[must_use]
    pub fn with_virtual_col_validation(mut self, validate: bool) -> Self {
        self.virtual_col_validation = validate;
        self
    }

    #[must_use]
    pub fn with_skip_pre_drop_alters(mut self, skip: bool) -> Self {
        self.skip_pre_drop_alters = skip;
        self
    }

    #[must_use]
    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let mods = StatementModifiers::default();
        assert!(!mods.allow_unsafe);
        assert_eq!(mods.next_auto_inc, NextAutoInc::Ignore);
        assert_eq!(mods.partitioning, PartitioningMode::Permissive);
        assert_eq!(mods.flavor, Flavor::default());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_empty_toml_is_default() {
        assert_eq!(
            StatementModifiers::from_toml_str("").unwrap(),
            StatementModifiers::default()
        );
    }

    #[test]
    fn test_builders() {
        let mods = StatementModifiers::new(Flavor::mysql(8, 0, 0))
            .with_lock_clause("none")
            .with_partitioning(PartitioningMode::Keep)
            .with_strict_index_order(true);
        assert_eq!(mods.lock_clause.as_deref(), Some("none"));
        assert_eq!(mods.partitioning, PartitioningMode::Keep);
        assert!(mods.strict_index_order);
        assert!(mods.flavor.is_mysql());
    }
}
