//! # Mortise
//!
//! Schema diffing and DDL generation for MySQL-family servers (MySQL,
//! Percona Server and MariaDB).
//!
//! Mortise compares two structural snapshots of a schema and emits the
//! ordered `CREATE`, `ALTER` and `DROP` statements that turn one into the
//! other. Statements that could lose data are reported as unsafe, and
//! tables the differ cannot fully model are reported as unsupported, with
//! the statement text still attached in both cases.
//!
//! ## Quick Start
//!
//! ```rust
//! use mortise::prelude::*;
//!
//! let from = Schema::new("shop").table(
//!     Table::new("orders")
//!         .column(Column::new("id", ColumnType::parse("bigint unsigned")).not_null())
//!         .column(Column::new("total", ColumnType::parse("decimal(10,2)")).not_null())
//!         .primary_key(Index::primary(["id"])),
//! );
//! let mut to = from.clone();
//! to.tables[0].columns[1].column_type = ColumnType::parse("decimal(8,2)");
//!
//! let diff = SchemaDiff::new(Some(&from), Some(&to));
//! let mods = StatementModifiers::new(Flavor::mysql(8, 0, 36));
//!
//! let statements = diff.statements(&mods);
//! assert_eq!(
//!     statements[0].statement,
//!     "ALTER TABLE `orders` MODIFY COLUMN `total` decimal(8,2) NOT NULL"
//! );
//! assert!(statements[0].error.as_ref().is_some_and(|e| e.is_unsafe()));
//! ```
//!
//! ## Crates
//!
//! | Module     | Crate           | Contents                                          |
//! |------------|-----------------|---------------------------------------------------|
//! | [`types`]  | `mortise-types` | Flavors, column types, the table/routine model    |
//! | [`diff`]   | `mortise-diff`  | Differs, alter clauses, modifiers, rendering      |
//!
//! ## Features
//!
//! - `tracing` (default) - Emit `tracing` events while diffing and rendering
//! - `serde` (default) - Serialize and deserialize the schema model, and load
//!   [`StatementModifiers`] from TOML

// =============================================================================
// Root-level exports
// =============================================================================

/// Structural model of tables, routines and schemas.
///
/// Every entity can render its own canonical DDL for a given [`Flavor`].
pub use mortise_types as types;

/// Diffing, alter clauses and statement rendering.
pub use mortise_diff as diff;

pub use mortise_diff::{
    Diff, DiffOptions, DiffStatement, DiffType, ErrorKind, ObjectKey, ObjectType, SchemaDiff,
    StatementError, StatementModifiers, TableDiff, diff_tables,
};
pub use mortise_types::Flavor;

/// Error types
pub mod error {
    #[cfg(feature = "serde")]
    pub use mortise_diff::ConfigError;
    pub use mortise_diff::{ErrorKind, StatementError};
    pub use mortise_types::FlavorParseError;
}

/// Prelude module for commonly used types
pub mod prelude {
    pub use mortise_diff::prelude::*;
    pub use mortise_diff::{NextAutoInc, PartitioningMode};
    pub use mortise_types::prelude::*;
}
