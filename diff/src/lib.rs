//! Mortise Diff - Schema diffing and DDL generation for MySQL-family servers
//!
//! This crate compares two snapshots of a table or schema and produces the
//! ordered DDL statements that transform one into the other:
//!
//! - [`diff_tables`] builds a [`TableDiff`] of ordered alter clauses
//! - [`SchemaDiff`] orders table, routine and database diffs for execution
//! - Every diff renders through [`Diff::statement`] under a
//!   [`StatementModifiers`], returning the SQL or a [`StatementError`]
//!   that still carries the SQL
//!
//! # Example
//!
//! ```
//! use mortise_diff::{Diff, DiffOptions, StatementModifiers, diff_tables};
//! use mortise_types::prelude::*;
//!
//! let from = Table::new("users")
//!     .column(Column::new("id", ColumnType::parse("int")).not_null())
//!     .primary_key(Index::primary(["id"]));
//! let to = from
//!     .clone()
//!     .column(Column::new("email", ColumnType::parse("varchar(255)")).default_null());
//!
//! let diff = diff_tables(Some(&from), Some(&to), &DiffOptions::default()).unwrap();
//! let sql = diff.statement(&StatementModifiers::new(Flavor::mysql(8, 0, 32))).unwrap();
//! assert_eq!(sql, "ALTER TABLE `users` ADD COLUMN `email` varchar(255) DEFAULT NULL");
//! ```
//!
//! # Features
//!
//! - `tracing` (default) - Emit `tracing` events while diffing and rendering
//! - `serde` (default) - Load [`StatementModifiers`] from TOML

mod tracing;

pub mod clause;
mod compare;
mod database;
mod error;
mod modifiers;
mod routine;
mod schema;
mod table;
mod traits;
mod utils;

pub use compare::{DiffOptions, diff_tables};
pub use database::{DatabaseAttributes, DatabaseDiff};
#[cfg(feature = "serde")]
pub use error::ConfigError;
pub use error::{ErrorKind, StatementError};
pub use modifiers::{NextAutoInc, PartitioningMode, StatementModifiers};
pub use routine::RoutineDiff;
pub use schema::{DiffStatement, ObjectDiff, SchemaDiff};
pub use table::TableDiff;
pub use traits::{Diff, DiffType, ObjectKey, ObjectType};

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{
        Diff, DiffOptions, DiffType, SchemaDiff, StatementError, StatementModifiers, TableDiff,
        diff_tables,
    };
}
