//! Structural model of MySQL-family schema objects
//!
//! Every entity here can render the canonical DDL a server would report for
//! it (`SHOW CREATE TABLE` and friends). That rendering doubles as the
//! correctness oracle: when a [`Table`]'s introspected `create_statement` does
//! not match what [`Table::generated_create_statement`] produces, the table
//! uses some feature this model does not capture, and diffing it would be
//! unreliable.
//!
//! # Examples
//!
//! ```
//! use mortise_types::{ColumnType, Flavor};
//! use mortise_types::ddl::{Column, Index, Table};
//!
//! let flavor = Flavor::mysql(8, 0, 32);
//! let table = Table::new("users")
//!     .column(Column::new("id", ColumnType::parse("bigint unsigned")).not_null().auto_increment())
//!     .column(Column::new("email", ColumnType::parse("varchar(255)")).not_null())
//!     .primary_key(Index::primary(["id"]))
//!     .index(Index::new("email", ["email"]).unique())
//!     .with_canonical_ddl(&flavor);
//!
//! assert!(table.create_statement.starts_with("CREATE TABLE `users` (\n  `id` bigint unsigned NOT NULL AUTO_INCREMENT,"));
//! assert!(table.canonical_mismatch(&flavor).is_none());
//! ```

mod check;
mod column;
mod foreign_key;
mod index;
mod partition;
mod routine;
mod schema;
mod table;

pub use check::Check;
pub use column::{Column, ColumnDefault, Generated, GeneratedType};
pub use foreign_key::ForeignKey;
pub use index::{Index, IndexPart, IndexType};
pub use partition::{Partition, PartitionMethod, TablePartitioning, partition_name};
pub use routine::{Routine, RoutineType};
pub use schema::Schema;
pub use table::Table;
