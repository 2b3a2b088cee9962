//! Shared type definitions for Mortise
//!
//! This crate provides the structural model that the differ operates on:
//!
//! - [`Flavor`] - Server vendor and version, with capability predicates
//! - [`ColumnType`] - Parsed column types with range and storage limits
//! - Reserved words and identifier quoting per flavor
//! - Schema objects in the [`ddl`] module, each able to render its own
//!   canonical DDL
//!
//! # Features
//!
//! - `serde` - Enable serde serialization/deserialization of the model

mod charset;
mod coltype;
pub mod ddl;
mod flavor;
mod ident;
mod reserved;

pub use charset::max_bytes_per_char;
pub use coltype::{ColumnType, quote_values};
pub use flavor::{Flavor, FlavorParseError, Variant, Vendor};
pub use ident::{escape_identifier, escape_string, quote_if_needed, quote_string};
pub use reserved::{is_reserved_word, reserved_words};

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::ddl::{
        Check, Column, ForeignKey, Index, IndexPart, Partition, PartitionMethod, Routine,
        RoutineType, Schema, Table, TablePartitioning,
    };
    pub use crate::{ColumnType, Flavor};
}
