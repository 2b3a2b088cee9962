//! Tracing utilities for diff and render observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level event with the number of alter clauses computed for a table.
///
/// ```ignore
/// trace_table_diff!(&table.name, clauses.len());
/// ```
macro_rules! trace_table_diff {
    ($table:expr, $clauses:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(table = %$table, clauses = $clauses, "mortise.diff.table");
        #[cfg(not(feature = "tracing"))]
        let _ = (&$table, &$clauses);
    };
}

/// Emit a debug-level event when a table diff is split into several statements.
///
/// ```ignore
/// trace_split!(&table.name, "fulltext", parts.len());
/// ```
macro_rules! trace_split {
    ($table:expr, $reason:literal, $parts:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(table = %$table, reason = $reason, parts = $parts, "mortise.diff.split");
        #[cfg(not(feature = "tracing"))]
        let _ = (&$table, &$parts);
    };
}

/// Emit an info-level summary of a schema diff.
///
/// ```ignore
/// trace_schema_diff!(&schema_name, diffs.len());
/// ```
macro_rules! trace_schema_diff {
    ($schema:expr, $objects:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!(schema = %$schema, objects = $objects, "mortise.diff.schema");
        #[cfg(not(feature = "tracing"))]
        let _ = (&$schema, &$objects);
    };
}

/// Emit a warn-level event when a table cannot be diffed reliably.
///
/// ```ignore
/// trace_unsupported!(&table.name);
/// ```
macro_rules! trace_unsupported {
    ($table:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(table = %$table, "mortise.diff.unsupported");
        #[cfg(not(feature = "tracing"))]
        let _ = &$table;
    };
}

pub(crate) use {trace_schema_diff, trace_split, trace_table_diff, trace_unsupported};
