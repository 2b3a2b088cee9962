//! Schema differ
//!
//! Orders object diffs so the statements can run top to bottom: database
//! attributes first, then table drops (each preceded by its partition
//! shedding), creates, alters, routines, and finally the foreign keys
//! deferred out of table alters.

use std::collections::BTreeSet;

use mortise_types::ddl::{Routine, RoutineType, Schema};

use crate::compare::{DiffOptions, diff_tables};
use crate::database::{DatabaseAttributes, DatabaseDiff};
use crate::error::StatementError;
use crate::modifiers::StatementModifiers;
use crate::routine::RoutineDiff;
use crate::table::TableDiff;
use crate::tracing::trace_schema_diff;
use crate::traits::{Diff, DiffType, ObjectKey};

// =============================================================================
// Object diffs
// =============================================================================

/// A diff of any object kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectDiff {
    Database(DatabaseDiff),
    Table(TableDiff),
    Routine(RoutineDiff),
}

impl Diff for ObjectDiff {
    fn diff_type(&self) -> DiffType {
        match self {
            Self::Database(d) => d.diff_type(),
            Self::Table(d) => d.diff_type(),
            Self::Routine(d) => d.diff_type(),
        }
    }

    fn object_key(&self) -> ObjectKey {
        match self {
            Self::Database(d) => d.object_key(),
            Self::Table(d) => d.object_key(),
            Self::Routine(d) => d.object_key(),
        }
    }

    fn statement(&self, mods: &StatementModifiers) -> Result<String, StatementError> {
        match self {
            Self::Database(d) => d.statement(mods),
            Self::Table(d) => d.statement(mods),
            Self::Routine(d) => d.statement(mods),
        }
    }
}

/// One rendered statement of a schema diff
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffStatement {
    pub key: ObjectKey,
    pub diff_type: DiffType,
    /// Statement text; may be partial or empty when `error` is set
    pub statement: String,
    pub error: Option<StatementError>,
}

// =============================================================================
// Schema diff
// =============================================================================

/// Ordered object diffs between two versions of a schema
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    pub diffs: Vec<ObjectDiff>,
}

impl SchemaDiff {
    /// # Panics
    ///
    /// Panics if both sides are `None`.
    #[must_use]
    pub fn new(from: Option<&Schema>, to: Option<&Schema>) -> Self {
        Self::with_options(from, to, &DiffOptions::default())
    }

    /// # Panics
    ///
    /// Panics if both sides are `None`.
    #[must_use]
    pub fn with_options(from: Option<&Schema>, to: Option<&Schema>, opts: &DiffOptions) -> Self {
        let diffs = match (from, to) {
            (None, None) => panic!("SchemaDiff requires at least one side"),
            (Some(from), None) => vec![ObjectDiff::Database(DatabaseDiff::new(
                Some(DatabaseAttributes::from(from)),
                None,
            ))],
            (from, Some(to)) => {
                let empty = Schema::default();
                let mut diffs = Vec::new();
                let database = DatabaseDiff::new(from.map(DatabaseAttributes::from), Some(to.into()));
                if database.diff_type() != DiffType::None {
                    diffs.push(ObjectDiff::Database(database));
                }
                let from = from.unwrap_or(&empty);
                let (tables, deferred) = table_diffs(from, to, opts);
                diffs.extend(tables.into_iter().map(ObjectDiff::Table));
                diffs.extend(routine_diffs(from, to).into_iter().map(ObjectDiff::Routine));
                diffs.extend(deferred.into_iter().map(ObjectDiff::Table));
                diffs
            }
        };
        let name = to.or(from).map_or("", |s| s.name.as_str());
        trace_schema_diff!(name, diffs.len());
        Self { diffs }
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// All object diffs, in execution order
    pub fn object_diffs(&self) -> &[ObjectDiff] {
        &self.diffs
    }

    pub fn table_diffs(&self) -> impl Iterator<Item = &TableDiff> {
        self.diffs.iter().filter_map(|d| match d {
            ObjectDiff::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn routine_diffs(&self) -> impl Iterator<Item = &RoutineDiff> {
        self.diffs.iter().filter_map(|d| match d {
            ObjectDiff::Routine(r) => Some(r),
            _ => None,
        })
    }

    /// Render every object diff in order, skipping those that render to
    /// nothing without error
    pub fn statements(&self, mods: &StatementModifiers) -> Vec<DiffStatement> {
        self.diffs
            .iter()
            .filter_map(|diff| {
                let (statement, error) = match diff.statement(mods) {
                    Ok(statement) if statement.is_empty() => return None,
                    Ok(statement) => (statement, None),
                    Err(err) => (err.statement().to_string(), Some(err)),
                };
                Some(DiffStatement {
                    key: diff.object_key(),
                    diff_type: diff.diff_type(),
                    statement,
                    error,
                })
            })
            .collect()
    }
}

/// Table diffs in execution order, plus the foreign key additions that must
/// run after everything else
fn table_diffs(from: &Schema, to: &Schema, opts: &DiffOptions) -> (Vec<TableDiff>, Vec<TableDiff>) {
    let mut dropped: Vec<_> = from
        .tables
        .iter()
        .filter(|t| to.find_table(&t.name).is_none())
        .collect();
    dropped.sort_by(|a, b| a.name.cmp(&b.name));
    let mut created: Vec<_> = to
        .tables
        .iter()
        .filter(|t| from.find_table(&t.name).is_none())
        .collect();
    created.sort_by(|a, b| a.name.cmp(&b.name));
    let mut kept: Vec<_> = to
        .tables
        .iter()
        .filter_map(|t| from.find_table(&t.name).map(|old| (old, t)))
        .collect();
    kept.sort_by(|a, b| a.1.name.cmp(&b.1.name));

    let mut diffs = Vec::new();
    for table in dropped {
        diffs.extend(TableDiff::pre_drop_alters(table));
        diffs.push(TableDiff::drop(table.clone()));
    }
    diffs.extend(created.into_iter().map(|t| TableDiff::create(t.clone())));

    let mut deferred = Vec::new();
    for (old, new) in kept {
        let Some(diff) = diff_tables(Some(old), Some(new), opts) else {
            continue;
        };
        let (main, foreign_keys) = diff.split_add_foreign_keys();
        if let Some(main) = main {
            diffs.extend(main.split_conflicts());
        }
        deferred.extend(foreign_keys);
    }
    (diffs, deferred)
}

fn routine_diffs(from: &Schema, to: &Schema) -> Vec<RoutineDiff> {
    let keys: BTreeSet<(RoutineType, &str)> = from
        .routines
        .iter()
        .chain(to.routines.iter())
        .map(|r| (r.routine_type, r.name.as_str()))
        .collect();

    let mut diffs = Vec::new();
    for (routine_type, name) in keys {
        let old: Option<&Routine> = from.find_routine(name, routine_type);
        let new: Option<&Routine> = to.find_routine(name, routine_type);
        match (old, new) {
            (None, Some(new)) => diffs.push(RoutineDiff::create(new.clone())),
            (Some(old), None) => diffs.push(RoutineDiff::drop(old.clone())),
            (Some(old), Some(new)) => {
                if old.create_sql() != new.create_sql() {
                    diffs.extend(RoutineDiff::replace(old.clone(), new.clone(), false));
                } else if old.metadata_differs(new) {
                    diffs.extend(RoutineDiff::replace(old.clone(), new.clone(), true));
                }
            }
            (None, None) => {}
        }
    }
    diffs
}
