//! Shared builders for diff integration tests

#![allow(dead_code)]

use mortise_diff::{Diff, DiffOptions, StatementError, StatementModifiers, diff_tables};
use mortise_types::prelude::*;

pub fn mysql8() -> Flavor {
    Flavor::mysql(8, 0, 32)
}

pub fn mariadb() -> Flavor {
    Flavor::mariadb(10, 11, 4)
}

pub fn mods() -> StatementModifiers {
    StatementModifiers::new(mysql8())
}

pub fn col(name: &str, ty: &str) -> Column {
    Column::new(name, ColumnType::parse(ty)).not_null()
}

/// `id` primary key plus the given `(name, type)` columns
pub fn table(name: &str, columns: &[(&str, &str)]) -> Table {
    columns.iter().fold(
        Table::new(name)
            .column(col("id", "int").auto_increment())
            .primary_key(Index::primary(["id"])),
        |t, (name, ty)| t.column(col(name, ty)),
    )
}

/// Replace the type of one column, keeping everything else
pub fn retype(table: &Table, column: &str, ty: &str) -> Table {
    let mut table = table.clone();
    if let Some(c) = table.columns.iter_mut().find(|c| c.name == column) {
        c.column_type = ColumnType::parse(ty);
    }
    table
}

/// Render the ALTER for two tables, panicking when there is no diff
pub fn alter(from: &Table, to: &Table, mods: &StatementModifiers) -> Result<String, StatementError> {
    diff_tables(Some(from), Some(to), &DiffOptions::default())
        .expect("tables should differ")
        .statement(mods)
}
