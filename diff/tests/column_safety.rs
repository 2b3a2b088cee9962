//! Column change safety classification
//!
//! Each case renders a single-column change through the full table differ
//! and checks whether the statement comes back as unsafe.

mod common;

use common::*;
use mortise_diff::ErrorKind;
use mortise_types::prelude::*;

/// Whether changing column `c` from `old` to `new` is reported unsafe
fn is_unsafe(old: &str, new: &str) -> bool {
    let from = table("t", &[("c", old)]);
    let to = retype(&from, "c", new);
    match alter(&from, &to, &mods()) {
        Ok(_) => false,
        Err(err) => {
            assert_eq!(err.kind(), ErrorKind::Unsafe, "{old} -> {new}: {err}");
            true
        }
    }
}

// =============================================================================
// Type changes
// =============================================================================

#[test]
fn test_signedness_change_is_unsafe() {
    assert!(is_unsafe("int(11)", "int(11) unsigned"));
}

#[test]
fn test_varchar_widening_is_safe() {
    assert!(!is_unsafe("varchar(20)", "varchar(21)"));
    assert!(is_unsafe("varchar(21)", "varchar(20)"));
}

#[test]
fn test_integer_widening_and_narrowing() {
    assert!(!is_unsafe("smallint", "int"));
    assert!(is_unsafe("int", "smallint"));
    assert!(!is_unsafe("tinyint unsigned", "smallint unsigned"));
}

#[test]
fn test_enum_changes() {
    assert!(!is_unsafe("enum('a','b')", "enum('a','b','c')"));
    assert!(is_unsafe("enum('a','b')", "enum('b','a')"));
    assert!(is_unsafe("enum('a','b')", "enum('a')"));
}

#[test]
fn test_decimal_changes() {
    assert!(!is_unsafe("decimal(10,2)", "decimal(14,4)"));
    assert!(is_unsafe("decimal(10,2)", "decimal(10,4)"));
}

#[test]
fn test_fixed_binary_resize_is_unsafe() {
    assert!(is_unsafe("binary(16)", "binary(20)"));
    assert!(is_unsafe("binary(20)", "binary(16)"));
    assert!(!is_unsafe("varbinary(16)", "varbinary(20)"));
}

#[test]
fn test_display_width_only_change_renders_nothing() {
    let from = table("t", &[("c", "int(11)")]);
    let to = retype(&from, "c", "int");
    assert_eq!(alter(&from, &to, &mods()), Ok(String::new()));
    assert_eq!(
        alter(&from, &to, &mods().with_strict_column_definition(true)),
        Ok("ALTER TABLE `t` MODIFY COLUMN `c` int NOT NULL".to_string())
    );
}

// =============================================================================
// Drops, charsets and generated columns
// =============================================================================

#[test]
fn test_virtual_column_drop_is_safe() {
    let virt = table("t", &[("a", "int")])
        .column(Column::new("v", ColumnType::parse("int")).generated_virtual("(`a` * 2)"));
    let stored = table("t", &[("a", "int")])
        .column(Column::new("v", ColumnType::parse("int")).generated_stored("(`a` * 2)"));
    let plain = table("t", &[("a", "int")]);

    assert_eq!(
        alter(&virt, &plain, &mods()),
        Ok("ALTER TABLE `t` DROP COLUMN `v`".to_string())
    );
    let err = alter(&stored, &plain, &mods()).unwrap_err();
    assert!(err.is_unsafe());
    assert_eq!(err.statement(), "ALTER TABLE `t` DROP COLUMN `v`");
}

#[test]
fn test_charset_change_is_unsafe() {
    let from = table("t", &[("name", "varchar(50)")]);
    let mut to = from.clone();
    to.columns[1].charset = Some("latin1".to_string());
    to.columns[1].collation = Some("latin1_swedish_ci".to_string());
    let err = alter(&from, &to, &mods()).unwrap_err();
    assert!(err.unsafe_reason().is_some_and(|r| r.contains("character set")));
}

#[test]
fn test_collation_change_unsafe_only_in_unique_index() {
    let from = table("t", &[("name", "varchar(50)")]);
    let mut to = from.clone();
    to.columns[1].collation = Some("utf8mb4_bin".to_string());
    assert!(alter(&from, &to, &mods()).is_ok());

    let from = from.index(Index::new("uk_name", ["name"]).unique());
    let to = to.index(Index::new("uk_name", ["name"]).unique());
    assert!(alter(&from, &to, &mods()).unwrap_err().is_unsafe());
}

#[test]
fn test_allow_unsafe_returns_statement() {
    let from = table("t", &[("c", "bigint")]);
    let to = retype(&from, "c", "int");
    assert_eq!(
        alter(&from, &to, &mods().with_allow_unsafe(true)),
        Ok("ALTER TABLE `t` MODIFY COLUMN `c` int NOT NULL".to_string())
    );
}

#[test]
fn test_srid_change_is_unsafe() {
    let from = table("t", &[("pt", "point")]);
    let mut to = from.clone();
    to.columns[1].srid = Some(4326);
    assert!(alter(&from, &to, &mods()).unwrap_err().is_unsafe());
}
