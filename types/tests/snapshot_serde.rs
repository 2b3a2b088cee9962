//! Snapshot serialization tests
#![cfg(feature = "serde")]

use mortise_types::ddl::{Column, Index, Schema, Table};
use mortise_types::{ColumnType, Flavor};

#[test]
fn test_column_type_serializes_as_string() {
    let ct = ColumnType::parse("decimal(10,2) unsigned");
    let json = serde_json::to_string(&ct).unwrap();
    assert_eq!(json, "\"decimal(10,2) unsigned\"");

    let back: ColumnType = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ct);
    assert_eq!(back.as_str(), "decimal(10,2) unsigned");
}

#[test]
fn test_flavor_serializes_as_string() {
    let json = serde_json::to_string(&Flavor::mariadb(10, 11, 4)).unwrap();
    assert_eq!(json, "\"mariadb:10.11.4\"");
    let back: Flavor = serde_json::from_str("\"mysql:8.0\"").unwrap();
    assert_eq!(back, Flavor::mysql(8, 0, 0));
}

#[test]
fn test_schema_snapshot() {
    let flavor = Flavor::mysql(8, 0, 32);
    let schema = Schema::new("app").table(
        Table::new("users")
            .column(Column::new("id", ColumnType::parse("int")).not_null())
            .column(Column::new("bio", ColumnType::parse("text")).comment("about"))
            .primary_key(Index::primary(["id"]))
            .with_canonical_ddl(&flavor),
    );
    let json = serde_json::to_value(&schema).unwrap();
    assert_eq!(json["tables"][0]["columns"][0]["type"], "int");
    assert_eq!(json["tables"][0]["primaryKey"]["primaryKey"], true);

    let back: Schema = serde_json::from_value(json).unwrap();
    assert_eq!(back, schema);
    assert!(back.tables[0].canonical_mismatch(&flavor).is_none());
}
