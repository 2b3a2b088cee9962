//! Schema (database) DDL types

use super::{Routine, RoutineType, Table};

/// A schema and the objects it contains
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Schema {
    pub name: String,
    pub charset: String,
    pub collation: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tables: Vec<Table>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub routines: Vec<Routine>,
}

impl Schema {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            charset: "utf8mb4".to_string(),
            collation: "utf8mb4_0900_ai_ci".to_string(),
            tables: Vec::new(),
            routines: Vec::new(),
        }
    }

    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>, collation: impl Into<String>) -> Self {
        self.charset = charset.into();
        self.collation = collation.into();
        self
    }

    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    #[must_use]
    pub fn routine(mut self, routine: Routine) -> Self {
        self.routines.push(routine);
        self
    }

    #[must_use]
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn find_routine(&self, name: &str, routine_type: RoutineType) -> Option<&Routine> {
        self.routines
            .iter()
            .find(|r| r.name == name && r.routine_type == routine_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        let schema = Schema::new("app")
            .table(Table::new("users"))
            .routine(Routine::new("f", RoutineType::Function, "RETURN 1"));
        assert!(schema.find_table("users").is_some());
        assert!(schema.find_table("posts").is_none());
        assert!(schema.find_routine("f", RoutineType::Function).is_some());
        assert!(schema.find_routine("f", RoutineType::Procedure).is_none());
    }
}
