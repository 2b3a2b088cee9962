//! Core traits and identity types shared by every object diff

use std::fmt;
use std::str::FromStr;

use mortise_types::{Flavor, quote_if_needed};

use crate::error::StatementError;
use crate::modifiers::StatementModifiers;

// =============================================================================
// Diff Types
// =============================================================================

/// Diff operation type
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiffType {
    /// Both sides exist and nothing differs
    None,
    Create,
    Alter,
    Drop,
}

impl DiffType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Create => "create",
            Self::Alter => "alter",
            Self::Drop => "drop",
        }
    }
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Object Identity
// =============================================================================

/// Kind of object a diff applies to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ObjectType {
    Database = 0,
    Table = 1,
    Procedure = 2,
    Function = 3,
}

impl ObjectType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Table => "table",
            Self::Procedure => "procedure",
            Self::Function => "function",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "database" => Some(Self::Database),
            "table" => Some(Self::Table),
            "procedure" => Some(Self::Procedure),
            "function" => Some(Self::Function),
            _ => None,
        }
    }
}

impl FromStr for ObjectType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(())
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a diffed object: its type and name
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub object_type: ObjectType,
    pub name: String,
}

impl ObjectKey {
    #[must_use]
    pub fn new(object_type: ObjectType, name: impl Into<String>) -> Self {
        Self {
            object_type,
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.object_type,
            quote_if_needed(&self.name, &Flavor::default())
        )
    }
}

// =============================================================================
// Diff Trait
// =============================================================================

/// Contract shared by every object-level diff.
///
/// `statement` returns the DDL text on success. On failure the error still
/// carries the generated text, so callers can display or run it anyway.
/// An empty string means the diff renders to nothing under these modifiers.
pub trait Diff {
    fn diff_type(&self) -> DiffType;

    fn object_key(&self) -> ObjectKey;

    fn statement(&self, mods: &StatementModifiers) -> Result<String, StatementError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_type_parse() {
        assert_eq!(ObjectType::from_str("table"), Ok(ObjectType::Table));
        assert_eq!(ObjectType::from_str("function"), Ok(ObjectType::Function));
        assert_eq!(ObjectType::from_str("view"), Err(()));
    }

    #[test]
    fn test_object_key_display() {
        assert_eq!(ObjectKey::new(ObjectType::Table, "users").to_string(), "table users");
        assert_eq!(
            ObjectKey::new(ObjectType::Table, "select").to_string(),
            "table `select`"
        );
        assert_eq!(
            ObjectKey::new(ObjectType::Procedure, "my proc").to_string(),
            "procedure `my proc`"
        );
    }
}
