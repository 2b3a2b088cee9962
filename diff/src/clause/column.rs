//! Column clauses and column type safety rules

use mortise_types::ddl::Column;
use mortise_types::{ColumnType, escape_identifier};

use crate::modifiers::StatementModifiers;

/// Where a column lands within the table
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnPosition {
    First,
    After(String),
}

impl ColumnPosition {
    fn to_sql(&self) -> String {
        match self {
            Self::First => " FIRST".to_string(),
            Self::After(name) => format!(" AFTER {}", escape_identifier(name)),
        }
    }
}

fn position_sql(position: Option<&ColumnPosition>, mods: &StatementModifiers) -> String {
    match position {
        Some(pos) if !mods.lax_column_order => pos.to_sql(),
        _ => String::new(),
    }
}

// =============================================================================
// Add / Drop / Rename
// =============================================================================

/// `ADD COLUMN`; a position of `None` appends at the end
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddColumn {
    pub column: Column,
    pub position: Option<ColumnPosition>,
}

impl AddColumn {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        format!(
            "ADD COLUMN {}{}",
            self.column.definition(&mods.flavor),
            position_sql(self.position.as_ref(), mods)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropColumn {
    pub column: Column,
}

impl DropColumn {
    pub(crate) fn render(&self) -> String {
        format!("DROP COLUMN {}", escape_identifier(&self.column.name))
    }

    /// Virtual columns store nothing, so dropping one loses no data
    pub(crate) fn unsafe_reason(&self) -> Option<String> {
        (!self.column.is_virtual())
            .then(|| format!("column {} dropped", self.column.name))
    }
}

/// Rename a column whose definition is otherwise unchanged
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameColumn {
    pub old: Column,
    pub new: Column,
}

impl RenameColumn {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if mods.flavor.supports_rename_column() {
            format!(
                "RENAME COLUMN {} TO {}",
                escape_identifier(&self.old.name),
                escape_identifier(&self.new.name)
            )
        } else {
            format!(
                "CHANGE COLUMN {} {}",
                escape_identifier(&self.old.name),
                self.new.definition(&mods.flavor)
            )
        }
    }

    /// Application code and schema cannot switch names atomically
    pub(crate) fn unsafe_reason(&self) -> Option<String> {
        Some(format!(
            "column {} renamed to {}",
            self.old.name, self.new.name
        ))
    }
}

// =============================================================================
// Modify
// =============================================================================

/// `MODIFY COLUMN`, for a definition change, a move, or both
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifyColumn {
    pub old: Column,
    pub new: Column,
    pub position: Option<ColumnPosition>,
    /// The column belongs to the primary key or a unique index on either side
    pub in_unique_constraint: bool,
    pub old_charset: String,
    pub new_charset: String,
    pub old_collation: String,
    pub new_collation: String,
}

impl ModifyColumn {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        let position = position_sql(self.position.as_ref(), mods);
        if position.is_empty() && self.is_cosmetic(mods) {
            return String::new();
        }
        format!(
            "MODIFY COLUMN {}{position}",
            self.new.definition(&mods.flavor)
        )
    }

    /// Whether the definitions only differ in ways the modifiers ignore
    fn is_cosmetic(&self, mods: &StatementModifiers) -> bool {
        let mut old = self.old.clone();
        if !mods.strict_column_definition && old.column_type.equivalent(&self.new.column_type) {
            old.column_type = self.new.column_type.clone();
        }
        if mods.lax_comments {
            old.comment.clone_from(&self.new.comment);
        }
        old == self.new
    }

    pub(crate) fn unsafe_reason(&self) -> Option<String> {
        let (old, new) = (&self.old, &self.new);
        if old.is_virtual() && new.is_virtual() {
            return None;
        }
        if !old.is_virtual() && new.is_virtual() {
            return Some(format!("column {} becoming virtual", new.name));
        }
        if old.column_type.has_charset()
            && new.column_type.has_charset()
            && self.old_charset != self.new_charset
        {
            return Some(format!(
                "column {} character set changing from {} to {}",
                new.name, self.old_charset, self.new_charset
            ));
        }
        if self.in_unique_constraint
            && new.column_type.has_charset()
            && self.old_collation != self.new_collation
        {
            return Some(format!(
                "column {} collation changing from {} to {} in a unique index",
                new.name, self.old_collation, self.new_collation
            ));
        }
        if old.srid != new.srid {
            return Some(format!("column {} spatial reference changing", new.name));
        }
        type_change_unsafe(
            &old.column_type,
            &new.column_type,
            &self.old_charset,
            &self.new_charset,
        )
        .then(|| {
            format!(
                "column {} type changing from {} to {}",
                new.name,
                old.column_type.render(),
                new.column_type.render()
            )
        })
    }

    pub(crate) fn touches_virtual_column(&self) -> bool {
        self.new.is_virtual()
    }
}

// =============================================================================
// Type safety
// =============================================================================

/// Returns true if converting `old` to `new` could lose or alter stored
/// values, i.e. the new value domain is not a superset of the old one
#[must_use]
pub fn type_change_unsafe(
    old: &ColumnType,
    new: &ColumnType,
    old_charset: &str,
    new_charset: &str,
) -> bool {
    if old.equivalent(new) {
        return false;
    }

    // Fixed-length binary pads with zero bytes, so any resize rewrites stored
    // values; only vector shares its layout
    let old_fixed = old.base == "binary";
    let new_fixed = new.base == "binary";
    if old_fixed && new_fixed {
        return true;
    }
    if old_fixed != new_fixed {
        let other = if old_fixed { new } else { old };
        if other.base != "vector" {
            return true;
        }
    }

    if old.is_integer() && new.is_integer() {
        return match (old.integer_range(), new.integer_range()) {
            (Some((old_min, old_max)), Some((new_min, new_max))) => {
                new_min > old_min || new_max < old_max
            }
            _ => true,
        };
    }

    if old.is_decimal() && new.is_decimal() {
        if !old.unsigned && new.unsigned {
            return true;
        }
        let (p1, s1) = (old.size.unwrap_or(10), old.scale.unwrap_or(0));
        let (p2, s2) = (new.size.unwrap_or(10), new.scale.unwrap_or(0));
        return p2 < p1 || s2 < s1 || p2.saturating_sub(s2) < p1.saturating_sub(s1);
    }

    if old.is_float() && new.is_float() {
        if !old.unsigned && new.unsigned {
            return true;
        }
        let old_double = old.base != "float";
        let new_double = new.base != "float";
        if old_double && !new_double {
            return true;
        }
        if old_double == new_double {
            return match (old.size, new.size) {
                (_, None) => false,
                (None, Some(_)) => true,
                (Some(p1), Some(p2)) => {
                    p2 < p1 || new.scale.unwrap_or(0) < old.scale.unwrap_or(0)
                }
            };
        }
        return false;
    }

    if old.is_enum_or_set() && new.is_enum_or_set() {
        if old.base != new.base {
            return true;
        }
        let (old_values, new_values) = (old.values(), new.values());
        return !new_values.starts_with(&old_values);
    }

    if old.is_string() && new.is_string() {
        return match (
            old.string_max_bytes(old_charset),
            new.string_max_bytes(new_charset),
        ) {
            (Some(old_bytes), Some(new_bytes)) => new_bytes < old_bytes,
            _ => true,
        };
    }

    if old.is_binary() && new.is_binary() {
        return match (old.binary_max_bytes(), new.binary_max_bytes()) {
            (Some(old_bytes), Some(new_bytes)) => new_bytes < old_bytes,
            _ => true,
        };
    }

    if old.base == "bit" && new.base == "bit" {
        return new.size.unwrap_or(1) < old.size.unwrap_or(1);
    }

    if old.is_temporal() && new.is_temporal() {
        let widening = old.base == new.base
            || (old.base == "date" && new.base == "datetime")
            || (old.base == "timestamp" && new.base == "datetime");
        return !widening || new.fractional_precision() < old.fractional_precision();
    }

    true
}
