//! Foreign key and check constraint clauses

use mortise_types::ddl::{Check, ForeignKey};
use mortise_types::escape_identifier;

use crate::modifiers::StatementModifiers;

// =============================================================================
// Foreign keys
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddForeignKey {
    pub foreign_key: ForeignKey,
    /// Only the constraint name changed
    pub rename_only: bool,
}

impl AddForeignKey {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if self.rename_only && !mods.strict_foreign_key_naming {
            return String::new();
        }
        format!("ADD {}", self.foreign_key.definition())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropForeignKey {
    pub foreign_key: ForeignKey,
    /// Only the constraint name changed
    pub rename_only: bool,
}

impl DropForeignKey {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if self.rename_only && !mods.strict_foreign_key_naming {
            return String::new();
        }
        format!(
            "DROP FOREIGN KEY {}",
            escape_identifier(&self.foreign_key.name)
        )
    }
}

// =============================================================================
// Checks
// =============================================================================

/// Whether a rename-only or reorder-only check change should render.
/// Only MariaDB reports checks in creation order, so reordering is
/// meaningless elsewhere.
fn check_change_visible(rename_only: bool, reorder_only: bool, mods: &StatementModifiers) -> bool {
    if reorder_only {
        return mods.strict_check_constraints && mods.flavor.is_mariadb();
    }
    !rename_only || mods.strict_check_constraints
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddCheck {
    pub check: Check,
    pub rename_only: bool,
    pub reorder_only: bool,
}

impl AddCheck {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if !mods.flavor.has_check_constraints()
            || !check_change_visible(self.rename_only, self.reorder_only, mods)
        {
            return String::new();
        }
        format!("ADD {}", self.check.definition(&mods.flavor))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropCheck {
    pub check: Check,
    pub rename_only: bool,
    pub reorder_only: bool,
}

impl DropCheck {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if !mods.flavor.has_check_constraints()
            || !check_change_visible(self.rename_only, self.reorder_only, mods)
        {
            return String::new();
        }
        format!(
            "DROP {} {}",
            mods.flavor.drop_check_keyword(),
            escape_identifier(&self.check.name)
        )
    }
}

/// Toggle whether a check is enforced
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlterCheck {
    pub check: Check,
    pub enforced: bool,
}

impl AlterCheck {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if !mods.flavor.supports_not_enforced_checks() {
            return String::new();
        }
        format!(
            "ALTER CHECK {} {}",
            escape_identifier(&self.check.name),
            if self.enforced { "ENFORCED" } else { "NOT ENFORCED" }
        )
    }
}
