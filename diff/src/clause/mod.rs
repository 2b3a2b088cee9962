//! Alter-clause catalog
//!
//! Each [`TableAlterClause`] is one change inside an `ALTER TABLE`. Clauses
//! render themselves under a [`StatementModifiers`] and report whether they
//! risk data loss. An empty rendering means the clause is suppressed by the
//! modifiers and contributes nothing to the statement.

mod column;
mod constraint;
mod index;
mod partition;
mod table_options;

pub use column::{
    AddColumn, ColumnPosition, DropColumn, ModifyColumn, RenameColumn, type_change_unsafe,
};
pub use constraint::{AddCheck, AddForeignKey, AlterCheck, DropCheck, DropForeignKey};
pub use index::{AddIndex, AlterIndex, DropIndex, RenameIndex};
pub use partition::{ModifyPartitions, PartitionBy, RemovePartitioning};
pub use table_options::{
    ChangeAutoIncrement, ChangeCharSet, ChangeComment, ChangeCreateOptions, ChangeStorageEngine,
    ChangeTablespace,
};

use mortise_types::ddl::IndexType;

use crate::modifiers::StatementModifiers;

/// All alter clause kinds
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableAlterClause {
    AddColumn(AddColumn),
    DropColumn(DropColumn),
    RenameColumn(RenameColumn),
    ModifyColumn(ModifyColumn),
    AddIndex(AddIndex),
    DropIndex(DropIndex),
    RenameIndex(RenameIndex),
    AlterIndex(AlterIndex),
    AddForeignKey(AddForeignKey),
    DropForeignKey(DropForeignKey),
    AddCheck(AddCheck),
    DropCheck(DropCheck),
    AlterCheck(AlterCheck),
    ChangeAutoIncrement(ChangeAutoIncrement),
    ChangeCharSet(ChangeCharSet),
    ChangeCreateOptions(ChangeCreateOptions),
    ChangeComment(ChangeComment),
    ChangeTablespace(ChangeTablespace),
    ChangeStorageEngine(ChangeStorageEngine),
    PartitionBy(PartitionBy),
    RemovePartitioning(RemovePartitioning),
    ModifyPartitions(ModifyPartitions),
}

impl TableAlterClause {
    /// Get the type name of this clause
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::AddColumn(_) => "add_column",
            Self::DropColumn(_) => "drop_column",
            Self::RenameColumn(_) => "rename_column",
            Self::ModifyColumn(_) => "modify_column",
            Self::AddIndex(_) => "add_index",
            Self::DropIndex(_) => "drop_index",
            Self::RenameIndex(_) => "rename_index",
            Self::AlterIndex(_) => "alter_index",
            Self::AddForeignKey(_) => "add_foreign_key",
            Self::DropForeignKey(_) => "drop_foreign_key",
            Self::AddCheck(_) => "add_check",
            Self::DropCheck(_) => "drop_check",
            Self::AlterCheck(_) => "alter_check",
            Self::ChangeAutoIncrement(_) => "change_auto_increment",
            Self::ChangeCharSet(_) => "change_charset",
            Self::ChangeCreateOptions(_) => "change_create_options",
            Self::ChangeComment(_) => "change_comment",
            Self::ChangeTablespace(_) => "change_tablespace",
            Self::ChangeStorageEngine(_) => "change_storage_engine",
            Self::PartitionBy(_) => "partition_by",
            Self::RemovePartitioning(_) => "remove_partitioning",
            Self::ModifyPartitions(_) => "modify_partitions",
        }
    }

    /// Render the clause; empty when the modifiers suppress it
    pub fn render(&self, mods: &StatementModifiers) -> String {
        match self {
            Self::AddColumn(c) => c.render(mods),
            Self::DropColumn(c) => c.render(),
            Self::RenameColumn(c) => c.render(mods),
            Self::ModifyColumn(c) => c.render(mods),
            Self::AddIndex(c) => c.render(mods),
            Self::DropIndex(c) => c.render(mods),
            Self::RenameIndex(c) => c.render(mods),
            Self::AlterIndex(c) => c.render(mods),
            Self::AddForeignKey(c) => c.render(mods),
            Self::DropForeignKey(c) => c.render(mods),
            Self::AddCheck(c) => c.render(mods),
            Self::DropCheck(c) => c.render(mods),
            Self::AlterCheck(c) => c.render(mods),
            Self::ChangeAutoIncrement(c) => c.render(mods),
            Self::ChangeCharSet(c) => c.render(),
            Self::ChangeCreateOptions(c) => c.render(),
            Self::ChangeComment(c) => c.render(mods),
            Self::ChangeTablespace(c) => c.render(),
            Self::ChangeStorageEngine(c) => c.render(),
            Self::PartitionBy(c) => c.render(mods),
            Self::RemovePartitioning(c) => c.render(mods),
            Self::ModifyPartitions(c) => c.render(mods),
        }
    }

    /// Why the clause risks data loss, if it does. Only meaningful for
    /// clauses that render non-empty.
    pub fn unsafe_reason(&self) -> Option<String> {
        match self {
            Self::DropColumn(c) => c.unsafe_reason(),
            Self::RenameColumn(c) => c.unsafe_reason(),
            Self::ModifyColumn(c) => c.unsafe_reason(),
            Self::ChangeStorageEngine(c) => c.unsafe_reason(),
            Self::ModifyPartitions(c) => c.unsafe_reason(),
            _ => None,
        }
    }

    /// Partitioning clauses follow the other clauses without a comma
    pub const fn is_partitioning(&self) -> bool {
        matches!(
            self,
            Self::PartitionBy(_) | Self::RemovePartitioning(_) | Self::ModifyPartitions(_)
        )
    }

    /// Adding or modifying a virtual column, which `WITH VALIDATION` can verify
    pub fn touches_virtual_column(&self) -> bool {
        match self {
            Self::AddColumn(c) => c.column.is_virtual(),
            Self::ModifyColumn(c) => c.touches_virtual_column(),
            _ => false,
        }
    }

    /// An index add that the server only permits one of per statement
    pub fn is_fulltext_add(&self) -> bool {
        matches!(self, Self::AddIndex(c) if c.index.index_type == IndexType::Fulltext)
    }

    pub const fn is_add_foreign_key(&self) -> bool {
        matches!(self, Self::AddForeignKey(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortise_types::ColumnType;
    use mortise_types::ddl::{Column, Index};

    #[test]
    fn test_unsafe_classification() {
        let drop_stored = TableAlterClause::DropColumn(DropColumn {
            column: Column::new("a", ColumnType::parse("int")),
        });
        let drop_virtual = TableAlterClause::DropColumn(DropColumn {
            column: Column::new("v", ColumnType::parse("int")).generated_virtual("`a` + 1"),
        });
        let add_index = TableAlterClause::AddIndex(AddIndex {
            index: Index::new("idx", ["a"]),
            reorder_only: false,
            comment_only: false,
        });
        assert!(drop_stored.unsafe_reason().is_some());
        assert!(drop_virtual.unsafe_reason().is_none());
        assert!(add_index.unsafe_reason().is_none());
        assert_eq!(drop_stored.type_name(), "drop_column");
    }

    #[test]
    fn test_fulltext_and_partitioning_flags() {
        let ft = TableAlterClause::AddIndex(AddIndex {
            index: Index::new("ft", ["body"]).fulltext(),
            reorder_only: false,
            comment_only: false,
        });
        assert!(ft.is_fulltext_add());
        assert!(!ft.is_partitioning());
        assert!(TableAlterClause::RemovePartitioning(RemovePartitioning).is_partitioning());
    }
}
