//! Index clauses

use mortise_types::ddl::Index;
use mortise_types::escape_identifier;

use crate::modifiers::StatementModifiers;

/// `ADD` of an index or primary key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddIndex {
    pub index: Index,
    /// Re-added only to keep index order; rendered under strict index order
    pub reorder_only: bool,
    /// Re-added only to change the comment; skipped under lax comments
    pub comment_only: bool,
}

impl AddIndex {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if suppressed(self.reorder_only, self.comment_only, mods) {
            return String::new();
        }
        format!("ADD {}", self.index.definition(&mods.flavor))
    }
}

/// `DROP` of an index or primary key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropIndex {
    pub index: Index,
    /// Dropped only to keep index order; rendered under strict index order
    pub reorder_only: bool,
    /// Dropped only to change the comment; skipped under lax comments
    pub comment_only: bool,
}

impl DropIndex {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if suppressed(self.reorder_only, self.comment_only, mods) {
            return String::new();
        }
        if self.index.primary_key {
            "DROP PRIMARY KEY".to_string()
        } else {
            format!("DROP KEY {}", escape_identifier(&self.index.name))
        }
    }
}

/// Whether a drop or re-add exists only for a change the modifiers ignore.
/// Strict index order keeps comment-only re-adds, since later indexes are
/// re-added behind them.
fn suppressed(reorder_only: bool, comment_only: bool, mods: &StatementModifiers) -> bool {
    (reorder_only && !mods.strict_index_order)
        || (comment_only && mods.lax_comments && !mods.strict_index_order)
}

/// Rename an index whose definition is otherwise unchanged
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameIndex {
    pub old: Index,
    pub new: Index,
}

impl RenameIndex {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if mods.flavor.supports_rename_index() {
            format!(
                "RENAME KEY {} TO {}",
                escape_identifier(&self.old.name),
                escape_identifier(&self.new.name)
            )
        } else {
            format!(
                "DROP KEY {}, ADD {}",
                escape_identifier(&self.old.name),
                self.new.definition(&mods.flavor)
            )
        }
    }
}

/// Toggle index visibility in place
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlterIndex {
    pub name: String,
    pub invisible: bool,
    /// The index is also re-added for ordering, carrying its new visibility
    pub reordered: bool,
}

impl AlterIndex {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if !mods.flavor.supports_invisible_indexes()
            || (self.reordered && mods.strict_index_order)
        {
            return String::new();
        }
        let (hide, show) = mods.flavor.index_visibility_keywords();
        format!(
            "ALTER INDEX {} {}",
            escape_identifier(&self.name),
            if self.invisible { hide } else { show }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortise_types::Flavor;

    #[test]
    fn test_reorder_only_needs_strict_order() {
        let add = AddIndex {
            index: Index::new("idx_a", ["a"]),
            reorder_only: true,
            comment_only: false,
        };
        let mods = StatementModifiers::new(Flavor::mysql(8, 0, 0));
        assert_eq!(add.render(&mods), "");
        assert_eq!(
            add.render(&mods.clone().with_strict_index_order(true)),
            "ADD KEY `idx_a` (`a`)"
        );
    }

    #[test]
    fn test_comment_only_skipped_under_lax_comments() {
        let add = AddIndex {
            index: Index::new("idx_a", ["a"]).comment("lookup"),
            reorder_only: false,
            comment_only: true,
        };
        let drop = DropIndex {
            index: Index::new("idx_a", ["a"]),
            reorder_only: false,
            comment_only: true,
        };
        let mods = StatementModifiers::new(Flavor::mysql(8, 0, 0));
        assert_eq!(add.render(&mods), "ADD KEY `idx_a` (`a`) COMMENT 'lookup'");
        assert_eq!(drop.render(&mods), "DROP KEY `idx_a`");

        let lax = mods.clone().with_lax_comments(true);
        assert_eq!(add.render(&lax), "");
        assert_eq!(drop.render(&lax), "");

        let strict = lax.with_strict_index_order(true);
        assert_eq!(add.render(&strict), "ADD KEY `idx_a` (`a`) COMMENT 'lookup'");
    }

    #[test]
    fn test_drop_primary_key() {
        let drop = DropIndex {
            index: Index::primary(["id"]),
            reorder_only: false,
            comment_only: false,
        };
        assert_eq!(drop.render(&StatementModifiers::default()), "DROP PRIMARY KEY");
    }

    #[test]
    fn test_rename_fallback() {
        let rename = RenameIndex {
            old: Index::new("old_name", ["a"]),
            new: Index::new("new_name", ["a"]),
        };
        assert_eq!(
            rename.render(&StatementModifiers::new(Flavor::mysql(5, 7, 0))),
            "RENAME KEY `old_name` TO `new_name`"
        );
        assert_eq!(
            rename.render(&StatementModifiers::new(Flavor::mariadb(10, 4, 0))),
            "DROP KEY `old_name`, ADD KEY `new_name` (`a`)"
        );
    }

    #[test]
    fn test_visibility_keywords() {
        let alter = AlterIndex {
            name: "idx".to_string(),
            invisible: true,
            reordered: false,
        };
        assert_eq!(
            alter.render(&StatementModifiers::new(Flavor::mysql(8, 0, 0))),
            "ALTER INDEX `idx` INVISIBLE"
        );
        assert_eq!(
            alter.render(&StatementModifiers::new(Flavor::mariadb(10, 6, 0))),
            "ALTER INDEX `idx` IGNORED"
        );
        assert_eq!(alter.render(&StatementModifiers::new(Flavor::mysql(5, 7, 40))), "");
        assert_eq!(alter.render(&StatementModifiers::new(Flavor::mariadb(10, 5, 0))), "");
    }
}
