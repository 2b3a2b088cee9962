//! Table-level attribute clauses

use std::collections::BTreeSet;

use mortise_types::{escape_identifier, escape_string};

use crate::modifiers::{NextAutoInc, StatementModifiers};
use crate::utils::{create_option_default, parse_create_options};

/// Change of the table's next auto-increment value
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeAutoIncrement {
    pub old: u64,
    pub new: u64,
}

impl ChangeAutoIncrement {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        let include = match mods.next_auto_inc {
            NextAutoInc::Ignore => false,
            NextAutoInc::IfIncreased => self.new > self.old,
            NextAutoInc::IfAlready => self.old > 1,
            NextAutoInc::Always => true,
        };
        if include {
            format!("AUTO_INCREMENT = {}", self.new)
        } else {
            String::new()
        }
    }
}

/// Change of the table's default character set and collation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeCharSet {
    pub charset: String,
    pub collation: String,
}

impl ChangeCharSet {
    pub(crate) fn render(&self) -> String {
        format!(
            "DEFAULT CHARACTER SET = {} COLLATE = {}",
            self.charset, self.collation
        )
    }
}

/// Change of the table's creation options
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeCreateOptions {
    pub old: String,
    pub new: String,
}

impl ChangeCreateOptions {
    /// Options removed on the new side are reset to their defaults
    pub(crate) fn render(&self) -> String {
        let old = parse_create_options(&self.old);
        let new = parse_create_options(&self.new);
        let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

        keys.into_iter()
            .filter_map(|key| {
                let old_value = old.get(key).map_or_else(|| create_option_default(key), String::as_str);
                let new_value = new.get(key).map_or_else(|| create_option_default(key), String::as_str);
                (old_value != new_value).then(|| format!("{key}={new_value}"))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeComment {
    pub new: String,
}

impl ChangeComment {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if mods.lax_comments {
            return String::new();
        }
        format!("COMMENT '{}'", escape_string(&self.new))
    }
}

/// Move the table to another tablespace; `None` means file-per-table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeTablespace {
    pub new: Option<String>,
}

impl ChangeTablespace {
    pub(crate) fn render(&self) -> String {
        let target = self.new.as_deref().unwrap_or("innodb_file_per_table");
        format!("TABLESPACE {}", escape_identifier(target))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeStorageEngine {
    pub old: String,
    pub new: String,
}

impl ChangeStorageEngine {
    pub(crate) fn render(&self) -> String {
        format!("ENGINE={}", self.new)
    }

    /// Engines differ in what they can store; a rebuild may lose data
    pub(crate) fn unsafe_reason(&self) -> Option<String> {
        Some(format!(
            "storage engine changing from {} to {}",
            self.old, self.new
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_increment_modes() {
        let change = ChangeAutoIncrement { old: 1, new: 100 };
        let render = |mode| change.render(&StatementModifiers::default().with_next_auto_inc(mode));
        assert_eq!(render(NextAutoInc::Ignore), "");
        assert_eq!(render(NextAutoInc::IfIncreased), "AUTO_INCREMENT = 100");
        assert_eq!(render(NextAutoInc::IfAlready), "");
        assert_eq!(render(NextAutoInc::Always), "AUTO_INCREMENT = 100");

        let lower = ChangeAutoIncrement { old: 50, new: 10 };
        let mods = StatementModifiers::default().with_next_auto_inc(NextAutoInc::IfIncreased);
        assert_eq!(lower.render(&mods), "");
        let mods = StatementModifiers::default().with_next_auto_inc(NextAutoInc::IfAlready);
        assert_eq!(lower.render(&mods), "AUTO_INCREMENT = 10");
    }

    #[test]
    fn test_create_options_reset_to_default() {
        let change = ChangeCreateOptions {
            old: "ROW_FORMAT=COMPRESSED KEY_BLOCK_SIZE=8".to_string(),
            new: "ROW_FORMAT=DYNAMIC".to_string(),
        };
        assert_eq!(change.render(), "KEY_BLOCK_SIZE=0 ROW_FORMAT=DYNAMIC");
    }

    #[test]
    fn test_tablespace_default() {
        assert_eq!(
            ChangeTablespace { new: None }.render(),
            "TABLESPACE `innodb_file_per_table`"
        );
        assert_eq!(
            ChangeTablespace { new: Some("ts1".to_string()) }.render(),
            "TABLESPACE `ts1`"
        );
    }

    #[test]
    fn test_comment_escaped() {
        assert_eq!(
            ChangeComment { new: "it's".to_string() }.render(&StatementModifiers::default()),
            "COMMENT 'it''s'"
        );
    }

    #[test]
    fn test_comment_skipped_under_lax_comments() {
        let change = ChangeComment { new: "orders".to_string() };
        let lax = StatementModifiers::default().with_lax_comments(true);
        assert_eq!(change.render(&lax), "");
    }
}
