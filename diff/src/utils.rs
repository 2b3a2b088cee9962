//! Text helpers for table options and create statements

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static CREATE_OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)=('(?:[^']|'')*'|\S+)").expect("create option pattern is valid")
});

// Only the table options line that follows the closing parenthesis, and
// never inside a quoted comment
static AUTO_INCREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\)[^'\n]*?) AUTO_INCREMENT=\d+").expect("auto-increment pattern is valid")
});

/// Values each creation option takes when not specified
const CREATE_OPTION_DEFAULTS: &[(&str, &str)] = &[
    ("AVG_ROW_LENGTH", "0"),
    ("CHECKSUM", "0"),
    ("COMPRESSION", "'None'"),
    ("DELAY_KEY_WRITE", "0"),
    ("ENCRYPTION", "'N'"),
    ("KEY_BLOCK_SIZE", "0"),
    ("MAX_ROWS", "0"),
    ("MIN_ROWS", "0"),
    ("PACK_KEYS", "DEFAULT"),
    ("PAGE_CHECKSUM", "0"),
    ("PAGE_COMPRESSED", "0"),
    ("ROW_FORMAT", "DEFAULT"),
    ("STATS_AUTO_RECALC", "DEFAULT"),
    ("STATS_PERSISTENT", "DEFAULT"),
    ("STATS_SAMPLE_PAGES", "DEFAULT"),
    ("TRANSACTIONAL", "DEFAULT"),
];

/// Split a space separated creation option string into an ordered map
pub(crate) fn parse_create_options(options: &str) -> BTreeMap<String, String> {
    CREATE_OPTION_RE
        .captures_iter(options)
        .map(|caps| (caps[1].to_ascii_uppercase(), caps[2].to_string()))
        .collect()
}

/// The value a creation option takes when it is absent
pub(crate) fn create_option_default(key: &str) -> &'static str {
    CREATE_OPTION_DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map_or("DEFAULT", |(_, v)| *v)
}

/// Remove the table-level `AUTO_INCREMENT=n` from a create statement
pub(crate) fn strip_auto_increment(create: &str) -> String {
    AUTO_INCREMENT_RE.replace(create, "${1}").into_owned()
}

/// Remove a trailing partitioning clause from a create statement
pub(crate) fn strip_partitioning(create: &str) -> String {
    ["\n/*!50100 PARTITION BY ", "\n/*!50500 PARTITION BY ", "\nPARTITION BY "]
        .iter()
        .filter_map(|marker| create.find(marker))
        .min()
        .map_or_else(|| create.to_string(), |pos| create[..pos].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_options() {
        let opts = parse_create_options("ROW_FORMAT=COMPRESSED KEY_BLOCK_SIZE=8 ENCRYPTION='Y'");
        assert_eq!(opts.len(), 3);
        assert_eq!(opts["ROW_FORMAT"], "COMPRESSED");
        assert_eq!(opts["KEY_BLOCK_SIZE"], "8");
        assert_eq!(opts["ENCRYPTION"], "'Y'");
        assert!(parse_create_options("").is_empty());
    }

    #[test]
    fn test_create_option_defaults() {
        assert_eq!(create_option_default("ROW_FORMAT"), "DEFAULT");
        assert_eq!(create_option_default("KEY_BLOCK_SIZE"), "0");
        assert_eq!(create_option_default("SOMETHING_NEW"), "DEFAULT");
    }

    #[test]
    fn test_strip_auto_increment() {
        let create = "CREATE TABLE `t` (\n  `id` int NOT NULL AUTO_INCREMENT\n) ENGINE=InnoDB AUTO_INCREMENT=123 DEFAULT CHARSET=utf8mb4";
        assert_eq!(
            strip_auto_increment(create),
            "CREATE TABLE `t` (\n  `id` int NOT NULL AUTO_INCREMENT\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"
        );
    }

    #[test]
    fn test_strip_auto_increment_leaves_comments() {
        let create = "CREATE TABLE `t` (\n  `id` int NOT NULL COMMENT 'was AUTO_INCREMENT=5'\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COMMENT='reset AUTO_INCREMENT=7 nightly'";
        assert_eq!(strip_auto_increment(create), create);

        let with_counter = create.replace("ENGINE=InnoDB", "ENGINE=InnoDB AUTO_INCREMENT=42");
        assert_eq!(strip_auto_increment(&with_counter), create);
    }

    #[test]
    fn test_strip_partitioning() {
        let create = "CREATE TABLE `t` (\n  `id` int\n) ENGINE=InnoDB\n/*!50100 PARTITION BY HASH (`id`)\nPARTITIONS 4 */";
        assert_eq!(strip_partitioning(create), "CREATE TABLE `t` (\n  `id` int\n) ENGINE=InnoDB");
        let maria = "CREATE TABLE `t` (\n  `id` int\n) ENGINE=InnoDB\nPARTITION BY HASH (`id`)\nPARTITIONS 4";
        assert_eq!(strip_partitioning(maria), "CREATE TABLE `t` (\n  `id` int\n) ENGINE=InnoDB");
        assert_eq!(strip_partitioning("CREATE TABLE `x` (`a` int)"), "CREATE TABLE `x` (`a` int)");
    }
}
