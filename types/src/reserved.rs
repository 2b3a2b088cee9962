//! Reserved words per vendor and version
//!
//! Word sets are built lazily on first use and cached for the life of the
//! process. Building is serialized by a single mutex; lookups against a set
//! that is already built never take the lock. The cache is safe to share
//! across threads running independent diffs.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::flavor::Flavor;

/// Reserved in every supported MySQL and MariaDB release
pub const COMMON_RESERVED: &[&str] = &[
    "ACCESSIBLE", "ADD", "ALL", "ALTER", "ANALYZE", "AND", "AS", "ASC", "ASENSITIVE", "BEFORE",
    "BETWEEN", "BIGINT", "BINARY", "BLOB", "BOTH", "BY", "CALL", "CASCADE", "CASE", "CHANGE",
    "CHAR", "CHARACTER", "CHECK", "COLLATE", "COLUMN", "CONDITION", "CONSTRAINT", "CONTINUE",
    "CONVERT", "CREATE", "CROSS", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP",
    "CURRENT_USER", "CURSOR", "DATABASE", "DATABASES", "DAY_HOUR", "DAY_MICROSECOND",
    "DAY_MINUTE", "DAY_SECOND", "DEC", "DECIMAL", "DECLARE", "DEFAULT", "DELAYED", "DELETE",
    "DESC", "DESCRIBE", "DETERMINISTIC", "DISTINCT", "DISTINCTROW", "DIV", "DOUBLE", "DROP",
    "DUAL", "EACH", "ELSE", "ELSEIF", "ENCLOSED", "ESCAPED", "EXISTS", "EXIT", "EXPLAIN", "FALSE",
    "FETCH", "FLOAT", "FLOAT4", "FLOAT8", "FOR", "FORCE", "FOREIGN", "FROM", "FULLTEXT", "GRANT",
    "GROUP", "HAVING", "HIGH_PRIORITY", "HOUR_MICROSECOND", "HOUR_MINUTE", "HOUR_SECOND", "IF",
    "IGNORE", "IN", "INDEX", "INFILE", "INNER", "INOUT", "INSENSITIVE", "INSERT", "INT", "INT1",
    "INT2", "INT3", "INT4", "INT8", "INTEGER", "INTERVAL", "INTO", "IS", "ITERATE", "JOIN", "KEY",
    "KEYS", "KILL", "LEADING", "LEAVE", "LEFT", "LIKE", "LIMIT", "LINEAR", "LINES", "LOAD",
    "LOCALTIME", "LOCALTIMESTAMP", "LOCK", "LONG", "LONGBLOB", "LONGTEXT", "LOOP",
    "LOW_PRIORITY", "MASTER_SSL_VERIFY_SERVER_CERT", "MATCH", "MAXVALUE", "MEDIUMBLOB",
    "MEDIUMINT", "MEDIUMTEXT", "MIDDLEINT", "MINUTE_MICROSECOND", "MINUTE_SECOND", "MOD",
    "MODIFIES", "NATURAL", "NOT", "NO_WRITE_TO_BINLOG", "NULL", "NUMERIC", "ON", "OPTIMIZE",
    "OPTION", "OPTIONALLY", "OR", "ORDER", "OUT", "OUTER", "OUTFILE", "PARTITION", "PRECISION",
    "PRIMARY", "PROCEDURE", "PURGE", "RANGE", "READ", "READS", "READ_WRITE", "REAL",
    "REFERENCES", "REGEXP", "RELEASE", "RENAME", "REPEAT", "REPLACE", "REQUIRE", "RESIGNAL",
    "RESTRICT", "RETURN", "REVOKE", "RIGHT", "RLIKE", "SCHEMA", "SCHEMAS", "SECOND_MICROSECOND",
    "SELECT", "SENSITIVE", "SEPARATOR", "SET", "SHOW", "SIGNAL", "SMALLINT", "SPATIAL",
    "SPECIFIC", "SQL", "SQLEXCEPTION", "SQLSTATE", "SQLWARNING", "SQL_BIG_RESULT",
    "SQL_CALC_FOUND_ROWS", "SQL_SMALL_RESULT", "SSL", "STARTING", "STRAIGHT_JOIN", "TABLE",
    "TERMINATED", "THEN", "TINYBLOB", "TINYINT", "TINYTEXT", "TO", "TRAILING", "TRIGGER", "TRUE",
    "UNDO", "UNION", "UNIQUE", "UNLOCK", "UNSIGNED", "UPDATE", "USAGE", "USE", "USING",
    "UTC_DATE", "UTC_TIME", "UTC_TIMESTAMP", "VALUES", "VARBINARY", "VARCHAR", "VARCHARACTER",
    "VARYING", "WHEN", "WHERE", "WHILE", "WITH", "WRITE", "XOR", "YEAR_MONTH", "ZEROFILL",
];

/// Reserved in all supported MySQL releases but not MariaDB
pub const MYSQL_RESERVED: &[&str] = &[
    "GENERATED",
    "IO_AFTER_GTIDS",
    "IO_BEFORE_GTIDS",
    "MASTER_BIND",
    "OPTIMIZER_COSTS",
    "STORED",
    "VIRTUAL",
];

/// Added in MySQL 8.0.0
pub const MYSQL_80_RESERVED: &[&str] = &[
    "CUBE", "CUME_DIST", "DENSE_RANK", "EMPTY", "EXCEPT", "FIRST_VALUE", "FUNCTION", "GROUPING",
    "GROUPS", "JSON_TABLE", "LAG", "LAST_VALUE", "LATERAL", "LEAD", "NTH_VALUE", "NTILE", "OF",
    "OVER", "PERCENT_RANK", "RANK", "RECURSIVE", "ROW", "ROWS", "ROW_NUMBER", "SYSTEM", "WINDOW",
];

/// Added in MySQL 8.0.17
pub const MYSQL_8017_RESERVED: &[&str] = &["ARRAY", "MEMBER"];

/// Added in MySQL 8.0.31
pub const MYSQL_8031_RESERVED: &[&str] = &["INTERSECT"];

/// Added in MySQL 8.4
pub const MYSQL_84_RESERVED: &[&str] = &["MANUAL", "PARALLEL", "QUALIFY", "TABLESAMPLE"];

/// Reserved in all supported MariaDB releases but not MySQL
pub const MARIADB_RESERVED: &[&str] = &[
    "CURRENT_ROLE",
    "DELETE_DOMAIN_ID",
    "DO_DOMAIN_IDS",
    "EXCEPT",
    "GENERAL",
    "IGNORE_DOMAIN_IDS",
    "IGNORE_SERVER_IDS",
    "INTERSECT",
    "MASTER_HEARTBEAT_PERIOD",
    "OVER",
    "PAGE_CHECKSUM",
    "PARSE_VCOL_EXPR",
    "POSITION",
    "RECURSIVE",
    "REF_SYSTEM_ID",
    "RETURNING",
    "ROWS",
    "SLOW",
    "STATS_AUTO_RECALC",
    "STATS_PERSISTENT",
    "STATS_SAMPLE_PAGES",
    "WINDOW",
];

/// Added in MariaDB 10.6
pub const MARIADB_106_RESERVED: &[&str] = &["OFFSET"];

/// Distinct word-set shapes; each flavor maps onto exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum WordSetKey {
    MySQL57,
    MySQL80,
    MySQL8017,
    MySQL8031,
    MySQL84,
    MariaDB,
    MariaDB106,
}

impl WordSetKey {
    const COUNT: usize = 7;

    fn for_flavor(flavor: &Flavor) -> Self {
        if flavor.is_mariadb() {
            return if flavor.min(10, 6, 0) {
                Self::MariaDB106
            } else {
                Self::MariaDB
            };
        }
        if flavor.min(8, 4, 0) {
            Self::MySQL84
        } else if flavor.min(8, 0, 31) {
            Self::MySQL8031
        } else if flavor.min(8, 0, 17) {
            Self::MySQL8017
        } else if flavor.min(8, 0, 0) {
            Self::MySQL80
        } else {
            Self::MySQL57
        }
    }

    const fn index(self) -> usize {
        self as usize
    }

    fn lists(self) -> Vec<&'static [&'static str]> {
        let mut lists = vec![COMMON_RESERVED];
        match self {
            Self::MariaDB | Self::MariaDB106 => {
                lists.push(MARIADB_RESERVED);
                if self == Self::MariaDB106 {
                    lists.push(MARIADB_106_RESERVED);
                }
            }
            _ => {
                lists.push(MYSQL_RESERVED);
                if self != Self::MySQL57 {
                    lists.push(MYSQL_80_RESERVED);
                }
                if matches!(self, Self::MySQL8017 | Self::MySQL8031 | Self::MySQL84) {
                    lists.push(MYSQL_8017_RESERVED);
                }
                if matches!(self, Self::MySQL8031 | Self::MySQL84) {
                    lists.push(MYSQL_8031_RESERVED);
                }
                if self == Self::MySQL84 {
                    lists.push(MYSQL_84_RESERVED);
                }
            }
        }
        lists
    }
}

/// Process-wide memoized reserved word sets.
///
/// Each slot is published once through a [`OnceLock`], so readers of a built
/// set need no synchronization. Construction of a missing set happens under
/// `build_lock`, so each set is built at most once even under contention.
struct ReservedWords {
    sets: [OnceLock<HashSet<&'static str>>; WordSetKey::COUNT],
    build_lock: Mutex<()>,
}

impl ReservedWords {
    const fn new() -> Self {
        Self {
            sets: [
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
            ],
            build_lock: Mutex::new(()),
        }
    }

    /// Get the reserved word set for a flavor, building it if necessary
    fn get(&self, flavor: &Flavor) -> &HashSet<&'static str> {
        let key = WordSetKey::for_flavor(flavor);
        let cell = &self.sets[key.index()];
        if let Some(set) = cell.get() {
            return set;
        }
        // A panic while building leaves the slot empty, so a poisoned lock is safe to reuse
        let _guard = self
            .build_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cell.get_or_init(|| key.lists().into_iter().flatten().copied().collect())
    }
}

static RESERVED_WORDS: ReservedWords = ReservedWords::new();

/// The reserved word set for a flavor, with words in upper case
pub fn reserved_words(flavor: &Flavor) -> &'static HashSet<&'static str> {
    RESERVED_WORDS.get(flavor)
}

/// Returns true if `word` is reserved in the given flavor. Comparison is
/// case-insensitive.
pub fn is_reserved_word(word: &str, flavor: &Flavor) -> bool {
    let set = reserved_words(flavor);
    if word.bytes().any(|b| b.is_ascii_lowercase()) {
        set.contains(word.to_ascii_uppercase().as_str())
    } else {
        set.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_words() {
        for flavor in [
            Flavor::mysql(5, 7, 0),
            Flavor::mysql(8, 4, 0),
            Flavor::mariadb(10, 3, 0),
        ] {
            assert!(is_reserved_word("select", &flavor), "{flavor}");
            assert!(is_reserved_word("Table", &flavor), "{flavor}");
            assert!(!is_reserved_word("users", &flavor), "{flavor}");
        }
    }

    #[test]
    fn test_version_specific_words() {
        assert!(!is_reserved_word("rank", &Flavor::mysql(5, 7, 44)));
        assert!(is_reserved_word("rank", &Flavor::mysql(8, 0, 0)));
        assert!(!is_reserved_word("member", &Flavor::mysql(8, 0, 16)));
        assert!(is_reserved_word("member", &Flavor::mysql(8, 0, 17)));
        assert!(!is_reserved_word("intersect", &Flavor::mysql(8, 0, 30)));
        assert!(is_reserved_word("intersect", &Flavor::mysql(8, 0, 31)));
        assert!(is_reserved_word("qualify", &Flavor::mysql(8, 4, 0)));
        assert!(!is_reserved_word("qualify", &Flavor::mysql(8, 0, 40)));
    }

    #[test]
    fn test_vendor_specific_words() {
        assert!(is_reserved_word("virtual", &Flavor::mysql(5, 7, 0)));
        assert!(!is_reserved_word("virtual", &Flavor::mariadb(10, 6, 0)));
        assert!(is_reserved_word("returning", &Flavor::mariadb(10, 3, 0)));
        assert!(!is_reserved_word("returning", &Flavor::mysql(8, 0, 0)));
        assert!(!is_reserved_word("offset", &Flavor::mariadb(10, 5, 0)));
        assert!(is_reserved_word("offset", &Flavor::mariadb(10, 6, 0)));
    }

    #[test]
    fn test_concurrent_builds_share_one_set() {
        let flavor = Flavor::mysql(8, 0, 35);
        let ptrs: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| std::ptr::from_ref(reserved_words(&flavor)) as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
    }
}
