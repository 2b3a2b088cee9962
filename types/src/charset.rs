//! Character set byte widths

/// Maximum bytes per character for character sets shipped with MySQL and MariaDB.
const CHARSET_MAX_BYTES: &[(&str, u64)] = &[
    ("armscii8", 1),
    ("ascii", 1),
    ("big5", 2),
    ("binary", 1),
    ("cp1250", 1),
    ("cp1251", 1),
    ("cp1256", 1),
    ("cp1257", 1),
    ("cp850", 1),
    ("cp852", 1),
    ("cp866", 1),
    ("cp932", 2),
    ("dec8", 1),
    ("eucjpms", 3),
    ("euckr", 2),
    ("gb18030", 4),
    ("gb2312", 2),
    ("gbk", 2),
    ("geostd8", 1),
    ("greek", 1),
    ("hebrew", 1),
    ("hp8", 1),
    ("keybcs2", 1),
    ("koi8r", 1),
    ("koi8u", 1),
    ("latin1", 1),
    ("latin2", 1),
    ("latin5", 1),
    ("latin7", 1),
    ("macce", 1),
    ("macroman", 1),
    ("sjis", 2),
    ("swe7", 1),
    ("tis620", 1),
    ("ucs2", 2),
    ("ujis", 3),
    ("utf16", 4),
    ("utf16le", 4),
    ("utf32", 4),
    ("utf8", 3),
    ("utf8mb3", 3),
    ("utf8mb4", 4),
];

/// Returns the maximum number of bytes a single character occupies in the
/// named character set. Unknown character sets are treated as 4 bytes wide,
/// the largest width any supported charset uses.
#[must_use]
pub fn max_bytes_per_char(charset: &str) -> u64 {
    CHARSET_MAX_BYTES
        .binary_search_by(|(name, _)| name.cmp(&charset))
        .map(|i| CHARSET_MAX_BYTES[i].1)
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(CHARSET_MAX_BYTES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_known_widths() {
        assert_eq!(max_bytes_per_char("latin1"), 1);
        assert_eq!(max_bytes_per_char("utf8mb3"), 3);
        assert_eq!(max_bytes_per_char("utf8mb4"), 4);
        assert_eq!(max_bytes_per_char("mystery"), 4);
    }
}
