//! Identifier and string literal quoting

use crate::flavor::Flavor;
use crate::reserved::is_reserved_word;

/// Wrap an identifier in backticks, doubling any embedded backticks
#[must_use]
pub fn escape_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote an identifier only when the flavor requires it: reserved words,
/// empty names, names made only of digits, or names containing characters
/// outside `[A-Za-z0-9_$]`.
#[must_use]
pub fn quote_if_needed(name: &str, flavor: &Flavor) -> String {
    let plain = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
        && !name.bytes().all(|b| b.is_ascii_digit());
    if plain && !is_reserved_word(name, flavor) {
        name.to_string()
    } else {
        escape_identifier(name)
    }
}

/// Escape a value for inclusion in a single-quoted SQL string literal
#[must_use]
pub fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "''")
}

/// Wrap a value in single quotes, escaping as needed
#[must_use]
pub fn quote_string(value: &str) -> String {
    format!("'{}'", escape_string(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("users"), "`users`");
        assert_eq!(escape_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_quote_if_needed() {
        let flavor = Flavor::mysql(8, 0, 0);
        assert_eq!(quote_if_needed("p0", &flavor), "p0");
        assert_eq!(quote_if_needed("rank", &flavor), "`rank`");
        assert_eq!(quote_if_needed("rank", &Flavor::mysql(5, 7, 0)), "rank");
        assert_eq!(quote_if_needed("has space", &flavor), "`has space`");
        assert_eq!(quote_if_needed("123", &flavor), "`123`");
        assert_eq!(quote_if_needed("", &flavor), "``");
        assert_eq!(quote_if_needed("$ok_1", &flavor), "$ok_1");
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("it's"), "'it''s'");
        assert_eq!(quote_string("a\\b"), "'a\\\\b'");
    }
}
