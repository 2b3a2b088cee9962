//! Structured column types
//!
//! [`ColumnType`] parses the canonical type string a server reports for a
//! column (`"bigint(20) unsigned"`, `"enum('a','b')"`, `"decimal(10,2)"`) into
//! its base type and modifiers. The canonical string is cached at parse time
//! and must always be reproducible from the structured fields:
//!
//! ```
//! use mortise_types::ColumnType;
//!
//! let ct = ColumnType::parse("int(10) unsigned zerofill");
//! assert_eq!(ct.base, "int");
//! assert_eq!(ct.size, Some(10));
//! assert!(ct.unsigned && ct.zerofill);
//! assert_eq!(ct.as_str(), "int(10) unsigned zerofill");
//! assert_eq!(ct.render(), ct.as_str());
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::charset::max_bytes_per_char;

const INTEGER_TYPES: &[&str] = &["tinyint", "smallint", "mediumint", "int", "bigint"];
const STRING_TYPES: &[&str] = &[
    "char",
    "varchar",
    "tinytext",
    "text",
    "mediumtext",
    "longtext",
];
const BINARY_TYPES: &[&str] = &[
    "binary",
    "varbinary",
    "tinyblob",
    "blob",
    "mediumblob",
    "longblob",
    "vector",
];
const TEMPORAL_TYPES: &[&str] = &["date", "datetime", "timestamp", "time", "year"];

/// A parsed column type.
///
/// Values built with [`ColumnType::parse`] carry their canonical string. Values
/// assembled by hand (via [`ColumnType::new`] and the builder methods) do not;
/// calling [`ColumnType::as_str`] on one panics. Use [`ColumnType::render`] or
/// [`ColumnType::to_canonical`] instead.
#[derive(Clone, Debug)]
pub struct ColumnType {
    /// Base type name, e.g. `int`, `varchar`, `enum`
    pub base: String,
    /// Length, display width, or precision
    pub size: Option<u32>,
    /// Decimal scale or floating point digits
    pub scale: Option<u32>,
    pub unsigned: bool,
    pub zerofill: bool,
    /// Raw quoted value list for enum and set types
    values: Option<String>,
    canonical: Option<String>,
}

impl ColumnType {
    /// Start a hand-built column type. The result has no canonical string.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            size: None,
            scale: None,
            unsigned: false,
            zerofill: false,
            values: None,
            canonical: None,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self.canonical = None;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self.canonical = None;
        self
    }

    #[must_use]
    pub fn with_unsigned(mut self) -> Self {
        self.unsigned = true;
        self.canonical = None;
        self
    }

    #[must_use]
    pub fn with_zerofill(mut self) -> Self {
        self.zerofill = true;
        self.canonical = None;
        self
    }

    /// Set the value list of an enum or set type from unescaped values
    #[must_use]
    pub fn with_values<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        self.values = Some(quote_values(values));
        self.canonical = None;
        self
    }

    /// Parse a canonical column type string.
    ///
    /// Input is expected to be server-reported canonical text. Malformed input
    /// yields a best-effort partial result: unparseable sizes are left unset
    /// and unknown trailing modifiers are dropped.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let base_end = input.find(['(', ' ']).unwrap_or(input.len());
        let mut ct = ColumnType::new(&input[..base_end]);
        let mut rest = &input[base_end..];

        if rest.starts_with('(') {
            let close = find_closing_paren(rest).unwrap_or(rest.len());
            let inner = &rest[1..close.max(1)];
            if ct.is_enum_or_set() {
                ct.values = Some(inner.to_string());
            } else {
                let mut args = inner.splitn(2, ',');
                ct.size = args.next().and_then(|s| s.trim().parse().ok());
                ct.scale = args.next().and_then(|s| s.trim().parse().ok());
            }
            rest = rest.get(close + 1..).unwrap_or_default();
        }

        for word in rest.split_whitespace() {
            if word.eq_ignore_ascii_case("unsigned") {
                ct.unsigned = true;
            } else if word.eq_ignore_ascii_case("zerofill") {
                ct.zerofill = true;
            }
        }

        ct.canonical = Some(ct.render());
        ct
    }

    /// The cached canonical string.
    ///
    /// # Panics
    ///
    /// Panics if this value was not produced by [`ColumnType::parse`] (or
    /// [`ColumnType::to_canonical`]).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match &self.canonical {
            Some(s) => s,
            None => panic!(
                "ColumnType::as_str called on hand-built type `{}`; use render() or to_canonical()",
                self.render()
            ),
        }
    }

    /// Whether this value carries a canonical string
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.canonical.is_some()
    }

    /// Render the type string from the structured fields
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self.base.clone();
        if let Some(values) = &self.values {
            out.push('(');
            out.push_str(values);
            out.push(')');
        } else if let Some(size) = self.size {
            match self.scale {
                Some(scale) => out.push_str(&format!("({size},{scale})")),
                None => out.push_str(&format!("({size})")),
            }
        }
        if self.unsigned {
            out.push_str(" unsigned");
        }
        if self.zerofill {
            out.push_str(" zerofill");
        }
        out
    }

    /// Produce a canonical copy of this type
    #[must_use]
    pub fn to_canonical(&self) -> Self {
        Self::parse(&self.render())
    }

    // =========================================================================
    // Classification
    // =========================================================================

    #[must_use]
    pub fn is_integer(&self) -> bool {
        INTEGER_TYPES.contains(&self.base.as_str())
    }

    #[must_use]
    pub fn is_integer_or_year(&self) -> bool {
        self.is_integer() || self.base == "year"
    }

    #[must_use]
    pub fn is_enum_or_set(&self) -> bool {
        self.base == "enum" || self.base == "set"
    }

    #[must_use]
    pub fn is_decimal(&self) -> bool {
        self.base == "decimal" || self.base == "numeric"
    }

    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self.base.as_str(), "float" | "double" | "real")
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        STRING_TYPES.contains(&self.base.as_str())
    }

    #[must_use]
    pub fn is_binary(&self) -> bool {
        BINARY_TYPES.contains(&self.base.as_str())
    }

    #[must_use]
    pub fn is_temporal(&self) -> bool {
        TEMPORAL_TYPES.contains(&self.base.as_str())
    }

    /// Whether this type stores character data with a character set
    #[must_use]
    pub fn has_charset(&self) -> bool {
        self.is_string() || self.is_enum_or_set()
    }

    // =========================================================================
    // Value domains
    // =========================================================================

    /// Exact (min, max) range of an integer type, or `None` for non-integers
    #[must_use]
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        let bits: u32 = match self.base.as_str() {
            "tinyint" => 8,
            "smallint" => 16,
            "mediumint" => 24,
            "int" => 32,
            "bigint" => 64,
            _ => return None,
        };
        if self.unsigned {
            Some((0, (1i128 << bits) - 1))
        } else {
            Some((-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1))
        }
    }

    /// Maximum byte capacity of a string type when stored in `charset`
    #[must_use]
    pub fn string_max_bytes(&self, charset: &str) -> Option<u64> {
        match self.base.as_str() {
            "char" | "varchar" => {
                Some(u64::from(self.size.unwrap_or(1)) * max_bytes_per_char(charset))
            }
            "tinytext" => Some(255),
            "text" => Some(65_535),
            "mediumtext" => Some(16_777_215),
            "longtext" => Some(4_294_967_295),
            _ => None,
        }
    }

    /// Maximum byte capacity of a binary type
    #[must_use]
    pub fn binary_max_bytes(&self) -> Option<u64> {
        match self.base.as_str() {
            "binary" | "varbinary" => Some(u64::from(self.size.unwrap_or(1))),
            "tinyblob" => Some(255),
            "blob" => Some(65_535),
            "mediumblob" => Some(16_777_215),
            "longblob" => Some(4_294_967_295),
            "vector" => Some(4 * u64::from(self.size.unwrap_or(2048))),
            _ => None,
        }
    }

    /// Fractional seconds precision of a temporal type (0 if unspecified)
    #[must_use]
    pub fn fractional_precision(&self) -> u32 {
        if matches!(self.base.as_str(), "datetime" | "timestamp" | "time") {
            self.size.unwrap_or(0)
        } else {
            0
        }
    }

    /// Unescaped values of an enum or set type, in declaration order
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        self.values.as_deref().map(parse_values).unwrap_or_default()
    }

    /// The raw quoted value list of an enum or set type
    #[must_use]
    pub fn raw_values(&self) -> Option<&str> {
        self.values.as_deref()
    }

    // =========================================================================
    // Equivalence
    // =========================================================================

    /// Returns true if the types are identical, or if both are integer/year
    /// types differing only in display width. Zerofill types keep their width
    /// meaningful, so differing widths are never equivalent there.
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        if self == other {
            return true;
        }
        self.is_integer_or_year()
            && self.base == other.base
            && self.unsigned == other.unsigned
            && self.zerofill == other.zerofill
            && !self.zerofill
    }

    /// Returns a copy without a superfluous integer display width, and whether
    /// anything was removed. `tinyint(1)` (the boolean alias) and zerofill
    /// types keep their width.
    #[must_use]
    pub fn strip_display_width(&self) -> (Self, bool) {
        let is_bool = self.base == "tinyint" && self.size == Some(1) && !self.unsigned;
        if !self.is_integer_or_year() || self.size.is_none() || self.zerofill || is_bool {
            return (self.clone(), false);
        }
        let mut stripped = self.clone();
        stripped.size = None;
        (stripped.to_canonical(), true)
    }
}

impl PartialEq for ColumnType {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && self.size == other.size
            && self.scale == other.scale
            && self.unsigned == other.unsigned
            && self.zerofill == other.zerofill
            && self.values == other.values
    }
}

impl Eq for ColumnType {}

impl Hash for ColumnType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base.hash(state);
        self.size.hash(state);
        self.scale.hash(state);
        self.unsigned.hash(state);
        self.zerofill.hash(state);
        self.values.hash(state);
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for ColumnType {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ColumnType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ColumnType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

// =============================================================================
// Enum/set value lists
// =============================================================================

/// Find the byte offset of the `)` closing the `(` at the start of `s`,
/// skipping over quoted enum values.
fn find_closing_paren(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_quote {
            match b {
                b'\\' => i += 1,
                b'\'' if bytes.get(i + 1) == Some(&b'\'') => i += 1,
                b'\'' => in_quote = false,
                _ => {}
            }
        } else {
            match b {
                b'\'' => in_quote = true,
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    None
}

/// Decode a quoted value list like `'a','b''c'` into unescaped strings
fn parse_values(raw: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\'' {
            continue;
        }
        let mut value = String::new();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        value.push(escaped);
                    }
                }
                '\'' if chars.peek() == Some(&'\'') => {
                    chars.next();
                    value.push('\'');
                }
                '\'' => break,
                _ => value.push(c),
            }
        }
        values.push(value);
    }
    values
}

/// Quote and escape values into an enum/set value list. Inverse of the
/// decoding performed by [`ColumnType::values`].
#[must_use]
pub fn quote_values<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v.as_ref().replace('\\', "\\\\").replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let inputs = [
            "int(11)",
            "int",
            "bigint(20) unsigned",
            "int(10) unsigned zerofill",
            "tinyint(1)",
            "decimal(10,2)",
            "decimal(10,0) unsigned",
            "double",
            "float(7,3)",
            "varchar(255)",
            "char(1)",
            "text",
            "binary(16)",
            "varbinary(3000)",
            "datetime(6)",
            "timestamp",
            "year(4)",
            "bit(1)",
            "vector(3)",
            "enum('a','b','c')",
            "set('x','y''z','back\\\\slash')",
            "enum('has(paren)','has,comma')",
        ];
        for input in inputs {
            let ct = ColumnType::parse(input);
            assert_eq!(ct.as_str(), input, "canonical mismatch for {input}");
            assert_eq!(ct.render(), input, "render mismatch for {input}");
        }
    }

    #[test]
    fn test_parse_fields() {
        let ct = ColumnType::parse("decimal(12,4) unsigned");
        assert_eq!(ct.base, "decimal");
        assert_eq!(ct.size, Some(12));
        assert_eq!(ct.scale, Some(4));
        assert!(ct.unsigned);
        assert!(!ct.zerofill);

        let ct = ColumnType::parse("enum('a','b')");
        assert_eq!(ct.base, "enum");
        assert_eq!(ct.size, None);
        assert_eq!(ct.raw_values(), Some("'a','b'"));
    }

    #[test]
    #[should_panic(expected = "hand-built")]
    fn test_hand_built_as_str_panics() {
        let ct = ColumnType::new("int").with_size(11);
        let _ = ct.as_str();
    }

    #[test]
    fn test_hand_built_equals_parsed() {
        let built = ColumnType::new("int").with_size(10).with_unsigned();
        let parsed = ColumnType::parse("int(10) unsigned");
        assert_eq!(built, parsed);
        assert!(!built.is_canonical());
        assert_eq!(built.to_canonical().as_str(), "int(10) unsigned");
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(
            ColumnType::parse("tinyint(4)").integer_range(),
            Some((-128, 127))
        );
        assert_eq!(
            ColumnType::parse("tinyint(3) unsigned").integer_range(),
            Some((0, 255))
        );
        assert_eq!(
            ColumnType::parse("mediumint(9)").integer_range(),
            Some((-8_388_608, 8_388_607))
        );
        assert_eq!(
            ColumnType::parse("bigint(20) unsigned").integer_range(),
            Some((0, 18_446_744_073_709_551_615))
        );
        assert_eq!(ColumnType::parse("varchar(10)").integer_range(), None);
    }

    #[test]
    fn test_max_bytes() {
        assert_eq!(
            ColumnType::parse("varchar(20)").string_max_bytes("utf8mb4"),
            Some(80)
        );
        assert_eq!(
            ColumnType::parse("char(10)").string_max_bytes("latin1"),
            Some(10)
        );
        assert_eq!(
            ColumnType::parse("mediumtext").string_max_bytes("utf8mb4"),
            Some(16_777_215)
        );
        assert_eq!(ColumnType::parse("int").string_max_bytes("latin1"), None);
        assert_eq!(ColumnType::parse("binary(16)").binary_max_bytes(), Some(16));
        assert_eq!(
            ColumnType::parse("longblob").binary_max_bytes(),
            Some(4_294_967_295)
        );
        assert_eq!(ColumnType::parse("vector(3)").binary_max_bytes(), Some(12));
    }

    #[test]
    fn test_equivalent() {
        let a = ColumnType::parse("int(11)");
        let b = ColumnType::parse("int");
        assert!(a.equivalent(&b));
        assert!(ColumnType::parse("year(4)").equivalent(&ColumnType::parse("year")));
        assert!(!a.equivalent(&ColumnType::parse("int(11) unsigned")));
        assert!(!a.equivalent(&ColumnType::parse("bigint(11)")));
        assert!(
            !ColumnType::parse("int(5) zerofill")
                .equivalent(&ColumnType::parse("int(8) zerofill"))
        );
        assert!(
            !ColumnType::parse("varchar(10)").equivalent(&ColumnType::parse("varchar(11)"))
        );
    }

    #[test]
    fn test_strip_display_width() {
        let (stripped, changed) = ColumnType::parse("bigint(20) unsigned").strip_display_width();
        assert!(changed);
        assert_eq!(stripped.as_str(), "bigint unsigned");

        let (kept, changed) = ColumnType::parse("tinyint(1)").strip_display_width();
        assert!(!changed);
        assert_eq!(kept.as_str(), "tinyint(1)");

        let (kept, changed) = ColumnType::parse("tinyint(1) unsigned").strip_display_width();
        assert!(changed);
        assert_eq!(kept.as_str(), "tinyint unsigned");

        let (kept, changed) = ColumnType::parse("int(5) zerofill").strip_display_width();
        assert!(!changed);
        assert_eq!(kept.as_str(), "int(5) zerofill");

        let (kept, changed) = ColumnType::parse("varchar(30)").strip_display_width();
        assert!(!changed);
        assert_eq!(kept.as_str(), "varchar(30)");
    }

    #[test]
    fn test_values_round_trip() {
        let raw = "'a','it''s','back\\\\slash','',' spaced '";
        let ct = ColumnType::parse(&format!("enum({raw})"));
        let values = ct.values();
        assert_eq!(values, vec!["a", "it's", "back\\slash", "", " spaced "]);
        assert_eq!(quote_values(&values), raw);
    }

    #[test]
    fn test_with_values() {
        let ct = ColumnType::new("set").with_values(&["x", "y'z"]);
        assert_eq!(ct.render(), "set('x','y''z')");
    }
}
