//! Server vendor and version identification
//!
//! A [`Flavor`] is the opaque vendor + version value that every rendering path
//! consults for syntax selection. It is ordered (vendor first, then version)
//! and exposes capability predicates rather than raw version checks, so call
//! sites read as "does this server support X" instead of magic numbers.

use std::fmt;
use std::str::FromStr;

/// Database server vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Vendor {
    /// Vendor could not be determined; rendering falls back to MySQL syntax
    #[default]
    Unknown,
    /// Oracle MySQL, including Percona Server and other MySQL-compatible builds
    MySQL,
    /// MariaDB
    MariaDB,
}

impl Vendor {
    /// Get the string representation used in flavor strings
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::MySQL => "mysql",
            Self::MariaDB => "mariadb",
        }
    }
}

/// Vendor-specific build variant layered on top of a [`Vendor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Variant {
    #[default]
    None,
    /// Percona Server (MySQL with column compression and other additions)
    Percona,
}

/// Error returned when a flavor string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlavorParseError {
    #[error("unknown vendor `{0}`")]
    UnknownVendor(String),
    #[error("invalid version `{0}`")]
    InvalidVersion(String),
}

/// A vendor and version combination with distinct syntax and capabilities.
///
/// # Examples
///
/// ```
/// use mortise_types::Flavor;
///
/// let flavor: &Flavor = &"mysql:8.0.32".parse().unwrap();
/// assert!(flavor.has_check_constraints());
/// assert!(flavor.min(8, 0, 19));
///
/// let maria = Flavor::mariadb(10, 4, 0);
/// assert!(!maria.supports_rename_index());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Flavor {
    pub vendor: Vendor,
    pub version: (u16, u16, u16),
    pub variant: Variant,
}

impl Flavor {
    /// Create a MySQL flavor
    #[must_use]
    pub const fn mysql(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            vendor: Vendor::MySQL,
            version: (major, minor, patch),
            variant: Variant::None,
        }
    }

    /// Create a MariaDB flavor
    #[must_use]
    pub const fn mariadb(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            vendor: Vendor::MariaDB,
            version: (major, minor, patch),
            variant: Variant::None,
        }
    }

    /// Create a Percona Server flavor (MySQL vendor with the Percona variant)
    #[must_use]
    pub const fn percona(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            vendor: Vendor::MySQL,
            version: (major, minor, patch),
            variant: Variant::Percona,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_mysql(&self) -> bool {
        matches!(self.vendor, Vendor::MySQL)
    }

    #[inline]
    #[must_use]
    pub const fn is_mariadb(&self) -> bool {
        matches!(self.vendor, Vendor::MariaDB)
    }

    #[inline]
    #[must_use]
    pub const fn is_percona(&self) -> bool {
        matches!(self.variant, Variant::Percona)
    }

    /// Returns true if this flavor's version is at least the supplied version.
    /// Vendor is not considered.
    #[must_use]
    pub const fn min(&self, major: u16, minor: u16, patch: u16) -> bool {
        let (ma, mi, pa) = self.version;
        if ma != major {
            return ma > major;
        }
        if mi != minor {
            return mi > minor;
        }
        pa >= patch
    }

    const fn mysql_min(&self, major: u16, minor: u16, patch: u16) -> bool {
        self.is_mysql() && self.min(major, minor, patch)
    }

    const fn mariadb_min(&self, major: u16, minor: u16, patch: u16) -> bool {
        self.is_mariadb() && self.min(major, minor, patch)
    }

    /// Whether CHECK constraints are enforced and reported in SHOW CREATE TABLE
    #[must_use]
    pub const fn has_check_constraints(&self) -> bool {
        self.mysql_min(8, 0, 16) || self.mariadb_min(10, 2, 1)
    }

    /// Whether CHECK constraints may be declared NOT ENFORCED
    #[must_use]
    pub const fn supports_not_enforced_checks(&self) -> bool {
        self.mysql_min(8, 0, 16)
    }

    /// Whether `ALTER TABLE ... RENAME KEY` is available
    #[must_use]
    pub const fn supports_rename_index(&self) -> bool {
        self.mysql_min(5, 7, 0) || self.mariadb_min(10, 5, 2)
    }

    /// Whether `ALTER TABLE ... RENAME COLUMN` is available
    #[must_use]
    pub const fn supports_rename_column(&self) -> bool {
        self.mysql_min(8, 0, 0) || self.mariadb_min(10, 5, 2)
    }

    /// Whether indexes can be made invisible (MySQL) or ignored (MariaDB)
    #[must_use]
    pub const fn supports_invisible_indexes(&self) -> bool {
        self.mysql_min(8, 0, 0) || self.mariadb_min(10, 6, 0)
    }

    /// Keywords used to toggle index visibility, as (hide, show)
    #[must_use]
    pub const fn index_visibility_keywords(&self) -> (&'static str, &'static str) {
        if self.is_mariadb() {
            ("IGNORED", "NOT IGNORED")
        } else {
            ("INVISIBLE", "VISIBLE")
        }
    }

    /// Keyword for dropping a check constraint in ALTER TABLE
    #[must_use]
    pub const fn drop_check_keyword(&self) -> &'static str {
        if self.is_mariadb() { "CONSTRAINT" } else { "CHECK" }
    }

    /// Whether integer display widths are omitted from SHOW CREATE TABLE
    #[must_use]
    pub const fn omits_int_display_width(&self) -> bool {
        self.mysql_min(8, 0, 19)
    }

    /// Whether the table-level COLLATE is always shown, even for default collations
    #[must_use]
    pub const fn always_shows_collation(&self) -> bool {
        self.mysql_min(8, 0, 0) || self.mariadb_min(11, 3, 0)
    }

    /// Whether SHOW CREATE TABLE wraps partitioning clauses in version comments
    #[must_use]
    pub const fn uses_partition_version_comments(&self) -> bool {
        !self.is_mariadb()
    }

    /// Whether `WITH VALIDATION` may be appended to ALTERs touching virtual columns
    #[must_use]
    pub const fn supports_virtual_column_validation(&self) -> bool {
        self.mysql_min(5, 7, 0)
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vendor = match (self.vendor, self.variant) {
            (Vendor::MySQL, Variant::Percona) => "percona",
            (vendor, _) => vendor.as_str(),
        };
        let (major, minor, patch) = self.version;
        write!(f, "{vendor}:{major}.{minor}")?;
        if patch > 0 {
            write!(f, ".{patch}")?;
        }
        Ok(())
    }
}

impl FromStr for Flavor {
    type Err = FlavorParseError;

    /// Parse strings like `mysql:8.0`, `mariadb:10.11.4` or `percona:8.0.35`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (vendor_str, version_str) = s.trim().split_once(':').unwrap_or((s.trim(), ""));
        let mut flavor = if vendor_str.eq_ignore_ascii_case("mysql") {
            Flavor::mysql(0, 0, 0)
        } else if vendor_str.eq_ignore_ascii_case("mariadb") {
            Flavor::mariadb(0, 0, 0)
        } else if vendor_str.eq_ignore_ascii_case("percona") {
            Flavor::percona(0, 0, 0)
        } else if vendor_str.eq_ignore_ascii_case("unknown") {
            Flavor::default()
        } else {
            return Err(FlavorParseError::UnknownVendor(vendor_str.to_string()));
        };

        if version_str.is_empty() {
            return Ok(flavor);
        }
        let mut parts = [0u16; 3];
        for (i, part) in version_str.split('.').enumerate() {
            // Suffixes like "8.0.35-27" or "10.11.4-log" carry no capability info
            let digits: &str = part
                .split(|c: char| !c.is_ascii_digit())
                .next()
                .unwrap_or_default();
            let slot = parts
                .get_mut(i)
                .ok_or_else(|| FlavorParseError::InvalidVersion(version_str.to_string()))?;
            *slot = digits
                .parse()
                .map_err(|_| FlavorParseError::InvalidVersion(version_str.to_string()))?;
        }
        flavor.version = (parts[0], parts[1], parts[2]);
        Ok(flavor)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Flavor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Flavor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flavor() {
        assert_eq!("mysql:8.0".parse::<Flavor>(), Ok(Flavor::mysql(8, 0, 0)));
        assert_eq!(
            "MariaDB:10.11.4-log".parse::<Flavor>(),
            Ok(Flavor::mariadb(10, 11, 4))
        );
        assert_eq!(
            "percona:8.0.35-27".parse::<Flavor>(),
            Ok(Flavor::percona(8, 0, 35))
        );
        assert!(matches!(
            "postgres:16".parse::<Flavor>(),
            Err(FlavorParseError::UnknownVendor(_))
        ));
        assert!(matches!(
            "mysql:8.x".parse::<Flavor>(),
            Err(FlavorParseError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["mysql:5.7", "mariadb:10.6.12", "percona:8.0.35"] {
            let flavor: Flavor = s.parse().unwrap();
            assert_eq!(flavor.to_string(), s);
        }
    }

    #[test]
    fn test_min_version() {
        let flavor = &Flavor::mysql(8, 0, 19);
        assert!(flavor.min(8, 0, 19));
        assert!(flavor.min(5, 7, 40));
        assert!(!flavor.min(8, 0, 20));
        assert!(!flavor.min(8, 1, 0));
    }

    #[test]
    fn test_capabilities() {
        assert!(!Flavor::mysql(5, 7, 44).has_check_constraints());
        assert!(Flavor::mysql(8, 0, 16).has_check_constraints());
        assert!(Flavor::mariadb(10, 3, 0).has_check_constraints());

        assert!(Flavor::mysql(5, 7, 0).supports_rename_index());
        assert!(!Flavor::mariadb(10, 4, 0).supports_rename_index());
        assert!(Flavor::mariadb(10, 5, 2).supports_rename_index());

        assert_eq!(
            Flavor::mariadb(10, 6, 0).index_visibility_keywords(),
            ("IGNORED", "NOT IGNORED")
        );
        assert_eq!(Flavor::mysql(8, 0, 0).drop_check_keyword(), "CHECK");
        assert_eq!(Flavor::mariadb(10, 6, 0).drop_check_keyword(), "CONSTRAINT");

        let unknown = Flavor::default();
        assert!(!unknown.supports_rename_index());
        assert!(unknown.uses_partition_version_comments());
    }
}
