//! Statement and configuration errors

use crate::traits::ObjectKey;

/// Classification of a [`StatementError`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The statement risks data loss and unsafe statements were not allowed
    Unsafe,
    /// The object uses features the model cannot represent
    Unsupported,
    /// The statement is refused by policy
    Forbidden,
}

/// Error returned when rendering an object diff.
///
/// Every variant carries the generated statement text, which may be partial
/// or empty, so callers can display it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatementError {
    #[error("unsafe statement for {key}: {reason}")]
    Unsafe {
        key: ObjectKey,
        statement: String,
        reason: String,
    },

    /// `expected` is the canonical DDL as introspected; `actual` is what the
    /// model regenerates from it
    #[error("{key} uses features not supported for diffing")]
    Unsupported {
        key: ObjectKey,
        statement: String,
        expected: String,
        actual: String,
        /// Set when the statement is also unsafe
        #[source]
        cause: Option<Box<StatementError>>,
    },

    #[error("forbidden statement for {key}: {reason}")]
    Forbidden {
        key: ObjectKey,
        statement: String,
        reason: String,
    },
}

impl StatementError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unsafe { .. } => ErrorKind::Unsafe,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
        }
    }

    /// The generated statement text
    pub fn statement(&self) -> &str {
        match self {
            Self::Unsafe { statement, .. }
            | Self::Unsupported { statement, .. }
            | Self::Forbidden { statement, .. } => statement,
        }
    }

    pub fn key(&self) -> &ObjectKey {
        match self {
            Self::Unsafe { key, .. } | Self::Unsupported { key, .. } | Self::Forbidden { key, .. } => {
                key
            }
        }
    }

    /// True for unsafe statements, including unsupported ones that are also unsafe
    pub fn is_unsafe(&self) -> bool {
        match self {
            Self::Unsafe { .. } => true,
            Self::Unsupported { cause, .. } => cause.as_deref().is_some_and(Self::is_unsafe),
            Self::Forbidden { .. } => false,
        }
    }

    /// Reason the statement is unsafe, if it is
    pub fn unsafe_reason(&self) -> Option<&str> {
        match self {
            Self::Unsafe { reason, .. } => Some(reason),
            Self::Unsupported { cause, .. } => cause.as_deref().and_then(Self::unsafe_reason),
            Self::Forbidden { .. } => None,
        }
    }
}

/// Errors loading [`StatementModifiers`](crate::StatementModifiers)
#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ObjectType;

    fn key() -> ObjectKey {
        ObjectKey::new(ObjectType::Table, "users")
    }

    #[test]
    fn test_unsupported_carries_unsafe_cause() {
        let unsafe_err = StatementError::Unsafe {
            key: key(),
            statement: "ALTER TABLE `users` DROP COLUMN `x`".to_string(),
            reason: "column x dropped".to_string(),
        };
        let err = StatementError::Unsupported {
            key: key(),
            statement: "ALTER TABLE `users` DROP COLUMN `x`".to_string(),
            expected: "a".to_string(),
            actual: "b".to_string(),
            cause: Some(Box::new(unsafe_err)),
        };
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert!(err.is_unsafe());
        assert_eq!(err.unsafe_reason(), Some("column x dropped"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "table users uses features not supported for diffing");
    }

    #[test]
    fn test_forbidden_is_not_unsafe() {
        let err = StatementError::Forbidden {
            key: ObjectKey::new(ObjectType::Database, "app"),
            statement: "DROP DATABASE `app`".to_string(),
            reason: "dropping a database is never permitted".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(!err.is_unsafe());
        assert_eq!(err.statement(), "DROP DATABASE `app`");
    }
}
