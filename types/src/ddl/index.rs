//! Index DDL types

use crate::flavor::Flavor;
use crate::ident::{escape_identifier, quote_string};

/// Index storage type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum IndexType {
    #[default]
    Btree,
    Fulltext,
    Spatial,
    Vector,
    /// `USING HASH`, as used by the MEMORY engine
    Hash,
}

impl IndexType {
    /// Keyword prefix for `KEY` in an index definition
    const fn key_prefix(self) -> &'static str {
        match self {
            Self::Fulltext => "FULLTEXT ",
            Self::Spatial => "SPATIAL ",
            Self::Vector => "VECTOR ",
            Self::Btree | Self::Hash => "",
        }
    }
}

/// One part of an index: a column (optionally prefixed) or an expression
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct IndexPart {
    /// Column name or expression
    pub value: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_expression: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub prefix_length: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub descending: bool,
}

impl IndexPart {
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            value: name.into(),
            is_expression: false,
            prefix_length: None,
            descending: false,
        }
    }

    #[must_use]
    pub fn expression(expr: impl Into<String>) -> Self {
        Self {
            value: expr.into(),
            is_expression: true,
            prefix_length: None,
            descending: false,
        }
    }

    #[must_use]
    pub fn prefix(mut self, length: u32) -> Self {
        self.prefix_length = Some(length);
        self
    }

    #[must_use]
    pub fn desc(mut self) -> Self {
        self.descending = true;
        self
    }

    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut sql = if self.is_expression {
            format!("({})", self.value)
        } else {
            escape_identifier(&self.value)
        };
        if let Some(length) = self.prefix_length {
            sql.push_str(&format!("({length})"));
        }
        if self.descending {
            sql.push_str(" DESC");
        }
        sql
    }
}

/// A primary key or secondary index
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Index {
    pub name: String,
    pub parts: Vec<IndexPart>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unique: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub primary_key: bool,
    /// Invisible (MySQL) or ignored (MariaDB)
    #[cfg_attr(feature = "serde", serde(default))]
    pub invisible: bool,
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub index_type: IndexType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub comment: String,
    /// Full-text parser plugin
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub parser: Option<String>,
}

impl Index {
    /// Create a non-unique index over the named columns
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_parts(name, columns.into_iter().map(IndexPart::column).collect())
    }

    /// Create a non-unique index from explicit parts
    #[must_use]
    pub fn with_parts(name: impl Into<String>, parts: Vec<IndexPart>) -> Self {
        Self {
            name: name.into(),
            parts,
            unique: false,
            primary_key: false,
            invisible: false,
            index_type: IndexType::Btree,
            comment: String::new(),
            parser: None,
        }
    }

    /// Create a primary key over the named columns
    #[must_use]
    pub fn primary<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::new("PRIMARY", columns);
        index.primary_key = true;
        index.unique = true;
        index
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub fn fulltext(mut self) -> Self {
        self.index_type = IndexType::Fulltext;
        self
    }

    #[must_use]
    pub fn spatial(mut self) -> Self {
        self.index_type = IndexType::Spatial;
        self
    }

    #[must_use]
    pub fn vector(mut self) -> Self {
        self.index_type = IndexType::Vector;
        self
    }

    #[must_use]
    pub fn using_hash(mut self) -> Self {
        self.index_type = IndexType::Hash;
        self
    }

    #[must_use]
    pub fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn parser(mut self, parser: impl Into<String>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    /// Whether this index covers the named column (as a plain column part)
    #[must_use]
    pub fn covers_column(&self, column: &str) -> bool {
        self.parts
            .iter()
            .any(|part| !part.is_expression && part.value.eq_ignore_ascii_case(column))
    }

    /// Functionally identical: ignores name, comment and visibility
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        self.parts == other.parts
            && self.unique == other.unique
            && self.primary_key == other.primary_key
            && self.index_type == other.index_type
            && self.parser == other.parser
    }

    /// Identical in every way except visibility
    #[must_use]
    pub fn equals_ignoring_visibility(&self, other: &Self) -> bool {
        self.name == other.name && self.comment == other.comment && self.equivalent(other)
    }

    /// Render the index definition as it appears in `SHOW CREATE TABLE`
    #[must_use]
    pub fn definition(&self, flavor: &Flavor) -> String {
        let parts = self
            .parts
            .iter()
            .map(IndexPart::to_sql)
            .collect::<Vec<_>>()
            .join(",");

        let mut def = if self.primary_key {
            format!("PRIMARY KEY ({parts})")
        } else {
            let unique = if self.unique { "UNIQUE " } else { "" };
            format!(
                "{unique}{}KEY {} ({parts})",
                self.index_type.key_prefix(),
                escape_identifier(&self.name)
            )
        };

        if self.index_type == IndexType::Hash {
            def.push_str(" USING HASH");
        }
        if let Some(parser) = &self.parser {
            def.push_str(&format!(
                " /*!50100 WITH PARSER {} */",
                escape_identifier(parser)
            ));
        }
        if !self.comment.is_empty() {
            def.push_str(" COMMENT ");
            def.push_str(&quote_string(&self.comment));
        }
        if self.invisible {
            if flavor.is_mariadb() {
                def.push_str(" IGNORED");
            } else {
                def.push_str(" /*!80000 INVISIBLE */");
            }
        }
        def
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_definition() {
        let pk = Index::primary(["a", "b"]);
        assert_eq!(pk.definition(&Flavor::mysql(8, 0, 0)), "PRIMARY KEY (`a`,`b`)");
    }

    #[test]
    fn test_secondary_definitions() {
        let flavor = Flavor::mysql(8, 0, 32);
        let idx = Index::with_parts(
            "idx_name",
            vec![
                IndexPart::column("last").prefix(10),
                IndexPart::column("first").desc(),
                IndexPart::expression("lower(`email`)"),
            ],
        )
        .unique()
        .comment("lookup");
        assert_eq!(
            idx.definition(&flavor),
            "UNIQUE KEY `idx_name` (`last`(10),`first` DESC,(lower(`email`))) COMMENT 'lookup'"
        );

        let ft = Index::new("ft_body", ["body"]).fulltext().parser("ngram");
        assert_eq!(
            ft.definition(&flavor),
            "FULLTEXT KEY `ft_body` (`body`) /*!50100 WITH PARSER `ngram` */"
        );

        let hidden = Index::new("idx_x", ["x"]).invisible();
        assert_eq!(
            hidden.definition(&flavor),
            "KEY `idx_x` (`x`) /*!80000 INVISIBLE */"
        );
        assert_eq!(
            hidden.definition(&Flavor::mariadb(10, 6, 0)),
            "KEY `idx_x` (`x`) IGNORED"
        );
    }

    #[test]
    fn test_equivalence() {
        let a = Index::new("a", ["x", "y"]);
        let b = Index::new("b", ["x", "y"]).comment("c").invisible();
        assert!(a.equivalent(&b));
        assert!(!a.equals_ignoring_visibility(&b));
        assert!(a.equals_ignoring_visibility(&Index::new("a", ["x", "y"]).invisible()));
        assert!(!a.equivalent(&Index::new("a", ["y", "x"])));
        assert!(!a.equivalent(&Index::new("a", ["x", "y"]).unique()));
        assert!(a.covers_column("X"));
    }
}
