//! Table partitioning DDL types

use std::fmt;

use crate::flavor::Flavor;
use crate::ident::{escape_identifier, quote_if_needed, quote_string};

/// Partitioning method
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PartitionMethod {
    Range,
    RangeColumns,
    List,
    ListColumns,
    Hash,
    LinearHash,
    Key,
    LinearKey,
}

impl PartitionMethod {
    /// Keyword text as shown in `SHOW CREATE TABLE`
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Range => "RANGE",
            Self::RangeColumns => "RANGE  COLUMNS",
            Self::List => "LIST",
            Self::ListColumns => "LIST  COLUMNS",
            Self::Hash => "HASH",
            Self::LinearHash => "LINEAR HASH",
            Self::Key => "KEY",
            Self::LinearKey => "LINEAR KEY",
        }
    }

    /// RANGE and LIST methods have explicitly bounded partitions that can be
    /// added and dropped individually
    pub const fn is_range_or_list(self) -> bool {
        matches!(
            self,
            Self::Range | Self::RangeColumns | Self::List | Self::ListColumns
        )
    }

    const fn is_columns(self) -> bool {
        matches!(self, Self::RangeColumns | Self::ListColumns)
    }

    const fn values_keyword(self) -> Option<&'static str> {
        match self {
            Self::Range | Self::RangeColumns => Some("VALUES LESS THAN"),
            Self::List | Self::ListColumns => Some("VALUES IN"),
            _ => None,
        }
    }

    fn with_expression(self, expression: &str) -> String {
        if self.is_columns() {
            format!("{}({expression})", self.as_sql())
        } else {
            format!("{} ({expression})", self.as_sql())
        }
    }
}

impl fmt::Display for PartitionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A single partition
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Partition {
    pub name: String,
    /// Boundary values, e.g. `(100)`, `MAXVALUE` or `(1,2,3)`. Empty for
    /// HASH and KEY partitions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub values: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub comment: String,
    pub engine: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub data_dir: Option<String>,
}

impl Partition {
    #[must_use]
    pub fn new(name: impl Into<String>, values: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
            comment: String::new(),
            engine: "InnoDB".to_string(),
            data_dir: None,
        }
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<String>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    fn definition(&self, method: PartitionMethod, flavor: &Flavor) -> String {
        let mut def = format!("PARTITION {}", partition_name(&self.name, flavor));
        if let Some(keyword) = method.values_keyword() {
            def.push_str(&format!(" {keyword} {}", self.values));
        }
        if let Some(dir) = &self.data_dir {
            def.push_str(&format!(" DATA DIRECTORY = {}", quote_string(dir)));
        }
        if !self.comment.is_empty() {
            def.push_str(&format!(" COMMENT = {}", quote_string(&self.comment)));
        }
        def.push_str(&format!(" ENGINE = {}", self.engine));
        def
    }
}

/// Quote a partition name the way the flavor reports it
#[must_use]
pub fn partition_name(name: &str, flavor: &Flavor) -> String {
    if flavor.is_mariadb() {
        escape_identifier(name)
    } else {
        quote_if_needed(name, flavor)
    }
}

/// Partitioning of a table. A table without partitioning has none of this.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TablePartitioning {
    pub method: PartitionMethod,
    pub expression: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub sub_method: Option<PartitionMethod>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sub_expression: String,
    pub partitions: Vec<Partition>,
}

impl TablePartitioning {
    #[must_use]
    pub fn new(method: PartitionMethod, expression: impl Into<String>) -> Self {
        Self {
            method,
            expression: expression.into(),
            sub_method: None,
            sub_expression: String::new(),
            partitions: Vec::new(),
        }
    }

    #[must_use]
    pub fn partition(mut self, partition: Partition) -> Self {
        self.partitions.push(partition);
        self
    }

    /// Add `count` default-named partitions (`p0`..`pN`), as HASH and KEY
    /// partitioning does with `PARTITIONS n`
    #[must_use]
    pub fn partition_count(mut self, count: usize) -> Self {
        self.partitions = (0..count)
            .map(|i| Partition::new(format!("p{i}"), ""))
            .collect();
        self
    }

    #[must_use]
    pub fn subpartition_by(mut self, method: PartitionMethod, expression: impl Into<String>) -> Self {
        self.sub_method = Some(method);
        self.sub_expression = expression.into();
        self
    }

    #[must_use]
    pub fn partition_names(&self) -> Vec<&str> {
        self.partitions.iter().map(|p| p.name.as_str()).collect()
    }

    /// Same method, expressions and subpartitioning; partition lists may differ
    #[must_use]
    pub fn same_method(&self, other: &Self) -> bool {
        self.method == other.method
            && self.expression == other.expression
            && self.sub_method == other.sub_method
            && self.sub_expression == other.sub_expression
    }

    /// Partitions that only carry default names and attributes, shown as a
    /// bare `PARTITIONS n` count
    fn uses_default_names(&self) -> bool {
        !self.method.is_range_or_list()
            && self.partitions.iter().enumerate().all(|(i, p)| {
                p.name == format!("p{i}")
                    && p.values.is_empty()
                    && p.comment.is_empty()
                    && p.data_dir.is_none()
            })
    }

    fn body(&self, flavor: &Flavor, multiline: bool) -> String {
        let sep = if multiline { "\n" } else { " " };
        let mut body = format!("PARTITION BY {}", self.method.with_expression(&self.expression));
        if let Some(sub) = self.sub_method {
            body.push_str(sep);
            body.push_str(&format!(
                "SUBPARTITION BY {}",
                sub.with_expression(&self.sub_expression)
            ));
        }
        if self.uses_default_names() {
            body.push_str(&format!("{sep}PARTITIONS {}", self.partitions.len()));
        } else {
            let joiner = if multiline { ",\n " } else { ", " };
            let parts = self
                .partitions
                .iter()
                .map(|p| p.definition(self.method, flavor))
                .collect::<Vec<_>>()
                .join(joiner);
            body.push_str(&format!("{sep}({parts})"));
        }
        body
    }

    /// Partitioning clause as shown at the end of `SHOW CREATE TABLE`
    #[must_use]
    pub fn definition(&self, flavor: &Flavor) -> String {
        let body = self.body(flavor, true);
        if flavor.uses_partition_version_comments() {
            let version = if self.method.is_columns() { 50500 } else { 50100 };
            format!("/*!{version} {body} */")
        } else {
            body
        }
    }

    /// Partitioning clause for use in `ALTER TABLE`
    #[must_use]
    pub fn clause(&self, flavor: &Flavor) -> String {
        self.body(flavor, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> TablePartitioning {
        TablePartitioning::new(PartitionMethod::Range, "`id`")
            .partition(Partition::new("p0", "(100)"))
            .partition(Partition::new("p1", "MAXVALUE"))
    }

    #[test]
    fn test_mysql_range_definition() {
        assert_eq!(
            range().definition(&Flavor::mysql(8, 0, 32)),
            "/*!50100 PARTITION BY RANGE (`id`)\n(PARTITION p0 VALUES LESS THAN (100) ENGINE = InnoDB,\n PARTITION p1 VALUES LESS THAN MAXVALUE ENGINE = InnoDB) */"
        );
        assert_eq!(
            range().clause(&Flavor::mysql(8, 0, 32)),
            "PARTITION BY RANGE (`id`) (PARTITION p0 VALUES LESS THAN (100) ENGINE = InnoDB, PARTITION p1 VALUES LESS THAN MAXVALUE ENGINE = InnoDB)"
        );
    }

    #[test]
    fn test_mariadb_definition() {
        assert_eq!(
            range().definition(&Flavor::mariadb(10, 11, 0)),
            "PARTITION BY RANGE (`id`)\n(PARTITION `p0` VALUES LESS THAN (100) ENGINE = InnoDB,\n PARTITION `p1` VALUES LESS THAN MAXVALUE ENGINE = InnoDB)"
        );
    }

    #[test]
    fn test_hash_partition_count() {
        let hash = TablePartitioning::new(PartitionMethod::Hash, "`id`").partition_count(4);
        assert_eq!(
            hash.definition(&Flavor::mysql(8, 0, 0)),
            "/*!50100 PARTITION BY HASH (`id`)\nPARTITIONS 4 */"
        );
        assert_eq!(hash.partition_names(), vec!["p0", "p1", "p2", "p3"]);
    }

    #[test]
    fn test_columns_method() {
        let list = TablePartitioning::new(PartitionMethod::ListColumns, "`region`")
            .partition(Partition::new("east", "('NY','NJ')").comment("east coast"));
        assert_eq!(
            list.definition(&Flavor::mysql(8, 0, 0)),
            "/*!50500 PARTITION BY LIST  COLUMNS(`region`)\n(PARTITION east VALUES IN ('NY','NJ') COMMENT = 'east coast' ENGINE = InnoDB) */"
        );
    }

    #[test]
    fn test_reserved_partition_names_are_quoted() {
        let list = TablePartitioning::new(PartitionMethod::List, "`x`")
            .partition(Partition::new("rank", "(1)"));
        assert!(list.clause(&Flavor::mysql(8, 0, 0)).contains("PARTITION `rank` VALUES IN (1)"));
    }
}
