//! Column DDL types

use crate::coltype::ColumnType;
use crate::flavor::Flavor;
use crate::ident::{escape_identifier, quote_string};

// =============================================================================
// Generated Columns
// =============================================================================

/// Generated column storage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GeneratedType {
    /// Computed on read, nothing stored
    #[default]
    Virtual,
    /// Computed on write and persisted
    Stored,
}

impl GeneratedType {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Virtual => "VIRTUAL",
            Self::Stored => "STORED",
        }
    }
}

/// Generated column configuration
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Generated {
    /// Generation expression, without the surrounding parentheses
    pub expression: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub gen_type: GeneratedType,
}

// =============================================================================
// Defaults
// =============================================================================

/// A column default, tagged by how it must be rendered
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColumnDefault {
    /// `DEFAULT NULL`
    Null,
    /// A string literal, rendered quoted
    Literal(String),
    /// An expression or keyword such as `CURRENT_TIMESTAMP`, rendered as-is
    Expression(String),
}

impl ColumnDefault {
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Literal(value) => quote_string(value),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

// =============================================================================
// Column
// =============================================================================

/// A table column
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Column {
    pub name: String,

    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub column_type: ColumnType,

    pub nullable: bool,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub default: Option<ColumnDefault>,

    /// `ON UPDATE` expression
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub on_update: Option<String>,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub generated: Option<Generated>,

    /// Character set, when shown explicitly in the column definition
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub charset: Option<String>,

    /// Collation, when shown explicitly in the column definition
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub collation: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub auto_increment: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub invisible: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub comment: String,

    /// Column compression (MariaDB `COMPRESSED`, Percona `COLUMN_FORMAT COMPRESSED`)
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub compression: Option<String>,

    /// Spatial reference identifier
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub srid: Option<u32>,
}

impl Column {
    /// Create a nullable column with no default
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default: None,
            on_update: None,
            generated: None,
            charset: None,
            collation: None,
            auto_increment: false,
            invisible: false,
            comment: String::new(),
            compression: None,
            srid: None,
        }
    }

    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    #[must_use]
    pub fn default_null(mut self) -> Self {
        self.default = Some(ColumnDefault::Null);
        self
    }

    #[must_use]
    pub fn default_literal(mut self, value: impl Into<String>) -> Self {
        self.default = Some(ColumnDefault::Literal(value.into()));
        self
    }

    #[must_use]
    pub fn default_expression(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(ColumnDefault::Expression(expr.into()));
        self
    }

    #[must_use]
    pub fn on_update(mut self, expr: impl Into<String>) -> Self {
        self.on_update = Some(expr.into());
        self
    }

    #[must_use]
    pub fn generated_virtual(mut self, expression: impl Into<String>) -> Self {
        self.generated = Some(Generated {
            expression: expression.into(),
            gen_type: GeneratedType::Virtual,
        });
        self
    }

    #[must_use]
    pub fn generated_stored(mut self, expression: impl Into<String>) -> Self {
        self.generated = Some(Generated {
            expression: expression.into(),
            gen_type: GeneratedType::Stored,
        });
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
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
    pub fn compression(mut self, compression: impl Into<String>) -> Self {
        self.compression = Some(compression.into());
        self
    }

    #[must_use]
    pub fn srid(mut self, srid: u32) -> Self {
        self.srid = Some(srid);
        self
    }

    /// Whether this is a virtual generated column, storing no data
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        matches!(
            self.generated,
            Some(Generated {
                gen_type: GeneratedType::Virtual,
                ..
            })
        )
    }

    /// Character set in effect, falling back to the table default
    #[must_use]
    pub fn effective_charset<'a>(&'a self, table_charset: &'a str) -> &'a str {
        self.charset.as_deref().unwrap_or(table_charset)
    }

    /// Collation in effect, falling back to the table default
    #[must_use]
    pub fn effective_collation<'a>(&'a self, table_collation: &'a str) -> &'a str {
        self.collation.as_deref().unwrap_or(table_collation)
    }

    /// Render the column definition as it appears in `SHOW CREATE TABLE`
    #[must_use]
    pub fn definition(&self, flavor: &Flavor) -> String {
        let rendered = if flavor.omits_int_display_width() {
            self.column_type.strip_display_width().0.render()
        } else {
            self.column_type.render()
        };
        let mut def = format!("{} {}", escape_identifier(&self.name), rendered);

        if let Some(charset) = &self.charset {
            def.push_str(" CHARACTER SET ");
            def.push_str(charset);
        }
        if let Some(collation) = &self.collation {
            def.push_str(" COLLATE ");
            def.push_str(collation);
        }
        if self.compression.is_some() && flavor.is_mariadb() {
            def.push_str(" /*!100301 COMPRESSED*/");
        }
        if let Some(generated) = &self.generated {
            def.push_str(&format!(
                " GENERATED ALWAYS AS ({}) {}",
                generated.expression,
                generated.gen_type.as_sql()
            ));
        }
        if !self.nullable {
            def.push_str(" NOT NULL");
        } else if self.column_type.base == "timestamp" {
            def.push_str(" NULL");
        }
        if let Some(srid) = self.srid {
            if flavor.is_mariadb() {
                def.push_str(&format!(" REF_SYSTEM_ID={srid}"));
            } else {
                def.push_str(&format!(" /*!80003 SRID {srid} */"));
            }
        }
        if self.invisible {
            if flavor.is_mariadb() {
                def.push_str(" INVISIBLE");
            } else {
                def.push_str(" /*!80023 INVISIBLE */");
            }
        }
        if let Some(default) = &self.default {
            def.push_str(" DEFAULT ");
            def.push_str(&default.to_sql());
        }
        if let Some(on_update) = &self.on_update {
            def.push_str(" ON UPDATE ");
            def.push_str(on_update);
        }
        if self.auto_increment {
            def.push_str(" AUTO_INCREMENT");
        }
        if !self.comment.is_empty() {
            def.push_str(" COMMENT ");
            def.push_str(&quote_string(&self.comment));
        }
        if self.compression.is_some() && flavor.is_percona() {
            def.push_str(" /*!50633 COLUMN_FORMAT COMPRESSED */");
        }
        def
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mysql() -> Flavor {
        Flavor::mysql(8, 0, 32)
    }

    #[test]
    fn test_display_width_follows_flavor() {
        let col = Column::new("n", ColumnType::parse("int(11) unsigned")).not_null();
        assert_eq!(col.definition(&mysql()), "`n` int unsigned NOT NULL");
        assert_eq!(
            col.definition(&Flavor::mysql(8, 0, 18)),
            "`n` int(11) unsigned NOT NULL"
        );
        let flag = Column::new("f", ColumnType::parse("tinyint(1)")).not_null();
        assert_eq!(flag.definition(&mysql()), "`f` tinyint(1) NOT NULL");
    }

    #[test]
    fn test_basic_definition() {
        let col = Column::new("id", ColumnType::parse("bigint unsigned"))
            .not_null()
            .auto_increment();
        assert_eq!(
            col.definition(&mysql()),
            "`id` bigint unsigned NOT NULL AUTO_INCREMENT"
        );
    }

    #[test]
    fn test_defaults_and_comments() {
        let col = Column::new("name", ColumnType::parse("varchar(40)"))
            .charset("latin1")
            .collation("latin1_swedish_ci")
            .default_literal("it's")
            .comment("display name");
        assert_eq!(
            col.definition(&mysql()),
            "`name` varchar(40) CHARACTER SET latin1 COLLATE latin1_swedish_ci DEFAULT 'it''s' COMMENT 'display name'"
        );

        let ts = Column::new("updated_at", ColumnType::parse("timestamp"))
            .default_null()
            .on_update("CURRENT_TIMESTAMP");
        assert_eq!(
            ts.definition(&mysql()),
            "`updated_at` timestamp NULL DEFAULT NULL ON UPDATE CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn test_generated_definition() {
        let col = Column::new("total", ColumnType::parse("int"))
            .generated_virtual("(`a` + `b`)");
        assert!(col.is_virtual());
        assert_eq!(
            col.definition(&mysql()),
            "`total` int GENERATED ALWAYS AS ((`a` + `b`)) VIRTUAL"
        );
        let stored = Column::new("total", ColumnType::parse("int")).generated_stored("`a`");
        assert!(!stored.is_virtual());
    }

    #[test]
    fn test_vendor_specific_attributes() {
        let col = Column::new("pt", ColumnType::parse("point"))
            .not_null()
            .srid(4326)
            .invisible();
        assert_eq!(
            col.definition(&mysql()),
            "`pt` point NOT NULL /*!80003 SRID 4326 */ /*!80023 INVISIBLE */"
        );
        assert_eq!(
            col.definition(&Flavor::mariadb(10, 11, 0)),
            "`pt` point NOT NULL REF_SYSTEM_ID=4326 INVISIBLE"
        );

        let compressed = Column::new("body", ColumnType::parse("text")).compression("zlib");
        assert_eq!(
            compressed.definition(&Flavor::mariadb(10, 11, 0)),
            "`body` text /*!100301 COMPRESSED*/"
        );
        assert_eq!(
            compressed.definition(&Flavor::percona(8, 0, 35)),
            "`body` text /*!50633 COLUMN_FORMAT COMPRESSED */"
        );
        assert_eq!(compressed.definition(&mysql()), "`body` text");
    }
}
