//! Check constraint DDL types

use crate::flavor::Flavor;
use crate::ident::escape_identifier;

/// A CHECK constraint
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Check {
    pub name: String,
    /// Boolean expression, as reported by the server
    pub clause: String,
    pub enforced: bool,
}

impl Check {
    #[must_use]
    pub fn new(name: impl Into<String>, clause: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clause: clause.into(),
            enforced: true,
        }
    }

    #[must_use]
    pub fn not_enforced(mut self) -> Self {
        self.enforced = false;
        self
    }

    #[must_use]
    pub fn definition(&self, flavor: &Flavor) -> String {
        let mut def = format!(
            "CONSTRAINT {} CHECK ({})",
            escape_identifier(&self.name),
            self.clause
        );
        if !self.enforced && !flavor.is_mariadb() {
            def.push_str(" /*!80016 NOT ENFORCED */");
        }
        def
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition() {
        let flavor = Flavor::mysql(8, 0, 32);
        let chk = Check::new("chk_qty", "(`qty` > 0)");
        assert_eq!(chk.definition(&flavor), "CONSTRAINT `chk_qty` CHECK ((`qty` > 0))");
        assert_eq!(
            chk.not_enforced().definition(&flavor),
            "CONSTRAINT `chk_qty` CHECK ((`qty` > 0)) /*!80016 NOT ENFORCED */"
        );
    }
}
