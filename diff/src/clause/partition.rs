//! Partitioning clauses
//!
//! These are appended to an `ALTER TABLE` after a space rather than a comma.

use mortise_types::ddl::{Partition, TablePartitioning, partition_name};

use crate::modifiers::{PartitioningMode, StatementModifiers};

/// Partition an unpartitioned table, or change the method or expression of
/// an already partitioned one
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionBy {
    pub partitioning: TablePartitioning,
    /// The table was already partitioned by another method
    pub repartition: bool,
}

impl PartitionBy {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if mods.partitioning == PartitioningMode::Remove {
            return String::new();
        }
        self.partitioning.clause(&mods.flavor)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovePartitioning;

impl RemovePartitioning {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if mods.partitioning == PartitioningMode::Keep {
            return String::new();
        }
        "REMOVE PARTITIONING".to_string()
    }
}

/// Change to the partition list of a RANGE or LIST partitioned table.
///
/// Partition lists are normally managed outside of schema files, so this
/// only renders when shedding partitions ahead of a table drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifyPartitions {
    pub add: Vec<Partition>,
    pub drop: Vec<Partition>,
    pub for_drop_table: bool,
}

impl ModifyPartitions {
    pub(crate) fn render(&self, mods: &StatementModifiers) -> String {
        if !self.for_drop_table || mods.skip_pre_drop_alters || self.drop.is_empty() {
            return String::new();
        }
        let names = self
            .drop
            .iter()
            .map(|p| partition_name(&p.name, &mods.flavor))
            .collect::<Vec<_>>()
            .join(", ");
        format!("DROP PARTITION {names}")
    }

    pub(crate) fn unsafe_reason(&self) -> Option<String> {
        (self.for_drop_table && !self.drop.is_empty()).then(|| {
            let names = self
                .drop
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("partitions {names} dropped")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortise_types::Flavor;
    use mortise_types::ddl::PartitionMethod;

    #[test]
    fn test_partitioning_modes() {
        let by = PartitionBy {
            partitioning: TablePartitioning::new(PartitionMethod::Hash, "`id`").partition_count(4),
            repartition: false,
        };
        let mods = StatementModifiers::new(Flavor::mysql(8, 0, 32));
        assert_eq!(by.render(&mods), "PARTITION BY HASH (`id`) PARTITIONS 4");
        assert_eq!(
            by.render(&mods.clone().with_partitioning(PartitioningMode::Remove)),
            ""
        );
        assert_eq!(RemovePartitioning.render(&mods), "REMOVE PARTITIONING");
        assert_eq!(
            RemovePartitioning.render(&mods.with_partitioning(PartitioningMode::Keep)),
            ""
        );
    }

    #[test]
    fn test_modify_partitions_only_renders_before_drop() {
        let mut modify = ModifyPartitions {
            add: Vec::new(),
            drop: vec![Partition::new("p0", "(100)")],
            for_drop_table: false,
        };
        let mods = StatementModifiers::new(Flavor::mysql(8, 0, 32));
        assert_eq!(modify.render(&mods), "");
        assert!(modify.unsafe_reason().is_none());

        modify.for_drop_table = true;
        assert_eq!(modify.render(&mods), "DROP PARTITION p0");
        assert!(modify.unsafe_reason().is_some());
        assert_eq!(modify.render(&mods.with_skip_pre_drop_alters(true)), "");
    }
}
