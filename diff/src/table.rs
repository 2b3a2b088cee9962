//! Table diffs and the ALTER TABLE renderer

use mortise_types::ddl::Table;
use mortise_types::escape_identifier;

use crate::clause::{ModifyPartitions, TableAlterClause};
use crate::error::StatementError;
use crate::modifiers::{NextAutoInc, PartitioningMode, StatementModifiers};
use crate::tracing::{trace_split, trace_unsupported};
use crate::traits::{Diff, DiffType, ObjectKey, ObjectType};
use crate::utils::{strip_auto_increment, strip_partitioning};

/// Difference between two versions of one table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDiff {
    pub from: Option<Table>,
    pub to: Option<Table>,
    /// Alter clauses in execution order; empty for creates and drops
    pub clauses: Vec<TableAlterClause>,
    /// False when some change cannot be expressed with the clauses
    pub supported: bool,
    /// Partition-shedding ALTER ahead of a drop; both sides are the dropped table
    pre_drop: bool,
}

impl TableDiff {
    /// # Panics
    ///
    /// Panics if both sides are `None`.
    #[must_use]
    pub fn new(from: Option<Table>, to: Option<Table>) -> Self {
        assert!(
            from.is_some() || to.is_some(),
            "TableDiff requires at least one side"
        );
        Self {
            from,
            to,
            clauses: Vec::new(),
            supported: true,
            pre_drop: false,
        }
    }

    #[must_use]
    pub fn create(table: Table) -> Self {
        Self::new(None, Some(table))
    }

    #[must_use]
    pub fn drop(table: Table) -> Self {
        Self::new(Some(table), None)
    }

    pub(crate) fn alter(
        from: Table,
        to: Table,
        clauses: Vec<TableAlterClause>,
        supported: bool,
    ) -> Self {
        Self {
            clauses,
            supported,
            ..Self::new(Some(from), Some(to))
        }
    }

    /// Name of the table, preferring the target side
    pub fn table_name(&self) -> &str {
        self.to
            .as_ref()
            .or(self.from.as_ref())
            .map_or("", |t| t.name.as_str())
    }

    /// Whether this is a partition-shedding ALTER emitted before a drop
    pub const fn is_pre_drop(&self) -> bool {
        self.pre_drop
    }

    // =========================================================================
    // Conflict resolution
    // =========================================================================

    /// Separate foreign key additions into a second diff, to run after every
    /// other statement of the schema diff.
    ///
    /// Either half is `None` when it would have no clauses.
    #[must_use]
    pub fn split_add_foreign_keys(self) -> (Option<Self>, Option<Self>) {
        if self.diff_type() != DiffType::Alter {
            return (Some(self), None);
        }
        let (fks, rest): (Vec<_>, Vec<_>) = self
            .clauses
            .iter()
            .cloned()
            .partition(TableAlterClause::is_add_foreign_key);
        if fks.is_empty() {
            return (Some(self), None);
        }
        trace_split!(self.table_name(), "foreign_keys", 2);
        let deferred = Self {
            clauses: fks,
            ..self.clone()
        };
        if rest.is_empty() {
            return (None, Some(deferred));
        }
        let main = Self {
            clauses: rest,
            ..self
        };
        (Some(main), Some(deferred))
    }

    /// Split a diff that adds more than one FULLTEXT index, since a single
    /// ALTER may only add one. The first diff keeps every other clause.
    #[must_use]
    pub fn split_conflicts(self) -> Vec<Self> {
        let fulltext = self
            .clauses
            .iter()
            .filter(|c| c.is_fulltext_add())
            .count();
        if fulltext < 2 {
            return vec![self];
        }
        trace_split!(self.table_name(), "fulltext", fulltext);

        let mut first = Vec::new();
        let mut extra = Vec::new();
        let mut seen_fulltext = false;
        for clause in &self.clauses {
            if clause.is_fulltext_add() {
                if seen_fulltext {
                    extra.push(clause.clone());
                    continue;
                }
                seen_fulltext = true;
            }
            first.push(clause.clone());
        }

        let mut diffs = vec![Self {
            clauses: first,
            ..self.clone()
        }];
        diffs.extend(extra.into_iter().map(|clause| Self {
            clauses: vec![clause],
            ..self.clone()
        }));
        diffs
    }

    /// ALTERs that drop all but the last partition of a RANGE or LIST
    /// partitioned table, one partition per statement
    #[must_use]
    pub fn pre_drop_alters(table: &Table) -> Vec<Self> {
        let Some(partitioning) = &table.partitioning else {
            return Vec::new();
        };
        if !partitioning.method.is_range_or_list() {
            return Vec::new();
        }
        let count = partitioning.partitions.len();
        partitioning
            .partitions
            .iter()
            .take(count.saturating_sub(1))
            .map(|partition| Self {
                clauses: vec![TableAlterClause::ModifyPartitions(ModifyPartitions {
                    add: Vec::new(),
                    drop: vec![partition.clone()],
                    for_drop_table: true,
                })],
                pre_drop: true,
                ..Self::new(Some(table.clone()), Some(table.clone()))
            })
            .collect()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn create_statement(&self, table: &Table, mods: &StatementModifiers) -> String {
        let mut sql = table.create_sql(&mods.flavor);
        if !matches!(
            mods.next_auto_inc,
            NextAutoInc::Always | NextAutoInc::IfIncreased
        ) {
            sql = strip_auto_increment(&sql);
        }
        if mods.partitioning == PartitioningMode::Remove {
            sql = strip_partitioning(&sql);
        }
        sql
    }

    fn drop_statement(&self, table: &Table, mods: &StatementModifiers) -> Result<String, StatementError> {
        let statement = format!("DROP TABLE {}", escape_identifier(&table.name));
        if mods.allow_unsafe {
            return Ok(statement);
        }
        Err(StatementError::Unsafe {
            key: self.object_key(),
            statement,
            reason: format!("table {} dropped", table.name),
        })
    }

    fn alter_statement(
        &self,
        from: &Table,
        to: &Table,
        mods: &StatementModifiers,
    ) -> Result<String, StatementError> {
        let mismatch = if self.pre_drop {
            None
        } else {
            from.canonical_mismatch(&mods.flavor)
                .or_else(|| to.canonical_mismatch(&mods.flavor))
        };
        let unsupported = !self.pre_drop && (!self.supported || mismatch.is_some());

        let mut items: Vec<String> = Vec::new();
        let mut partitioning = String::new();
        let mut reasons: Vec<String> = Vec::new();
        let mut validate = false;
        for clause in &self.clauses {
            let text = clause.render(mods);
            if text.is_empty() {
                continue;
            }
            if let Some(reason) = clause.unsafe_reason() {
                reasons.push(reason);
            }
            validate |= clause.touches_virtual_column();
            if clause.is_partitioning() {
                partitioning = text;
            } else {
                items.push(text);
            }
        }

        let statement = if items.is_empty() && partitioning.is_empty() {
            String::new()
        } else {
            if validate
                && mods.virtual_col_validation
                && mods.flavor.supports_virtual_column_validation()
            {
                items.push("WITH VALIDATION".to_string());
            }
            let mut hints = Vec::new();
            if let Some(algorithm) = &mods.algorithm_clause {
                hints.push(format!("ALGORITHM={}", algorithm.to_ascii_uppercase()));
            }
            if let Some(lock) = &mods.lock_clause {
                hints.push(format!("LOCK={}", lock.to_ascii_uppercase()));
            }
            hints.append(&mut items);

            let mut sql = format!("ALTER TABLE {}", escape_identifier(&to.name));
            if !hints.is_empty() {
                sql.push(' ');
                sql.push_str(&hints.join(", "));
            }
            if !partitioning.is_empty() {
                sql.push(' ');
                sql.push_str(&partitioning);
            }
            sql
        };

        let unsafe_error = (!reasons.is_empty() && !mods.allow_unsafe).then(|| StatementError::Unsafe {
            key: self.object_key(),
            statement: statement.clone(),
            reason: reasons.join("; "),
        });

        if unsupported {
            trace_unsupported!(to.name);
            let (expected, actual) = mismatch.unwrap_or_else(|| {
                let ddl = |t: &Table| {
                    if t.create_statement.is_empty() {
                        t.generated_create_statement(&mods.flavor)
                    } else {
                        t.create_statement.clone()
                    }
                };
                (ddl(from), ddl(to))
            });
            return Err(StatementError::Unsupported {
                key: self.object_key(),
                statement,
                expected,
                actual,
                cause: unsafe_error.map(Box::new),
            });
        }
        match unsafe_error {
            Some(err) => Err(err),
            None => Ok(statement),
        }
    }
}

impl Diff for TableDiff {
    fn diff_type(&self) -> DiffType {
        match (&self.from, &self.to) {
            (None, _) => DiffType::Create,
            (_, None) => DiffType::Drop,
            _ if self.clauses.is_empty() && self.supported => DiffType::None,
            _ => DiffType::Alter,
        }
    }

    fn object_key(&self) -> ObjectKey {
        ObjectKey::new(ObjectType::Table, self.table_name())
    }

    fn statement(&self, mods: &StatementModifiers) -> Result<String, StatementError> {
        match (&self.from, &self.to) {
            (None, Some(to)) => Ok(self.create_statement(to, mods)),
            (Some(from), None) => self.drop_statement(from, mods),
            (Some(from), Some(to)) => self.alter_statement(from, to, mods),
            (None, None) => unreachable!("TableDiff is constructed with at least one side"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortise_types::ColumnType;
    use mortise_types::Flavor;
    use mortise_types::ddl::{Column, Index, Partition, PartitionMethod, TablePartitioning};

    fn table() -> Table {
        Table::new("t")
            .column(Column::new("id", ColumnType::parse("int")).not_null())
            .primary_key(Index::primary(["id"]))
    }

    #[test]
    fn test_create_strips_auto_increment() {
        let flavor = Flavor::mysql(8, 0, 32);
        let t = table().next_auto_increment(50).with_canonical_ddl(&flavor);
        let diff = TableDiff::create(t);
        let mods = StatementModifiers::new(flavor);
        let sql = diff.statement(&mods).unwrap();
        assert!(!sql.contains("AUTO_INCREMENT=50"), "{sql}");
        let sql = diff
            .statement(&mods.with_next_auto_inc(NextAutoInc::Always))
            .unwrap();
        assert!(sql.contains("AUTO_INCREMENT=50"), "{sql}");
    }

    #[test]
    fn test_drop_is_unsafe() {
        let diff = TableDiff::drop(table());
        let err = diff.statement(&StatementModifiers::default()).unwrap_err();
        assert!(err.is_unsafe());
        assert_eq!(err.statement(), "DROP TABLE `t`");
        assert_eq!(
            diff.statement(&StatementModifiers::default().with_allow_unsafe(true)),
            Ok("DROP TABLE `t`".to_string())
        );
    }

    #[test]
    fn test_pre_drop_alters() {
        let partitioning = TablePartitioning::new(PartitionMethod::Range, "`id`")
            .partition(Partition::new("p0", "(10)"))
            .partition(Partition::new("p1", "(20)"))
            .partition(Partition::new("p2", "MAXVALUE"));
        let t = table().partitioning(partitioning);
        let alters = TableDiff::pre_drop_alters(&t);
        assert_eq!(alters.len(), 2);
        assert!(alters.iter().all(TableDiff::is_pre_drop));

        let mods = StatementModifiers::new(Flavor::mysql(8, 0, 32)).with_allow_unsafe(true);
        assert_eq!(
            alters[0].statement(&mods),
            Ok("ALTER TABLE `t` DROP PARTITION p0".to_string())
        );
        assert_eq!(
            alters[1].statement(&mods),
            Ok("ALTER TABLE `t` DROP PARTITION p1".to_string())
        );
        assert_eq!(
            alters[0].statement(&mods.with_skip_pre_drop_alters(true)),
            Ok(String::new())
        );

        let hashed = table().partitioning(
            TablePartitioning::new(PartitionMethod::Hash, "`id`").partition_count(4),
        );
        assert!(TableDiff::pre_drop_alters(&hashed).is_empty());
    }

    #[test]
    #[should_panic(expected = "at least one side")]
    fn test_new_requires_a_side() {
        let _ = TableDiff::new(None, None);
    }
}
