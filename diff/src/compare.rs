//! Table differ
//!
//! Compares two table snapshots and produces the ordered alter clauses that
//! turn one into the other. Clause order is significant: constraint and
//! index drops come first so later column changes are not blocked by them,
//! and adds follow in the target's definition order.

use std::collections::{HashMap, HashSet};

use mortise_types::ddl::{Check, Column, ForeignKey, Index, Table, TablePartitioning};

use crate::clause::{
    AddCheck, AddColumn, AddForeignKey, AddIndex, AlterCheck, AlterIndex, ChangeAutoIncrement,
    ChangeCharSet, ChangeComment, ChangeCreateOptions, ChangeStorageEngine, ChangeTablespace,
    ColumnPosition, DropCheck, DropColumn, DropForeignKey, DropIndex, ModifyColumn,
    ModifyPartitions, PartitionBy, RemovePartitioning, RenameColumn, RenameIndex,
    TableAlterClause,
};
use crate::table::TableDiff;
use crate::tracing::trace_table_diff;

/// Options for computing diffs, as opposed to rendering them
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Treat a dropped and an added column at the same position, with
    /// otherwise identical definitions, as a rename
    pub detect_column_renames: bool,
}

impl DiffOptions {
    #[must_use]
    pub fn with_column_renames(mut self, detect: bool) -> Self {
        self.detect_column_renames = detect;
        self
    }
}

/// Diff two optional tables.
///
/// Returns `None` when both sides are present and nothing differs.
///
/// # Panics
///
/// Panics if both sides are `None`.
#[must_use]
pub fn diff_tables(from: Option<&Table>, to: Option<&Table>, opts: &DiffOptions) -> Option<TableDiff> {
    match (from, to) {
        (None, None) => panic!("diff_tables called with neither side present"),
        (None, Some(to)) => Some(TableDiff::create(to.clone())),
        (Some(from), None) => Some(TableDiff::drop(from.clone())),
        (Some(from), Some(to)) => alter_table(from, to, opts),
    }
}

fn alter_table(from: &Table, to: &Table, opts: &DiffOptions) -> Option<TableDiff> {
    if !from.create_statement.is_empty() && from.create_statement == to.create_statement {
        return None;
    }

    let mut differ = TableDiffer::new(from, to);
    differ.compare_foreign_key_drops();
    differ.compare_check_drops();
    differ.compare_index_drops();
    differ.compare_columns(opts);
    differ.compare_index_adds();
    differ.compare_check_adds();
    differ.compare_foreign_key_adds();
    differ.compare_attributes();
    differ.compare_partitioning();

    let TableDiffer {
        clauses, supported, ..
    } = differ;
    trace_table_diff!(to.name, clauses.len());

    if clauses.is_empty() {
        // Different introspected text but nothing the model can see
        let statements_differ = !from.create_statement.is_empty()
            && !to.create_statement.is_empty()
            && from.create_statement != to.create_statement;
        if supported && !statements_differ {
            return None;
        }
        return Some(TableDiff::alter(from.clone(), to.clone(), clauses, false));
    }
    Some(TableDiff::alter(from.clone(), to.clone(), clauses, supported))
}

// =============================================================================
// Differ state
// =============================================================================

/// Index pairing shared between the drop and add passes
#[derive(Default)]
struct IndexPlan {
    /// From-side indexes dropped, by name
    drops: HashMap<String, DropReason>,
    /// To-side adds in target order
    adds: Vec<TableAlterClause>,
}

/// Why an index is dropped
#[derive(Clone, Copy)]
struct DropReason {
    reorder_only: bool,
    comment_only: bool,
}

impl DropReason {
    const CHANGED: Self = Self {
        reorder_only: false,
        comment_only: false,
    };
    const REORDER: Self = Self {
        reorder_only: true,
        comment_only: false,
    };
    const COMMENT: Self = Self {
        reorder_only: false,
        comment_only: true,
    };
}

/// Identical apart from the comment
fn differs_only_in_comment(old: &Index, new: &Index) -> bool {
    old.comment != new.comment
        && old.name == new.name
        && old.invisible == new.invisible
        && old.equivalent(new)
}

/// Check pairing shared between the drop and add passes
#[derive(Default)]
struct CheckPlan {
    drops: Vec<TableAlterClause>,
    adds: Vec<TableAlterClause>,
}

/// Tracks whether retained items can stay where they are while walking the
/// target order. Adds land at the end, so once anything is appended every
/// later retained item must be re-added too.
#[derive(Default)]
struct OrderTracker {
    last_kept: Option<usize>,
    reordering: bool,
}

impl OrderTracker {
    /// Returns false when the item at `from_pos` must be re-added
    fn keep(&mut self, from_pos: usize) -> bool {
        if self.reordering || self.last_kept.is_some_and(|last| from_pos < last) {
            self.reordering = true;
            return false;
        }
        self.last_kept = Some(from_pos);
        true
    }

    fn appended(&mut self) {
        self.reordering = true;
    }
}

struct TableDiffer<'a> {
    from: &'a Table,
    to: &'a Table,
    clauses: Vec<TableAlterClause>,
    supported: bool,
    index_plan: IndexPlan,
    check_plan: CheckPlan,
}

impl<'a> TableDiffer<'a> {
    fn new(from: &'a Table, to: &'a Table) -> Self {
        let mut differ = Self {
            from,
            to,
            clauses: Vec::new(),
            supported: true,
            index_plan: IndexPlan::default(),
            check_plan: CheckPlan::default(),
        };
        differ.plan_indexes();
        differ.plan_checks();
        differ
    }

    // =========================================================================
    // Foreign keys
    // =========================================================================

    /// Pairs of (from, to) foreign keys whose only difference is the name
    fn foreign_key_renames(&self) -> Vec<(&'a ForeignKey, &'a ForeignKey)> {
        let from_names: HashSet<&str> = self.from.foreign_keys.iter().map(|fk| fk.name.as_str()).collect();
        let to_names: HashSet<&str> = self.to.foreign_keys.iter().map(|fk| fk.name.as_str()).collect();
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut pairs = Vec::new();
        for old in self.from.foreign_keys.iter().filter(|fk| !to_names.contains(fk.name.as_str())) {
            let found = self.to.foreign_keys.iter().find(|new| {
                !from_names.contains(new.name.as_str())
                    && !claimed.contains(new.name.as_str())
                    && old.equivalent(new)
            });
            if let Some(new) = found {
                claimed.insert(new.name.as_str());
                pairs.push((old, new));
            }
        }
        pairs
    }

    fn compare_foreign_key_drops(&mut self) {
        let renames = self.foreign_key_renames();
        for old in &self.from.foreign_keys {
            let rename_only = renames.iter().any(|(o, _)| o.name == old.name);
            let keep = self
                .to
                .foreign_keys
                .iter()
                .any(|new| new.name == old.name && new.equivalent(old));
            if !keep {
                self.clauses.push(TableAlterClause::DropForeignKey(DropForeignKey {
                    foreign_key: old.clone(),
                    rename_only,
                }));
            }
        }
    }

    fn compare_foreign_key_adds(&mut self) {
        let renames = self.foreign_key_renames();
        for new in &self.to.foreign_keys {
            let rename_only = renames.iter().any(|(_, n)| n.name == new.name);
            let keep = self
                .from
                .foreign_keys
                .iter()
                .any(|old| old.name == new.name && old.equivalent(new));
            if !keep {
                self.clauses.push(TableAlterClause::AddForeignKey(AddForeignKey {
                    foreign_key: new.clone(),
                    rename_only,
                }));
            }
        }
    }

    // =========================================================================
    // Checks
    // =========================================================================

    fn plan_checks(&mut self) {
        let from_by_name: HashMap<&str, &Check> =
            self.from.checks.iter().map(|c| (c.name.as_str(), c)).collect();
        let to_names: HashSet<&str> = self.to.checks.iter().map(|c| c.name.as_str()).collect();

        // Rename-only pairs: same clause and enforcement, different name
        let mut renamed_from: HashSet<&str> = HashSet::new();
        let mut renamed_to: HashSet<&str> = HashSet::new();
        for old in self.from.checks.iter().filter(|c| !to_names.contains(c.name.as_str())) {
            let found = self.to.checks.iter().find(|new| {
                !from_by_name.contains_key(new.name.as_str())
                    && !renamed_to.contains(new.name.as_str())
                    && new.clause == old.clause
                    && new.enforced == old.enforced
            });
            if let Some(new) = found {
                renamed_from.insert(old.name.as_str());
                renamed_to.insert(new.name.as_str());
            }
        }

        let from_pos: HashMap<&str, usize> = self
            .from
            .checks
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), i))
            .collect();

        let mut plan = CheckPlan::default();
        let mut order = OrderTracker::default();
        let mut reorder_drops: HashSet<&str> = HashSet::new();

        for new in &self.to.checks {
            match from_by_name.get(new.name.as_str()) {
                Some(old) if old.clause == new.clause => {
                    if !order.keep(from_pos[new.name.as_str()]) {
                        reorder_drops.insert(new.name.as_str());
                        plan.adds.push(TableAlterClause::AddCheck(AddCheck {
                            check: new.clone(),
                            rename_only: false,
                            reorder_only: true,
                        }));
                    }
                    if old.enforced != new.enforced {
                        plan.adds.push(TableAlterClause::AlterCheck(AlterCheck {
                            check: new.clone(),
                            enforced: new.enforced,
                        }));
                    }
                }
                _ => {
                    order.appended();
                    plan.adds.push(TableAlterClause::AddCheck(AddCheck {
                        check: new.clone(),
                        rename_only: renamed_to.contains(new.name.as_str()),
                        reorder_only: false,
                    }));
                }
            }
        }

        for old in &self.from.checks {
            let changed = !self
                .to
                .checks
                .iter()
                .any(|new| new.name == old.name && new.clause == old.clause);
            if changed || reorder_drops.contains(old.name.as_str()) {
                plan.drops.push(TableAlterClause::DropCheck(DropCheck {
                    check: old.clone(),
                    rename_only: renamed_from.contains(old.name.as_str()),
                    reorder_only: !changed,
                }));
            }
        }
        self.check_plan = plan;
    }

    fn compare_check_drops(&mut self) {
        self.clauses.append(&mut self.check_plan.drops);
    }

    fn compare_check_adds(&mut self) {
        self.clauses.append(&mut self.check_plan.adds);
    }

    // =========================================================================
    // Indexes
    // =========================================================================

    fn plan_indexes(&mut self) {
        let mut plan = IndexPlan::default();

        // Primary key: any change is a drop and re-add
        match (&self.from.primary_key, &self.to.primary_key) {
            (Some(old), Some(new)) if old == new => {}
            (old, new) => {
                let comment_only = old
                    .as_ref()
                    .zip(new.as_ref())
                    .is_some_and(|(old, new)| differs_only_in_comment(old, new));
                let reason = if comment_only {
                    DropReason::COMMENT
                } else {
                    DropReason::CHANGED
                };
                if let Some(old) = old {
                    plan.drops.insert(old.name.clone(), reason);
                }
                if let Some(new) = new {
                    plan.adds.push(TableAlterClause::AddIndex(AddIndex {
                        index: new.clone(),
                        reorder_only: false,
                        comment_only,
                    }));
                }
            }
        }

        let from_by_name: HashMap<&str, &Index> = self
            .from
            .secondary_indexes
            .iter()
            .map(|idx| (idx.name.as_str(), idx))
            .collect();
        let to_names: HashSet<&str> = self
            .to
            .secondary_indexes
            .iter()
            .map(|idx| idx.name.as_str())
            .collect();

        // Renames: same definition apart from the name
        let mut renamed: HashMap<&str, &Index> = HashMap::new();
        for old in self
            .from
            .secondary_indexes
            .iter()
            .filter(|idx| !to_names.contains(idx.name.as_str()))
        {
            let found = self.to.secondary_indexes.iter().find(|new| {
                !from_by_name.contains_key(new.name.as_str())
                    && !renamed.contains_key(new.name.as_str())
                    && new.comment == old.comment
                    && new.invisible == old.invisible
                    && new.equivalent(old)
            });
            if let Some(new) = found {
                renamed.insert(new.name.as_str(), old);
            }
        }

        let from_pos: HashMap<&str, usize> = self
            .from
            .secondary_indexes
            .iter()
            .enumerate()
            .map(|(i, idx)| (idx.name.as_str(), i))
            .collect();

        let mut order = OrderTracker::default();
        for new in &self.to.secondary_indexes {
            let kept_as = match from_by_name.get(new.name.as_str()) {
                Some(old) if old.equals_ignoring_visibility(new) => Some(*old),
                Some(_) => None,
                None => renamed.get(new.name.as_str()).copied(),
            };
            let Some(old) = kept_as else {
                // New or modified
                let existing = from_by_name.get(new.name.as_str());
                let comment_only = existing.is_some_and(|old| differs_only_in_comment(old, new));
                if existing.is_some() {
                    let reason = if comment_only {
                        DropReason::COMMENT
                    } else {
                        DropReason::CHANGED
                    };
                    plan.drops.insert(new.name.clone(), reason);
                }
                order.appended();
                plan.adds.push(TableAlterClause::AddIndex(AddIndex {
                    index: new.clone(),
                    reorder_only: false,
                    comment_only,
                }));
                continue;
            };

            let in_order = order.keep(from_pos[old.name.as_str()]);
            let is_rename = old.name != new.name;

            if is_rename {
                if in_order {
                    plan.adds.push(TableAlterClause::RenameIndex(RenameIndex {
                        old: old.clone(),
                        new: new.clone(),
                    }));
                } else {
                    plan.drops.insert(old.name.clone(), DropReason::CHANGED);
                    plan.adds.push(TableAlterClause::AddIndex(AddIndex {
                        index: new.clone(),
                        reorder_only: false,
                        comment_only: false,
                    }));
                }
                continue;
            }

            if !in_order {
                plan.drops.insert(old.name.clone(), DropReason::REORDER);
                plan.adds.push(TableAlterClause::AddIndex(AddIndex {
                    index: new.clone(),
                    reorder_only: true,
                    comment_only: false,
                }));
            }
            if old.invisible != new.invisible {
                plan.adds.push(TableAlterClause::AlterIndex(AlterIndex {
                    name: new.name.clone(),
                    invisible: new.invisible,
                    reordered: !in_order,
                }));
            }
        }

        // Indexes removed outright
        for old in &self.from.secondary_indexes {
            if !to_names.contains(old.name.as_str()) && !renamed.values().any(|r| r.name == old.name) {
                plan.drops.insert(old.name.clone(), DropReason::CHANGED);
            }
        }
        self.index_plan = plan;
    }

    fn compare_index_drops(&mut self) {
        for old in self.from.indexes() {
            if let Some(reason) = self.index_plan.drops.get(&old.name) {
                self.clauses.push(TableAlterClause::DropIndex(DropIndex {
                    index: old.clone(),
                    reorder_only: reason.reorder_only,
                    comment_only: reason.comment_only,
                }));
            }
        }
    }

    fn compare_index_adds(&mut self) {
        self.clauses.append(&mut self.index_plan.adds);
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Pairs of (from, to) columns at the same position that differ only by name
    fn column_renames(&self) -> Vec<(&'a Column, &'a Column)> {
        self.from
            .columns
            .iter()
            .zip(self.to.columns.iter())
            .filter(|(old, new)| {
                old.name != new.name
                    && self.to.find_column(&old.name).is_none()
                    && self.from.find_column(&new.name).is_none()
                    && Column {
                        name: new.name.clone(),
                        ..(*old).clone()
                    } == **new
            })
            .collect()
    }

    fn compare_columns(&mut self, opts: &DiffOptions) {
        let renames = if opts.detect_column_renames {
            self.column_renames()
        } else {
            Vec::new()
        };
        let renamed_to = |name: &str| renames.iter().find(|(old, _)| old.name == name).map(|(_, new)| *new);
        let renamed_from = |name: &str| renames.iter().find(|(_, new)| new.name == name).map(|(old, _)| *old);

        // Drops
        for old in &self.from.columns {
            if self.to.find_column(&old.name).is_none() && renamed_to(&old.name).is_none() {
                self.clauses.push(TableAlterClause::DropColumn(DropColumn {
                    column: old.clone(),
                }));
            }
        }

        // Renames
        for (old, new) in &renames {
            self.clauses.push(TableAlterClause::RenameColumn(RenameColumn {
                old: (*old).clone(),
                new: (*new).clone(),
            }));
        }

        // Working list of column names as they stand after drops and renames
        let mut working: Vec<String> = self
            .from
            .columns
            .iter()
            .filter_map(|old| {
                if self.to.find_column(&old.name).is_some() {
                    Some(old.name.clone())
                } else {
                    renamed_to(&old.name).map(|new| new.name.clone())
                }
            })
            .collect();

        for (pos, new) in self.to.columns.iter().enumerate() {
            let old = self
                .from
                .find_column(&new.name)
                .or_else(|| renamed_from(&new.name));
            let position = || {
                if pos == 0 {
                    ColumnPosition::First
                } else {
                    ColumnPosition::After(self.to.columns[pos - 1].name.clone())
                }
            };

            let Some(old) = old else {
                let appended = pos >= working.len();
                self.clauses.push(TableAlterClause::AddColumn(AddColumn {
                    column: new.clone(),
                    position: (!appended).then(position),
                }));
                working.insert(pos.min(working.len()), new.name.clone());
                continue;
            };

            let moved = working.get(pos) != Some(&new.name);
            if moved {
                working.retain(|name| *name != new.name);
                working.insert(pos.min(working.len()), new.name.clone());
            }
            let old_renamed = Column {
                name: new.name.clone(),
                ..old.clone()
            };
            if moved || old_renamed != *new {
                self.clauses.push(TableAlterClause::ModifyColumn(ModifyColumn {
                    old: old.clone(),
                    new: new.clone(),
                    position: moved.then(position),
                    in_unique_constraint: self.from.column_in_unique_index(&old.name)
                        || self.to.column_in_unique_index(&new.name),
                    old_charset: old.effective_charset(&self.from.charset).to_string(),
                    new_charset: new.effective_charset(&self.to.charset).to_string(),
                    old_collation: old.effective_collation(&self.from.collation).to_string(),
                    new_collation: new.effective_collation(&self.to.collation).to_string(),
                }));
            }
        }
    }

    // =========================================================================
    // Table attributes
    // =========================================================================

    fn compare_attributes(&mut self) {
        let (from, to) = (self.from, self.to);

        if from.next_auto_increment != to.next_auto_increment {
            self.clauses.push(TableAlterClause::ChangeAutoIncrement(ChangeAutoIncrement {
                old: from.next_auto_increment,
                new: to.next_auto_increment,
            }));
        }
        if from.charset != to.charset || from.collation != to.collation {
            self.clauses.push(TableAlterClause::ChangeCharSet(ChangeCharSet {
                charset: to.charset.clone(),
                collation: to.collation.clone(),
            }));
        }
        let options = ChangeCreateOptions {
            old: from.create_options.clone(),
            new: to.create_options.clone(),
        };
        if !options.render().is_empty() {
            self.clauses.push(TableAlterClause::ChangeCreateOptions(options));
        }
        if from.comment != to.comment {
            self.clauses.push(TableAlterClause::ChangeComment(ChangeComment {
                new: to.comment.clone(),
            }));
        }
        if from.tablespace != to.tablespace {
            self.clauses.push(TableAlterClause::ChangeTablespace(ChangeTablespace {
                new: to.tablespace.clone(),
            }));
        }
        if !from.engine.eq_ignore_ascii_case(&to.engine) {
            self.clauses.push(TableAlterClause::ChangeStorageEngine(ChangeStorageEngine {
                old: from.engine.clone(),
                new: to.engine.clone(),
            }));
        }
    }

    // =========================================================================
    // Partitioning
    // =========================================================================

    fn compare_partitioning(&mut self) {
        let clause = match (&self.from.partitioning, &self.to.partitioning) {
            (None, None) => return,
            (None, Some(new)) => TableAlterClause::PartitionBy(PartitionBy {
                partitioning: new.clone(),
                repartition: false,
            }),
            (Some(_), None) => TableAlterClause::RemovePartitioning(RemovePartitioning),
            (Some(old), Some(new)) if !old.same_method(new) => {
                TableAlterClause::PartitionBy(PartitionBy {
                    partitioning: new.clone(),
                    repartition: true,
                })
            }
            (Some(old), Some(new)) => match partition_list_change(old, new) {
                PartitionListChange::Same => return,
                PartitionListChange::Modify(modify) => TableAlterClause::ModifyPartitions(modify),
                PartitionListChange::Unsupported => {
                    self.supported = false;
                    return;
                }
            },
        };
        self.clauses.push(clause);
    }
}

enum PartitionListChange {
    Same,
    Modify(ModifyPartitions),
    Unsupported,
}

/// Compare partition lists of two tables partitioned the same way. Only
/// RANGE and LIST partitions can be described as adds and drops.
fn partition_list_change(old: &TablePartitioning, new: &TablePartitioning) -> PartitionListChange {
    if old.partitions == new.partitions {
        return PartitionListChange::Same;
    }
    if !new.method.is_range_or_list() {
        return PartitionListChange::Unsupported;
    }
    let old_by_name: HashMap<&str, _> = old.partitions.iter().map(|p| (p.name.as_str(), p)).collect();
    let new_names: HashSet<&str> = new.partitions.iter().map(|p| p.name.as_str()).collect();

    // A retained partition whose boundary or attributes changed cannot be
    // expressed as an add or a drop
    let altered = new
        .partitions
        .iter()
        .any(|p| old_by_name.get(p.name.as_str()).is_some_and(|o| *o != p));
    if altered {
        return PartitionListChange::Unsupported;
    }

    PartitionListChange::Modify(ModifyPartitions {
        add: new
            .partitions
            .iter()
            .filter(|p| !old_by_name.contains_key(p.name.as_str()))
            .cloned()
            .collect(),
        drop: old
            .partitions
            .iter()
            .filter(|p| !new_names.contains(p.name.as_str()))
            .cloned()
            .collect(),
        for_drop_table: false,
    })
}
