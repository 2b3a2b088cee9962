//! Stored procedure and function diffs
//!
//! Routines are never altered in place. A changed routine is dropped and
//! recreated, which shows up as two diffs.

use mortise_types::ddl::{Routine, RoutineType};
use mortise_types::escape_identifier;

use crate::error::StatementError;
use crate::modifiers::StatementModifiers;
use crate::traits::{Diff, DiffType, ObjectKey, ObjectType};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutineDiff {
    pub from: Option<Routine>,
    pub to: Option<Routine>,
    /// The drop half of a drop-and-recreate pair
    pub replacement: bool,
    /// Only creation-time environment metadata changed
    pub metadata_only: bool,
}

impl RoutineDiff {
    #[must_use]
    pub fn create(routine: Routine) -> Self {
        Self {
            from: None,
            to: Some(routine),
            replacement: false,
            metadata_only: false,
        }
    }

    #[must_use]
    pub fn drop(routine: Routine) -> Self {
        Self {
            from: Some(routine),
            to: None,
            replacement: false,
            metadata_only: false,
        }
    }

    /// Drop and create diffs that replace `from` with `to`
    #[must_use]
    pub fn replace(from: Routine, to: Routine, metadata_only: bool) -> [Self; 2] {
        [
            Self {
                replacement: true,
                metadata_only,
                ..Self::drop(from)
            },
            Self {
                metadata_only,
                ..Self::create(to)
            },
        ]
    }

    fn routine(&self) -> &Routine {
        match (&self.to, &self.from) {
            (Some(r), _) | (None, Some(r)) => r,
            (None, None) => unreachable!("RoutineDiff is constructed with one side"),
        }
    }
}

const fn object_type(routine_type: RoutineType) -> ObjectType {
    match routine_type {
        RoutineType::Procedure => ObjectType::Procedure,
        RoutineType::Function => ObjectType::Function,
    }
}

impl Diff for RoutineDiff {
    fn diff_type(&self) -> DiffType {
        if self.to.is_some() {
            DiffType::Create
        } else {
            DiffType::Drop
        }
    }

    fn object_key(&self) -> ObjectKey {
        let routine = self.routine();
        ObjectKey::new(object_type(routine.routine_type), routine.name.clone())
    }

    fn statement(&self, mods: &StatementModifiers) -> Result<String, StatementError> {
        if self.metadata_only && !mods.compare_metadata {
            return Ok(String::new());
        }
        if let Some(to) = &self.to {
            return Ok(to.create_sql());
        }
        let routine = self.routine();
        let statement = format!(
            "DROP {} {}",
            routine.routine_type.as_sql(),
            escape_identifier(&routine.name)
        );
        if self.replacement || mods.allow_unsafe {
            return Ok(statement);
        }
        Err(StatementError::Unsafe {
            key: self.object_key(),
            statement,
            reason: format!("{} {} dropped", object_type(routine.routine_type), routine.name),
        })
    }
}
