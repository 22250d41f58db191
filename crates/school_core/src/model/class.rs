//! Class domain model.
//!
//! # Invariants
//! - `code` is one digit, one letter `A`-`H`, a dash and a shift letter
//!   (`M`orning, `T`afternoon, `N`ight), e.g. `3B-T`.
//! - `teacher` is an optional reference; its existence is checked by the
//!   class service, not by the model.

use crate::model::record::{
    double_option, ensure_id, EntityId, EntityKind, Record, ValidationError,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static CLASS_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9][A-H]-[MTN]$").expect("valid class code regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: EntityId,
    pub code: String,
    pub teacher: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDraft {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub code: String,
    #[serde(default)]
    pub teacher: Option<EntityId>,
}

/// Partial class update.
///
/// `teacher` is tri-state: `None` keeps the stored value, `Some(None)`
/// clears it and `Some(Some(id))` assigns a teacher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub teacher: Option<Option<EntityId>>,
}

impl ClassPatch {
    /// Patch that only unassigns the teacher.
    pub fn clear_teacher() -> Self {
        Self {
            code: None,
            teacher: Some(None),
        }
    }

    /// Patch that only assigns `teacher_id`.
    pub fn assign_teacher(teacher_id: EntityId) -> Self {
        Self {
            code: None,
            teacher: Some(Some(teacher_id)),
        }
    }
}

impl Class {
    pub fn new(draft: ClassDraft) -> Result<Self, ValidationError> {
        let class = Self {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            code: draft.code,
            teacher: draft.teacher,
        };
        class.validate()?;
        Ok(class)
    }
}

impl Record for Class {
    const KIND: EntityKind = EntityKind::Class;

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ensure_id(self.id)?;
        if !CLASS_CODE_RE.is_match(&self.code) {
            return Err(ValidationError::InvalidClassCode(self.code.clone()));
        }
        if self.teacher.is_some_and(|teacher| teacher.is_nil()) {
            return Err(ValidationError::NilId);
        }
        Ok(())
    }
}
