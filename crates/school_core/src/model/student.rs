//! Student domain model.
//!
//! # Responsibility
//! - Define the student record and its creation/update payloads.
//! - Encapsulate the parent relation behind accessor/mutator methods.
//!
//! # Invariants
//! - `parents` is never empty; `set_parents` is the only mutator and
//!   rejects an empty list. Patches route parent changes through it.
//! - `class_id` and every parent id are references; their existence is
//!   checked by services, not by the model.

use crate::model::record::{
    double_option, ensure_id, ensure_not_empty, EntityId, EntityKind, Record, ValidationError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: EntityId,
    pub first_name: String,
    pub surname: String,
    pub document: String,
    pub blood_type: String,
    pub birth_date: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<String>>,
    parents: Vec<EntityId>,
    #[serde(rename = "class")]
    pub class_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub first_name: String,
    pub surname: String,
    pub document: String,
    pub blood_type: String,
    pub birth_date: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    #[serde(default)]
    pub medications: Option<Vec<String>>,
    pub parents: Vec<EntityId>,
    #[serde(rename = "class")]
    pub class_id: EntityId,
}

/// Partial student update.
///
/// `allergies` and `medications` are tri-state: absent keeps the stored
/// list, `null` clears it, a list replaces it. `parents` replaces the
/// whole relation and is applied through `Student::set_parents`, never
/// through the plain merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub allergies: Option<Option<Vec<String>>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub medications: Option<Option<Vec<String>>>,
    #[serde(default, skip_serializing)]
    pub parents: Option<Vec<EntityId>>,
    #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
    pub class_id: Option<EntityId>,
}

impl Student {
    pub fn new(draft: StudentDraft) -> Result<Self, ValidationError> {
        let student = Self {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            first_name: draft.first_name,
            surname: draft.surname,
            document: draft.document,
            blood_type: draft.blood_type,
            birth_date: draft.birth_date,
            start_date: draft.start_date,
            allergies: draft.allergies,
            medications: draft.medications,
            parents: draft.parents,
            class_id: draft.class_id,
        };
        student.validate()?;
        Ok(student)
    }

    /// Applies `patch` to a copy of this student.
    ///
    /// # Errors
    /// - Any field invariant the merged record breaks.
    /// - `ValidationError::EmptyList` when `patch.parents` is empty.
    pub fn patched(&self, patch: &StudentPatch) -> Result<Self, ValidationError> {
        let mut updated = self.merged(patch)?;
        if let Some(parents) = &patch.parents {
            updated.set_parents(parents.clone())?;
            updated.validate()?;
        }
        Ok(updated)
    }

    /// Linked parent ids, in link order.
    pub fn parents(&self) -> &[EntityId] {
        &self.parents
    }

    pub fn has_parent(&self, parent_id: EntityId) -> bool {
        self.parents.contains(&parent_id)
    }

    /// Replaces the parent list.
    ///
    /// # Errors
    /// - `ValidationError::EmptyList` when `parents` is empty; the stored
    ///   list is left untouched.
    pub fn set_parents(&mut self, parents: Vec<EntityId>) -> Result<(), ValidationError> {
        ensure_not_empty("parents", &parents)?;
        self.parents = parents;
        Ok(())
    }
}

impl Record for Student {
    const KIND: EntityKind = EntityKind::Student;

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ensure_id(self.id)?;
        ensure_id(self.class_id)?;
        ensure_not_empty("parents", &self.parents)?;
        for parent_id in &self.parents {
            ensure_id(*parent_id)?;
        }
        Ok(())
    }
}
