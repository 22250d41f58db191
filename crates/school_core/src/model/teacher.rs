//! Teacher domain model.
//!
//! # Invariants
//! - `salary` is at least `MIN_SALARY`.
//! - `email` is a syntactically valid address.
//! - `document` uniqueness is a service concern, not checked here.

use crate::model::record::{ensure_email, ensure_id, EntityId, EntityKind, Record, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_SALARY: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: EntityId,
    pub first_name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
    pub document: String,
    pub salary: f64,
    pub hiring_date: DateTime<Utc>,
    pub major: String,
}

/// Creation payload. `id` is generated when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDraft {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub first_name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
    pub document: String,
    pub salary: f64,
    pub hiring_date: DateTime<Utc>,
    pub major: String,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hiring_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
}

impl Teacher {
    /// Builds and validates a teacher from a creation payload.
    pub fn new(draft: TeacherDraft) -> Result<Self, ValidationError> {
        let teacher = Self {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            first_name: draft.first_name,
            surname: draft.surname,
            phone: draft.phone,
            email: draft.email,
            document: draft.document,
            salary: draft.salary,
            hiring_date: draft.hiring_date,
            major: draft.major,
        };
        teacher.validate()?;
        Ok(teacher)
    }
}

impl Record for Teacher {
    const KIND: EntityKind = EntityKind::Teacher;

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ensure_id(self.id)?;
        ensure_email(&self.email)?;
        if !self.salary.is_finite() {
            return Err(ValidationError::NonFiniteSalary(self.salary));
        }
        if self.salary < MIN_SALARY {
            return Err(ValidationError::SalaryBelowMinimum {
                value: self.salary,
                minimum: MIN_SALARY,
            });
        }
        Ok(())
    }
}
