//! Teacher use-case service.
//!
//! # Invariants
//! - `document` is unique among teachers.
//! - Has no dependency on other services. Removing a teacher does not touch
//!   classes that reference it; `School::remove_teacher` performs that
//!   cascade.

use crate::model::record::{EntityId, Record};
use crate::model::teacher::{Teacher, TeacherDraft, TeacherPatch};
use crate::repo::json_store::JsonStore;
use crate::service::base_service::{BaseService, EntityService};
use crate::service::error::ServiceResult;

const UNIQUE_FIELDS: &[&str] = &["document"];

pub struct TeacherService {
    base: BaseService<Teacher>,
}

impl TeacherService {
    pub fn new(store: JsonStore<Teacher>) -> Self {
        Self {
            base: BaseService::new(store),
        }
    }
}

impl EntityService for TeacherService {
    type Entity = Teacher;
    type Draft = TeacherDraft;
    type Patch = TeacherPatch;

    fn base(&self) -> &BaseService<Teacher> {
        &self.base
    }

    fn create(&self, draft: TeacherDraft) -> ServiceResult<Teacher> {
        let teacher = Teacher::new(draft)?;
        self.base.create_unique(teacher, UNIQUE_FIELDS)
    }

    fn update(&self, id: EntityId, patch: TeacherPatch) -> ServiceResult<Teacher> {
        self.base
            .update_with(id, UNIQUE_FIELDS, |current| Ok(current.merged(&patch)?))
    }
}
