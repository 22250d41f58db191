//! Parent use-case service.
//!
//! # Invariants
//! - `document` is unique among parents.
//! - Has no dependency on other services. `remove` does not check for
//!   students that still link the parent; `School::remove_parent` adds that
//!   guard.

use crate::model::parent::{Parent, ParentDraft, ParentPatch};
use crate::model::record::{EntityId, Record};
use crate::repo::json_store::JsonStore;
use crate::service::base_service::{BaseService, EntityService};
use crate::service::error::ServiceResult;

const UNIQUE_FIELDS: &[&str] = &["document"];

pub struct ParentService {
    base: BaseService<Parent>,
}

impl ParentService {
    pub fn new(store: JsonStore<Parent>) -> Self {
        Self {
            base: BaseService::new(store),
        }
    }
}

impl EntityService for ParentService {
    type Entity = Parent;
    type Draft = ParentDraft;
    type Patch = ParentPatch;

    fn base(&self) -> &BaseService<Parent> {
        &self.base
    }

    fn create(&self, draft: ParentDraft) -> ServiceResult<Parent> {
        let parent = Parent::new(draft)?;
        self.base.create_unique(parent, UNIQUE_FIELDS)
    }

    fn update(&self, id: EntityId, patch: ParentPatch) -> ServiceResult<Parent> {
        self.base
            .update_with(id, UNIQUE_FIELDS, |current| Ok(current.merged(&patch)?))
    }
}
