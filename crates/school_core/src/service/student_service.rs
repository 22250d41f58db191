//! Student use-case service.
//!
//! # Responsibility
//! - Create/update students with document uniqueness and parent existence
//!   checks.
//! - Maintain the student/parent many-to-many relation from the student
//!   side (`link_parent`, `unlink_parent`, `get_parents`).
//!
//! # Invariants
//! - A student always keeps at least one parent.
//! - Linking uses set-union semantics: already linked ids are ignored and
//!   existing link order is kept.
//! - Link, unlink and update read and rewrite the stored student under one
//!   store lock.
//! - Parent existence is checked before the student write; the two steps
//!   are not atomic across kinds.

use crate::model::parent::Parent;
use crate::model::record::{EntityId, EntityKind};
use crate::model::student::{Student, StudentDraft, StudentPatch};
use crate::repo::json_store::JsonStore;
use crate::service::base_service::{BaseService, EntityService};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::parent_service::ParentService;
use log::info;
use std::sync::Arc;

const UNIQUE_FIELDS: &[&str] = &["document"];

pub struct StudentService {
    base: BaseService<Student>,
    parents: Arc<ParentService>,
}

impl StudentService {
    pub fn new(store: JsonStore<Student>, parents: Arc<ParentService>) -> Self {
        Self {
            base: BaseService::new(store),
            parents,
        }
    }

    /// Resolves every parent linked to the student.
    pub fn get_parents(&self, student_id: EntityId) -> ServiceResult<Vec<Parent>> {
        let student = self.base.find_by_id(student_id)?;
        student
            .parents()
            .iter()
            .map(|parent_id| self.parents.find_by_id(*parent_id))
            .collect()
    }

    /// Links additional parents to a student.
    ///
    /// The union with the stored parent list is computed and written under
    /// the student store lock, so concurrent links all survive.
    ///
    /// # Errors
    /// - `NotFound` when the student does not exist.
    /// - `MissingDependency` when any id does not resolve to a parent.
    /// - `EmptyDependency` when the resulting relation would be empty.
    pub fn link_parent(
        &self,
        student_id: EntityId,
        parent_ids: &[EntityId],
    ) -> ServiceResult<Student> {
        let student = self.base.find_by_id(student_id)?;
        self.ensure_parents_exist(parent_ids)?;

        if parent_ids.iter().all(|parent_id| student.has_parent(*parent_id)) {
            info!(
                "event=student_link_parent module=service status=noop id={}",
                student_id
            );
            return Ok(student);
        }

        self.base.update_with(student_id, UNIQUE_FIELDS, |mut current| {
            let mut linked = current.parents().to_vec();
            for parent_id in parent_ids {
                if !linked.contains(parent_id) {
                    linked.push(*parent_id);
                }
            }
            ensure_parents_left(&linked)?;
            current.set_parents(linked)?;
            Ok(current)
        })
    }

    /// Removes one parent link from a student.
    ///
    /// Unlinking a parent that is not linked returns the student unchanged.
    ///
    /// # Errors
    /// - `NotFound` when the student does not exist.
    /// - `EmptyDependency` when `parent_id` is the only linked parent.
    pub fn unlink_parent(
        &self,
        student_id: EntityId,
        parent_id: EntityId,
    ) -> ServiceResult<Student> {
        let student = self.base.find_by_id(student_id)?;
        if !student.has_parent(parent_id) {
            return Ok(student);
        }

        self.base.update_with(student_id, UNIQUE_FIELDS, |mut current| {
            let remaining: Vec<EntityId> = current
                .parents()
                .iter()
                .copied()
                .filter(|linked| *linked != parent_id)
                .collect();
            ensure_parents_left(&remaining)?;
            current.set_parents(remaining)?;
            Ok(current)
        })
    }

    /// Students that link `parent_id`, by membership in their parent list.
    pub fn list_by_parent(&self, parent_id: EntityId) -> Vec<Student> {
        self.base
            .list()
            .into_iter()
            .filter(|student| student.has_parent(parent_id))
            .collect()
    }

    fn ensure_parents_exist(&self, parent_ids: &[EntityId]) -> ServiceResult<()> {
        for parent_id in parent_ids {
            self.parents
                .find_by_id(*parent_id)
                .map_err(|err| match err {
                    ServiceError::NotFound { .. } => ServiceError::MissingDependency {
                        searched: EntityKind::Parent,
                        locator: *parent_id,
                        dependent: EntityKind::Student,
                    },
                    other => other,
                })?;
        }
        Ok(())
    }
}

impl EntityService for StudentService {
    type Entity = Student;
    type Draft = StudentDraft;
    type Patch = StudentPatch;

    fn base(&self) -> &BaseService<Student> {
        &self.base
    }

    fn create(&self, draft: StudentDraft) -> ServiceResult<Student> {
        self.ensure_parents_exist(&draft.parents)?;
        let student = Student::new(draft)?;
        self.base.create_unique(student, UNIQUE_FIELDS)
    }

    /// Replacing `parents` through a patch requires every listed parent to
    /// exist and the list to be non-empty.
    fn update(&self, id: EntityId, patch: StudentPatch) -> ServiceResult<Student> {
        if let Some(parents) = &patch.parents {
            self.ensure_parents_exist(parents)?;
        }
        self.base
            .update_with(id, UNIQUE_FIELDS, |current| Ok(current.patched(&patch)?))
    }
}

fn ensure_parents_left(parents: &[EntityId]) -> ServiceResult<()> {
    if parents.is_empty() {
        return Err(ServiceError::EmptyDependency {
            kind: EntityKind::Student,
            dependency: EntityKind::Parent,
        });
    }
    Ok(())
}
