//! Class use-case service.
//!
//! # Responsibility
//! - Create/update classes with code uniqueness and teacher existence checks.
//! - Guard class removal against students that still reference the class.
//! - Resolve the class teacher and the students enrolled in a class.
//!
//! # Invariants
//! - `code` is unique among classes.
//! - A stored class never names a teacher that did not exist at write time.
//! - A class with enrolled students cannot be removed.
//! - Lock order: the class store lock may be held while the teacher store
//!   is read, never the reverse.

use crate::model::class::{Class, ClassDraft, ClassPatch};
use crate::model::record::{id_value, EntityId, EntityKind, Record};
use crate::model::student::Student;
use crate::model::teacher::Teacher;
use crate::repo::json_store::JsonStore;
use crate::service::base_service::{BaseService, EntityService};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::student_service::StudentService;
use crate::service::teacher_service::TeacherService;
use log::warn;
use std::sync::Arc;

const UNIQUE_FIELDS: &[&str] = &["code"];

pub struct ClassService {
    base: BaseService<Class>,
    teachers: Arc<TeacherService>,
    students: Arc<StudentService>,
}

impl ClassService {
    pub fn new(
        store: JsonStore<Class>,
        teachers: Arc<TeacherService>,
        students: Arc<StudentService>,
    ) -> Self {
        Self {
            base: BaseService::new(store),
            teachers,
            students,
        }
    }

    /// Resolves the teacher assigned to a class.
    ///
    /// # Errors
    /// - `NotFound` when the class does not exist.
    /// - `MissingDependency` when the class has no teacher assigned.
    /// - `NotFound` for the teacher when the assigned id no longer resolves.
    pub fn get_teacher(&self, class_id: EntityId) -> ServiceResult<Teacher> {
        let class = self.base.find_by_id(class_id)?;
        let teacher_id = class.teacher.ok_or(ServiceError::MissingDependency {
            searched: EntityKind::Teacher,
            locator: class_id,
            dependent: EntityKind::Class,
        })?;
        self.teachers.find_by_id(teacher_id)
    }

    /// Students enrolled in a class; empty when none are.
    pub fn get_students(&self, class_id: EntityId) -> ServiceResult<Vec<Student>> {
        let class = self.base.find_by_id(class_id)?;
        Ok(self.students.list_by("class", &id_value(class.id)))
    }

    fn ensure_teacher_exists(&self, class: &Class) -> ServiceResult<()> {
        let Some(teacher_id) = class.teacher else {
            return Ok(());
        };
        match self.teachers.find_by_id(teacher_id) {
            Ok(_) => Ok(()),
            Err(ServiceError::NotFound { .. }) => Err(ServiceError::MissingDependency {
                searched: EntityKind::Teacher,
                locator: teacher_id,
                dependent: EntityKind::Class,
            }),
            Err(other) => Err(other),
        }
    }
}

impl EntityService for ClassService {
    type Entity = Class;
    type Draft = ClassDraft;
    type Patch = ClassPatch;

    fn base(&self) -> &BaseService<Class> {
        &self.base
    }

    fn create(&self, draft: ClassDraft) -> ServiceResult<Class> {
        let class = Class::new(draft)?;
        self.ensure_teacher_exists(&class)?;
        self.base.create_unique(class, UNIQUE_FIELDS)
    }

    fn update(&self, id: EntityId, patch: ClassPatch) -> ServiceResult<Class> {
        self.base.update_with(id, UNIQUE_FIELDS, |current| {
            let updated = current.merged(&patch)?;
            self.ensure_teacher_exists(&updated)?;
            Ok(updated)
        })
    }

    /// Removes a class that no student references.
    ///
    /// # Errors
    /// - `DependencyConflict` when at least one student is enrolled.
    fn remove(&self, id: EntityId) -> ServiceResult<()> {
        let enrolled = self.students.list_by("class", &id_value(id));
        if !enrolled.is_empty() {
            warn!(
                "event=record_remove module=service status=rejected kind={} id={} dependents={}",
                Class::KIND.as_str(),
                id,
                enrolled.len()
            );
            return Err(ServiceError::DependencyConflict {
                target: EntityKind::Class,
                dependent: EntityKind::Student,
                locator: id,
            });
        }
        self.base.remove(id)
    }
}
