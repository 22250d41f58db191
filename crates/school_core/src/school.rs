//! Registry facade: service wiring and caller-level flows.
//!
//! # Responsibility
//! - Open one store per entity kind and wire services in dependency order.
//! - Host the flows that span services without a dependency edge between
//!   them: the student -> class existence check, the teacher removal
//!   cascade, the parent removal guard and reverse lookups.
//!
//! # Invariants
//! - Service dependency edges stay one-way; cross-edge checks live here.
//! - Flows are sequences of single-kind steps and are not atomic as a whole.

use crate::config::RegistryConfig;
use crate::model::class::{Class, ClassPatch};
use crate::model::record::{id_value, EntityId, EntityKind, Record};
use crate::model::student::{Student, StudentDraft, StudentPatch};
use crate::model::teacher::Teacher;
use crate::repo::json_store::{JsonStore, StoreResult};
use crate::service::base_service::EntityService;
use crate::service::class_service::ClassService;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::parent_service::ParentService;
use crate::service::student_service::StudentService;
use crate::service::teacher_service::TeacherService;
use log::info;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub struct School {
    data_dir: PathBuf,
    teachers: Arc<TeacherService>,
    parents: Arc<ParentService>,
    students: Arc<StudentService>,
    classes: Arc<ClassService>,
}

impl School {
    /// Opens (or initializes) every store under `data_dir`.
    ///
    /// # Errors
    /// - Any store that cannot be opened or loaded fails the whole open.
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let started_at = Instant::now();
        let data_dir = data_dir.as_ref();

        let teachers = Arc::new(TeacherService::new(JsonStore::open(data_dir)?));
        let parents = Arc::new(ParentService::new(JsonStore::open(data_dir)?));
        let students = Arc::new(StudentService::new(
            JsonStore::open(data_dir)?,
            Arc::clone(&parents),
        ));
        let classes = Arc::new(ClassService::new(
            JsonStore::open(data_dir)?,
            Arc::clone(&teachers),
            Arc::clone(&students),
        ));

        info!(
            "event=school_open module=school status=ok data_dir={} duration_ms={}",
            data_dir.display(),
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            teachers,
            parents,
            students,
            classes,
        })
    }

    pub fn from_config(config: &RegistryConfig) -> StoreResult<Self> {
        Self::open(&config.data_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn teachers(&self) -> &TeacherService {
        &self.teachers
    }

    pub fn parents(&self) -> &ParentService {
        &self.parents
    }

    pub fn students(&self) -> &StudentService {
        &self.students
    }

    pub fn classes(&self) -> &ClassService {
        &self.classes
    }

    /// Creates a student after checking that its class exists.
    pub fn create_student(&self, draft: StudentDraft) -> ServiceResult<Student> {
        self.ensure_class_exists(draft.class_id)?;
        self.students.create(draft)
    }

    /// Updates a student; a changed class must exist.
    pub fn update_student(&self, id: EntityId, patch: StudentPatch) -> ServiceResult<Student> {
        if let Some(class_id) = patch.class_id {
            self.ensure_class_exists(class_id)?;
        }
        self.students.update(id, patch)
    }

    /// Unassigns the teacher from every class that references it, then
    /// removes the teacher.
    ///
    /// # Errors
    /// - `NotFound` when the teacher does not exist.
    /// - Any class update error. Classes unassigned before the failing one
    ///   stay unassigned and the teacher is kept; nothing is rolled back,
    ///   and calling again finishes the cascade.
    pub fn remove_teacher(&self, teacher_id: EntityId) -> ServiceResult<()> {
        self.teachers.find_by_id(teacher_id)?;

        let assigned = self.classes.list_by("teacher", &id_value(teacher_id));
        for class in &assigned {
            self.classes.update(class.id, ClassPatch::clear_teacher())?;
        }
        self.teachers.remove(teacher_id)?;

        info!(
            "event=teacher_remove module=school status=ok id={} classes_unassigned={}",
            teacher_id,
            assigned.len()
        );
        Ok(())
    }

    /// Removes a parent no student links.
    ///
    /// # Errors
    /// - `NotFound` when the parent does not exist.
    /// - `DependencyConflict` when any student links the parent.
    pub fn remove_parent(&self, parent_id: EntityId) -> ServiceResult<()> {
        self.parents.find_by_id(parent_id)?;
        if !self.students.list_by_parent(parent_id).is_empty() {
            return Err(ServiceError::DependencyConflict {
                target: EntityKind::Parent,
                dependent: EntityKind::Student,
                locator: parent_id,
            });
        }
        self.parents.remove(parent_id)
    }

    /// Students linking the parent.
    pub fn parent_students(&self, parent_id: EntityId) -> ServiceResult<Vec<Student>> {
        self.parents.find_by_id(parent_id)?;
        Ok(self.students.list_by_parent(parent_id))
    }

    /// Classes the teacher is assigned to.
    pub fn teacher_classes(&self, teacher_id: EntityId) -> ServiceResult<Vec<Class>> {
        self.teachers.find_by_id(teacher_id)?;
        Ok(self.classes.list_by("teacher", &id_value(teacher_id)))
    }

    /// Students of every class the teacher is assigned to.
    pub fn teacher_students(&self, teacher_id: EntityId) -> ServiceResult<Vec<Student>> {
        let classes = self.teacher_classes(teacher_id)?;
        Ok(classes
            .iter()
            .flat_map(|class| self.students.list_by("class", &id_value(class.id)))
            .collect())
    }

    /// Resolves the teacher of a class (delegates to the class service).
    pub fn class_teacher(&self, class_id: EntityId) -> ServiceResult<Teacher> {
        self.classes.get_teacher(class_id)
    }

    /// Record count per kind, in dependency order.
    pub fn counts(&self) -> Vec<(EntityKind, usize)> {
        EntityKind::ALL
            .iter()
            .map(|kind| {
                let count = match kind {
                    EntityKind::Teacher => self.teachers.base().store().len(),
                    EntityKind::Class => self.classes.base().store().len(),
                    EntityKind::Parent => self.parents.base().store().len(),
                    EntityKind::Student => self.students.base().store().len(),
                };
                (*kind, count)
            })
            .collect()
    }

    /// Plain representation of every record of `kind`.
    pub fn plain_records(&self, kind: EntityKind) -> Vec<Value> {
        match kind {
            EntityKind::Teacher => to_plain_all(self.teachers.list()),
            EntityKind::Class => to_plain_all(self.classes.list()),
            EntityKind::Parent => to_plain_all(self.parents.list()),
            EntityKind::Student => to_plain_all(self.students.list()),
        }
    }

    fn ensure_class_exists(&self, class_id: EntityId) -> ServiceResult<()> {
        match self.classes.find_by_id(class_id) {
            Ok(_) => Ok(()),
            Err(ServiceError::NotFound { .. }) => Err(ServiceError::MissingDependency {
                searched: EntityKind::Class,
                locator: class_id,
                dependent: EntityKind::Student,
            }),
            Err(other) => Err(other),
        }
    }
}

fn to_plain_all<R: Record>(records: Vec<R>) -> Vec<Value> {
    records.iter().map(|record| record.to_plain()).collect()
}
