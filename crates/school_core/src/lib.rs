//! Core record management for the school registry.
//! This crate is the single source of truth for record and cross-record
//! invariants; transport layers only call into it.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod school;
pub mod service;

pub use config::{ConfigError, RegistryConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::class::{Class, ClassDraft, ClassPatch};
pub use model::parent::{Address, Parent, ParentDraft, ParentPatch};
pub use model::record::{id_value, EntityId, EntityKind, Record, ValidationError};
pub use model::student::{Student, StudentDraft, StudentPatch};
pub use model::teacher::{Teacher, TeacherDraft, TeacherPatch, MIN_SALARY};
pub use repo::json_store::{JsonStore, StoreError, StoreResult};
pub use school::School;
pub use service::base_service::{BaseService, EntityService};
pub use service::class_service::ClassService;
pub use service::error::{ErrorBody, ServiceError, ServiceResult};
pub use service::parent_service::ParentService;
pub use service::student_service::StudentService;
pub use service::teacher_service::TeacherService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
