//! Entity use-case services.
//!
//! # Responsibility
//! - Wrap each record store with the shared base service contract.
//! - Enforce cross-record rules (existence, uniqueness, removal guards)
//!   before mutating a store.
//!
//! # Invariants
//! - Dependency edges only point one way: class -> teacher, class -> student,
//!   student -> parent. Teacher and parent services depend on nothing.
//! - Every failure propagates unchanged as a `ServiceError`.

pub mod base_service;
pub mod class_service;
pub mod error;
pub mod parent_service;
pub mod student_service;
pub mod teacher_service;
