//! School domain model.
//!
//! # Responsibility
//! - Define the record types for teachers, classes, parents and students.
//! - Define creation drafts and partial-update patches per record type.
//! - Provide the plain-data contract (`Record`) the store relies on.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil `EntityId`.
//! - Records are only built through validating constructors or
//!   `Record::from_plain`; both run the same checks.
//! - Cross-record references are plain ids; no record stores a
//!   back-reference.

pub mod class;
pub mod parent;
pub mod record;
pub mod student;
pub mod teacher;
