//! Persistence layer.
//!
//! # Responsibility
//! - Provide one generic, file-backed store per record kind.
//! - Keep file format and durability details out of the service layer.
//!
//! # Invariants
//! - Store writes validate records before persisting them.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Stores enforce no cross-record constraints; services do.

pub mod json_store;
