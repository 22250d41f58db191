//! Service error taxonomy and its boundary mapping.
//!
//! # Responsibility
//! - Name every failure a service operation can signal.
//! - Map failures to the machine-readable code, status and body an outer
//!   transport layer reports.

use crate::model::record::{EntityId, EntityKind, ValidationError};
use crate::repo::json_store::StoreError;
use serde::Serialize;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Requested identity is absent from its store.
    #[error("{kind} with id {id} could not be found")]
    NotFound { kind: EntityKind, id: EntityId },
    /// A unique field value is already taken.
    #[error("{kind} with {field} `{value}` already exists")]
    Conflict {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },
    /// A referenced record does not exist.
    #[error("{searched} with locator {locator} could not be found in {dependent}")]
    MissingDependency {
        searched: EntityKind,
        locator: EntityId,
        dependent: EntityKind,
    },
    /// Removal blocked because other records still reference the target.
    #[error("{target} with locator {locator} cannot be removed because {dependent} depends on it")]
    DependencyConflict {
        target: EntityKind,
        dependent: EntityKind,
        locator: EntityId,
    },
    /// A required relation would become empty.
    #[error("{kind} must keep at least one {dependency}")]
    EmptyDependency {
        kind: EntityKind,
        dependency: EntityKind,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::MissingDependency { .. } => "MISSING_DEPENDENCY",
            Self::DependencyConflict { .. } => "DEPENDENCY_LOCK",
            Self::EmptyDependency { .. } => "EMPTY_DEPENDENCY",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Store(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP-class status a transport layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::MissingDependency { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::DependencyConflict { .. } => 403,
            Self::EmptyDependency { .. } | Self::Validation(_) => 422,
            Self::Store(_) => 500,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NotFoundError",
            Self::Conflict { .. } => "ConflictError",
            Self::MissingDependency { .. } => "MissingDependencyError",
            Self::DependencyConflict { .. } => "DependencyConflictError",
            Self::EmptyDependency { .. } => "EmptyDependencyError",
            Self::Validation(_) => "ValidationError",
            Self::Store(_) => "InternalError",
        }
    }

    /// Whether the failure was raised by a domain rule rather than by the
    /// persistence layer.
    pub fn is_domain(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// Response body shape for failed operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub name: &'static str,
}

impl From<&ServiceError> for ErrorBody {
    fn from(err: &ServiceError) -> Self {
        if !err.is_domain() {
            // Persistence details (paths, io errors) stay out of responses.
            return Self {
                code: "INTERNAL_ERROR",
                message: "internal error".to_string(),
                name: "InternalError",
            };
        }
        Self {
            code: err.code(),
            message: err.to_string(),
            name: err.name(),
        }
    }
}
