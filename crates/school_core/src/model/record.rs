//! Identity, kind and plain-data contract shared by every school record.
//!
//! # Responsibility
//! - Define `EntityId` and `EntityKind` used across store and services.
//! - Define the `Record` capability the generic store is parameterized over.
//! - Hold the field checks shared by entity constructors.
//!
//! # Invariants
//! - A record id is never the nil UUID.
//! - `Record::from_plain` runs the same validation as record construction,
//!   so loading persisted data is never a trusted bypass.
//! - `Record::merged` rebuilds a complete record and validates it in full.

use log::error;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Stable identifier of every school record.
pub type EntityId = Uuid;

/// Entity kinds managed by the registry. One store exists per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Teacher,
    Class,
    Parent,
    Student,
}

impl EntityKind {
    /// All kinds in dependency order (referenced kinds first).
    pub const ALL: [EntityKind; 4] = [Self::Teacher, Self::Parent, Self::Student, Self::Class];

    /// Lowercase name, used as the backing file stem and in log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Class => "class",
            Self::Parent => "parent",
            Self::Student => "student",
        }
    }

    /// Parses singular or plural lowercase kind names.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "teacher" | "teachers" => Some(Self::Teacher),
            "class" | "classes" => Some(Self::Class),
            "parent" | "parents" => Some(Self::Parent),
            "student" | "students" => Some(Self::Student),
            _ => None,
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Teacher => "Teacher",
            Self::Class => "Class",
            Self::Parent => "Parent",
            Self::Student => "Student",
        };
        f.write_str(name)
    }
}

/// Whole-record validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("record id must not be nil")]
    NilId,
    #[error("invalid email address `{0}`")]
    InvalidEmail(String),
    #[error("salary must be >= {minimum}, got {value}")]
    SalaryBelowMinimum { value: f64, minimum: f64 },
    #[error("salary must be a finite number, got {0}")]
    NonFiniteSalary(f64),
    #[error("invalid class code `{0}`; expected <digit><A-H>-<M|T|N>")]
    InvalidClassCode(String),
    #[error("`{0}` must contain at least one entry")]
    EmptyList(&'static str),
    #[error("malformed {kind} record: {message}")]
    Malformed { kind: EntityKind, message: String },
}

/// Capability every stored entity provides.
///
/// The store only knows records through this trait: identity, validation
/// and conversion to/from the plain structured representation.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    /// Checks every field invariant of the record.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Plain structured representation (camelCase keys, RFC 3339 dates).
    ///
    /// # Errors
    /// - `ValidationError::Malformed` when the record cannot be serialized.
    fn try_plain(&self) -> Result<Value, ValidationError> {
        serde_json::to_value(self).map_err(|err| ValidationError::Malformed {
            kind: Self::KIND,
            message: err.to_string(),
        })
    }

    /// Infallible view of `try_plain` for read paths (scans, listings).
    ///
    /// A serialization failure is logged and reads as `null`; write paths
    /// use `try_plain` so such a value never reaches disk.
    fn to_plain(&self) -> Value {
        match self.try_plain() {
            Ok(plain) => plain,
            Err(err) => {
                error!(
                    "event=record_plain module=model status=error kind={} id={} error={}",
                    Self::KIND.as_str(),
                    self.id(),
                    err
                );
                Value::Null
            }
        }
    }

    /// Rebuilds a record from its plain representation and validates it.
    fn from_plain(value: Value) -> Result<Self, ValidationError> {
        let record: Self =
            serde_json::from_value(value).map_err(|err| ValidationError::Malformed {
                kind: Self::KIND,
                message: err.to_string(),
            })?;
        record.validate()?;
        Ok(record)
    }

    /// Builds a brand-new record from this one with `patch` fields applied.
    ///
    /// Keys absent from the serialized patch keep their old values. The
    /// identity is never part of a patch.
    fn merged<P: Serialize>(&self, patch: &P) -> Result<Self, ValidationError> {
        let patch = serde_json::to_value(patch).map_err(|err| ValidationError::Malformed {
            kind: Self::KIND,
            message: err.to_string(),
        })?;
        Self::from_plain(merge_plain(self.try_plain()?, patch))
    }
}

/// Plain value of an id, as it appears in serialized records.
pub fn id_value(id: EntityId) -> Value {
    Value::String(id.to_string())
}

/// Overlays the top-level keys of `patch` onto `base`.
pub(crate) fn merge_plain(base: Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(mut base), Value::Object(patch)) => {
            for (key, value) in patch {
                if key != "id" {
                    base.insert(key, value);
                }
            }
            Value::Object(base)
        }
        (base, _) => base,
    }
}

/// Property lookup used by linear scans; absent properties read as `null`.
pub(crate) fn plain_property<'a>(plain: &'a Value, property: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    plain
        .as_object()
        .and_then(|fields: &Map<String, Value>| fields.get(property))
        .unwrap_or(&NULL)
}

pub(crate) fn ensure_id(id: EntityId) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::NilId);
    }
    Ok(())
}

pub(crate) fn ensure_email(value: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::InvalidEmail(value.to_string()));
    }
    Ok(())
}

pub(crate) fn ensure_not_empty<T>(field: &'static str, items: &[T]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyList(field));
    }
    Ok(())
}

/// Keeps "field absent" and "field set to null" apart in patches.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
