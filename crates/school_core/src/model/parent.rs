//! Parent (guardian) domain model.
//!
//! # Invariants
//! - `phones`, `emails` and `address` each hold at least one entry.
//! - Every email is a syntactically valid address.

use crate::model::record::{
    ensure_email, ensure_id, ensure_not_empty, EntityId, EntityKind, Record, ValidationError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured postal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub zip_code: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub id: EntityId,
    pub first_name: String,
    pub surname: String,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub address: Vec<Address>,
    pub document: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentDraft {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub first_name: String,
    pub surname: String,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub address: Vec<Address>,
    pub document: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phones: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Address>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

impl Parent {
    pub fn new(draft: ParentDraft) -> Result<Self, ValidationError> {
        let parent = Self {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            first_name: draft.first_name,
            surname: draft.surname,
            phones: draft.phones,
            emails: draft.emails,
            address: draft.address,
            document: draft.document,
        };
        parent.validate()?;
        Ok(parent)
    }
}

impl Record for Parent {
    const KIND: EntityKind = EntityKind::Parent;

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ensure_id(self.id)?;
        ensure_not_empty("phones", &self.phones)?;
        ensure_not_empty("emails", &self.emails)?;
        ensure_not_empty("address", &self.address)?;
        for email in &self.emails {
            ensure_email(email)?;
        }
        Ok(())
    }
}
