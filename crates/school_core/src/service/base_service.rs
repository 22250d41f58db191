//! Shared CRUD scaffolding over a record store.
//!
//! # Responsibility
//! - Turn store absence into `ServiceError::NotFound` uniformly.
//! - Provide the uniqueness-checked write used by every entity service.
//! - Declare the `EntityService` contract (create/update per entity).
//!
//! # Invariants
//! - Uniqueness checks and the write they guard run under one store lock.
//! - Updates read, merge and write the stored record under that same lock,
//!   so concurrent updates of one kind never overwrite each other.
//! - `remove` never checks dependents; entity services override it when a
//!   removal must be guarded.

use crate::model::record::{plain_property, EntityId, Record};
use crate::repo::json_store::JsonStore;
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};
use serde_json::Value;
use std::collections::BTreeMap;

/// Store wrapper shared by all entity services.
pub struct BaseService<R: Record> {
    store: JsonStore<R>,
}

impl<R: Record> BaseService<R> {
    pub fn new(store: JsonStore<R>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &JsonStore<R> {
        &self.store
    }

    pub fn list(&self) -> Vec<R> {
        self.store.list()
    }

    pub fn list_by(&self, property: &str, value: &Value) -> Vec<R> {
        self.store.list_by(property, value)
    }

    /// Loads one record; absence is an error here, unlike the raw store.
    pub fn find_by_id(&self, id: EntityId) -> ServiceResult<R> {
        self.store.find_by_id(id).ok_or(ServiceError::NotFound {
            kind: R::KIND,
            id,
        })
    }

    pub fn remove(&self, id: EntityId) -> ServiceResult<()> {
        let existed = self.store.remove(id)?;
        info!(
            "event=record_remove module=service status=ok kind={} id={} existed={}",
            R::KIND.as_str(),
            id,
            existed
        );
        Ok(())
    }

    /// Persists a new `record` after checking that no other record of the
    /// kind shares a value in any of `unique_fields`.
    ///
    /// # Errors
    /// - `Conflict { field: "id" }` when the id is already stored.
    /// - `Conflict { field }` when a unique field value is taken.
    pub fn create_unique(&self, record: R, unique_fields: &[&'static str]) -> ServiceResult<R> {
        record.validate()?;
        let id = record.id();

        let result = self.store.update_map(|records| {
            if records.contains_key(&id) {
                return Err(ServiceError::Conflict {
                    kind: R::KIND,
                    field: "id",
                    value: id.to_string(),
                });
            }
            ensure_unique(records, &record, unique_fields)?;
            records.insert(id, record.clone());
            Ok(record)
        });
        log_write("create", id, &result);
        result
    }

    /// Reads the stored record, applies `apply` to it and persists the
    /// result, all under the store lock.
    ///
    /// `apply` must not lock this store again. It may read stores of kinds
    /// this kind references.
    ///
    /// # Errors
    /// - `NotFound` when the record does not exist.
    /// - Any error returned by `apply` or by validation of its result.
    /// - `Conflict { field }` when a unique field value is taken.
    pub fn update_with<F>(
        &self,
        id: EntityId,
        unique_fields: &[&'static str],
        apply: F,
    ) -> ServiceResult<R>
    where
        F: FnOnce(R) -> ServiceResult<R>,
    {
        let result = self.store.update_map(|records| {
            let current = records
                .get(&id)
                .cloned()
                .ok_or(ServiceError::NotFound { kind: R::KIND, id })?;
            let updated = apply(current)?;
            updated.validate()?;
            if updated.id() != id {
                return Err(ServiceError::Conflict {
                    kind: R::KIND,
                    field: "id",
                    value: updated.id().to_string(),
                });
            }
            ensure_unique(records, &updated, unique_fields)?;
            records.insert(id, updated.clone());
            Ok(updated)
        });
        log_write("update", id, &result);
        result
    }
}

fn ensure_unique<R: Record>(
    records: &BTreeMap<EntityId, R>,
    record: &R,
    unique_fields: &[&'static str],
) -> ServiceResult<()> {
    let id = record.id();
    let plain = record.try_plain()?;
    for &field in unique_fields {
        let value = plain_property(&plain, field);
        let taken = records
            .values()
            .any(|other| other.id() != id && plain_property(&other.to_plain(), field) == value);
        if taken {
            return Err(ServiceError::Conflict {
                kind: R::KIND,
                field,
                value: display_value(value),
            });
        }
    }
    Ok(())
}

fn log_write<R: Record>(action: &str, id: EntityId, result: &ServiceResult<R>) {
    match result {
        Ok(_) => info!(
            "event=record_{} module=service status=ok kind={} id={}",
            action,
            R::KIND.as_str(),
            id
        ),
        Err(err) => warn!(
            "event=record_{} module=service status=rejected kind={} id={} error_code={}",
            action,
            R::KIND.as_str(),
            id,
            err.code()
        ),
    }
}

/// CRUD contract every entity service fulfils.
///
/// Read and remove operations have default implementations over
/// `base()`; `create` and `update` are entity specific.
pub trait EntityService {
    type Entity: Record;
    type Draft;
    type Patch;

    fn base(&self) -> &BaseService<Self::Entity>;

    /// Assigns identity (when the draft has none), validates and persists.
    fn create(&self, draft: Self::Draft) -> ServiceResult<Self::Entity>;

    /// Merges `patch` into the stored record, revalidates the complete
    /// result and persists it in one locked step.
    fn update(&self, id: EntityId, patch: Self::Patch) -> ServiceResult<Self::Entity>;

    fn list(&self) -> Vec<Self::Entity> {
        self.base().list()
    }

    fn list_by(&self, property: &str, value: &Value) -> Vec<Self::Entity> {
        self.base().list_by(property, value)
    }

    fn find_by_id(&self, id: EntityId) -> ServiceResult<Self::Entity> {
        self.base().find_by_id(id)
    }

    fn remove(&self, id: EntityId) -> ServiceResult<()> {
        self.base().remove(id)
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
