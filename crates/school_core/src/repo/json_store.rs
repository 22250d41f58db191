//! Generic file-backed record store.
//!
//! # Responsibility
//! - Hold every record of one entity kind in memory, keyed by id.
//! - Persist the complete record set to `<data_dir>/<kind>.json` on every
//!   mutation and load it back on open.
//!
//! # Invariants
//! - File content is a JSON array of `[id, plainRecord]` pairs.
//! - Loading rebuilds each record through `Record::from_plain`; any
//!   malformed or invalid entry makes `open` fail.
//! - Mutations are applied to a copy, written to disk, and only then
//!   published in memory, so memory never runs ahead of the file.
//! - One mutex per store serializes check-and-write sequences for a kind.

use crate::model::record::{plain_property, EntityId, EntityKind, Record, ValidationError};
use log::{error, info};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from store initialization and persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} store i/o failure at `{}`: {source}", path.display())]
    Io {
        kind: EntityKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{kind} store file `{}` is malformed: {message}", path.display())]
    Corrupt {
        kind: EntityKind,
        path: PathBuf,
        message: String,
    },
    #[error("invalid {kind} record {id}: {source}")]
    InvalidRecord {
        kind: EntityKind,
        id: EntityId,
        #[source]
        source: ValidationError,
    },
    #[error("failed to serialize {kind} store: {source}")]
    Serialize {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable keyed storage for one record type.
pub struct JsonStore<R: Record> {
    file_path: PathBuf,
    records: Mutex<BTreeMap<EntityId, R>>,
}

impl<R: Record> JsonStore<R> {
    /// Opens the store for `R` under `data_dir`, creating an empty backing
    /// file when none exists.
    ///
    /// # Errors
    /// - `StoreError::Io` when the directory or file cannot be created/read.
    /// - `StoreError::Corrupt` / `StoreError::InvalidRecord` when persisted
    ///   content cannot be rebuilt into valid records.
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let started_at = Instant::now();
        let kind = R::KIND;
        let data_dir = data_dir.as_ref();
        let file_path = data_dir.join(format!("{}.json", kind.as_str()));

        let result = fs::create_dir_all(data_dir)
            .map_err(|source| StoreError::Io {
                kind,
                path: data_dir.to_path_buf(),
                source,
            })
            .and_then(|()| load_or_init::<R>(&file_path));

        match result {
            Ok(records) => {
                info!(
                    "event=store_open module=store status=ok kind={} records={} duration_ms={}",
                    kind.as_str(),
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    file_path,
                    records: Mutex::new(records),
                })
            }
            Err(err) => {
                error!(
                    "event=store_open module=store status=error kind={} duration_ms={} error={}",
                    kind.as_str(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    pub fn kind(&self) -> EntityKind {
        R::KIND
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// All records, ordered by id.
    pub fn list(&self) -> Vec<R> {
        self.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Absence is reported as `None`, never as an error.
    pub fn find_by_id(&self, id: EntityId) -> Option<R> {
        self.lock().get(&id).cloned()
    }

    /// Linear scan for records whose plain `property` equals `value`.
    ///
    /// Comparison is `serde_json::Value` equality: lists and objects match
    /// by content, scalars exactly. An absent property compares as `null`.
    pub fn list_by(&self, property: &str, value: &Value) -> Vec<R> {
        self.lock()
            .values()
            .filter(|record| plain_property(&record.to_plain(), property) == value)
            .cloned()
            .collect()
    }

    /// Inserts or replaces `record` by id, then rewrites the backing file.
    pub fn save(&self, record: R) -> StoreResult<()> {
        let id = record.id();
        record
            .validate()
            .map_err(|source| StoreError::InvalidRecord {
                kind: R::KIND,
                id,
                source,
            })?;
        self.update_map(|records| {
            records.insert(id, record);
            Ok::<(), StoreError>(())
        })
    }

    /// Deletes `id`, then rewrites the backing file.
    ///
    /// Returns whether a record existed. The file is rewritten either way.
    pub fn remove(&self, id: EntityId) -> StoreResult<bool> {
        self.update_map(|records| Ok::<bool, StoreError>(records.remove(&id).is_some()))
    }

    /// Runs a check-and-mutate step under the store lock and persists it.
    ///
    /// `apply` works on a copy of the record map. When it fails nothing is
    /// written and the in-memory set is unchanged; when it succeeds the copy
    /// is written to disk and then replaces the in-memory set.
    pub fn update_map<T, E, F>(&self, apply: F) -> Result<T, E>
    where
        F: FnOnce(&mut BTreeMap<EntityId, R>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut guard = self.lock();
        let mut next = guard.clone();
        let output = apply(&mut next)?;
        self.write_snapshot(&next)?;
        *guard = next;
        Ok(output)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<EntityId, R>> {
        // A panic inside `update_map` never publishes a half-applied map.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_snapshot(&self, records: &BTreeMap<EntityId, R>) -> StoreResult<()> {
        let started_at = Instant::now();
        let kind = R::KIND;
        let result = plain_entries(records).and_then(|entries| {
            let bytes = serde_json::to_vec_pretty(&entries)
                .map_err(|source| StoreError::Serialize { kind, source })?;
            replace_file(kind, &self.file_path, &bytes)
        });

        match &result {
            Ok(()) => info!(
                "event=store_write module=store status=ok kind={} records={} duration_ms={}",
                kind.as_str(),
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_write module=store status=error kind={} records={} duration_ms={} error={}",
                kind.as_str(),
                records.len(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn plain_entries<R: Record>(
    records: &BTreeMap<EntityId, R>,
) -> StoreResult<Vec<(EntityId, Value)>> {
    records
        .iter()
        .map(|(id, record)| {
            record
                .try_plain()
                .map(|plain| (*id, plain))
                .map_err(|source| StoreError::InvalidRecord {
                    kind: R::KIND,
                    id: *id,
                    source,
                })
        })
        .collect()
}

fn load_or_init<R: Record>(file_path: &Path) -> StoreResult<BTreeMap<EntityId, R>> {
    let kind = R::KIND;
    let bytes = match fs::read(file_path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            replace_file(kind, file_path, b"[]")?;
            return Ok(BTreeMap::new());
        }
        Err(source) => {
            return Err(StoreError::Io {
                kind,
                path: file_path.to_path_buf(),
                source,
            });
        }
    };

    let corrupt = |message: String| StoreError::Corrupt {
        kind,
        path: file_path.to_path_buf(),
        message,
    };

    let entries: Vec<(EntityId, Value)> =
        serde_json::from_slice(&bytes).map_err(|err| corrupt(err.to_string()))?;

    let mut records = BTreeMap::new();
    for (id, plain) in entries {
        let record = R::from_plain(plain)
            .map_err(|source| StoreError::InvalidRecord { kind, id, source })?;
        if record.id() != id {
            return Err(corrupt(format!(
                "entry key {id} does not match record id {}",
                record.id()
            )));
        }
        if records.insert(id, record).is_some() {
            return Err(corrupt(format!("duplicate entry key {id}")));
        }
    }
    Ok(records)
}

/// Writes `bytes` to a sibling temp file and renames it over `path`.
fn replace_file(kind: EntityKind, path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let io_error = |source: io::Error| StoreError::Io {
        kind,
        path: path.to_path_buf(),
        source,
    };
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, bytes).map_err(io_error)?;
    fs::rename(&tmp_path, path).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::{JsonStore, StoreError};
    use crate::model::record::{EntityId, EntityKind, Record, ValidationError};
    use serde::ser::{Error as _, SerializeStruct};
    use serde::{Deserialize, Serialize, Serializer};
    use serde_json::Value;
    use uuid::Uuid;

    #[derive(Debug, Clone, Deserialize)]
    struct Fragile {
        id: EntityId,
        broken: bool,
    }

    impl Serialize for Fragile {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if self.broken {
                return Err(S::Error::custom("field cannot be represented"));
            }
            let mut state = serializer.serialize_struct("Fragile", 2)?;
            state.serialize_field("id", &self.id)?;
            state.serialize_field("broken", &self.broken)?;
            state.end()
        }
    }

    impl Record for Fragile {
        const KIND: EntityKind = EntityKind::Class;

        fn id(&self) -> EntityId {
            self.id
        }

        fn validate(&self) -> Result<(), ValidationError> {
            Ok(())
        }
    }

    #[test]
    fn unserializable_record_is_never_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::<Fragile>::open(dir.path()).unwrap();
        let healthy = Fragile {
            id: Uuid::new_v4(),
            broken: false,
        };
        store.save(healthy.clone()).unwrap();

        let broken = Fragile {
            id: Uuid::new_v4(),
            broken: true,
        };
        assert!(matches!(
            broken.try_plain(),
            Err(ValidationError::Malformed { .. })
        ));
        assert_eq!(broken.to_plain(), Value::Null);

        let err = store.save(broken.clone()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { id, .. } if id == broken.id));
        assert_eq!(store.len(), 1);

        let reopened = JsonStore::<Fragile>::open(dir.path()).unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(reopened.find_by_id(healthy.id).is_some());
    }
}
