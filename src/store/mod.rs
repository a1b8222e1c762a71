//! Record store: named collections inside one local key/value document.
//!
//! Collections are JSON arrays of flat records. Counters and small maps sit
//! next to them under their own keys. Reads always return fresh copies; a
//! [`Transaction`] batches any number of key writes into a single atomic
//! commit of the backing document.

pub mod backend;

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use strum_macros::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

use crate::ids::{self, IdKind};

pub use backend::{Backend, FileBackend, MemoryBackend};

pub type Snapshot = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt data under `{key}`: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("failed to encode `{key}`: {reason}")]
    Encode { key: String, reason: String },

    #[error("storage document is not a JSON object")]
    NotAnObject,

    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
pub enum Collection {
    #[strum(serialize = "employeeData")]
    Employees,
    #[strum(serialize = "pendingEmployees")]
    PendingEmployees,
    #[strum(serialize = "leaveRequests")]
    LeaveRequests,
    #[strum(serialize = "overtimeRequests")]
    OvertimeRequests,
    #[strum(serialize = "cheques")]
    Cheques,
    #[strum(serialize = "paymentRecords")]
    PaymentRecords,
    #[strum(serialize = "reports")]
    Reports,
    #[strum(serialize = "attendanceRecords")]
    AttendanceRecords,
}

impl Collection {
    pub fn key(self) -> &'static str {
        self.into()
    }
}

pub struct Store {
    backend: Box<dyn Backend>,
    // serializes read-modify-write cycles across request handlers
    lock: Mutex<()>,
}

impl Store {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            lock: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self::new(FileBackend::open(path)?))
    }

    pub fn load_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, StoreError> {
        let _guard = self.guard()?;
        let snapshot = self.backend.load()?;
        read_collection(&snapshot, collection)
    }

    pub fn save_collection<T: Serialize>(
        &self,
        collection: Collection,
        items: &[T],
    ) -> Result<(), StoreError> {
        self.transaction(|tx| tx.save_collection(collection, items))
    }

    pub fn load_value<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        let _guard = self.guard()?;
        let snapshot = self.backend.load()?;
        read_value(&snapshot, key)
    }

    pub fn next_id(&self, kind: IdKind) -> Result<String, StoreError> {
        self.transaction(|tx| tx.next_id(kind))
    }

    /// Runs `f` against a private snapshot. When `f` succeeds every key it
    /// wrote is committed in one backend write; when it fails nothing is.
    pub fn transaction<R, E>(
        &self,
        f: impl FnOnce(&mut Transaction) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.guard()?;
        let mut tx = Transaction {
            snapshot: self.backend.load()?,
            dirty: false,
        };

        let out = f(&mut tx)?;

        if tx.dirty {
            self.backend.persist(&tx.snapshot)?;
        }
        Ok(out)
    }

    /// Runs `f` against one snapshot without committing, so reads that
    /// span several keys observe a single document.
    pub fn read<R, E>(&self, f: impl FnOnce(&Transaction) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.guard()?;
        let tx = Transaction {
            snapshot: self.backend.load()?,
            dirty: false,
        };
        f(&tx)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.lock.lock().map_err(|_| StoreError::Poisoned)
    }
}

pub struct Transaction {
    snapshot: Snapshot,
    dirty: bool,
}

impl Transaction {
    pub fn load_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, StoreError> {
        read_collection(&self.snapshot, collection)
    }

    pub fn save_collection<T: Serialize>(
        &mut self,
        collection: Collection,
        items: &[T],
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(items).map_err(|e| StoreError::Encode {
            key: collection.key().to_string(),
            reason: e.to_string(),
        })?;
        self.set_raw(collection.key(), value);
        Ok(())
    }

    pub fn append<T: Serialize + DeserializeOwned>(
        &mut self,
        collection: Collection,
        item: T,
    ) -> Result<(), StoreError> {
        let mut items: Vec<T> = self.load_collection(collection)?;
        items.push(item);
        self.save_collection(collection, &items)
    }

    /// Typed read of a non-collection key; absent keys yield `T::default()`.
    pub fn load_value<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        read_value(&self.snapshot, key)
    }

    pub fn save_value<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|e| StoreError::Encode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.set_raw(key, value);
        Ok(())
    }

    pub fn next_id(&mut self, kind: IdKind) -> Result<String, StoreError> {
        ids::next_id(self, kind)
    }

    pub(crate) fn raw(&self, key: &str) -> Option<&Value> {
        self.snapshot.get(key)
    }

    pub(crate) fn set_raw(&mut self, key: &str, value: Value) {
        self.snapshot.insert(key.to_string(), value);
        self.dirty = true;
    }
}

fn read_value<T: DeserializeOwned + Default>(snapshot: &Snapshot, key: &str) -> Result<T, StoreError> {
    match snapshot.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn read_collection<T: DeserializeOwned>(
    snapshot: &Snapshot,
    collection: Collection,
) -> Result<Vec<T>, StoreError> {
    let corrupt = |reason: String| StoreError::Corrupt {
        key: collection.key().to_string(),
        reason,
    };

    match snapshot.get(collection.key()) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| T::deserialize(item).map_err(|e| corrupt(e.to_string())))
            .collect(),
        // tolerate documents that stored the array as an encoded string
        Some(Value::String(text)) => {
            serde_json::from_str(text).map_err(|e| corrupt(e.to_string()))
        }
        Some(_) => Err(corrupt("expected an array".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_keys_match_storage_names() {
        assert_eq!(Collection::Employees.key(), "employeeData");
        assert_eq!(Collection::PendingEmployees.key(), "pendingEmployees");
        assert_eq!(Collection::AttendanceRecords.to_string(), "attendanceRecords");
    }

    #[test]
    fn absent_collection_reads_empty() {
        let store = Store::in_memory();
        let items: Vec<Value> = store.load_collection(Collection::Cheques).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn loads_are_independent_copies() {
        let store = Store::in_memory();
        store
            .save_collection(Collection::Reports, &[json!({"reportNo": "RPT1001"})])
            .unwrap();

        let mut first: Vec<Value> = store.load_collection(Collection::Reports).unwrap();
        first.clear();

        let second: Vec<Value> = store.load_collection(Collection::Reports).unwrap();
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn failed_transaction_writes_nothing() {
        let store = Store::in_memory();

        let result: Result<(), StoreError> = store.transaction(|tx| {
            tx.append(Collection::Employees, json!({"id": "EMP1001"}))?;
            tx.next_id(IdKind::Employee)?;
            Err(StoreError::Poisoned)
        });
        assert!(result.is_err());

        let items: Vec<Value> = store.load_collection(Collection::Employees).unwrap();
        assert!(items.is_empty());
        assert_eq!(store.next_id(IdKind::Employee).unwrap(), "EMP1001");
    }

    #[test]
    fn multi_key_commit_is_visible_together() {
        let store = Store::in_memory();
        store
            .save_collection(Collection::PendingEmployees, &[json!({"id": "EMP1001"})])
            .unwrap();

        store
            .transaction(|tx| -> Result<(), StoreError> {
                let moved: Vec<Value> = tx.load_collection(Collection::PendingEmployees)?;
                tx.save_collection(Collection::Employees, &moved)?;
                tx.save_collection::<Value>(Collection::PendingEmployees, &[])
            })
            .unwrap();

        let live: Vec<Value> = store.load_collection(Collection::Employees).unwrap();
        let pending: Vec<Value> = store.load_collection(Collection::PendingEmployees).unwrap();
        assert_eq!(live.len(), 1);
        assert!(pending.is_empty());
    }

    #[test]
    fn reads_string_encoded_arrays() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            "leaveRequests".into(),
            Value::String(r#"[{"id":"LR1001"}]"#.into()),
        );
        let store = Store::new(MemoryBackend::with_snapshot(snapshot));

        let items: Vec<Value> = store.load_collection(Collection::LeaveRequests).unwrap();
        assert_eq!(items, vec![json!({"id": "LR1001"})]);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = Store::open(&path).unwrap();
            store
                .save_collection(Collection::Employees, &[json!({"id": "EMP1001", "custom": 7})])
                .unwrap();
        }

        let store = Store::open(&path).unwrap();
        let items: Vec<Value> = store.load_collection(Collection::Employees).unwrap();
        assert_eq!(items, vec![json!({"id": "EMP1001", "custom": 7})]);
    }
}
