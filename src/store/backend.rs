use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tempfile::NamedTempFile;

use super::{Snapshot, StoreError};

/// Where the key/value document lives. Every `load` hands back an
/// independent copy; `persist` replaces the whole document in one step.
pub trait Backend: Send + Sync {
    fn load(&self) -> Result<Snapshot, StoreError>;
    fn persist(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// Process-local storage, used by tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryBackend {
    data: Mutex<Snapshot>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            data: Mutex::new(snapshot),
        }
    }
}

impl Backend for MemoryBackend {
    fn load(&self) -> Result<Snapshot, StoreError> {
        let data = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(data.clone())
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut data = self.data.lock().map_err(|_| StoreError::Poisoned)?;
        *data = snapshot.clone();
        Ok(())
    }
}

/// Single JSON document on disk. Writes go to a temp file in the same
/// directory which is then renamed over the target.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        fs::create_dir_all(parent_dir(&path))?;

        let backend = Self { path };
        // fail fast on an unreadable or malformed document
        backend.load()?;
        Ok(backend)
    }
}

impl Backend for FileBackend {
    fn load(&self) -> Result<Snapshot, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Snapshot::new()),
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(Snapshot::new());
        }

        let document: Value =
            serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
                key: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        match document {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject),
        }
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut tmp = NamedTempFile::new_in(parent_dir(&self.path))?;

        serde_json::to_writer_pretty(&mut tmp, snapshot).map_err(|e| StoreError::Encode {
            key: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;

        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_loads_as_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("nested/store.json")).unwrap();

        assert!(backend.load().unwrap().is_empty());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn persist_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("store.json")).unwrap();

        let mut first = Snapshot::new();
        first.insert("employeeData".into(), json!([{"id": "EMP1001"}]));
        first.insert("lastEmployeeId".into(), json!("1001"));
        backend.persist(&first).unwrap();

        let mut second = Snapshot::new();
        second.insert("employeeData".into(), json!([]));
        backend.persist(&second).unwrap();

        let reloaded = backend.load().unwrap();
        assert_eq!(reloaded.get("employeeData"), Some(&json!([])));
        assert!(reloaded.get("lastEmployeeId").is_none());
    }

    #[test]
    fn rejects_non_object_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(matches!(
            FileBackend::open(&path),
            Err(StoreError::NotAnObject)
        ));
    }

    #[test]
    fn rejects_truncated_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"employeeData": [{"id": "EMP"#).unwrap();

        assert!(matches!(
            FileBackend::open(&path),
            Err(StoreError::Corrupt { .. })
        ));
    }
}
