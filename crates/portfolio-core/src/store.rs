use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, StoreError};

// ---------------------------------------------------------------------------
// MissingFile
// ---------------------------------------------------------------------------

/// What `load` does when the backing file does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFile {
    /// Treat the collection as empty; the first save creates the file.
    #[default]
    Empty,
    /// Report `StoreError::StorageMissing`; the file must be created with
    /// `init` first.
    Error,
}

// ---------------------------------------------------------------------------
// DocumentStore
// ---------------------------------------------------------------------------

/// One JSON array document on disk holding a whole collection.
///
/// Every access goes through a single mutex, so a read-modify-write span in
/// `modify` is exclusive with every other load and save on the same store.
/// The lock only covers this process: another process writing the same
/// file can still lose updates.
///
/// Saves truncate and rewrite the file in place. A crash mid-write leaves a
/// corrupt document, which the next load reads as an empty collection. A
/// valid array holding an element that does not deserialize is reported as
/// `StoreError::Json` and the file is left as it is.
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    missing: MissingFile,
    lock: Mutex<()>,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>, missing: MissingFile) -> Self {
        Self {
            path: path.into(),
            missing,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let _guard = self.acquire()?;
        self.load_unlocked()
    }

    pub fn save<T: Serialize>(&self, records: &[T]) -> Result<()> {
        let _guard = self.acquire()?;
        self.save_unlocked(records)
    }

    /// Load the collection and hand it to `f` without writing anything back.
    pub fn read<T, U>(&self, f: impl FnOnce(Vec<T>) -> Result<U>) -> Result<U>
    where
        T: DeserializeOwned,
    {
        let _guard = self.acquire()?;
        f(self.load_unlocked()?)
    }

    /// Load, mutate and save under the store lock. If `f` fails the file
    /// is left untouched.
    pub fn modify<T, U>(&self, f: impl FnOnce(&mut Vec<T>) -> Result<U>) -> Result<U>
    where
        T: Serialize + DeserializeOwned,
    {
        let _guard = self.acquire()?;
        let mut records = self.load_unlocked()?;
        let out = f(&mut records)?;
        self.save_unlocked(&records)?;
        Ok(out)
    }

    /// Write an empty array if the file does not exist. Returns true if written.
    pub fn init(&self) -> Result<bool> {
        let _guard = self.acquire()?;
        if self.path.exists() {
            return Ok(false);
        }
        self.save_unlocked::<serde_json::Value>(&[])?;
        Ok(true)
    }

    fn acquire(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned("document store"))
    }

    fn load_unlocked<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return match self.missing {
                    MissingFile::Empty => Ok(Vec::new()),
                    MissingFile::Error => Err(StoreError::StorageMissing(self.path.clone())),
                };
            }
            Err(e) => return Err(e.into()),
        };

        // Unparseable text or a non-array document reads as empty. The next
        // save overwrites it.
        let elements = match serde_json::from_slice::<serde_json::Value>(&data) {
            Ok(serde_json::Value::Array(elements)) => elements,
            Ok(_) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "collection document is not an array; treating as empty"
                );
                return Ok(Vec::new());
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "collection document is not valid JSON; treating as empty"
                );
                return Ok(Vec::new());
            }
        };

        // A bad element in a well-formed array is an error, not an empty
        // collection.
        elements
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()
            .map_err(|e| {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "collection document holds an invalid record"
                );
                StoreError::Json(e)
            })
    }

    fn save_unlocked<T: Serialize>(&self, records: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut ser)?;
        std::fs::write(&self.path, buf)?;
        Ok(())
    }
}
