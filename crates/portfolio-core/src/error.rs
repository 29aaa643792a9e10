use std::path::PathBuf;
use thiserror::Error;

use crate::record::RecordId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: RecordId },

    #[error("storage file not found: {}", .0.display())]
    StorageMissing(PathBuf),

    #[error("no free id left in range {low}..={high}")]
    IdSpaceExhausted { low: RecordId, high: RecordId },

    #[error("lock poisoned: {0}")]
    LockPoisoned(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
