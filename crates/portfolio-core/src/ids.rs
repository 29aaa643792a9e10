use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Result, StoreError};
use crate::record::RecordId;

pub const RANDOM_ID_MIN: RecordId = 1;
pub const RANDOM_ID_MAX: RecordId = 10_000;

/// Chooses the id for a record about to be created, given every id already
/// in the collection.
pub trait IdPolicy: Send + Sync {
    fn next_id(&self, existing: &[RecordId]) -> Result<RecordId>;
}

// ---------------------------------------------------------------------------
// Sequential
// ---------------------------------------------------------------------------

/// `max(existing) + 1`, or `1` for an empty collection. Ids freed by a
/// delete are reused only when the maximum itself was removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sequential;

impl IdPolicy for Sequential {
    fn next_id(&self, existing: &[RecordId]) -> Result<RecordId> {
        match existing.iter().max() {
            None => Ok(1),
            Some(&max) => max.checked_add(1).ok_or(StoreError::IdSpaceExhausted {
                low: 1,
                high: RecordId::MAX,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// RandomRange
// ---------------------------------------------------------------------------

/// Uniformly random id in `low..=high`, redrawn until it is unused.
#[derive(Debug, Clone, Copy)]
pub struct RandomRange {
    low: RecordId,
    high: RecordId,
}

impl RandomRange {
    /// Panics if `low > high`.
    pub fn new(low: RecordId, high: RecordId) -> Self {
        assert!(low <= high, "empty id range {low}..={high}");
        Self { low, high }
    }
}

impl Default for RandomRange {
    fn default() -> Self {
        Self::new(RANDOM_ID_MIN, RANDOM_ID_MAX)
    }
}

impl IdPolicy for RandomRange {
    fn next_id(&self, existing: &[RecordId]) -> Result<RecordId> {
        let taken: HashSet<RecordId> = existing
            .iter()
            .copied()
            .filter(|id| (self.low..=self.high).contains(id))
            .collect();

        // The retry loop only terminates while a free slot remains.
        let span = self.high.abs_diff(self.low).saturating_add(1);
        if taken.len() as u64 >= span {
            return Err(StoreError::IdSpaceExhausted {
                low: self.low,
                high: self.high,
            });
        }

        let mut rng = rand::thread_rng();
        loop {
            let candidate = rng.gen_range(self.low..=self.high);
            if !taken.contains(&candidate) {
                return Ok(candidate);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// IdStrategy: config-facing selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    #[default]
    Sequential,
    Random,
}

impl IdStrategy {
    pub fn policy(self) -> Box<dyn IdPolicy> {
        match self {
            IdStrategy::Sequential => Box::new(Sequential),
            IdStrategy::Random => Box::new(RandomRange::default()),
        }
    }
}
