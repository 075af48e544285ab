//! Persistence collaborator.
//!
//! Each transition is committed to a [`RoundStore`] before it is applied in
//! memory. If the store refuses, the transition is abandoned and nothing has
//! changed.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::bid::Call;
use crate::dice::DiceRoll;
use crate::error::StoreError;
use crate::round::{RoundKey, RoundOutcome};

/// A state change to be made durable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Started { round: RoundKey, rolls: Vec<DiceRoll> },
    CallRecorded { round: RoundKey, call: Call },
    Finished { outcome: RoundOutcome },
}

impl Transition {
    #[must_use]
    pub fn round(&self) -> RoundKey {
        match self {
            Transition::Started { round, .. } | Transition::CallRecorded { round, .. } => *round,
            Transition::Finished { outcome } => outcome.round,
        }
    }
}

/// Makes transitions durable. Returning `Ok` acknowledges the commit.
pub trait RoundStore: Send + Sync {
    fn commit(&self, transition: &Transition) -> Result<(), StoreError>;
}

/// Store that acknowledges everything and keeps nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStore;

impl RoundStore for NullStore {
    fn commit(&self, _transition: &Transition) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Records {
    by_round: FxHashMap<RoundKey, Vec<Vec<u8>>>,
    fail_next: Option<String>,
}

/// In-memory store keeping bincode-encoded records per round.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<Records>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse the next commit with `StoreError::Unavailable(reason)`.
    pub fn fail_next_commit(&self, reason: impl Into<String>) {
        self.records.lock().fail_next = Some(reason.into());
    }

    /// Decode every committed transition for a round, in commit order.
    pub fn transitions(&self, round: RoundKey) -> Result<Vec<Transition>, StoreError> {
        let records = self.records.lock();
        records
            .by_round
            .get(&round)
            .map(|encoded| {
                encoded
                    .iter()
                    .map(|bytes| {
                        bincode::deserialize(bytes).map_err(|e| StoreError::Decode(e.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    /// Number of committed transitions for a round.
    #[must_use]
    pub fn record_count(&self, round: RoundKey) -> usize {
        self.records.lock().by_round.get(&round).map_or(0, Vec::len)
    }
}

impl RoundStore for InMemoryStore {
    fn commit(&self, transition: &Transition) -> Result<(), StoreError> {
        let mut records = self.records.lock();
        if let Some(reason) = records.fail_next.take() {
            return Err(StoreError::Unavailable(reason));
        }
        let bytes = bincode::serialize(transition).map_err(|e| StoreError::Encode(e.to_string()))?;
        records
            .by_round
            .entry(transition.round())
            .or_default()
            .push(bytes);
        Ok(())
    }
}
