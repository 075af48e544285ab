//! Round events.
//!
//! The engine describes what happened; delivering it to clients is someone
//! else's job. A hosting service plugs in an [`EventSink`] that forwards
//! events to its notification layer.
//!
//! Events fire only after a transition has been persisted, in the order the
//! transition produced them.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::bid::Call;
use crate::dice::DiceRoll;
use crate::round::{RoundKey, RoundOutcome};

/// Something that happened in a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// A player's dice were rolled at round start. One per seat, in seat order.
    RollCreated { round: RoundKey, roll: DiceRoll },

    /// A bid or challenge was recorded.
    CallRecorded { round: RoundKey, call: Call },

    /// A challenge was resolved and a player lost a die.
    RoundEnded(RoundOutcome),
}

impl RoundEvent {
    /// The round this event belongs to.
    #[must_use]
    pub fn round(&self) -> RoundKey {
        match self {
            RoundEvent::RollCreated { round, .. } | RoundEvent::CallRecorded { round, .. } => {
                *round
            }
            RoundEvent::RoundEnded(outcome) => outcome.round,
        }
    }
}

/// Receives events as transitions complete.
///
/// A [`SharedRound`](crate::engine::SharedRound) emits while holding its
/// lock, which is not reentrant. A sink must not call back into the round
/// that emitted the event (`snapshot()`, `bidder()`, ...) or it deadlocks.
/// Everything needed is carried by the event; forward it and read later.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: RoundEvent);
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardEvents;

impl EventSink for DiscardEvents {
    fn emit(&self, _event: RoundEvent) {}
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<RoundEvent>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything emitted so far.
    #[must_use]
    pub fn events(&self) -> Vec<RoundEvent> {
        self.events.lock().clone()
    }

    /// Take everything emitted so far.
    pub fn drain(&self) -> Vec<RoundEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: RoundEvent) {
        self.events.lock().push(event);
    }
}
