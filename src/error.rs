//! Error types for round operations.
//!
//! Illegal-but-well-formed moves are not errors: they are recorded on the
//! call with `legal = false`. Errors here are caller bugs (wrong phase, bad
//! input) or a persistence refusal, and every one of them leaves the round
//! untouched.

use thiserror::Error;

use crate::round::RoundPhase;

/// Errors returned by round operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// An operation was invoked in a state that forbids it.
    #[error("unable to {operation}: {reason}")]
    Usage {
        operation: &'static str,
        reason: &'static str,
    },

    /// Malformed input to a pure computation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Start was invoked on a round that is not in the not-started phase.
    #[error("unable to start round in phase {phase:?}")]
    Start { phase: RoundPhase },

    /// Turn rotation found no seat with dice remaining.
    #[error("no player with dice remaining")]
    NoEligiblePlayer,

    /// The persistence collaborator refused the transition.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RulesError {
    pub(crate) fn usage(operation: &'static str, reason: &'static str) -> Self {
        Self::Usage { operation, reason }
    }

    /// True for errors the caller caused by invoking an operation out of phase.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. } | Self::Start { .. })
    }
}

/// Errors raised by a [`RoundStore`](crate::store::RoundStore).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("failed to encode record: {0}")]
    Encode(String),

    #[error("failed to decode record: {0}")]
    Decode(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
