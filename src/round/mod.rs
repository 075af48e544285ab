//! Round state machine and turn rotation.
//!
//! A [`Round`] on its own only validates and records; persistence, event
//! emission and locking are layered on by [`crate::engine`].

pub mod rotation;
pub mod state;

pub use rotation::{bidder, next_player};
pub use state::{OnesWild, Round, RoundKey, RoundOutcome, RoundPhase, RoundView};
