//! # liars-dice
//!
//! Rules engine for Liar's Dice rounds.
//!
//! Players hold hidden dice and take turns raising a bid on how many dice
//! across the whole table show a face. Anyone may call BS on the standing
//! bid, which ends the round: the dice are counted and either the bidder or
//! the challenger loses a die.
//!
//! ## Rules Implemented
//!
//! 1. **Strict raises**: a bid must beat the standing bid by quantity, or by
//!    face at equal quantity. Illegal bids are recorded, flagged, and lose
//!    automatically if challenged.
//!
//! 2. **Wild ones**: ones count toward every other face until someone bids
//!    on ones. After that they are plain ones for the rest of the round.
//!
//! 3. **Elimination**: players out of dice keep their seat and are skipped
//!    in turn rotation.
//!
//! ## Modules
//!
//! - `core`: seats, players, table configuration, dice randomness
//! - `dice`: face values and rolled dice
//! - `bid`: bids, calls and their client projections
//! - `round`: the round state machine and turn rotation
//! - `events`: events emitted as rounds progress
//! - `store`: the persistence seam
//! - `engine`: round operations for a hosting service, with per-round locking

pub mod bid;
pub mod core;
pub mod dice;
pub mod engine;
pub mod error;
pub mod events;
pub mod round;
pub mod store;

pub use crate::core::{
    DiceSource, GameRng, GameRngState, LoadedDice, Player, PlayerId, PlayerMap, Seating,
    TableConfig,
};

pub use crate::dice::{DiceRoll, FaceValue};

pub use crate::bid::{Bid, Call, CallKind, CallView};

pub use crate::round::{
    bidder, next_player, OnesWild, Round, RoundKey, RoundOutcome, RoundPhase, RoundView,
};

pub use crate::events::{DiscardEvents, EventLog, EventSink, RoundEvent};

pub use crate::store::{InMemoryStore, NullStore, RoundStore, Transition};

pub use crate::engine::{RoundSession, SharedRound};

pub use crate::error::{RulesError, StoreError};
