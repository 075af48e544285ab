//! Core table types: seats, players, configuration, dice randomness.
//!
//! Players are owned by the game and outlive rounds; rounds refer to them by
//! seat and mutate them only through [`Seating`].

pub mod config;
pub mod player;
pub mod rng;

pub use config::{TableConfig, DEFAULT_STARTING_DICE, MAX_PLAYERS, MIN_PLAYERS};
pub use player::{Player, PlayerId, PlayerMap, Seating};
pub use rng::{DiceSource, GameRng, GameRngState, LoadedDice};
