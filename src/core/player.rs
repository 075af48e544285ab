//! Players, seats and per-seat storage.
//!
//! ## PlayerId
//!
//! A player is identified by their seat index (0-based, unique within a game).
//!
//! ## PlayerMap
//!
//! Dense per-seat storage backed by `Vec` for O(1) access.
//!
//! ## Seating
//!
//! Every player of a game in seat order. Players who run out of dice keep
//! their seat; turn rotation skips them.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::config::{TableConfig, MAX_PLAYERS, MIN_PLAYERS};
use crate::dice::DiceRoll;
use crate::error::RulesError;

/// Seat index of a player, supporting up to 255 seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    /// Get the seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats of a game with `player_count` players.
    ///
    /// ```
    /// use liars_dice::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ```
/// use liars_dice::core::{PlayerId, PlayerMap};
///
/// let mut dice: PlayerMap<u8> = PlayerMap::with_value(4, 5);
/// dice[PlayerId::new(1)] -= 1;
/// assert_eq!(dice[PlayerId::new(1)], 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();

        Self { data }
    }

    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Check whether a seat exists in this map.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Build a map with the same seats, one derived value per seat.
    pub fn map<U>(&self, f: impl Fn(PlayerId, &T) -> U) -> PlayerMap<U> {
        PlayerMap {
            data: self.iter().map(|(seat, value)| f(seat, value)).collect(),
        }
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// A seated player.
///
/// Owned by the game; rounds only reference players by seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    seat: PlayerId,
    dice_count: u8,
    roll: Option<DiceRoll>,
}

impl Player {
    #[must_use]
    pub fn new(seat: PlayerId, dice_count: u8) -> Self {
        Self {
            seat,
            dice_count,
            roll: None,
        }
    }

    #[must_use]
    pub fn seat(&self) -> PlayerId {
        self.seat
    }

    /// Dice remaining.
    #[must_use]
    pub fn dice_count(&self) -> u8 {
        self.dice_count
    }

    #[must_use]
    pub fn has_dice(&self) -> bool {
        self.dice_count > 0
    }

    /// The player's roll for the active round, if one has been rolled.
    #[must_use]
    pub fn roll(&self) -> Option<&DiceRoll> {
        self.roll.as_ref()
    }

    pub(crate) fn set_roll(&mut self, roll: DiceRoll) {
        self.roll = Some(roll);
    }

    /// Remove one die. Returns false if the player had none left.
    pub(crate) fn lose_die(&mut self) -> bool {
        match self.dice_count.checked_sub(1) {
            Some(remaining) => {
                self.dice_count = remaining;
                true
            }
            None => false,
        }
    }
}

/// All players of a game, in seat order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seating {
    players: PlayerMap<Player>,
}

impl Seating {
    /// Seat `config.player_count` players with `config.starting_dice` each.
    pub fn from_config(config: &TableConfig) -> Result<Self, RulesError> {
        config.validate()?;
        Ok(Self {
            players: PlayerMap::new(config.player_count, |seat| {
                Player::new(seat, config.starting_dice)
            }),
        })
    }

    /// Seat players with explicit dice counts, one entry per seat.
    pub fn with_dice_counts(dice_counts: &[u8]) -> Result<Self, RulesError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&dice_counts.len()) {
            return Err(RulesError::InvalidArgument(format!(
                "player count must be {MIN_PLAYERS}-{MAX_PLAYERS}, got {}",
                dice_counts.len()
            )));
        }
        Ok(Self {
            players: PlayerMap::new(dice_counts.len(), |seat| {
                Player::new(seat, dice_counts[seat.index()])
            }),
        })
    }

    /// Total number of seats, including players without dice.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Look up a player, failing for a seat that does not exist.
    pub fn player(&self, seat: PlayerId) -> Result<&Player, RulesError> {
        if self.players.contains(seat) {
            Ok(&self.players[seat])
        } else {
            Err(RulesError::InvalidArgument(format!("unknown seat {}", seat.0)))
        }
    }

    pub(crate) fn player_mut(&mut self, seat: PlayerId) -> Result<&mut Player, RulesError> {
        if self.players.contains(seat) {
            Ok(&mut self.players[seat])
        } else {
            Err(RulesError::InvalidArgument(format!("unknown seat {}", seat.0)))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// One derived value for every seat.
    pub fn per_seat<U>(&self, f: impl Fn(&Player) -> U) -> PlayerMap<U> {
        self.players.map(|_, player| f(player))
    }

    /// Players still holding dice.
    pub fn remaining_players(&self) -> impl Iterator<Item = &Player> {
        self.iter().filter(|p| p.has_dice())
    }

    /// The last player holding dice, once everyone else is out.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        let mut remaining = self.remaining_players();
        match (remaining.next(), remaining.next()) {
            (Some(only), None) => Some(only.seat()),
            _ => None,
        }
    }
}
