//! Table configuration.
//!
//! The hosting service describes a table at game setup:
//! - how many seats there are
//! - how many dice each player starts with
//!
//! The config is serde-friendly so it can be loaded from JSON alongside the
//! rest of the service configuration.

use serde::{Deserialize, Serialize};

use crate::error::RulesError;

/// Dice each player starts with unless configured otherwise.
pub const DEFAULT_STARTING_DICE: u8 = 5;

/// Fewest seats a game of Liar's Dice makes sense with.
pub const MIN_PLAYERS: usize = 2;

/// Most seats a `PlayerId` can address.
pub const MAX_PLAYERS: usize = 255;

fn default_starting_dice() -> u8 {
    DEFAULT_STARTING_DICE
}

/// Complete table configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    /// Number of seats (2-255).
    pub player_count: usize,

    /// Dice per player at the start of the game.
    #[serde(default = "default_starting_dice")]
    pub starting_dice: u8,
}

impl TableConfig {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            starting_dice: DEFAULT_STARTING_DICE,
        }
    }

    #[must_use]
    pub fn with_starting_dice(mut self, dice: u8) -> Self {
        self.starting_dice = dice;
        self
    }

    /// Check the config describes a playable table.
    pub fn validate(&self) -> Result<(), RulesError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(RulesError::InvalidArgument(format!(
                "player count must be {MIN_PLAYERS}-{MAX_PLAYERS}, got {}",
                self.player_count
            )));
        }
        if self.starting_dice == 0 {
            return Err(RulesError::InvalidArgument(
                "starting dice must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = TableConfig::new(4).with_starting_dice(3);
        assert_eq!(config.player_count, 4);
        assert_eq!(config.starting_dice, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_dice() {
        assert_eq!(TableConfig::new(2).starting_dice, DEFAULT_STARTING_DICE);
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        assert!(TableConfig::new(1).validate().is_err());
        assert!(TableConfig::new(256).validate().is_err());
        assert!(TableConfig::new(3).with_starting_dice(0).validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: TableConfig = serde_json::from_str(r#"{"playerCount": 6}"#).unwrap();
        assert_eq!(config, TableConfig::new(6));

        let config: TableConfig =
            serde_json::from_str(r#"{"playerCount": 3, "startingDice": 2}"#).unwrap();
        assert_eq!(config.starting_dice, 2);
    }
}
