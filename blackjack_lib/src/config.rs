use crate::error::BlackjackGameError;
use crate::shoe::DEFAULT_RESHUFFLE_THRESHOLD;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NUM_DECKS: usize = 6;
pub const DEFAULT_STARTING_BANKROLL: u32 = 1000;
pub const DEFAULT_MIN_BET: u32 = 10;

/// How the stakes of a round are attributed to its final hands at payout time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeAccounting {
    /// Everything wagered in the round is divided evenly (integer division) across the final hands.
    #[default]
    EvenSplit,
    /// Each hand settles the stake actually placed on it.
    PerHand,
}

/// Struct for configuring a `GameSession`. Deserializes from partial JSON, missing fields take
/// their standard values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub num_decks: usize,
    pub starting_bankroll: u32,
    pub min_bet: u32,
    pub reshuffle_threshold: usize,
    pub stake_accounting: StakeAccounting,
}

impl GameConfig {
    /// Associated method for returning a new `GameConfigBuilder`, allowing any of the standard
    /// values to be overridden before building.
    pub fn new() -> GameConfigBuilder {
        GameConfigBuilder {
            num_decks: None,
            starting_bankroll: None,
            min_bet: None,
            reshuffle_threshold: None,
            stake_accounting: None,
        }
    }

    /// Checks the configuration describes a playable game.
    pub fn validate(&self) -> Result<(), BlackjackGameError> {
        if self.num_decks == 0 {
            return Err(BlackjackGameError::InvalidConfig(
                "at least one deck is required".to_string(),
            ));
        }
        if self.min_bet == 0 {
            return Err(BlackjackGameError::InvalidConfig(
                "minimum bet must be positive".to_string(),
            ));
        }
        if self.starting_bankroll < self.min_bet {
            return Err(BlackjackGameError::InvalidConfig(format!(
                "starting bankroll {} is below the minimum bet {}",
                self.starting_bankroll, self.min_bet
            )));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    /// Six decks, a bankroll of 1000 and a minimum bet of 10.
    fn default() -> Self {
        GameConfig {
            num_decks: DEFAULT_NUM_DECKS,
            starting_bankroll: DEFAULT_STARTING_BANKROLL,
            min_bet: DEFAULT_MIN_BET,
            reshuffle_threshold: DEFAULT_RESHUFFLE_THRESHOLD,
            stake_accounting: StakeAccounting::EvenSplit,
        }
    }
}

/// Struct to implement the builder pattern for `GameConfig`
#[derive(Debug, Clone, Copy)]
pub struct GameConfigBuilder {
    num_decks: Option<usize>,
    starting_bankroll: Option<u32>,
    min_bet: Option<u32>,
    reshuffle_threshold: Option<usize>,
    stake_accounting: Option<StakeAccounting>,
}

impl GameConfigBuilder {
    pub fn num_decks(&mut self, decks: usize) -> &mut Self {
        self.num_decks = Some(decks);
        self
    }

    pub fn starting_bankroll(&mut self, bankroll: u32) -> &mut Self {
        self.starting_bankroll = Some(bankroll);
        self
    }

    pub fn min_bet(&mut self, bet: u32) -> &mut Self {
        self.min_bet = Some(bet);
        self
    }

    /// Method for setting how few cards may remain before the shoe is rebuilt.
    pub fn reshuffle_threshold(&mut self, threshold: usize) -> &mut Self {
        self.reshuffle_threshold = Some(threshold);
        self
    }

    pub fn stake_accounting(&mut self, accounting: StakeAccounting) -> &mut Self {
        self.stake_accounting = Some(accounting);
        self
    }

    /// Method for building a `GameConfig`, failing if the resulting configuration is unplayable.
    pub fn build(&mut self) -> Result<GameConfig, BlackjackGameError> {
        let defaults = GameConfig::default();
        let config = GameConfig {
            num_decks: self.num_decks.unwrap_or(defaults.num_decks),
            starting_bankroll: self.starting_bankroll.unwrap_or(defaults.starting_bankroll),
            min_bet: self.min_bet.unwrap_or(defaults.min_bet),
            reshuffle_threshold: self
                .reshuffle_threshold
                .unwrap_or(defaults.reshuffle_threshold),
            stake_accounting: self.stake_accounting.unwrap_or(defaults.stake_accounting),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let config = GameConfig::new().build().unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.num_decks, 6);
        assert_eq!(config.starting_bankroll, 1000);
        assert_eq!(config.min_bet, 10);
        assert_eq!(config.reshuffle_threshold, 15);
    }

    #[test]
    fn builder_overrides() {
        let config = GameConfig::new()
            .num_decks(2)
            .starting_bankroll(500)
            .stake_accounting(StakeAccounting::PerHand)
            .build()
            .unwrap();
        assert_eq!(config.num_decks, 2);
        assert_eq!(config.starting_bankroll, 500);
        assert_eq!(config.stake_accounting, StakeAccounting::PerHand);
    }

    #[test]
    fn rejects_unplayable_configs() {
        assert!(GameConfig::new().num_decks(0).build().is_err());
        assert!(GameConfig::new().min_bet(0).build().is_err());
        assert!(matches!(
            GameConfig::new().starting_bankroll(5).build(),
            Err(BlackjackGameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn deserializes_partial_json() {
        let config: GameConfig =
            serde_json::from_str(r#"{"num_decks": 2, "stake_accounting": "per_hand"}"#).unwrap();
        assert_eq!(config.num_decks, 2);
        assert_eq!(config.min_bet, 10);
        assert_eq!(config.stake_accounting, StakeAccounting::PerHand);
    }
}
