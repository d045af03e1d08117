use crate::config::GameConfig;
use crate::dealer::{DealerPolicy, StandOnAll17};
use crate::error::BlackjackGameError;
use crate::round::{DecisionMaker, RoundEngine, RoundOutcome};
use crate::shoe::Shoe;

/// Starts a session with `num_decks` decks and the standard bankroll and minimum bet.
pub fn new_game(num_decks: usize) -> GameSession {
    let config = GameConfig {
        num_decks: num_decks.max(1),
        ..GameConfig::default()
    };
    GameSession::assemble(config, Shoe::new(config.num_decks), StandOnAll17)
}

/// Struct that owns everything that lives longer than a round: the shoe with its running count,
/// the bankroll and the dealer's policy. All mutation goes through `play_round()`.
#[derive(Debug, Clone)]
pub struct GameSession<P: DealerPolicy = StandOnAll17> {
    config: GameConfig,
    shoe: Shoe,
    bankroll: u32,
    dealer: P,
    rounds_played: u32,
}

impl GameSession<StandOnAll17> {
    /// Associated method for building a session from a validated configuration, with an entropy seeded shoe.
    pub fn new(config: GameConfig) -> Result<Self, BlackjackGameError> {
        config.validate()?;
        Ok(GameSession::assemble(
            config,
            Shoe::new(config.num_decks),
            StandOnAll17,
        ))
    }

    /// Same as `new()` but every shuffle of the shoe is determined by `seed`.
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, BlackjackGameError> {
        config.validate()?;
        Ok(GameSession::assemble(
            config,
            Shoe::with_seed(config.num_decks, seed),
            StandOnAll17,
        ))
    }

    /// Builds a session around an existing shoe. The shoe takes the configured reshuffle threshold.
    pub fn with_shoe(config: GameConfig, shoe: Shoe) -> Result<Self, BlackjackGameError> {
        GameSession::with_policy(config, shoe, StandOnAll17)
    }
}

impl<P: DealerPolicy> GameSession<P> {
    /// Builds a session around an existing shoe and dealer policy. The configuration is validated
    /// and the shoe must hold the configured number of decks.
    pub fn with_policy(
        config: GameConfig,
        shoe: Shoe,
        dealer: P,
    ) -> Result<Self, BlackjackGameError> {
        config.validate()?;
        if shoe.num_decks() != config.num_decks {
            return Err(BlackjackGameError::InvalidConfig(format!(
                "shoe has {} decks but {} are configured",
                shoe.num_decks(),
                config.num_decks
            )));
        }
        Ok(GameSession::assemble(config, shoe, dealer))
    }

    fn assemble(config: GameConfig, shoe: Shoe, dealer: P) -> Self {
        GameSession {
            bankroll: config.starting_bankroll,
            shoe: shoe.reshuffle_threshold(config.reshuffle_threshold),
            config,
            dealer,
            rounds_played: 0,
        }
    }

    /// Plays a single round for `bet`, asking `decider` how to play each hand.
    /// An out of range bet is returned as `BlackjackGameError::InvalidBet` and nothing changes.
    pub fn play_round<D: DecisionMaker + ?Sized>(
        &mut self,
        bet: u32,
        decider: &mut D,
    ) -> Result<RoundOutcome, BlackjackGameError> {
        let outcome = RoundEngine::new(
            &mut self.shoe,
            &mut self.bankroll,
            &self.dealer,
            self.config.min_bet,
            self.config.stake_accounting,
        )
        .play(bet, decider)?;
        self.rounds_played += 1;
        Ok(outcome)
    }

    pub fn bankroll(&self) -> u32 {
        self.bankroll
    }

    pub fn running_count(&self) -> i32 {
        self.shoe.running_count()
    }

    pub fn true_count(&self) -> f32 {
        self.shoe.true_count()
    }

    pub fn min_bet(&self) -> u32 {
        self.config.min_bet
    }

    /// Whether the bankroll still covers the table minimum.
    pub fn can_continue(&self) -> bool {
        self.bankroll >= self.config.min_bet
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
