pub mod console;
pub mod sim;
pub mod strategy;
pub mod write;

use blackjack_lib::{BlackjackGameError, HandResult, RoundOutcome};
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

pub use console::ConsoleSession;
pub use sim::{
    BlackjackSimulation, BlackjackSimulator, MulStrategyBlackjackSimulator,
    MulStrategyBlackjackSimulatorBuilder, SimulatorConfig, SimulatorConfigBuilder,
};
pub use write::OutputFormat;

pub mod prelude {
    pub use super::{
        strategy::{BettingStrategy, DealerMimic, FlatBetting, MarginBettingStrategy},
        BlackjackSimulation, BlackjackSimulator, ConsoleSession, MulStrategyBlackjackSimulator,
        MulStrategyBlackjackSimulatorBuilder, OutputFormat, SimulationError, SimulationSummary,
        SimulatorConfig, SimulatorConfigBuilder,
    };
}

/// Errors raised while driving games from the console or the simulator.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Game(#[from] BlackjackGameError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("simulation thread #{0} panicked")]
    ThreadPanicked(usize),
}

/// Simple struct for recording all of the interesting data points accumulated during a simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub label: String,
    pub wins: u32,
    pub pushes: u32,
    pub losses: u32,
    pub busts: u32,
    pub player_blackjacks: u32,
    pub winnings: i64,
    pub rounds: u32,
    pub early_endings: u32,
    pub final_bankrolls: Vec<u32>,
}

impl SimulationSummary {
    pub fn new(label: impl Into<String>) -> Self {
        SimulationSummary {
            label: label.into(),
            ..SimulationSummary::default()
        }
    }

    /// Adds the hands of a finished round to the tally.
    pub fn record(&mut self, outcome: &RoundOutcome) {
        self.rounds += 1;
        self.winnings += outcome.net();
        for hand in &outcome.hands {
            match hand.result {
                HandResult::Blackjack => {
                    self.wins += 1;
                    self.player_blackjacks += 1;
                }
                HandResult::Win => self.wins += 1,
                HandResult::Push => self.pushes += 1,
                HandResult::Loss => self.losses += 1,
                HandResult::Bust => self.busts += 1,
            }
        }
    }

    /// Folds `other` into `self`, keeping `self`'s label.
    pub fn merge(&mut self, other: SimulationSummary) {
        self.wins += other.wins;
        self.pushes += other.pushes;
        self.losses += other.losses;
        self.busts += other.busts;
        self.player_blackjacks += other.player_blackjacks;
        self.winnings += other.winnings;
        self.rounds += other.rounds;
        self.early_endings += other.early_endings;
        self.final_bankrolls.extend(other.final_bankrolls);
    }

    pub fn total_hands(&self) -> u32 {
        self.wins + self.pushes + self.losses + self.busts
    }

    fn ratio(numerator: f64, denominator: u32) -> f64 {
        if denominator == 0 {
            0.0
        } else {
            numerator / denominator as f64
        }
    }
}

impl Display for SimulationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WIDTH: usize = 80;
        const TEXT_WIDTH: usize = "number of player blackjacks".len() + 20;
        const NUM_WIDTH: usize = WIDTH - TEXT_WIDTH;
        let total_hands = self.total_hands();
        let average_bankroll = Self::ratio(
            self.final_bankrolls.iter().map(|b| *b as f64).sum(),
            self.final_bankrolls.len() as u32,
        );

        writeln!(f, "strategy: {}", self.label)?;
        let counts = [
            ("hands won", self.wins),
            ("hands pushed", self.pushes),
            ("hands lost", self.losses),
            ("hands busted", self.busts),
            ("number of player blackjacks", self.player_blackjacks),
            ("number of early endings", self.early_endings),
            ("rounds played", self.rounds),
            ("total hands played", total_hands),
        ];
        for (text, count) in counts {
            writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", text, count)?;
        }
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "winnings", self.winnings)?;

        let ratios = [
            ("win percentage", Self::ratio(self.wins as f64, total_hands)),
            ("push percentage", Self::ratio(self.pushes as f64, total_hands)),
            (
                "loss percentage",
                Self::ratio((self.losses + self.busts) as f64, total_hands),
            ),
            (
                "average winnings per round",
                Self::ratio(self.winnings as f64, self.rounds),
            ),
            ("average final bankroll", average_bankroll),
        ];
        for (text, ratio) in ratios {
            writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}", text, ratio)?;
        }
        Ok(())
    }
}
