//! Autoplay: many sessions played by a betting strategy and the dealer's own rules, summarized.

use crate::strategy::{BettingStrategy, DealerMimic};
use crate::write::{self, OutputFormat};
use crate::{SimulationError, SimulationSummary};
use blackjack_lib::{BlackjackGameError, GameConfig, GameSession};
use std::collections::HashSet;
use std::fmt::Display;
use std::io::Write;
use std::sync::mpsc;
use std::thread;

pub trait BlackjackSimulation: Send {
    /// Required method, plays one full session and returns what it recorded.
    fn run_single_simulation(&mut self) -> Result<SimulationSummary, SimulationError>;
    /// Required method, the name the summaries of this simulation are reported under.
    fn label(&self) -> String;
}

/// Struct for running a number of simulations for a specific betting strategy.
/// Every session starts from the configured bankroll and a freshly built shoe, and plays until the
/// round limit is reached or the bankroll no longer covers the minimum bet.
pub struct BlackjackSimulator<B> {
    betting: B,
    config: SimulatorConfig,
    simulations_run: u32,
}

impl<B: BettingStrategy + Display + Send> BlackjackSimulator<B> {
    pub fn new(betting: B, config: SimulatorConfig) -> Self {
        BlackjackSimulator {
            betting,
            config,
            simulations_run: 0,
        }
    }

    fn session(&self) -> Result<GameSession, BlackjackGameError> {
        match self.config.seed {
            Some(seed) => {
                GameSession::seeded(self.config.game, seed.wrapping_add(self.simulations_run as u64))
            }
            None => GameSession::new(self.config.game),
        }
    }

    /// Runs all configured simulations and returns their combined summary.
    pub fn run(&mut self) -> Result<SimulationSummary, SimulationError> {
        let mut total = SimulationSummary::new(self.label());
        for i in 0..self.config.num_simulations {
            let summary = self.run_single_simulation()?;
            if !self.config.silent {
                println!("simulation #{}\n{}", i + 1, summary);
            }
            total.merge(summary);
        }
        Ok(total)
    }
}

impl<B: BettingStrategy + Display + Send> BlackjackSimulation for BlackjackSimulator<B> {
    fn run_single_simulation(&mut self) -> Result<SimulationSummary, SimulationError> {
        let mut session = self.session()?;
        let mut summary = SimulationSummary::new(self.label());
        let min_bet = session.min_bet();

        for _ in 0..self.config.rounds_per_simulation {
            if !session.can_continue() {
                summary.early_endings += 1;
                break;
            }
            let bankroll = session.bankroll();
            let bet = self
                .betting
                .bet(session.running_count(), session.true_count(), bankroll)
                .max(min_bet)
                .min(bankroll);
            let outcome = session.play_round(bet, &mut DealerMimic)?;
            summary.record(&outcome);
        }

        summary.final_bankrolls.push(session.bankroll());
        self.simulations_run += 1;
        log::debug!(
            "{}: simulation #{} ended after {} rounds with bankroll {}",
            summary.label,
            self.simulations_run,
            summary.rounds,
            session.bankroll()
        );
        Ok(summary)
    }

    fn label(&self) -> String {
        self.betting.to_string()
    }
}

/// This struct is for testing multiple betting strategies against the same game configuration.
/// Each strategy is run on its own thread and every finished session is sent to a writer thread.
pub struct MulStrategyBlackjackSimulator {
    simulations: Vec<Box<dyn BlackjackSimulation>>,
    pub config: SimulatorConfig,
}

impl MulStrategyBlackjackSimulator {
    /// Method that returns a new `MulStrategyBlackjackSimulatorBuilder` object.
    pub fn new(config: SimulatorConfig) -> MulStrategyBlackjackSimulatorBuilder {
        MulStrategyBlackjackSimulatorBuilder {
            simulations: None,
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    /// Runs every strategy, each on a new thread, and writes one aggregated summary per strategy
    /// to `out` once all of them have finished.
    pub fn run(
        &mut self,
        out: Box<dyn Write + Send + 'static>,
        format: OutputFormat,
    ) -> Result<(), SimulationError> {
        let (write_sender, write_receiver) = mpsc::channel::<(Option<SimulationSummary>, usize)>();
        let ids: HashSet<usize> = (1..=self.simulations.len()).collect();
        let write_handle =
            thread::spawn(move || write::write_summaries(write_receiver, ids, out, format));

        let mut handles = vec![];
        for (i, mut simulation) in self.simulations.drain(..).enumerate() {
            let id = i + 1;
            let sender = write_sender.clone();
            let num_simulations = self.config.num_simulations;
            let handle = thread::spawn(move || -> Result<(), SimulationError> {
                for _ in 0..num_simulations {
                    let summary = simulation.run_single_simulation()?;
                    if sender.send((Some(summary), id)).is_err() {
                        log::warn!("writer hung up before simulation #{} finished", id);
                        return Ok(());
                    }
                }
                // A closed channel here only means the writer already stopped.
                let _ = sender.send((None, id));
                Ok(())
            });
            handles.push((id, handle));
        }
        drop(write_sender);

        let mut result = Ok(());
        for (id, handle) in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    log::error!("error occurred for simulation #{}: {}", id, e);
                    result = result.and(Err(e));
                }
                Err(_) => result = result.and(Err(SimulationError::ThreadPanicked(id))),
            }
        }

        let written = write_handle
            .join()
            .map_err(|_| SimulationError::ThreadPanicked(0))?;
        result.and(written)
    }
}

/// Struct for building a `MulStrategyBlackjackSimulator` object
pub struct MulStrategyBlackjackSimulatorBuilder {
    simulations: Option<Vec<Box<dyn BlackjackSimulation>>>,
    config: SimulatorConfig,
}

impl MulStrategyBlackjackSimulatorBuilder {
    /// Adds a simulation for `betting`, configured from the `SimulatorConfig` given at creation.
    pub fn simulation<B>(&mut self, betting: B) -> &mut Self
    where
        B: BettingStrategy + Display + Send + 'static,
    {
        let simulation: Box<dyn BlackjackSimulation> =
            Box::new(BlackjackSimulator::new(betting, self.config));
        self.simulations.get_or_insert_with(Vec::new).push(simulation);
        self
    }

    pub fn build(&mut self) -> MulStrategyBlackjackSimulator {
        MulStrategyBlackjackSimulator {
            simulations: self.simulations.take().unwrap_or_default(),
            config: self.config,
        }
    }
}

/// Struct for configuring a `BlackjackSimulator`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    pub game: GameConfig,
    pub num_simulations: u32,
    pub rounds_per_simulation: u32,
    /// When set, simulation `n` of every strategy plays from a shoe seeded with `seed + n`.
    pub seed: Option<u64>,
    pub silent: bool,
}

impl SimulatorConfig {
    /// Associated method for returning a new `SimulatorConfigBuilder`.
    pub fn new() -> SimulatorConfigBuilder {
        SimulatorConfigBuilder {
            game: None,
            num_simulations: None,
            rounds_per_simulation: None,
            seed: None,
            silent: None,
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            game: GameConfig::default(),
            num_simulations: 100,
            rounds_per_simulation: 50,
            seed: None,
            silent: true,
        }
    }
}

/// Struct to implement builder pattern for `SimulatorConfig`
#[derive(Debug, Clone, Copy)]
pub struct SimulatorConfigBuilder {
    game: Option<GameConfig>,
    num_simulations: Option<u32>,
    rounds_per_simulation: Option<u32>,
    seed: Option<u64>,
    silent: Option<bool>,
}

impl SimulatorConfigBuilder {
    pub fn game(&mut self, game: GameConfig) -> &mut Self {
        self.game = Some(game);
        self
    }

    /// Method for setting the number of sessions played per strategy.
    pub fn num_simulations(&mut self, n: u32) -> &mut Self {
        self.num_simulations = Some(n);
        self
    }

    /// Method for setting the maximum number of rounds played in each session.
    pub fn rounds_per_simulation(&mut self, rounds: u32) -> &mut Self {
        self.rounds_per_simulation = Some(rounds);
        self
    }

    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// If set to false every finished session prints its own summary.
    pub fn silent(&mut self, silent: bool) -> &mut Self {
        self.silent = Some(silent);
        self
    }

    /// Builds the configuration, failing if the game configuration is not playable.
    pub fn build(&mut self) -> Result<SimulatorConfig, BlackjackGameError> {
        let defaults = SimulatorConfig::default();
        let config = SimulatorConfig {
            game: self.game.unwrap_or(defaults.game),
            num_simulations: self.num_simulations.unwrap_or(defaults.num_simulations),
            rounds_per_simulation: self
                .rounds_per_simulation
                .unwrap_or(defaults.rounds_per_simulation),
            seed: self.seed.or(defaults.seed),
            silent: self.silent.unwrap_or(defaults.silent),
        };
        config.game.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{FlatBetting, MarginBettingStrategy};

    fn config(num_simulations: u32, rounds: u32) -> SimulatorConfig {
        SimulatorConfig::new()
            .num_simulations(num_simulations)
            .rounds_per_simulation(rounds)
            .seed(42)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_rejects_unplayable_game() {
        let game = GameConfig {
            min_bet: 0,
            ..GameConfig::default()
        };
        assert!(SimulatorConfig::new().game(game).build().is_err());
    }

    #[test]
    fn single_simulation_respects_round_limit() {
        let mut simulator = BlackjackSimulator::new(FlatBetting::new(10), config(1, 25));
        let summary = simulator.run_single_simulation().unwrap();
        assert!(summary.rounds <= 25);
        assert!(summary.total_hands() >= summary.rounds);
        assert_eq!(summary.final_bankrolls.len(), 1);
        assert_eq!(
            summary.winnings,
            summary.final_bankrolls[0] as i64 - 1000
        );
        if summary.rounds < 25 {
            assert_eq!(summary.early_endings, 1);
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut a = BlackjackSimulator::new(MarginBettingStrategy::new(2.0, 10), config(3, 40));
        let mut b = BlackjackSimulator::new(MarginBettingStrategy::new(2.0, 10), config(3, 40));
        assert_eq!(a.run().unwrap(), b.run().unwrap());
    }

    #[test]
    fn run_aggregates_every_simulation() {
        let mut simulator = BlackjackSimulator::new(FlatBetting::new(10), config(4, 10));
        let summary = simulator.run().unwrap();
        assert_eq!(summary.label, "flat 10");
        assert_eq!(summary.final_bankrolls.len(), 4);
    }

    #[test]
    fn builder_collects_simulations() {
        let simulator = MulStrategyBlackjackSimulator::new(config(1, 1))
            .simulation(FlatBetting::new(10))
            .simulation(MarginBettingStrategy::new(3.0, 10))
            .build();
        assert_eq!(simulator.len(), 2);
    }
}
