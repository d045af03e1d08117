//! Strategies used by the autoplay simulator: how much to bet and how to play a hand.

use blackjack_lib::{Action, DecisionContext, DecisionMaker};
use std::fmt::Display;

/// Trait for a generic betting strategy, deciding the bet for the next round from the count and the bankroll.
pub trait BettingStrategy {
    fn bet(&self, running_count: i32, true_count: f32, bankroll: u32) -> u32;
}

impl<B: BettingStrategy + ?Sized> BettingStrategy for Box<B> {
    fn bet(&self, running_count: i32, true_count: f32, bankroll: u32) -> u32 {
        (**self).bet(running_count, true_count, bankroll)
    }
}

/// Always bets the table minimum.
#[derive(Debug, Clone, Copy)]
pub struct FlatBetting {
    min_bet: u32,
}

impl FlatBetting {
    pub fn new(min_bet: u32) -> FlatBetting {
        FlatBetting { min_bet }
    }
}

impl BettingStrategy for FlatBetting {
    fn bet(&self, _running_count: i32, _true_count: f32, bankroll: u32) -> u32 {
        u32::min(bankroll, self.min_bet)
    }
}

impl Display for FlatBetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "flat {}", self.min_bet)
    }
}

/// Struct that encapsulates the logic needed for a simple margin based betting strategy, i.e. for each
/// positive value that the true count takes it will compute the bet as
/// `self.min_bet` * `self.margin` * ceil(true_count)
#[derive(Debug, Clone, Copy)]
pub struct MarginBettingStrategy {
    margin: f32,
    min_bet: u32,
}

impl MarginBettingStrategy {
    /// Associated method for returning a new `MarginBettingStrategy` struct
    pub fn new(margin: f32, min_bet: u32) -> MarginBettingStrategy {
        MarginBettingStrategy { margin, min_bet }
    }
}

impl BettingStrategy for MarginBettingStrategy {
    /// Returns the bet based on the true count, if the true count is greater than zero the product of
    /// the rounded up true count, the minimum bet and the margin is returned
    fn bet(&self, _running_count: i32, true_count: f32, bankroll: u32) -> u32 {
        if true_count > 0.0 {
            let scalar = f32::ceil(true_count);
            let bet = ((self.min_bet as f32) * scalar * self.margin) as u32;
            u32::min(bankroll, u32::max(bet, self.min_bet))
        } else {
            u32::min(bankroll, self.min_bet)
        }
    }
}

impl Display for MarginBettingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hi-lo margin x{:.1}", self.margin)
    }
}

/// Plays every hand the way the dealer must: hit below 17, otherwise stand. Never doubles or splits.
#[derive(Debug, Clone, Copy, Default)]
pub struct DealerMimic;

impl DecisionMaker for DealerMimic {
    fn decide(&mut self, context: &DecisionContext<'_>) -> Action {
        if context.hand.value() < 17 {
            Action::Hit
        } else {
            Action::Stand
        }
    }
}
