//! One round of blackjack, from the bet to the payout.
//!
//! A round moves through `AwaitingBet -> Dealt -> PlayerActing -> DealerActing -> Resolved`.
//! Player decisions are pulled from a `DecisionMaker` one at a time and each legal decision is a
//! single transition on the `Round`.

use crate::card::Card;
use crate::config::StakeAccounting;
use crate::dealer::DealerPolicy;
use crate::error::BlackjackGameError;
use crate::hand::{hand_value, Hand};
use crate::shoe::Shoe;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::Display;

/// A decision the player can make on their active hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Hit => "hit",
            Action::Stand => "stand",
            Action::Double => "double",
            Action::Split => "split",
        };
        write!(f, "{}", name)
    }
}

/// Where a round currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingBet,
    Dealt,
    /// `hand` is the position the active hand will take among the finished hands.
    PlayerActing { hand: usize },
    DealerActing,
    Resolved,
}

/// Everything a decision maker may look at before choosing how to play the active hand.
#[derive(Debug)]
pub struct DecisionContext<'a> {
    pub hand: &'a Hand,
    pub hand_index: usize,
    pub dealer_up_card: Card,
    pub bankroll: u32,
    pub running_count: i32,
    pub true_count: f32,
    pub legal_actions: &'a [Action],
}

impl<'a> DecisionContext<'a> {
    pub fn allows(&self, action: Action) -> bool {
        self.legal_actions.contains(&action)
    }
}

/// Trait for anything that can choose how the player's hands are played. The returned action
/// should be one of `context.legal_actions`; anything else is passed back through `rejected()`
/// and the decision is asked for again.
pub trait DecisionMaker {
    fn decide(&mut self, context: &DecisionContext<'_>) -> Action;

    fn rejected(&mut self, _action: Action, _error: &BlackjackGameError) {}
}

impl<F> DecisionMaker for F
where
    F: FnMut(&DecisionContext<'_>) -> Action,
{
    fn decide(&mut self, context: &DecisionContext<'_>) -> Action {
        self(context)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandResult {
    Blackjack,
    Win,
    Push,
    Loss,
    Bust,
}

impl Display for HandResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HandResult::Blackjack => "BLACKJACK",
            HandResult::Win => "WON",
            HandResult::Push => "PUSH",
            HandResult::Loss => "LOST",
            HandResult::Bust => "BUST",
        };
        write!(f, "{}", name)
    }
}

/// Settlement of a single finished hand. `amount` is what was credited back to the bankroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandOutcome {
    pub cards: Vec<Card>,
    pub stake: u32,
    pub result: HandResult,
    pub amount: u32,
}

impl HandOutcome {
    pub fn value(&self) -> u32 {
        hand_value(&self.cards)
    }

    pub fn net(&self) -> i64 {
        self.amount as i64 - self.stake as i64
    }
}

/// The record of a resolved round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub hands: Vec<HandOutcome>,
    pub dealer_cards: Vec<Card>,
    pub dealer_value: u32,
    pub wagered: u32,
    pub bankroll_before: u32,
    pub bankroll_after: u32,
    pub reshuffled: bool,
}

impl RoundOutcome {
    /// Change in bankroll over the whole round, relative to before the bet was placed.
    pub fn net(&self) -> i64 {
        self.bankroll_after as i64 - self.bankroll_before as i64
    }
}

/// State of a round in progress.
#[derive(Debug, Clone)]
pub struct Round {
    phase: RoundPhase,
    wagered: u32,
    /// Opening bet plus every double. Split stakes are not added, and this is what an even split
    /// divides between the final hands.
    round_bet: u32,
    pending: VecDeque<Hand>,
    finished: Vec<Hand>,
    dealer: Vec<Card>,
}

impl Default for Round {
    fn default() -> Self {
        Round::new()
    }
}

impl Round {
    /// An empty round waiting on a bet.
    pub fn new() -> Round {
        Round {
            phase: RoundPhase::AwaitingBet,
            wagered: 0,
            round_bet: 0,
            pending: VecDeque::new(),
            finished: Vec::new(),
            dealer: Vec::new(),
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// The hand waiting on a decision, if any.
    pub fn active_hand(&self) -> Option<&Hand> {
        match self.phase {
            RoundPhase::PlayerActing { .. } => self.pending.front(),
            _ => None,
        }
    }

    pub fn dealer_up_card(&self) -> Option<Card> {
        self.dealer.first().copied()
    }

    pub fn dealer_cards(&self) -> &[Card] {
        &self.dealer
    }

    pub fn finished_hands(&self) -> &[Hand] {
        &self.finished
    }

    /// Total staked on the round so far, including doubles and splits.
    pub fn wagered(&self) -> u32 {
        self.wagered
    }

    /// Takes the bet out of `bankroll` and deals two cards each to the player and the dealer, in
    /// the order player, player, dealer, dealer. A bet outside `[min_bet, bankroll]` is rejected
    /// with nothing changed.
    pub fn place_bet(
        &mut self,
        bet: u32,
        min_bet: u32,
        bankroll: &mut u32,
        shoe: &mut Shoe,
    ) -> Result<(), BlackjackGameError> {
        if self.phase != RoundPhase::AwaitingBet {
            return Err(BlackjackGameError::wrong_phase("place a bet", self.phase));
        }
        if bet < min_bet || bet > *bankroll {
            return Err(BlackjackGameError::InvalidBet {
                bet,
                min: min_bet,
                max: *bankroll,
            });
        }

        *bankroll -= bet;
        self.wagered = bet;
        self.round_bet = bet;

        let mut hand = Hand::new(bet);
        hand.add_card(shoe.draw());
        hand.add_card(shoe.draw());
        self.dealer.push(shoe.draw());
        self.dealer.push(shoe.draw());
        self.pending.push_back(hand);
        self.phase = RoundPhase::Dealt;
        Ok(())
    }

    /// Hands the dealt cards over to the player. A natural needs no decision and goes straight
    /// to the dealer.
    pub fn start_play(&mut self) -> Result<(), BlackjackGameError> {
        if self.phase != RoundPhase::Dealt {
            return Err(BlackjackGameError::wrong_phase("start play", self.phase));
        }
        self.advance();
        Ok(())
    }

    /// Places the bet and starts play in one go.
    pub fn open(
        bet: u32,
        min_bet: u32,
        bankroll: &mut u32,
        shoe: &mut Shoe,
    ) -> Result<Round, BlackjackGameError> {
        let mut round = Round::new();
        round.place_bet(bet, min_bet, bankroll, shoe)?;
        round.start_play()?;
        Ok(round)
    }

    /// Actions that may be offered for the active hand given the current bankroll.
    pub fn legal_actions(&self, bankroll: u32) -> Vec<Action> {
        let hand = match self.active_hand() {
            Some(hand) => hand,
            None => return Vec::new(),
        };

        let mut actions = vec![Action::Hit, Action::Stand];
        if hand.cards.len() == 2 && bankroll >= hand.stake {
            actions.push(Action::Double);
        }
        if hand.is_pair() && bankroll >= hand.stake {
            actions.push(Action::Split);
        }
        actions
    }

    /// Applies `action` to the active hand. An action that is not legal right now is rejected and
    /// leaves the round exactly as it was.
    pub fn apply(
        &mut self,
        action: Action,
        bankroll: &mut u32,
        shoe: &mut Shoe,
    ) -> Result<(), BlackjackGameError> {
        if !matches!(self.phase, RoundPhase::PlayerActing { .. }) {
            return Err(BlackjackGameError::invalid_action(
                action,
                "no hand is waiting on a decision",
            ));
        }
        if !self.legal_actions(*bankroll).contains(&action) {
            let reason = match action {
                Action::Double => "doubling needs a two card hand and enough bankroll to match its stake",
                Action::Split => "splitting needs a pair and enough bankroll to match its stake",
                Action::Hit | Action::Stand => "hand is already finished",
            };
            return Err(BlackjackGameError::invalid_action(action, reason));
        }

        match action {
            Action::Hit => {
                let card = shoe.draw();
                let busted = match self.pending.front_mut() {
                    Some(hand) => {
                        hand.add_card(card);
                        hand.is_bust()
                    }
                    None => false,
                };
                if busted {
                    self.finish_active();
                }
            }
            Action::Stand => self.finish_active(),
            Action::Double => {
                if let Some(hand) = self.pending.front_mut() {
                    *bankroll -= hand.stake;
                    self.wagered += hand.stake;
                    self.round_bet += hand.stake;
                    hand.stake *= 2;
                    hand.doubled = true;
                    hand.add_card(shoe.draw());
                }
                self.finish_active();
            }
            Action::Split => {
                if let Some(hand) = self.pending.pop_front() {
                    *bankroll -= hand.stake;
                    self.wagered += hand.stake;
                    let mut first = Hand::from_split(hand.cards[0], hand.stake);
                    first.add_card(shoe.draw());
                    let mut second = Hand::from_split(hand.cards[1], hand.stake);
                    second.add_card(shoe.draw());
                    log::trace!("split into {} and {}", first, second);
                    self.pending.push_back(first);
                    self.pending.push_back(second);
                }
                self.advance();
            }
        }
        Ok(())
    }

    /// Moves the active hand to the finished hands and activates the next one.
    fn finish_active(&mut self) {
        if let Some(hand) = self.pending.pop_front() {
            self.finished.push(hand);
        }
        self.advance();
    }

    /// Finalizes any natural blackjack at the front of the pending hands, then either waits on the
    /// next hand or hands over to the dealer.
    fn advance(&mut self) {
        while let Some(hand) = self.pending.front() {
            if !hand.is_blackjack() {
                self.phase = RoundPhase::PlayerActing {
                    hand: self.finished.len(),
                };
                return;
            }
            if let Some(hand) = self.pending.pop_front() {
                self.finished.push(hand);
            }
        }
        self.phase = RoundPhase::DealerActing;
    }

    /// Plays the dealer's hand out. The dealer always plays, even when every player hand busted.
    pub fn play_dealer<P: DealerPolicy + ?Sized>(
        &mut self,
        policy: &P,
        shoe: &mut Shoe,
    ) -> Result<(), BlackjackGameError> {
        if self.phase != RoundPhase::DealerActing {
            return Err(BlackjackGameError::wrong_phase("play the dealer", self.phase));
        }
        policy.play(&mut self.dealer, shoe);
        Ok(())
    }

    /// Settles every finished hand against the dealer and credits the winnings to `bankroll`.
    pub fn resolve(
        &mut self,
        accounting: StakeAccounting,
        bankroll: &mut u32,
    ) -> Result<Vec<HandOutcome>, BlackjackGameError> {
        if self.phase != RoundPhase::DealerActing {
            return Err(BlackjackGameError::wrong_phase("resolve the round", self.phase));
        }

        let dealer_value = hand_value(&self.dealer);
        let even_stake = self.round_bet / (self.finished.len().max(1) as u32);

        let outcomes = self
            .finished
            .iter()
            .map(|hand| {
                let stake = match accounting {
                    StakeAccounting::EvenSplit => even_stake,
                    StakeAccounting::PerHand => hand.stake,
                };
                let (result, amount) = settle(hand, stake, dealer_value);
                *bankroll = bankroll.saturating_add(amount);
                log::trace!("{} against dealer {}: {} {}", hand, dealer_value, result, amount);
                HandOutcome {
                    cards: hand.cards.clone(),
                    stake,
                    result,
                    amount,
                }
            })
            .collect();

        self.phase = RoundPhase::Resolved;
        Ok(outcomes)
    }
}

/// Result of a single hand and the amount returned to the player for it. Amounts that do not
/// fit a `u32` are capped at `u32::MAX`.
fn settle(hand: &Hand, stake: u32, dealer_value: u32) -> (HandResult, u32) {
    let value = hand.value();
    let stake = u64::from(stake);
    let (result, amount) = if value > 21 {
        (HandResult::Bust, 0)
    } else if hand.is_blackjack() && dealer_value != 21 {
        // 3:2, rounded down
        (HandResult::Blackjack, stake + stake * 3 / 2)
    } else if dealer_value > 21 || value > dealer_value {
        (HandResult::Win, stake * 2)
    } else if value == dealer_value {
        (HandResult::Push, stake)
    } else {
        (HandResult::Loss, 0)
    };
    (result, u32::try_from(amount).unwrap_or(u32::MAX))
}

/// Drives a `Round` from bet to payout against a shoe, a bankroll and a dealer policy.
pub struct RoundEngine<'a, P: DealerPolicy + ?Sized> {
    shoe: &'a mut Shoe,
    bankroll: &'a mut u32,
    policy: &'a P,
    min_bet: u32,
    accounting: StakeAccounting,
}

impl<'a, P: DealerPolicy + ?Sized> RoundEngine<'a, P> {
    pub fn new(
        shoe: &'a mut Shoe,
        bankroll: &'a mut u32,
        policy: &'a P,
        min_bet: u32,
        accounting: StakeAccounting,
    ) -> Self {
        RoundEngine {
            shoe,
            bankroll,
            policy,
            min_bet,
            accounting,
        }
    }

    /// Plays one full round. An out of range bet fails with nothing about the shoe or the
    /// bankroll changed.
    pub fn play<D: DecisionMaker + ?Sized>(
        mut self,
        bet: u32,
        decider: &mut D,
    ) -> Result<RoundOutcome, BlackjackGameError> {
        let bankroll_before = *self.bankroll;
        let shuffles_before = self.shoe.times_shuffled();

        let mut round = Round::open(bet, self.min_bet, self.bankroll, self.shoe)?;
        log::debug!(
            "bet {} placed, dealer shows {:?}",
            bet,
            round.dealer_up_card()
        );

        while let RoundPhase::PlayerActing { hand: hand_index } = round.phase() {
            let legal_actions = round.legal_actions(*self.bankroll);
            let action = match (round.active_hand(), round.dealer_up_card()) {
                (Some(hand), Some(dealer_up_card)) => {
                    let context = DecisionContext {
                        hand,
                        hand_index,
                        dealer_up_card,
                        bankroll: *self.bankroll,
                        running_count: self.shoe.running_count(),
                        true_count: self.shoe.true_count(),
                        legal_actions: &legal_actions,
                    };
                    decider.decide(&context)
                }
                _ => break,
            };

            if let Err(e) = round.apply(action, self.bankroll, self.shoe) {
                log::debug!("rejected decision: {}", e);
                decider.rejected(action, &e);
            }
        }

        round.play_dealer(self.policy, self.shoe)?;
        let hands = round.resolve(self.accounting, self.bankroll)?;
        let dealer_value = hand_value(round.dealer_cards());

        log::debug!(
            "round resolved: {} hand(s), dealer {}, bankroll {} -> {}",
            hands.len(),
            dealer_value,
            bankroll_before,
            self.bankroll
        );

        Ok(RoundOutcome {
            hands,
            dealer_cards: round.dealer_cards().to_vec(),
            dealer_value,
            wagered: round.wagered(),
            bankroll_before,
            bankroll_after: *self.bankroll,
            reshuffled: self.shoe.times_shuffled() != shuffles_before,
        })
    }
}
