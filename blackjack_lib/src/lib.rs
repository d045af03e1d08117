//! Core of a single player blackjack game played from a shuffled multi-deck shoe.
//!
//! A `GameSession` owns the shoe (and with it the Hi-Lo running count) and the bankroll. Each call
//! to `GameSession::play_round()` runs one round through the `RoundEngine`: the bet is taken, cards
//! are dealt, the player's decisions are requested through a `DecisionMaker`, the dealer plays out
//! by a fixed `DealerPolicy` and every hand is paid.

pub mod card;
pub mod config;
pub mod dealer;
pub mod error;
pub mod hand;
pub mod round;
pub mod session;
pub mod shoe;

pub use card::{Card, ParseCardError};
pub use config::{GameConfig, GameConfigBuilder, StakeAccounting};
pub use dealer::{DealerPolicy, StandOnAll17};
pub use error::BlackjackGameError;
pub use hand::{format_cards, hand_value, is_blackjack, is_bust, is_pair, is_soft, Hand};
pub use round::{
    Action, DecisionContext, DecisionMaker, HandOutcome, HandResult, Round, RoundEngine,
    RoundOutcome, RoundPhase,
};
pub use session::{new_game, GameSession};
pub use shoe::{Shoe, CARDS_PER_DECK, DEFAULT_RESHUFFLE_THRESHOLD};

pub mod prelude {
    pub use super::{
        new_game, Action, BlackjackGameError, Card, DecisionContext, DecisionMaker, GameConfig,
        GameSession, HandResult, RoundOutcome, Shoe, StakeAccounting,
    };
}
