use crate::card::Card;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Calculate the blackjack value of a hand. Aces start at 11 and are reduced to 1, one at a time,
/// while the total is over 21.
pub fn hand_value(cards: &[Card]) -> u32 {
    let mut total: u32 = cards.iter().map(Card::value).sum();
    let mut aces = cards.iter().filter(|c| c.is_ace()).count();

    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    total
}

/// Check if a hand still counts one of its aces as 11
pub fn is_soft(cards: &[Card]) -> bool {
    let hard_total: u32 = cards
        .iter()
        .map(|c| if c.is_ace() { 1 } else { c.value() })
        .sum();
    cards.iter().any(Card::is_ace) && hand_value(cards) == hard_total + 10
}

pub fn is_bust(cards: &[Card]) -> bool {
    hand_value(cards) > 21
}

/// Check if a hand is a blackjack, i.e. two cards totalling 21
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_value(cards) == 21
}

/// Check if a hand is two cards of the same rank and may therefore be split
pub fn is_pair(cards: &[Card]) -> bool {
    cards.len() == 2 && cards[0] == cards[1]
}

/// A player's hand together with the stake riding on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
    pub stake: u32,
    pub doubled: bool,
    pub from_split: bool,
}

impl Hand {
    pub fn new(stake: u32) -> Self {
        Self {
            cards: Vec::new(),
            stake,
            doubled: false,
            from_split: false,
        }
    }

    /// Hand built from one card of a split pair.
    pub fn from_split(card: Card, stake: u32) -> Self {
        Self {
            cards: vec![card],
            stake,
            doubled: false,
            from_split: true,
        }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn value(&self) -> u32 {
        hand_value(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        is_bust(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    pub fn is_pair(&self) -> bool {
        is_pair(&self.cards)
    }
}

impl Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", format_cards(&self.cards), self.value())
    }
}

/// Formats cards as a bracketed list, e.g. `[A, 10]`.
pub fn format_cards(cards: &[Card]) -> String {
    let symbols = cards
        .iter()
        .map(Card::symbol)
        .collect::<Vec<&str>>()
        .join(", ");
    format!("[{}]", symbols)
}
