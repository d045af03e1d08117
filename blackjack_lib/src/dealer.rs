use crate::card::Card;
use crate::hand::hand_value;
use crate::shoe::Shoe;

/// Value at which the dealer stops drawing.
pub const DEALER_STANDS_ON: u32 = 17;

/// Trait for the fixed rule the dealer plays by. Only `should_hit()` is required, `play()` draws
/// from the shoe until the rule says to stand.
pub trait DealerPolicy {
    fn should_hit(&self, cards: &[Card]) -> bool;

    /// Plays out the dealer's hand, returning the number of cards drawn.
    fn play(&self, cards: &mut Vec<Card>, shoe: &mut Shoe) -> usize {
        let mut drawn = 0;
        while self.should_hit(cards) {
            cards.push(shoe.draw());
            drawn += 1;
        }
        drawn
    }
}

/// The dealer hits below 17 and stands on every 17, soft or hard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandOnAll17;

impl DealerPolicy for StandOnAll17 {
    fn should_hit(&self, cards: &[Card]) -> bool {
        hand_value(cards) < DEALER_STANDS_ON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Card::*;

    fn stacked(draws: &[Card]) -> Shoe {
        let mut cards = vec![Nine; 20];
        cards.extend(draws.iter().rev());
        Shoe::from_cards(1, cards, 0)
    }

    #[test]
    fn stands_on_soft_seventeen() {
        let mut shoe = stacked(&[]);
        let mut hand = vec![Ace, Six];
        assert_eq!(StandOnAll17.play(&mut hand, &mut shoe), 0);
        assert_eq!(hand, vec![Ace, Six]);
    }

    #[test]
    fn hits_until_seventeen_or_more() {
        let mut shoe = stacked(&[Two, Three, Four]);
        let mut hand = vec![Six, Five];
        // 11 -> 13 -> 16 -> 20
        assert_eq!(StandOnAll17.play(&mut hand, &mut shoe), 3);
        assert_eq!(hand_value(&hand), 20);
    }

    #[test]
    fn stops_when_busted() {
        let mut shoe = stacked(&[King]);
        let mut hand = vec![Ten, Six];
        StandOnAll17.play(&mut hand, &mut shoe);
        assert_eq!(hand, vec![Ten, Six, King]);
        assert_eq!(hand_value(&hand), 26);
    }

    #[test]
    fn soft_hand_reduces_before_deciding() {
        // A + 5 = soft 16 hits, K makes hard 16 and hits again.
        let mut shoe = stacked(&[King, Three]);
        let mut hand = vec![Ace, Five];
        assert_eq!(StandOnAll17.play(&mut hand, &mut shoe), 2);
        assert_eq!(hand_value(&hand), 19);
    }
}
