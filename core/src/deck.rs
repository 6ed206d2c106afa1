use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// How many copies of each number go into a deck, per color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckRule {
    /// One zero and two of each 1..=9, used to fill the rows.
    Board,
    /// One zero and one of each 1..=9, used for the scratchable player cells.
    Player,
}

impl DeckRule {
    pub const fn copies_of(self, number: u8) -> usize {
        match (self, number) {
            (_, 0) => 1,
            (Self::Board, _) => 2,
            (Self::Player, _) => 1,
        }
    }

    pub fn deck_size(self) -> usize {
        let per_color: usize = (0..=MAX_CARD_NUMBER).map(|n| self.copies_of(n)).sum();
        per_color * CardColor::ALL.len()
    }
}

/// Ordered cards, drawn from the back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Unshuffled deck built from `rule`.
    pub fn new(rule: DeckRule) -> Self {
        let mut cards = Vec::with_capacity(rule.deck_size());
        for color in CardColor::ALL {
            for number in 0..=MAX_CARD_NUMBER {
                for _ in 0..rule.copies_of(number) {
                    cards.push(Card::new_unchecked(color, number));
                }
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: Rng + ?Sized>(rule: DeckRule, rng: &mut R) -> Self {
        let mut deck = Self::new(rule);
        deck.shuffle(rng);
        deck
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// In-place Fisher–Yates, each position swaps with one drawn uniformly from `0..=i`.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 0..self.cards.len() {
            let j = rng.random_range(0..=i);
            self.cards.swap(i, j);
        }
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Result<Card> {
        self.cards.pop().ok_or(GameError::DeckExhausted)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sorted(mut cards: Vec<Card>) -> Vec<Card> {
        cards.sort();
        cards
    }

    #[test]
    fn board_rule_has_76_cards() {
        let deck = Deck::new(DeckRule::Board);

        assert_eq!(deck.remaining(), 76);
        assert_eq!(DeckRule::Board.deck_size(), 76);
        for color in CardColor::ALL {
            let zero = Card::new_unchecked(color, 0);
            assert_eq!(deck.cards().iter().filter(|&&c| c == zero).count(), 1);
            for number in 1..=9 {
                let card = Card::new_unchecked(color, number);
                assert_eq!(deck.cards().iter().filter(|&&c| c == card).count(), 2);
            }
        }
    }

    #[test]
    fn player_rule_has_40_distinct_cards() {
        let deck = Deck::new(DeckRule::Player);
        let mut cards = deck.cards().to_vec();
        cards.sort();
        cards.dedup();

        assert_eq!(deck.remaining(), 40);
        assert_eq!(cards.len(), 40);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = SmallRng::seed_from_u64(7);
        for cards in [
            Vec::new(),
            vec![Card::new_unchecked(CardColor::Green, 4)],
            Deck::new(DeckRule::Board).cards().to_vec(),
        ] {
            let mut deck = Deck::from_cards(cards.clone());
            deck.shuffle(&mut rng);
            assert_eq!(deck.remaining(), cards.len());
            assert_eq!(sorted(deck.cards().to_vec()), sorted(cards));
        }
    }

    #[test]
    fn shuffle_changes_order_for_large_deck() {
        let mut rng = SmallRng::seed_from_u64(42);
        let deck = Deck::shuffled(DeckRule::Board, &mut rng);

        assert_ne!(deck, Deck::new(DeckRule::Board));
    }

    #[test]
    fn draw_takes_from_top_until_exhausted() {
        let first = Card::new_unchecked(CardColor::Red, 1);
        let last = Card::new_unchecked(CardColor::Yellow, 9);
        let mut deck = Deck::from_cards(vec![first, last]);

        assert_eq!(deck.draw(), Ok(last));
        assert_eq!(deck.draw(), Ok(first));
        assert_eq!(deck.draw(), Err(GameError::DeckExhausted));
        assert_eq!(deck.draw(), Err(GameError::DeckExhausted));
        assert_eq!(deck.remaining(), 0);
    }
}
