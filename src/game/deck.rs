use rand::{Rng, seq::SliceRandom};
use thiserror::Error;

use super::entities::{Card, Suit};

#[derive(Debug, Error, Eq, PartialEq)]
pub enum DeckError {
    #[error("tried to deal {requested} cards but only {remaining} remain")]
    NotEnoughCards { requested: usize, remaining: usize },
}

/// A single 52-card deck. Cards are dealt from the front and are not
/// replaced until the next `reset`.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    next: usize,
}

impl Deck {
    #[must_use]
    pub fn new() -> Self {
        let mut deck = Self {
            cards: Vec::with_capacity(52),
            next: 0,
        };
        deck.reset();
        deck
    }

    /// Rebuilds the full 52-card deck in unshuffled order.
    pub fn reset(&mut self) {
        self.cards.clear();
        for value in 2..=14 {
            for suit in Suit::ALL {
                self.cards.push(Card(value, suit));
            }
        }
        self.next = 0;
    }

    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.next = 0;
    }

    /// Deals `n` cards from the top of the deck.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(DeckError::NotEnoughCards {
                requested: n,
                remaining,
            });
        }
        let dealt = self.cards[self.next..self.next + n].to_vec();
        self.next += n;
        Ok(dealt)
    }

    pub fn deal_one(&mut self) -> Result<Card, DeckError> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Err(DeckError::NotEnoughCards {
                requested: 1,
                remaining,
            });
        }
        let card = self.cards[self.next];
        self.next += 1;
        Ok(card)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.next
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};
    use std::collections::HashSet;

    #[test]
    fn test_fresh_deck_has_52_unique_cards() {
        let mut deck = Deck::new();
        let cards = deck.deal(52).unwrap();
        let unique: HashSet<Card> = cards.iter().copied().collect();
        assert_eq!(unique.len(), 52);
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn test_deal_past_end_errors() {
        let mut deck = Deck::new();
        deck.deal(50).unwrap();
        assert_eq!(
            deck.deal(3),
            Err(DeckError::NotEnoughCards {
                requested: 3,
                remaining: 2
            })
        );
        // A failed deal consumes nothing.
        assert_eq!(deck.remaining(), 2);
        deck.deal(2).unwrap();
        assert!(deck.deal_one().is_err());
    }

    #[test]
    fn test_reset_restores_full_deck() {
        let mut deck = Deck::new();
        deck.deal(30).unwrap();
        deck.reset();
        assert_eq!(deck.remaining(), 52);
    }

    #[test]
    fn test_shuffle_is_deterministic_per_seed() {
        let mut rng1 = SmallRng::seed_from_u64(7);
        let mut rng2 = SmallRng::seed_from_u64(7);
        let mut deck1 = Deck::new();
        let mut deck2 = Deck::new();
        deck1.shuffle(&mut rng1);
        deck2.shuffle(&mut rng2);
        assert_eq!(deck1.deal(52).unwrap(), deck2.deal(52).unwrap());
    }

    #[test]
    fn test_shuffle_preserves_card_set() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut deck = Deck::new();
        deck.shuffle(&mut rng);
        let cards: HashSet<Card> = deck.deal(52).unwrap().into_iter().collect();
        assert_eq!(cards.len(), 52);
    }
}
