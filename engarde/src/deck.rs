use rand::seq::SliceRandom;
use rand::Rng;

use crate::{Card, FULL_DECK};

/// The shared draw pile of a round.
///
/// Once the last card has been drawn the deck is exhausted, and stays so
/// for the rest of the round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    /// The next card to be drawn is the last one.
    cards: Vec<Card>,
    exhausted: bool,
}

impl Deck {
    /// All 25 cards, uniformly shuffled.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = Vec::from(FULL_DECK);
        cards.shuffle(rng);
        Self {
            cards,
            exhausted: false,
        }
    }

    /// A deck in a fixed order. The last card of `cards` is drawn first.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let exhausted = cards.is_empty();
        Self { cards, exhausted }
    }

    /// Takes the next card. Drawing from an empty deck is not an error, it just yields nothing.
    pub fn draw(&mut self) -> Option<Card> {
        let card = self.cards.pop();
        if self.cards.is_empty() {
            self.exhausted = true;
        }
        card
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The remaining cards, in draw order reversed.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
