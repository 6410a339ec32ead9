use serde::{Deserialize, Serialize};

/// The lowest value printed on a card.
pub const MIN_CARD_VALUE: u8 = 1;
/// The highest value printed on a card.
pub const MAX_CARD_VALUE: u8 = 5;
/// How many copies of each value the deck contains.
pub const COPIES_PER_VALUE: usize = 5;
/// The number of cards in play during one round.
pub const DECK_SIZE: usize = COPIES_PER_VALUE * MAX_CARD_VALUE as usize;

/// A numbered fencing card.
///
/// The value is used both as a number of steps on the piste and as the
/// strength of an attack or parry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card(u8);

impl Card {
    /// Returns `None` if the value is not printed on any card.
    pub const fn new(value: u8) -> Option<Self> {
        if value >= MIN_CARD_VALUE && value <= MAX_CARD_VALUE {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The error type for building a [`Card`] from a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidCard {
    OutOfRange { value: u8 },
}

impl std::error::Error for InvalidCard {}

impl std::fmt::Display for InvalidCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidCard::OutOfRange { value } => write!(
                f,
                "There is no card with value {}, cards range from {} to {}",
                value, MIN_CARD_VALUE, MAX_CARD_VALUE
            ),
        }
    }
}

impl TryFrom<u8> for Card {
    type Error = InvalidCard;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Card::new(value).ok_or(InvalidCard::OutOfRange { value })
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.0
    }
}

/// Shorthand for creating a card from a literal value.
///
/// ```
/// # use engarde::{card, Card};
/// assert_eq!(card!(3), Card::new(3).unwrap());
/// ```
#[macro_export]
macro_rules! card {
    ($value:literal) => {
        $crate::Card::new($value).expect("Invalid card value given to card! macro")
    };
}
// Lets the other modules of this crate use `card!` by path.
#[allow(unused_imports)]
pub(crate) use card;

/// Every card of a round, grouped by value.
pub const FULL_DECK: [Card; DECK_SIZE] = {
    let mut cards = [Card(MIN_CARD_VALUE); DECK_SIZE];
    let mut i = 0;
    while i < DECK_SIZE {
        cards[i] = Card(MIN_CARD_VALUE + (i / COPIES_PER_VALUE) as u8);
        i += 1;
    }
    cards
};

/// Sum of the card values.
pub fn total_value(cards: impl IntoIterator<Item = Card>) -> u8 {
    cards.into_iter().map(Card::value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_deck_has_five_of_each_value() {
        for value in MIN_CARD_VALUE..=MAX_CARD_VALUE {
            let count = FULL_DECK.iter().filter(|c| c.value() == value).count();
            assert_eq!(count, COPIES_PER_VALUE);
        }
        assert_eq!(total_value(FULL_DECK), 75);
    }

    #[test]
    fn rejects_values_outside_the_deck() {
        assert_eq!(Card::new(0), None);
        assert_eq!(Card::new(6), None);
        assert_eq!(Card::try_from(7u8), Err(InvalidCard::OutOfRange { value: 7 }));
        assert_eq!(Card::try_from(4u8), Ok(card!(4)));
    }
}
