use serde::{Deserialize, Serialize};

use crate::{Card, Deck, BOARD_LENGTH, HAND_SIZE};

/// One of the two fencers.
///
/// Player 1 starts on the left end of the piste and advances to the right,
/// Player 2 starts on the right end and advances to the left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const BOTH: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// The starting position of this player.
    pub fn home(self) -> u8 {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => BOARD_LENGTH - 1,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.index() + 1)
    }
}

/// The state for a single player during one round, plus the score of the match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub position: u8,
    pub hand: Vec<Card>,
    /// Rounds won in this match.
    pub score: u32,
    /// Set after a successful parry; the next end-of-turn draw is skipped.
    pub must_skip_draw: bool,
}

impl PlayerState {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            position: id.home(),
            hand: Vec::with_capacity(HAND_SIZE),
            score: 0,
            must_skip_draw: false,
        }
    }

    /// Back to the home position with an empty hand. The score is kept.
    pub fn reset_for_round(&mut self) {
        self.position = self.id.home();
        self.hand.clear();
        self.must_skip_draw = false;
    }

    pub fn card(&self, card_index: usize) -> Option<Card> {
        self.hand.get(card_index).copied()
    }

    /// Removes a card from the hand. Panics if the index is out of bounds.
    pub(crate) fn take_card(&mut self, card_index: usize) -> Card {
        self.hand.remove(card_index)
    }

    pub fn draw_from(&mut self, deck: &mut Deck) -> Option<Card> {
        let card = deck.draw()?;
        self.hand.push(card);
        Some(card)
    }

    /// Draws until the hand is full or the deck is empty. Returns the number of cards drawn.
    pub fn draw_up_to_full(&mut self, deck: &mut Deck) -> usize {
        let mut drawn = 0;
        while self.hand.len() < HAND_SIZE && self.draw_from(deck).is_some() {
            drawn += 1;
        }
        drawn
    }

    /// How many cards of the given value are in the hand.
    pub fn count_of(&self, value: u8) -> usize {
        self.hand.iter().filter(|card| card.value() == value).count()
    }

    /// How far this player has advanced from home towards the opponent.
    pub fn displacement(&self) -> u8 {
        match self.id {
            PlayerId::One => self.position,
            PlayerId::Two => BOARD_LENGTH - 1 - self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card;

    #[test]
    fn draw_up_to_full_stops_at_hand_size() {
        let mut deck = Deck::from_cards(vec![card!(1); 8]);
        let mut player = PlayerState::new(PlayerId::One);
        player.hand.push(card!(5));
        assert_eq!(player.draw_up_to_full(&mut deck), 4);
        assert_eq!(player.hand.len(), HAND_SIZE);
        assert_eq!(deck.len(), 4);
        assert_eq!(player.draw_up_to_full(&mut deck), 0);
    }

    #[test]
    fn draw_up_to_full_stops_at_empty_deck() {
        let mut deck = Deck::from_cards(vec![card!(2), card!(3)]);
        let mut player = PlayerState::new(PlayerId::Two);
        assert_eq!(player.draw_up_to_full(&mut deck), 2);
        assert_eq!(player.hand, vec![card!(3), card!(2)]);
        assert!(deck.is_exhausted());
    }

    #[test]
    fn displacement_is_measured_from_home() {
        let mut one = PlayerState::new(PlayerId::One);
        let mut two = PlayerState::new(PlayerId::Two);
        assert_eq!((one.displacement(), two.displacement()), (0, 0));
        one.position = 7;
        two.position = 15;
        assert_eq!((one.displacement(), two.displacement()), (7, 7));
    }

    #[test]
    fn reset_keeps_score() {
        let mut player = PlayerState::new(PlayerId::Two);
        player.position = 10;
        player.score = 3;
        player.must_skip_draw = true;
        player.hand.push(card!(4));
        player.reset_for_round();
        assert_eq!(player.position, BOARD_LENGTH - 1);
        assert!(player.hand.is_empty());
        assert!(!player.must_skip_draw);
        assert_eq!(player.score, 3);
    }
}
