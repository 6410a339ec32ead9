use quickcheck::{Arbitrary, Gen};

use crate::{Card, Direction, Mode, PlayerId, PlayerState, BOARD_LENGTH, FULL_DECK, HAND_SIZE};

/// Two fencers in order on the piste, each with up to a full hand.
///
/// The hands are drawn independently, so a value may occur more often than in a real deck.
#[derive(Clone, Debug)]
pub struct Fencers(pub [PlayerState; 2]);

impl Fencers {
    pub fn positions(&self) -> [u8; 2] {
        [self.0[0].position, self.0[1].position]
    }
}

impl Arbitrary for Fencers {
    fn arbitrary(g: &mut Gen) -> Self {
        let first = u8::arbitrary(g) % (BOARD_LENGTH - 1);
        let second = first + 1 + u8::arbitrary(g) % (BOARD_LENGTH - 1 - first);
        let mut players = PlayerId::BOTH.map(PlayerState::new);
        players[0].position = first;
        players[1].position = second;
        for player in &mut players {
            let len = usize::arbitrary(g) % (HAND_SIZE + 1);
            player.hand = (0..len).map(|_| Card::arbitrary(g)).collect();
        }
        Fencers(players)
    }
}

impl Arbitrary for Card {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&FULL_DECK).unwrap()
    }
}

impl Arbitrary for PlayerId {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&PlayerId::BOTH).unwrap()
    }
}

impl Arbitrary for Direction {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Direction::BOTH).unwrap()
    }
}

impl Arbitrary for Mode {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[Mode::Basic, Mode::Advanced]).unwrap()
    }
}
