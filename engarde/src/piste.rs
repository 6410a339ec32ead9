//! Geometry of the piste.
//!
//! All functions here are pure. Positions are passed as `[u8; 2]`, indexed
//! by [`PlayerId::index()`].

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// The number of spaces on the piste.
pub const BOARD_LENGTH: u8 = 23;

/// Which way a fencer steps, relative to the opponent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the opponent.
    Forward,
    /// Away from the opponent.
    Backward,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Forward, Direction::Backward];

    /// The sign of a step in this direction on the board axis.
    pub fn sign(self, player: PlayerId) -> i16 {
        match (player, self) {
            (PlayerId::One, Direction::Forward) | (PlayerId::Two, Direction::Backward) => 1,
            (PlayerId::One, Direction::Backward) | (PlayerId::Two, Direction::Forward) => -1,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

pub fn distance_between(a: u8, b: u8) -> u8 {
    a.abs_diff(b)
}

/// Where the player would end up after stepping `steps` spaces, if that is legal.
///
/// A step is legal when the target lies on the piste and strictly on the
/// player's own side of the opponent, i.e. fencers never share or cross a space.
/// The same rule applies in both directions.
pub fn move_target(player: PlayerId, positions: [u8; 2], steps: u8, direction: Direction) -> Option<u8> {
    let position = i16::from(positions[player.index()]);
    let opponent = i16::from(positions[player.opponent().index()]);
    let target = position + direction.sign(player) * i16::from(steps);
    if target < 0 || target >= i16::from(BOARD_LENGTH) {
        return None;
    }
    let stays_on_own_side = match player {
        PlayerId::One => target < opponent,
        PlayerId::Two => target > opponent,
    };
    if stays_on_own_side {
        u8::try_from(target).ok()
    } else {
        None
    }
}

pub fn is_move_legal(player: PlayerId, positions: [u8; 2], steps: u8, direction: Direction) -> bool {
    move_target(player, positions, steps, direction).is_some()
}
