use serde::{Deserialize, Serialize};

use crate::{AttackKind, Card, Direction, Mode, PhaseKind, PlayerId};

/// A follow-up action offered to the acting player.
///
/// Selecting a card is done with [`Match::play_card()`](crate::Match::play_card);
/// everything else goes through [`Match::perform()`](crate::Match::perform).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Step with the card at `card_index` of the hand.
    Move { card_index: usize, direction: Direction },
    /// Attack with a card matching the distance exactly.
    Attack { card_index: usize },
    /// Step forward with the card, then attack with another card matching the new distance.
    AdvanceAttack { card_index: usize },
    /// Stop strengthening and let the defender respond.
    FinishAttack,
    /// Repeats what the parry still needs. Does not change the state.
    Parry,
    /// Dodge an advance-attack instead of parrying it.
    Retreat,
    CancelRetreat,
    CancelAdvance,
    /// Decline the final attack.
    Pass,
}

/// An [`Action`] with a label for display, e.g. "Move 3 forward".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOption {
    pub label: String,
    pub action: Action,
}

impl ActionOption {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// What the engine answers to every accepted input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub phase: PhaseKind,
    pub prompt: String,
    pub actions: Vec<ActionOption>,
}

/// The attack in progress, as seen from outside.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackSummary {
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub kind: AttackKind,
    pub cards: Vec<Card>,
    pub total: u8,
    /// Cards the defender has picked for the parry so far.
    pub parry_selection: Vec<Card>,
}

/// Read-only view of a match, for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    /// The mode the next round will be played in.
    pub next_round_mode: Mode,
    pub round: u32,
    pub phase: PhaseKind,
    pub acting_player: Option<PlayerId>,
    pub positions: [u8; 2],
    pub hands: [Vec<Card>; 2],
    pub scores: [u32; 2],
    pub deck_count: usize,
    pub discard_count: usize,
    pub deck_exhausted: bool,
    pub attack: Option<AttackSummary>,
    pub round_winner: Option<PlayerId>,
    pub match_winner: Option<PlayerId>,
}
