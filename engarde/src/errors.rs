use crate::{Action, Card, Direction, PhaseKind, PlayerId};

/// The error type for rejected inputs.
///
/// A rejected input never changes the state of the match. The [`Display`](std::fmt::Display)
/// text is meant to be shown to the player as a corrective prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IllegalAction {
    /// The round is over, nobody can play until the next round starts.
    NoRoundInProgress,
    NotYourTurn { player: PlayerId },
    NoSuchCard { card_index: usize },
    /// The card can neither move, attack nor advance-attack.
    NoLegalUseForCard { card: Card },
    ActionUnavailable { action: Action, phase: PhaseKind },
    CardNotExpected { phase: PhaseKind },
    MoveNotPossible { card: Card, direction: Direction },
    AttackOutOfReach { card: Card, distance: u8 },
    /// After advancing with this card, no other card would match the distance.
    NoFollowUpAttack { card: Card },
    StrengthenMismatch { base: Card, played: Card },
    CardAlreadySelected { card_index: usize },
    NotEnoughCardsToParry { required: usize, in_hand: usize },
    RetreatNotPossible { card: Card },
    AdvanceCardMismatch { distance: u8, played: Card },
    FinalAttackMismatch { distance: u8, played: Card },
    RoundInProgress,
    MatchFinished,
}

impl std::error::Error for IllegalAction {}

impl std::fmt::Display for IllegalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalAction::NoRoundInProgress => {
                write!(f, "The round is over. Start the next round when ready.")
            }
            IllegalAction::NotYourTurn { player } => write!(f, "It is not {}'s turn.", player),
            IllegalAction::NoSuchCard { card_index } => {
                write!(f, "There is no card at position {} of the hand.", card_index + 1)
            }
            IllegalAction::NoLegalUseForCard { .. } => {
                write!(f, "No legal moves with that card. Choose another card.")
            }
            IllegalAction::ActionUnavailable { action, phase } => {
                write!(f, "{:?} is not possible during {}.", action, phase)
            }
            IllegalAction::CardNotExpected { phase } => {
                write!(f, "Cards cannot be played during {}.", phase)
            }
            IllegalAction::MoveNotPossible { card, direction } => {
                write!(f, "Cannot move {} {} spaces. Choose another card.", direction, card)
            }
            IllegalAction::AttackOutOfReach { card, distance } => write!(
                f,
                "An attack with {} does not reach, the distance is {}.",
                card, distance
            ),
            IllegalAction::NoFollowUpAttack { card } => write!(
                f,
                "After advancing {} no other card matches the distance.",
                card
            ),
            IllegalAction::StrengthenMismatch { .. } => {
                write!(f, "Only identical cards can strengthen the attack.")
            }
            IllegalAction::CardAlreadySelected { .. } => {
                write!(f, "That card is already part of the parry. Choose another.")
            }
            IllegalAction::NotEnoughCardsToParry { required, in_hand } => write!(
                f,
                "A parry needs {} card(s), but only {} are in hand.",
                required, in_hand
            ),
            IllegalAction::RetreatNotPossible { .. } => {
                write!(f, "Retreat not possible with that card. Choose another.")
            }
            IllegalAction::AdvanceCardMismatch { .. } => write!(
                f,
                "Advance attack requires the second card to match the distance."
            ),
            IllegalAction::FinalAttackMismatch { .. } => write!(
                f,
                "Final attack must match the distance exactly. Choose another card or pass."
            ),
            IllegalAction::RoundInProgress => {
                write!(f, "The current round is not finished yet.")
            }
            IllegalAction::MatchFinished => {
                write!(f, "Match already finished. Start a new match to continue.")
            }
        }
    }
}
