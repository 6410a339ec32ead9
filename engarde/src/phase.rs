use serde::{Deserialize, Serialize};

use crate::{AttackContext, PendingAdvance, PlayerId};

/// The state of the round, carrying only the data that is valid in it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The player may move, attack or advance-attack.
    Turn { player: PlayerId },
    /// The attacker may add cards equal to the base card.
    AttackStrengthen(AttackContext),
    /// The defender picks cards for a parry.
    AwaitParry(AttackContext),
    /// The defender picks a card to retreat with.
    AwaitRetreatCard(AttackContext),
    /// The player has advanced and must play the attacking card, or cancel.
    AdvanceAttack(PendingAdvance),
    /// The forced turn after a successful parry.
    DefenderTurn { player: PlayerId },
    /// The one chance to attack after the deck ran out.
    FinalAttack { player: PlayerId },
    /// `winner` is `None` for a drawn round.
    RoundEnd { winner: Option<PlayerId> },
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Turn { .. } => PhaseKind::Turn,
            Phase::AttackStrengthen(_) => PhaseKind::AttackStrengthen,
            Phase::AwaitParry(_) => PhaseKind::AwaitParry,
            Phase::AwaitRetreatCard(_) => PhaseKind::AwaitRetreatCard,
            Phase::AdvanceAttack(_) => PhaseKind::AdvanceAttack,
            Phase::DefenderTurn { .. } => PhaseKind::DefenderTurn,
            Phase::FinalAttack { .. } => PhaseKind::FinalAttack,
            Phase::RoundEnd { .. } => PhaseKind::RoundEnd,
        }
    }

    /// The attack being fought out, if any.
    pub fn attack(&self) -> Option<&AttackContext> {
        match self {
            Phase::AttackStrengthen(ctx) | Phase::AwaitParry(ctx) | Phase::AwaitRetreatCard(ctx) => {
                Some(ctx)
            }
            _ => None,
        }
    }

    /// The only player whose input is accepted in this phase.
    pub fn acting_player(&self) -> Option<PlayerId> {
        match self {
            Phase::Turn { player } | Phase::DefenderTurn { player } | Phase::FinalAttack { player } => {
                Some(*player)
            }
            Phase::AttackStrengthen(ctx) => Some(ctx.attacker()),
            Phase::AwaitParry(ctx) | Phase::AwaitRetreatCard(ctx) => Some(ctx.defender()),
            Phase::AdvanceAttack(pending) => Some(pending.player()),
            Phase::RoundEnd { .. } => None,
        }
    }
}

/// The name of a [`Phase`], without its data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseKind {
    Turn,
    AttackStrengthen,
    AwaitParry,
    AwaitRetreatCard,
    AdvanceAttack,
    DefenderTurn,
    FinalAttack,
    RoundEnd,
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PhaseKind::Turn => "turn",
            PhaseKind::AttackStrengthen => "attack-strengthen",
            PhaseKind::AwaitParry => "await-parry",
            PhaseKind::AwaitRetreatCard => "await-retreat-card",
            PhaseKind::AdvanceAttack => "advance-attack",
            PhaseKind::DefenderTurn => "defender-turn",
            PhaseKind::FinalAttack => "final-attack",
            PhaseKind::RoundEnd => "round-end",
        };
        write!(f, "{}", name)
    }
}
