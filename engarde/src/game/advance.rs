use tracing::debug;

use super::Match;
use crate::{
    distance_between, move_target, Action, AttackContext, AttackKind, Card, Direction,
    IllegalAction, Mode, Phase, PlayerId, Response, Severity,
};

/// A step forward that still waits for its attacking card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAdvance {
    player: PlayerId,
    card: Card,
    /// Where the card was in the hand, so that a cancel can put it back.
    card_index: usize,
    origin: u8,
    /// The advance was started from a riposte turn.
    riposte: bool,
}

impl PendingAdvance {
    pub fn player(&self) -> PlayerId {
        self.player
    }
}

/// Where `player` would land by advancing with the card at `card_index`,
/// and the distance left to the opponent from there.
///
/// Returns `None` unless the step is legal and another card in the hand
/// matches the new distance.
pub fn advance_target(player: PlayerId, positions: [u8; 2], hand: &[Card], card_index: usize) -> Option<(u8, u8)> {
    let card = hand.get(card_index)?;
    let target = move_target(player, positions, card.value(), Direction::Forward)?;
    let distance = distance_between(target, positions[player.opponent().index()]);
    let follow_up = hand
        .iter()
        .enumerate()
        .any(|(idx, other)| idx != card_index && other.value() == distance);
    follow_up.then_some((target, distance))
}

impl Match {
    pub(super) fn can_advance(&self, player: PlayerId, card_index: usize) -> bool {
        advance_target(player, self.positions(), &self.player(player).hand, card_index).is_some()
    }

    pub(super) fn begin_advance(&mut self, player: PlayerId, card_index: usize) -> Result<Response, IllegalAction> {
        let action = Action::AdvanceAttack { card_index };
        let riposte = self.expect_turn(player, action)?;
        if self.mode != Mode::Advanced {
            return Err(IllegalAction::ActionUnavailable {
                action,
                phase: self.phase.kind(),
            });
        }
        let card = self.card_of(player, card_index)?;
        let (target, distance) =
            advance_target(player, self.positions(), &self.player(player).hand, card_index)
                .ok_or(IllegalAction::NoFollowUpAttack { card })?;

        let state = &mut self.players[player.index()];
        let origin = state.position;
        state.take_card(card_index);
        state.position = target;
        self.discard.push(card);
        debug!(%player, origin, target, distance, "Advancing before the attack");
        self.log(Severity::Info, format!("{} advances {} spaces.", player, card));
        self.phase = Phase::AdvanceAttack(PendingAdvance {
            player,
            card,
            card_index,
            origin,
            riposte,
        });
        self.prompt = format!("{}, choose a card to complete the attack.", player);
        Ok(self.response())
    }

    pub(super) fn complete_advance_attack(
        &mut self,
        card_index: usize,
        card: Card,
    ) -> Result<Response, IllegalAction> {
        let Phase::AdvanceAttack(pending) = &self.phase else {
            return Err(IllegalAction::CardNotExpected {
                phase: self.phase.kind(),
            });
        };
        let player = pending.player();
        let distance = self.distance();
        if card.value() != distance {
            return Err(IllegalAction::AdvanceCardMismatch {
                distance,
                played: card,
            });
        }
        self.players[player.index()].take_card(card_index);
        self.log(
            Severity::Info,
            format!("{} attempts an advance & attack with a {}.", player, card),
        );
        self.open_attack(AttackContext::new(player, AttackKind::Advanced, card, false));
        Ok(self.response())
    }

    /// Undoes the step: position, hand and the turn are as before the advance.
    pub(super) fn cancel_advance(&mut self) -> Result<Response, IllegalAction> {
        let Phase::AdvanceAttack(pending) = &self.phase else {
            return Err(IllegalAction::ActionUnavailable {
                action: Action::CancelAdvance,
                phase: self.phase.kind(),
            });
        };
        let pending = pending.clone();
        let state = &mut self.players[pending.player.index()];
        state.position = pending.origin;
        state.hand.insert(pending.card_index, pending.card);
        let returned = self.discard.pop();
        debug_assert_eq!(returned, Some(pending.card));

        let player = pending.player;
        self.phase = if pending.riposte {
            Phase::DefenderTurn { player }
        } else {
            Phase::Turn { player }
        };
        self.log(Severity::Warning, format!("{} cancels the advance.", player));
        self.prompt = format!("{}, select another action.", player);
        Ok(self.response())
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::Fencers;
    use crate::{card, PhaseKind, HAND_SIZE};

    fn advanced_game() -> Match {
        Match::rigged(
            Mode::Advanced,
            [5, 12],
            [&[3, 4, 1, 1, 1], &[2, 2, 2, 2, 5]],
            &[5, 5, 3],
            PlayerId::One,
        )
    }

    #[test]
    fn advance_target_needs_a_second_card() {
        let hand = [card!(3), card!(4), card!(1)];
        assert_eq!(advance_target(PlayerId::One, [5, 12], &hand, 0), Some((8, 4)));
        assert_eq!(advance_target(PlayerId::One, [5, 12], &hand, 1), Some((9, 3)));
        // Stepping 1 leaves a distance of 6.
        assert_eq!(advance_target(PlayerId::One, [5, 12], &hand, 2), None);
        assert_eq!(advance_target(PlayerId::Two, [5, 12], &hand, 0), Some((9, 4)));
        assert_eq!(advance_target(PlayerId::One, [5, 12], &hand, 9), None);
    }

    #[test]
    fn advance_then_attack() {
        let mut game = advanced_game();
        let response = game
            .perform(PlayerId::One, Action::AdvanceAttack { card_index: 0 })
            .unwrap();
        assert_eq!(response.phase, PhaseKind::AdvanceAttack);
        assert_eq!(response.prompt, "Player 1, choose a card to complete the attack.");
        assert_eq!(game.positions(), [8, 12]);

        let before = game.snapshot();
        assert_eq!(
            game.play_card(PlayerId::One, 1),
            Err(IllegalAction::AdvanceCardMismatch {
                distance: 4,
                played: card!(1)
            })
        );
        assert_eq!(game.snapshot(), before);

        let response = game.play_card(PlayerId::One, 0).unwrap();
        assert_eq!(response.phase, PhaseKind::AttackStrengthen);
        let attack = game.snapshot().attack.unwrap();
        assert_eq!(attack.kind, AttackKind::Advanced);
        assert_eq!(attack.cards, vec![card!(4)]);
    }

    #[test]
    fn cancelled_advance_restores_everything() {
        let mut game = advanced_game();
        let before = game.snapshot();
        game.perform(PlayerId::One, Action::AdvanceAttack { card_index: 0 })
            .unwrap();
        let response = game.perform(PlayerId::One, Action::CancelAdvance).unwrap();
        assert_eq!(response.phase, PhaseKind::Turn);
        assert_eq!(response.prompt, "Player 1, select another action.");
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn cancelled_advance_returns_to_the_riposte() {
        let mut game = Match::rigged(
            Mode::Advanced,
            [5, 7],
            [&[2, 5, 5, 4, 4], &[2, 3, 1, 4, 1]],
            &[3, 3, 5],
            PlayerId::One,
        );
        game.perform(PlayerId::One, Action::Attack { card_index: 0 })
            .unwrap();
        game.perform(PlayerId::One, Action::FinishAttack).unwrap();
        game.play_card(PlayerId::Two, 0).unwrap();
        assert_eq!(game.phase(), &Phase::DefenderTurn { player: PlayerId::Two });

        let before = game.snapshot();
        game.perform(PlayerId::Two, Action::AdvanceAttack { card_index: 1 })
            .unwrap();
        assert_eq!(game.positions(), [5, 6]);
        let response = game.perform(PlayerId::Two, Action::CancelAdvance).unwrap();
        assert_eq!(response.phase, PhaseKind::DefenderTurn);
        assert_eq!(game.snapshot(), before);
        assert!(game.player(PlayerId::Two).must_skip_draw);
    }

    #[test]
    fn advance_is_not_available_in_basic_mode() {
        let mut game = Match::rigged(
            Mode::Basic,
            [5, 12],
            [&[3, 4, 1, 1, 1], &[2, 2, 2, 2, 5]],
            &[5, 5, 3],
            PlayerId::One,
        );
        assert_eq!(
            game.perform(PlayerId::One, Action::AdvanceAttack { card_index: 0 }),
            Err(IllegalAction::ActionUnavailable {
                action: Action::AdvanceAttack { card_index: 0 },
                phase: PhaseKind::Turn
            })
        );
    }

    #[test]
    fn advance_without_follow_up_is_rejected() {
        let mut game = advanced_game();
        assert_eq!(
            game.perform(PlayerId::One, Action::AdvanceAttack { card_index: 2 }),
            Err(IllegalAction::NoFollowUpAttack { card: card!(1) })
        );
    }

    quickcheck! {
        fn advance_target_leaves_a_matching_card(fencers: Fencers, player: PlayerId, card_index: usize) -> bool {
            let positions = fencers.positions();
            let hand = &fencers.0[player.index()].hand;
            let card_index = card_index % (HAND_SIZE + 1);
            match advance_target(player, positions, hand, card_index) {
                Some((target, distance)) => {
                    let mut after = positions;
                    after[player.index()] = target;
                    after[0] < after[1]
                        && distance_between(after[0], after[1]) == distance
                        && hand
                            .iter()
                            .enumerate()
                            .any(|(idx, card)| idx != card_index && card.value() == distance)
                }
                None => true,
            }
        }
    }
}
