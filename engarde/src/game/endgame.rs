use tracing::debug;

use super::Match;
use crate::{
    distance_between, Action, AttackContext, AttackKind, Card, IllegalAction, Mode, Phase,
    PlayerId, PlayerState, Response, Severity,
};

/// How a round is decided once the deck has run out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndgameOutcome {
    /// The winner holds more cards matching the distance.
    MorePotentialAttacks { winner: PlayerId, counts: [usize; 2] },
    /// The winner has moved further away from home.
    FurtherAdvanced { winner: PlayerId, displacements: [u8; 2] },
    Draw,
}

impl EndgameOutcome {
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            EndgameOutcome::MorePotentialAttacks { winner, .. }
            | EndgameOutcome::FurtherAdvanced { winner, .. } => Some(winner),
            EndgameOutcome::Draw => None,
        }
    }
}

/// Decides a round after deck exhaustion.
///
/// In advanced mode the player holding more cards equal to the distance wins.
/// Otherwise, or on a tie, the player who advanced further wins.
pub fn deck_exhaustion_outcome(mode: Mode, players: &[PlayerState; 2]) -> EndgameOutcome {
    if mode.allows_defense() {
        let distance = distance_between(players[0].position, players[1].position);
        let counts = [players[0].count_of(distance), players[1].count_of(distance)];
        if counts[0] != counts[1] {
            let winner = if counts[0] > counts[1] {
                PlayerId::One
            } else {
                PlayerId::Two
            };
            return EndgameOutcome::MorePotentialAttacks { winner, counts };
        }
    }
    let displacements = [players[0].displacement(), players[1].displacement()];
    match displacements[0].cmp(&displacements[1]) {
        std::cmp::Ordering::Greater => EndgameOutcome::FurtherAdvanced {
            winner: PlayerId::One,
            displacements,
        },
        std::cmp::Ordering::Less => EndgameOutcome::FurtherAdvanced {
            winner: PlayerId::Two,
            displacements,
        },
        std::cmp::Ordering::Equal => EndgameOutcome::Draw,
    }
}

impl Match {
    /// Gives `player` one last chance to attack. Happens at most once per round.
    pub(super) fn open_final_attack(&mut self, player: PlayerId) {
        self.final_attack_offered = true;
        self.phase = Phase::FinalAttack { player };
        self.log(
            Severity::Warning,
            format!("The deck is exhausted. {} gets a final attack.", player),
        );
        self.prompt = format!(
            "{}, last chance to attack! Play a matching card or pass.",
            player
        );
    }

    pub(super) fn declare_final_attack(
        &mut self,
        card_index: usize,
        card: Card,
    ) -> Result<Response, IllegalAction> {
        let Phase::FinalAttack { player } = self.phase else {
            return Err(IllegalAction::CardNotExpected {
                phase: self.phase.kind(),
            });
        };
        let distance = self.distance();
        if card.value() != distance {
            return Err(IllegalAction::FinalAttackMismatch {
                distance,
                played: card,
            });
        }
        self.players[player.index()].take_card(card_index);
        self.log(
            Severity::Info,
            format!("{} launches a final attack with a {}.", player, card),
        );
        self.open_attack(AttackContext::new(player, AttackKind::Standard, card, true));
        Ok(self.response())
    }

    pub(super) fn pass_final_attack(&mut self) -> Result<Response, IllegalAction> {
        let Phase::FinalAttack { player } = self.phase else {
            return Err(IllegalAction::ActionUnavailable {
                action: Action::Pass,
                phase: self.phase.kind(),
            });
        };
        self.log(Severity::Info, format!("{} passes.", player));
        self.resolve_deck_exhaustion();
        Ok(self.response())
    }

    pub(super) fn resolve_deck_exhaustion(&mut self) {
        let outcome = deck_exhaustion_outcome(self.mode, &self.players);
        debug!(?outcome, "Deck exhaustion resolved");
        match outcome {
            EndgameOutcome::MorePotentialAttacks { winner, .. } => self.log(
                Severity::Success,
                format!(
                    "{} wins by having more potential attacks after deck exhaustion.",
                    winner
                ),
            ),
            EndgameOutcome::FurtherAdvanced { winner, .. } => self.log(
                Severity::Success,
                format!("{} wins the round by advancing further.", winner),
            ),
            EndgameOutcome::Draw => self.log(
                Severity::Warning,
                String::from("Round ends in a draw after deck exhaustion."),
            ),
        }
        self.conclude_round(outcome.winner());
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::Fencers;
    use crate::{card, Direction, PhaseKind};

    fn state(id: PlayerId, position: u8, hand: &[Card]) -> PlayerState {
        let mut state = PlayerState::new(id);
        state.position = position;
        state.hand = hand.to_vec();
        state
    }

    #[test]
    fn more_matching_cards_win_in_advanced_mode() {
        let players = [
            state(PlayerId::One, 8, &[card!(3), card!(3), card!(1)]),
            state(PlayerId::Two, 11, &[card!(3), card!(2), card!(5)]),
        ];
        assert_eq!(
            deck_exhaustion_outcome(Mode::Advanced, &players),
            EndgameOutcome::MorePotentialAttacks {
                winner: PlayerId::One,
                counts: [2, 1]
            }
        );
        // Basic mode only looks at how far each player advanced.
        assert_eq!(
            deck_exhaustion_outcome(Mode::Basic, &players),
            EndgameOutcome::FurtherAdvanced {
                winner: PlayerId::Two,
                displacements: [8, 11]
            }
        );
    }

    #[test]
    fn equal_counts_fall_back_to_displacement() {
        let players = [
            state(PlayerId::One, 6, &[card!(4), card!(1)]),
            state(PlayerId::Two, 10, &[card!(4), card!(2)]),
        ];
        assert_eq!(
            deck_exhaustion_outcome(Mode::Advanced, &players),
            EndgameOutcome::FurtherAdvanced {
                winner: PlayerId::Two,
                displacements: [6, 12]
            }
        );
    }

    #[test]
    fn equal_displacement_is_a_draw() {
        let players = [
            state(PlayerId::One, 9, &[card!(1)]),
            state(PlayerId::Two, 13, &[card!(2)]),
        ];
        assert_eq!(deck_exhaustion_outcome(Mode::Advanced, &players), EndgameOutcome::Draw);
        assert_eq!(EndgameOutcome::Draw.winner(), None);
    }

    /// Player 1 moves and draws the last card of the deck.
    fn exhaust_deck(mode: Mode) -> Match {
        let mut game = Match::rigged(
            mode,
            [5, 12],
            [&[2, 1, 1, 1, 1], &[4, 5, 5, 5, 5]],
            &[3],
            PlayerId::One,
        );
        game.perform(
            PlayerId::One,
            Action::Move {
                card_index: 0,
                direction: Direction::Forward,
            },
        )
        .unwrap();
        game
    }

    #[test]
    fn exhausting_the_deck_opens_the_final_attack() {
        let game = exhaust_deck(Mode::Basic);
        assert!(game.deck().is_exhausted());
        assert_eq!(game.phase(), &Phase::FinalAttack { player: PlayerId::Two });
        assert_eq!(
            game.prompt(),
            "Player 2, last chance to attack! Play a matching card or pass."
        );
        assert_eq!(game.legal_actions(), vec![crate::ActionOption::new("Pass", Action::Pass)]);
    }

    #[test]
    fn final_attack_must_match_the_distance() {
        let mut game = exhaust_deck(Mode::Basic);
        let before = game.snapshot();
        assert_eq!(
            game.play_card(PlayerId::Two, 0),
            Err(IllegalAction::FinalAttackMismatch {
                distance: 5,
                played: card!(4)
            })
        );
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn final_attack_hits_in_basic_mode() {
        let mut game = exhaust_deck(Mode::Basic);
        // Distance is 12 - 7 = 5.
        assert_eq!(game.distance(), 5);
        let response = game.play_card(PlayerId::Two, 1).unwrap();
        assert_eq!(response.phase, PhaseKind::RoundEnd);
        assert_eq!(
            game.phase(),
            &Phase::RoundEnd {
                winner: Some(PlayerId::Two)
            }
        );
    }

    #[test]
    fn passing_resolves_by_displacement() {
        let mut game = exhaust_deck(Mode::Basic);
        let response = game.perform(PlayerId::Two, Action::Pass).unwrap();
        assert_eq!(response.phase, PhaseKind::RoundEnd);
        // Player 1 advanced 7, Player 2 advanced 10.
        assert_eq!(
            game.phase(),
            &Phase::RoundEnd {
                winner: Some(PlayerId::Two)
            }
        );
        assert!(game
            .log_entries()
            .iter()
            .any(|entry| entry.message == "Player 2 wins the round by advancing further."));
    }

    #[test]
    fn parried_final_attack_ends_the_round() {
        let mut game = Match::rigged(
            Mode::Advanced,
            [5, 12],
            [&[2, 1, 1, 1, 5], &[4, 5, 5, 5, 4]],
            &[3],
            PlayerId::One,
        );
        game.perform(
            PlayerId::One,
            Action::Move {
                card_index: 0,
                direction: Direction::Forward,
            },
        )
        .unwrap();
        game.play_card(PlayerId::Two, 1).unwrap();
        game.perform(PlayerId::Two, Action::FinishAttack).unwrap();
        assert_eq!(game.phase().kind(), PhaseKind::AwaitParry);

        // No riposte: the round goes straight to the deck exhaustion rules.
        let response = game.play_card(PlayerId::One, 3).unwrap();
        assert_eq!(response.phase, PhaseKind::RoundEnd);
        assert_eq!(
            game.phase(),
            &Phase::RoundEnd {
                winner: Some(PlayerId::Two)
            }
        );
        assert!(game.log_entries().iter().any(|entry| entry.message
            == "Player 2 wins by having more potential attacks after deck exhaustion."));
    }

    quickcheck! {
        fn basic_endgame_rewards_displacement(fencers: Fencers) -> bool {
            let [one, two] = &fencers.0;
            let expected = match one.displacement().cmp(&two.displacement()) {
                std::cmp::Ordering::Greater => Some(PlayerId::One),
                std::cmp::Ordering::Less => Some(PlayerId::Two),
                std::cmp::Ordering::Equal => None,
            };
            deck_exhaustion_outcome(Mode::Basic, &fencers.0).winner() == expected
        }

        fn advanced_endgame_counts_matching_cards_first(fencers: Fencers) -> bool {
            let distance = distance_between(fencers.0[0].position, fencers.0[1].position);
            let counts = [fencers.0[0].count_of(distance), fencers.0[1].count_of(distance)];
            match deck_exhaustion_outcome(Mode::Advanced, &fencers.0) {
                EndgameOutcome::MorePotentialAttacks { winner, .. } => {
                    counts[winner.index()] > counts[winner.opponent().index()]
                }
                EndgameOutcome::FurtherAdvanced { .. } | EndgameOutcome::Draw => counts[0] == counts[1],
            }
        }
    }
}
