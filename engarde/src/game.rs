mod advance;
mod attack;
mod endgame;

pub use advance::*;
pub use attack::*;
pub use endgame::*;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::{
    distance_between, is_move_legal, move_target, Action, ActionOption, Card, Config, Deck, Direction, History,
    IllegalAction, LogEntry, Mode, Phase, PlayerId, PlayerState, Response, Severity, Snapshot,
    BOARD_LENGTH, DECK_SIZE, HAND_SIZE, ROUNDS_TO_WIN,
};

/// A match, from the first deal until one player has won [`ROUNDS_TO_WIN`] rounds.
///
/// All state lives in here. Inputs arrive through [`Self::play_card()`] and
/// [`Self::perform()`]; each one is either applied completely, or rejected
/// without changing anything.
#[derive(Clone, Debug)]
pub struct Match {
    /// The ruleset of the current round.
    mode: Mode,
    next_round_mode: Mode,
    round: u32,
    starting_player: PlayerId,
    players: [PlayerState; 2],
    deck: Deck,
    discard: Vec<Card>,
    phase: Phase,
    /// The final attack window opens at most once per round.
    final_attack_offered: bool,
    prompt: String,
    history: History,
    rng: StdRng,
}

// Lifecycle and queries
impl Match {
    /// Starts a match; the first round is dealt right away.
    pub fn new(config: Config) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        debug!(seed, mode = %config.mode, "Creating match");
        let mut game = Self {
            mode: config.mode,
            next_round_mode: config.mode,
            round: 1,
            starting_player: PlayerId::One,
            players: [PlayerState::new(PlayerId::One), PlayerState::new(PlayerId::Two)],
            deck: Deck::from_cards(Vec::new()),
            discard: Vec::with_capacity(DECK_SIZE),
            phase: Phase::RoundEnd { winner: None },
            final_attack_offered: false,
            prompt: String::new(),
            history: History::default(),
            rng: StdRng::seed_from_u64(seed),
        };
        game.start_round();
        game.log(Severity::Success, String::from("New match started. Good luck!"));
        game.check_invariants();
        game
    }

    /// Resets the scores and deals round 1.
    pub fn new_match(&mut self) -> Response {
        for player in &mut self.players {
            player.score = 0;
        }
        self.round = 1;
        self.starting_player = PlayerId::One;
        self.start_round();
        self.log(Severity::Success, String::from("New match started. Good luck!"));
        self.check_invariants();
        self.response()
    }

    /// Deals the next round. The other player leads this time.
    pub fn next_round(&mut self) -> Result<Response, IllegalAction> {
        if self.match_winner().is_some() {
            return Err(IllegalAction::MatchFinished);
        }
        if !matches!(self.phase, Phase::RoundEnd { .. }) {
            return Err(IllegalAction::RoundInProgress);
        }
        self.round += 1;
        self.starting_player = self.starting_player.opponent();
        self.start_round();
        self.log(
            Severity::Info,
            format!("Round {} begins. {} leads.", self.round, self.starting_player),
        );
        self.check_invariants();
        Ok(self.response())
    }

    /// Takes effect when the next round is dealt.
    pub fn select_mode(&mut self, mode: Mode) {
        self.next_round_mode = mode;
        self.log(
            Severity::Info,
            format!("Mode set to {}. It applies from the next round.", mode),
        );
    }

    fn start_round(&mut self) {
        self.mode = self.next_round_mode;
        self.deck = Deck::shuffled(&mut self.rng);
        self.discard.clear();
        self.final_attack_offered = false;
        for player in &mut self.players {
            player.reset_for_round();
        }
        for _ in 0..HAND_SIZE {
            for player in &mut self.players {
                player.draw_from(&mut self.deck);
            }
        }
        self.phase = Phase::Turn {
            player: self.starting_player,
        };
        self.prompt = format!("{} to play first this round.", self.starting_player);
        debug!(round = self.round, mode = %self.mode, starting_player = %self.starting_player, "Round started");
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn next_round_mode(&self) -> Mode {
        self.next_round_mode
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        self.history.entries()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player.index()]
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    pub fn positions(&self) -> [u8; 2] {
        [self.players[0].position, self.players[1].position]
    }

    pub fn distance(&self) -> u8 {
        distance_between(self.players[0].position, self.players[1].position)
    }

    /// The only player whose input is accepted right now.
    pub fn acting_player(&self) -> Option<PlayerId> {
        self.phase.acting_player()
    }

    /// The player who has reached [`ROUNDS_TO_WIN`], if any.
    pub fn match_winner(&self) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|player| player.score >= ROUNDS_TO_WIN)
            .map(|player| player.id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            next_round_mode: self.next_round_mode,
            round: self.round,
            phase: self.phase.kind(),
            acting_player: self.acting_player(),
            positions: self.positions(),
            hands: [self.players[0].hand.clone(), self.players[1].hand.clone()],
            scores: [self.players[0].score, self.players[1].score],
            deck_count: self.deck.len(),
            discard_count: self.discard.len(),
            deck_exhausted: self.deck.is_exhausted(),
            attack: self.phase.attack().map(AttackContext::summary),
            round_winner: match self.phase {
                Phase::RoundEnd { winner } => winner,
                _ => None,
            },
            match_winner: self.match_winner(),
        }
    }

    /// The current phase, prompt and every action that can be performed now.
    pub fn response(&self) -> Response {
        Response {
            phase: self.phase.kind(),
            prompt: self.prompt.clone(),
            actions: self.legal_actions(),
        }
    }

    /// Every labelled action available in the current phase.
    ///
    /// During a turn this lists the options of all cards in hand, once per card value.
    pub fn legal_actions(&self) -> Vec<ActionOption> {
        match &self.phase {
            Phase::Turn { player } | Phase::DefenderTurn { player } => {
                let mut options: Vec<ActionOption> = Vec::new();
                for card_index in 0..self.player(*player).hand.len() {
                    for option in self.card_options(*player, card_index) {
                        // Equal cards have equal options, the first slot stands for all of them.
                        if options.iter().all(|known| known.label != option.label) {
                            options.push(option);
                        }
                    }
                }
                options
            }
            Phase::AttackStrengthen(_) => {
                vec![ActionOption::new("Finish attack", Action::FinishAttack)]
            }
            Phase::AwaitParry(ctx) => {
                let mut options = Vec::new();
                if self.player(ctx.defender()).hand.len() >= ctx.required_cards() {
                    options.push(ActionOption::new("Parry (select cards)", Action::Parry));
                }
                if ctx.allows_retreat(self.mode) {
                    options.push(ActionOption::new("Retreat", Action::Retreat));
                }
                options
            }
            Phase::AwaitRetreatCard(_) => {
                vec![ActionOption::new("Cancel retreat", Action::CancelRetreat)]
            }
            Phase::AdvanceAttack(_) => {
                vec![ActionOption::new("Cancel advance", Action::CancelAdvance)]
            }
            Phase::FinalAttack { .. } => vec![ActionOption::new("Pass", Action::Pass)],
            Phase::RoundEnd { .. } => Vec::new(),
        }
    }

    fn card_options(&self, player: PlayerId, card_index: usize) -> Vec<ActionOption> {
        let Some(card) = self.player(player).card(card_index) else {
            return Vec::new();
        };
        let positions = self.positions();
        let mut options = Vec::new();
        if move_target(player, positions, card.value(), Direction::Forward).is_some() {
            options.push(ActionOption::new(
                format!("Move {} forward", card),
                Action::Move {
                    card_index,
                    direction: Direction::Forward,
                },
            ));
        }
        if move_target(player, positions, card.value(), Direction::Backward).is_some() {
            options.push(ActionOption::new(
                format!("Retreat {}", card),
                Action::Move {
                    card_index,
                    direction: Direction::Backward,
                },
            ));
        }
        if self.distance() == card.value() {
            options.push(ActionOption::new(
                format!("Attack with {}", card),
                Action::Attack { card_index },
            ));
        }
        if self.mode == Mode::Advanced && self.can_advance(player, card_index) {
            options.push(ActionOption::new(
                format!("Advance & Attack (use {})", card),
                Action::AdvanceAttack { card_index },
            ));
        }
        options
    }
}

// Input handling
impl Match {
    /// The player chose the card at `card_index` of their hand.
    ///
    /// What this means depends on the phase: during a turn it only lists the
    /// options for that card, while e.g. during a parry it commits the card.
    pub fn play_card(&mut self, player: PlayerId, card_index: usize) -> Result<Response, IllegalAction> {
        self.check_acting(player)?;
        let card = self.card_of(player, card_index)?;
        trace!(%player, card_index, %card, phase = %self.phase.kind(), "Card played");
        let response = match self.phase {
            Phase::Turn { .. } | Phase::DefenderTurn { .. } => {
                let actions = self.card_options(player, card_index);
                if actions.is_empty() {
                    return Err(IllegalAction::NoLegalUseForCard { card });
                }
                // Nothing is committed yet, so the state stays as it is.
                return Ok(Response {
                    phase: self.phase.kind(),
                    prompt: format!("{}, choose an action for card {}.", player, card),
                    actions,
                });
            }
            Phase::AttackStrengthen(_) => self.strengthen_attack(card_index, card)?,
            Phase::AwaitParry(_) => self.select_parry_card(card_index, card)?,
            Phase::AwaitRetreatCard(_) => self.retreat_with(card_index, card)?,
            Phase::AdvanceAttack(_) => self.complete_advance_attack(card_index, card)?,
            Phase::FinalAttack { .. } => self.declare_final_attack(card_index, card)?,
            Phase::RoundEnd { .. } => return Err(IllegalAction::NoRoundInProgress),
        };
        self.check_invariants();
        Ok(response)
    }

    /// Performs one of the actions from [`Self::legal_actions()`].
    ///
    /// The action is validated again, so stale or made-up actions are rejected.
    pub fn perform(&mut self, player: PlayerId, action: Action) -> Result<Response, IllegalAction> {
        self.check_acting(player)?;
        trace!(%player, ?action, phase = %self.phase.kind(), "Action performed");
        let response = match action {
            Action::Move {
                card_index,
                direction,
            } => self.move_fencer(player, card_index, direction)?,
            Action::Attack { card_index } => self.declare_standard_attack(player, card_index)?,
            Action::AdvanceAttack { card_index } => self.begin_advance(player, card_index)?,
            Action::FinishAttack => self.finish_attack()?,
            Action::Parry => self.parry_prompt()?,
            Action::Retreat => self.begin_retreat()?,
            Action::CancelRetreat => self.cancel_retreat()?,
            Action::CancelAdvance => self.cancel_advance()?,
            Action::Pass => self.pass_final_attack()?,
        };
        self.check_invariants();
        Ok(response)
    }

    fn check_acting(&self, player: PlayerId) -> Result<(), IllegalAction> {
        match self.acting_player() {
            None => Err(IllegalAction::NoRoundInProgress),
            Some(acting) if acting != player => Err(IllegalAction::NotYourTurn { player }),
            Some(_) => Ok(()),
        }
    }

    fn card_of(&self, player: PlayerId, card_index: usize) -> Result<Card, IllegalAction> {
        self.player(player)
            .card(card_index)
            .ok_or(IllegalAction::NoSuchCard { card_index })
    }

    /// Checks that `player` is taking a turn, and returns whether it is the riposte turn.
    fn expect_turn(&self, player: PlayerId, action: Action) -> Result<bool, IllegalAction> {
        match self.phase {
            Phase::Turn { player: p } if p == player => Ok(false),
            Phase::DefenderTurn { player: p } if p == player => Ok(true),
            _ => Err(IllegalAction::ActionUnavailable {
                action,
                phase: self.phase.kind(),
            }),
        }
    }

    fn move_fencer(
        &mut self,
        player: PlayerId,
        card_index: usize,
        direction: Direction,
    ) -> Result<Response, IllegalAction> {
        self.expect_turn(
            player,
            Action::Move {
                card_index,
                direction,
            },
        )?;
        let card = self.card_of(player, card_index)?;
        let target = move_target(player, self.positions(), card.value(), direction)
            .ok_or(IllegalAction::MoveNotPossible { card, direction })?;

        let mover = &mut self.players[player.index()];
        mover.take_card(card_index);
        mover.position = target;
        self.discard.push(card);
        self.log(
            Severity::Info,
            format!("{} moves {} {} spaces.", player, direction, card),
        );
        self.end_player_turn(player);
        Ok(self.response())
    }
}

// Turn bookkeeping
impl Match {
    /// Called after `mover` completed a move.
    fn end_player_turn(&mut self, mover: PlayerId) {
        let opponent = mover.opponent();
        if !self.deck.is_exhausted() && !self.has_any_legal_action(opponent) {
            self.log(
                Severity::Success,
                format!("{} cannot move. {} wins the round.", opponent, mover),
            );
            self.conclude_round(Some(mover));
            return;
        }
        self.draw_if_allowed(mover);
        self.begin_turn(opponent, false);
    }

    /// Hands the initiative to `player`, unless the deck has run out or `player` is stuck.
    fn begin_turn(&mut self, player: PlayerId, riposte: bool) {
        if self.deck.is_exhausted() {
            if self.final_attack_offered {
                self.resolve_deck_exhaustion();
            } else {
                self.open_final_attack(player);
            }
            return;
        }
        if !self.has_any_legal_action(player) {
            let winner = player.opponent();
            self.log(
                Severity::Success,
                format!("{} cannot move. {} wins the round.", player, winner),
            );
            self.conclude_round(Some(winner));
            return;
        }
        if riposte {
            self.phase = Phase::DefenderTurn { player };
            self.prompt = format!("{}, take your turn before drawing new cards.", player);
        } else {
            self.phase = Phase::Turn { player };
            self.prompt = format!("{}, it's your turn.", player);
        }
        debug!(%player, phase = %self.phase.kind(), "Turn begins");
    }

    fn draw_if_allowed(&mut self, player: PlayerId) {
        let state = &mut self.players[player.index()];
        if state.must_skip_draw {
            state.must_skip_draw = false;
            trace!(%player, "Draw skipped after riposte");
            return;
        }
        let drawn = state.draw_up_to_full(&mut self.deck);
        trace!(%player, drawn, deck = self.deck.len(), "Drew cards");
    }

    /// Whether any card in hand can move forward, retreat or attack.
    fn has_any_legal_action(&self, player: PlayerId) -> bool {
        let positions = self.positions();
        let distance = self.distance();
        self.player(player).hand.iter().any(|card| {
            Direction::BOTH
                .iter()
                .any(|&direction| is_move_legal(player, positions, card.value(), direction))
                || card.value() == distance
        })
    }

    /// Ends the round. Cards of an unresolved attack go to the discard pile.
    fn conclude_round(&mut self, winner: Option<PlayerId>) {
        self.close_attack();
        self.phase = Phase::RoundEnd { winner };
        match winner {
            None => {
                self.prompt = String::from("Round drawn. Start the next round when ready.");
            }
            Some(winner) => {
                let state = &mut self.players[winner.index()];
                state.score += 1;
                let score = state.score;
                self.prompt = format!("{} wins the round!", winner);
                if score >= ROUNDS_TO_WIN {
                    self.log(Severity::Success, format!("{} wins the match!", winner));
                    self.prompt = format!(
                        "{} wins the match! Start a new match to play again.",
                        winner
                    );
                }
            }
        }
        debug!(round = self.round, winner = ?winner, scores = ?[self.players[0].score, self.players[1].score], "Round ended");
    }

    fn log(&mut self, severity: Severity, message: String) {
        self.history.push(self.round, severity, message);
    }

    /// Panics if cards were lost or duplicated, or the fencers overlap.
    fn check_invariants(&self) {
        let committed = self.phase.attack().map_or(0, |ctx| ctx.cards().len());
        let total = self.deck.len()
            + self.discard.len()
            + self.players[0].hand.len()
            + self.players[1].hand.len()
            + committed;
        assert_eq!(total, DECK_SIZE, "Card conservation violated in {:?}", self.phase);
        let [first, second] = self.positions();
        assert!(
            first < second && second < BOARD_LENGTH,
            "Fencers out of order: {} and {}",
            first,
            second
        );
    }
}

#[cfg(test)]
impl Match {
    /// A match in the middle of a round, with every card placed by hand.
    ///
    /// Hands and deck are given as card values; the deck draws from the back.
    /// All remaining cards are put on the discard pile.
    pub(crate) fn rigged(
        mode: Mode,
        positions: [u8; 2],
        hands: [&[u8]; 2],
        deck: &[u8],
        active: PlayerId,
    ) -> Self {
        let mut game = Match::new(Config {
            mode,
            seed: Some(7),
        });
        let to_cards = |values: &[u8]| -> Vec<Card> {
            values
                .iter()
                .map(|&v| Card::new(v).expect("invalid card value in test setup"))
                .collect()
        };
        let mut remaining = crate::FULL_DECK.to_vec();
        let mut take = |cards: &[Card]| {
            for card in cards {
                let idx = remaining
                    .iter()
                    .position(|c| c == card)
                    .expect("more than five copies of a card in test setup");
                remaining.remove(idx);
            }
        };
        for (player, hand) in PlayerId::BOTH.into_iter().zip(hands) {
            let cards = to_cards(hand);
            take(&cards);
            let state = &mut game.players[player.index()];
            state.hand = cards;
            state.position = positions[player.index()];
        }
        let deck = to_cards(deck);
        take(&deck);
        game.deck = Deck::from_cards(deck);
        game.discard = remaining;
        game.phase = Phase::Turn { player: active };
        game.check_invariants();
        game
    }
}
