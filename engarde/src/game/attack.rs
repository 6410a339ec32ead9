use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::Match;
use crate::{
    move_target, total_value, Action, AttackSummary, Card, Direction, IllegalAction, Mode, Phase,
    PlayerId, Response, Severity,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    /// Declared from where the attacker stands.
    Standard,
    /// Declared right after stepping forward. Only this kind can be dodged by retreating.
    Advanced,
}

/// A card picked for a parry. It stays in the hand until the parry is resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParrySelection {
    pub card: Card,
    pub card_index: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParryProgress {
    Incomplete { cards_left: usize, value_left: i16 },
    Succeeded,
    Failed,
}

/// The attack being fought out between declaration and resolution.
///
/// The attack cards have left the attacker's hand but are not discarded until
/// the attack is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackContext {
    attacker: PlayerId,
    kind: AttackKind,
    /// All of the same value, the first one is the base card.
    cards: Vec<Card>,
    total: u8,
    parry_selection: Vec<ParrySelection>,
    /// Declared in the final attack window after the deck ran out.
    final_attack: bool,
}

impl AttackContext {
    pub fn new(attacker: PlayerId, kind: AttackKind, base_card: Card, final_attack: bool) -> Self {
        Self {
            attacker,
            kind,
            cards: vec![base_card],
            total: base_card.value(),
            parry_selection: Vec::new(),
            final_attack,
        }
    }

    pub fn attacker(&self) -> PlayerId {
        self.attacker
    }

    pub fn defender(&self) -> PlayerId {
        self.attacker.opponent()
    }

    pub fn kind(&self) -> AttackKind {
        self.kind
    }

    pub fn base_card(&self) -> Card {
        self.cards[0]
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn is_final_attack(&self) -> bool {
        self.final_attack
    }

    /// A parry must use exactly as many cards as the attack.
    pub fn required_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn allows_retreat(&self, mode: Mode) -> bool {
        mode.allows_defense() && self.kind == AttackKind::Advanced
    }

    /// Adds another copy of the base card.
    pub fn strengthen(&mut self, card: Card) -> Result<(), IllegalAction> {
        let base = self.base_card();
        if card != base {
            return Err(IllegalAction::StrengthenMismatch { base, played: card });
        }
        self.cards.push(card);
        self.total += card.value();
        Ok(())
    }

    pub fn parry_progress(&self) -> ParryProgress {
        let selected = self.parry_selection.len();
        let value = total_value(self.parry_selection.iter().map(|selection| selection.card));
        if selected < self.required_cards() {
            ParryProgress::Incomplete {
                cards_left: self.required_cards() - selected,
                value_left: i16::from(self.total) - i16::from(value),
            }
        } else if value == self.total {
            ParryProgress::Succeeded
        } else {
            ParryProgress::Failed
        }
    }

    fn select_for_parry(&mut self, selection: ParrySelection) -> Result<ParryProgress, IllegalAction> {
        if self
            .parry_selection
            .iter()
            .any(|s| s.card_index == selection.card_index)
        {
            return Err(IllegalAction::CardAlreadySelected {
                card_index: selection.card_index,
            });
        }
        self.parry_selection.push(selection);
        Ok(self.parry_progress())
    }

    pub fn summary(&self) -> AttackSummary {
        AttackSummary {
            attacker: self.attacker,
            defender: self.defender(),
            kind: self.kind,
            cards: self.cards.clone(),
            total: self.total,
            parry_selection: self.parry_selection.iter().map(|s| s.card).collect(),
        }
    }
}

impl Match {
    pub(super) fn declare_standard_attack(
        &mut self,
        player: PlayerId,
        card_index: usize,
    ) -> Result<Response, IllegalAction> {
        self.expect_turn(player, Action::Attack { card_index })?;
        let card = self.card_of(player, card_index)?;
        let distance = self.distance();
        if card.value() != distance {
            return Err(IllegalAction::AttackOutOfReach { card, distance });
        }
        self.players[player.index()].take_card(card_index);
        self.log(
            Severity::Info,
            format!("{} launches an attack with a {}.", player, card),
        );
        self.open_attack(AttackContext::new(player, AttackKind::Standard, card, false));
        Ok(self.response())
    }

    /// Takes over an attack whose base card has already left the attacker's hand.
    pub(super) fn open_attack(&mut self, ctx: AttackContext) {
        let attacker = ctx.attacker();
        // Attacking ends a riposte turn, the attacker draws normally afterwards.
        self.players[attacker.index()].must_skip_draw = false;
        debug!(%attacker, kind = ?ctx.kind(), base = %ctx.base_card(), "Attack declared");
        self.phase = Phase::AttackStrengthen(ctx);
        if self.mode.allows_defense() {
            self.prompt = format!(
                "{}, add identical cards to strengthen or finish attack.",
                attacker
            );
        } else {
            self.launch_attack();
        }
    }

    pub(super) fn strengthen_attack(
        &mut self,
        card_index: usize,
        card: Card,
    ) -> Result<Response, IllegalAction> {
        let phase = self.phase.kind();
        let Phase::AttackStrengthen(ctx) = &mut self.phase else {
            return Err(IllegalAction::CardNotExpected { phase });
        };
        ctx.strengthen(card)?;
        let (attacker, total) = (ctx.attacker(), ctx.total());
        self.players[attacker.index()].take_card(card_index);
        self.log(
            Severity::Info,
            format!(
                "{} strengthens the attack with another {} (total {}).",
                attacker, card, total
            ),
        );
        Ok(self.response())
    }

    pub(super) fn finish_attack(&mut self) -> Result<Response, IllegalAction> {
        if !matches!(self.phase, Phase::AttackStrengthen(_)) {
            return Err(IllegalAction::ActionUnavailable {
                action: Action::FinishAttack,
                phase: self.phase.kind(),
            });
        }
        self.launch_attack();
        Ok(self.response())
    }

    /// The attacker refills the hand, then the defender has to answer.
    fn launch_attack(&mut self) {
        let Some(ctx) = self.phase.attack() else {
            return;
        };
        let (attacker, defender) = (ctx.attacker(), ctx.defender());
        let (required, total) = (ctx.required_cards(), ctx.total());
        let retreat_allowed = ctx.allows_retreat(self.mode);

        let drawn = self.players[attacker.index()].draw_up_to_full(&mut self.deck);
        trace!(%attacker, drawn, deck = self.deck.len(), "Attacker refilled hand");

        if !self.mode.allows_defense() {
            self.log(Severity::Success, format!("{}'s attack lands a hit!", attacker));
            self.conclude_round(Some(attacker));
            return;
        }
        let can_parry = self.player(defender).hand.len() >= required;
        let can_retreat = retreat_allowed && self.has_legal_retreat(defender);
        if !can_parry && !can_retreat {
            self.log(
                Severity::Danger,
                format!(
                    "{} cannot gather {} card(s) to parry. {}'s attack lands a hit!",
                    defender, required, attacker
                ),
            );
            self.conclude_round(Some(attacker));
            return;
        }

        self.transition_attack(Phase::AwaitParry);
        self.prompt = match (can_parry, retreat_allowed) {
            (true, false) => format!(
                "{}, parry the attack by selecting {} card(s) totaling {}.",
                defender, required, total
            ),
            (true, true) => format!(
                "{}, parry the attack by selecting {} card(s) totaling {}, or retreat.",
                defender, required, total
            ),
            (false, _) => format!(
                "{}, too few cards to parry. Retreat to avoid the attack.",
                defender
            ),
        };
    }

    pub(super) fn select_parry_card(
        &mut self,
        card_index: usize,
        card: Card,
    ) -> Result<Response, IllegalAction> {
        let phase = self.phase.kind();
        let Phase::AwaitParry(ctx) = &mut self.phase else {
            return Err(IllegalAction::CardNotExpected { phase });
        };
        let defender = ctx.defender();
        let in_hand = self.players[defender.index()].hand.len();
        if in_hand < ctx.required_cards() {
            return Err(IllegalAction::NotEnoughCardsToParry {
                required: ctx.required_cards(),
                in_hand,
            });
        }
        let progress = ctx.select_for_parry(ParrySelection { card, card_index })?;
        let attacker = ctx.attacker();
        trace!(%defender, %card, ?progress, "Parry card selected");

        match progress {
            ParryProgress::Incomplete {
                cards_left,
                value_left,
            } => {
                self.prompt = format!(
                    "{}, select {} more card(s) totaling {}.",
                    defender, cards_left, value_left
                );
            }
            ParryProgress::Succeeded => {
                self.log(Severity::Success, format!("{} parries successfully.", defender));
                self.resolve_parry();
            }
            ParryProgress::Failed => {
                self.log(
                    Severity::Danger,
                    format!("{} fails to meet the attack value.", defender),
                );
                self.discard_parry_selection();
                self.log(Severity::Success, format!("{}'s attack lands a hit!", attacker));
                self.conclude_round(Some(attacker));
            }
        }
        Ok(self.response())
    }

    /// Moves the selected parry cards from the defender's hand to the discard pile.
    fn discard_parry_selection(&mut self) {
        let Phase::AwaitParry(ctx) = &mut self.phase else {
            return;
        };
        let defender = ctx.defender();
        let mut selection = std::mem::take(&mut ctx.parry_selection);
        // Highest index first, so the indices still to be removed stay valid.
        selection.sort_by(|a, b| b.card_index.cmp(&a.card_index));
        for ParrySelection { card_index, .. } in selection {
            let card = self.players[defender.index()].take_card(card_index);
            self.discard.push(card);
        }
    }

    /// The defender gets a riposte turn, without drawing at its end.
    fn resolve_parry(&mut self) {
        self.discard_parry_selection();
        let Some(ctx) = self.close_attack() else {
            return;
        };
        let defender = ctx.defender();
        self.players[defender.index()].must_skip_draw = true;
        if ctx.is_final_attack() {
            self.resolve_deck_exhaustion();
        } else {
            self.begin_turn(defender, true);
        }
    }

    /// Repeats what the parry still needs.
    pub(super) fn parry_prompt(&self) -> Result<Response, IllegalAction> {
        let Phase::AwaitParry(ctx) = &self.phase else {
            return Err(IllegalAction::ActionUnavailable {
                action: Action::Parry,
                phase: self.phase.kind(),
            });
        };
        let prompt = match ctx.parry_progress() {
            ParryProgress::Incomplete {
                cards_left,
                value_left,
            } => format!(
                "{}, select {} card(s) totaling {}.",
                ctx.defender(),
                cards_left,
                value_left
            ),
            _ => self.prompt.clone(),
        };
        Ok(Response {
            phase: self.phase.kind(),
            prompt,
            actions: self.legal_actions(),
        })
    }

    pub(super) fn begin_retreat(&mut self) -> Result<Response, IllegalAction> {
        let phase = self.phase.kind();
        let mode = self.mode;
        let unavailable = IllegalAction::ActionUnavailable {
            action: Action::Retreat,
            phase,
        };
        let Phase::AwaitParry(ctx) = &mut self.phase else {
            return Err(unavailable);
        };
        if !ctx.allows_retreat(mode) {
            return Err(unavailable);
        }
        let defender = ctx.defender();
        ctx.parry_selection.clear();
        self.transition_attack(Phase::AwaitRetreatCard);
        self.prompt = format!("{}, choose a card to retreat backward.", defender);
        Ok(self.response())
    }

    pub(super) fn cancel_retreat(&mut self) -> Result<Response, IllegalAction> {
        let Phase::AwaitRetreatCard(ctx) = &self.phase else {
            return Err(IllegalAction::ActionUnavailable {
                action: Action::CancelRetreat,
                phase: self.phase.kind(),
            });
        };
        let defender = ctx.defender();
        let can_parry = self.player(defender).hand.len() >= ctx.required_cards();
        self.transition_attack(Phase::AwaitParry);
        self.prompt = if can_parry {
            format!("{}, parry the attack or retreat.", defender)
        } else {
            format!("{}, too few cards to parry. Retreat to avoid the attack.", defender)
        };
        Ok(self.response())
    }

    /// The defender steps back out of reach. The attacker keeps the initiative.
    pub(super) fn retreat_with(&mut self, card_index: usize, card: Card) -> Result<Response, IllegalAction> {
        let Phase::AwaitRetreatCard(ctx) = &self.phase else {
            return Err(IllegalAction::CardNotExpected {
                phase: self.phase.kind(),
            });
        };
        let (attacker, defender) = (ctx.attacker(), ctx.defender());
        let target = move_target(defender, self.positions(), card.value(), Direction::Backward)
            .ok_or(IllegalAction::RetreatNotPossible { card })?;

        let state = &mut self.players[defender.index()];
        state.take_card(card_index);
        state.position = target;
        self.discard.push(card);
        self.log(
            Severity::Warning,
            format!("{} retreats {} space(s) to avoid the attack.", defender, card),
        );
        self.players[defender.index()].draw_up_to_full(&mut self.deck);
        self.close_attack();
        self.begin_turn(attacker, false);
        if matches!(self.phase, Phase::Turn { .. }) {
            self.prompt = format!("{} retains initiative after the retreat.", attacker);
        }
        Ok(self.response())
    }

    fn has_legal_retreat(&self, player: PlayerId) -> bool {
        let positions = self.positions();
        self.player(player)
            .hand
            .iter()
            .any(|card| move_target(player, positions, card.value(), Direction::Backward).is_some())
    }

    /// Moves the attack in progress into another attack phase.
    fn transition_attack(&mut self, to: fn(AttackContext) -> Phase) {
        if let Some(ctx) = self.take_attack() {
            self.phase = to(ctx);
        }
    }

    /// Removes the attack in progress from the phase. The caller sets the next phase.
    fn take_attack(&mut self) -> Option<AttackContext> {
        let placeholder = Phase::RoundEnd { winner: None };
        match std::mem::replace(&mut self.phase, placeholder) {
            Phase::AttackStrengthen(ctx) | Phase::AwaitParry(ctx) | Phase::AwaitRetreatCard(ctx) => {
                Some(ctx)
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// Ends the attack in progress, if any. Its cards go to the discard pile.
    pub(super) fn close_attack(&mut self) -> Option<AttackContext> {
        let ctx = self.take_attack()?;
        self.discard.extend_from_slice(ctx.cards());
        Some(ctx)
    }
}
