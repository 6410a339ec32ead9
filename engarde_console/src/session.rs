use std::io::Write;

use engarde::{
    visualize_snapshot, Action, ActionOption, Config, IllegalAction, Match, Phase, PhaseKind,
    Response,
};
use tracing::{debug, info};

use crate::command::{Command, HELP};
use crate::recording::Recorder;

/// Whether the input loop should go on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A match driven by console commands.
pub struct Session {
    game: Match,
    recorder: Option<Recorder>,
    /// Print snapshots as JSON instead of text.
    json: bool,
    /// The action list printed last, which `do <n>` refers to.
    actions: Vec<ActionOption>,
    /// How many log entries have been printed already.
    log_seen: usize,
}

impl Session {
    pub fn new(config: Config, recorder: Option<Recorder>, json: bool) -> Self {
        let game = Match::new(config);
        let actions = game.legal_actions();
        Self {
            game,
            recorder,
            json,
            actions,
            log_seen: 0,
        }
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    /// Prints the current state, e.g. at startup.
    pub fn print_state(&mut self, out: &mut impl Write) -> anyhow::Result<()> {
        let response = self.game.response();
        self.print_response(&response, out)
    }

    /// Parses and executes one line of input.
    ///
    /// Rejected commands are printed and are not errors; errors are I/O failures.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> anyhow::Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "! {}", err)?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "Command");

        let acting = self.game.acting_player();
        let round_over = matches!(self.game.phase(), Phase::RoundEnd { .. });
        let result = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(Flow::Continue);
            }
            Command::Show => {
                writeln!(out, "{}", self.render())?;
                return Ok(Flow::Continue);
            }
            Command::Log => {
                for entry in self.game.log_entries() {
                    writeln!(out, "{}", entry)?;
                }
                self.log_seen = self.game.history().len();
                return Ok(Flow::Continue);
            }
            Command::Mode(mode) => {
                self.game.select_mode(mode);
                Ok(self.game.response())
            }
            Command::New => Ok(self.game.new_match()),
            Command::Next => self.game.next_round(),
            Command::Card { player, card_index } => self.game.play_card(player, card_index),
            Command::Do { action_number } => match self
                .actions
                .get(action_number - 1)
                .map(|option| option.action)
            {
                Some(action) => self.perform(action),
                None => {
                    writeln!(out, "! There is no action {}.", action_number)?;
                    return Ok(Flow::Continue);
                }
            },
            Command::Pass => self.perform(Action::Pass),
            Command::Finish => self.perform(Action::FinishAttack),
            Command::Retreat => self.perform(Action::Retreat),
            Command::Parry => self.perform(Action::Parry),
            Command::Cancel => {
                let action = match self.game.phase().kind() {
                    PhaseKind::AdvanceAttack => Action::CancelAdvance,
                    _ => Action::CancelRetreat,
                };
                self.perform(action)
            }
        };

        if let Some(recorder) = &mut self.recorder {
            let outcome = result.as_ref().map_err(IllegalAction::to_string);
            recorder.store_step(acting, line.trim(), outcome);
        }
        match result {
            Ok(response) => self.print_response(&response, out)?,
            Err(err) => {
                info!(%err, "Input rejected");
                writeln!(out, "! {}", err)?;
            }
        }

        if !round_over {
            if let Phase::RoundEnd { winner } = *self.game.phase() {
                if let Some(recorder) = &mut self.recorder {
                    let path =
                        recorder.write_round_recording(self.game.round(), self.game.mode(), winner)?;
                    writeln!(out, "Round recorded to {}", path.display())?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Performs an action for whoever is acting right now.
    fn perform(&mut self, action: Action) -> Result<Response, IllegalAction> {
        let player = self
            .game
            .acting_player()
            .ok_or(IllegalAction::NoRoundInProgress)?;
        self.game.perform(player, action)
    }

    fn print_response(&mut self, response: &Response, out: &mut impl Write) -> anyhow::Result<()> {
        for entry in self.game.history().since(self.log_seen) {
            writeln!(out, "  {}", entry)?;
        }
        self.log_seen = self.game.history().len();

        if self.json {
            writeln!(out, "{}", serde_json::to_string(&self.game.snapshot())?)?;
            writeln!(out, "{}", serde_json::to_string(response)?)?;
        } else {
            writeln!(out, "{}", self.render())?;
            writeln!(out, "{}", response.prompt)?;
            for (idx, option) in response.actions.iter().enumerate() {
                writeln!(out, "  {}) {}", idx + 1, option.label)?;
            }
        }
        self.actions = response.actions.clone();
        Ok(())
    }

    fn render(&self) -> String {
        visualize_snapshot(&self.game.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use engarde::{Mode, PlayerId};

    use super::*;

    fn run(session: &mut Session, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            session.handle_line(line, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    fn session(mode: Mode) -> Session {
        Session::new(
            Config {
                mode,
                seed: Some(11),
            },
            None,
            false,
        )
    }

    #[test]
    fn selecting_a_card_lists_numbered_options() {
        let mut session = session(Mode::Basic);
        let output = run(&mut session, &["card 1 1"]);
        assert!(output.contains("Player 1, choose an action for card"));
        assert!(output.contains("  1) Move "));
        // Nothing was committed.
        assert_eq!(session.game().acting_player(), Some(PlayerId::One));
    }

    #[test]
    fn do_performs_the_listed_action() {
        let mut session = session(Mode::Basic);
        run(&mut session, &["card 1 1", "do 1"]);
        // At the start of a round the only option of any card is to move forward.
        assert_eq!(session.game().acting_player(), Some(PlayerId::Two));
        assert_eq!(session.game().player(PlayerId::One).hand.len(), 5);
        assert!(session.game().positions()[0] > 0);
    }

    #[test]
    fn rejections_are_printed_and_change_nothing() {
        let mut session = session(Mode::Basic);
        let before = session.game().snapshot();
        let output = run(&mut session, &["card 2 1", "finish", "do 9", "fence"]);
        assert!(output.contains("! It is not Player 2's turn."));
        assert!(output.contains("! FinishAttack is not possible during turn."));
        assert!(output.contains("! There is no action 9."));
        assert!(output.contains("! Unknown command 'fence'"));
        assert_eq!(session.game().snapshot(), before);
    }

    #[test]
    fn mode_applies_to_the_next_round() {
        let mut session = session(Mode::Basic);
        let output = run(&mut session, &["mode advanced", "next"]);
        assert!(output.contains("Mode set to advanced. It applies from the next round."));
        assert!(output.contains("! The current round is not finished yet."));
        assert_eq!(session.game().mode(), Mode::Basic);
        assert_eq!(session.game().next_round_mode(), Mode::Advanced);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut session = session(Mode::Basic);
        let mut out = Vec::new();
        assert_eq!(session.handle_line("quit", &mut out).unwrap(), Flow::Quit);
        assert_eq!(session.handle_line("show", &mut out).unwrap(), Flow::Continue);
    }
}
