use engarde::{
    ActionOption, Config, IllegalAction, Match, Mode, PlayerId, Response, ROUNDS_TO_WIN,
};
use ratatui::{crossterm::event::KeyCode, prelude::*, widgets::*};

use crate::widgets::{log_line, score_pips, HandCardsWidget, PisteWidget};

/// Keys that pick an entry of the action list.
const ACTION_KEYS: [char; 9] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i'];

pub struct App {
    game: Match,
    prompt: String,
    actions: Vec<ActionOption>,
    /// The corrective prompt of the last rejected input.
    rejection: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let game = Match::new(config);
        let response = game.response();
        Self {
            game,
            prompt: response.prompt,
            actions: response.actions,
            rejection: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        let KeyCode::Char(key) = code else {
            return;
        };
        match key {
            'q' => self.should_quit = true,
            'n' => {
                let response = self.game.new_match();
                self.apply(Ok(response));
            }
            'r' => {
                let result = self.game.next_round();
                self.apply(result);
            }
            'm' => {
                let mode = match self.game.next_round_mode() {
                    Mode::Basic => Mode::Advanced,
                    Mode::Advanced => Mode::Basic,
                };
                self.game.select_mode(mode);
                self.rejection = None;
            }
            '1'..='5' => {
                let card_index = key as usize - '1' as usize;
                let result = match self.game.acting_player() {
                    Some(player) => self.game.play_card(player, card_index),
                    None => Err(IllegalAction::NoRoundInProgress),
                };
                self.apply(result);
            }
            _ => {
                let Some(idx) = ACTION_KEYS.iter().position(|&k| k == key) else {
                    return;
                };
                let Some(action) = self.actions.get(idx).map(|option| option.action) else {
                    return;
                };
                let result = match self.game.acting_player() {
                    Some(player) => self.game.perform(player, action),
                    None => Err(IllegalAction::NoRoundInProgress),
                };
                self.apply(result);
            }
        }
    }

    fn apply(&mut self, result: Result<Response, IllegalAction>) {
        match result {
            Ok(response) => {
                self.prompt = response.prompt;
                self.actions = response.actions;
                self.rejection = None;
            }
            Err(err) => self.rejection = Some(err.to_string()),
        }
    }

    pub fn ui(&self, frame: &mut Frame) {
        let snapshot = self.game.snapshot();
        let main_layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ],
        )
        .split(frame.size());

        let deck = if snapshot.deck_exhausted {
            String::from("exhausted")
        } else {
            snapshot.deck_count.to_string()
        };
        let header = Line::from(vec![
            Span::styled(format!("Round {} ", snapshot.round), Style::new().bold()),
            Span::raw(format!("({}, next: {})  ", snapshot.mode, snapshot.next_round_mode)),
            Span::styled("P1 ", Style::new().fg(Color::Cyan)),
            Span::raw(score_pips(snapshot.scores[0])),
            Span::raw("  "),
            Span::styled("P2 ", Style::new().fg(Color::Magenta)),
            Span::raw(score_pips(snapshot.scores[1])),
            Span::raw(format!("  first to {}  |  deck {}", ROUNDS_TO_WIN, deck)),
        ]);
        frame.render_widget(Paragraph::new(header), main_layout[0]);

        frame.render_widget(
            PisteWidget {
                positions: snapshot.positions,
            },
            main_layout[1],
        );

        for (player, area) in PlayerId::BOTH.into_iter().zip([main_layout[2], main_layout[3]]) {
            frame.render_widget(
                HandCardsWidget {
                    title: format!(" {} ", player),
                    cards: &snapshot.hands[player.index()],
                    highlighted: snapshot.acting_player == Some(player),
                },
                area,
            );
        }

        let mut prompt = vec![Line::from(self.prompt.as_str())];
        if let Some(rejection) = &self.rejection {
            prompt.push(Line::styled(rejection.as_str(), Style::new().fg(Color::Red)));
        }
        frame.render_widget(
            Paragraph::new(prompt).block(Block::new().borders(Borders::all()).title(" Prompt ")),
            main_layout[4],
        );

        let bottom = Layout::new(
            Direction::Horizontal,
            [Constraint::Percentage(40), Constraint::Percentage(60)],
        )
        .split(main_layout[5]);
        let actions: Vec<ListItem> = self
            .actions
            .iter()
            .zip(ACTION_KEYS)
            .map(|(option, key)| ListItem::new(format!("{}) {}", key, option.label)))
            .collect();
        frame.render_widget(
            List::new(actions).block(Block::new().borders(Borders::all()).title(" Actions ")),
            bottom[0],
        );

        let entries = self.game.log_entries();
        let visible = usize::from(bottom[1].height.saturating_sub(2));
        let log: Vec<ListItem> = entries[entries.len().saturating_sub(visible)..]
            .iter()
            .map(|entry| ListItem::new(log_line(entry)))
            .collect();
        frame.render_widget(
            List::new(log).block(Block::new().borders(Borders::all()).title(" Log ")),
            bottom[1],
        );

        frame.render_widget(
            Paragraph::new("1-5 card  a-i action  n new match  r next round  m mode  q quit")
                .style(Style::new().fg(Color::DarkGray)),
            main_layout[6],
        );
    }
}
