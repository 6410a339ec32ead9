use engarde::{Card, LogEntry, Severity, BOARD_LENGTH, ROUNDS_TO_WIN};
use ratatui::{prelude::*, widgets::*};

const CELL_WIDTH: u16 = 3;

const CARD_WIDTH: u16 = 6;

const HAND_CARDS_WIDGET_WIDTH: u16 = CARD_WIDTH * 5;

/// The 23 cells of the piste with both fencers on it.
pub struct PisteWidget {
    pub positions: [u8; 2],
}

impl Widget for PisteWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let distance = self.positions[1] - self.positions[0];
        let block = Block::new()
            .border_type(BorderType::Rounded)
            .borders(Borders::all())
            .title(format!(" Piste | distance {} ", distance));
        let inner = block.inner(area);
        block.render(area, buf);

        let width = CELL_WIDTH * u16::from(BOARD_LENGTH);
        let inner = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(width),
                Constraint::Min(0),
            ])
            .split(inner)[1];
        for position in 0..BOARD_LENGTH {
            let x = inner.x + CELL_WIDTH * u16::from(position);
            if x + CELL_WIDTH > inner.x + inner.width || inner.height == 0 {
                break;
            }
            let (text, style) = if position == self.positions[0] {
                ("P1", Style::new().fg(Color::Cyan).bold())
            } else if position == self.positions[1] {
                ("P2", Style::new().fg(Color::Magenta).bold())
            } else {
                (" ·", Style::new().fg(Color::DarkGray))
            };
            buf.set_string(x, inner.y, text, style);
            if inner.height > 1 && position % 5 == 0 {
                buf.set_string(
                    x,
                    inner.y + 1,
                    format!("{:>2}", position),
                    Style::new().fg(Color::DarkGray),
                );
            }
        }
    }
}

/// A row of hand cards, each boxed and titled with the key that plays it.
pub struct HandCardsWidget<'a> {
    pub title: String,
    pub cards: &'a [Card],
    pub highlighted: bool,
}

impl Widget for HandCardsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.highlighted {
            Style::new().fg(Color::Yellow)
        } else {
            Style::new()
        };
        let block = Block::new()
            .borders(Borders::all())
            .border_style(border_style)
            .title(self.title);
        let inner = block.inner(area);
        block.render(area, buf);

        let inner = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(HAND_CARDS_WIDGET_WIDTH),
                Constraint::Min(0),
            ])
            .split(inner)[1];
        if inner.height < 3 {
            return;
        }
        for (idx, card) in self.cards.iter().enumerate() {
            let x = inner.x + CARD_WIDTH * idx as u16;
            if x + CARD_WIDTH > inner.x + inner.width {
                break;
            }
            let card_block = Block::new()
                .border_type(BorderType::Rounded)
                .borders(Borders::all())
                .border_style(border_style)
                .title(format!("{}", idx + 1));
            card_block.render(
                Rect {
                    x,
                    y: inner.y,
                    width: CARD_WIDTH,
                    height: inner.height.min(3),
                },
                buf,
            );
            buf.set_string(x + 2, inner.y + 1, card.to_string(), Style::new().bold());
        }
    }
}

/// `●●○○○` for two rounds won.
pub fn score_pips(score: u32) -> String {
    (0..ROUNDS_TO_WIN)
        .map(|idx| if idx < score { '●' } else { '○' })
        .collect()
}

pub fn log_line(entry: &LogEntry) -> Line<'_> {
    let color = match entry.severity {
        Severity::Info => Color::Gray,
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Danger => Color::Red,
    };
    Line::from(vec![
        Span::styled(format!("[{}] ", entry.round), Style::new().fg(Color::DarkGray)),
        Span::styled(entry.message.as_str(), Style::new().fg(color)),
    ])
}
