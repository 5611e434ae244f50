use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::PALETTE;
use crate::session::{Session, TickFrame};

const SEPARATOR: &str = " │ ";

/// Renders the one-line status bar above the play field.
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    session: &Session,
    tick_frame: &TickFrame,
    score_flash: bool,
) {
    frame.render_widget(
        Paragraph::new(info_line(
            session.player_name(),
            tick_frame.score,
            tick_frame.positions.len(),
            session.tick_interval(),
            score_flash,
        ))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn info_line(
    player_name: &str,
    score: u32,
    length: usize,
    tick_interval: Duration,
    score_flash: bool,
) -> Line<'static> {
    let value_style = Style::default().fg(PALETTE.hud_score);
    let score_style = if score_flash {
        Style::default()
            .fg(PALETTE.menu_title)
            .add_modifier(Modifier::BOLD)
    } else {
        value_style
    };

    Line::from(vec![
        Span::raw("Player: "),
        Span::styled(player_name.to_owned(), value_style),
        Span::raw(SEPARATOR),
        Span::raw("Score: "),
        Span::styled(score.to_string(), score_style),
        Span::raw(SEPARATOR),
        Span::raw("Length: "),
        Span::styled(length.to_string(), value_style),
        Span::raw(SEPARATOR),
        Span::raw("Tick: "),
        Span::styled(format!("{} ms", tick_interval.as_millis()), value_style),
    ])
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::style::Modifier;

    use super::info_line;

    #[test]
    fn info_line_lists_all_values() {
        let line = info_line("Ana", 4, 6, Duration::from_millis(110), false);
        let text: String = line
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();

        assert_eq!(
            text,
            "Player: Ana │ Score: 4 │ Length: 6 │ Tick: 110 ms"
        );
    }

    #[test]
    fn score_is_bold_while_flashing() {
        let line = info_line("Ana", 1, 3, Duration::from_millis(140), true);
        let score = &line.spans[4];

        assert_eq!(score.content, "1");
        assert!(score.style.add_modifier.contains(Modifier::BOLD));
    }
}
