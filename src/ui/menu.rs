use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table};
use unicode_width::UnicodeWidthChar;

use crate::app::{MAX_NAME_WIDTH, MenuState};
use crate::config::PALETTE;
use crate::leaderboard::Leaderboard;
use crate::session::{EndCause, RoundSummary};

/// Rows shown in the leaderboard table.
const LEADERBOARD_ROWS: usize = 10;

/// Draws the start/end-of-round menu with the leaderboard.
pub fn render_menu(frame: &mut Frame<'_>, area: Rect, menu: &MenuState, leaderboard: &Leaderboard) {
    let popup = centered_popup(area, 60, 90);
    frame.render_widget(Clear, popup);

    let [title_row, form_row, table_row, footer_row] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(7),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(PALETTE.menu_title)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let mut form = vec![
        Line::from(last_round_text(menu.last_round.as_ref())),
        Line::from(""),
        Line::from(format!("Name:   {}_", menu.config.player_name)),
        Line::from(format!("Fruits: < {} >", menu.config.fruit_count)),
        Line::from(""),
    ];
    if let Some(error) = &menu.error {
        form.push(Line::styled(error.clone(), Style::default().fg(PALETTE.error)));
    }
    frame.render_widget(
        Paragraph::new(form)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" new round ")),
        form_row,
    );

    frame.render_widget(leaderboard_table(leaderboard), table_row);

    frame.render_widget(
        Paragraph::new(Line::from(
            "[Enter] Start  [↑/↓] Fruits  [Esc] Quit  In game: arrows/WASD",
        ))
        .alignment(Alignment::Center)
        .style(Style::default().fg(PALETTE.menu_footer)),
        footer_row,
    );
}

fn leaderboard_table(leaderboard: &Leaderboard) -> Table<'static> {
    let rows = leaderboard
        .entries()
        .iter()
        .take(LEADERBOARD_ROWS)
        .enumerate()
        .map(|(rank, entry)| {
            Row::new(vec![
                Cell::from(format!("{}.", rank + 1)),
                Cell::from(truncate_to_width(&entry.player_name, MAX_NAME_WIDTH)),
                Cell::from(entry.best_score.to_string()),
            ])
        });

    Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(6),
        ],
    )
    .header(
        Row::new(vec!["#", "Name", "Score"]).style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::bordered().title(" leaderboard "))
}

fn last_round_text(last_round: Option<&RoundSummary>) -> String {
    let Some(summary) = last_round else {
        return "Type your name and press Enter".to_owned();
    };

    let cause = match summary.cause {
        EndCause::Bounds => "You hit the wall",
        EndCause::SelfCollision => "You hit yourself",
        EndCause::BoardFull => "The board is full",
        EndCause::Abandoned => "Round abandoned",
    };
    format!("{cause}! Score: {}", summary.final_score)
}

/// Cuts `text` so it occupies at most `max_width` terminal columns.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut width = 0;
    text.chars()
        .take_while(|ch| {
            width += ch.width().unwrap_or(0);
            width <= max_width
        })
        .collect()
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
