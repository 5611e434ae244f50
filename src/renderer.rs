use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::app::{App, Screen};
use crate::config::{
    GLYPH_EMPTY_CELL, GLYPH_FRUIT, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD, PALETTE, Palette,
};
use crate::fruit::{Fruit, FruitKind};
use crate::grid::{Coordinate, Grid};
use crate::session::TickFrame;
use crate::ui::hud::render_hud;
use crate::ui::menu::render_menu;

/// Terminal columns per grid cell, so cells look roughly square.
const COLUMNS_PER_CELL: u16 = 2;

/// Renders the full frame from immutable state.
pub fn render(frame: &mut Frame<'_>, app: &App, now: std::time::Instant) {
    let area = frame.area();

    match &app.screen {
        Screen::Menu(menu) => render_menu(frame, area, menu, &app.leaderboard),
        Screen::Playing(session) => {
            let fallback;
            let tick_frame = match app.last_frame() {
                Some(tick_frame) => tick_frame,
                None => {
                    fallback = session.frame();
                    &fallback
                }
            };

            let [hud_area, field_area] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
            render_hud(
                frame,
                hud_area,
                session,
                tick_frame,
                app.score_flash_active(now),
            );
            render_field(frame, field_area, session.grid(), tick_frame);
        }
    }
}

fn render_field(frame: &mut Frame<'_>, area: Rect, grid: Grid, tick_frame: &TickFrame) {
    let size = grid.size();
    let block = Block::bordered().border_style(Style::new().fg(PALETTE.border_fg));

    let [field] = Layout::horizontal([Constraint::Length(
        size.width.saturating_mul(COLUMNS_PER_CELL).saturating_add(2),
    )])
    .flex(Flex::Center)
    .areas(area);
    let [field] = Layout::vertical([Constraint::Length(size.height.saturating_add(2))])
        .flex(Flex::Center)
        .areas(field);

    let inner = block.inner(field);
    frame.render_widget(block, field);

    render_cells(frame, inner, grid);
    render_fruits(frame, inner, grid, &tick_frame.fruits);
    render_snake(frame, inner, grid, &tick_frame.positions);
}

fn render_cells(frame: &mut Frame<'_>, inner: Rect, grid: Grid) {
    let style = Style::new().fg(PALETTE.grid_line).bg(PALETTE.play_bg);
    let buffer = frame.buffer_mut();
    for cell in grid.cells() {
        if let Some((x, y)) = world_to_terminal(inner, grid, cell) {
            buffer.set_string(x, y, GLYPH_EMPTY_CELL, style);
        }
    }
}

fn render_fruits(frame: &mut Frame<'_>, inner: Rect, grid: Grid, fruits: &[Fruit]) {
    let buffer = frame.buffer_mut();
    for fruit in fruits {
        let Some((x, y)) = world_to_terminal(inner, grid, fruit.position) else {
            continue;
        };
        let style = Style::new()
            .fg(fruit_color(&PALETTE, fruit.kind))
            .bg(PALETTE.play_bg);
        buffer.set_string(x, y, GLYPH_FRUIT, style);
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, grid: Grid, positions: &[Coordinate]) {
    let buffer = frame.buffer_mut();

    // Draw the tail first so the head wins on a shared cell.
    for (index, segment) in positions.iter().enumerate().rev() {
        let Some((x, y)) = world_to_terminal(inner, grid, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(PALETTE.snake_head)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(PALETTE.snake_body));
        }
    }
}

fn fruit_color(palette: &Palette, kind: FruitKind) -> ratatui::style::Color {
    match kind {
        FruitKind::Apple => palette.apple,
        FruitKind::Pear => palette.pear,
        FruitKind::Banana => palette.banana,
    }
}

fn world_to_terminal(inner: Rect, grid: Grid, position: Coordinate) -> Option<(u16, u16)> {
    let (column, row) = grid.cell_index(position)?;

    let x = inner
        .x
        .saturating_add(column.saturating_mul(COLUMNS_PER_CELL));
    let y = inner.y.saturating_add(row);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use super::{render_snake, world_to_terminal};
    use crate::grid::{Coordinate, Grid};

    #[test]
    fn cells_map_to_two_column_slots() {
        let inner = Rect::new(1, 1, 40, 15);
        let grid = Grid::standard();

        assert_eq!(
            world_to_terminal(inner, grid, Coordinate::new(0, 0)),
            Some((1, 1))
        );
        assert_eq!(
            world_to_terminal(inner, grid, Coordinate::new(320, 200)),
            Some((17, 6))
        );
    }

    #[test]
    fn off_grid_positions_are_not_drawn() {
        let inner = Rect::new(0, 0, 40, 15);
        assert_eq!(
            world_to_terminal(inner, Grid::standard(), Coordinate::new(800, 200)),
            None
        );
    }

    #[test]
    fn snake_is_drawn_from_frame_positions() {
        let mut terminal = Terminal::new(TestBackend::new(40, 15)).expect("test backend");
        let positions = [Coordinate::new(40, 0), Coordinate::new(0, 0)];

        terminal
            .draw(|frame| {
                render_snake(frame, Rect::new(0, 0, 40, 15), Grid::standard(), &positions);
            })
            .expect("draw succeeds");

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(2, 0)].symbol(), "█");
        assert_eq!(buffer[(0, 0)].symbol(), "▓");
        assert_eq!(buffer[(4, 0)].symbol(), " ");
    }

    #[test]
    fn cramped_terminal_clips_cells() {
        let inner = Rect::new(0, 0, 10, 5);
        assert_eq!(
            world_to_terminal(inner, Grid::standard(), Coordinate::new(400, 40)),
            None
        );
    }
}
