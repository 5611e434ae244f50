use ratatui::style::Color;

use crate::grid::Coordinate;

/// Canvas width in world units.
pub const CANVAS_WIDTH: i32 = 800;

/// Canvas height in world units.
pub const CANVAS_HEIGHT: i32 = 600;

/// Edge length of one grid cell in world units.
pub const CELL_SIZE: i32 = 40;

/// Tick interval at the start of every round, in milliseconds.
pub const INITIAL_TICK_INTERVAL_MS: u64 = 150;

/// Fastest tick interval a round can reach, in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Interval reduction applied on every fruit eaten, in milliseconds.
pub const TICK_INTERVAL_STEP_MS: u64 = 10;

/// Fruit count used when the player does not pick one.
pub const DEFAULT_FRUIT_COUNT: usize = 1;

/// Upper bound offered by the menu's fruit selector.
pub const MAX_FRUIT_COUNT: usize = 9;

/// Starting body, head first. The snake starts still.
pub const STARTING_BODY: [Coordinate; 2] = [Coordinate::new(320, 200), Coordinate::new(280, 200)];

/// Logical grid dimensions in cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Per-round settings chosen in the menu.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RoundConfig {
    pub player_name: String,
    pub fruit_count: usize,
}

impl RoundConfig {
    #[must_use]
    pub fn new(player_name: impl Into<String>, fruit_count: usize) -> Self {
        Self {
            player_name: player_name.into(),
            fruit_count,
        }
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_FRUIT_COUNT)
    }
}

/// Colors used by the terminal front end.
#[derive(Debug)]
pub struct Palette {
    pub snake_head: Color,
    pub snake_body: Color,
    pub apple: Color,
    pub pear: Color,
    pub banana: Color,
    pub grid_line: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_score: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
    pub error: Color,
}

pub const PALETTE: Palette = Palette {
    snake_head: Color::White,
    snake_body: Color::Green,
    apple: Color::Red,
    pear: Color::LightGreen,
    banana: Color::Yellow,
    grid_line: Color::DarkGray,
    play_bg: Color::Black,
    border_fg: Color::Gray,
    hud_score: Color::White,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
    error: Color::LightRed,
};

/// Glyph drawn for the snake head.
pub const GLYPH_SNAKE_HEAD: &str = "██";

/// Glyph drawn for body segments.
pub const GLYPH_SNAKE_BODY: &str = "▓▓";

/// Glyph drawn for fruit.
pub const GLYPH_FRUIT: &str = "●";

/// Glyph drawn for empty cells.
pub const GLYPH_EMPTY_CELL: &str = "· ";
