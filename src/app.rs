use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

use crate::config::{MAX_FRUIT_COUNT, RoundConfig};
use crate::grid::Grid;
use crate::input::{GameInput, MenuInput, map_game_key, map_menu_key};
use crate::leaderboard::Leaderboard;
use crate::session::{EndCause, RoundSummary, Session, SessionEvent, TickFrame};

/// Widest player name the menu accepts, in terminal columns.
pub const MAX_NAME_WIDTH: usize = 16;

/// How long the score stays highlighted after a change.
pub const SCORE_FLASH_DURATION: Duration = Duration::from_secs(1);

/// Upper bound on one input wait so the screen keeps refreshing.
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Start/end-of-round menu state.
#[derive(Debug, Clone, Default)]
pub struct MenuState {
    pub config: RoundConfig,
    pub error: Option<String>,
    pub last_round: Option<RoundSummary>,
}

impl MenuState {
    fn push_char(&mut self, ch: char) {
        let mut candidate = self.config.player_name.clone();
        candidate.push(ch);
        if candidate.width() <= MAX_NAME_WIDTH {
            self.config.player_name = candidate;
            self.error = None;
        }
    }

    fn adjust_fruits(&mut self, more: bool) {
        let count = &mut self.config.fruit_count;
        *count = if more {
            (*count + 1).min(MAX_FRUIT_COUNT)
        } else {
            count.saturating_sub(1).max(1)
        };
    }
}

#[derive(Debug, Clone)]
pub enum Screen {
    Menu(MenuState),
    Playing(Session),
}

/// Front-end options supplied at launch.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub initial_config: RoundConfig,
    pub seed: Option<u64>,
    pub leaderboard_path: Option<PathBuf>,
}

/// Binary-side state machine: menu, running round, back to menu.
#[derive(Debug)]
pub struct App {
    pub screen: Screen,
    pub leaderboard: Leaderboard,
    pub score_changed_at: Option<Instant>,
    /// Latest snapshot of the running round; what the renderer draws.
    last_frame: Option<TickFrame>,
    grid: Grid,
    seed: Option<u64>,
    rounds_started: u64,
    leaderboard_path: Option<PathBuf>,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(options: AppOptions, leaderboard: Leaderboard, grid: Grid) -> Self {
        let mut config = options.initial_config;
        config.fruit_count = config.fruit_count.clamp(1, MAX_FRUIT_COUNT);

        Self {
            screen: Screen::Menu(MenuState {
                config,
                ..MenuState::default()
            }),
            leaderboard,
            score_changed_at: None,
            last_frame: None,
            grid,
            seed: options.seed,
            rounds_started: 0,
            leaderboard_path: options.leaderboard_path,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Routes a key press according to the current screen.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match self.screen {
            Screen::Menu(_) => {
                if let Some(input) = map_menu_key(key) {
                    self.handle_menu_input(input, now);
                }
            }
            Screen::Playing(_) => {
                if let Some(input) = map_game_key(key) {
                    self.handle_game_input(input, now);
                }
            }
        }
    }

    pub fn handle_menu_input(&mut self, input: MenuInput, now: Instant) {
        let Screen::Menu(menu) = &mut self.screen else {
            return;
        };

        match input {
            MenuInput::Char(ch) => menu.push_char(ch),
            MenuInput::Backspace => {
                menu.config.player_name.pop();
            }
            MenuInput::MoreFruit => menu.adjust_fruits(true),
            MenuInput::LessFruit => menu.adjust_fruits(false),
            MenuInput::Confirm => self.start_round(now),
            MenuInput::Quit => self.should_quit = true,
        }
    }

    pub fn handle_game_input(&mut self, input: GameInput, now: Instant) {
        let Screen::Playing(session) = &mut self.screen else {
            return;
        };

        match input {
            GameInput::Direction(direction) => {
                session.handle_direction(direction);
            }
            GameInput::Quit => {
                session.on_terminate(EndCause::Abandoned);
                self.process_events(now);
                self.should_quit = true;
            }
        }
    }

    fn start_round(&mut self, now: Instant) {
        let Screen::Menu(menu) = &mut self.screen else {
            return;
        };

        let started = match self.seed {
            Some(seed) => Session::start_with_seed(
                &menu.config,
                self.grid,
                seed.wrapping_add(self.rounds_started),
                now,
            ),
            None => Session::start(&menu.config, self.grid, now),
        };

        match started {
            Ok(session) => {
                self.rounds_started += 1;
                self.score_changed_at = None;
                self.last_frame = Some(session.frame());
                self.screen = Screen::Playing(session);
            }
            Err(error) => {
                info!(%error, "round refused");
                menu.error = Some(error.to_string());
            }
        }
    }

    /// Runs due ticks and applies the session's events.
    pub fn update(&mut self, now: Instant) {
        if let Screen::Playing(session) = &mut self.screen {
            if let Some(frame) = session.advance(now) {
                self.last_frame = Some(frame);
            }
        }
        self.process_events(now);
    }

    fn process_events(&mut self, now: Instant) {
        let Screen::Playing(session) = &mut self.screen else {
            return;
        };

        let mut ended = None;
        for event in session.drain_events() {
            match event {
                SessionEvent::ScoreChanged { .. } => self.score_changed_at = Some(now),
                SessionEvent::RoundEnded(summary) => ended = Some(summary),
            }
        }

        if let Some(summary) = ended {
            self.finish_round(summary);
        }
    }

    fn finish_round(&mut self, summary: RoundSummary) {
        self.last_frame = None;
        self.leaderboard.record_round(&summary);
        if let Some(path) = &self.leaderboard_path {
            if let Err(error) = self.leaderboard.save(path) {
                warn!(%error, path = %path.display(), "failed to save leaderboard");
            }
        }

        self.screen = Screen::Menu(MenuState {
            config: RoundConfig::new(summary.player_name.clone(), self.current_fruit_count()),
            error: None,
            last_round: Some(summary),
        });
    }

    fn current_fruit_count(&self) -> usize {
        match &self.screen {
            Screen::Playing(session) => session.fruits.len(),
            Screen::Menu(menu) => menu.config.fruit_count,
        }
    }

    /// Snapshot produced by the most recent tick, or the round's starting
    /// state before the first one.
    #[must_use]
    pub fn last_frame(&self) -> Option<&TickFrame> {
        self.last_frame.as_ref()
    }

    /// How long the main loop may block on input.
    #[must_use]
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match &self.screen {
            Screen::Playing(session) => session
                .time_until_next_tick(now)
                .map_or(MAX_POLL_INTERVAL, |due| due.min(MAX_POLL_INTERVAL)),
            Screen::Menu(_) => MAX_POLL_INTERVAL,
        }
    }

    /// True while the score change highlight is showing.
    #[must_use]
    pub fn score_flash_active(&self, now: Instant) -> bool {
        self.score_changed_at
            .is_some_and(|changed| now.saturating_duration_since(changed) < SCORE_FLASH_DURATION)
    }
}
