use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::collision::{self, Collision};
use crate::config::RoundConfig;
use crate::fruit::{Fruit, FruitSet, SpawnError};
use crate::grid::{Coordinate, Grid};
use crate::input::Direction;
use crate::scheduler::{Scheduler, interval_after, next_interval};
use crate::snake::Snake;

/// Reasons a round cannot start.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SessionError {
    #[error("player name must not be empty")]
    InvalidPlayerName,
    #[error("fruit count must be at least 1, got {0}")]
    InvalidFruitCount(usize),
    #[error("cannot place fruit: {0}")]
    SpawnExhausted(#[from] SpawnError),
}

/// Why a round ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndCause {
    Bounds,
    SelfCollision,
    /// No free cell was left for a replacement fruit.
    BoardFull,
    /// The player quit mid-round.
    Abandoned,
}

/// Terminal event handed to the leaderboard.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RoundSummary {
    pub cause: EndCause,
    pub final_score: u32,
    pub player_name: String,
}

/// What the renderer needs after each tick.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TickFrame {
    pub positions: Vec<Coordinate>,
    pub fruits: Vec<Fruit>,
    pub score: u32,
    pub active: bool,
}

/// Notifications for collaborators outside the simulation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SessionEvent {
    ScoreChanged { score: u32 },
    RoundEnded(RoundSummary),
}

/// State for exactly one round. Start a new value for the next round.
#[derive(Debug, Clone)]
pub struct Session {
    pub snake: Snake,
    pub fruits: FruitSet,
    player_name: String,
    score: u32,
    tick_interval: Duration,
    tick_count: u64,
    active: bool,
    grid: Grid,
    scheduler: Scheduler,
    events: Vec<SessionEvent>,
    rng: StdRng,
}

impl Session {
    /// Validates `config` and starts a round with the scheduler running.
    pub fn start(config: &RoundConfig, grid: Grid, now: Instant) -> Result<Self, SessionError> {
        Self::start_with_rng(config, grid, StdRng::from_entropy(), now)
    }

    /// Like [`Session::start`] with reproducible fruit placement.
    pub fn start_with_seed(
        config: &RoundConfig,
        grid: Grid,
        seed: u64,
        now: Instant,
    ) -> Result<Self, SessionError> {
        Self::start_with_rng(config, grid, StdRng::seed_from_u64(seed), now)
    }

    fn start_with_rng(
        config: &RoundConfig,
        grid: Grid,
        mut rng: StdRng,
        now: Instant,
    ) -> Result<Self, SessionError> {
        let player_name = config.player_name.trim();
        if player_name.is_empty() {
            return Err(SessionError::InvalidPlayerName);
        }
        if config.fruit_count < 1 {
            return Err(SessionError::InvalidFruitCount(config.fruit_count));
        }

        let snake = Snake::new();
        let occupied: HashSet<Coordinate> = snake.segments().copied().collect();
        let fruits = FruitSet::fill(&mut rng, grid, config.fruit_count, &occupied)?;

        let tick_interval = interval_after(0);
        let mut scheduler = Scheduler::new();
        scheduler.start(tick_interval, now);

        info!(
            player = player_name,
            fruits = config.fruit_count,
            "round started"
        );

        Ok(Self {
            snake,
            fruits,
            player_name: player_name.to_owned(),
            score: 0,
            tick_interval,
            tick_count: 0,
            active: true,
            grid,
            scheduler,
            events: Vec::new(),
            rng,
        })
    }

    /// Forwards a movement delta to the snake. Ignored once the round ended.
    pub fn handle_direction_input(&mut self, delta: Coordinate) -> bool {
        self.active && self.snake.change_heading(delta, self.grid)
    }

    /// Convenience for key-mapped input.
    pub fn handle_direction(&mut self, direction: Direction) -> bool {
        self.handle_direction_input(direction.delta(self.grid.cell()))
    }

    /// Runs one tick if the scheduler says one is due.
    pub fn advance(&mut self, now: Instant) -> Option<TickFrame> {
        if !self.scheduler.poll(now) {
            return None;
        }

        Some(self.tick(now))
    }

    /// Advances the simulation by one step: move, detect, then react.
    pub fn tick(&mut self, now: Instant) -> TickFrame {
        if !self.active {
            return self.frame();
        }

        self.tick_count += 1;
        self.snake.update();

        match collision::detect(self.grid, &self.snake, &self.fruits) {
            Some(Collision::Bounds) => {
                self.on_terminate(EndCause::Bounds);
            }
            Some(Collision::SelfCollision) => {
                self.on_terminate(EndCause::SelfCollision);
            }
            Some(Collision::Fruit(index)) => self.eat(index, now),
            None => {}
        }

        self.frame()
    }

    fn eat(&mut self, index: usize, now: Instant) {
        self.snake.consume();
        self.on_consume();

        let occupied: HashSet<Coordinate> = self.snake.segments().copied().collect();
        match self.fruits.refill(index, &mut self.rng, self.grid, &occupied) {
            Ok(fruit) => debug!(x = fruit.position.x, y = fruit.position.y, "fruit respawned"),
            Err(error) => {
                warn!(%error, "fruit refill failed");
                let _ = self.fruits.remove(index);
                self.on_terminate(EndCause::BoardFull);
                return;
            }
        }

        self.tick_interval = next_interval(self.tick_interval);
        self.scheduler.rearm(self.tick_interval, now);
    }

    /// Credits one fruit to the score.
    pub fn on_consume(&mut self) {
        if !self.active {
            return;
        }

        self.score += 1;
        debug!(score = self.score, "fruit eaten");
        self.events
            .push(SessionEvent::ScoreChanged { score: self.score });
    }

    /// Ends the round. The scheduler stops before the end event is queued.
    /// Returns `None` if the round had already ended.
    pub fn on_terminate(&mut self, cause: EndCause) -> Option<RoundSummary> {
        if !self.active {
            return None;
        }

        self.scheduler.stop();
        self.active = false;

        let summary = RoundSummary {
            cause,
            final_score: self.score,
            player_name: self.player_name.clone(),
        };
        info!(
            player = %summary.player_name,
            score = summary.final_score,
            ?cause,
            ticks = self.tick_count,
            "round ended"
        );

        self.events.push(SessionEvent::RoundEnded(summary.clone()));
        Some(summary)
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Snapshot of the observable state.
    #[must_use]
    pub fn frame(&self) -> TickFrame {
        TickFrame {
            positions: self.snake.snapshot(),
            fruits: self.fruits.as_slice().to_vec(),
            score: self.score,
            active: self.active,
        }
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Time until the next tick; `None` once the round ended.
    #[must_use]
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_due(now)
    }
}
