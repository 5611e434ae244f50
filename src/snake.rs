use std::collections::VecDeque;
use std::collections::vec_deque;

use crate::config::STARTING_BODY;
use crate::grid::{Coordinate, Grid};

/// Mutable snake state: body, heading and deferred growth.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Coordinate>,
    heading: Coordinate,
    growth_pending: bool,
}

impl Snake {
    /// Creates the round-start snake: two segments, standing still.
    #[must_use]
    pub fn new() -> Self {
        Self::from_segments(STARTING_BODY.to_vec(), Coordinate::ZERO)
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Coordinate>, heading: Coordinate) -> Self {
        debug_assert!(!segments.is_empty(), "snake needs at least a head");
        Self {
            body: VecDeque::from(segments),
            heading,
            growth_pending: false,
        }
    }

    /// Applies one movement step.
    ///
    /// Does nothing while the heading is zero. Otherwise the new head is pushed
    /// and the tail dropped, unless growth is pending, in which case the tail
    /// stays and the flag clears.
    pub fn update(&mut self) {
        if self.is_idle() {
            return;
        }

        let next_head = self.head() + self.heading;
        self.body.push_front(next_head);

        if self.growth_pending {
            self.growth_pending = false;
        } else {
            let _ = self.body.pop_back();
        }
    }

    /// Sets the heading unless `delta` reverses the current one or is not a
    /// single-cell axis step on `grid`. Returns whether it was accepted.
    pub fn change_heading(&mut self, delta: Coordinate, grid: Grid) -> bool {
        if !grid.is_step(delta) || delta == -self.heading {
            return false;
        }

        self.heading = delta;
        true
    }

    /// Marks that the next `update` keeps the tail.
    pub fn consume(&mut self) {
        self.growth_pending = true;
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Coordinate {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Coordinate) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn heading(&self) -> Coordinate {
        self.heading
    }

    /// True until the first direction input of the round.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.heading.is_zero()
    }

    #[must_use]
    pub fn growth_pending(&self) -> bool {
        self.growth_pending
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> vec_deque::Iter<'_, Coordinate> {
        self.body.iter()
    }

    /// Copies the body, head first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Coordinate> {
        self.body.iter().copied().collect()
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::{Coordinate, Grid};

    use super::Snake;

    const RIGHT: Coordinate = Coordinate::new(40, 0);
    const LEFT: Coordinate = Coordinate::new(-40, 0);
    const UP: Coordinate = Coordinate::new(0, -40);
    const DOWN: Coordinate = Coordinate::new(0, 40);

    #[test]
    fn idle_snake_does_not_move() {
        let mut snake = Snake::new();
        let before = snake.snapshot();

        for _ in 0..5 {
            snake.update();
        }

        assert_eq!(snake.snapshot(), before);
        assert_eq!(
            before,
            vec![Coordinate::new(320, 200), Coordinate::new(280, 200)]
        );
    }

    #[test]
    fn moving_right_shifts_the_whole_body() {
        let mut snake = Snake::new();
        assert!(snake.change_heading(RIGHT, Grid::standard()));

        snake.update();

        assert_eq!(
            snake.snapshot(),
            vec![Coordinate::new(360, 200), Coordinate::new(320, 200)]
        );
    }

    #[test]
    fn growth_keeps_the_tail_for_exactly_one_update() {
        let mut snake = Snake::from_segments(
            vec![Coordinate::new(120, 40), Coordinate::new(80, 40)],
            RIGHT,
        );

        snake.consume();
        assert!(snake.growth_pending());

        snake.update();
        assert_eq!(snake.len(), 3);
        assert!(!snake.growth_pending());

        snake.update();
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Coordinate::new(200, 40));
    }

    #[test]
    fn reversal_is_rejected_for_every_heading() {
        let grid = Grid::standard();
        for heading in [RIGHT, LEFT, UP, DOWN] {
            let mut snake = Snake::from_segments(vec![Coordinate::new(400, 280)], heading);

            assert!(!snake.change_heading(-heading, grid));
            assert_eq!(snake.heading(), heading);
        }
    }

    #[test]
    fn latest_accepted_heading_wins() {
        let grid = Grid::standard();
        let mut snake = Snake::from_segments(
            vec![Coordinate::new(400, 280), Coordinate::new(360, 280)],
            RIGHT,
        );

        assert!(snake.change_heading(UP, grid));
        assert!(snake.change_heading(LEFT, grid));
        snake.update();

        assert_eq!(snake.head(), Coordinate::new(360, 280));
    }

    #[test]
    fn reversal_check_uses_latest_accepted_heading() {
        let grid = Grid::standard();
        let mut snake = Snake::from_segments(
            vec![Coordinate::new(400, 280), Coordinate::new(360, 280)],
            RIGHT,
        );

        assert!(snake.change_heading(UP, grid));
        assert!(!snake.change_heading(DOWN, grid));
        assert_eq!(snake.heading(), UP);

        // LEFT reverses the heading at the last tick, but not the pending UP.
        assert!(snake.change_heading(LEFT, grid));
        assert!(!snake.change_heading(RIGHT, grid));
        assert_eq!(snake.heading(), LEFT);
    }

    #[test]
    fn segments_iterate_tail_first_in_reverse() {
        let snake = Snake::from_segments(
            vec![
                Coordinate::new(120, 40),
                Coordinate::new(80, 40),
                Coordinate::new(40, 40),
            ],
            RIGHT,
        );

        let reversed: Vec<(usize, Coordinate)> = snake
            .segments()
            .enumerate()
            .rev()
            .map(|(index, segment)| (index, *segment))
            .collect();

        assert_eq!(
            reversed,
            vec![
                (2, Coordinate::new(40, 40)),
                (1, Coordinate::new(80, 40)),
                (0, Coordinate::new(120, 40)),
            ]
        );
    }

    #[test]
    fn malformed_deltas_are_ignored() {
        let grid = Grid::standard();
        let mut snake = Snake::new();

        assert!(!snake.change_heading(Coordinate::new(40, 40), grid));
        assert!(!snake.change_heading(Coordinate::new(7, 0), grid));
        assert!(!snake.change_heading(Coordinate::ZERO, grid));
        assert!(snake.is_idle());
    }

    #[test]
    fn idle_snake_accepts_any_first_direction() {
        let mut snake = Snake::new();
        assert!(snake.change_heading(LEFT, Grid::standard()));

        snake.update();

        // The old tail cell is vacated in the same step the head enters it.
        assert_eq!(
            snake.snapshot(),
            vec![Coordinate::new(280, 200), Coordinate::new(320, 200)]
        );
    }
}
