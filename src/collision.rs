use crate::fruit::{Fruit, FruitSet};
use crate::grid::{Coordinate, Grid};
use crate::snake::Snake;

/// What the head ran into on this tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Collision {
    Bounds,
    SelfCollision,
    /// Index into the fruit set.
    Fruit(usize),
}

#[must_use]
pub fn out_of_bounds(grid: Grid, head: Coordinate) -> bool {
    !grid.contains(head)
}

/// True when the head shares a cell with any later segment.
///
/// The body must already reflect this tick's move, so a tail that was just
/// vacated is not reported.
pub fn self_collision<'a, I>(body: I) -> bool
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let mut segments = body.into_iter();
    let Some(head) = segments.next() else {
        return false;
    };

    segments.any(|segment| segment == head)
}

#[must_use]
pub fn fruit_collision(head: Coordinate, fruit: &Fruit) -> bool {
    head == fruit.position
}

/// Evaluates the post-move state. Bounds win over self collision, which wins
/// over fruit; a tick reports at most one finding.
#[must_use]
pub fn detect(grid: Grid, snake: &Snake, fruits: &FruitSet) -> Option<Collision> {
    let head = snake.head();

    if out_of_bounds(grid, head) {
        return Some(Collision::Bounds);
    }

    if self_collision(snake.segments()) {
        return Some(Collision::SelfCollision);
    }

    fruits
        .iter()
        .position(|fruit| fruit_collision(head, fruit))
        .map(Collision::Fruit)
}
