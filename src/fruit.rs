use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

use crate::grid::{Coordinate, Grid};

/// Cosmetic fruit variants. Every kind is worth the same.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FruitKind {
    Apple,
    Pear,
    Banana,
}

impl FruitKind {
    pub const CATALOG: [Self; 3] = [Self::Apple, Self::Pear, Self::Banana];

    /// Picks a kind uniformly from the catalog.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::CATALOG[rng.gen_range(0..Self::CATALOG.len())]
    }
}

/// Fruit currently on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Fruit {
    pub position: Coordinate,
    pub kind: FruitKind,
}

impl Fruit {
    #[must_use]
    pub fn new(position: Coordinate, kind: FruitKind) -> Self {
        Self { position, kind }
    }

    /// Spawns a fruit of random kind on a free cell.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        grid: Grid,
        occupied: &HashSet<Coordinate>,
    ) -> Result<Self, SpawnError> {
        let position = spawn_position(rng, grid, occupied)?;
        Ok(Self::new(position, FruitKind::random(rng)))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum SpawnError {
    #[error("no free cell left on the {width}x{height} board")]
    Exhausted { width: u16, height: u16 },
}

/// Picks a uniformly random grid cell that is not in `occupied`.
///
/// Free cells are enumerated up front, so a full board fails immediately
/// instead of sampling forever.
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    grid: Grid,
    occupied: &HashSet<Coordinate>,
) -> Result<Coordinate, SpawnError> {
    let candidates: Vec<Coordinate> = grid
        .cells()
        .filter(|cell| !occupied.contains(cell))
        .collect();

    if candidates.is_empty() {
        let size = grid.size();
        return Err(SpawnError::Exhausted {
            width: size.width,
            height: size.height,
        });
    }

    let index = rng.gen_range(0..candidates.len());
    Ok(candidates[index])
}

/// Fixed-size set of fruits, kept full for the whole round.
#[derive(Debug, Clone, Default)]
pub struct FruitSet {
    fruits: Vec<Fruit>,
}

impl FruitSet {
    /// Fills a new set with `count` fruits, none on `occupied` nor on each other.
    pub fn fill<R: Rng + ?Sized>(
        rng: &mut R,
        grid: Grid,
        count: usize,
        occupied: &HashSet<Coordinate>,
    ) -> Result<Self, SpawnError> {
        let mut taken = occupied.clone();
        let mut fruits = Vec::with_capacity(count);

        for _ in 0..count {
            let fruit = Fruit::spawn(rng, grid, &taken)?;
            taken.insert(fruit.position);
            fruits.push(fruit);
        }

        Ok(Self { fruits })
    }

    #[must_use]
    pub fn from_fruits(fruits: Vec<Fruit>) -> Self {
        Self { fruits }
    }

    /// Replaces the fruit at `index` with a fresh one, leaving the others
    /// untouched.
    pub fn refill<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        rng: &mut R,
        grid: Grid,
        occupied: &HashSet<Coordinate>,
    ) -> Result<Fruit, SpawnError> {
        let mut taken = occupied.clone();
        taken.extend(
            self.fruits
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, fruit)| fruit.position),
        );

        let fruit = Fruit::spawn(rng, grid, &taken)?;
        self.fruits[index] = fruit;
        Ok(fruit)
    }

    /// Takes the fruit at `index` off the board.
    pub fn remove(&mut self, index: usize) -> Option<Fruit> {
        (index < self.fruits.len()).then(|| self.fruits.remove(index))
    }

    /// Index of the first fruit at `position`.
    #[must_use]
    pub fn position_of(&self, position: Coordinate) -> Option<usize> {
        self.fruits
            .iter()
            .position(|fruit| fruit.position == position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fruits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fruits.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Fruit] {
        &self.fruits
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fruit> {
        self.fruits.iter()
    }
}
