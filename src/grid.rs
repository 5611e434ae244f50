use std::ops::{Add, Neg};

use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH, CELL_SIZE, GridSize};

/// Point or movement delta in world units.
///
/// Positions on the grid are always exact multiples of the cell size.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const ZERO: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl Add for Coordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Neg for Coordinate {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// Discrete play field measured in world units.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    cell: i32,
}

impl Grid {
    /// Creates a grid; `width` and `height` are rounded down to whole cells.
    #[must_use]
    pub fn new(width: i32, height: i32, cell: i32) -> Self {
        debug_assert!(cell > 0, "cell size must be positive");
        let cell = cell.max(1);
        Self {
            width: width.max(0) / cell * cell,
            height: height.max(0) / cell * cell,
            cell,
        }
    }

    /// The deployment grid: 800x600 canvas with 40-unit cells.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT, CELL_SIZE)
    }

    #[must_use]
    pub fn width(self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> i32 {
        self.height
    }

    #[must_use]
    pub fn cell(self) -> i32 {
        self.cell
    }

    /// Returns the grid dimensions in cells.
    #[must_use]
    pub fn size(self) -> GridSize {
        GridSize {
            width: u16::try_from(self.width / self.cell).unwrap_or(u16::MAX),
            height: u16::try_from(self.height / self.cell).unwrap_or(u16::MAX),
        }
    }

    /// Returns true when `point` lies inside the play field.
    #[must_use]
    pub fn contains(self, point: Coordinate) -> bool {
        point.x >= 0 && point.y >= 0 && point.x < self.width && point.y < self.height
    }

    /// Iterates every cell origin in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Coordinate> {
        let cell = self.cell;
        let columns = self.width / cell;
        let rows = self.height / cell;
        (0..rows).flat_map(move |row| {
            (0..columns).map(move |column| Coordinate::new(column * cell, row * cell))
        })
    }

    /// Converts a cell origin into `(column, row)` indices.
    #[must_use]
    pub fn cell_index(self, point: Coordinate) -> Option<(u16, u16)> {
        if !self.contains(point) {
            return None;
        }
        let column = u16::try_from(point.x / self.cell).ok()?;
        let row = u16::try_from(point.y / self.cell).ok()?;
        Some((column, row))
    }

    /// Returns true for the four axis-aligned single-cell deltas.
    #[must_use]
    pub fn is_step(self, delta: Coordinate) -> bool {
        let cell = self.cell.unsigned_abs();
        matches!(
            (delta.x.unsigned_abs(), delta.y.unsigned_abs()),
            (x, 0) | (0, x) if x == cell
        )
    }
}
