//! Grid addressing shared by tile grids, pattern blocks and the solver
//!
//! Every grid in the crate is dense and row-major with its origin at the
//! top-left: `x` grows to the right, `y` grows downward, and the linear index
//! of `(x, y)` is `x + y * width`. This matches the `(row, col)` layout of
//! `ndarray::Array2`, so `array[[y, x]]` and `cells[x + y * width]` always
//! name the same slot.

use std::fmt;

/// Width and height of a grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct GridSize {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

impl GridSize {
    /// Create a grid size
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of slots
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// True when either dimension is zero
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check whether signed coordinates fall inside the grid
    pub const fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Shape tuple for `ndarray` constructors, `(rows, cols)`
    pub const fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Position of a slot inside a grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridPosition {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl GridPosition {
    /// Create a position
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Index pair for `ndarray` access, `[row, col]`
    pub const fn as_array_index(&self) -> [usize; 2] {
        [self.y, self.x]
    }

    /// Signed neighbour coordinates one step in `direction`
    pub const fn step(&self, direction: Direction) -> (i64, i64) {
        let (dx, dy) = direction.offset();
        (self.x as i64 + dx, self.y as i64 + dy)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four axis-aligned neighbour directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards `y - 1`
    Up,
    /// Towards `x + 1`
    Right,
    /// Towards `y + 1`
    Down,
    /// Towards `x - 1`
    Left,
}

impl Direction {
    /// Propagation order used by the solver
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Coordinate delta `(dx, dy)`
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Direction pointing back
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }
}

/// Linear index of a position, `x + y * width`
pub const fn position_to_index(position: GridPosition, size: GridSize) -> usize {
    position.x + position.y * size.width
}

/// Position of a linear index
///
/// Returns `None` for zero-width grids
pub const fn index_to_position(index: usize, size: GridSize) -> Option<GridPosition> {
    if size.width == 0 {
        return None;
    }
    Some(GridPosition::new(index % size.width, index / size.width))
}

/// Reduce signed coordinates into the grid, modulo each dimension
///
/// In-bounds coordinates are returned unchanged. Returns `None` only for an
/// empty grid, where no slot exists to wrap onto.
pub const fn wrap_position(x: i64, y: i64, size: GridSize) -> Option<GridPosition> {
    if size.is_empty() {
        return None;
    }
    if size.contains(x, y) {
        return Some(GridPosition::new(x as usize, y as usize));
    }
    let wrapped_x = x.rem_euclid(size.width as i64);
    let wrapped_y = y.rem_euclid(size.height as i64);
    Some(GridPosition::new(wrapped_x as usize, wrapped_y as usize))
}

/// Resolve the neighbour of `position` in `direction`
///
/// Off-grid neighbours wrap around when `wrap` is set and are dropped
/// otherwise.
pub const fn neighbour(
    position: GridPosition,
    direction: Direction,
    size: GridSize,
    wrap: bool,
) -> Option<GridPosition> {
    let (x, y) = position.step(direction);
    if size.contains(x, y) {
        return Some(GridPosition::new(x as usize, y as usize));
    }
    if wrap {
        return wrap_position(x, y, size);
    }
    None
}
