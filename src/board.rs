//! Board: the grid of placed jewels and the one collision predicate.

use crate::column::{COLUMN_SIZE, Column};

/// One of the discrete jewel kinds. The index doubles as the theme colour slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JewelType(pub u8);

impl JewelType {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Single cell: either empty or holding a jewel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Jewel(JewelType),
}

impl Cell {
    #[inline]
    pub fn jewel(self) -> Option<JewelType> {
        match self {
            Self::Empty => None,
            Self::Jewel(j) => Some(j),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

/// Fixed-size grid. y=0 is the top row; cells are stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Panics if `width * height` overflows `usize`; validated configs stay far below that.
    pub fn new(width: usize, height: usize) -> Self {
        let len = width
            .checked_mul(height)
            .unwrap_or_else(|| panic!("board {width}x{height} overflows"));
        Self {
            width,
            height,
            cells: vec![Cell::Empty; len],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Writes `cell` at (x, y). Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Jewel at (x, y), if the cell is in bounds and occupied.
    #[inline]
    pub fn jewel_at(&self, x: usize, y: usize) -> Option<JewelType> {
        self.get(x, y).and_then(Cell::jewel)
    }

    /// Caller guarantees (x, y) is in bounds; out-of-bounds reads report "not empty".
    #[inline]
    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(Cell::is_empty)
    }

    /// Resets every cell to empty. Dimensions are untouched.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Row-major iterator over `(x, y, cell)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let w = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i % w, i / w, *c))
    }

    /// True if a column with its top jewel at row `y` in column `x` would overlap the floor,
    /// a wall, or an occupied cell. Rows above the board never collide.
    pub fn collides_at(&self, x: i32, y: i32) -> bool {
        if x < 0 || x as usize >= self.width {
            return true;
        }
        for i in 0..COLUMN_SIZE as i32 {
            let row = y + i;
            if row >= self.height as i32 {
                return true;
            }
            if row >= 0 && !self.is_empty(x as usize, row as usize) {
                return true;
            }
        }
        false
    }

    /// Commits a landed column. Jewels whose row is off the board are dropped.
    pub fn place(&mut self, column: &Column) {
        for (x, y, jewel) in column.cells() {
            if x >= 0 && y >= 0 {
                self.set(x as usize, y as usize, Cell::Jewel(jewel));
            }
        }
    }
}
