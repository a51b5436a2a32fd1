//! The falling column: three stacked jewels under player control.

use crate::board::JewelType;

/// Jewels per column.
pub const COLUMN_SIZE: usize = 3;

/// Airborne column. Occupies `(x, y + i)` for `i in 0..COLUMN_SIZE`; `jewels[0]` is on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub x: i32,
    pub y: i32,
    pub jewels: [JewelType; COLUMN_SIZE],
}

impl Column {
    pub fn new(x: i32, y: i32, jewels: [JewelType; COLUMN_SIZE]) -> Self {
        Self { x, y, jewels }
    }

    /// `(x, y, jewel)` for each jewel, top to bottom.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, JewelType)> + '_ {
        self.jewels
            .iter()
            .enumerate()
            .map(|(i, j)| (self.x, self.y + i as i32, *j))
    }

    /// Cycles the order: the top jewel moves to the bottom.
    pub fn rotate(&mut self) {
        self.jewels.rotate_left(1);
    }

    /// Same column shifted by `dx` columns.
    pub fn shifted(&self, dx: i32) -> Self {
        Self {
            x: self.x + dx,
            ..*self
        }
    }
}
