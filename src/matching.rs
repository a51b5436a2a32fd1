//! Match detection: straight same-type runs along rows, columns and both diagonals.
//!
//! Every axis is scanned independently with a window of `run_length` cells. A window whose
//! cells all hold the same jewel adds every one of its cells to the result, keyed by
//! coordinate, so overlapping windows (longer runs, crossing runs) collapse to distinct
//! cells. Scoring counts those cells, not runs: a run of four is worth four jewels.

use crate::board::{Board, JewelType};
use std::collections::BTreeMap;

/// Reference run length.
pub const MATCH_REQUIRED: usize = 3;

/// Scan directions as (dx, dy): horizontal, vertical, main diagonal, anti-diagonal.
const AXES: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// Which runs count as matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    pub run_length: usize,
    /// When false only rows and columns are scanned.
    pub diagonals: bool,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            run_length: MATCH_REQUIRED,
            diagonals: true,
        }
    }
}

impl MatchRules {
    fn axes(&self) -> &'static [(isize, isize)] {
        if self.diagonals { &AXES } else { &AXES[..2] }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedCell {
    pub x: usize,
    pub y: usize,
    pub jewel: JewelType,
}

/// Deduplicated cells found by one detection pass, ordered by (y, x).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    cells: BTreeMap<(usize, usize), JewelType>,
}

impl MatchSet {
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.cells.contains_key(&(y, x))
    }

    pub fn iter(&self) -> impl Iterator<Item = MatchedCell> + '_ {
        self.cells
            .iter()
            .map(|(&(y, x), &jewel)| MatchedCell { x, y, jewel })
    }

    fn insert(&mut self, x: usize, y: usize, jewel: JewelType) {
        self.cells.insert((y, x), jewel);
    }
}

/// Finds every cell that belongs to a run of at least `rules.run_length` identical jewels.
pub fn find_matches(board: &Board, rules: MatchRules) -> MatchSet {
    let mut set = MatchSet::default();
    let n = rules.run_length;
    if n == 0 {
        return set;
    }
    let (w, h) = (board.width() as isize, board.height() as isize);
    let last = n as isize - 1;

    for &(dx, dy) in rules.axes() {
        for y in 0..h {
            for x in 0..w {
                let (ex, ey) = (x + dx * last, y + dy * last);
                if ex < 0 || ex >= w || ey >= h {
                    continue;
                }
                let Some(jewel) = board.jewel_at(x as usize, y as usize) else {
                    continue;
                };
                let run = (1..n as isize).all(|i| {
                    board.jewel_at((x + dx * i) as usize, (y + dy * i) as usize) == Some(jewel)
                });
                if run {
                    for i in 0..n as isize {
                        set.insert((x + dx * i) as usize, (y + dy * i) as usize, jewel);
                    }
                }
            }
        }
    }
    set
}
