//! Gravity: compacts each column downwards, either committing or as a dry run.
//!
//! Both passes walk one column at a time from the row just above the floor upwards, so
//! every jewel below the one being moved has already settled. Jewels never change type
//! and never leave their column.

use crate::board::{Board, Cell, JewelType};

/// One jewel dropping from `from_y` to `to_y` in column `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallInstruction {
    pub x: usize,
    pub from_y: usize,
    pub to_y: usize,
    pub jewel: JewelType,
}

impl FallInstruction {
    #[inline]
    pub fn distance(&self) -> usize {
        self.to_y - self.from_y
    }
}

/// Lowest empty row reachable from `y` by falling straight down.
fn landing_row(board: &Board, x: usize, y: usize) -> usize {
    let mut to = y;
    while to + 1 < board.height() && board.is_empty(x, to + 1) {
        to += 1;
    }
    to
}

fn compact(board: &mut Board, mut on_move: impl FnMut(FallInstruction)) {
    let h = board.height();
    if h < 2 {
        return;
    }
    for x in 0..board.width() {
        for y in (0..h - 1).rev() {
            let Some(jewel) = board.jewel_at(x, y) else {
                continue;
            };
            let to_y = landing_row(board, x, y);
            if to_y != y {
                board.set(x, y, Cell::Empty);
                board.set(x, to_y, Cell::Jewel(jewel));
                on_move(FallInstruction {
                    x,
                    from_y: y,
                    to_y,
                    jewel,
                });
            }
        }
    }
}

/// Drops every floating jewel as far as it goes. Returns whether anything moved.
pub fn apply(board: &mut Board) -> bool {
    let mut moved = false;
    loop {
        let mut pass_moved = false;
        compact(board, |_| pass_moved = true);
        if !pass_moved {
            break;
        }
        moved = true;
    }
    moved
}

/// Plans the same compaction on a scratch copy; the live board is not touched.
/// Jewels with zero drop distance are omitted.
pub fn plan(board: &Board) -> Vec<FallInstruction> {
    let mut scratch = board.clone();
    let mut out = Vec::new();
    compact(&mut scratch, |f| out.push(f));
    out
}
