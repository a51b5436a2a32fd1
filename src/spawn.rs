//! Spawn policy: next column's jewels, the lookahead preview and the loss check.

use crate::board::{Board, JewelType};
use crate::column::{COLUMN_SIZE, Column};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SpawnPolicy {
    rng: StdRng,
    jewel_types: u8,
    lookahead: Option<[JewelType; COLUMN_SIZE]>,
}

impl SpawnPolicy {
    /// The first lookahead triple is generated up front so a preview exists before the
    /// first spawn.
    pub fn new(jewel_types: u8, seed: u64) -> Self {
        let mut policy = Self {
            rng: StdRng::seed_from_u64(seed),
            jewel_types: jewel_types.max(1),
            lookahead: None,
        };
        policy.lookahead = Some(policy.draw());
        policy
    }

    fn draw(&mut self) -> [JewelType; COLUMN_SIZE] {
        std::array::from_fn(|_| JewelType(self.rng.random_range(0..self.jewel_types)))
    }

    /// Jewels the next column will carry.
    pub fn preview(&self) -> Option<&[JewelType; COLUMN_SIZE]> {
        self.lookahead.as_ref()
    }

    /// Horizontally centred, top row.
    pub fn origin(board: &Board) -> (i32, i32) {
        ((board.width() / 2) as i32, 0)
    }

    /// True if any of the topmost cells of the spawn column is occupied.
    pub fn is_blocked(board: &Board) -> bool {
        let x = board.width() / 2;
        (0..COLUMN_SIZE.min(board.height())).any(|y| !board.is_empty(x, y))
    }

    /// Builds the next column from the lookahead (or a fresh draw) and immediately generates
    /// the following lookahead.
    pub fn next(&mut self, board: &Board) -> Column {
        let jewels = match self.lookahead.take() {
            Some(j) => j,
            None => self.draw(),
        };
        self.lookahead = Some(self.draw());
        let (x, y) = Self::origin(board);
        Column::new(x, y, jewels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    #[test]
    fn test_next_consumes_preview_and_refills() {
        let board = Board::new(10, 16);
        let mut policy = SpawnPolicy::new(5, 42);
        let preview = *policy.preview().unwrap();
        let column = policy.next(&board);
        assert_eq!(column.jewels, preview);
        assert!(policy.preview().is_some());
    }

    #[test]
    fn test_spawns_centred_at_top() {
        let board = Board::new(10, 16);
        let column = SpawnPolicy::new(5, 1).next(&board);
        assert_eq!((column.x, column.y), (5, 0));
        let odd = Board::new(7, 16);
        assert_eq!(SpawnPolicy::origin(&odd), (3, 0));
    }

    #[test]
    fn test_types_stay_in_range() {
        let board = Board::new(10, 16);
        let mut policy = SpawnPolicy::new(3, 9);
        for _ in 0..200 {
            assert!(policy.next(&board).jewels.iter().all(|j| j.0 < 3));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let board = Board::new(10, 16);
        let mut a = SpawnPolicy::new(5, 77);
        let mut b = SpawnPolicy::new(5, 77);
        for _ in 0..20 {
            assert_eq!(a.next(&board), b.next(&board));
        }
    }

    #[test]
    fn test_blocked_when_top_centre_occupied() {
        let mut board = Board::new(10, 16);
        assert!(!SpawnPolicy::is_blocked(&board));
        board.set(5, 2, Cell::Jewel(JewelType(0)));
        assert!(SpawnPolicy::is_blocked(&board));
        board.set(5, 2, Cell::Empty);
        board.set(5, 3, Cell::Jewel(JewelType(0)));
        assert!(!SpawnPolicy::is_blocked(&board));
        board.set(4, 0, Cell::Jewel(JewelType(0)));
        assert!(!SpawnPolicy::is_blocked(&board));
    }
}
