//! Candidate generation and the shared concurrent cursor.

use arrayvec::ArrayVec;
use std::slice;
use std::sync::atomic;

use crate::board::{BOARD_SIZE, Board};
use crate::disc::Disc;

/// Maximum number of legal moves possible in an Othello position.
pub const MAX_MOVES: usize = 34;

/// A cell where a move is currently legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Column of the cell.
    pub x: usize,
    /// Row of the cell.
    pub y: usize,
    /// Total opponent discs flipped across all eight directions.
    pub flips: usize,
}

/// Container for all legal moves in a position.
///
/// Candidates are stored in generation order (row-major board scan) and the
/// list is truncated in that order; no ranking happens before truncation.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: ArrayVec<Candidate, MAX_MOVES>,
}

impl MoveList {
    /// Generates all legal moves for `color` on `board`.
    pub fn new(board: &Board, color: Disc) -> MoveList {
        let mut moves = ArrayVec::new();
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let flips = board.move_flips(x, y, color);
                if flips > 0 {
                    moves.push(Candidate { x, y, flips });
                }
            }
        }
        MoveList { moves }
    }

    /// Returns the number of legal moves in this position.
    #[inline]
    pub fn count(&self) -> usize {
        self.moves.len()
    }

    /// Returns `true` when there is no legal move.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns the first candidate, if any exists.
    #[inline]
    pub fn first(&self) -> Option<&Candidate> {
        self.moves.first()
    }

    /// Returns an iterator over the candidates in generation order.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Candidate> {
        self.moves.iter()
    }

    /// Caps the list at `limit` candidates, keeping generation order.
    #[inline]
    pub fn truncate(&mut self, limit: usize) {
        self.moves.truncate(limit);
    }

    /// Checks whether the list contains the cell (x, y).
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.moves.iter().any(|c| c.x == x && c.y == y)
    }
}

/// Thread-safe iterator distributing candidates across search workers.
///
/// Advancing the cursor is a single atomic fetch-add, so each candidate is
/// consumed exactly once no matter how many workers pull from it; no ordering
/// is guaranteed between consumers.
pub struct ConcurrentMoveIterator {
    move_list: MoveList,
    current: atomic::AtomicUsize,
}

impl ConcurrentMoveIterator {
    /// Creates a new concurrent iterator from a move list.
    pub fn new(move_list: MoveList) -> ConcurrentMoveIterator {
        ConcurrentMoveIterator {
            move_list,
            current: atomic::AtomicUsize::new(0),
        }
    }

    /// Retrieves the next candidate and its 1-based position.
    ///
    /// Returns `None` once every candidate has been handed out.
    pub fn next(&self) -> Option<(Candidate, usize)> {
        let current = self.current.fetch_add(1, atomic::Ordering::Relaxed);
        if current < self.move_list.count() {
            Some((self.move_list.moves[current], current + 1))
        } else {
            None
        }
    }

    /// Total number of candidates behind this cursor.
    #[inline]
    pub fn count(&self) -> usize {
        self.move_list.count()
    }

    /// Number of candidates not yet handed out.
    #[inline]
    pub fn remaining(&self) -> usize {
        let current = self.current.load(atomic::Ordering::Relaxed);
        self.move_list.count().saturating_sub(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    /// The opening position must yield exactly the four classic replies.
    #[test]
    fn test_move_list_starting_position() {
        let board = Board::new();
        let moves = MoveList::new(&board, Disc::Black);
        assert_eq!(moves.count(), 4);

        let cands: HashSet<(usize, usize, usize)> =
            moves.iter().map(|c| (c.x, c.y, c.flips)).collect();
        let expected: HashSet<(usize, usize, usize)> =
            [(2, 3, 1), (3, 2, 1), (4, 5, 1), (5, 4, 1)].into_iter().collect();
        assert_eq!(cands, expected);
    }

    /// Every candidate sits on an empty cell and flips at least one disc.
    #[test]
    fn test_candidates_are_empty_cells_with_flips() {
        let boards = [
            Board::new(),
            Board::from_string(
                "--------\
                 --------\
                 ---OX---\
                 --OXX---\
                 --XXX---\
                 --------\
                 --------\
                 --------",
            )
            .unwrap(),
        ];
        for board in &boards {
            for color in [Disc::White, Disc::Black] {
                for cand in board.legal_moves(color).iter() {
                    assert_eq!(board.get(cand.x, cand.y), Disc::Empty);
                    assert!(cand.flips >= 1);
                }
            }
        }
    }

    /// A cell just played never shows up as a candidate again.
    #[test]
    fn test_played_cell_leaves_candidate_list() {
        let mut board = Board::new();
        assert!(board.legal_moves(Disc::Black).contains(2, 3));
        assert!(board.apply_move(2, 3, Disc::Black) > 0);
        for color in [Disc::White, Disc::Black] {
            assert!(!board.legal_moves(color).contains(2, 3));
        }
    }

    #[test]
    fn test_truncate_keeps_generation_order() {
        let board = Board::new();
        let mut moves = MoveList::new(&board, Disc::Black);
        let head: Vec<Candidate> = moves.iter().take(2).copied().collect();
        moves.truncate(2);
        assert_eq!(moves.count(), 2);
        let kept: Vec<Candidate> = moves.iter().copied().collect();
        assert_eq!(kept, head);
    }

    #[test]
    fn test_concurrent_iterator_exactly_once() {
        let board = Board::new();
        let iter = ConcurrentMoveIterator::new(MoveList::new(&board, Disc::Black));
        assert_eq!(iter.count(), 4);
        assert_eq!(iter.remaining(), 4);

        let mut seen = Vec::new();
        while let Some((cand, n)) = iter.next() {
            seen.push((cand.x, cand.y, n));
        }
        assert_eq!(seen.len(), 4);
        assert_eq!(iter.remaining(), 0);
        for (i, &(_, _, n)) in seen.iter().enumerate() {
            assert_eq!(n, i + 1);
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_concurrent_iterator_two_consumers() {
        let board = Board::from_string(
            "--------\
             --------\
             ---OX---\
             --OXX---\
             --XXX---\
             --------\
             --------\
             --------",
        )
        .unwrap();
        let list = MoveList::new(&board, Disc::White);
        let total = list.count();
        assert!(total >= 2);

        let iter = Arc::new(ConcurrentMoveIterator::new(list));
        let other = iter.clone();
        let handle = std::thread::spawn(move || {
            let mut pulled = Vec::new();
            while let Some((cand, _)) = other.next() {
                pulled.push((cand.x, cand.y));
            }
            pulled
        });
        let mut pulled = Vec::new();
        while let Some((cand, _)) = iter.next() {
            pulled.push((cand.x, cand.y));
        }
        pulled.extend(handle.join().unwrap());

        let unique: HashSet<(usize, usize)> = pulled.iter().copied().collect();
        assert_eq!(pulled.len(), total);
        assert_eq!(unique.len(), total);
    }
}
