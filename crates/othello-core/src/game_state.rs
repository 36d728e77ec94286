//! Game session state: the authoritative board, turn tracking and undo.

use crate::board::Board;
use crate::disc::Disc;

/// Represents the state of an Othello game.
///
/// Holds the authoritative board, which is mutated exactly once per
/// committed move; search workers only ever see copies of it.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    side_to_move: Disc,
    /// Move history: (move, board before, side to move before).
    /// `None` for the move records a pass.
    history: Vec<(Option<(usize, usize)>, Board, Disc)>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a new game in the initial position, White to move first.
    pub fn new() -> Self {
        GameState {
            board: Board::new(),
            side_to_move: Disc::White,
            history: Vec::new(),
        }
    }

    /// Creates a game state from an existing position.
    pub fn from_board(board: Board, side_to_move: Disc) -> Self {
        GameState {
            board,
            side_to_move,
            history: Vec::new(),
        }
    }

    /// Returns a reference to the current board position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns which color moves next.
    pub fn side_to_move(&self) -> Disc {
        self.side_to_move
    }

    /// Executes a move for the side to move.
    ///
    /// # Errors
    ///
    /// Returns an error string if the move is not legal on the current board.
    pub fn make_move(&mut self, x: usize, y: usize) -> Result<(), String> {
        if !self.board.is_legal_move(x, y, self.side_to_move) {
            return Err(format!("illegal move: ({x},{y})"));
        }

        self.history
            .push((Some((x, y)), self.board, self.side_to_move));
        self.board.apply_move(x, y, self.side_to_move);
        self.side_to_move = self.side_to_move.opposite();
        Ok(())
    }

    /// Passes the turn without placing a disc.
    ///
    /// # Errors
    ///
    /// Returns an error string when legal moves are still available.
    pub fn make_pass(&mut self) -> Result<(), String> {
        if self.board.has_legal_moves(self.side_to_move) {
            return Err("cannot pass while legal moves exist".to_string());
        }
        self.history.push((None, self.board, self.side_to_move));
        self.side_to_move = self.side_to_move.opposite();
        Ok(())
    }

    /// Reverts the last move or pass.
    ///
    /// # Returns
    ///
    /// `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some((_, board, side)) => {
                self.board = board;
                self.side_to_move = side;
                true
            }
            None => false,
        }
    }

    /// Checks if the game has ended (neither color can move).
    pub fn is_game_over(&self) -> bool {
        self.board.is_terminal()
    }

    /// Returns the disc counts as `[white, black]`.
    pub fn get_score(&self) -> [u32; 2] {
        self.board.scores()
    }

    /// The last committed move, `None` if it was a pass or no move exists.
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.history.last().and_then(|&(mv, _, _)| mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_move_and_undo() {
        let mut state = GameState::from_board(Board::new(), Disc::Black);
        assert!(state.make_move(2, 3).is_ok());
        assert_eq!(state.side_to_move(), Disc::White);
        assert_eq!(state.get_score(), [1, 4]);
        assert_eq!(state.last_move(), Some((2, 3)));

        assert!(state.undo());
        assert_eq!(state.side_to_move(), Disc::Black);
        assert_eq!(*state.board(), Board::new());
        assert!(!state.undo());
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut state = GameState::new();
        assert!(state.make_move(0, 0).is_err());
        assert!(state.make_move(3, 3).is_err());
        assert_eq!(*state.board(), Board::new());
    }

    #[test]
    fn test_pass_rejected_with_moves_available() {
        let mut state = GameState::new();
        assert!(state.make_pass().is_err());
    }

    #[test]
    fn test_pass_switches_side() {
        // White has nothing; Black still does.
        let board = Board::from_string(
            "--------\
             --------\
             --------\
             --XX----\
             --------\
             --------\
             --------\
             --------",
        )
        .unwrap();
        let mut state = GameState::from_board(board, Disc::White);
        assert!(state.make_pass().is_ok());
        assert_eq!(state.side_to_move(), Disc::Black);
    }
}
