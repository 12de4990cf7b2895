use log::debug;

use crate::{
    board::{Board, Side},
    move_generator::legal_moves,
    moves::{MoveMap, move_string},
};

/// Session state machine: either nothing is selected, or one friendly piece
/// is selected with its legal destinations cached. Only this type talks to
/// the presentation layer; it owns the one live board of the session.
pub struct Game {
    pub board: Board,
    pub turn: Side,
    selected: Option<(u8, u8)>,
    valid_moves: MoveMap,
}

impl Game {
    pub fn new() -> Game {
        Game {
            board: Board::new(),
            turn: Side::Red,
            selected: None,
            valid_moves: MoveMap::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Game::new();
    }

    /// Swaps in an arbitrary position, e.g. from `Board::from_position`.
    pub fn load(&mut self, turn: Side, board: Board) {
        self.board = board;
        self.turn = turn;
        self.selected = None;
        self.valid_moves.clear();
    }

    pub fn winner(&self) -> Option<Side> {
        self.board.winner()
    }

    pub fn selected(&self) -> Option<(u8, u8)> {
        self.selected
    }

    /// Cached destinations of the current selection, for move indicators.
    pub fn destinations(&self) -> &MoveMap {
        &self.valid_moves
    }

    /// One click on a square. With a piece selected and (row, col) among its
    /// cached destinations, the move is played, captures are removed and the
    /// turn passes. Any other click is treated as a fresh selection attempt:
    /// a friendly piece becomes the selection (its destinations cached), and
    /// anything else clears back to idle. Returns whether the click selected
    /// or moved something.
    pub fn select(&mut self, row: u8, col: u8) -> bool {
        if self.selected.is_some() && self.try_move(row, col) {
            return true;
        }

        // Either nothing was selected or the move was rejected; fall through
        // and treat the square as a selection attempt
        self.selected = None;
        self.valid_moves.clear();

        match self.board.piece_at(row, col) {
            Some(piece) if piece.side == self.turn => {
                self.valid_moves = legal_moves(&self.board, &piece);
                self.selected = Some((row, col));
                true
            }
            _ => false,
        }
    }

    /// A rejected destination is a normal outcome, not an error.
    fn try_move(&mut self, row: u8, col: u8) -> bool {
        let Some((selected_row, selected_col)) = self.selected else {
            return false;
        };
        let Some(captured) = self.valid_moves.get(&(row, col)).cloned() else {
            return false;
        };
        let Some(piece) = self.board.piece_at(selected_row, selected_col) else {
            return false;
        };

        self.board.apply_move(piece, row, col);
        if !captured.is_empty() {
            self.board.remove(&captured);
        }
        debug!(
            "{} plays {}",
            piece.side,
            move_string((selected_row, selected_col), (row, col), &captured)
        );
        self.next_turn();
        true
    }

    /// Adopts a position produced by the search as the automated side's turn.
    pub fn ai_move(&mut self, board: Board) {
        self.board = board;
        self.next_turn();
    }

    fn next_turn(&mut self) {
        self.selected = None;
        self.valid_moves.clear();
        self.turn = self.turn.opponent();
    }
}

#[cfg(test)]
mod game_tests {
    use super::*;

    #[test]
    pub fn selecting_a_friendly_piece_caches_its_destinations() {
        let mut game = Game::new();

        assert!(game.select(5, 2));
        assert_eq!(Some((5, 2)), game.selected());
        assert_eq!(2, game.destinations().len());
        assert!(game.destinations().contains_key(&(4, 1)));
        assert!(game.destinations().contains_key(&(4, 3)));
    }

    #[test]
    pub fn enemy_pieces_and_empty_squares_clear_the_selection() {
        let mut game = Game::new();

        assert!(game.select(5, 2));
        // White piece while Red is to move
        assert!(!game.select(2, 1));
        assert_eq!(None, game.selected());

        assert!(game.select(5, 2));
        // Empty square that is no destination
        assert!(!game.select(4, 7));
        assert_eq!(None, game.selected());
        assert!(game.destinations().is_empty());
    }

    #[test]
    pub fn completing_a_move_advances_the_turn() {
        let mut game = Game::new();

        assert!(game.select(5, 2));
        assert!(game.select(4, 3));

        assert_eq!(Side::White, game.turn);
        assert_eq!(None, game.selected());
        assert!(game.board.piece_at(5, 2).is_none());
        assert!(game.board.piece_at(4, 3).is_some());
    }

    #[test]
    pub fn a_failed_move_falls_through_to_reselection() {
        let mut game = Game::new();

        assert!(game.select(5, 2));
        // Not a destination of (5, 2), but another friendly piece
        assert!(game.select(5, 4));
        assert_eq!(Some((5, 4)), game.selected());
        // The board is untouched and it is still Red's turn
        assert_eq!(Side::Red, game.turn);
        assert!(game.board.piece_at(5, 2).is_some());
    }

    #[test]
    pub fn capture_moves_remove_the_jumped_pieces() {
        // Red on c3 can jump White on d4
        let (turn, board) = Board::from_position("R:W18:R22").unwrap();
        let mut game = Game::new();
        game.load(turn, board);

        assert!(game.select(5, 2));
        assert!(game.select(3, 4));

        assert_eq!(0, game.board.white_left);
        assert_eq!(None, game.board.piece_at(4, 3));
        assert_eq!(Some(Side::Red), game.winner());
        assert_eq!(Side::White, game.turn);
    }

    #[test]
    pub fn a_capture_chain_ending_on_the_far_row_crowns() {
        // Red on b6 jumps White on c7 and lands on d8
        let (turn, board) = Board::from_position("R:W6:R9").unwrap();
        let mut game = Game::new();
        game.load(turn, board);

        assert!(game.select(2, 1));
        assert!(game.select(0, 3));

        let crowned = game.board.piece_at(0, 3).unwrap();
        assert!(crowned.king);
        assert_eq!(1, game.board.red_kings);
        assert_eq!(0, game.board.white_left);
    }

    #[test]
    pub fn ai_move_adopts_the_board_and_flips_the_turn() {
        let mut game = Game::new();
        game.select(5, 2);
        game.select(4, 3);
        assert_eq!(Side::White, game.turn);

        let (_, replacement) = game.board.search(1, true);
        game.ai_move(replacement.clone());

        assert_eq!(Side::Red, game.turn);
        assert!(game.board == replacement);
        assert_eq!(None, game.selected());
    }

    #[test]
    pub fn reset_returns_to_the_starting_position() {
        let mut game = Game::new();
        game.select(5, 2);
        game.select(4, 3);

        game.reset();

        assert_eq!(Side::Red, game.turn);
        assert!(game.board == Board::new());
        assert_eq!(None, game.selected());
        assert!(game.destinations().is_empty());
    }
}
