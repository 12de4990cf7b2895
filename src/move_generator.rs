use log::trace;

use crate::{
    board::{BOARD_SIZE, Board, Piece, Side},
    moves::{Captures, MoveMap},
};

/// The four diagonal step offsets.
const DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Every square `piece` can end its turn on, with the enemy pieces jumped on
/// the way there. Kings look along all four diagonals, plain pieces only
/// along their side's forward pair. Captures are not mandatory: plain steps
/// and capture chains are reported side by side.
pub fn legal_moves(board: &Board, piece: &Piece) -> MoveMap {
    let mut moves = MoveMap::new();
    let chain = Captures::default();
    for direction in DIRECTIONS {
        if piece.king || direction.0 == piece.side.forward_step() {
            explore(
                board,
                piece.side,
                piece.row as i8,
                piece.col as i8,
                direction,
                &chain,
                &mut moves,
            );
        }
    }
    moves
}

/// Looks one slot out from (row, col) along `direction`. An empty slot is a
/// plain-step destination, but only while no capture has started: a turn is
/// one step or one chain, never both. An enemy with an empty slot behind it
/// is jumped; the landing square becomes a destination carrying the chain so
/// far plus the jumped piece, and the traversal continues from the landing
/// square in all four directions with the grown chain. Everything else
/// blocks the direction.
///
/// The chain is cloned per branch; sibling branches must never see each
/// other's captures.
fn explore(
    board: &Board,
    side: Side,
    row: i8,
    col: i8,
    direction: (i8, i8),
    chain: &Captures,
    moves: &mut MoveMap,
) {
    let (next_row, next_col) = (row + direction.0, col + direction.1);
    if !on_board(next_row, next_col) {
        return;
    }

    match board.piece_at(next_row as u8, next_col as u8) {
        None => {
            if chain.is_empty() {
                moves.insert((next_row as u8, next_col as u8), Captures::default());
            }
        }
        Some(blocker) if blocker.side == side => {}
        Some(enemy) => {
            // A piece can only be taken once per turn. Without this the
            // continuation could circle a ring of enemies forever.
            if chain
                .iter()
                .any(|taken| taken.row == enemy.row && taken.col == enemy.col)
            {
                return;
            }

            let (landing_row, landing_col) = (next_row + direction.0, next_col + direction.1);
            if !on_board(landing_row, landing_col)
                || board
                    .piece_at(landing_row as u8, landing_col as u8)
                    .is_some()
            {
                return;
            }

            let mut grown = chain.clone();
            grown.push(enemy);
            // A landing square is a valid place to stop even when the chain
            // can be extended further. Later extensions landing on the same
            // square overwrite this entry.
            moves.insert((landing_row as u8, landing_col as u8), grown.clone());

            for continuation in DIRECTIONS {
                explore(
                    board,
                    side,
                    landing_row,
                    landing_col,
                    continuation,
                    &grown,
                    moves,
                );
            }
        }
    }
}

fn on_board(row: i8, col: i8) -> bool {
    (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col)
}

/// All positions reachable by `side` in one turn. Each is built on its own
/// deep copy of `board`; nothing is shared with the input or between
/// successors.
pub fn successors(board: &Board, side: Side) -> Vec<Board> {
    let mut positions = Vec::new();
    for piece in board.pieces_of(side) {
        for (destination, captured) in legal_moves(board, &piece) {
            let mut position = board.clone();
            position.apply_move(piece, destination.0, destination.1);
            if !captured.is_empty() {
                position.remove(&captured);
            }
            positions.push(position);
        }
    }
    trace!("{} successors for {side}", positions.len());
    positions
}
