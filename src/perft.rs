use std::time::Instant;

use log::info;
use num_format::{Locale, ToFormattedString};

use crate::{
    board::{Board, Side},
    move_generator::legal_moves,
    moves::move_string,
};

#[derive(Debug, Default)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub promotions: u64,
}

impl Board {
    /// Counts positions reachable in `depth` full turns, `side` moving
    /// first, alternating sides per turn.
    pub fn start_perft(&self, side: Side, depth: u8, divide: bool) -> u64 {
        let mut stats = PerftStats::default();

        let start_time = Instant::now();
        do_perft(depth, 1, self, side, &mut stats, divide);
        let elapsed = start_time.elapsed();

        if divide {
            println!("\n{}", stats.nodes);
        }

        let nps = stats.nodes as f64 / elapsed.as_secs_f64();
        info!(
            "depth {depth} in {elapsed:#?}. Nodes: {}. Nodes per second: {}",
            stats.nodes.to_formatted_string(&Locale::en),
            (nps as u64).to_formatted_string(&Locale::en)
        );
        info!("{:?}", stats);

        stats.nodes
    }
}

fn do_perft(draft: u8, ply: u8, board: &Board, side: Side, stats: &mut PerftStats, divide: bool) {
    if draft == 0 {
        stats.nodes += 1;
        return;
    }

    for piece in board.pieces_of(side) {
        for (destination, captured) in legal_moves(board, &piece) {
            let mut position = board.clone();
            position.apply_move(piece, destination.0, destination.1);
            if !captured.is_empty() {
                position.remove(&captured);
            }

            if draft == 1 {
                if !captured.is_empty() {
                    stats.captures += 1;
                }
                if !piece.king
                    && position
                        .piece_at(destination.0, destination.1)
                        .is_some_and(|moved| moved.king)
                {
                    stats.promotions += 1;
                }
            }

            let start_nodes = stats.nodes;
            do_perft(draft - 1, ply + 1, &position, side.opponent(), stats, divide);

            if divide && ply == 1 {
                println!(
                    "{} {}",
                    move_string((piece.row, piece.col), destination, &captured),
                    stats.nodes - start_nodes
                );
            }
        }
    }
}

#[cfg(test)]
mod perft_tests {
    use super::*;

    #[test]
    pub fn opening_node_counts_match_hand_counts() {
        let board = Board::new();

        assert_eq!(7, board.start_perft(Side::Red, 1, false));
        // Whatever Red plays, White still has its own seven first moves
        assert_eq!(49, board.start_perft(Side::Red, 2, false));
    }

    #[test]
    pub fn capture_and_promotion_turns_are_counted() {
        // White on b6 with a double jump available, plus a Red piece one
        // step from its crowning row
        let (_, board) = Board::from_position("W:W9:R14,22,6").unwrap();

        let mut stats = PerftStats::default();
        do_perft(1, 1, &board, Side::White, &mut stats, false);
        assert_eq!(2, stats.captures);

        let mut stats = PerftStats::default();
        do_perft(1, 1, &board, Side::Red, &mut stats, false);
        assert!(stats.promotions >= 1);
    }
}
