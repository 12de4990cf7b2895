use std::time::Instant;

use log::info;
use num_format::{Locale, ToFormattedString};

use crate::{
    board::{Board, Side},
    move_generator::successors,
};

/// Search depth used when the caller does not pick one.
pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

#[derive(Debug, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub leaf_nodes: u64,
}

impl Board {
    /// Root entry point: picks the best reachable position for White when
    /// `maximizing`, for Red otherwise, and logs how the search went.
    pub fn search(&self, depth: u8, maximizing: bool) -> (f32, Board) {
        let mut stats = SearchStats::default();

        let start_time = Instant::now();
        let result = self.minimax(depth, maximizing, &mut stats);
        let elapsed = start_time.elapsed();

        let nps = stats.nodes as f64 / elapsed.as_secs_f64();
        info!(
            "depth {depth} in {elapsed:#?}. Nodes: {}. Nodes per second: {}. Score: {:.1}",
            stats.nodes.to_formatted_string(&Locale::en),
            (nps as u64).to_formatted_string(&Locale::en),
            result.0
        );

        result
    }

    /// Plain fixed-depth minimax over full board copies, no pruning. Returns
    /// the chosen successor position and its score; at a leaf (depth
    /// exhausted or the game already decided) the returned position is a
    /// copy of `self`, a stand-in rather than an actual move. Never mutates
    /// `self`.
    pub fn minimax(&self, depth: u8, maximizing: bool, stats: &mut SearchStats) -> (f32, Board) {
        stats.nodes += 1;

        if depth == 0 || self.winner().is_some() {
            stats.leaf_nodes += 1;
            return (self.evaluate(), self.clone());
        }

        let side = if maximizing { Side::White } else { Side::Red };
        let mut best_score = if maximizing {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };
        let mut best_position = None;

        for position in successors(self, side) {
            let (score, _) = position.minimax(depth - 1, !maximizing, stats);
            // Match-or-better, not strictly better: of equal-scoring
            // successors the last one enumerated is kept.
            let better = if maximizing {
                score >= best_score
            } else {
                score <= best_score
            };
            if better {
                best_score = score;
                best_position = Some(position);
            }
        }

        match best_position {
            Some(position) => (best_score, position),
            // The side to move has pieces but no moves. That is not a loss
            // under the piece-count rule, so hand the position back unchanged
            // with its static score and let play continue.
            None => (self.evaluate(), self.clone()),
        }
    }
}
