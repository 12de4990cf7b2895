use std::collections::BTreeMap;

use regex::Regex;
use tinyvec::TinyVec;

use crate::board::{BOARD_SIZE, Piece};

/// Enemy pieces taken on the way to a destination, in jump order. Chains
/// longer than the inline capacity spill to the heap.
pub type Captures = TinyVec<[Piece; 4]>;

/// Every square reachable in one turn, keyed by landing square. An empty
/// capture list marks a plain step. A `BTreeMap` so iteration order is a
/// property of the position value itself; the search tie-break depends on
/// enumeration order being reproducible.
pub type MoveMap = BTreeMap<(u8, u8), Captures>;

/// Names a square like `b6`: files a-h left to right, rank 1 at the bottom
/// (row 7).
pub fn square_name(row: u8, col: u8) -> String {
    format!("{}{}", (b'a' + col) as char, BOARD_SIZE - row)
}

pub fn square_from_name(name: &str) -> Result<(u8, u8), String> {
    let pattern = Regex::new(r"^([a-h])([1-8])$").unwrap();
    let Some(captures) = pattern.captures(name) else {
        return Err(format!("Expected a square like b6 but found '{name}'"));
    };

    let col = captures[1].as_bytes()[0] - b'a';
    let rank = captures[2].as_bytes()[0] - b'0';
    Ok((BOARD_SIZE - rank, col))
}

/// Renders a turn like `b6-a5` or `b6xd4` for logs and divide output.
pub fn move_string(from: (u8, u8), to: (u8, u8), captured: &Captures) -> String {
    let separator = if captured.is_empty() { '-' } else { 'x' };
    format!(
        "{}{}{}",
        square_name(from.0, from.1),
        separator,
        square_name(to.0, to.1)
    )
}
