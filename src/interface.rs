use std::io;

use log::{debug, error};

use crate::{
    board::{Board, Side},
    game::Game,
    move_generator::legal_moves,
    moves::{move_string, square_from_name, square_name},
};

/// Line-oriented front end for a session: squares select and move Red's
/// pieces, the engine answers for White. This is the whole surface the core
/// offers a presentation layer; a graphical client would issue the same
/// calls with clicks instead of commands.
pub struct TextInterface {
    game: Game,
    depth: u8,
}

impl TextInterface {
    pub fn new(depth: u8) -> TextInterface {
        TextInterface {
            game: Game::new(),
            depth,
        }
    }

    /// Reads commands from stdin until `quit` or end of input.
    pub fn run(&mut self) {
        println!("{}", self.game.board);
        println!("{} to move. Type help for commands.", self.game.turn);

        let mut line = String::new();
        loop {
            line.clear();
            match io::stdin().read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    error!("Failed to read from stdin: {e}");
                    break;
                }
            }
            if !self.process_command(line.trim()) {
                break;
            }
        }
    }

    /// Handles one command line. Returns false when the session should end.
    pub fn process_command(&mut self, cmd: &str) -> bool {
        debug!("Received command '{cmd}'");
        let mut tokens = cmd.split_whitespace();
        match tokens.next() {
            None => {}
            Some("quit") | Some("exit") => return false,
            Some("help") => print_help(),
            Some("show") => {
                println!("{}", self.game.board);
                println!("{}", self.game.board.to_position(self.game.turn));
            }
            Some("new") => {
                self.game.reset();
                println!("{}", self.game.board);
                println!("{} to move.", self.game.turn);
            }
            Some("winner") => match self.game.winner() {
                Some(winner) => println!("{winner} has won."),
                None => println!("Nobody has won yet."),
            },
            Some("setup") => match tokens.next() {
                Some(position) => self.setup(position),
                None => println!("Usage: setup <position>, e.g. setup W:W9:R14,22"),
            },
            Some("moves") => match tokens.next() {
                Some(square) => self.print_moves(square),
                None => println!("Usage: moves <square>, e.g. moves b6"),
            },
            Some("go") => self.engine_move(),
            Some(square) => self.click(square),
        }
        true
    }

    fn setup(&mut self, position: &str) {
        match Board::from_position(position) {
            Ok((turn, board)) => {
                self.game.load(turn, board);
                println!("{}", self.game.board);
                println!("{} to move.", self.game.turn);
            }
            Err(message) => println!("{message}"),
        }
    }

    fn print_moves(&self, square: &str) {
        let (row, col) = match square_from_name(square) {
            Ok(coordinate) => coordinate,
            Err(message) => {
                println!("{message}");
                return;
            }
        };

        match self.game.board.piece_at(row, col) {
            None => println!("No piece on {square}."),
            Some(piece) => {
                let moves = legal_moves(&self.game.board, &piece);
                if moves.is_empty() {
                    println!("{square} has no moves.");
                }
                for (destination, captured) in &moves {
                    println!("  {}", move_string((row, col), *destination, captured));
                }
            }
        }
    }

    /// A square on its own is a click: select a piece, or complete the move
    /// if the square is a cached destination. After Red completes a move the
    /// engine answers immediately.
    fn click(&mut self, square: &str) {
        if self.game.winner().is_some() {
            println!("The game is over. Type new for another one.");
            return;
        }

        let (row, col) = match square_from_name(square) {
            Ok(coordinate) => coordinate,
            Err(message) => {
                println!("{message}");
                return;
            }
        };

        let turn_before = self.game.turn;
        let accepted = self.game.select(row, col);

        if self.game.turn != turn_before {
            println!("{}", self.game.board);
            match self.game.winner() {
                Some(winner) => println!("{winner} wins!"),
                None => self.engine_move(),
            }
        } else if accepted {
            self.print_destinations();
        } else {
            println!("Nothing to select on {square}.");
        }
    }

    fn print_destinations(&self) {
        let Some((row, col)) = self.game.selected() else {
            return;
        };
        let destinations: Vec<String> = self
            .game
            .destinations()
            .keys()
            .map(|(to_row, to_col)| square_name(*to_row, *to_col))
            .collect();
        if destinations.is_empty() {
            println!("{} has no moves.", square_name(row, col));
        } else {
            println!("{} can reach {}.", square_name(row, col), destinations.join(", "));
        }
    }

    /// Searches for the side to move and adopts the result.
    fn engine_move(&mut self) {
        if self.game.winner().is_some() {
            println!("The game is over. Type new for another one.");
            return;
        }

        let side = self.game.turn;
        let (_, best) = self.game.board.search(self.depth, side == Side::White);
        if best == self.game.board {
            println!("{side} has no moves and passes.");
        }
        self.game.ai_move(best);

        println!("{}", self.game.board);
        match self.game.winner() {
            Some(winner) => println!("{winner} wins!"),
            None => println!("{} to move.", self.game.turn),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  <square>         select one of your pieces, e.g. b6");
    println!("  <square>         then a destination to move, e.g. a5");
    println!("  moves <square>   list the moves of the piece on a square");
    println!("  go               let the engine move for the side to play");
    println!("  show             print the board");
    println!("  setup <position> load a position, e.g. W:W9,K10:R14,22");
    println!("  new              start over");
    println!("  winner           report the result");
    println!("  quit             leave");
}
