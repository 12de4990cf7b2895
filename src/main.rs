use std::time::SystemTime;

use clap::{Parser, Subcommand};
use log::{LevelFilter, debug, info};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
    board::{Board, Side},
    game::Game,
    interface::TextInterface,
    move_generator::successors,
    search::DEFAULT_SEARCH_DEPTH,
};

mod board;
mod evaluate;
mod game;
mod interface;
mod move_generator;
mod moves;
mod perft;
mod search;

#[derive(Parser)]
#[command(name = "lynx-checkers", about = "Checkers engine with a fixed-depth minimax opponent")]
struct Cli {
    /// Repeat for more log output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive game: Red on stdin, White answered by the engine
    Play {
        #[arg(long, default_value_t = DEFAULT_SEARCH_DEPTH)]
        depth: u8,
    },
    /// A random-moving Red against the searching White
    Selfplay {
        #[arg(long, default_value_t = DEFAULT_SEARCH_DEPTH)]
        depth: u8,
        #[arg(long, default_value_t = 150)]
        max_turns: u32,
        /// Seed for Red's choices, for reproducible games
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Count positions reachable from the start, for move generator checks
    Perft {
        #[arg(long)]
        depth: u8,
        /// Print per-move subtotals for the first turn
        #[arg(long)]
        divide: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logger(cli.verbose);
    log_panics::init();

    match cli.command {
        Command::Play { depth } => TextInterface::new(depth).run(),
        Command::Selfplay {
            depth,
            max_turns,
            seed,
        } => selfplay(depth, max_turns, seed),
        Command::Perft { depth, divide } => {
            Board::new().start_perft(Side::Red, depth, divide);
        }
    }
}

fn setup_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .unwrap();
}

/// Plays Red by uniform random choice over its successor positions and White
/// by search, until someone wins, someone runs out of moves, or the turn
/// budget runs dry.
fn selfplay(depth: u8, max_turns: u32, seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new();
    let mut turns_played = 0;

    for _ in 0..max_turns {
        if game.winner().is_some() {
            break;
        }

        match game.turn {
            Side::Red => {
                let positions = successors(&game.board, Side::Red);
                let Some(position) = positions.choose(&mut rng) else {
                    info!("Red has no moves after {turns_played} turns, stopping");
                    return;
                };
                debug!("turn {}: Red plays\n{}", turns_played + 1, position);
                game.ai_move(position.clone());
            }
            Side::White => {
                let (score, position) = game.board.search(depth, true);
                if position == game.board {
                    info!("White has no moves after {turns_played} turns, stopping");
                    return;
                }
                debug!(
                    "turn {}: White plays (score {score:.1})\n{}",
                    turns_played + 1,
                    position
                );
                game.ai_move(position);
            }
        }
        turns_played += 1;
    }

    match game.winner() {
        Some(winner) => info!("{winner} wins after {turns_played} turns"),
        None => info!("No winner within {turns_played} turns"),
    }
    println!("{}", game.board);
}
