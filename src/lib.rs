#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use mimalloc::MiMalloc;
use std::time::Instant;

use crate::board::Board;
use crate::move_generator::generate;
use crate::piece::Color;
use crate::rules::play;

pub mod board;
pub mod bot;
pub mod bot_cache;
pub mod bot_service;
pub mod error;
pub mod evaluation;
pub mod events;
pub mod game;
pub mod hash;
pub mod history;
pub mod r#move;
pub mod move_generator;
pub mod move_processor;
pub mod movelist;
pub mod piece;
pub mod rules;
pub mod search;
pub mod shell;
pub mod square;
pub mod transposition_table;
pub mod worker;

pub fn perft(depth: u32, notation: Option<String>) -> Result<(), error::GameError> {
    println!("perft");
    let board = match notation {
        None => Board::starting(),
        Some(n) => n.parse()?,
    };
    println!("{}\n", board);
    println!("depth nodes\n--------");
    for d in 0..depth + 1 {
        let start = Instant::now();
        let nodes = count_leaves(&board, Color::White, d);
        let elapsed = start.elapsed();
        println!(
            "{}     {} ({}s, {} nps)",
            d,
            nodes,
            elapsed.as_secs_f32(),
            nodes as f32 / elapsed.as_secs_f32()
        );
    }
    Ok(())
}

/// Number of move sequences of length `depth`, White moving first
/// ```
/// use dama::{board::Board, piece::Color, count_leaves};
/// assert_eq!(count_leaves(&Board::starting(), Color::White, 3), 302);
/// ```
pub fn count_leaves(board: &Board, color: Color, depth: u32) -> u128 {
    if depth == 0 {
        return 1;
    }
    let moves = generate(board, color);
    if depth == 1 {
        return moves.len() as u128;
    }
    let mut nodes: u128 = 0u128;
    for mv in &moves {
        let mut next = board.clone();
        play(&mut next, mv);
        nodes += count_leaves(&next, color.opposite(), depth - 1);
    }
    nodes
}
