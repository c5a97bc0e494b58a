use crate::board::Board;
use crate::game::{Game, MoveCounters};
use crate::move_generator::generate;
use crate::piece::Color;
use crate::r#move::Move;
use crate::square::row_of;
use log::info;
use std::fmt::{Display, Formatter};

/// Moves without capture or promotion after which the game is drawn
pub const NO_PROGRESS_LIMIT: u32 = 80;
/// Total moves after which the game is drawn
pub const MOVE_LIMIT: u32 = 200;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WinReason {
    NoPieces,
    NoMoves,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawReason {
    NoProgress,
    MoveLimit,
}
impl Display for DrawReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawReason::NoProgress => write!(f, "{} moves without capture/promotion", NO_PROGRESS_LIMIT),
            DrawReason::MoveLimit => write!(f, "{} total moves reached", MOVE_LIMIT),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Terminal {
    Win { winner: Color, reason: WinReason },
    Draw(DrawReason),
    Ongoing,
}
impl Terminal {
    pub fn is_terminal(&self) -> bool {
        *self != Terminal::Ongoing
    }
}

/// Moves the piece and removes everything it jumped. The move is trusted to come
/// from the move generator
pub fn apply_move(board: &mut Board, mv: &Move) {
    if let Some(piece) = board.remove_piece(mv.from) {
        board.set_piece(mv.to, piece);
    }
    for &sq in &mv.captured {
        board.remove_piece(sq);
    }
}

/// Crowns the piece standing on `mv.to` if it is a man on its promotion row.
/// Returns whether a promotion happened, a king is left alone
pub fn promote_if_king(board: &mut Board, mv: &Move) -> bool {
    match board.piece_on(mv.to) {
        Some(p) if !p.is_king && row_of(mv.to) == p.color.promotion_row() => {
            board.crown(mv.to);
            true
        }
        _ => false,
    }
}

/// Applies a move then promotes, returning whether the piece got crowned
pub fn play(board: &mut Board, mv: &Move) -> bool {
    apply_move(board, mv);
    promote_if_king(board, mv)
}

/// Classifies a position with `side_to_move` to play. Checks run in order:
/// no pieces, no legal moves, the no-progress draw, then the move limit
pub fn classify(board: &Board, side_to_move: Color, counters: &MoveCounters) -> Terminal {
    let winner = side_to_move.opposite();
    if !board.has_pieces(side_to_move) {
        return Terminal::Win {
            winner,
            reason: WinReason::NoPieces,
        };
    }
    if generate(board, side_to_move).is_empty() {
        return Terminal::Win {
            winner,
            reason: WinReason::NoMoves,
        };
    }
    if counters.moves_without_capture_or_promotion >= NO_PROGRESS_LIMIT {
        return Terminal::Draw(DrawReason::NoProgress);
    }
    if counters.total_moves >= MOVE_LIMIT {
        return Terminal::Draw(DrawReason::MoveLimit);
    }
    Terminal::Ongoing
}

/// Checks for the end of the game, marking the record finished if so
pub fn is_game_over(board: &Board, side_to_move: Color, game: &mut Game) -> bool {
    let terminal = classify(board, side_to_move, &game.counters);
    match terminal {
        Terminal::Win { winner, reason } => info!(
            "game {} over: {} {}, {} wins",
            game.id,
            side_to_move,
            match reason {
                WinReason::NoPieces => "has no pieces",
                WinReason::NoMoves => "has no legal moves",
            },
            winner
        ),
        Terminal::Draw(reason) => info!("game {} drawn: {}", game.id, reason),
        Terminal::Ongoing => (),
    }
    game.apply_terminal(&terminal)
}
