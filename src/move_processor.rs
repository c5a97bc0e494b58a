use crate::board::Board;
use crate::error::{GameError, GameResultOf};
use crate::events::GameEvent;
use crate::game::{save_board, Game, GameResult};
use crate::move_generator::generate;
use crate::piece::Color;
use crate::r#move::Move;
use crate::rules::{is_game_over, play};
use crate::square::{col_of, row_of};
use log::{info, warn};

/// What happened when a move was committed
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    pub events: Vec<GameEvent>,
    pub next_turn: Color,
    pub game_over: bool,
}

/// Commits an already validated move: plays it, updates the counters, checks
/// for the end of the game and hands the turn over.
/// This is the only place where the turn, counters and status change
pub fn process_move(game: &mut Game, board: &mut Board, mv: &Move) -> GameResultOf<MoveResult> {
    let mut events = Vec::with_capacity(3);

    let promoted = play(board, mv);

    game.counters.total_moves += 1;
    if mv.is_capture() || promoted {
        game.counters.moves_without_capture_or_promotion = 0;
    } else {
        game.counters.moves_without_capture_or_promotion += 1;
    }

    events.push(if mv.is_capture() {
        GameEvent::CaptureMade { mv: mv.clone() }
    } else {
        GameEvent::MoveMade { mv: mv.clone() }
    });
    if promoted {
        if let Some(piece) = board.piece_on(mv.to) {
            events.push(GameEvent::PiecePromoted {
                row: row_of(mv.to),
                col: col_of(mv.to),
                color: piece.color,
            })
        }
    }

    let next_turn = game.current_turn.opposite();
    let game_over = is_game_over(board, next_turn, game);
    if game_over {
        events.push(match (game.winner, &game.draw_reason) {
            (Some(winner), _) => GameEvent::GameOver {
                winner,
                result: game.result,
            },
            (None, reason) => GameEvent::GameDrawn {
                reason: reason.clone().unwrap_or_default(),
            },
        });
    } else {
        game.current_turn = next_turn;
        events.push(GameEvent::NextTurn {
            color: next_turn,
            allowed_moves: generate(board, next_turn).to_vec(),
        });
    }

    save_board(game, board)?;

    Ok(MoveResult {
        events,
        next_turn,
        game_over,
    })
}

/// Looks a requested move up in the legal moves of the side to move, then commits
/// the engine's own copy of it. A request matches on its origin and destination,
/// and on its path and captured squares when it carries them
pub fn make_move(game: &mut Game, board: &mut Board, requested: &Move) -> GameResultOf<MoveResult> {
    if game.is_finished() {
        return Err(GameError::GameAlreadyFinished);
    }

    let legal_moves = generate(board, game.current_turn);
    let mv = legal_moves
        .iter()
        .find(|m| {
            m.from == requested.from
                && m.to == requested.to
                && (requested.path.is_empty() || m.path == requested.path)
                && (requested.captured.is_empty() || m.captured == requested.captured)
        })
        .cloned();

    match mv {
        Some(mv) => process_move(game, board, &mv),
        None => {
            warn!(
                "game {}: rejected {} for {}",
                game.id, requested, game.current_turn
            );
            Err(GameError::InvalidMove(format!(
                "{} is not legal for {}, legal moves are: {}",
                requested, game.current_turn, legal_moves
            )))
        }
    }
}

/// `color` gives up, the opponent wins
pub fn forfeit(game: &mut Game, color: Color) -> GameResultOf<GameEvent> {
    if game.is_finished() {
        return Err(GameError::GameAlreadyFinished);
    }

    let winner = color.opposite();
    let result = GameResult::win_for(winner);
    game.mark_finished(Some(winner), result, None);
    info!("game {}: {} forfeited, {} wins", game.id, color, winner);

    Ok(GameEvent::GameForfeited {
        winner,
        result,
        reason: format!("{} forfeited the game", color),
    })
}
