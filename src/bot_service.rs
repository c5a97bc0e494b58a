use log::{info, warn};

use crate::board::Board;
use crate::bot_cache::BotCache;
use crate::error::GameResultOf;
use crate::events::GameEvent;
use crate::game::Game;
use crate::move_processor::process_move;

/// Lets the bot sitting on the side to move play its turn, if there is one.
/// Nothing happens when the game is over or a human is to move. The bots of a
/// game are dropped from the cache once it ends
pub fn play_bot_turn(cache: &BotCache, game: &mut Game, board: &mut Board) -> GameResultOf<Vec<GameEvent>> {
    if game.is_finished() {
        return Ok(vec![]);
    }
    let color = game.current_turn;
    let difficulty = match game.bot_difficulty(color) {
        Some(d) => d,
        None => return Ok(vec![]),
    };

    let bot = cache.get_or_create(game.id, color, difficulty);
    let choice = bot
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .choose_move(board, color);
    let mv = match choice {
        Some(mv) => mv,
        None => {
            warn!("game {}: {} bot for {} found no move", game.id, difficulty, color);
            return Ok(vec![]);
        }
    };

    info!("game {}: {} bot plays {} for {}", game.id, difficulty, mv, color);
    let result = process_move(game, board, &mv)?;
    if result.game_over {
        cache.remove_game(game.id);
    }
    Ok(result.events)
}
