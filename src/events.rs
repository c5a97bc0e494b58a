use crate::game::GameResult;
use crate::piece::Color;
use crate::r#move::Move;
use crate::square::square_representation;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Everything the engine tells the outside world about a game.
/// Transport is left to the caller, events serialize with an `action` tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEvent {
    MoveMade {
        #[serde(rename = "move")]
        mv: Move,
    },
    CaptureMade {
        #[serde(rename = "move")]
        mv: Move,
    },
    PiecePromoted {
        row: usize,
        col: usize,
        color: Color,
    },
    NextTurn {
        color: Color,
        allowed_moves: Vec<Move>,
    },
    GameOver {
        winner: Color,
        result: GameResult,
    },
    GameDrawn {
        reason: String,
    },
    GameForfeited {
        winner: Color,
        result: GameResult,
        reason: String,
    },
}

impl GameEvent {
    pub fn ends_game(&self) -> bool {
        matches!(
            self,
            GameEvent::GameOver { .. } | GameEvent::GameDrawn { .. } | GameEvent::GameForfeited { .. }
        )
    }
}

impl Display for GameEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::MoveMade { mv } => write!(f, "move {}", mv),
            GameEvent::CaptureMade { mv } => {
                write!(f, "capture {} ({} taken)", mv, mv.captured.len())
            }
            GameEvent::PiecePromoted { row, col, color } => write!(
                f,
                "{} piece promoted on {}",
                color,
                square_representation(row * 8 + col).unwrap_or_default()
            ),
            GameEvent::NextTurn {
                color,
                allowed_moves,
            } => write!(f, "{} to move, {} legal moves", color, allowed_moves.len()),
            GameEvent::GameOver { winner, .. } => write!(f, "game over, {} wins", winner),
            GameEvent::GameDrawn { reason } => write!(f, "game drawn: {}", reason),
            GameEvent::GameForfeited { winner, reason, .. } => {
                write!(f, "game forfeited, {} wins: {}", winner, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_carry_an_action_tag() {
        let event = GameEvent::PiecePromoted {
            row: 0,
            col: 1,
            color: Color::White,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "PIECE_PROMOTED");
        assert_eq!(json["color"], "WHITE");

        let event = GameEvent::MoveMade {
            mv: Move::new_quiet(40, 33),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"action":"MOVE_MADE","move":{"from":40,"to":33}}"#);
        assert_eq!(serde_json::from_str::<GameEvent>(&json).unwrap(), event);
    }

    #[test]
    fn only_final_events_end_the_game() {
        assert!(GameEvent::GameDrawn {
            reason: String::new()
        }
        .ends_game());
        assert!(!GameEvent::NextTurn {
            color: Color::Red,
            allowed_moves: vec![]
        }
        .ends_game());
    }
}
