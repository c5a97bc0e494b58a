use crate::board::Board;
use crate::bot::Difficulty;
use crate::error::GameResultOf;
use crate::piece::Color;
use crate::rules::Terminal;
use serde::{Deserialize, Serialize};

pub type GameId = u64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    InProgress,
    Finished,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameResult {
    Undecided,
    RedWin,
    WhiteWin,
    Draw,
}
impl GameResult {
    pub fn win_for(color: Color) -> GameResult {
        match color {
            Color::Red => GameResult::RedWin,
            Color::White => GameResult::WhiteWin,
        }
    }
}

/// Who sits on one side of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Seat {
    Human { id: u64, name: String },
    Bot { difficulty: Difficulty },
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCounters {
    pub total_moves: u32,
    pub moves_without_capture_or_promotion: u32,
}

/// The caller-owned record of one game. Only the move pipeline and the terminal
/// check write to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub current_turn: Color,
    pub status: Status,
    pub result: GameResult,
    pub winner: Option<Color>,
    pub draw_reason: Option<String>,
    pub counters: MoveCounters,
    pub board_state: String,
    pub red: Seat,
    pub white: Seat,
}

impl Game {
    /// A fresh game on the starting position, White to move
    pub fn new(id: GameId, red: Seat, white: Seat) -> GameResultOf<Game> {
        let mut game = Game {
            id,
            current_turn: Color::White,
            status: Status::InProgress,
            result: GameResult::Undecided,
            winner: None,
            draw_reason: None,
            counters: MoveCounters::default(),
            board_state: String::new(),
            red,
            white,
        };
        save_board(&mut game, &Board::starting())?;
        Ok(game)
    }

    pub fn is_finished(&self) -> bool {
        self.status == Status::Finished
    }

    pub fn seat(&self, color: Color) -> &Seat {
        match color {
            Color::Red => &self.red,
            Color::White => &self.white,
        }
    }

    /// The bot difficulty playing `color`, if that side is a bot
    pub fn bot_difficulty(&self, color: Color) -> Option<Difficulty> {
        match self.seat(color) {
            Seat::Bot { difficulty } => Some(*difficulty),
            Seat::Human { .. } => None,
        }
    }

    pub fn mark_finished(&mut self, winner: Option<Color>, result: GameResult, reason: Option<String>) {
        self.status = Status::Finished;
        self.winner = winner;
        self.result = result;
        self.draw_reason = reason;
    }

    /// Writes a terminal classification into the record.
    /// Returns false, leaving the record untouched, for an ongoing game
    pub fn apply_terminal(&mut self, terminal: &Terminal) -> bool {
        match terminal {
            Terminal::Win { winner, .. } => {
                self.mark_finished(Some(*winner), GameResult::win_for(*winner), None)
            }
            Terminal::Draw(reason) => {
                self.mark_finished(None, GameResult::Draw, Some(reason.to_string()))
            }
            Terminal::Ongoing => return false,
        }
        true
    }
}

pub fn load_board(game: &Game) -> GameResultOf<Board> {
    Ok(serde_json::from_str(&game.board_state)?)
}

pub fn save_board(game: &mut Game, board: &Board) -> GameResultOf<()> {
    game.board_state = serde_json::to_string(board)?;
    Ok(())
}
