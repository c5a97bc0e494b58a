use crate::board::Board;
use crate::bot::Difficulty;
use crate::error::GameError;
use crate::events::GameEvent;
use crate::game::{load_board, save_board, Game, GameId, GameResult, MoveCounters, Seat, Status};
use crate::move_generator::{generate_type, GenType};
use crate::move_processor::{forfeit, make_move};
use crate::piece::Color;
use crate::r#move::Move;
use crate::worker::{BotJob, BotPool};

use regex::Regex;
use rustyline::config::Configurer;
use rustyline::Editor;
use std::sync::Arc;

/// Interactive front end: a line editor around a `Session`
pub struct Shell {
    session: Session,
    editor: Editor<()>,
}
impl Default for Shell {
    fn default() -> Self {
        let mut editor = Editor::<()>::new();
        editor.set_auto_add_history(true);
        editor.set_check_cursor_position(true);
        Shell {
            session: Session::default(),
            editor,
        }
    }
}

impl Shell {
    pub fn run(&mut self) {
        while let Ok(line) = self.editor.readline("dama> ") {
            match self.session.handle_command(&line) {
                Ok(ShellOkCode::ShouldQuit) => break,
                Err(ShellErrCode::BadCommand(cmd)) => {
                    eprintln!("Unknown or badly formed command: {}", cmd)
                }
                Err(ShellErrCode::BadMove(mv)) => {
                    eprintln!("Badly formatted move: {}", mv)
                }
                Err(ShellErrCode::MissingArg(arg)) => {
                    eprintln!("Missing an argument: {} {} <- here", line.trim(), arg)
                }
                Err(ShellErrCode::Game(e)) => eprintln!("{}", e),
                _ => (),
            }
        }
    }
}

/// One game at a time, with bots answering through a worker pool
pub struct Session {
    game: Game,
    board: Board,
    pool: BotPool,
    next_game_id: GameId,
}
impl Default for Session {
    fn default() -> Self {
        Session {
            game: Self::new_game(0, None),
            board: Board::starting(),
            pool: BotPool::default(),
            next_game_id: 1,
        }
    }
}

impl Session {
    fn new_game(id: GameId, bot: Option<(Color, Difficulty)>) -> Game {
        let seat = |color: Color| match bot {
            Some((c, difficulty)) if c == color => Seat::Bot { difficulty },
            _ => Seat::Human {
                id: 0,
                name: String::from("you"),
            },
        };
        // Writing the starting board can't fail
        Game::new(id, seat(Color::Red), seat(Color::White)).unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn handle_command(&mut self, line: &str) -> Result<ShellOkCode, ShellErrCode> {
        let args_regex = Self::args_regex();
        let mut args = args_regex.find_iter(line).map(|m| m.as_str());
        let cmd = if let Some(c) = args.next() {
            c
        } else {
            return Err(ShellErrCode::NoCommand);
        };
        match cmd {
            "new" => {
                let bot = match args.next() {
                    Some(c) => {
                        let color = Color::parse(c).ok_or_else(|| ShellErrCode::BadCommand(line.to_string()))?;
                        let difficulty = match args.next() {
                            Some(d) => Difficulty::parse(d).ok_or_else(|| ShellErrCode::BadCommand(line.to_string()))?,
                            None => Difficulty::Medium,
                        };
                        Some((color, difficulty))
                    }
                    None => None,
                };
                self.pool.cache().remove_game(self.game.id);
                self.game = Self::new_game(self.next_game_id, bot);
                self.next_game_id += 1;
                self.board = Board::starting();
                self.play_bots()?;
            }
            "position" => {
                let board = match args.next() {
                    Some("startpos") => Board::starting(),
                    Some(notation) => notation
                        .replace('"', "")
                        .parse()
                        .map_err(ShellErrCode::Game)?,
                    None => return Err(ShellErrCode::MissingArg(String::from("<startpos | board>"))),
                };
                let turn = match args.next() {
                    Some(c) => Color::parse(c).ok_or_else(|| ShellErrCode::BadCommand(line.to_string()))?,
                    None => Color::White,
                };
                self.set_position(board, turn)?;
            }
            "moves" => {
                let gen_type = match args.next() {
                    Some("captures") => GenType::Captures,
                    Some(_) => return Err(ShellErrCode::BadCommand(line.to_string())),
                    None => GenType::Legal,
                };
                println!("{}", generate_type(&self.board, self.game.current_turn, gen_type))
            }
            "play" => {
                let mv_str = args.next().ok_or_else(|| ShellErrCode::MissingArg(String::from("<move>")))?;
                let mv = Move::parse(mv_str).ok_or_else(|| ShellErrCode::BadMove(String::from(mv_str)))?;
                let result = make_move(&mut self.game, &mut self.board, &mv).map_err(ShellErrCode::Game)?;
                self.send_and_settle(&result.events);
                self.play_bots()?;
            }
            "go" => {
                let difficulty = match args.next() {
                    Some(d) => Difficulty::parse(d).ok_or_else(|| ShellErrCode::BadCommand(line.to_string()))?,
                    None => self
                        .game
                        .bot_difficulty(self.game.current_turn)
                        .unwrap_or(Difficulty::Hard),
                };
                self.bot_turn(difficulty)?;
            }
            "forfeit" => {
                let turn = self.game.current_turn;
                let event = forfeit(&mut self.game, turn).map_err(ShellErrCode::Game)?;
                self.send_and_settle(&[event]);
            }
            "show" => {
                println!("{}", self.board);
                println!(
                    "game {} | {:?} | {} to move | {} moves, {} without progress",
                    self.game.id,
                    self.game.status,
                    self.game.current_turn,
                    self.game.counters.total_moves,
                    self.game.counters.moves_without_capture_or_promotion
                );
            }
            "save" => println!(
                "{}",
                serde_json::to_string(&self.game).map_err(|e| ShellErrCode::Game(e.into()))?
            ),
            "load" => {
                // The record is JSON, so it is taken whole instead of split into words
                let json = line.trim_start()[cmd.len()..].trim();
                if json.is_empty() {
                    return Err(ShellErrCode::MissingArg(String::from("<json>")));
                }
                let game: Game = serde_json::from_str(json).map_err(|e| ShellErrCode::Game(e.into()))?;
                self.board = load_board(&game).map_err(ShellErrCode::Game)?;
                self.next_game_id = self.next_game_id.max(game.id + 1);
                self.game = game;
            }
            "threads" => {
                let threads = args
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .ok_or_else(|| ShellErrCode::MissingArg(String::from("<n>")))?;
                self.pool = BotPool::with_cache(threads, Arc::clone(self.pool.cache()));
            }
            "quit" => return Ok(ShellOkCode::ShouldQuit),
            _ => return Err(ShellErrCode::BadCommand(String::from(cmd))),
        }

        Ok(ShellOkCode::OkCommand)
    }

    /// Sets up an arbitrary position in a fresh record, keeping the seats
    fn set_position(&mut self, board: Board, turn: Color) -> Result<(), ShellErrCode> {
        self.game.current_turn = turn;
        self.game.counters = MoveCounters::default();
        self.game.status = Status::InProgress;
        self.game.result = GameResult::Undecided;
        self.game.winner = None;
        self.game.draw_reason = None;
        save_board(&mut self.game, &board).map_err(ShellErrCode::Game)?;
        self.board = board;
        Ok(())
    }

    /// Lets the bots play for as long as one of them is to move
    fn play_bots(&mut self) -> Result<(), ShellErrCode> {
        while let Some(difficulty) = self.game.bot_difficulty(self.game.current_turn) {
            if self.game.is_finished() || !self.bot_turn(difficulty)? {
                break;
            }
        }
        Ok(())
    }

    /// Asks the pool for a move and commits it, returns whether a move was played
    fn bot_turn(&mut self, difficulty: Difficulty) -> Result<bool, ShellErrCode> {
        if self.game.is_finished() {
            return Err(ShellErrCode::Game(GameError::GameAlreadyFinished));
        }
        self.pool.submit(BotJob {
            game_id: self.game.id,
            difficulty,
            board: self.board.clone(),
            color: self.game.current_turn,
        });
        let reply = match self.pool.recv() {
            Some(r) => r,
            None => return Ok(false),
        };
        let mv = match reply.mv {
            Some(mv) => mv,
            None => return Ok(false),
        };
        println!("bestmove {} ({}ms)", mv, reply.search_time.as_millis());

        let result = make_move(&mut self.game, &mut self.board, &mv).map_err(ShellErrCode::Game)?;
        self.send_and_settle(&result.events);
        Ok(true)
    }

    /// Prints the events, and lets go of the game's bots once it is over
    fn send_and_settle(&self, events: &[GameEvent]) {
        for event in events {
            println!("{}", event)
        }
        if events.iter().any(GameEvent::ends_game) {
            self.pool.cache().remove_game(self.game.id);
        }
    }

    fn args_regex() -> Regex {
        Regex::new(r#"(".*?"|[^"\s]+)"#).unwrap()
    }
}

#[derive(Debug, PartialEq)]
pub enum ShellOkCode {
    OkCommand,
    ShouldQuit,
}

#[derive(Debug)]
pub enum ShellErrCode {
    MissingArg(String),
    NoCommand,
    BadCommand(String),
    BadMove(String),
    Game(GameError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            game: Session::new_game(0, None),
            board: Board::starting(),
            pool: BotPool::new(1),
            next_game_id: 1,
        }
    }

    #[test]
    fn human_moves_go_through_the_pipeline() {
        let mut s = session();
        assert!(s.handle_command("play c6-d5").is_ok());
        assert_eq!(s.game().current_turn, Color::Red);
        assert!(matches!(
            s.handle_command("play c6-d5"),
            Err(ShellErrCode::Game(GameError::InvalidMove(_)))
        ));
        assert!(matches!(s.handle_command("play c6"), Err(ShellErrCode::BadMove(_))));
        assert!(matches!(s.handle_command("play"), Err(ShellErrCode::MissingArg(_))));
    }

    #[test]
    fn bot_answers_the_human() {
        let mut s = session();
        s.handle_command("new red easy").unwrap();
        assert_eq!(s.game().id, 1);
        s.handle_command("play c6-d5").unwrap();
        // Red replied right away
        assert_eq!(s.game().current_turn, Color::White);
        assert_eq!(s.game().counters.total_moves, 2);
    }

    #[test]
    fn positions_and_records() {
        let mut s = session();
        s.handle_command("position 8/8/8/8/3r4/4w3/8/8 white").unwrap();
        s.handle_command("go medium").unwrap();
        assert_eq!(s.game().status, Status::Finished);
        assert!(matches!(
            s.handle_command("go"),
            Err(ShellErrCode::Game(GameError::GameAlreadyFinished))
        ));

        let saved = serde_json::to_string(s.game()).unwrap();
        let mut other = session();
        other.handle_command(&format!("load {}", saved)).unwrap();
        assert_eq!(other.game(), s.game());
        assert_eq!(other.board(), s.board());
    }

    #[test]
    fn finished_games_let_go_of_their_bots() {
        let mut s = session();
        s.handle_command("new red easy").unwrap();
        s.handle_command("play c6-d5").unwrap();
        assert_eq!(s.pool.cache().len(), 1);
        s.handle_command("forfeit").unwrap();
        assert_eq!(s.game().status, Status::Finished);
        assert_eq!(s.game().winner, Some(Color::Red));
        assert!(s.pool.cache().is_empty());

        // A human's winning capture does the same
        s.handle_command("position 8/8/8/8/3r4/4w3/8/8 white").unwrap();
        s.pool.cache().get_or_create(s.game.id, Color::Red, Difficulty::Easy);
        s.handle_command("play e6xc4").unwrap();
        assert_eq!(s.game().status, Status::Finished);
        assert!(s.pool.cache().is_empty());
    }

    #[test]
    fn captures_can_be_listed_alone() {
        let mut s = session();
        assert!(s.handle_command("moves captures").is_ok());
        assert!(s.handle_command("moves").is_ok());
        assert!(matches!(s.handle_command("moves sideways"), Err(ShellErrCode::BadCommand(_))));
    }

    #[test]
    fn bad_commands() {
        let mut s = session();
        assert!(matches!(s.handle_command(""), Err(ShellErrCode::NoCommand)));
        assert!(matches!(s.handle_command("castle"), Err(ShellErrCode::BadCommand(_))));
        assert!(matches!(s.handle_command("new purple"), Err(ShellErrCode::BadCommand(_))));
        assert!(matches!(
            s.handle_command("position 8/8"),
            Err(ShellErrCode::Game(GameError::BadNotation(_)))
        ));
        assert_eq!(s.handle_command("threads 2").unwrap(), ShellOkCode::OkCommand);
        assert_eq!(s.handle_command("quit").unwrap(), ShellOkCode::ShouldQuit);
    }
}
