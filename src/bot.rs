use std::fmt::Display;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::evaluation::Heuristics;
use crate::history::RepetitionHistory;
use crate::move_generator::generate;
use crate::piece::Color;
use crate::r#move::Move;
use crate::rules::play;
use crate::search::{search_root, Search, SearchOptions};
use crate::transposition_table::TranspositionTable;

/// The position reached by playing `mv`, the given board is left as is
pub fn simulate(board: &Board, mv: &Move) -> Board {
    let mut next = board.clone();
    play(&mut next, mv);
    next
}

pub fn opposite(color: Color) -> Color {
    color.opposite()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}
impl Difficulty {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// A fresh bot of this difficulty, with an empty history and table
    pub fn create_bot(self) -> Box<dyn BotStrategy + Send> {
        match self {
            Difficulty::Easy => Box::new(EasyBot::new()),
            Difficulty::Medium => Box::new(MediumBot::new()),
            Difficulty::Hard => Box::new(HardBot::new()),
        }
    }
}
impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{}", name)
    }
}

/// Something that picks moves for one side of one game.
/// Implementations may keep state between calls, they are only ever called
/// sequentially for a given game
pub trait BotStrategy: Send {
    /// Picks a legal move for `color`, `None` only if there is none
    fn choose_move(&mut self, board: &Board, color: Color) -> Option<Move>;

    fn difficulty(&self) -> Difficulty;
}

/// Plays any legal move, uniformly at random
pub struct EasyBot {
    rng: StdRng,
}
impl EasyBot {
    pub fn new() -> Self {
        EasyBot {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        EasyBot {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}
impl Default for EasyBot {
    fn default() -> Self {
        Self::new()
    }
}
impl BotStrategy for EasyBot {
    fn choose_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        let moves = generate(board, color).to_vec();
        let choice = moves.choose(&mut self.rng).cloned();
        if choice.is_none() {
            warn!("{} has no legal move", color);
        }
        choice
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Easy
    }
}

/// Common path of the searching bots. A forced move is played without searching,
/// every chosen move has its resulting board recorded in the history
fn search_and_record(
    board: &Board,
    color: Color,
    options: &SearchOptions,
    heuristics: Heuristics,
    transposition_table: Option<&mut TranspositionTable>,
    history: &mut RepetitionHistory,
) -> (Option<Move>, Option<Search>) {
    let moves = generate(board, color);
    let (chosen, search) = match moves.len() {
        0 => {
            warn!("{} has no legal move", color);
            return (None, None);
        }
        1 => (moves.first().cloned(), None),
        _ => {
            let search = search_root(board, color, options, heuristics, transposition_table, history);
            debug!("{:?} bot for {}: {}", heuristics, color, search);
            (search.best_move.clone(), Some(search))
        }
    };

    if let Some(mv) = &chosen {
        history.record(simulate(board, mv).get_hash());
    }
    (chosen, search)
}

/// Fixed depth alpha beta with light heuristics
pub struct MediumBot {
    history: RepetitionHistory,
    options: SearchOptions,
    last_search: Option<Search>,
}
impl MediumBot {
    pub fn new() -> Self {
        MediumBot {
            history: RepetitionHistory::default(),
            options: SearchOptions::medium(),
            last_search: None,
        }
    }

    pub fn last_search(&self) -> Option<&Search> {
        self.last_search.as_ref()
    }

    pub fn history(&self) -> &RepetitionHistory {
        &self.history
    }
}
impl Default for MediumBot {
    fn default() -> Self {
        Self::new()
    }
}
impl BotStrategy for MediumBot {
    fn choose_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        let (chosen, search) = search_and_record(
            board,
            color,
            &self.options,
            Heuristics::Medium,
            None,
            &mut self.history,
        );
        self.last_search = search;
        chosen
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Medium
    }
}

/// Iterative deepening alpha beta, with a transposition table kept across moves.
/// Entries only match while the repetition history is the one they were searched under
pub struct HardBot {
    history: RepetitionHistory,
    transposition_table: TranspositionTable,
    options: SearchOptions,
    last_search: Option<Search>,
}
impl HardBot {
    pub fn new() -> Self {
        Self::with_options(SearchOptions::hard())
    }

    pub fn with_options(options: SearchOptions) -> Self {
        HardBot {
            history: RepetitionHistory::default(),
            transposition_table: TranspositionTable::new(options.table_capacity),
            options,
            last_search: None,
        }
    }

    pub fn transposition_table_mut(&mut self) -> &mut TranspositionTable {
        &mut self.transposition_table
    }

    pub fn last_search(&self) -> Option<&Search> {
        self.last_search.as_ref()
    }

    pub fn history(&self) -> &RepetitionHistory {
        &self.history
    }
}
impl Default for HardBot {
    fn default() -> Self {
        Self::new()
    }
}
impl BotStrategy for HardBot {
    fn choose_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        let (chosen, search) = search_and_record(
            board,
            color,
            &self.options,
            Heuristics::Hard,
            Some(&mut self.transposition_table),
            &mut self.history,
        );
        self.last_search = search;
        chosen
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Hard
    }
}
