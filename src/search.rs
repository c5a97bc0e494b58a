use std::fmt::Display;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::bot::simulate;
use crate::evaluation::{Evaluation, Heuristics, Score};
use crate::hash::{BoardHasher, Hash};
use crate::history::RepetitionHistory;
use crate::move_generator::generate;
use crate::piece::Color;
use crate::r#move::Move;
use crate::transposition_table::{Bound, TranspositionEntry, TranspositionTable};

/// A struct to group together every search option.
/// Avoids passing around 4 arguments in functions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_depth: u8,
    pub iterative_deepening: bool,
    pub use_transposition_table: bool,
    pub table_capacity: usize,
}
impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions::hard()
    }
}
impl SearchOptions {
    pub const MEDIUM_DEPTH: u8 = 3;
    pub const HARD_DEPTH: u8 = 9;

    /// Fixed depth, no table
    pub fn medium() -> Self {
        SearchOptions {
            max_depth: Self::MEDIUM_DEPTH,
            iterative_deepening: false,
            use_transposition_table: false,
            table_capacity: 0,
        }
    }

    pub fn hard() -> Self {
        SearchOptions {
            max_depth: Self::HARD_DEPTH,
            iterative_deepening: true,
            use_transposition_table: true,
            table_capacity: TranspositionTable::DEFAULT_CAPACITY,
        }
    }

    pub fn set_depth(&mut self, value: u8) -> &mut Self {
        self.max_depth = value.max(1);
        self
    }
    pub fn set_iterative_deepening(&mut self, value: bool) -> &mut Self {
        self.iterative_deepening = value;
        self
    }
    pub fn set_transposition_table(&mut self, value: bool) -> &mut Self {
        self.use_transposition_table = value;
        self
    }
    pub fn set_table_capacity(&mut self, value: usize) -> &mut Self {
        self.table_capacity = value;
        self
    }
}

/// The outcome of a search, as of its last completed depth
#[derive(Clone, Debug)]
pub struct Search {
    pub best_move: Option<Move>,
    pub score: Score,
    pub time: Duration,
    pub depth_reached: u8,
    pub nodes_searched: u128,
    /// Backed up value of every root move, in the order they were searched
    pub root_scores: Vec<(Move, Score)>,
}
impl Display for Search {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "depth {} time {} nodes {} nps {} score {} bestmove {}",
            self.depth_reached,
            self.time.as_millis(),
            self.nodes_searched,
            ((self.nodes_searched as f64) / self.time.as_secs_f64()) as u64,
            self.score,
            self.best_move
                .as_ref()
                .map_or(String::from("none"), |m| m.to_string()),
        )
    }
}
impl Default for Search {
    fn default() -> Self {
        Search {
            best_move: None,
            score: -Evaluation::INFINITY,
            time: Duration::ZERO,
            depth_reached: 0,
            nodes_searched: 0,
            root_scores: vec![],
        }
    }
}

/// Key under which a position is stored in the transposition table.
/// The same placement with another side to move, or searched for the other
/// color, gets a different key
pub fn transposition_key(board: &Board, to_move: Color, perspective: Color) -> Hash {
    BoardHasher::with_sides(board.get_hash(), to_move, perspective)
}

struct SearchContext<'a> {
    pub heuristics: Heuristics,
    pub perspective: Color,
    pub total_depth: u8,
    pub transposition_table: Option<&'a mut TranspositionTable>,
    pub history: &'a RepetitionHistory,
    // Leaf values carry repetition penalties, so table entries only hold for
    // the history they were computed under
    pub history_key: Hash,
    pub nodes_searched: u128,
}
impl SearchContext<'_> {
    fn static_eval(&self, board: &Board) -> Score {
        let penalty = self
            .history
            .distance(board.get_hash())
            .map_or(0, |d| self.heuristics.repetition_penalty(d, self.history.capacity()));
        self.heuristics.evaluate(board, self.perspective) - penalty
    }

    fn store(&mut self, key: Hash, entry: TranspositionEntry) {
        if let Some(tt) = self.transposition_table.as_deref_mut() {
            tt.set(key, entry)
        }
    }
}

/// Searches the moves of `color` and returns the best one, with the value of every
/// root move at the deepest completed depth.
/// Root moves are searched with a full window so their values are exact, ties
/// are won by the move searched first
pub fn search_root(
    position: &Board,
    color: Color,
    options: &SearchOptions,
    heuristics: Heuristics,
    transposition_table: Option<&mut TranspositionTable>,
    history: &RepetitionHistory,
) -> Search {
    let start = Instant::now();
    let mut result = Search::default();
    let root_moves = generate(position, color);
    if root_moves.is_empty() {
        return result;
    }

    let mut context = SearchContext {
        heuristics,
        perspective: color,
        total_depth: 1,
        transposition_table: if options.use_transposition_table {
            transposition_table
        } else {
            None
        },
        history,
        history_key: history.fingerprint(),
        nodes_searched: 0,
    };

    let first_depth = if options.iterative_deepening {
        1
    } else {
        options.max_depth
    };
    let mut previous_iteration_best_move: Option<Move> = None;
    for depth in first_depth..=options.max_depth {
        context.total_depth = depth;
        let mut iteration_best: Option<(&Move, Score)> = None;
        let mut root_scores = Vec::with_capacity(root_moves.len());

        let moves_iter = root_moves.best_first_iter(&score_moves(
            position,
            heuristics,
            previous_iteration_best_move.as_ref(),
        ));
        for mv in moves_iter {
            let next = simulate(position, mv);
            let score = minimax(
                &next,
                color.opposite(),
                1,
                -Evaluation::INFINITY,
                Evaluation::INFINITY,
                &mut context,
            );
            root_scores.push((mv.clone(), score));
            if iteration_best.map_or(true, |(_, best)| score > best) {
                iteration_best = Some((mv, score));
            }
        }

        if let Some((mv, score)) = iteration_best {
            result.best_move = Some(mv.clone());
            result.score = score;
        }
        result.depth_reached = depth;
        result.root_scores = root_scores;
        result.nodes_searched = context.nodes_searched;
        result.time = start.elapsed();
        log::debug!("info {}", result);

        previous_iteration_best_move = result.best_move.clone();
    }
    result
}

/// Plain minimax with alpha beta pruning, maximizing for the searching side.
/// A position without legal moves gets its static value like a horizon node
fn minimax(
    position: &Board,
    turn: Color,
    ply: u8,
    mut alpha: Score,
    mut beta: Score,
    context: &mut SearchContext,
) -> Score {
    context.nodes_searched += 1;
    let depth_remaining = context.total_depth.saturating_sub(ply);

    // Only entries searched at least as deep as what is left here are usable
    let key = transposition_key(position, turn, context.perspective) ^ context.history_key;
    if let Some(entry) = context
        .transposition_table
        .as_deref()
        .and_then(|tt| tt.probe(key, depth_remaining))
    {
        match entry.bound {
            Bound::Exact => return entry.value,
            Bound::Lower => alpha = alpha.max(entry.value),
            Bound::Upper => beta = beta.min(entry.value),
        }
        if alpha >= beta {
            return entry.value;
        }
    }

    let moves = generate(position, turn);
    if depth_remaining == 0 || moves.is_empty() {
        let value = context.static_eval(position);
        context.store(
            key,
            TranspositionEntry {
                value,
                depth_remaining,
                bound: Bound::Exact,
            },
        );
        return value;
    }

    let maximizing = turn == context.perspective;
    let (window_alpha, window_beta) = (alpha, beta);
    let mut best_score = if maximizing {
        -Evaluation::INFINITY
    } else {
        Evaluation::INFINITY
    };
    let heuristics = context.heuristics;
    for mv in moves.best_first_iter(&score_moves(position, heuristics, None)) {
        let next = simulate(position, mv);
        let score = minimax(&next, turn.opposite(), ply + 1, alpha, beta, context);
        if maximizing {
            best_score = best_score.max(score);
            alpha = alpha.max(score);
        } else {
            best_score = best_score.min(score);
            beta = beta.min(score);
        }
        if beta <= alpha {
            break;
        }
    }

    let bound = if best_score <= window_alpha {
        Bound::Upper
    } else if best_score >= window_beta {
        Bound::Lower
    } else {
        Bound::Exact
    };
    context.store(
        key,
        TranspositionEntry {
            value: best_score,
            depth_remaining,
            bound,
        },
    );
    best_score
}

fn score_moves<'a>(
    board: &'a Board,
    heuristics: Heuristics,
    hash_move: Option<&'a Move>,
) -> impl Fn(&Move) -> Score + 'a {
    move |m| {
        if Some(m) == hash_move {
            Evaluation::INFINITY
        } else {
            heuristics.move_quality(board, m)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color::{Red, White};

    // Reference minimax without pruning, ordering, table or history
    fn reference(board: &Board, turn: Color, perspective: Color, depth: u8, h: Heuristics) -> Score {
        let moves = generate(board, turn);
        if depth == 0 || moves.is_empty() {
            return h.evaluate(board, perspective);
        }
        let scores = moves
            .iter()
            .map(|m| reference(&simulate(board, m), turn.opposite(), perspective, depth - 1, h));
        if turn == perspective {
            scores.max().unwrap_or(0)
        } else {
            scores.min().unwrap_or(0)
        }
    }

    const ENDGAMES: [(&str, Color); 4] = [
        ("8/8/8/2r1r3/8/4W3/8/8", White),
        ("8/2R5/8/8/3w4/8/1w6/8", Red),
        ("8/8/1r1r4/8/3W4/8/5w2/8", White),
        ("3R4/8/8/2w1w3/8/8/8/w7", Red),
    ];

    #[test]
    fn root_scores_match_plain_minimax() {
        for (notation, color) in ENDGAMES {
            let board = Board::new(notation);
            for heuristics in [Heuristics::Medium, Heuristics::Hard] {
                let mut options = SearchOptions::hard();
                options.set_depth(3);
                let mut tt = TranspositionTable::default();
                let search = search_root(
                    &board,
                    color,
                    &options,
                    heuristics,
                    Some(&mut tt),
                    &RepetitionHistory::default(),
                );
                assert_eq!(search.depth_reached, 3);
                assert_eq!(search.root_scores.len(), generate(&board, color).len());
                for (mv, score) in &search.root_scores {
                    let expected =
                        reference(&simulate(&board, mv), color.opposite(), color, 2, heuristics);
                    assert_eq!(*score, expected, "{} {} {}", notation, mv, score);
                }
            }
        }
    }

    #[test]
    fn best_move_has_the_best_root_score() {
        for (notation, color) in ENDGAMES {
            let board = Board::new(notation);
            let mut tt = TranspositionTable::default();
            let search = search_root(
                &board,
                color,
                &SearchOptions::hard().set_depth(5).clone(),
                Heuristics::Hard,
                Some(&mut tt),
                &RepetitionHistory::default(),
            );
            let best = search.root_scores.iter().map(|(_, s)| *s).max();
            assert_eq!(Some(search.score), best);
            // The first move reaching that score is the one picked
            let first_best = search
                .root_scores
                .iter()
                .find(|(_, s)| Some(*s) == best)
                .map(|(m, _)| m.clone());
            assert_eq!(search.best_move, first_best);
        }
    }

    #[test]
    fn stale_entries_do_not_cut_deeper_searches() {
        let board = Board::new(ENDGAMES[0].0);
        let mut options = SearchOptions::hard();
        options.set_depth(4);
        let fresh = search_root(
            &board,
            White,
            &options,
            Heuristics::Hard,
            Some(&mut TranspositionTable::default()),
            &RepetitionHistory::default(),
        );

        // Poison every position one ply away with a shallow, absurd value
        let mut poisoned = TranspositionTable::default();
        for mv in &generate(&board, White) {
            poisoned.set(
                transposition_key(&simulate(&board, mv), Red, White),
                TranspositionEntry {
                    value: 10_000,
                    depth_remaining: 1,
                    bound: Bound::Exact,
                },
            );
        }
        let searched = search_root(
            &board,
            White,
            &options,
            Heuristics::Hard,
            Some(&mut poisoned),
            &RepetitionHistory::default(),
        );

        let mut expected = fresh.root_scores.clone();
        let mut actual = searched.root_scores.clone();
        expected.sort_by_key(|(m, _)| (m.from, m.to));
        actual.sort_by_key(|(m, _)| (m.from, m.to));
        assert_eq!(actual, expected);
        assert!(actual.iter().all(|(_, s)| *s < 10_000));
    }

    #[test]
    fn deep_enough_entries_are_used() {
        let board = Board::new(ENDGAMES[0].0);
        let mut options = SearchOptions::hard();
        options.set_depth(2).set_iterative_deepening(false);
        let mut tt = TranspositionTable::default();
        for mv in &generate(&board, White) {
            tt.set(
                transposition_key(&simulate(&board, mv), Red, White),
                TranspositionEntry {
                    value: 10_000,
                    depth_remaining: 1,
                    bound: Bound::Exact,
                },
            );
        }
        let search = search_root(
            &board,
            White,
            &options,
            Heuristics::Hard,
            Some(&mut tt),
            &RepetitionHistory::default(),
        );
        assert!(search.root_scores.iter().all(|(_, s)| *s == 10_000));
    }

    #[test]
    fn repetitions_are_penalized() {
        let board = Board::new("8/8/8/8/8/8/8/W6r");
        let mut options = SearchOptions::medium();
        options.set_depth(1);
        let plain = search_root(
            &board,
            White,
            &options,
            Heuristics::Medium,
            None,
            &RepetitionHistory::default(),
        );

        let mut history = RepetitionHistory::default();
        let (repeated, _) = plain.root_scores[0].clone();
        history.record(simulate(&board, &repeated).get_hash());
        let penalized = search_root(&board, White, &options, Heuristics::Medium, None, &history);
        let score_of = |s: &Search, m: &Move| {
            s.root_scores
                .iter()
                .find(|(mv, _)| mv == m)
                .map(|(_, score)| *score)
        };
        assert_eq!(
            score_of(&penalized, &repeated),
            score_of(&plain, &repeated).map(|s| s - 6)
        );
    }

    #[test]
    fn warm_tables_do_not_hide_repetitions() {
        let board = Board::new("8/8/8/8/8/8/8/W6r");
        let mut options = SearchOptions::hard();
        options.set_depth(1).set_iterative_deepening(false);
        let mut warm = TranspositionTable::default();
        let plain = search_root(
            &board,
            White,
            &options,
            Heuristics::Hard,
            Some(&mut warm),
            &RepetitionHistory::default(),
        );

        let mut history = RepetitionHistory::default();
        let (repeated, _) = plain.root_scores[0].clone();
        history.record(simulate(&board, &repeated).get_hash());
        let again = search_root(&board, White, &options, Heuristics::Hard, Some(&mut warm), &history);
        let fresh = search_root(
            &board,
            White,
            &options,
            Heuristics::Hard,
            Some(&mut TranspositionTable::default()),
            &history,
        );

        let score_of = |s: &Search, m: &Move| {
            s.root_scores
                .iter()
                .find(|(mv, _)| mv == m)
                .map(|(_, score)| *score)
        };
        assert_eq!(score_of(&again, &repeated), score_of(&fresh, &repeated));
        assert_eq!(
            score_of(&again, &repeated),
            score_of(&plain, &repeated).map(|s| s - 12)
        );
    }

    #[test]
    fn no_moves_means_no_result() {
        let board = Board::new("8/8/8/8/8/2r5/1r6/w7");
        let search = search_root(
            &board,
            White,
            &SearchOptions::default(),
            Heuristics::Hard,
            None,
            &RepetitionHistory::default(),
        );
        assert!(search.best_move.is_none());
        assert!(search.root_scores.is_empty());
    }
}
