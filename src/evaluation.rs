use crate::board::Board;
use crate::piece::{Color, Piece};
use crate::r#move::Move;
use crate::square::{col_of, row_of, Square};

pub type Score = i32;

/// Hand written heuristics, one set per searching bot
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Heuristics {
    Medium,
    Hard,
}

pub struct Evaluation {}
impl Evaluation {
    pub const INFINITY: Score = i32::MAX / 2;

    pub const MEDIUM_PIECE_VALUE: [Score; 2] = [2, 5];
    pub const HARD_PIECE_VALUE: [Score; 2] = [3, 10];
    pub const HARD_MATERIAL_WEIGHT: Score = 5;
    pub const HARD_KING_WEIGHT: Score = 8;

    /// Rows a man has moved away from its home row
    pub fn advancement(piece: Piece, sq: Square) -> Score {
        (row_of(sq) as Score - piece.color.home_row() as Score).abs()
    }

    pub fn in_center(sq: Square) -> bool {
        (2..=5).contains(&row_of(sq)) && (2..=5).contains(&col_of(sq))
    }

    fn center_distance(sq: Square) -> Score {
        (row_of(sq) as Score - 3).abs() + (col_of(sq) as Score - 3).abs()
    }

    fn on_edge_row(sq: Square) -> bool {
        row_of(sq) == 0 || row_of(sq) == 7
    }

    fn on_edge_col(sq: Square) -> bool {
        col_of(sq) == 0 || col_of(sq) == 7
    }
}

impl Heuristics {
    /// Static evaluation of a position from `perspective`'s point of view
    pub fn evaluate(&self, board: &Board, perspective: Color) -> Score {
        match self {
            Heuristics::Medium => Self::medium_eval(board, perspective),
            Heuristics::Hard => Self::hard_eval(board, perspective),
        }
    }

    fn medium_eval(board: &Board, perspective: Color) -> Score {
        board.occupied().fold(0, |acc, (sq, piece)| {
            let mut value = Evaluation::MEDIUM_PIECE_VALUE[piece.is_king as usize];
            if Evaluation::in_center(sq) {
                value += 1
            }
            if !piece.is_king {
                value += Evaluation::advancement(piece, sq) / 2
            }
            if piece.color == perspective {
                acc + value
            } else {
                acc - value
            }
        })
    }

    fn hard_eval(board: &Board, perspective: Color) -> Score {
        let mut positional = 0;
        let (mut material, mut kings) = (0, 0);
        for (sq, piece) in board.occupied() {
            let mut value = Evaluation::HARD_PIECE_VALUE[piece.is_king as usize];
            if Evaluation::in_center(sq) {
                value += if piece.is_king { 2 } else { 1 }
            }
            if !piece.is_king {
                value += Evaluation::advancement(piece, sq) / 2;
                if Evaluation::on_edge_col(sq) {
                    value += 1
                }
                if row_of(sq) == piece.color.home_row() {
                    value += 2
                }
            }

            let sign = if piece.color == perspective { 1 } else { -1 };
            positional += sign * value;
            material += sign;
            if piece.is_king {
                kings += sign
            }
        }
        positional + material * Evaluation::HARD_MATERIAL_WEIGHT + kings * Evaluation::HARD_KING_WEIGHT
    }

    /// Cheap guess of how good a move is, used to search promising moves first
    pub fn move_quality(&self, board: &Board, mv: &Move) -> Score {
        let (captured_man, captured_king, promotion) = match self {
            Heuristics::Medium => (20, 50, 25),
            Heuristics::Hard => (50, 100, 40),
        };
        let mut score = mv
            .captured
            .iter()
            .filter_map(|&sq| board.piece_on(sq))
            .map(|p| if p.is_king { captured_king } else { captured_man })
            .sum::<Score>();
        if Evaluation::on_edge_row(mv.to) {
            score += promotion
        }

        let center_distance = Evaluation::center_distance(mv.to);
        let piece = board.piece_on(mv.from);
        match self {
            Heuristics::Medium => {
                score += 6 - center_distance;
                if let Some(p) = piece.filter(|p| !p.is_king) {
                    let advancement = Self::rows_forward(p, mv);
                    if advancement > 0 {
                        score += advancement * 3
                    }
                }
                if Evaluation::on_edge_row(mv.to) || Evaluation::on_edge_col(mv.to) {
                    score += 2
                }
            }
            Heuristics::Hard => match piece {
                Some(p) if p.is_king => score += 8 - center_distance,
                Some(p) => {
                    score += 6 - center_distance;
                    score += Self::rows_forward(p, mv) * 5;
                    if Evaluation::on_edge_row(mv.to) {
                        score += 3
                    }
                }
                None => (),
            },
        }
        score
    }

    fn rows_forward(piece: Piece, mv: &Move) -> Score {
        (mv.to_row() as Score - mv.from_row() as Score) * piece.color.forward() as Score
    }

    /// Penalty for reaching a position seen `distance` entries ago in a history
    /// of `history_length` boards, the most recent one being at distance 0
    pub fn repetition_penalty(&self, distance: usize, history_length: usize) -> Score {
        let weight = history_length as Score - distance as Score;
        match self {
            Heuristics::Medium => weight.max(1),
            Heuristics::Hard => weight * 2,
        }
    }
}
