use crate::error::GameError;
use crate::hash::{BoardHasher, Hash};
use crate::piece::Color::{Red, White};
use crate::piece::{Color, Piece};
use crate::square::{col_of, is_dark, row_of, square_at, Square};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const STARTING_POSITION: &str = "1r1r1r1r/r1r1r1r1/1r1r1r1r/8/8/w1w1w1w1/1w1w1w1w/w1w1w1w1";

/// An 8x8 grid of optional pieces, indexed by `grid[row][col]`.
/// The board carries no game state (turn, counters), those live in the game record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Creates a new board given its notation, panicking on malformed input.
    /// Use `str::parse` to handle errors
    pub fn new(notation: &str) -> Board {
        notation
            .parse()
            .unwrap_or_else(|e| panic!("invalid board notation {}: {}", notation, e))
    }

    pub fn empty() -> Board {
        Board::default()
    }

    /// Three rows of men per side, on the dark squares
    pub fn starting() -> Board {
        let mut b = Board::empty();
        for sq in (0..64).filter(|&sq| is_dark(sq)) {
            match row_of(sq) {
                0..=2 => b.set_piece(sq, Piece::man(Red)),
                5..=7 => b.set_piece(sq, Piece::man(White)),
                _ => (),
            }
        }
        b
    }

    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.grid[row_of(sq)][col_of(sq)]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Piece> {
        self.grid[row][col]
    }

    pub fn set_piece(&mut self, sq: Square, piece: Piece) {
        self.grid[row_of(sq)][col_of(sq)] = Some(piece)
    }

    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        self.grid[row_of(sq)][col_of(sq)].take()
    }

    pub fn crown(&mut self, sq: Square) {
        if let Some(piece) = &mut self.grid[row_of(sq)][col_of(sq)] {
            piece.is_king = true
        }
    }

    pub fn is_empty_square(&self, sq: Square) -> bool {
        self.piece_on(sq).is_none()
    }

    /// Iterates over occupied squares, row by row
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        (0..64).filter_map(move |sq| self.piece_on(sq).map(|p| (sq, p)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, p)| p.color == color)
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces_of(color).count()
    }

    pub fn has_pieces(&self, color: Color) -> bool {
        self.pieces_of(color).next().is_some()
    }

    pub fn get_hash(&self) -> Hash {
        BoardHasher::hash(self)
    }

    /// Canonical text form: rows from 0 to 7 separated by '/', digits for runs of
    /// empty squares, r/w for men and R/W for kings
    pub fn notation(&self) -> String {
        let mut s = String::with_capacity(72);
        for row in 0..8 {
            let mut empty = 0;
            for col in 0..8 {
                match self.grid[row][col] {
                    Some(p) => {
                        if empty != 0 {
                            s.push_str(&empty.to_string());
                            empty = 0;
                        }
                        s.push_str(&p.to_string())
                    }
                    None => empty += 1,
                }
            }
            if empty != 0 {
                s.push_str(&empty.to_string())
            }
            if row != 7 {
                s.push('/')
            }
        }
        s
    }
}

impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |reason: &str| GameError::BadNotation(format!("{} ({})", s, reason));
        let rows: Vec<&str> = s.trim().split('/').collect();
        if rows.len() != 8 {
            return Err(bad("expected 8 rows"));
        }

        let mut board = Board::empty();
        for (row, row_str) in rows.iter().enumerate() {
            let mut col = 0;
            for c in row_str.chars() {
                if let Some(d) = c.to_digit(10) {
                    col += d as usize;
                } else if let Some(p) = Piece::from_char(c) {
                    if col >= 8 {
                        return Err(bad("row overflow"));
                    }
                    board.set_piece(square_at(row, col), p);
                    col += 1;
                } else {
                    return Err(bad("unknown piece"));
                }
            }
            if col != 8 {
                return Err(bad("row does not have 8 squares"));
            }
        }
        Ok(board)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = String::new();
        for row in (0..8).rev() {
            s.push_str(&format!("{}  ", row + 1));
            for col in 0..8 {
                match self.grid[row][col] {
                    Some(p) => s.push_str(&format!("{} ", p)),
                    None if is_dark(square_at(row, col)) => s.push_str(". "),
                    None => s.push_str("  "),
                }
            }
            s.push('\n');
        }
        s.push_str("\n   a b c d e f g h\n");
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_matches_notation() {
        let b = Board::starting();
        assert_eq!(b, Board::new(STARTING_POSITION));
        assert_eq!(b.notation(), STARTING_POSITION);
        assert_eq!(b.count(Red), 12);
        assert_eq!(b.count(White), 12);
        assert_eq!(b.piece_on(square_at(0, 1)), Some(Piece::man(Red)));
        assert_eq!(b.piece_on(square_at(7, 0)), Some(Piece::man(White)));
        assert!(b.occupied().all(|(sq, _)| is_dark(sq)));
    }

    #[test]
    fn notation_keeps_kings() {
        let notation = "8/8/3W4/8/8/2r5/8/R7";
        let b: Board = notation.parse().unwrap();
        assert_eq!(b.get(2, 3), Some(Piece::king(White)));
        assert_eq!(b.get(5, 2), Some(Piece::man(Red)));
        assert_eq!(b.get(7, 0), Some(Piece::king(Red)));
        assert_eq!(b.notation(), notation);
    }

    #[test]
    fn malformed_notation_is_rejected() {
        assert!("8/8/8".parse::<Board>().is_err());
        assert!("9/8/8/8/8/8/8/8".parse::<Board>().is_err());
        assert!("8/8/8/8/8/8/8/7x".parse::<Board>().is_err());
        assert!("8/8/8/8/8/8/8/rrrrrrrrr".parse::<Board>().is_err());
    }

    #[test]
    fn serde_round_trip_is_lossless() {
        let b = Board::new("1r1r1r1r/r1r1r1r1/8/8/4R3/w1w1w1w1/1w1w1W1w/8");
        let json = serde_json::to_string(&b).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
        assert_eq!(b.get_hash(), back.get_hash());
    }
}
