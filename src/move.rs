use crate::square::{self, col_of, row_of, square_representation, Square};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A full checkers move. Capture chains are a single move: `path` holds the
/// intermediate landing squares (the final one is `to`), and `captured` holds
/// one square per jump, in jump order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Square>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captured: Vec<Square>,
}

impl Move {
    pub fn new_quiet(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            path: vec![],
            captured: vec![],
        }
    }

    pub fn new_capture(from: Square, to: Square, path: Vec<Square>, captured: Vec<Square>) -> Move {
        debug_assert_eq!(path.len() + 1, captured.len());
        Move {
            from,
            to,
            path,
            captured,
        }
    }

    pub fn from_row(&self) -> usize {
        row_of(self.from)
    }
    pub fn from_col(&self) -> usize {
        col_of(self.from)
    }
    pub fn to_row(&self) -> usize {
        row_of(self.to)
    }
    pub fn to_col(&self) -> usize {
        col_of(self.to)
    }

    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    /// Every square the piece lands on, in order, ending with `to`
    pub fn landings(&self) -> impl Iterator<Item = Square> + '_ {
        self.path.iter().copied().chain(std::iter::once(self.to))
    }

    /// Parses a move written as `c3-d4` or `c3xe5xg7`.
    /// Since the captured squares can't be given, a chain only carries its landings;
    /// the exact move has to be looked up in the legal move list
    /// ```
    /// use dama::r#move::Move;
    /// let mv = Move::parse("c3xe5xg7").unwrap();
    /// assert_eq!((mv.from, mv.to, mv.path), (18, 54, vec![36]));
    /// assert!(Move::parse("c3").is_none());
    /// ```
    pub fn parse(mv: &str) -> Option<Move> {
        let squares = mv
            .split(&['-', 'x'][..])
            .map(|s| {
                if s.len() == 2 {
                    square::parse_square(s)
                } else {
                    None
                }
            })
            .collect::<Option<Vec<Square>>>()?;
        if squares.len() < 2 {
            return None;
        }
        let from = squares[0];
        let to = squares[squares.len() - 1];
        Some(Move {
            from,
            to,
            path: squares[1..squares.len() - 1].to_vec(),
            captured: vec![],
        })
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let repr = |sq| square_representation(sq).unwrap_or_else(|| String::from("**"));
        if self.is_capture() {
            write!(f, "{}", repr(self.from))?;
            for sq in self.landings() {
                write!(f, "x{}", repr(sq))?;
            }
            Ok(())
        } else {
            write!(f, "{}-{}", repr(self.from), repr(self.to))
        }
    }
}
