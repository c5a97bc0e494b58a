use crate::piece::Color::{Red, White};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub is_king: bool,
}

/// Red starts on rows 0-2 and moves towards row 7, White starts on rows 5-7
/// and moves towards row 0
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Red,
    White,
}
impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Red => White,
            White => Red,
        }
    }

    /// Row direction a man of this color moves in
    pub fn forward(&self) -> isize {
        match self {
            Red => 1,
            White => -1,
        }
    }

    /// Row on which a man of this color gets crowned
    pub fn promotion_row(&self) -> usize {
        match self {
            Red => 7,
            White => 0,
        }
    }

    pub fn home_row(&self) -> usize {
        self.opposite().promotion_row()
    }

    pub fn parse(s: &str) -> Option<Color> {
        match s.to_lowercase().as_str() {
            "red" | "r" => Some(Red),
            "white" | "w" => Some(White),
            _ => None,
        }
    }
}
impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self == &Red { "red" } else { "white" })
    }
}

impl Piece {
    pub fn man(color: Color) -> Piece {
        Piece {
            color,
            is_king: false,
        }
    }

    pub fn king(color: Color) -> Piece {
        Piece {
            color,
            is_king: true,
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let color = match c.to_lowercase().next().unwrap_or('_') {
            'r' => Red,
            'w' => White,
            _ => return None,
        };
        Some(Piece {
            color,
            is_king: c.is_uppercase(),
        })
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = if self.color == Red { "r" } else { "w" };
        write!(
            f,
            "{}",
            if self.is_king {
                s.to_uppercase()
            } else {
                s.to_string()
            }
        )
    }
}
