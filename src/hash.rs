use crate::board::Board;
use crate::piece::{Color, Piece};
use crate::square::{col_of, row_of, Square};

pub type Hash = u64;

/// Polynomial position hash, used for transposition keys and repetition
/// detection only. Collisions are possible and simply cost search quality
pub struct BoardHasher {}
impl BoardHasher {
    const SEED: Hash = 17;
    const FACTOR: Hash = 31;

    pub fn hash(board: &Board) -> Hash {
        board.occupied().fold(Self::SEED, |h, (sq, piece)| {
            h.wrapping_mul(Self::FACTOR)
                .wrapping_add(Self::piece_value(piece, sq))
        })
    }

    pub fn piece_value(piece: Piece, sq: Square) -> Hash {
        let color: Hash = match piece.color {
            Color::Red => 0,
            Color::White => 1,
        };
        (color << 16) | ((piece.is_king as Hash) << 8) | ((row_of(sq) as Hash) << 4) | col_of(sq) as Hash
    }

    /// Mixes the side to move and the searching side into a board hash, so that the
    /// same placement seen with a different mover gets its own key
    pub fn with_sides(hash: Hash, to_move: Color, perspective: Color) -> Hash {
        let sides = match (to_move, perspective) {
            (Color::Red, Color::Red) => 0x9e37_79b9_7f4a_7c15,
            (Color::Red, Color::White) => 0xc2b2_ae3d_27d4_eb4f,
            (Color::White, Color::Red) => 0x1656_67b1_9e37_79f9,
            (Color::White, Color::White) => 0x27d4_eb2f_1656_67c5,
        };
        hash ^ sides
    }
}
