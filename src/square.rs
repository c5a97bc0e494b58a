pub type Square = usize;

pub const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub fn row_of(sq: Square) -> usize {
    sq / 8
}
pub fn col_of(sq: Square) -> usize {
    sq % 8
}
pub fn square_at(row: usize, col: usize) -> Square {
    row * 8 + col
}

/// Steps `distance` times in direction `(dr, dc)` from a square, returning
/// None when falling off the board
/// ```
/// use dama::square::offset;
/// assert_eq!(offset(0, (1, 1), 2), Some(18));
/// assert_eq!(offset(7, (1, 1), 1), None);
/// ```
pub fn offset(sq: Square, (dr, dc): (isize, isize), distance: isize) -> Option<Square> {
    let row = row_of(sq) as isize + dr * distance;
    let col = col_of(sq) as isize + dc * distance;
    if (0..8).contains(&row) && (0..8).contains(&col) {
        Some(square_at(row as usize, col as usize))
    } else {
        None
    }
}

/// Parses a square from a given string slice,
/// only caring that the first two characters form a valid square representation.
/// The file is the column, the rank is the row plus one
/// ```
/// use dama::square::parse_square;
/// assert_eq!(parse_square("c3"), Some(18));
/// assert_eq!(parse_square("b6-a7"), Some(41));
/// assert_eq!(parse_square("k9"), None);
/// ```
pub fn parse_square(s: &str) -> Option<Square> {
    let mut chars_iter = s.chars();
    let col = match chars_iter.next() {
        Some(c @ 'a'..='h') => c as usize - 'a' as usize,
        _ => return None,
    };
    let row = match chars_iter.next() {
        Some(c) => match c.to_digit(10) {
            Some(i) if i <= 8 && i > 0 => i as usize - 1,
            _ => return None,
        },
        _ => return None,
    };
    Some(square_at(row, col))
}

/// Returns the string representation of a square
/// ```
/// use dama::square::square_representation;
/// assert_eq!(square_representation(18), Some(String::from("c3")));
/// assert_eq!(square_representation(65), None);
/// ```
pub fn square_representation(sq: Square) -> Option<String> {
    let rank = ('1'..='8').nth(row_of(sq))?;
    let file = ('a'..='h').nth(col_of(sq))?;
    let mut repr = file.to_string();
    repr.push(rank);
    Some(repr)
}

/// Only dark squares, where `row + col` is odd, ever hold a piece
pub fn is_dark(sq: Square) -> bool {
    (row_of(sq) + col_of(sq)) % 2 == 1
}
