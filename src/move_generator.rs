use crate::{
    board::Board,
    movelist::MoveList,
    piece::{Color, Piece},
    r#move::Move,
    square::{offset, Square, DIAGONALS},
};

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub enum GenType {
    Legal,
    Captures,
}

/// Generates every legal move of `color`.
/// Captures are forced: if any piece can capture, only capture chains are returned
pub fn generate(board: &Board, color: Color) -> MoveList {
    generate_type(board, color, GenType::Legal)
}

/// Generates a subset of all legal moves for a given position
pub fn generate_type(board: &Board, color: Color, gen_type: GenType) -> MoveList {
    let mut move_list = MoveList::default();
    for (sq, piece) in board.pieces_of(color) {
        capture_chains(board, sq, piece, &mut move_list);
    }
    if !move_list.is_empty() || gen_type == GenType::Captures {
        return move_list;
    }

    for (sq, piece) in board.pieces_of(color) {
        for dir in directions(piece) {
            match offset(sq, dir, 1) {
                Some(target) if board.is_empty_square(target) => {
                    move_list.push(Move::new_quiet(sq, target))
                }
                _ => (),
            }
        }
    }
    move_list
}

// Men only go forward, captures included
fn directions(piece: Piece) -> impl Iterator<Item = (isize, isize)> {
    DIAGONALS
        .into_iter()
        .filter(move |(dr, _)| piece.is_king || *dr == piece.color.forward())
}

/// Adds the longest capture chains starting from `origin`. Shorter chains of the
/// same piece are dropped, chains of other pieces are not compared
fn capture_chains(board: &Board, origin: Square, piece: Piece, move_list: &mut MoveList) {
    let mut chains = vec![];
    follow_chain(
        board,
        origin,
        origin,
        piece,
        &mut vec![],
        &mut vec![],
        &mut chains,
    );

    let longest = chains.iter().map(|m| m.captured.len()).max().unwrap_or(0);
    move_list.extend(chains.into_iter().filter(|m| m.captured.len() == longest));
}

// Jumped pieces stay on the board until the chain is played, so they still block
// landings, and `captured` keeps them from being jumped twice
fn follow_chain(
    board: &Board,
    origin: Square,
    current: Square,
    piece: Piece,
    landings: &mut Vec<Square>,
    captured: &mut Vec<Square>,
    chains: &mut Vec<Move>,
) {
    let mut extended = false;
    for dir in directions(piece) {
        let (over, landing) = match (offset(current, dir, 1), offset(current, dir, 2)) {
            (Some(over), Some(landing)) => (over, landing),
            _ => continue,
        };
        let opposing = matches!(board.piece_on(over), Some(p) if p.color != piece.color);
        if !opposing || !board.is_empty_square(landing) || captured.contains(&over) {
            continue;
        }

        extended = true;
        captured.push(over);
        landings.push(landing);
        follow_chain(board, origin, landing, piece, landings, captured, chains);
        landings.pop();
        captured.pop();
    }

    if !extended {
        if let Some((&to, path)) = landings.split_last() {
            chains.push(Move::new_capture(
                origin,
                to,
                path.to_vec(),
                captured.clone(),
            ))
        }
    }
}
