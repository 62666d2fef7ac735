//! Gomoku rules: stone placement without captures and five-in-a-row detection.
//!
//! Gomoku moves are recorded in [`Board::moves`], so any sequence of them can
//! be taken back with [`undo_move`](crate::position::undo_move). Passing is
//! not allowed.

use crate::constants::{PASS_MOVE, WIN_LENGTH};
use crate::position::{Board, BoardError, Cell, Color, Point, empty_points};

/// Signed steps along the four line directions: horizontal, vertical, and
/// the two diagonals.
#[inline]
pub fn directions(board: &Board) -> [isize; 4] {
    let ns = board.ns as isize;
    [1, ns, ns + 1, ns - 1]
}

/// A Gomoku move is legal on any empty point.
pub fn is_legal_gomoku(board: &Board, pt: Point, _color: Color) -> bool {
    pt != PASS_MOVE && board.get_color(pt) == Cell::Empty
}

/// Play a Gomoku move of `color` at `pt` and append it to the history.
///
/// # Errors
/// [`BoardError::IllegalMove`] for a pass or an occupied point.
pub fn play_move_gomoku(board: &mut Board, pt: Point, color: Color) -> Result<(), BoardError> {
    if !is_legal_gomoku(board, pt, color) {
        return Err(BoardError::IllegalMove(pt));
    }
    board.color[pt] = color.into();
    board.moves.push(pt);
    board.last = Some(pt);
    board.current_player = color.opponent();
    Ok(())
}

/// Legal Gomoku moves: every empty point.
#[inline]
pub fn legal_moves(board: &Board) -> Vec<Point> {
    empty_points(board)
}

/// Does the stone on `pt` complete five in a row along `shift`?
///
/// Counting stops at five, so longer lines also qualify.
fn connects_five(board: &Board, pt: Point, shift: isize) -> bool {
    let color = board.color[pt];
    let mut count = 1;
    for d in [shift, -shift] {
        let mut p = pt as isize;
        while count < WIN_LENGTH {
            p += d;
            if board.cell_at(p) != color {
                break;
            }
            count += 1;
        }
    }
    count == WIN_LENGTH
}

/// Does the stone on `pt` belong to five in a row in any direction?
///
/// Always `false` for a point without a stone.
pub fn point_check_game_end(board: &Board, pt: Point) -> bool {
    board.get_color(pt).stone().is_some()
        && directions(board)
            .into_iter()
            .any(|shift| connects_five(board, pt, shift))
}

/// The winner, if either color has five in a row.
///
/// White stones are scanned before black ones, so if both colors had a
/// line (impossible under alternating play) White is reported.
pub fn check_game_end(board: &Board) -> Option<Color> {
    [Color::White, Color::Black].into_iter().find(|&color| {
        let cell = Cell::from(color);
        (0..board.max_point())
            .filter(|&pt| board.color[pt] == cell)
            .any(|pt| point_check_game_end(board, pt))
    })
}

/// Has someone won?
#[inline]
pub fn end_of_game(board: &Board) -> bool {
    check_game_end(board).is_some()
}
