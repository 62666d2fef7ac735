//! Directional shape predicates for Gomoku.
//!
//! Every predicate looks at a candidate point, a color and a signed step along
//! one of the four line directions (see [`directions`]), and inspects cells at
//! fixed offsets `point + k * step`. In the shape diagrams below `P` is the
//! candidate point, `O` a stone of the given color and `_` an empty cell.
//!
//! Some predicates count runs by temporarily placing a stone on `P`. The cell
//! is always restored before returning.
//!
//! [`tactical_candidates`] combines the predicates into a move filter used by
//! the front end before handing moves to the search.

use crate::gomoku::directions;
use crate::position::{Board, Cell, Color, Point, empty_points};

/// Run `f` with a `color` stone temporarily on `pt`.
fn with_stone<T>(board: &mut Board, pt: Point, color: Color, f: impl FnOnce(&Board) -> T) -> T {
    let saved = board.color[pt];
    board.color[pt] = color.into();
    let result = f(board);
    board.color[pt] = saved;
    result
}

/// Cell at `pt + k * step`.
#[inline]
fn at(board: &Board, pt: Point, k: isize, step: isize) -> Cell {
    board.cell_at(pt as isize + k * step)
}

/// Number of consecutive cells past `pt` along `step` matching the cell on `pt`.
fn run_length(board: &Board, pt: Point, step: isize) -> usize {
    let own = board.get_color(pt);
    let mut count = 0;
    while count < board.max_point() && at(board, pt, count as isize + 1, step) == own {
        count += 1;
    }
    count
}

/// The first cell past the run starting at `pt` along `step`.
fn cell_after_run(board: &Board, pt: Point, step: isize) -> Cell {
    at(board, pt, run_length(board, pt, step) as isize + 1, step)
}

/// Stones of `color` on both sides of `pt` along `step` if it were played.
fn line_total(board: &Board, pt: Point, step: isize) -> usize {
    run_length(board, pt, step) + run_length(board, pt, -step)
}

/// Playing `pt` makes five or more in a row along `step`.
pub fn five_in_row(board: &mut Board, pt: Point, color: Color, step: isize) -> bool {
    with_stone(board, pt, color, |b| line_total(b, pt, step) >= 4)
}

/// Playing `pt` makes exactly four in a row with both ends empty: `_OOPO_`.
pub fn open_four_a(board: &mut Board, pt: Point, color: Color, step: isize) -> bool {
    with_stone(board, pt, color, |b| {
        line_total(b, pt, step) == 3
            && cell_after_run(b, pt, step) == Cell::Empty
            && cell_after_run(b, pt, -step) == Cell::Empty
    })
}

/// Gapped shape ahead of `pt`: `P O O _ O _`.
pub fn open_four_b(board: &Board, pt: Point, color: Color, step: isize) -> bool {
    let own = Cell::from(color);
    at(board, pt, 1, step) == own
        && at(board, pt, 2, step) == own
        && at(board, pt, 3, step) == Cell::Empty
        && at(board, pt, 4, step) == own
        && at(board, pt, 5, step) == Cell::Empty
}

/// Gapped shape behind `pt`: `_ O O _ O P`.
pub fn open_four_c(board: &Board, pt: Point, color: Color, step: isize) -> bool {
    let own = Cell::from(color);
    at(board, pt, -1, step) == own
        && at(board, pt, -2, step) == Cell::Empty
        && at(board, pt, -3, step) == own
        && at(board, pt, -4, step) == own
        && at(board, pt, -5, step) == Cell::Empty
}

/// Playing `pt` creates an open four along the axis of `step`.
pub fn open_four(board: &mut Board, pt: Point, color: Color, step: isize) -> bool {
    open_four_a(board, pt, color, step)
        || open_four_b(board, pt, color, step)
        || open_four_b(board, pt, color, -step)
        || open_four_c(board, pt, color, step)
        || open_four_c(board, pt, color, -step)
}

/// An open four through `pt`, or three stones next to `pt` that are closed
/// on the `pt` side and open two cells on the far side:
/// `X P O O O _ _` (and mirrored), where `X` is anything but empty.
pub fn block_open_four_a(board: &mut Board, pt: Point, color: Color, step: isize) -> bool {
    if open_four_a(board, pt, color, step) {
        return true;
    }
    let own = Cell::from(color);
    let c = |k: isize| at(board, pt, k, step);
    let forward = c(-1) != Cell::Empty
        && c(1) == own
        && c(2) == own
        && c(3) == own
        && c(4) == Cell::Empty
        && c(5) == Cell::Empty;
    let backward = c(1) != Cell::Empty
        && c(-1) == own
        && c(-2) == own
        && c(-3) == own
        && c(-4) == Cell::Empty
        && c(-5) == Cell::Empty;
    forward || backward
}

/// Points that stop `color` from building an open four along `step`.
///
/// Checks the neighbor on each side of `pt` (when empty, and closed five
/// cells further out), then `pt` itself, then the gapped shapes.
pub fn block_open_four(board: &mut Board, pt: Point, color: Color, step: isize) -> bool {
    for side in [step, -step] {
        let neighbor = pt as isize + side;
        if board.cell_at(neighbor) != Cell::Empty {
            continue;
        }
        let neighbor = neighbor as Point;
        if block_open_four_a(board, neighbor, color, step)
            && board.cell_at(neighbor as isize + 5 * side) != Cell::Empty
        {
            return true;
        }
    }
    block_open_four_a(board, pt, color, step)
        || open_four_b(board, pt, color, step)
        || open_four_b(board, pt, color, -step)
        || open_four_c(board, pt, color, step)
        || open_four_c(board, pt, color, -step)
}

/// Playing `pt` makes an open three: `_ P O O _`, `_ O O P _`, or `_ O P O _`.
pub fn open_three(board: &Board, pt: Point, color: Color, step: isize) -> bool {
    let own = Cell::from(color);
    let c = |k: isize| at(board, pt, k, step);
    (c(-1) == Cell::Empty && c(3) == Cell::Empty && c(1) == own && c(2) == own)
        || (c(1) == Cell::Empty && c(-3) == Cell::Empty && c(-1) == own && c(-2) == own)
        || (c(-2) == Cell::Empty && c(2) == Cell::Empty && c(-1) == own && c(1) == own)
}

/// Playing `pt` makes exactly four in a row open at one end only.
pub fn dead_four(board: &mut Board, pt: Point, color: Color, step: isize) -> bool {
    with_stone(board, pt, color, |b| {
        if line_total(b, pt, step) != 3 {
            return false;
        }
        let ahead = cell_after_run(b, pt, step) == Cell::Empty;
        let behind = cell_after_run(b, pt, -step) == Cell::Empty;
        ahead != behind
    })
}

/// Empty points among the eight neighbors of `pt`, in ascending order.
pub fn straight_opening(board: &Board, pt: Point) -> Vec<Point> {
    let ns = board.ns as isize;
    let mut points: Vec<Point> = [-ns - 1, -ns, -ns + 1, -1, 1, ns - 1, ns, ns + 1]
        .into_iter()
        .map(|d| pt as isize + d)
        .filter(|&p| board.cell_at(p) == Cell::Empty)
        .map(|p| p as Point)
        .collect();
    points.sort_unstable();
    points
}

/// Which rule produced a candidate list, strongest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tactic {
    /// Completes five for the player to move
    Win,
    /// Stops the opponent completing five
    BlockWin,
    /// Makes an open four
    OpenFour,
    /// Stops the opponent's open four
    BlockOpenFour,
    /// Makes a closed four or an open three
    Threat,
    /// No shape found; every empty point
    Random,
}

/// Candidate moves for `color` filtered by the strongest applicable tactic.
///
/// Each tier scans all empty points over the four line directions and the
/// first tier with any match wins. The board is unchanged on return.
pub fn tactical_candidates(board: &mut Board, color: Color) -> (Tactic, Vec<Point>) {
    let opp = color.opponent();
    let empties = empty_points(board);
    let steps = directions(board);

    type Rule = fn(&mut Board, Point, Color, isize) -> bool;
    let tiers: [(Tactic, Color, Rule); 5] = [
        (Tactic::Win, color, five_in_row),
        (Tactic::BlockWin, opp, five_in_row),
        (Tactic::OpenFour, color, open_four),
        (Tactic::BlockOpenFour, opp, block_open_four),
        (Tactic::Threat, color, |b, pt, c, step| {
            dead_four(b, pt, c, step) || open_three(b, pt, c, step)
        }),
    ];

    for (tactic, who, rule) in tiers {
        let moves: Vec<Point> = empties
            .iter()
            .copied()
            .filter(|&pt| steps.iter().any(|&step| rule(board, pt, who, step)))
            .collect();
        if !moves.is_empty() {
            log::trace!("tactic {tactic:?}: {} candidates", moves.len());
            return (tactic, moves);
        }
    }
    (Tactic::Random, empties)
}
