//! Board representation, Go-rule move execution, and move history.
//!
//! This module provides the core game state shared by both rulesets:
//! - Board state stored as a 1D array with a border ring
//! - Precomputed orthogonal and diagonal neighbor lists
//! - Block (connected group) discovery and a liberty cache
//! - Go-rule stone placement with captures, suicide and ko
//! - Undo history and rewinding to an earlier move number
//! - Coordinate conversion for the text front end
//!
//! For a board of size `N` the row stride is `N + 1`. Point `(row, col)` with
//! `1 <= row, col <= N` lives at index `(N + 1) * row + col`; row 0, column 0
//! and the trailing rows are border cells.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::constants::{COLUMN_LETTERS, MAX_SIZE, MIN_SIZE, PASS_MOVE};
use crate::gomoku::{is_legal_gomoku, play_move_gomoku};

/// A point on the board, represented as an index into the 1D board array.
pub type Point = usize;

/// A player color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            _ => Err(ParseError::Color(s.to_string())),
        }
    }
}

/// Contents of one cell of the board array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Black,
    White,
    /// Padding around the playable area.
    Border,
}

impl Cell {
    /// The stone color in this cell, if any.
    #[inline]
    pub fn stone(self) -> Option<Color> {
        match self {
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
            Cell::Empty | Cell::Border => None,
        }
    }
}

impl From<Color> for Cell {
    #[inline]
    fn from(color: Color) -> Cell {
        match color {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

/// Which rules `play` and `is_legal_for_ruleset` apply.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Ruleset {
    /// Captures, suicide prohibition and ko.
    Go,
    /// No captures; five in a row wins.
    #[default]
    Gomoku,
}

/// Errors returned by board operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Board size outside the supported range
    #[error("invalid board size {0}")]
    InvalidSize(usize),
    /// Move rejected by the rules; the board is unchanged
    #[error("illegal move at point {0}")]
    IllegalMove(Point),
    /// Undo requested with no moves in the history
    #[error("no moves to undo")]
    EmptyHistory,
    /// Rewind target beyond the current move number
    #[error("cannot rewind to move {target}: only {current} moves played")]
    MoveNumberOutOfRange { target: usize, current: usize },
}

/// Errors from parsing front-end text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid vertex: {0}")]
    Vertex(String),
    #[error("vertex {0} is off the board")]
    OffBoard(String),
    #[error("invalid color: {0}")]
    Color(String),
}

/// Per-point lists of on-board neighbors. Built once per board size and
/// shared between copies.
#[derive(Debug)]
struct NeighborTable {
    orthogonal: Vec<Vec<Point>>,
    diagonal: Vec<Vec<Point>>,
}

impl NeighborTable {
    fn new(color: &[Cell], ns: usize) -> Self {
        let on_board = |candidates: [Option<Point>; 4]| -> Vec<Point> {
            candidates
                .into_iter()
                .flatten()
                .filter(|&nb| color.get(nb).is_some_and(|&c| c != Cell::Border))
                .collect()
        };

        let mut orthogonal = Vec::with_capacity(color.len());
        let mut diagonal = Vec::with_capacity(color.len());
        for (pt, &c) in color.iter().enumerate() {
            if c == Cell::Border {
                orthogonal.push(Vec::new());
                diagonal.push(Vec::new());
                continue;
            }
            orthogonal.push(on_board([
                pt.checked_sub(1),
                Some(pt + 1),
                pt.checked_sub(ns),
                Some(pt + ns),
            ]));
            diagonal.push(on_board([
                pt.checked_sub(ns + 1),
                pt.checked_sub(ns - 1),
                Some(pt + ns - 1),
                Some(pt + ns + 1),
            ]));
        }
        Self {
            orthogonal,
            diagonal,
        }
    }
}

/// A board position.
///
/// The same type serves both rulesets. Go moves go through [`play_move`],
/// Gomoku moves through [`play_move_gomoku`]; [`play`] dispatches on
/// [`Board::ruleset`].
#[derive(Clone, Debug)]
pub struct Board {
    /// Board size (NxN)
    pub size: usize,
    /// Row stride of the 1D array (size + 1)
    pub ns: usize,
    /// Ruleset used by [`play`]
    pub ruleset: Ruleset,
    /// Board cells, including the border ring
    pub color: Vec<Cell>,
    /// Cached liberty hint per stone. May be stale; always re-check the
    /// hinted point is still empty before trusting it.
    pub liberty_of: Vec<Option<Point>>,
    /// Point where an immediate recapture is forbidden
    pub ko: Option<Point>,
    /// Player to move
    pub current_player: Color,
    /// Points played with [`play_move_gomoku`], oldest first
    pub moves: Vec<Point>,
    /// Last stone placed
    pub last: Option<Point>,
    neighbors: Arc<NeighborTable>,
}

impl Board {
    /// Create an empty board of the given size with Black to move.
    pub fn new(size: usize, ruleset: Ruleset) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize(size));
        }
        let ns = size + 1;
        let maxpoint = size * size + 3 * (size + 1);
        let mut color = vec![Cell::Border; maxpoint];
        for row in 1..=size {
            let start = row * ns + 1;
            color[start..start + size].fill(Cell::Empty);
        }
        let neighbors = Arc::new(NeighborTable::new(&color, ns));
        Ok(Board {
            size,
            ns,
            ruleset,
            color,
            liberty_of: vec![None; maxpoint],
            ko: None,
            current_player: Color::Black,
            moves: Vec::new(),
            last: None,
            neighbors,
        })
    }

    /// Length of the board array.
    #[inline]
    pub fn max_point(&self) -> usize {
        self.color.len()
    }

    /// Cell contents at `pt`; anything outside the array reads as border.
    #[inline]
    pub fn get_color(&self, pt: Point) -> Cell {
        self.color.get(pt).copied().unwrap_or(Cell::Border)
    }

    /// Cell contents at a signed index, for scans that may walk off the array.
    #[inline]
    pub fn cell_at(&self, pt: isize) -> Cell {
        usize::try_from(pt).map_or(Cell::Border, |p| self.get_color(p))
    }

    /// On-board orthogonal neighbors (empty for border points).
    #[inline]
    pub fn neighbors(&self, pt: Point) -> &[Point] {
        self.neighbors
            .orthogonal
            .get(pt)
            .map_or(&[], |v| v.as_slice())
    }

    /// On-board diagonal neighbors (empty for border points).
    #[inline]
    pub fn diagonal_neighbors(&self, pt: Point) -> &[Point] {
        self.neighbors.diagonal.get(pt).map_or(&[], |v| v.as_slice())
    }

    /// Number of moves in the history.
    #[inline]
    pub fn move_number(&self) -> usize {
        self.moves.len()
    }

    /// The cached liberty hint for a stone, if one is recorded.
    pub fn liberty_hint(&self, pt: Point) -> Option<Point> {
        self.liberty_of.get(pt).copied().flatten()
    }

    /// Point index of `(row, col)` on this board.
    #[inline]
    pub fn pt(&self, row: usize, col: usize) -> Point {
        coord_to_point(row, col, self.size)
    }

    /// An independent board with the same stones, ko point and player to
    /// move. History and the liberty cache start empty.
    pub fn copy_without_history(&self) -> Board {
        Board {
            size: self.size,
            ns: self.ns,
            ruleset: self.ruleset,
            color: self.color.clone(),
            liberty_of: vec![None; self.color.len()],
            ko: self.ko,
            current_player: self.current_player,
            moves: Vec::new(),
            last: None,
            neighbors: Arc::clone(&self.neighbors),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=self.size).rev() {
            write!(f, "{row:>2} ")?;
            for col in 1..=self.size {
                let ch = match self.color[self.pt(row, col)] {
                    Cell::Black => 'X',
                    Cell::White => 'O',
                    _ => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for &letter in &COLUMN_LETTERS[..self.size] {
            write!(f, "{} ", letter as char)?;
        }
        writeln!(f)
    }
}

/// Reset a board to the empty start state, keeping size and ruleset.
pub fn clear_board(board: &mut Board) {
    for row in 1..=board.size {
        let start = row * board.ns + 1;
        board.color[start..start + board.size].fill(Cell::Empty);
    }
    board.liberty_of.fill(None);
    board.ko = None;
    board.current_player = Color::Black;
    board.moves.clear();
    board.last = None;
}

// =============================================================================
// Coordinates
// =============================================================================

/// Convert 1-based `(row, col)` to a point index.
///
/// # Panics
/// If the coordinate is outside the board.
pub fn coord_to_point(row: usize, col: usize, size: usize) -> Point {
    assert!(
        (1..=size).contains(&row) && (1..=size).contains(&col),
        "coordinate ({row}, {col}) outside {size}x{size} board"
    );
    (size + 1) * row + col
}

/// Convert a point index to 1-based `(row, col)`, or `None` for points
/// outside the playable area.
pub fn point_to_coord(pt: Point, size: usize) -> Option<(usize, usize)> {
    let ns = size + 1;
    let (row, col) = (pt / ns, pt % ns);
    ((1..=size).contains(&row) && (1..=size).contains(&col)).then_some((row, col))
}

/// Render a point as a vertex such as `c4`, or `pass`.
pub fn format_point(pt: Point, size: usize) -> String {
    if pt == PASS_MOVE {
        return "pass".into();
    }
    match point_to_coord(pt, size) {
        Some((row, col)) => format!("{}{row}", COLUMN_LETTERS[col - 1] as char),
        None => "??".into(),
    }
}

/// Parse a vertex such as `C4` or `pass` into a point.
pub fn parse_move(s: &str, size: usize) -> Result<Point, ParseError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("pass") {
        return Ok(PASS_MOVE);
    }

    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return Err(ParseError::Vertex(s.to_string()));
    }
    let letter = bytes[0].to_ascii_uppercase();
    let col = COLUMN_LETTERS
        .iter()
        .position(|&c| c == letter)
        .ok_or_else(|| ParseError::Vertex(s.to_string()))?
        + 1;
    let row: usize = s[1..]
        .parse()
        .map_err(|_| ParseError::Vertex(s.to_string()))?;

    if col > size || !(1..=size).contains(&row) {
        return Err(ParseError::OffBoard(s.to_string()));
    }
    Ok(coord_to_point(row, col, size))
}

// =============================================================================
// Neighbors and blocks
// =============================================================================

/// All empty points, in ascending point order.
pub fn empty_points(board: &Board) -> Vec<Point> {
    board
        .color
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c == Cell::Empty)
        .map(|(pt, _)| pt)
        .collect()
}

/// Orthogonal neighbors of `pt` holding `cell`.
pub fn neighbors_of_color(board: &Board, pt: Point, cell: Cell) -> Vec<Point> {
    board
        .neighbors(pt)
        .iter()
        .copied()
        .filter(|&nb| board.color[nb] == cell)
        .collect()
}

/// One orthogonal neighbor of `pt` holding `cell`, if any.
pub fn find_neighbor_of_color(board: &Board, pt: Point, cell: Cell) -> Option<Point> {
    board
        .neighbors(pt)
        .iter()
        .copied()
        .find(|&nb| board.color[nb] == cell)
}

/// Collect the block (connected same-colored stones) containing `stone`.
///
/// # Panics
/// If `stone` is not a black or white stone.
pub fn block_of(board: &Board, stone: Point) -> Vec<Point> {
    let color = board.get_color(stone);
    assert!(
        color.stone().is_some(),
        "block_of called on a non-stone point {stone}"
    );

    let mut marker = vec![false; board.max_point()];
    let mut block = vec![stone];
    let mut stack = vec![stone];
    marker[stone] = true;

    while let Some(pt) = stack.pop() {
        for &nb in board.neighbors(pt) {
            if !marker[nb] && board.color[nb] == color {
                marker[nb] = true;
                block.push(nb);
                stack.push(nb);
            }
        }
    }
    block
}

/// Any liberty of the block, or `None`.
fn get_liberty(board: &Board, block: &[Point]) -> Option<Point> {
    block
        .iter()
        .find_map(|&stone| find_neighbor_of_color(board, stone, Cell::Empty))
}

/// Check whether the block has a liberty, recording it as the liberty hint
/// for every stone in the block.
pub fn has_liberty(board: &mut Board, block: &[Point]) -> bool {
    match get_liberty(board, block) {
        Some(lib) => {
            debug_assert_eq!(board.color[lib], Cell::Empty);
            for &stone in block {
                board.liberty_of[stone] = Some(lib);
            }
            true
        }
        None => false,
    }
}

/// Does this single stone touch an empty point?
#[inline]
pub fn stone_has_liberty(board: &Board, stone: Point) -> bool {
    find_neighbor_of_color(board, stone, Cell::Empty).is_some()
}

/// Cheap liberty test: the cached hint if it is still empty, then the
/// stone's own neighbors. A `false` result means the caller must examine
/// the whole block.
pub fn fast_liberty_check(board: &Board, stone: Point) -> bool {
    if let Some(lib) = board.liberty_hint(stone) {
        if board.color[lib] == Cell::Empty {
            return true;
        }
    }
    stone_has_liberty(board, stone)
}

/// Would the block on `nb` be captured as the board stands? Reads only.
fn detect_capture(board: &Board, nb: Point) -> bool {
    !fast_liberty_check(board, nb) && get_liberty(board, &block_of(board, nb)).is_none()
}

/// Remove the block on `nb` if it has no liberty.
///
/// Returns the captured point when exactly one stone was removed; this
/// feeds the ko test in [`play_move`].
fn detect_and_process_capture(board: &mut Board, nb: Point) -> Option<Point> {
    if fast_liberty_check(board, nb) {
        return None;
    }
    let block = block_of(board, nb);
    if has_liberty(board, &block) {
        return None;
    }
    for &stone in &block {
        board.color[stone] = Cell::Empty;
        board.liberty_of[stone] = None;
    }
    (block.len() == 1).then_some(nb)
}

/// Are all on-board neighbors of `pt` stones of `color`?
fn is_surrounded(board: &Board, pt: Point, color: Color) -> bool {
    let cell = Cell::from(color);
    board.neighbors(pt).iter().all(|&nb| board.color[nb] == cell)
}

/// Check if `pt` is a simple eye for `color`.
///
/// The point must be surrounded by `color`, and at most one diagonal may
/// hold an opponent stone in the center (none at the edge).
pub fn is_eye(board: &Board, pt: Point, color: Color) -> bool {
    if !is_surrounded(board, pt, color) {
        return false;
    }
    let opp = Cell::from(color.opponent());
    let diagonals = board.diagonal_neighbors(pt);
    let at_edge = usize::from(diagonals.len() < 4);
    let false_count = diagonals
        .iter()
        .filter(|&&d| board.color[d] == opp)
        .count();
    false_count <= 1 - at_edge
}

// =============================================================================
// Go ruleset
// =============================================================================

/// Check whether `color` may play at `pt` under Go rules.
///
/// The stone is placed and removed again; ko, history and the player to
/// move are untouched, and nothing is written to the liberty cache: the
/// trial block may split again once the stone is lifted.
pub fn is_legal(board: &mut Board, pt: Point, color: Color) -> bool {
    if pt == PASS_MOVE {
        return true;
    }
    if board.get_color(pt) != Cell::Empty || board.ko == Some(pt) {
        return false;
    }

    let opp = Cell::from(color.opponent());
    board.color[pt] = color.into();
    let has_capture = neighbors_of_color(board, pt, opp)
        .into_iter()
        .any(|nb| detect_capture(&*board, nb));
    let legal = has_capture
        || stone_has_liberty(board, pt)
        || get_liberty(board, &block_of(board, pt)).is_some();
    board.color[pt] = Cell::Empty;
    legal
}

/// Play a Go move of `color` at `pt`.
///
/// Handles passes, captures, suicide and ko. On error the board is
/// unchanged.
///
/// # Errors
/// [`BoardError::IllegalMove`] if the point is occupied, retakes ko, or
/// the placed block would have no liberty.
pub fn play_move(board: &mut Board, pt: Point, color: Color) -> Result<(), BoardError> {
    if pt == PASS_MOVE {
        board.ko = None;
        board.current_player = color.opponent();
        return Ok(());
    }
    if board.get_color(pt) != Cell::Empty || board.ko == Some(pt) {
        return Err(BoardError::IllegalMove(pt));
    }

    let opp = color.opponent();
    let in_enemy_eye = is_surrounded(board, pt, opp);
    board.color[pt] = color.into();

    let table = Arc::clone(&board.neighbors);
    let mut single_captures = Vec::new();
    for &nb in &table.orthogonal[pt] {
        if board.color[nb] == Cell::from(opp) {
            if let Some(captured) = detect_and_process_capture(board, nb) {
                single_captures.push(captured);
            }
        }
    }

    if !stone_has_liberty(board, pt) {
        let block = block_of(board, pt);
        if !has_liberty(board, &block) {
            board.color[pt] = Cell::Empty;
            return Err(BoardError::IllegalMove(pt));
        }
    }

    board.ko = match single_captures.as_slice() {
        [captured] if in_enemy_eye => Some(*captured),
        _ => None,
    };
    board.last = Some(pt);
    board.current_player = opp;
    Ok(())
}

// =============================================================================
// Ruleset dispatch and history
// =============================================================================

/// Play `pt` for `color` under the board's ruleset.
pub fn play(board: &mut Board, pt: Point, color: Color) -> Result<(), BoardError> {
    match board.ruleset {
        Ruleset::Go => play_move(board, pt, color),
        Ruleset::Gomoku => play_move_gomoku(board, pt, color),
    }
}

/// Legality of `pt` for `color` under the board's ruleset.
pub fn is_legal_for_ruleset(board: &mut Board, pt: Point, color: Color) -> bool {
    match board.ruleset {
        Ruleset::Go => is_legal(board, pt, color),
        Ruleset::Gomoku => is_legal_gomoku(board, pt, color),
    }
}

/// Take back the last move in the history and return its point.
///
/// # Errors
/// [`BoardError::EmptyHistory`] if no moves have been played.
pub fn undo_move(board: &mut Board) -> Result<Point, BoardError> {
    let location = board.moves.pop().ok_or(BoardError::EmptyHistory)?;
    board.color[location] = Cell::Empty;
    board.last = board.moves.last().copied();
    board.current_player = board.current_player.opponent();
    Ok(location)
}

/// Undo moves until the history holds exactly `move_nr` moves.
///
/// # Errors
/// [`BoardError::MoveNumberOutOfRange`] if `move_nr` exceeds the current
/// move number.
pub fn reset_to_move_number(board: &mut Board, move_nr: usize) -> Result<(), BoardError> {
    let current = board.move_number();
    if move_nr > current {
        return Err(BoardError::MoveNumberOutOfRange {
            target: move_nr,
            current,
        });
    }
    for _ in move_nr..current {
        undo_move(board)?;
    }
    assert_eq!(board.move_number(), move_nr);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go_board(size: usize) -> Board {
        Board::new(size, Ruleset::Go).unwrap()
    }

    fn place(board: &mut Board, stones: &[(usize, usize)], color: Color) {
        for &(r, c) in stones {
            let pt = board.pt(r, c);
            board.color[pt] = color.into();
        }
    }

    #[test]
    fn test_new_board_sizes() {
        assert_eq!(
            Board::new(1, Ruleset::Go).unwrap_err(),
            BoardError::InvalidSize(1)
        );
        assert_eq!(
            Board::new(MAX_SIZE + 1, Ruleset::Gomoku).unwrap_err(),
            BoardError::InvalidSize(MAX_SIZE + 1)
        );
        let board = go_board(7);
        assert_eq!(board.max_point(), 7 * 7 + 3 * 8);
        assert_eq!(empty_points(&board).len(), 49);
        assert_eq!(board.current_player, Color::Black);
    }

    #[test]
    fn test_border_layout() {
        let board = go_board(5);
        assert_eq!(board.get_color(PASS_MOVE), Cell::Border);
        // Column 0 of every row is border
        for row in 0..=6 {
            assert_eq!(board.get_color(row * 6), Cell::Border);
        }
        assert_eq!(board.get_color(board.max_point() + 10), Cell::Border);
        assert_eq!(board.cell_at(-3), Cell::Border);
    }

    #[test]
    fn test_neighbor_counts() {
        let board = go_board(5);
        assert_eq!(board.neighbors(board.pt(1, 1)).len(), 2);
        assert_eq!(board.neighbors(board.pt(1, 3)).len(), 3);
        assert_eq!(board.neighbors(board.pt(3, 3)).len(), 4);
        assert_eq!(board.diagonal_neighbors(board.pt(1, 1)).len(), 1);
        assert_eq!(board.diagonal_neighbors(board.pt(3, 3)).len(), 4);
        assert!(board.neighbors(PASS_MOVE).is_empty());
        assert!(board.diagonal_neighbors(6).is_empty());
    }

    #[test]
    fn test_coord_roundtrip() {
        for size in [2, 7, 19, MAX_SIZE] {
            for row in 1..=size {
                for col in 1..=size {
                    let pt = coord_to_point(row, col, size);
                    assert_eq!(point_to_coord(pt, size), Some((row, col)));
                    assert_eq!(parse_move(&format_point(pt, size), size), Ok(pt));
                }
            }
        }
    }

    #[test]
    fn test_parse_move_errors() {
        assert_eq!(parse_move("Pass", 7), Ok(PASS_MOVE));
        assert_eq!(parse_move("a1", 7), Ok(coord_to_point(1, 1, 7)));
        assert_eq!(parse_move("J2", 9), Ok(coord_to_point(2, 9, 9)));
        assert!(matches!(parse_move("i3", 9), Err(ParseError::Vertex(_))));
        assert!(matches!(parse_move("h8", 7), Err(ParseError::OffBoard(_))));
        assert!(matches!(parse_move("a0", 7), Err(ParseError::OffBoard(_))));
        assert!(matches!(parse_move("z", 7), Err(ParseError::Vertex(_))));
        assert!(matches!(parse_move("ax", 7), Err(ParseError::Vertex(_))));
    }

    #[test]
    fn test_block_of() {
        let mut board = go_board(5);
        place(&mut board, &[(2, 2), (2, 3), (3, 3)], Color::Black);
        place(&mut board, &[(4, 4)], Color::Black);
        let mut block = block_of(&board, board.pt(2, 2));
        block.sort_unstable();
        let mut expected = vec![board.pt(2, 2), board.pt(2, 3), board.pt(3, 3)];
        expected.sort_unstable();
        assert_eq!(block, expected);
    }

    #[test]
    #[should_panic]
    fn test_block_of_empty_point_panics() {
        let board = go_board(5);
        block_of(&board, board.pt(3, 3));
    }

    #[test]
    fn test_has_liberty_sets_hint() {
        let mut board = go_board(5);
        place(&mut board, &[(1, 1), (1, 2)], Color::White);
        let block = block_of(&board, board.pt(1, 1));
        assert!(has_liberty(&mut board, &block));
        for &stone in &block {
            let lib = board.liberty_hint(stone).unwrap();
            assert_eq!(board.color[lib], Cell::Empty);
        }
    }

    #[test]
    fn test_fast_liberty_check_stale_hint() {
        let mut board = go_board(5);
        place(&mut board, &[(1, 1)], Color::White);
        let a1 = board.pt(1, 1);
        assert!(has_liberty(&mut board, &[a1]));
        // Fill both liberties: the cached hint is now stale
        place(&mut board, &[(1, 2), (2, 1)], Color::Black);
        assert!(!fast_liberty_check(&board, a1));
    }

    #[test]
    fn test_is_eye() {
        let mut board = go_board(5);
        place(&mut board, &[(1, 2), (2, 1)], Color::Black);
        let corner = board.pt(1, 1);
        assert!(is_eye(&board, corner, Color::Black));
        assert!(!is_eye(&board, corner, Color::White));
        // An opponent diagonal at the edge makes it a false eye
        place(&mut board, &[(2, 2)], Color::White);
        assert!(!is_eye(&board, corner, Color::Black));
    }

    #[test]
    fn test_play_move_pass_clears_ko() {
        let mut board = go_board(5);
        board.ko = Some(board.pt(2, 2));
        play_move(&mut board, PASS_MOVE, Color::Black).unwrap();
        assert_eq!(board.ko, None);
        assert_eq!(board.current_player, Color::White);
    }

    #[test]
    fn test_play_move_occupied() {
        let mut board = go_board(5);
        let pt = board.pt(3, 3);
        play_move(&mut board, pt, Color::Black).unwrap();
        assert_eq!(
            play_move(&mut board, pt, Color::White),
            Err(BoardError::IllegalMove(pt))
        );
        assert_eq!(board.current_player, Color::White);
    }

    #[test]
    fn test_suicide_rejected() {
        let mut board = go_board(5);
        place(&mut board, &[(1, 2), (2, 1)], Color::White);
        let corner = board.pt(1, 1);
        let before = board.color.clone();
        assert!(!is_legal(&mut board, corner, Color::Black));
        assert_eq!(
            play_move(&mut board, corner, Color::Black),
            Err(BoardError::IllegalMove(corner))
        );
        assert_eq!(board.color, before);
    }

    #[test]
    fn test_is_legal_keeps_hints_valid() {
        let mut board = go_board(5);
        place(&mut board, &[(3, 2), (3, 4)], Color::Black);
        place(&mut board, &[(2, 3), (4, 3), (3, 5), (2, 4), (4, 4)], Color::White);
        let (c3, d3) = (board.pt(3, 3), board.pt(3, 4));

        // Connecting through c3 would join d3 to b3 and its liberties
        let hints = board.liberty_of.clone();
        assert!(is_legal(&mut board, c3, Color::Black));
        assert_eq!(board.get_color(c3), Cell::Empty);
        assert_eq!(board.liberty_of, hints);

        // d3 has only c3 left, so White captures it there
        play_move(&mut board, c3, Color::White).unwrap();
        assert_eq!(board.get_color(d3), Cell::Empty);
        assert_eq!(board.get_color(board.pt(3, 2)), Cell::Black);
    }

    #[test]
    fn test_capture_in_corner() {
        let mut board = go_board(5);
        place(&mut board, &[(1, 1)], Color::White);
        place(&mut board, &[(1, 2)], Color::Black);
        let b2 = board.pt(2, 1);
        assert!(is_legal(&mut board, b2, Color::Black));
        play_move(&mut board, b2, Color::Black).unwrap();
        assert_eq!(board.get_color(board.pt(1, 1)), Cell::Empty);
        // The capturing point was not surrounded by White, so no ko
        assert_eq!(board.ko, None);
    }

    #[test]
    fn test_undo_and_reset() {
        let mut board = Board::new(5, Ruleset::Gomoku).unwrap();
        assert_eq!(undo_move(&mut board), Err(BoardError::EmptyHistory));
        let a = board.pt(1, 1);
        let b = board.pt(2, 2);
        play_move_gomoku(&mut board, a, Color::Black).unwrap();
        play_move_gomoku(&mut board, b, Color::White).unwrap();
        assert_eq!(board.last, Some(b));
        assert_eq!(
            reset_to_move_number(&mut board, 3),
            Err(BoardError::MoveNumberOutOfRange {
                target: 3,
                current: 2
            })
        );
        assert_eq!(undo_move(&mut board), Ok(b));
        assert_eq!(board.last, Some(a));
        assert_eq!(board.current_player, Color::White);
        reset_to_move_number(&mut board, 0).unwrap();
        assert_eq!(board.last, None);
        assert_eq!(board.current_player, Color::Black);
        assert_eq!(empty_points(&board).len(), 25);
    }

    #[test]
    fn test_copy_without_history() {
        let mut board = Board::new(5, Ruleset::Gomoku).unwrap();
        let a = board.pt(3, 3);
        play_move_gomoku(&mut board, a, Color::Black).unwrap();
        let mut copy = board.copy_without_history();
        assert_eq!(copy.color, board.color);
        assert_eq!(copy.current_player, Color::White);
        assert_eq!(copy.move_number(), 0);
        play_move_gomoku(&mut copy, board.pt(1, 1), Color::White).unwrap();
        assert_eq!(board.get_color(board.pt(1, 1)), Cell::Empty);
    }

    #[test]
    fn test_clear_board() {
        let mut board = Board::new(5, Ruleset::Gomoku).unwrap();
        let pt = board.pt(2, 2);
        play(&mut board, pt, Color::Black).unwrap();
        clear_board(&mut board);
        assert_eq!(empty_points(&board).len(), 25);
        assert_eq!(board.move_number(), 0);
        assert_eq!(board.current_player, Color::Black);
    }

    #[test]
    fn test_color_parse() {
        assert_eq!("B".parse::<Color>(), Ok(Color::Black));
        assert_eq!("white".parse::<Color>(), Ok(Color::White));
        assert!("red".parse::<Color>().is_err());
        assert_eq!(Color::Black.to_string(), "black");
    }
}
