//! Random playouts (rollouts) for position evaluation.
//!
//! A Gomoku rollout shuffles the legal moves once and plays them in that order
//! for alternating players until someone has five in a row or the list runs
//! out. Every ply is a real, undoable move, so callers rewind with
//! [`reset_to_move_number`](crate::position::reset_to_move_number).

use fastrand::Rng;

use crate::constants::PASS_MOVE;
use crate::gomoku::{check_game_end, end_of_game, legal_moves, play_move_gomoku};
use crate::position::{Board, BoardError, Color, Point, empty_points, is_eye, is_legal};

/// Outcome of one rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollout {
    /// Winning color, or `None` if the board filled up first
    pub winner: Option<Color>,
    /// Number of moves played by the rollout
    pub plies: usize,
}

/// Play uniformly random Gomoku moves until the game ends.
pub fn simulate(board: &mut Board, rng: &mut Rng) -> Result<Rollout, BoardError> {
    let mut plies = 0;
    if !end_of_game(board) {
        let mut all_moves = legal_moves(board);
        rng.shuffle(&mut all_moves);
        while plies < all_moves.len() && !end_of_game(board) {
            let player = board.current_player;
            play_move_gomoku(board, all_moves[plies], player)?;
            plies += 1;
        }
    }
    Ok(Rollout {
        winner: check_game_end(board),
        plies,
    })
}

/// Run one rollout and score it for `color`: +1 win, -1 loss, 0 draw.
pub fn simulate_for(board: &mut Board, color: Color, rng: &mut Rng) -> Result<f64, BoardError> {
    let rollout = simulate(board, rng)?;
    Ok(match rollout.winner {
        Some(winner) if winner == color => 1.0,
        Some(_) => -1.0,
        None => 0.0,
    })
}

/// Choose a random legal Go move for `color` that does not fill one of its
/// own eyes, or [`PASS_MOVE`] if there is none.
pub fn random_go_move(board: &mut Board, color: Color, rng: &mut Rng) -> Point {
    let mut candidates = empty_points(board);
    rng.shuffle(&mut candidates);
    candidates
        .into_iter()
        .find(|&pt| !is_eye(board, pt, color) && is_legal(board, pt, color))
        .unwrap_or(PASS_MOVE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Cell, Ruleset, play_move, reset_to_move_number};

    #[test]
    fn test_simulate_records_every_ply() {
        let mut rng = Rng::with_seed(7);
        let mut board = Board::new(7, Ruleset::Gomoku).unwrap();
        let start = board.move_number();
        let rollout = simulate(&mut board, &mut rng).unwrap();
        assert_eq!(board.move_number(), start + rollout.plies);
        assert_eq!(rollout.winner, check_game_end(&board));
        if rollout.winner.is_none() {
            assert!(legal_moves(&board).is_empty());
        }
        reset_to_move_number(&mut board, start).unwrap();
        assert_eq!(legal_moves(&board).len(), 49);
    }

    #[test]
    fn test_simulate_finished_game_plays_nothing() {
        let mut rng = Rng::with_seed(1);
        let mut board = Board::new(7, Ruleset::Gomoku).unwrap();
        for col in 1..=5 {
            let pt = board.pt(2, col);
            board.color[pt] = Cell::Black;
        }
        let rollout = simulate(&mut board, &mut rng).unwrap();
        assert_eq!(rollout.plies, 0);
        assert_eq!(rollout.winner, Some(Color::Black));
        assert_eq!(simulate_for(&mut board, Color::Black, &mut rng), Ok(1.0));
        assert_eq!(simulate_for(&mut board, Color::White, &mut rng), Ok(-1.0));
    }

    #[test]
    fn test_simulate_tiny_board_draws() {
        // No five fits on a 4x4 board
        let mut rng = Rng::with_seed(3);
        let mut board = Board::new(4, Ruleset::Gomoku).unwrap();
        let rollout = simulate(&mut board, &mut rng).unwrap();
        assert_eq!(rollout, Rollout { winner: None, plies: 16 });
    }

    #[test]
    fn test_random_go_move_avoids_own_eye() {
        let mut rng = Rng::with_seed(11);
        let mut board = Board::new(2, Ruleset::Go).unwrap();
        // Black owns a 2x2 board except one point: filling it is suicide
        // for Black and an eye anyway
        for pt in [board.pt(1, 2), board.pt(2, 1), board.pt(2, 2)] {
            board.color[pt] = Cell::Black;
        }
        assert_eq!(random_go_move(&mut board, Color::Black, &mut rng), PASS_MOVE);
        // White may capture by playing into the last liberty
        let last = board.pt(1, 1);
        assert_eq!(random_go_move(&mut board, Color::White, &mut rng), last);
        play_move(&mut board, last, Color::White).unwrap();
        assert_eq!(empty_points(&board).len(), 3);
    }
}
