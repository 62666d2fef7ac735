//! Constants for board geometry, special points, and search defaults.
//!
//! The board uses a 1D array representation with a border ring around the
//! playable area. For a board of size `N` the row stride is `N + 1`, so a
//! single border column separates consecutive rows and the array holds
//! `N * N + 3 * (N + 1)` cells.

use crate::position::Point;

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest supported board size.
pub const MIN_SIZE: usize = 2;

/// Largest supported board size (one column per letter in [`COLUMN_LETTERS`]).
pub const MAX_SIZE: usize = 25;

/// Board size used when none is given on the command line.
pub const DEFAULT_SIZE: usize = 7;

/// Column letters for coordinates. `I` is skipped by convention.
pub const COLUMN_LETTERS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Number of stones in a row that wins a Gomoku game.
pub const WIN_LENGTH: usize = 5;

// =============================================================================
// Special Move Values
// =============================================================================

/// Pass move marker. Index 0 is always part of the border, so it never
/// collides with a playable point.
pub const PASS_MOVE: Point = 0;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default number of rollouts per candidate for the flat Monte-Carlo player.
pub const N_SIMS: usize = 50;

/// UCB1 exploration constant.
pub const UCB_C: f64 = 2.0;

/// Default UCB1 trial budget per candidate move.
pub const TRIALS_PER_MOVE: usize = 100;

/// Number of trials between progress reports in the bandit search.
pub const REPORT_PERIOD: usize = 500;
