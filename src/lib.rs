//! Stoneplay: Monte-Carlo players for Gomoku, on a Go-capable board.
//!
//! The board supports both Go rules (captures, suicide, ko) and Gomoku
//! rules (five in a row wins). Gomoku moves are chosen by random rollouts,
//! either flat Monte-Carlo or a UCB1 bandit over tactically filtered
//! candidates.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits and engine parameters
//! - [`position`] - Board state, coordinates, Go rules, undo
//! - [`gomoku`] - Gomoku placement and win detection
//! - [`patterns`] - Line shapes and tactical move filtering
//! - [`playout`] - Random rollouts
//! - [`mcts`] - Flat Monte-Carlo and UCB1 move selection
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use fastrand::Rng;
//! use stoneplay::gomoku::play_move_gomoku;
//! use stoneplay::mcts::evaluate_move;
//! use stoneplay::patterns::tactical_candidates;
//! use stoneplay::position::{Board, Color, Ruleset, format_point, parse_move};
//!
//! let mut board = Board::new(7, Ruleset::Gomoku).unwrap();
//! let d4 = parse_move("d4", board.size).unwrap();
//! play_move_gomoku(&mut board, d4, Color::Black).unwrap();
//!
//! let (_, candidates) = tactical_candidates(&mut board, Color::White);
//! let mut rng = Rng::with_seed(1);
//! let best = evaluate_move(&mut board, &candidates, Color::White, 10, &mut rng).unwrap();
//! println!("White answers {}", format_point(best, board.size));
//! assert_eq!(board.move_number(), 1);
//! ```

pub mod constants;
pub mod gomoku;
pub mod gtp;
pub mod mcts;
pub mod patterns;
pub mod playout;
pub mod position;
