//! Simulation-based move selection.
//!
//! Two players are built on the rollout simulator:
//! - Flat Monte-Carlo: every candidate gets the same number of rollouts and
//!   the best win rate is chosen ([`evaluate_move`]).
//! - UCB1 bandit search: candidates are arms of a multi-armed bandit; each
//!   trial picks an arm by UCB1, runs one rollout on a copy of the board and
//!   updates that arm's running average ([`Ucb1Search`]).
//!
//! The bandit loop has no stopping rule of its own; [`SearchBudget`] supplies
//! one from outside.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use fastrand::Rng;
use log::{debug, trace};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::constants::{PASS_MOVE, REPORT_PERIOD, UCB_C};
use crate::gomoku::play_move_gomoku;
use crate::playout::{simulate, simulate_for};
use crate::position::{
    Board, BoardError, Color, Point, format_point, reset_to_move_number, undo_move,
};

// =============================================================================
// Flat Monte-Carlo
// =============================================================================

/// Rollout outcomes for one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub black: usize,
    pub white: usize,
    pub draws: usize,
}

impl Tally {
    fn record(&mut self, winner: Option<Color>) {
        match winner {
            Some(Color::Black) => self.black += 1,
            Some(Color::White) => self.white += 1,
            None => self.draws += 1,
        }
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.black + self.white + self.draws
    }

    /// Win probability for `color`, counting draws as half a win.
    pub fn score_for(&self, color: Color) -> f64 {
        let black = (self.black as f64 + 0.5 * self.draws as f64) / self.total() as f64;
        match color {
            Color::Black => black,
            Color::White => 1.0 - black,
        }
    }
}

/// Evaluation of one candidate move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveScore {
    pub point: Point,
    pub tally: Tally,
    /// Win probability for the acting color, in `0..=1`
    pub score: f64,
}

/// Play `pt` for `color`, run `sims` rollouts from there, and take the move
/// back.
///
/// # Panics
/// If `sims` is zero.
pub fn simulate_move(
    board: &mut Board,
    pt: Point,
    color: Color,
    sims: usize,
    rng: &mut Rng,
) -> Result<MoveScore, BoardError> {
    assert!(sims > 0, "at least one rollout per move is required");

    play_move_gomoku(board, pt, color)?;
    let move_nr = board.move_number();
    let mut tally = Tally::default();
    for _ in 0..sims {
        let rollout = simulate(board, rng)?;
        tally.record(rollout.winner);
        reset_to_move_number(board, move_nr)?;
    }
    assert_eq!(tally.total(), sims);
    assert_eq!(board.move_number(), move_nr);
    undo_move(board)?;

    Ok(MoveScore {
        point: pt,
        tally,
        score: tally.score_for(color),
    })
}

/// Score every candidate for `color` with `sims` rollouts each.
///
/// The board is left exactly as it was, including the player to move.
pub fn evaluate_moves(
    board: &mut Board,
    candidates: &[Point],
    color: Color,
    sims: usize,
    rng: &mut Rng,
) -> Result<Vec<MoveScore>, BoardError> {
    let to_play = board.current_player;
    let scores = candidates
        .iter()
        .map(|&pt| -> Result<MoveScore, BoardError> {
            let score = simulate_move(board, pt, color, sims, rng)?;
            trace!(
                "{} b={} w={} d={} score={:.3}",
                format_point(pt, board.size),
                score.tally.black,
                score.tally.white,
                score.tally.draws,
                score.score
            );
            Ok(score)
        })
        .collect::<Result<Vec<_>, _>>();
    board.current_player = to_play;
    scores
}

/// Pick the candidate with the best flat Monte-Carlo score for `color`.
///
/// Ties go to the earliest candidate. Returns [`PASS_MOVE`] when there are
/// no candidates.
pub fn evaluate_move(
    board: &mut Board,
    candidates: &[Point],
    color: Color,
    sims: usize,
    rng: &mut Rng,
) -> Result<Point, BoardError> {
    let scores = evaluate_moves(board, candidates, color, sims, rng)?;
    let best = scores
        .iter()
        .fold(None::<&MoveScore>, |best, s| match best {
            Some(b) if b.score >= s.score => Some(b),
            _ => Some(s),
        })
        .map_or(PASS_MOVE, |s| s.point);
    debug!(
        "flat MC picked {} from {} candidates",
        format_point(best, board.size),
        candidates.len()
    );
    Ok(best)
}

// =============================================================================
// UCB1 bandit search
// =============================================================================

/// When to stop a bandit search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBudget {
    /// Run this many trials
    Trials(usize),
    /// Run trials until this much wall-clock time has passed
    Time(Duration),
}

/// Running statistics of one arm.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArmStats {
    pub visits: u32,
    pub average: f64,
}

impl ArmStats {
    /// Fold one reward into the running average.
    #[inline]
    pub fn update(&mut self, reward: f64) {
        self.visits += 1;
        self.average += (reward - self.average) / self.visits as f64;
    }
}

/// One candidate first move and its statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arm {
    pub point: Point,
    pub stats: ArmStats,
}

/// Choose an arm: a random unvisited arm if any, otherwise a random arm
/// among those maximizing `average + c * sqrt(ln(time) / visits)`.
fn select_arm(stats: &[ArmStats], time: usize, c: f64, rng: &mut Rng) -> usize {
    let unvisited: Vec<usize> = (0..stats.len()).filter(|&i| stats[i].visits == 0).collect();
    if !unvisited.is_empty() {
        return unvisited[rng.usize(..unvisited.len())];
    }

    let log_time = (time as f64).ln();
    let ucb: Vec<f64> = stats
        .iter()
        .map(|s| s.average + c * (log_time / s.visits as f64).sqrt())
        .collect();
    let max = ucb.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let greedy: Vec<usize> = (0..ucb.len()).filter(|&i| ucb[i] == max).collect();
    greedy[rng.usize(..greedy.len())]
}

/// A UCB1 search session over a fixed set of candidate first moves.
///
/// All statistics belong to the session, so independent searches can run
/// side by side.
pub struct Ucb1Search {
    color: Color,
    arms: Vec<Arm>,
    /// Elapsed-trials counter used in the exploration term; starts at 1.
    time: usize,
    c: f64,
    rng: Rng,
}

impl Ucb1Search {
    /// Create a session choosing among `candidates` for `color`.
    pub fn new(candidates: &[Point], color: Color, rng: Rng) -> Self {
        Self {
            color,
            arms: candidates
                .iter()
                .map(|&point| Arm {
                    point,
                    stats: ArmStats::default(),
                })
                .collect(),
            time: 1,
            c: UCB_C,
            rng,
        }
    }

    /// Override the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn arms(&self) -> &[Arm] {
        &self.arms
    }

    /// Number of trials run so far.
    pub fn trials(&self) -> usize {
        self.time - 1
    }

    fn stats(&self) -> Vec<ArmStats> {
        self.arms.iter().map(|a| a.stats).collect()
    }

    /// Run one trial from `board` and return the index of the arm played.
    ///
    /// # Panics
    /// If the session has no candidates.
    pub fn step(&mut self, board: &Board) -> Result<usize, BoardError> {
        assert!(!self.arms.is_empty(), "bandit search needs candidates");
        let arm = select_arm(&self.stats(), self.time, self.c, &mut self.rng);
        let mut copy = board.copy_without_history();
        play_move_gomoku(&mut copy, self.arms[arm].point, self.color)?;
        let reward = simulate_for(&mut copy, self.color, &mut self.rng)?;
        self.arms[arm].stats.update(reward);
        self.time += 1;
        Ok(arm)
    }

    /// The candidate with the highest average reward so far (earliest on
    /// ties), or [`PASS_MOVE`] with no candidates.
    pub fn best_move(&self) -> Point {
        self.arms
            .iter()
            .fold(None::<&Arm>, |best, a| match best {
                Some(b) if b.stats.average >= a.stats.average => Some(b),
                _ => Some(a),
            })
            .map_or(PASS_MOVE, |a| a.point)
    }

    /// Run trials until the budget is spent and return the best move.
    ///
    /// A single candidate is returned without searching.
    pub fn run(&mut self, board: &Board, budget: SearchBudget) -> Result<Point, BoardError> {
        if self.arms.len() <= 1 {
            return Ok(self.best_move());
        }
        let start = Instant::now();
        loop {
            let done = match budget {
                SearchBudget::Trials(n) => self.trials() >= n,
                SearchBudget::Time(limit) => start.elapsed() >= limit,
            };
            if done {
                break;
            }
            self.step(board)?;
            if self.trials() % REPORT_PERIOD == 0 {
                self.report(board);
            }
        }
        debug!(
            "UCB1 ran {} trials in {:.2?}, best {}",
            self.trials(),
            start.elapsed(),
            format_point(self.best_move(), board.size)
        );
        Ok(self.best_move())
    }

    /// Run `trials` trials in parallel and return the best move.
    ///
    /// Each trial plays on its own board copy. Arm statistics are shared
    /// behind per-arm locks so visits and average always change together.
    pub fn par_run(&mut self, board: &Board, trials: usize) -> Result<Point, BoardError> {
        if self.arms.len() <= 1 {
            return Ok(self.best_move());
        }
        let shared: Vec<Mutex<ArmStats>> =
            self.arms.iter().map(|a| Mutex::new(a.stats)).collect();
        let time = AtomicUsize::new(self.time);
        let seed = self.rng.u64(..);
        let (color, c) = (self.color, self.c);
        let points: Vec<Point> = self.arms.iter().map(|a| a.point).collect();

        (0..trials).into_par_iter().try_for_each(|i| {
            let mut rng = Rng::with_seed(seed.wrapping_add(i as u64));
            let snapshot: Vec<ArmStats> = shared.iter().map(|s| *s.lock()).collect();
            let arm = select_arm(&snapshot, time.load(Ordering::Relaxed), c, &mut rng);
            let mut copy = board.copy_without_history();
            play_move_gomoku(&mut copy, points[arm], color)?;
            let reward = simulate_for(&mut copy, color, &mut rng)?;
            shared[arm].lock().update(reward);
            time.fetch_add(1, Ordering::Relaxed);
            Ok::<(), BoardError>(())
        })?;

        for (arm, stats) in self.arms.iter_mut().zip(shared) {
            arm.stats = stats.into_inner();
        }
        self.time = time.into_inner();
        self.report(board);
        Ok(self.best_move())
    }

    fn report(&self, board: &Board) {
        debug!(
            "trial {}: best {} avg={:.3}",
            self.trials(),
            format_point(self.best_move(), board.size),
            self.arms
                .iter()
                .map(|a| a.stats.average)
                .fold(f64::NEG_INFINITY, f64::max)
        );
    }
}
