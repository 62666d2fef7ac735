//! Go Text Protocol (GTP) front end.
//!
//! A line-based command loop that lets a controller (a GUI or a referee
//! script) drive the engine. Responses start with `=` on success and `?` on
//! failure, followed by an optional echoed command id.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`, `quit`
//! - `boardsize <size>` - New empty board of the given size
//! - `clear_board` - Reset the board to empty
//! - `play <color> <vertex>` - Play a move under the board's ruleset
//! - `genmove <color>` - Generate and play a move for the given color
//! - `undo` - Take back the last Gomoku move
//! - `legal_moves <color>` - List legal moves, sorted
//! - `gogui-rules_final_result` - `black`, `white`, `draw` or `unknown`
//! - `showboard` - Print the board
//! - `timelimit <seconds>` - Wall-clock budget for the UCB1 player
//!
//! ## Example
//!
//! ```ignore
//! use stoneplay::gtp::{GtpEngine, Player};
//! use stoneplay::position::Ruleset;
//! let mut engine = GtpEngine::new(7, Ruleset::Gomoku, Player::Ucb)?;
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use fastrand::Rng;
use log::{debug, info};

use crate::constants::{N_SIMS, TRIALS_PER_MOVE};
use crate::gomoku::{check_game_end, end_of_game, legal_moves, play_move_gomoku};
use crate::mcts::{SearchBudget, Ucb1Search, evaluate_move};
use crate::patterns::{straight_opening, tactical_candidates};
use crate::playout::random_go_move;
use crate::position::{
    Board, Color, Point, Ruleset, clear_board, empty_points, format_point, is_legal_for_ruleset,
    parse_move, play, play_move, undo_move,
};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "gogui-rules_final_result",
    "known_command",
    "legal_moves",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "timelimit",
    "undo",
    "version",
];

/// Move-selection algorithm used by `genmove` under Gomoku rules.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Player {
    /// Flat Monte-Carlo: a fixed number of rollouts per candidate
    Flat,
    /// UCB1 bandit search with a trial or time budget
    #[default]
    Ucb,
    /// UCB1 with trials spread over the rayon pool; trial budget only
    ParUcb,
}

/// GTP engine state.
pub struct GtpEngine {
    /// Current game position
    board: Board,
    /// Move-selection algorithm
    player: Player,
    /// Rollouts per candidate for the flat player
    n_sims: usize,
    /// Trials per candidate for the UCB1 player when no time limit is set
    trials_per_move: usize,
    /// Wall-clock budget for the UCB1 player
    time_limit: Option<Duration>,
    rng: Rng,
}

impl GtpEngine {
    /// Create an engine with default search settings.
    pub fn new(size: usize, ruleset: Ruleset, player: Player) -> Result<Self> {
        Ok(Self {
            board: Board::new(size, ruleset)?,
            player,
            n_sims: N_SIMS,
            trials_per_move: TRIALS_PER_MOVE,
            time_limit: None,
            rng: Rng::new(),
        })
    }

    /// Set the number of rollouts per candidate for the flat player.
    pub fn with_simulations(mut self, n_sims: usize) -> Self {
        self.n_sims = n_sims.max(1);
        self
    }

    /// Set the UCB1 trial budget per candidate.
    pub fn with_trials_per_move(mut self, trials: usize) -> Self {
        self.trials_per_move = trials;
        self
    }

    /// Seed the random number generator for reproducible play.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng::with_seed(seed);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line.context("failed to read command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!("command: {command} {args:?}");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(stdout, "{prefix}{id_str} {message}\n\n").context("failed to write response")?;
            stdout.flush().context("failed to flush response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a GTP command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<usize>().map(|size| Board::new(size, self.board.ruleset)) {
                    Ok(Ok(board)) => {
                        self.board = board;
                        (true, String::new())
                    }
                    Ok(Err(e)) => (false, format!("unacceptable size: {e}")),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                clear_board(&mut self.board);
                (true, String::new())
            }

            "play" => self.cmd_play(args),

            "genmove" => self.cmd_genmove(args),

            "undo" => match undo_move(&mut self.board) {
                Ok(_) => (true, String::new()),
                Err(e) => (false, format!("cannot undo: {e}")),
            },

            "legal_moves" => {
                let color = match args.first().map(|s| s.parse::<Color>()) {
                    Some(Ok(color)) => color,
                    Some(Err(e)) => return (false, e.to_string()),
                    None => self.board.current_player,
                };
                (true, self.legal_move_list(color))
            }

            "gogui-rules_final_result" => (true, self.final_result().to_string()),

            "showboard" => (true, format!("\n{}", self.board)),

            "timelimit" => match args.first().map(|s| s.parse::<u64>()) {
                Some(Ok(secs)) => {
                    self.time_limit = Some(Duration::from_secs(secs));
                    (true, String::new())
                }
                _ => (false, "invalid time limit".to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn cmd_play(&mut self, args: &[&str]) -> (bool, String) {
        if args.len() < 2 {
            return (false, "missing arguments".to_string());
        }
        let color = match args[0].parse::<Color>() {
            Ok(color) => color,
            Err(e) => return (false, e.to_string()),
        };
        let pt = match parse_move(args[1], self.board.size) {
            Ok(pt) => pt,
            Err(e) => return (false, format!("illegal move: {e}")),
        };
        match play(&mut self.board, pt, color) {
            Ok(()) => (true, String::new()),
            Err(_) => (
                false,
                format!("illegal move: \"{} {}\"", color, format_point(pt, self.board.size)),
            ),
        }
    }

    fn cmd_genmove(&mut self, args: &[&str]) -> (bool, String) {
        let color = match args.first().map(|s| s.parse::<Color>()) {
            Some(Ok(color)) => color,
            Some(Err(e)) => return (false, e.to_string()),
            None => return (false, "missing argument".to_string()),
        };

        if self.board.ruleset == Ruleset::Go {
            let pt = random_go_move(&mut self.board, color, &mut self.rng);
            return match play_move(&mut self.board, pt, color) {
                Ok(()) => (true, format_point(pt, self.board.size)),
                Err(e) => (false, e.to_string()),
            };
        }

        if end_of_game(&self.board) {
            return (true, "resign".to_string());
        }
        if legal_moves(&self.board).is_empty() {
            return (true, "pass".to_string());
        }

        let candidates = self.candidates(color);
        let result = match self.player {
            Player::Flat => evaluate_move(
                &mut self.board,
                &candidates,
                color,
                self.n_sims,
                &mut self.rng,
            ),
            Player::Ucb => {
                let budget = match self.time_limit {
                    Some(limit) => SearchBudget::Time(limit),
                    None => SearchBudget::Trials(self.trials_per_move * candidates.len()),
                };
                let rng = Rng::with_seed(self.rng.u64(..));
                Ucb1Search::new(&candidates, color, rng).run(&self.board, budget)
            }
            Player::ParUcb => {
                let rng = Rng::with_seed(self.rng.u64(..));
                Ucb1Search::new(&candidates, color, rng)
                    .par_run(&self.board, self.trials_per_move * candidates.len())
            }
        };

        match result.and_then(|pt| play_move_gomoku(&mut self.board, pt, color).map(|()| pt)) {
            Ok(pt) => {
                let vertex = format_point(pt, self.board.size);
                info!("genmove {color}: {vertex}");
                (true, vertex)
            }
            Err(e) => (false, e.to_string()),
        }
    }

    /// Moves worth searching for `color`: the neighbors of a lone opening
    /// stone, otherwise the strongest tactical tier.
    fn candidates(&mut self, color: Color) -> Vec<Point> {
        if self.board.move_number() == 1 {
            if let Some(first) = self.board.last {
                let around = straight_opening(&self.board, first);
                if !around.is_empty() {
                    return around;
                }
            }
        }
        let (tactic, moves) = tactical_candidates(&mut self.board, color);
        debug!("{tactic:?}: {} candidates", moves.len());
        moves
    }

    fn legal_move_list(&mut self, color: Color) -> String {
        if self.board.ruleset == Ruleset::Gomoku && end_of_game(&self.board) {
            return String::new();
        }
        let size = self.board.size;
        let mut moves: Vec<String> = empty_points(&self.board)
            .into_iter()
            .filter(|&pt| is_legal_for_ruleset(&mut self.board, pt, color))
            .map(|pt| format_point(pt, size))
            .collect();
        moves.sort();
        moves.join(" ")
    }

    fn final_result(&self) -> &'static str {
        if self.board.ruleset == Ruleset::Go {
            return "unknown";
        }
        match check_game_end(&self.board) {
            Some(Color::Black) => "black",
            Some(Color::White) => "white",
            None if empty_points(&self.board).is_empty() => "draw",
            None => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(player: Player) -> GtpEngine {
        GtpEngine::new(7, Ruleset::Gomoku, player)
            .unwrap()
            .with_simulations(5)
            .with_trials_per_move(5)
            .with_seed(17)
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_and_protocol() {
        let mut engine = engine(Player::Flat);
        assert_eq!(engine.execute("name", &[]), (true, "stoneplay".to_string()));
        assert_eq!(engine.execute("protocol_version", &[]), (true, "2".to_string()));
    }

    #[test]
    fn test_known_command() {
        let mut engine = engine(Player::Flat);
        assert_eq!(engine.execute("known_command", &["genmove"]), (true, "true".to_string()));
        assert_eq!(engine.execute("known_command", &["komi"]), (true, "false".to_string()));
        assert!(!engine.execute("known_command", &[]).0);
    }

    #[test]
    fn test_boardsize() {
        let mut engine = engine(Player::Flat);
        assert!(engine.execute("boardsize", &["9"]).0);
        assert_eq!(engine.board().size, 9);
        assert!(!engine.execute("boardsize", &["30"]).0);
        assert!(!engine.execute("boardsize", &["big"]).0);
        assert_eq!(engine.board().size, 9);
    }

    #[test]
    fn test_play_undo_and_clear() {
        let mut engine = engine(Player::Flat);
        assert!(engine.execute("play", &["b", "d4"]).0);
        assert_eq!(
            engine.execute("play", &["w", "d4"]),
            (false, "illegal move: \"white D4\"".to_string())
        );
        assert!(!engine.execute("play", &["w", "z9"]).0);
        assert!(!engine.execute("play", &["red", "a1"]).0);
        assert_eq!(engine.board().move_number(), 1);
        assert!(engine.execute("undo", &[]).0);
        assert!(!engine.execute("undo", &[]).0);
        assert!(engine.execute("play", &["w", "a1"]).0);
        assert!(engine.execute("clear_board", &[]).0);
        assert_eq!(engine.board().move_number(), 0);
    }

    #[test]
    fn test_legal_moves_and_result() {
        let mut engine = engine(Player::Flat);
        let (ok, moves) = engine.execute("legal_moves", &["black"]);
        assert!(ok);
        assert_eq!(moves.split_whitespace().count(), 49);
        assert_eq!(engine.execute("gogui-rules_final_result", &[]).1, "unknown");
        for (b, w) in [("a1", "a7"), ("b1", "b7"), ("c1", "c7"), ("d1", "d7")] {
            engine.execute("play", &["b", b]);
            engine.execute("play", &["w", w]);
        }
        engine.execute("play", &["b", "e1"]);
        assert_eq!(engine.execute("gogui-rules_final_result", &[]).1, "black");
        assert_eq!(engine.execute("legal_moves", &["white"]).1, "");
        assert_eq!(engine.execute("genmove", &["white"]).1, "resign");
    }

    #[test]
    fn test_genmove_blocks_five() {
        for player in [Player::Flat, Player::Ucb, Player::ParUcb] {
            let mut engine = engine(player);
            for (b, w) in [("a1", "g7"), ("b1", "g6"), ("c1", "g5"), ("d1", "a7")] {
                engine.execute("play", &["b", b]);
                engine.execute("play", &["w", w]);
            }
            assert_eq!(engine.execute("genmove", &["w"]), (true, "E1".to_string()));
        }
    }

    #[test]
    fn test_genmove_answers_opening_nearby() {
        let mut engine = engine(Player::Ucb);
        engine.execute("play", &["b", "d4"]);
        let (ok, vertex) = engine.execute("genmove", &["w"]);
        assert!(ok);
        let pt = parse_move(&vertex, 7).unwrap();
        let d4 = parse_move("d4", 7).unwrap();
        let board = engine.board();
        assert!(board.neighbors(d4).contains(&pt) || board.diagonal_neighbors(d4).contains(&pt));
    }

    #[test]
    fn test_genmove_go_rules() {
        let mut engine = GtpEngine::new(5, Ruleset::Go, Player::Flat).unwrap().with_seed(3);
        let (ok, vertex) = engine.execute("genmove", &["black"]);
        assert!(ok);
        assert_ne!(vertex, "pass");
        assert_eq!(engine.board().current_player, Color::White);
        assert_eq!(engine.execute("gogui-rules_final_result", &[]).1, "unknown");
    }

    #[test]
    fn test_timelimit() {
        let mut engine = engine(Player::Ucb);
        assert!(engine.execute("timelimit", &["1"]).0);
        assert!(!engine.execute("timelimit", &["soon"]).0);
    }
}
