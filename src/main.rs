//! Stoneplay: Monte-Carlo Gomoku engine.
//!
//! ## Usage
//!
//! - `stoneplay` - Start the GTP server
//! - `stoneplay gtp` - Start the GTP server for GUI integration
//! - `stoneplay demo` - Let the engine play a game against itself
//!
//! Logging goes to stderr; set `RUST_LOG=debug` to follow the search.

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use stoneplay::constants::{DEFAULT_SIZE, N_SIMS, TRIALS_PER_MOVE};
use stoneplay::gtp::{GtpEngine, Player};
use stoneplay::position::Ruleset;

/// Stoneplay: Monte-Carlo Gomoku engine
#[derive(Parser)]
#[command(name = "stoneplay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board size
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Rules to play by
    #[arg(long, value_enum, default_value_t = Ruleset::Gomoku)]
    rules: Ruleset,

    /// Move-selection algorithm
    #[arg(long, value_enum, default_value_t = Player::Ucb)]
    player: Player,

    /// Rollouts per candidate for the flat player
    #[arg(long, default_value_t = N_SIMS)]
    sims: usize,

    /// UCB1 trials per candidate move
    #[arg(long, default_value_t = TRIALS_PER_MOVE)]
    trials_per_move: usize,

    /// Seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
    /// Play one engine-versus-engine game and print it
    Demo,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut engine = GtpEngine::new(cli.size, cli.rules, cli.player)?
        .with_simulations(cli.sims)
        .with_trials_per_move(cli.trials_per_move);
    if let Some(seed) = cli.seed {
        engine = engine.with_seed(seed);
    }

    match cli.command {
        Some(Commands::Gtp) | None => engine.run(),
        Some(Commands::Demo) => {
            run_demo(&mut engine);
            Ok(())
        }
    }
}

fn run_demo(engine: &mut GtpEngine) {
    println!("Stoneplay self-play demo\n");

    let size = engine.board().size;
    for ply in 0..size * size {
        let color = if ply % 2 == 0 { "black" } else { "white" };
        let (ok, reply) = engine.execute("genmove", &[color]);
        if !ok {
            println!("genmove failed: {reply}");
            break;
        }
        if reply == "resign" || reply == "pass" {
            break;
        }
        info!("ply {}: {color} {reply}", ply + 1);
        println!("{:>3}. {color:<5} {reply}", ply + 1);
    }

    let (_, board) = engine.execute("showboard", &[]);
    println!("{board}");
    let (_, result) = engine.execute("gogui-rules_final_result", &[]);
    println!("Result: {result}");
}
