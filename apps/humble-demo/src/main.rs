//! humble demo
//!
//! Replays the demo screens headlessly and prints the stack after each action.

use clap::{Parser, ValueEnum};
use humble_core::ReconcilerOptions;
use humble_demo::{blocks, screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Two labels and a button
    Screen,
    /// Selectable blocks with a running total
    Blocks,
}

#[derive(Debug, Parser)]
#[command(name = "humble-demo")]
#[command(about = "Declarative view reconciliation demos", long_about = None)]
struct Cli {
    #[arg(long, value_enum, default_value_t = Scenario::Screen)]
    scenario: Scenario,

    /// Views kept per kind for reuse (0 disables pooling)
    #[arg(long, default_value_t = 8)]
    pool_limit: usize,

    /// Build a new view for every insert instead of reusing moved ones
    #[arg(long)]
    no_move_reuse: bool,

    /// Number of blocks in the blocks scenario
    #[arg(long, default_value_t = 12)]
    blocks: usize,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let options = ReconcilerOptions::default()
        .pool_limit_per_kind(cli.pool_limit)
        .reuse_moved_views(!cli.no_move_reuse);

    let result = match cli.scenario {
        Scenario::Screen => screen::run(options),
        Scenario::Blocks => blocks::run(options, cli.blocks),
    };

    match result {
        Ok(transcript) => print!("{transcript}"),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
