mod game;

use anyhow::Result;
use clap::Parser;

use crate::game::{GameMode, run};

#[derive(Parser, Debug)]
#[command(name = "othello", about = "Console Othello with a two-worker search engine")]
struct Cli {
    /// Game mode: MC (you vs CPU), CM (CPU vs you), CC, MM. Prompted when omitted.
    #[arg(long, value_parser = parse_mode)]
    mode: Option<GameMode>,

    /// Built-in strategy schedule index; picked at random per game when omitted.
    #[arg(long)]
    strategy: Option<usize>,

    /// Worker threads for the search engine (1 forces serial).
    #[arg(long, default_value = "2")]
    threads: usize,
}

fn parse_mode(s: &str) -> Result<GameMode, String> {
    match s.to_ascii_uppercase().as_str() {
        "MC" => Ok(GameMode { white_is_cpu: false, black_is_cpu: true }),
        "CM" => Ok(GameMode { white_is_cpu: true, black_is_cpu: false }),
        "CC" => Ok(GameMode { white_is_cpu: true, black_is_cpu: true }),
        "MM" => Ok(GameMode { white_is_cpu: false, black_is_cpu: false }),
        _ => Err("expected one of MC, CM, CC, MM".to_string()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    if let Some(index) = args.strategy
        && index >= othello_core::strategy::StrategySchedule::builtin_count()
    {
        anyhow::bail!(
            "strategy index out of range (0..{})",
            othello_core::strategy::StrategySchedule::builtin_count()
        );
    }

    run(args.mode, args.strategy, args.threads)
}
