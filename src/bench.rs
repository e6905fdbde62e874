//! Benchmarks the turn search by timing the first decision after the opening roll
use clap::Parser;
use rainworms::rainworms::{DiceRoller, GameSettings, GameState, Relative, RwAction};
use rainworms::search::{SearchEngine, SearchMode, SearchSettings};
use rainworms::Result;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(value_enum)]
    mode: SearchMode,
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
    #[arg(short, long, default_value_t = 10)]
    rollouts: usize,
    #[arg(short, long, default_value_t = 1)]
    threads: usize,
    #[arg(short, long, default_value_t = 10)]
    episodes: usize,
    #[arg(short, long, default_value_t = 4)]
    player_count: u8,
    #[arg(short, long, default_value_t = 8)]
    dice: u8,
}

fn run_benchmark(args: &Args, seed: u64) -> Result<(f64, usize)> {
    let mut state = GameState::new(&GameSettings {
        player_count: args.player_count,
        dice: args.dice,
        ..GameSettings::default()
    })?;
    let mut roller = DiceRoller::from_seed(seed);
    state.apply(RwAction::Roll)?;
    state.apply(RwAction::Dice(roller.roll_hand(args.dice)?))?;

    let settings = SearchSettings {
        mode: args.mode,
        rollouts: args.rollouts,
        threads: args.threads,
        ..SearchSettings::default()
    };
    let mut engine = SearchEngine::new(settings, seed);
    let start = Instant::now();
    let report = engine.search(&state, &Relative)?;
    let elapsed = start.elapsed();
    println!(
        "{} nodes in {:.2} seconds ({:.2} nodes per second), chose {:?}",
        report.nodes,
        elapsed.as_secs_f64(),
        report.nodes as f64 / elapsed.as_secs_f64(),
        report.best
    );
    Ok((elapsed.as_secs_f64(), report.nodes))
}

fn main() {
    let args = Args::parse();
    println!(
        "===\nMode: {:?}, Episodes: {}, Threads: {}, Rollouts: {}",
        args.mode, args.episodes, args.threads, args.rollouts
    );
    println!("---");
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut durations = vec![];
    let mut nodes = 0;
    for episode in 0..args.episodes {
        match run_benchmark(&args, episode as u64) {
            Ok((duration, episode_nodes)) => {
                durations.push(duration);
                nodes += episode_nodes;
            }
            Err(err) => {
                log::error!("Benchmark failed: {}", err);
                std::process::exit(1);
            }
        }
    }
    println!("---");
    println!(
        "Average duration: {:.2} seconds",
        durations.iter().sum::<f64>() / durations.len() as f64
    );
    println!(
        "Average nodes per second: {:.2}",
        nodes as f64 / durations.iter().sum::<f64>()
    );
}
