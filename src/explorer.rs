//! Searches the first decision of fresh games and saves every root action's value
use clap::Parser;
use env_logger::fmt::Formatter;
use log::Record;
use rainworms::rainworms::{Absolute, DiceRoller, GameSettings, GameState, Relative, RwAction};
use rainworms::search::{Evaluator, SearchEngine, SearchMode, SearchSettings};
use serde::Serialize;
use std::io::Write;
use std::thread;
use std::time::Instant;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Objective {
    Absolute,
    Relative,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(value_enum)]
    mode: SearchMode,
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
    #[arg(short, long, value_enum, default_value = "relative")]
    objective: Objective,
    #[arg(short, long, default_value_t = 10)]
    rollouts: usize,
    #[arg(short, long, default_value_t = 1)]
    threads: usize,
    #[arg(short, long, default_value_t = 10)]
    episodes: usize,
    #[arg(short, long, default_value_t = 4)]
    player_count: u8,
    #[arg(short('f'), long, default_value = None)]
    reports_folder: Option<String>,
}

#[derive(Serialize)]
struct Exploration {
    seed: u64,
    state: String,
    seconds: f64,
    report: rainworms::search::SearchReport<RwAction>,
}

fn opening_position(player_count: u8, seed: u64) -> rainworms::Result<GameState> {
    let mut state = GameState::new(&GameSettings::with_players(player_count))?;
    let mut roller = DiceRoller::from_seed(seed);
    state.apply(RwAction::Roll)?;
    state.apply(RwAction::Dice(roller.roll_hand(state.dice_remaining())?))?;
    Ok(state)
}

fn run_explore(
    args: &Args,
    evaluator: &dyn Evaluator<GameState>,
    seed: u64,
    report_path: &str,
) -> Result<(), String> {
    let state = opening_position(args.player_count, seed).map_err(|err| err.to_string())?;

    let settings = SearchSettings {
        mode: args.mode,
        rollouts: args.rollouts,
        threads: args.threads,
        ..SearchSettings::default()
    };
    let start = Instant::now();
    let report = SearchEngine::new(settings, seed)
        .search(&state, evaluator)
        .map_err(|err| err.to_string())?;
    let seconds = start.elapsed().as_secs_f64();
    println!(
        "Seed {}: {} nodes in {:.2} seconds, best {}",
        seed, report.nodes, seconds, report.best
    );

    let exploration = Exploration {
        seed,
        state: state.to_string(),
        seconds,
        report,
    };
    let serialized = serde_json::to_string_pretty(&exploration).map_err(|err| err.to_string())?;
    std::fs::write(format!("{}.json", report_path), serialized).map_err(|err| err.to_string())
}

fn main() {
    let args = Args::parse();

    let reports_folder = args.reports_folder.clone().unwrap_or_else(|| {
        format!(
            "reports/{:?}/{}",
            args.mode,
            chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
        )
    });

    if let Err(err) = std::fs::create_dir_all(&reports_folder) {
        eprintln!(
            "Failed to create reports folder {}: {}",
            reports_folder, err
        );
        std::process::exit(1);
    }

    println!(
        "===\nMode: {:?}, Episodes: {}, Threads: {}, Path: {}",
        args.mode, args.episodes, args.threads, &reports_folder
    );
    println!("---");
    env_logger::Builder::new()
        .format(|buf: &mut Formatter, record: &Record| {
            let thread_id = thread::current().id();
            let timestamp = buf.timestamp_millis();
            writeln!(
                buf,
                "[{}] [Thread: {:?}] [{}] - {}",
                timestamp,
                thread_id,
                record.level(),
                record.args()
            )
        })
        .filter_level(args.verbose.log_level_filter())
        .init();

    let evaluator: &dyn Evaluator<GameState> = match args.objective {
        Objective::Absolute => &Absolute,
        Objective::Relative => &Relative,
    };
    for episode in 0..args.episodes {
        let filename = format!("{}/{}", reports_folder, episode);
        if let Err(err) = run_explore(&args, evaluator, episode as u64, &filename) {
            log::error!("Exploration {} failed: {}", episode, err);
            std::process::exit(1);
        }
    }
}
