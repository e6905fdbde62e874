//! Plays configurations of the bots against one another
use clap::Parser;
use env_logger::{fmt::Formatter, Builder};
use log::Record;
use rainworms::config::{load_arena_settings, ArenaSettings};
use rainworms::driver::GameDriver;
use rainworms::rainworms::DiceRoller;
use rainworms::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::thread;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg()]
    config_file: String,
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn run_episode(settings: &ArenaSettings, rng: &mut StdRng) -> Result<(Vec<String>, Vec<u32>)> {
    let bots = settings
        .players
        .iter()
        .map(|player| player.build(rng.gen()))
        .collect();
    let mut driver = GameDriver::new(&settings.game, bots, DiceRoller::from_seed(rng.gen()))?;
    let scores = driver.run()?;
    log::debug!("Final table:\n{}", driver.state());
    Ok((driver.bot_names(), scores))
}

/// Bots of the same kind get their seat appended so the results stay apart
fn unique_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .enumerate()
        .map(|(seat, name)| {
            if names.iter().filter(|other| *other == name).count() > 1 {
                format!("{}_{}", name, seat + 1)
            } else {
                name.clone()
            }
        })
        .collect()
}

fn mean_and_deviation(values: &[u32]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let count = values.len() as f64;
    let mean = values.iter().map(|v| *v as f64).sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|v| (*v as f64 - mean).powi(2))
        .sum::<f64>()
        / count;
    (mean, variance.sqrt())
}

fn main() {
    let args = Args::parse();
    Builder::new()
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

    let arena_settings = match load_arena_settings(&args.config_file) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };
    let mut rng = match arena_settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut names = vec![];
    let mut results: Vec<Vec<u32>> = vec![vec![]; arena_settings.players.len()];
    for episode in 0..arena_settings.episodes {
        log::info!("Starting episode {}", episode);
        match run_episode(&arena_settings, &mut rng) {
            Ok((episode_names, scores)) => {
                names = episode_names;
                for (i, score) in scores.iter().enumerate() {
                    results[i].push(*score);
                }
            }
            Err(err) => {
                log::error!("Episode {} failed: {}", episode, err);
                std::process::exit(1);
            }
        }
    }

    println!("Player\tBot\tMean\tStd dev");
    for (i, (name, scores)) in unique_names(&names).iter().zip(results.iter()).enumerate() {
        let (mean, deviation) = mean_and_deviation(scores);
        println!("{}\t{}\t{:.2}\t{:.2}", i + 1, name, mean, deviation);
    }
}
