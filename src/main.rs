//! Plays a single game between the listed bots and prints the final table
use clap::Parser;
use rainworms::bots::{BotKind, BotSettings};
use rainworms::driver::GameDriver;
use rainworms::rainworms::{BustPenalty, DiceRoller, GameSettings};
use rand::Rng;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bots in seat order
    #[arg(
        short,
        long,
        value_delimiter = ',',
        value_enum,
        default_value = "greedy,greedy-stealing,tree-relative,tree-monte-carlo-relative"
    )]
    players: Vec<BotKind>,

    #[arg(short, long, default_value_t = 8)]
    dice: u8,

    #[arg(short, long, value_enum, default_value = "flip-top")]
    bust_penalty: BustPenalty,

    /// Claims need at least one kept Worm
    #[arg(long)]
    require_worm: bool,

    #[arg(short, long)]
    seed: Option<u64>,

    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    log::info!("Seed {}", seed);

    let player_count = match u8::try_from(args.players.len()) {
        Ok(count) => count,
        Err(_) => {
            log::error!("{} players is too many", args.players.len());
            std::process::exit(1);
        }
    };
    let settings = GameSettings {
        player_count,
        dice: args.dice,
        bust_penalty: args.bust_penalty,
        require_worm: args.require_worm,
        ..GameSettings::default()
    };
    let bots = args
        .players
        .iter()
        .enumerate()
        .map(|(seat, kind)| BotSettings::from(*kind).build(seed.wrapping_add(seat as u64 + 1)))
        .collect();

    let mut driver = match GameDriver::new(&settings, bots, DiceRoller::from_seed(seed)) {
        Ok(driver) => driver,
        Err(err) => {
            log::error!("Cannot set up the game: {}", err);
            std::process::exit(1);
        }
    };
    let names = driver.bot_names();
    match driver.run() {
        Ok(scores) => {
            println!("{}", driver.state());
            println!("Player\tBot\tWorms");
            for (i, (name, score)) in names.iter().zip(scores.iter()).enumerate() {
                println!("{}\t{}\t{}", i, name, score);
            }
        }
        Err(err) => {
            log::error!("Game stopped: {}", err);
            println!("{}", driver.state());
            std::process::exit(1);
        }
    }
}
