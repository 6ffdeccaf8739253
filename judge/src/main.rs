use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use itertools::Itertools;
use judge::{play_game, AgentKind, GameResult, Lineup, Recorder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use splendor::{Catalog, MAX_PLAYERS};
use td_bot::{load_network, LearnerConfig, Variant};
use tracing::{debug, error, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Number of seats. The first one is always the learning agent
    #[arg(short, long, env = "PLAYERS", default_value_t = 1)]
    players: usize,

    /// How many games to play
    #[arg(short, long, env = "ROUNDS", default_value_t = 3)]
    rounds: usize,

    /// RNG seed
    #[arg(long, env = "SEED")]
    seed: Option<u64>,

    /// Who takes the other seats: "td", "random" or "greedy"
    #[arg(short, long, default_value = "td")]
    opponent: AgentKind,

    /// "elaborate" or "simplified"
    #[arg(long, default_value = "elaborate")]
    variant: Variant,

    /// Probability that a learner plays a random action
    #[arg(short, long, env = "EPSILON", default_value_t = 0.5)]
    epsilon: f64,

    #[arg(long, default_value_t = 0.001)]
    learning_rate: f64,

    /// Only play, without updating or saving the network
    #[arg(long, default_value_t = false)]
    no_training: bool,

    /// Where the network is loaded from and saved to. Defaults per variant
    #[arg(short, long)]
    model_path: Option<PathBuf>,

    /// Games with nobody past the winning score after this many turns are draws
    #[arg(long, default_value_t = 500)]
    max_turns: usize,

    /// Card table to use instead of the built-in one (requires --nobles)
    #[arg(long, requires = "nobles")]
    cards: Option<PathBuf>,

    /// Noble table to use instead of the built-in one (requires --cards)
    #[arg(long, requires = "cards")]
    nobles: Option<PathBuf>,

    /// Record the games as JSON files into this directory
    #[arg(long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

impl Args {
    fn learner_config(&self) -> LearnerConfig {
        let mut config = LearnerConfig::new(self.variant);
        config.training = !self.no_training;
        config.epsilon = self.epsilon;
        config.learning_rate = self.learning_rate;
        if let Some(path) = &self.model_path {
            config.model_path = path.clone();
        }
        config
    }

    fn catalog(&self) -> anyhow::Result<Catalog> {
        match (&self.cards, &self.nobles) {
            (Some(cards), Some(nobles)) => {
                let cards = std::fs::read_to_string(cards)
                    .with_context(|| format!("Could not read {}", cards.display()))?;
                let nobles = std::fs::read_to_string(nobles)
                    .with_context(|| format!("Could not read {}", nobles.display()))?;
                Ok(Catalog::from_json(&cards, &nobles)?)
            }
            _ => Ok(Catalog::standard()?),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    anyhow::ensure!(
        (1..=MAX_PLAYERS).contains(&args.players),
        "Between 1 and {} players can play, not {}",
        MAX_PLAYERS,
        args.players
    );
    anyhow::ensure!(
        (0.0..=1.0).contains(&args.epsilon),
        "Epsilon must be between 0 and 1, not {}",
        args.epsilon
    );

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let catalog = args.catalog()?;
    let config = args.learner_config();
    let network = load_network(&config, &mut rng);
    debug!(shape = ?network.borrow().shape(), path = %config.model_path.display(), "Network ready");

    let mut recorder = if let Some(dir_path) = args.record_games_to_directory.clone() {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let lineup = Lineup::new(args.players, args.opponent);
    let mut wins = vec![0; args.players];
    let mut draws = 0;
    let mut turns = Vec::with_capacity(args.rounds);

    for round in 0..args.rounds {
        info!("Round {} / {}", round + 1, args.rounds);
        let mut agents = lineup.agents(&config, &network, &mut rng);
        match play_game(&mut rng, &catalog, &mut agents, args.max_turns, &mut recorder)? {
            GameResult::WonByPlayer { player_idx, turns: n } => {
                info!(winner = agents[player_idx].name(), turns = n, "Game over");
                wins[player_idx] += 1;
                turns.push(n);
            }
            GameResult::TurnLimitReached { turns: n } => {
                info!(turns = n, "Draw, turn limit reached");
                draws += 1;
                turns.push(n);
            }
            GameResult::IllegalMoveByPlayer {
                player_idx,
                err,
                state,
            } => {
                error!(player = agents[player_idx].name(), "Illegal move by player");
                let mut err_dyn = &err as &dyn std::error::Error;
                while let Some(src_err) = err_dyn.source() {
                    error!("{}", err_dyn);
                    err_dyn = src_err;
                }
                error!("{}", err_dyn);
                eprintln!("{}", serde_json::to_string_pretty(&state)?);
                anyhow::bail!("{} played an illegal move", agents[player_idx].name());
            }
        }
        let average = turns.iter().sum::<usize>() as f64 / turns.len() as f64;
        info!("avg turns: {:.3}", average);
    }

    eprintln!(
        "End result:\n{}\n- {} draws",
        wins.iter()
            .zip(&lineup.seats)
            .enumerate()
            .map(|(idx, (wins, kind))| format!("- {} wins by {} {}", wins, kind, idx + 1))
            .join("\n"),
        draws
    );

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
