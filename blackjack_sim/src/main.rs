use blackjack_lib::{GameConfig, GameSession, StakeAccounting};
use blackjack_sim::prelude::*;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "blackjack_sim",
    about = "Single player blackjack with a Hi-Lo counted shoe"
)]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of decks in the shoe
    #[arg(long, global = true)]
    decks: Option<usize>,

    /// Starting bankroll
    #[arg(long, global = true)]
    bankroll: Option<u32>,

    /// Table minimum bet
    #[arg(long, global = true)]
    min_bet: Option<u32>,

    /// Seed for the shoe's shuffles
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Settle every hand on its own stake instead of splitting the round's total evenly
    #[arg(long, global = true)]
    per_hand_stakes: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play at the console (default)
    Play,
    /// Autoplay many sessions and summarize the results per betting strategy
    Simulate {
        /// Sessions played per strategy
        #[arg(long, default_value_t = 100)]
        simulations: u32,

        /// Maximum rounds per session
        #[arg(long, default_value_t = 50)]
        rounds: u32,

        /// Margins for Hi-Lo margin betting, one strategy each
        #[arg(long, value_delimiter = ',', default_value = "3.0")]
        margin: Vec<f32>,

        /// Print a summary after every session
        #[arg(long)]
        show_sessions: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write summaries to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn game_config(cli: &Cli) -> Result<GameConfig, SimulationError> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<GameConfig>(&text)?
        }
        None => GameConfig::default(),
    };
    if let Some(decks) = cli.decks {
        config.num_decks = decks;
    }
    if let Some(bankroll) = cli.bankroll {
        config.starting_bankroll = bankroll;
    }
    if let Some(min_bet) = cli.min_bet {
        config.min_bet = min_bet;
    }
    if cli.per_hand_stakes {
        config.stake_accounting = StakeAccounting::PerHand;
    }
    config.validate()?;
    log::info!("game configuration: {:?}", config);
    Ok(config)
}

fn play(config: GameConfig, seed: Option<u64>) -> Result<(), SimulationError> {
    let session = match seed {
        Some(seed) => GameSession::seeded(config, seed)?,
        None => GameSession::new(config)?,
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    ConsoleSession::new(session, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}

fn simulate(cli: &Cli, config: GameConfig) -> Result<(), SimulationError> {
    let Some(Commands::Simulate {
        simulations,
        rounds,
        margin,
        show_sessions,
        format,
        output,
    }) = &cli.command
    else {
        return Ok(());
    };

    let mut builder = SimulatorConfig::new();
    builder
        .game(config)
        .num_simulations(*simulations)
        .rounds_per_simulation(*rounds)
        .silent(!*show_sessions);
    if let Some(seed) = cli.seed {
        builder.seed(seed);
    }
    let sim_config = builder.build()?;

    let mut simulator = MulStrategyBlackjackSimulator::new(sim_config);
    simulator.simulation(FlatBetting::new(config.min_bet));
    for m in margin {
        simulator.simulation(MarginBettingStrategy::new(*m, config.min_bet));
    }
    let mut simulator = simulator.build();

    let out: Box<dyn Write + Send> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    log::info!("running {} strategies", simulator.len());
    simulator.run(out, *format)
}

fn run(cli: &Cli) -> Result<(), SimulationError> {
    let config = game_config(cli)?;
    match cli.command {
        None | Some(Commands::Play) => play(config, cli.seed),
        Some(Commands::Simulate { .. }) => simulate(cli, config),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
