use anyhow::Result;
use clap::{Parser, Subcommand};
use configuration::cli::ConfigOverrides;
use configuration::{GameConfig, load_config_from};
use core_types::PickSlot;
use engine::{GameEngine, status_message};
use report::Report;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the stock league.
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; RUST_LOG and LEAGUE__* may come from the shell.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => {
            handle_play(args).await?;
        }
        Commands::Prices(args) => {
            handle_prices(args).await?;
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A fantasy stock league played against a simulated market.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register picks, run the market and print the leaderboard every few seconds.
    Play(PlayArgs),
    /// Print the opening price table once, with no players.
    Prices(PricesArgs),
}

#[derive(Parser)]
struct PlayArgs {
    /// One user's picks as "SYM,SYM,SYM[:CAPTAIN[:VICE]]". Repeat for each user, in order.
    #[arg(long = "user", required = true)]
    users: Vec<PickSlot>,

    /// How many reports to print before exiting.
    #[arg(long, default_value_t = 5)]
    rounds: u32,

    /// Seconds to wait between two reports.
    #[arg(long, default_value_t = 3)]
    every: u64,

    /// Print each report as JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[derive(Parser)]
struct PricesArgs {
    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Loads the file and environment layers, then applies command-line flags on top.
fn build_config(overrides: &ConfigOverrides) -> Result<GameConfig> {
    let mut config = load_config_from(&overrides.config)?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.render());
    }
    Ok(())
}

async fn handle_play(args: PlayArgs) -> Result<()> {
    let config = build_config(&args.overrides)?;
    let engine = GameEngine::new(&config)?;

    let outcome = engine.register_picks(args.users).await;
    println!("{}", status_message(&outcome));
    outcome?;

    let simulator = engine.spawn_simulator();
    let mut ticker = tokio::time::interval(Duration::from_secs(args.every.max(1)));
    // The first tick completes immediately, so round one shows the opening state.
    for round in 1..=args.rounds {
        ticker.tick().await;
        tracing::debug!(round, "Printing report.");
        print_report(&engine.get_report().await, args.json)?;
    }

    simulator.abort();
    Ok(())
}

async fn handle_prices(args: PricesArgs) -> Result<()> {
    let config = build_config(&args.overrides)?;
    let engine = GameEngine::new(&config)?;
    print_report(&engine.get_report().await, args.json)
}
