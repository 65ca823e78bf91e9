//! Headless fleet-combat runner.
//!
//! This binary runs the game without graphics, controlled via JSON on stdin/stdout.
//! Designed for AI agents, CI testing, and determinism checks.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode - read commands from stdin
//! cargo run -p fleet_headless
//!
//! # Play a scenario interactively
//! cargo run -p fleet_headless -- run --scenario scenarios/border.ron
//!
//! # Run the scripted battle and print its summary
//! cargo run -p fleet_headless -- simulate
//!
//! # Check a scenario file without playing it
//! cargo run -p fleet_headless -- validate scenarios/border.ron
//!
//! # Run the scripted battle several times and compare state hashes
//! cargo run -p fleet_headless -- verify --runs 10
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information
//!
//! See the protocol module for command/response format.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_headless::{
    battle::run_scripted_battle,
    protocol::Response,
    runner::HeadlessRunner,
    scenario::{load_or_standard, Scenario, ScenarioError},
};

#[derive(Parser)]
#[command(name = "fleet_headless")]
#[command(about = "Headless fleet-combat runner for AI testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single interactive game
    Run {
        /// Scenario file to load
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },

    /// Run the scripted battle and print its summary
    Simulate {
        /// Scenario file to load
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },

    /// Check that a scenario file parses and can start a game
    Validate {
        /// Scenario file to check
        file: PathBuf,
    },

    /// Verify determinism by running the scripted battle multiple times
    Verify {
        /// Scenario to test
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let result = match cli.command {
        Some(Commands::Run { scenario }) => cmd_run(scenario.as_deref()),
        Some(Commands::Simulate { scenario }) => cmd_simulate(scenario.as_deref()),
        Some(Commands::Validate { file }) => cmd_validate(&file),
        Some(Commands::Verify { scenario, runs }) => cmd_verify(scenario.as_deref(), runs),
        // Default: interactive mode
        None => cmd_run(None),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal");
            eprintln!("FATAL: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Run a single interactive game
fn cmd_run(scenario: Option<&Path>) -> Result<ExitCode, CliError> {
    let scenario = load_or_standard(scenario)?;
    tracing::info!(scenario = %scenario.name, "Starting interactive session");

    let mut runner = HeadlessRunner::with_game(scenario.build_game()?);
    let stdin = io::stdin();
    let stdout = io::stdout();
    runner.run(stdin.lock(), stdout.lock())?;

    tracing::info!(
        turn = runner.game().turn_number(),
        hash = runner.game().state_hash(),
        "Session ended"
    );
    Ok(ExitCode::SUCCESS)
}

/// Run the scripted battle once and print the summary as a JSON line
fn cmd_simulate(scenario: Option<&Path>) -> Result<ExitCode, CliError> {
    let scenario = load_or_standard(scenario)?;
    let mut game = scenario.build_game()?;
    let summary = run_scripted_battle(&mut game);
    print!("{}", Response::Simulated { summary }.to_json_line());
    Ok(ExitCode::SUCCESS)
}

/// Parse and validate a scenario file
fn cmd_validate(file: &Path) -> Result<ExitCode, CliError> {
    let scenario = Scenario::load(file)?;
    scenario.validate()?;
    eprintln!(
        "{}: OK ({} vs {} starships)",
        scenario.name,
        scenario.setup.player_one.ship_count(),
        scenario.setup.player_two.ship_count()
    );
    Ok(ExitCode::SUCCESS)
}

/// Run the scripted battle `runs` times and compare final state hashes
fn cmd_verify(scenario: Option<&Path>, runs: u32) -> Result<ExitCode, CliError> {
    let scenario = load_or_standard(scenario)?;
    tracing::info!(scenario = %scenario.name, runs, "Verifying determinism");

    let mut hashes = Vec::new();
    for run in 0..runs.max(1) {
        let mut game = scenario.build_game()?;
        run_scripted_battle(&mut game);
        let hash = game.state_hash();
        tracing::debug!(run, hash, "Run complete");
        hashes.push(hash);
    }

    let deterministic = hashes.windows(2).all(|pair| pair[0] == pair[1]);
    if deterministic {
        eprintln!("PASS: {} runs produced hash {:#018x}", hashes.len(), hashes[0]);
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("FAIL: hashes diverged");
        for (run, hash) in hashes.iter().enumerate() {
            eprintln!("  run {run}: {hash:#018x}");
        }
        Ok(ExitCode::FAILURE)
    }
}
