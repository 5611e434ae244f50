use std::io;
use std::path::PathBuf;

use clap::Parser;
use grid_snake::app::{App, AppOptions};
use grid_snake::config::{DEFAULT_FRUIT_COUNT, RoundConfig};
use grid_snake::grid::Grid;
use grid_snake::leaderboard::{Leaderboard, leaderboard_path};
use grid_snake::logging;
use grid_snake::terminal_runtime::TerminalSession;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Player name prefilled in the menu.
    #[arg(long, default_value = "")]
    name: String,

    /// Fruits kept on the board at once (clamped to 1..=9).
    #[arg(long, default_value_t = DEFAULT_FRUIT_COUNT)]
    fruits: usize,

    /// Seed for reproducible fruit placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Leaderboard file (defaults to the platform data directory).
    #[arg(long)]
    leaderboard: Option<PathBuf>,

    /// Log file (defaults to the platform data directory).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::log_path);
    if let Err(error) = logging::init(&log_path) {
        eprintln!("Logging disabled ({}): {error}", log_path.display());
    }

    let board_path = cli.leaderboard.clone().unwrap_or_else(leaderboard_path);
    let leaderboard = match Leaderboard::load(&board_path) {
        Ok(board) => board,
        Err(error) => {
            // Warn before raw mode so the message stays readable.
            eprintln!(
                "Warning: could not read leaderboard at {}: {error}",
                board_path.display()
            );
            warn!(%error, "starting with an empty leaderboard");
            Leaderboard::new()
        }
    };

    let mut app = App::new(
        AppOptions {
            initial_config: RoundConfig::new(cli.name, cli.fruits),
            seed: cli.seed,
            leaderboard_path: Some(board_path),
        },
        leaderboard,
        Grid::standard(),
    );

    info!("starting");
    TerminalSession::enter()?.run(&mut app)?;
    info!("quit");
    Ok(())
}
