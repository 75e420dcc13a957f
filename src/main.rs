use std::fs::File;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use duel_snake::config::GameConfig;
use duel_snake::driver::TickTimer;
use duel_snake::game::{GameState, GameStatus, TickOutcome};
use duel_snake::input::{InputHandler, TerminalInput};
use duel_snake::terminal_runtime::{TerminalSession, restore_terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Upper bound on how long one input poll may block between frames.
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; defaults to the user config directory when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tick interval in milliseconds.
    #[arg(long)]
    speed: Option<u64>,

    /// Number of pellets kept on the board.
    #[arg(long)]
    food: Option<usize>,

    /// Seed for pellet placement, for reproducible sessions.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by `RUST_LOG`, default `info`).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        if let Err(error) = init_logging(path) {
            eprintln!("Failed to open log file {}: {error}", path.display());
            return ExitCode::FAILURE;
        }
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Invalid configuration: {error}");
            return ExitCode::FAILURE;
        }
    };

    let state = match cli.seed {
        Some(seed) => GameState::new_with_seed(&config, seed),
        None => GameState::new(&config),
    };
    let state = match state {
        Ok(state) => state,
        Err(error) => {
            eprintln!("Invalid configuration: {error}");
            return ExitCode::FAILURE;
        }
    };

    install_panic_hook();

    match run(state, config.tick_interval()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "terminal error");
            eprintln!("Terminal error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig, duel_snake::config::ConfigError> {
    let mut config = GameConfig::resolve(cli.config.as_deref())?;

    if let Some(speed) = cli.speed {
        config.tick_interval_ms = speed;
    }
    if let Some(food) = cli.food {
        config.target_food_count = food;
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

/// Drives the game: owns the tick interval and input subscription, and
/// releases both once the game is over.
fn run(mut state: GameState, tick_interval: Duration) -> io::Result<()> {
    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new(MAX_POLL_INTERVAL);
    let mut timer = TickTimer::new(tick_interval);

    info!(
        snakes = state.snakes.len(),
        interval_ms = tick_interval.as_millis(),
        "game started"
    );
    timer.start(Instant::now());

    loop {
        session.draw(&state.snapshot())?;

        let until_tick = timer.remaining(Instant::now());
        if let Some(terminal_input) = input.poll_input(until_tick)? {
            match terminal_input {
                TerminalInput::Quit => break,
                TerminalInput::Confirm if state.status == GameStatus::GameOver => break,
                TerminalInput::Key(key) if timer.is_running() => state.handle_key(&key),
                TerminalInput::Key(_) | TerminalInput::Confirm => {}
            }
        }

        let now = Instant::now();
        if timer.is_due(now) {
            timer.mark(now);
            if let TickOutcome::GameOver { casualties } = state.advance_tick() {
                info!(tick = state.tick_count, ?casualties, "stopping tick timer");
                timer.stop();
            }
        }
    }

    info!(tick = state.tick_count, "session closed");
    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}
