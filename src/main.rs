use std::io::{self, Stdout, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use slider::clock::SystemClock;
use slider::config;
use slider::input::TerminalInput;
use slider::render::Canvas;
use slider::screen::{self, ScreenOutcome, Session};

/// Default log level when not specified
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file path (no logging to file)
const DEFAULT_LOG_FILE: &str = "/dev/null";

#[derive(Parser)]
#[command(name = "slider")]
#[command(about = "Sliding tile puzzle for the terminal", long_about = None)]
struct Cli {
    /// Start straight into an N x N puzzle instead of the menu
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(3..=6))]
    size: Option<u8>,

    /// Config file (default: <config dir>/slider/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of random moves used to scramble the board
    #[arg(long)]
    shuffle_steps: Option<usize>,

    /// Seed for reproducible shuffles
    #[arg(long)]
    seed: Option<u64>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log file path (default: /dev/null for no logging)
    #[arg(short = 'F', long, default_value = DEFAULT_LOG_FILE)]
    log_file: String,
}

fn init_logging(log_level: &str, log_file: &str) {
    let file = match std::fs::OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file, e);
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.log_file != DEFAULT_LOG_FILE {
        init_logging(&cli.log_level, &cli.log_file);
    }

    let mut config = config::read(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(steps) = cli.shuffle_steps {
        config.shuffle_steps = steps;
    }
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let first = match cli.size {
        Some(size) => ScreenOutcome::Play(size as usize),
        None => ScreenOutcome::Menu,
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;

    let (width, height) = terminal::size()?;
    let session = Session::new(
        Canvas::new(width, height),
        TerminalInput,
        SystemClock::new(),
        stdout,
        config,
        rng,
    );
    let result = run(session, first);

    // Restore terminal
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, Show, DisableMouseCapture, LeaveAlternateScreen)?;
    stdout.flush()?;

    result
}

/// Alternate between screens until one of them asks to quit.
fn run(mut session: Session<TerminalInput, SystemClock, Stdout>, first: ScreenOutcome) -> anyhow::Result<()> {
    let mut next = first;
    while next != ScreenOutcome::Quit {
        // Each screen lays itself out against the terminal size at the time it opens.
        let (width, height) = terminal::size()?;
        if (width, height) != (session.canvas.width(), session.canvas.height()) {
            session.canvas.resize(width, height);
        }
        next = screen::run_screen(&mut session, next)?;
    }
    tracing::info!("quit requested");
    Ok(())
}
