use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use engarde::{Config, Mode};
use engarde_console::{Flow, Recorder, Session};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// The ruleset, "basic" or "advanced"
    #[arg(short, long, default_value = "basic")]
    mode: Mode,

    /// RNG seed for shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Record every finished round as a JSON file into this directory
    #[arg(short, long)]
    record_to: Option<PathBuf>,

    /// Print snapshots and responses as JSON lines instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, mode = %args.mode);

    let recorder = if let Some(dir_path) = args.record_to {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let config = Config {
        mode: args.mode,
        seed: Some(seed),
    };
    let mut session = Session::new(config, recorder, args.json);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    session.print_state(&mut stdout)?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let flow = session.handle_line(&line, &mut stdout)?;
        stdout.flush()?;
        if flow == Flow::Quit {
            break;
        }
    }

    Ok(())
}

// Logs go to stderr, stdout only carries the game.
fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
