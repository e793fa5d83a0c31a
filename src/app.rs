//! Ties everything together: CLI parsing, config resolution, and the
//! per-second countdown loop.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::ArgAction;
use tracing::{debug, info};

use crate::cli::{self, CliOption};
use crate::codec;
use crate::config::{self, PucotiConfig};
use crate::countdown::{BellSchedule, CountdownCallback, CountdownState};
use crate::duration::fmt_duration;
use crate::error::ConfigError;
use crate::history;
use crate::resolve::{self, ResolveInput};
use crate::schema::Schema;

const GEN_CONFIG_FLAG: &str = "gen-config";

/// Parse the command line and resolve the effective configuration.
///
/// Precedence, lowest first: schema defaults, then the persisted config
/// file, then flags explicitly passed on the command line. `--gen-config`
/// prints the default config document and exits before any of that.
pub fn load_config(argv: Vec<String>) -> Result<PucotiConfig, ConfigError> {
    let schema = config::schema();
    let options = cli::build_options(&schema, &["initial_timer"])?;
    let matches = build_command(&schema, &options).get_matches_from(argv);

    if matches.get_flag(GEN_CONFIG_FLAG) {
        print!("{}", codec::generate_document(&schema)?);
        std::process::exit(0);
    }

    let document = read_config_file()?;
    let cli_overrides = cli::matches_to_overrides(&matches, &options)?;
    let tree = resolve::resolve(ResolveInput {
        schema: &schema,
        document,
        cli_overrides,
    })?;
    PucotiConfig::from_tree(&tree)
}

fn build_command(schema: &Schema, options: &[CliOption]) -> clap::Command {
    cli::build_command("pucoti", schema.doc.unwrap_or_default(), options).arg(
        clap::Arg::new(GEN_CONFIG_FLAG)
            .long(GEN_CONFIG_FLAG)
            .action(ArgAction::SetTrue)
            .help("Print the default configuration file and exit"),
    )
}

fn read_config_file() -> Result<Option<(PathBuf, String)>, ConfigError> {
    let Some(path) = config::config_file() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(None);
    }
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        action: "read",
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "loaded config file");
    Ok(Some((path, text)))
}

/// Expand and create the history file without writing any entries;
/// purposes are only appended when the user records one.
fn prepare_history(configured: &Path) -> Result<PathBuf, ConfigError> {
    let path = history::expand_user(configured);
    history::ensure_file(&path)?;
    Ok(path)
}

fn now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Run the countdown until interrupted, printing the remaining time once
/// per second and ringing the bell when the time is up.
pub fn run(config: PucotiConfig) -> Result<(), ConfigError> {
    let history_file = prepare_history(&config.history_file)?;

    let mut state = CountdownState::new(now(), config.initial_timer);
    let mut bell = BellSchedule::new(config.ring_every, config.ring_count);
    let mut callbacks: Vec<CountdownCallback> =
        config.run_at.iter().map(CountdownCallback::new).collect();

    info!(
        initial = config.initial_timer,
        history = %history_file.display(),
        "countdown started"
    );

    loop {
        let now = now();
        let remaining = state.remaining(now);

        let mut stdout = io::stdout();
        write!(stdout, "\r{}  ", fmt_duration(remaining.floor() as i64)).and_then(|()| stdout.flush()).map_err(
            |source| ConfigError::Io {
                action: "write to",
                path: PathBuf::from("stdout"),
                source,
            },
        )?;

        if bell.should_ring(remaining, now) {
            ring(&config);
            if config.restart {
                state.reset(now);
            }
        }

        for callback in &mut callbacks {
            callback.update(state.remaining(now));
        }

        thread::sleep(Duration::from_millis(250));
    }
}

fn ring(config: &PucotiConfig) {
    info!(bell = %config.bell.display(), "time is up");
    // Terminal bell as a fallback next to the configured sound file.
    print!("\x07");
}

/// Install the tracing subscriber, filtered by `RUST_LOG`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}
