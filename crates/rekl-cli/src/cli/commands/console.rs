//! Default command: the sending console.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use rekl_core::config::{Config, KeyerConfig, paths};
use rekl_core::keyer::{Key, Keyer, SerialDtrKey};
use rekl_core::morse::MorseAlphabet;
use rekl_core::{ConfigStore, ReportedEvent, SendQueue, SpeedHandle, TransmissionEngine};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "rekl.log";

pub struct ConsoleOptions {
    pub config_path: PathBuf,
    pub beep: bool,
    pub port: Option<PathBuf>,
}

pub fn run(opts: &ConsoleOptions) -> Result<()> {
    let config = Config::load_from(&opts.config_path).context("load config")?;
    let (_log_guard, mut warnings) = init_logging(&config.log.filter)?;

    let mut store = ConfigStore::morse();
    warnings.extend(config.apply_to(&mut store));
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    let queue = SendQueue::new(Arc::new(MorseAlphabet));
    let (sink, inbox) = mpsc::unbounded_channel::<ReportedEvent>();

    // one tokio runtime for the send loop; the console itself stays on this thread
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    let _enter = rt.enter();

    let speed = store.speed_handle();
    let engine_name = if opts.beep {
        start_beep(&config.keyer, speed, queue.clone(), sink)?
    } else {
        let port = resolve_port(opts.port.clone(), &config.keyer);
        let key = SerialDtrKey::open(&port)
            .with_context(|| format!("open keyer port {}", port.display()))?;
        start_keyer(key, speed, queue.clone(), sink)
    };
    tracing::info!(engine = engine_name, "send loop started");

    rekl_tui::run_console(store, queue, inbox, engine_name, &warnings)
}

/// Port from the command line, else the config file.
fn resolve_port(cli_port: Option<PathBuf>, keyer: &KeyerConfig) -> PathBuf {
    cli_port.unwrap_or_else(|| keyer.port.clone())
}

fn start_keyer<K: Key>(
    key: K,
    speed: SpeedHandle,
    queue: SendQueue,
    sink: mpsc::UnboundedSender<ReportedEvent>,
) -> &'static str {
    let keyer = Keyer::new(key, speed);
    let name = keyer.name();
    rekl_core::spawn_send_loop(queue, keyer, sink);
    name
}

#[cfg(feature = "beep")]
fn start_beep(
    keyer: &KeyerConfig,
    speed: SpeedHandle,
    queue: SendQueue,
    sink: mpsc::UnboundedSender<ReportedEvent>,
) -> Result<&'static str> {
    let key = rekl_core::keyer::BeepKey::start(keyer.tone_hz).context("start sidetone")?;
    Ok(start_keyer(key, speed, queue, sink))
}

#[cfg(not(feature = "beep"))]
fn start_beep(
    _keyer: &KeyerConfig,
    _speed: SpeedHandle,
    _queue: SendQueue,
    _sink: mpsc::UnboundedSender<ReportedEvent>,
) -> Result<&'static str> {
    anyhow::bail!("Sidetone support is disabled in this build (rebuild with --features beep)")
}

/// Sends `tracing` output to `${REKL_HOME}/rekl.log`. `RUST_LOG` overrides
/// the configured filter.
///
/// The guard must live until exit or buffered lines are lost.
fn init_logging(filter: &str) -> Result<(WorkerGuard, Vec<String>)> {
    let mut warnings = Vec::new();
    let dir = paths::log_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(&dir)
        .with_context(|| format!("open log file in {}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(filter).or_else(|err| {
            warnings.push(format!("Config log filter '{filter}' ignored: {err}"));
            EnvFilter::try_new("info")
        })
    })?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .try_init();
    Ok((guard, warnings))
}
