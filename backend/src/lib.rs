mod app;
mod cli;
mod config;
mod infrastructure;

use anyhow::{Context, Result};
use clap::Parser;
use songbook_config::{SongbookPaths, TomlConfigBackend};
use songbook_oembed::NoembedClient;
use songbook_storage::JsonFileStore;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::App;
use crate::cli::Cli;
use crate::config::AppConfig;

const DEFAULT_LOG_FILTER: &str = "warn,songbook=info";

/// Logs go to stderr so that command output on stdout stays scriptable.
fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
  // A subscriber may already be installed when embedded; keep that one.
  let _ = tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .try_init();
}

pub fn run() -> Result<()> {
  init_tracing();
  let cli = Cli::parse();

  // --- Configuration ---
  let paths = SongbookPaths::detect().context("could not determine the songbook directories")?;
  let backend = TomlConfigBackend::new(paths);
  let mut config = AppConfig::load(&backend)
    .with_context(|| format!("could not load {}", backend.paths().config_file().display()))?;
  if let Some(dir) = cli.data_dir {
    config.data_dir = dir;
  }
  debug!(data_dir = %config.data_dir.display(), endpoint = %config.oembed.endpoint, "configuration loaded");

  // --- Adapters ---
  let store = JsonFileStore::open(&config.data_dir)
    .with_context(|| format!("could not open data directory {}", config.data_dir.display()))?;
  let lookup = NoembedClient::new(&config.oembed).context("could not build the HTTP client")?;

  let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
  runtime.block_on(async {
    let app = App::new(store, lookup, config.accounts);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.execute(cli.command, &mut out).await
  })
}
