use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use songbook_config::{ConfigBackend, ConfigError, TomlConfigBackend};
use songbook_core::domain::NewAccount;
use songbook_core::services::AccountSettings;
use songbook_oembed::OEmbedConfig;
use songbook_storage::StorageConfig;

/// `[accounts]` section of `songbook.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
  pub login_latency_ms: u64,
  pub default_name: String,
  pub default_email: String,
  pub default_secret: String,
}

impl Default for AccountsConfig {
  fn default() -> Self {
    AccountsConfig::from(AccountSettings::default())
  }
}

impl From<AccountSettings> for AccountsConfig {
  fn from(settings: AccountSettings) -> Self {
    AccountsConfig {
      login_latency_ms: u64::try_from(settings.login_latency.as_millis()).unwrap_or(u64::MAX),
      default_name: settings.default_account.name,
      default_email: settings.default_account.email,
      default_secret: settings.default_account.secret,
    }
  }
}

impl From<AccountsConfig> for AccountSettings {
  fn from(cfg: AccountsConfig) -> Self {
    AccountSettings {
      login_latency: Duration::from_millis(cfg.login_latency_ms),
      default_account: NewAccount { name: cfg.default_name, email: cfg.default_email, secret: cfg.default_secret },
    }
  }
}

/// Every section the CLI reads, resolved against the detected paths.
#[derive(Debug, Clone)]
pub struct AppConfig {
  pub data_dir: PathBuf,
  pub oembed: OEmbedConfig,
  pub accounts: AccountSettings,
}

impl AppConfig {
  /// Loads each section (writing defaults back so the file documents them).
  pub fn load(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let storage = StorageConfig::load_from(backend)?;
    let oembed = OEmbedConfig::load_from(backend)?;
    let accounts: AccountsConfig = backend.load_or_init("accounts")?;

    Ok(AppConfig { data_dir: storage.resolve_data_dir(backend.paths()), oembed, accounts: accounts.into() })
  }
}
