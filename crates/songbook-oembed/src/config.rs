use serde::{Deserialize, Serialize};
use songbook_config::{ConfigBackend, ConfigError, TomlConfigBackend};
use std::time::Duration;

const SECTION: &str = "oembed";

pub const DEFAULT_ENDPOINT: &str = "https://noembed.com/embed";

/// Sección `[oembed]` de `songbook.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OEmbedConfig {
  pub endpoint: String,
  pub user_agent: String,
  /// Sin valor no se aplica ningún límite de tiempo.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timeout_secs: Option<u64>,
}

impl Default for OEmbedConfig {
  fn default() -> Self {
    Self {
      endpoint: DEFAULT_ENDPOINT.to_string(),
      user_agent: concat!("songbook/", env!("CARGO_PKG_VERSION")).to_string(),
      timeout_secs: None,
    }
  }
}

impl OEmbedConfig {
  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    backend.load_or_init(SECTION)
  }

  pub fn timeout(&self) -> Option<Duration> {
    self.timeout_secs.map(Duration::from_secs)
  }
}
