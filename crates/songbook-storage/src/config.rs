use serde::{Deserialize, Serialize};
use songbook_config::{ConfigBackend, ConfigError, SongbookPaths, TomlConfigBackend};
use std::path::PathBuf;

const SECTION: &str = "storage";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
  /// Directorio de los documentos JSON. Si falta se usa el de datos del sistema.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    backend.load_or_init(SECTION)
  }

  pub fn resolve_data_dir(&self, paths: &SongbookPaths) -> PathBuf {
    self.data_dir.clone().unwrap_or_else(|| paths.data_dir.clone())
  }
}
