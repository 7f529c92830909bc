use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variable de entorno que fuerza una instalación "portable" bajo un directorio.
pub const BASE_DIR_ENV: &str = "SONGBOOK_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Directorios de configuración y datos de Songbook.
#[derive(Debug, Clone)]
pub struct SongbookPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
}

impl SongbookPaths {
  /// Usa `SONGBOOK_BASE_DIR` si está definida; si no, los directorios del sistema.
  /// Crea los directorios que falten.
  pub fn detect() -> Result<Self, ConfigError> {
    let paths = match std::env::var(BASE_DIR_ENV) {
      Ok(env_base) => Self::portable(PathBuf::from(env_base)),
      Err(_) => {
        let proj_dirs = ProjectDirs::from("com", "songbook", "songbook").ok_or(ConfigError::Directories)?;
        Self {
          base_dir: proj_dirs.config_dir().to_path_buf(),
          config_dir: proj_dirs.config_dir().to_path_buf(),
          data_dir: proj_dirs.data_dir().to_path_buf(),
        }
      }
    };

    paths.create_dirs()?;
    Ok(paths)
  }

  /// Estructura portable: `<base>/config` y `<base>/data`.
  pub fn under(base: &Path) -> Result<Self, ConfigError> {
    let paths = Self::portable(base.to_path_buf());
    paths.create_dirs()?;
    Ok(paths)
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("songbook.toml")
  }

  fn portable(base: PathBuf) -> Self {
    Self { config_dir: base.join("config"), data_dir: base.join("data"), base_dir: base }
  }

  fn create_dirs(&self) -> Result<(), ConfigError> {
    std::fs::create_dir_all(&self.config_dir)?;
    std::fs::create_dir_all(&self.data_dir)?;
    Ok(())
  }
}
