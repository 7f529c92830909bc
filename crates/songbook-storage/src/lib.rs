mod config;

pub use config::StorageConfig;

use std::path::{Path, PathBuf};

use songbook_core::ports::{KeyValueStore, StorageError};
use tracing::{debug, trace};

/// Store clave/valor sobre disco: cada clave es un archivo `<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
  dir: PathBuf,
}

impl JsonFileStore {
  /// Abre (y crea si hace falta) el directorio de datos.
  pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
    let dir = dir.into();
    std::fs::create_dir_all(&dir)?;
    debug!(dir = %dir.display(), "json store opened");
    Ok(Self { dir })
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
    let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
      return Err(StorageError::InvalidKey(key.to_owned()));
    }
    Ok(self.dir.join(format!("{key}.json")))
  }
}

impl KeyValueStore for JsonFileStore {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    let path = self.path_for(key)?;
    let value = songbook_fs::read_optional_str(&path)?;
    trace!(key, found = value.is_some(), "json store read");
    Ok(value)
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    let path = self.path_for(key)?;
    songbook_fs::atomic_write_str(&path, value)?;
    trace!(key, bytes = value.len(), "json store write");
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    let path = self.path_for(key)?;
    match std::fs::remove_file(&path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}
