use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Claves de las colecciones persistidas.
pub mod keys {
  pub const SONGS: &str = "songs";
  pub const USERS: &str = "users";
  pub const CURRENT_USER: &str = "currentUser";
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid key {0:?}")]
  InvalidKey(String),

  #[error("storage error: {0}")]
  Other(String),
}

/// Almacenamiento clave/valor local al cliente.
///
/// Cada valor es un documento JSON completo; los stores lo leen una vez al
/// arrancar y lo reescriben entero en cada mutación. No hay control de
/// concurrencia entre procesos: el último en escribir gana.
pub trait KeyValueStore: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
  fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
  /// Borrar una clave inexistente no es un error.
  fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    (**self).get(key)
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    (**self).set(key, value)
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    (**self).remove(key)
  }
}

/// Implementación en memoria, sin persistencia real.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Precarga valores, p. ej. para simular un arranque con datos previos.
  pub fn with_entries<I, K, V>(entries: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    Self { entries: Mutex::new(map) }
  }

  fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    Ok(self.entries().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    self.entries().insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    self.entries().remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn memory_store_behaves_like_local_storage() {
    let store = MemoryStore::with_entries([(keys::SONGS, "[]")]);
    assert_eq!(store.get(keys::SONGS).unwrap().as_deref(), Some("[]"));
    assert_eq!(store.get(keys::USERS).unwrap(), None);

    store.set(keys::USERS, "[1]").unwrap();
    assert_eq!(store.get(keys::USERS).unwrap().as_deref(), Some("[1]"));

    store.remove(keys::USERS).unwrap();
    store.remove(keys::USERS).unwrap();
    assert_eq!(store.get(keys::USERS).unwrap(), None);
  }

  #[test]
  fn shared_handles_see_the_same_data() {
    let store = Arc::new(MemoryStore::new());
    let other = Arc::clone(&store);
    store.set("k", "v").unwrap();
    assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
  }
}
