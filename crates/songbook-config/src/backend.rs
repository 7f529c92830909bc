use crate::paths::{ConfigError, SongbookPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use toml_edit::{DocumentMut, Item};

/// Lectura y escritura de secciones `[nombre]` de la configuración.
///
/// Un archivo o una sección ausentes no son un error: se usan los valores
/// por defecto del tipo.
pub trait ConfigBackend {
  fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default;

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;

  /// Carga la sección con valores por defecto y la vuelve a escribir, de modo
  /// que el archivo siempre muestra las claves disponibles.
  fn load_or_init<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Serialize + Default,
  {
    let value: T = self.load_section_with_default(section)?;
    self.save_section(section, &value)?;
    Ok(value)
  }
}

/// Backend sobre `songbook.toml`. Al guardar una sección se preservan los
/// comentarios y el resto de secciones del archivo.
pub struct TomlConfigBackend {
  paths: SongbookPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: SongbookPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &SongbookPaths {
    &self.paths
  }

  fn read_table(&self) -> Result<Option<toml::Table>, ConfigError> {
    match std::fs::read_to_string(self.paths.config_file()) {
      Ok(content) => Ok(Some(toml::from_str(&content)?)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  fn read_document(&self) -> Result<DocumentMut, ConfigError> {
    match std::fs::read_to_string(self.paths.config_file()) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse config document: {e}"))),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(DocumentMut::new()),
      Err(e) => Err(e.into()),
    }
  }
}

fn decode<T: DeserializeOwned>(section: &str, value: &toml::Value) -> Result<T, ConfigError> {
  value
    .clone()
    .try_into()
    .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    match self.read_table()? {
      Some(root) => match root.get(section) {
        Some(value) => decode(section, value),
        None => Ok(T::default()),
      },
      None => Ok(T::default()),
    }
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let mut doc = self.read_document()?;

    // `toml::to_string` produce pares `clave = valor` sin cabecera.
    let encoded = toml::to_string(value).map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;
    let item: Item = encoded
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section [{section}]: {e}")))?
      .into_item();

    doc[section] = item;

    songbook_fs::atomic_write_str(&self.paths.config_file(), &doc.to_string())?;
    Ok(())
  }
}
