use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identificador único de una canción del catálogo.
///
/// Se genera con UUID v4 y se persiste como su representación textual con
/// guiones, igual que los ids de la colección `songs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(Uuid);

impl SongId {
  /// Genera un nuevo identificador único.
  pub fn new() -> Self {
    SongId(Uuid::new_v4())
  }

  /// Construye un `SongId` a partir de un `Uuid` existente.
  pub fn from_uuid(u: Uuid) -> Self {
    SongId(u)
  }

  /// Devuelve el `Uuid` interno.
  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for SongId {
  fn default() -> Self {
    Self::new()
  }
}

impl From<Uuid> for SongId {
  fn from(u: Uuid) -> Self {
    SongId(u)
  }
}

impl From<SongId> for Uuid {
  fn from(id: SongId) -> Self {
    id.0
  }
}

impl fmt::Display for SongId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid song id: {0}")]
pub struct ParseSongIdError(String);

impl FromStr for SongId {
  type Err = ParseSongIdError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Uuid::parse_str(s.trim()).map(SongId).map_err(|_| ParseSongIdError(s.to_string()))
  }
}

/// Identificador opaco de una cuenta.
///
/// A diferencia de `SongId` no es un UUID: las cuentas usan ids con forma
/// `user-xxxxxxxxx`, y la cuenta sembrada al arrancar usa `user-default`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
  const PREFIX: &'static str = "user-";
  const SUFFIX_LEN: usize = 9;

  /// Genera un id nuevo: prefijo `user-` más 9 caracteres alfanuméricos en minúscula.
  pub fn generate() -> Self {
    let simple = Uuid::new_v4().simple().to_string();
    AccountId(format!("{}{}", Self::PREFIX, &simple[..Self::SUFFIX_LEN]))
  }

  /// Id fijo de la cuenta por defecto.
  pub fn default_account() -> Self {
    AccountId(format!("{}default", Self::PREFIX))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<String> for AccountId {
  fn from(s: String) -> Self {
    AccountId(s)
  }
}

impl fmt::Display for AccountId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn song_id_roundtrips_through_its_text_form() {
    let id = SongId::new();
    let parsed: SongId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
    assert!("not-a-uuid".parse::<SongId>().is_err());
  }

  #[test]
  fn song_id_serializes_as_plain_string() {
    let id = SongId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
  }

  #[test]
  fn generated_account_ids_have_the_user_prefix() {
    let id = AccountId::generate();
    let suffix = id.as_str().strip_prefix("user-").unwrap();
    assert_eq!(suffix.len(), 9);
    assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_ne!(AccountId::generate(), id);
  }

  #[test]
  fn default_account_id_is_fixed() {
    assert_eq!(AccountId::default_account().as_str(), "user-default");
  }
}
