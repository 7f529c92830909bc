use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Tonalidad de una canción.
///
/// Es una enumeración cerrada de 17 valores: las doce clases de altura con
/// sus enarmónicos habituales (sostenidos y bemoles). Se persiste exactamente
/// como se muestra (`"C#"`, `"Bb"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicalKey {
  #[serde(rename = "C")]
  C,
  #[serde(rename = "C#")]
  CSharp,
  #[serde(rename = "Db")]
  DFlat,
  #[serde(rename = "D")]
  D,
  #[serde(rename = "D#")]
  DSharp,
  #[serde(rename = "Eb")]
  EFlat,
  #[serde(rename = "E")]
  E,
  #[serde(rename = "F")]
  F,
  #[serde(rename = "F#")]
  FSharp,
  #[serde(rename = "Gb")]
  GFlat,
  #[serde(rename = "G")]
  G,
  #[serde(rename = "G#")]
  GSharp,
  #[serde(rename = "Ab")]
  AFlat,
  #[serde(rename = "A")]
  A,
  #[serde(rename = "A#")]
  ASharp,
  #[serde(rename = "Bb")]
  BFlat,
  #[serde(rename = "B")]
  B,
}

impl MusicalKey {
  /// Todas las tonalidades, en el orden en que se ofrecen al usuario.
  pub const ALL: [MusicalKey; 17] = [
    MusicalKey::C,
    MusicalKey::CSharp,
    MusicalKey::DFlat,
    MusicalKey::D,
    MusicalKey::DSharp,
    MusicalKey::EFlat,
    MusicalKey::E,
    MusicalKey::F,
    MusicalKey::FSharp,
    MusicalKey::GFlat,
    MusicalKey::G,
    MusicalKey::GSharp,
    MusicalKey::AFlat,
    MusicalKey::A,
    MusicalKey::ASharp,
    MusicalKey::BFlat,
    MusicalKey::B,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      MusicalKey::C => "C",
      MusicalKey::CSharp => "C#",
      MusicalKey::DFlat => "Db",
      MusicalKey::D => "D",
      MusicalKey::DSharp => "D#",
      MusicalKey::EFlat => "Eb",
      MusicalKey::E => "E",
      MusicalKey::F => "F",
      MusicalKey::FSharp => "F#",
      MusicalKey::GFlat => "Gb",
      MusicalKey::G => "G",
      MusicalKey::GSharp => "G#",
      MusicalKey::AFlat => "Ab",
      MusicalKey::A => "A",
      MusicalKey::ASharp => "A#",
      MusicalKey::BFlat => "Bb",
      MusicalKey::B => "B",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key {0:?} (expected one of C, C#, Db, D, D#, Eb, E, F, F#, Gb, G, G#, Ab, A, A#, Bb, B)")]
pub struct ParseKeyError(String);

impl FromStr for MusicalKey {
  type Err = ParseKeyError;

  /// Convierte una cadena en una `MusicalKey`.
  ///
  /// Solo se recortan los espacios: `"db"` no es `Db`, porque en notación
  /// de acordes la minúscula cambia el significado.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    MusicalKey::ALL
      .into_iter()
      .find(|key| key.as_str() == trimmed)
      .ok_or_else(|| ParseKeyError(s.to_string()))
  }
}

impl fmt::Display for MusicalKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_key_parses_back_from_its_display_form() {
    for key in MusicalKey::ALL {
      assert_eq!(key.to_string().parse::<MusicalKey>(), Ok(key));
    }
  }

  #[test]
  fn parsing_trims_but_keeps_case() {
    assert_eq!(" F# ".parse::<MusicalKey>(), Ok(MusicalKey::FSharp));
    assert!("db".parse::<MusicalKey>().is_err());
    assert!("H".parse::<MusicalKey>().is_err());
  }

  #[test]
  fn serde_uses_the_display_strings() {
    assert_eq!(serde_json::to_string(&MusicalKey::BFlat).unwrap(), "\"Bb\"");
    let key: MusicalKey = serde_json::from_str("\"G#\"").unwrap();
    assert_eq!(key, MusicalKey::GSharp);
    assert!(serde_json::from_str::<MusicalKey>("\"X\"").is_err());
  }
}
