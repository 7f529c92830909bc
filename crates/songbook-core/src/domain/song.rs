use crate::domain::chords::{Token, tokenize};
use crate::domain::ids::SongId;
use crate::domain::musical_key::MusicalKey;
use crate::domain::video::{VideoId, VideoReference, extract_video_id};
use crate::errors::CoreError;
use serde::{Deserialize, Serialize};

/// Tempo con el que arranca un borrador nuevo.
pub const DEFAULT_BPM: u32 = 120;

/// La Canción (Song): una entrada del cancionero.
///
/// Los nombres de campo en JSON siguen el formato de la colección `songs`
/// (`bpm`, `youtubeUrl`, `createdAt`, `updatedAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
  /// Identificador generado al crear; no cambia nunca.
  pub id: SongId,
  pub title: String,
  pub artist: String,
  pub key: MusicalKey,
  /// Pulsos por minuto.
  #[serde(rename = "bpm")]
  pub tempo: u32,
  /// Letra con acordes entre corchetes.
  pub lyrics: String,
  #[serde(default, rename = "youtubeUrl", skip_serializing_if = "Option::is_none")]
  pub video_url: Option<String>,
  /// Milisegundos desde epoch; inmutable tras la creación.
  pub created_at: i64,
  /// Siempre `>= created_at`.
  pub updated_at: i64,
}

impl Song {
  pub fn new(input: SongInput, now_millis: i64) -> Self {
    Song {
      id: SongId::new(),
      title: input.title,
      artist: input.artist,
      key: input.key,
      tempo: input.tempo,
      lyrics: input.lyrics,
      video_url: input.video_url,
      created_at: now_millis,
      updated_at: now_millis,
    }
  }

  /// Sustituye los campos editables conservando `id` y `created_at`.
  pub fn apply(&mut self, input: SongInput, now_millis: i64) {
    self.title = input.title;
    self.artist = input.artist;
    self.key = input.key;
    self.tempo = input.tempo;
    self.lyrics = input.lyrics;
    self.video_url = input.video_url;
    self.updated_at = now_millis.max(self.created_at);
  }

  /// Copia de los campos editables, útil para formularios de edición.
  pub fn to_input(&self) -> SongInput {
    SongInput {
      title: self.title.clone(),
      artist: self.artist.clone(),
      key: self.key,
      tempo: self.tempo,
      lyrics: self.lyrics.clone(),
      video_url: self.video_url.clone(),
    }
  }

  /// ¿Contiene ya en minúsculas el término en título, artista o tonalidad?
  pub(crate) fn matches_lowercase(&self, term: &str) -> bool {
    self.title.to_lowercase().contains(term)
      || self.artist.to_lowercase().contains(term)
      || self.key.as_str().to_lowercase().contains(term)
  }

  pub fn tokens(&self) -> Vec<Token<'_>> {
    tokenize(&self.lyrics)
  }

  pub fn video_id(&self) -> Option<VideoId> {
    self.video_url.as_deref().and_then(extract_video_id)
  }
}

/// Campos editables de una canción.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInput {
  pub title: String,
  pub artist: String,
  pub key: MusicalKey,
  #[serde(rename = "bpm")]
  pub tempo: u32,
  pub lyrics: String,
  #[serde(default, rename = "youtubeUrl", skip_serializing_if = "Option::is_none")]
  pub video_url: Option<String>,
}

impl SongInput {
  /// Borrador vacío en la tonalidad dada y con el tempo por defecto.
  pub fn draft(key: MusicalKey) -> Self {
    SongInput {
      title: String::new(),
      artist: String::new(),
      key,
      tempo: DEFAULT_BPM,
      lyrics: String::new(),
      video_url: None,
    }
  }

  /// Reglas del formulario: título, artista y letra no vacíos; bpm >= 1.
  ///
  /// El catálogo no la invoca; es responsabilidad de la capa de presentación.
  pub fn validate(&self) -> Result<(), CoreError> {
    if self.title.trim().is_empty() {
      return Err(CoreError::Validation { field: "title", reason: "must not be empty" });
    }
    if self.artist.trim().is_empty() {
      return Err(CoreError::Validation { field: "artist", reason: "must not be empty" });
    }
    if self.tempo == 0 {
      return Err(CoreError::Validation { field: "bpm", reason: "must be greater than 0" });
    }
    if self.lyrics.trim().is_empty() {
      return Err(CoreError::Validation { field: "lyrics", reason: "must not be empty" });
    }
    Ok(())
  }

  /// Autocompleta título y artista desde un vídeo resuelto, solo si están vacíos.
  pub fn apply_video_metadata(&mut self, reference: &VideoReference) {
    if self.title.is_empty() {
      if let Some(title) = &reference.title {
        self.title = title.clone();
      }
    }
    if self.artist.is_empty() {
      if let Some(artist) = &reference.artist {
        self.artist = artist.clone();
      }
    }
  }
}
