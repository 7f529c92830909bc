use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Formas de URL reconocidas: `youtu.be/ID`, `/v/ID`, `/u/x/ID`, `/embed/ID`,
/// `watch?v=ID` y `&v=ID`. El `.*` inicial es voraz, así que gana el último
/// marcador que aparezca en la URL.
static VIDEO_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^.*(youtu.be/|v/|u/(?-u:\w)/|embed/|watch\?v=|&v=)([^#&?]*).*")
    .expect("video url pattern is valid")
});

/// Longitud exacta de un id de vídeo válido.
const VIDEO_ID_LEN: usize = 11;

/// Sufijos decorativos que se eliminan del título de un vídeo.
const TITLE_SUFFIXES: &[&str] = &[
  " (Official Video)",
  " (Official Music Video)",
  " (Lyric Video)",
  " (Audio)",
  " (Official Audio)",
  " (Visualizer)",
  " [Official Video]",
  " - Official Video",
  " | Official Video",
];

/// Identificador de 11 caracteres de un vídeo alojado.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for VideoId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Referencia a un vídeo: el id y, si se pudieron resolver, título y artista.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoReference {
  pub video_id: VideoId,
  pub title: Option<String>,
  pub artist: Option<String>,
}

impl VideoReference {
  /// Referencia sin metadatos, solo a partir de la URL.
  pub fn from_url(url: &str) -> Option<Self> {
    extract_video_id(url).map(|video_id| VideoReference { video_id, title: None, artist: None })
  }

  pub fn watch_url(&self) -> String {
    format!("https://www.youtube.com/watch?v={}", self.video_id)
  }

  /// URL del reproductor embebido.
  pub fn embed_url(&self, autoplay: bool, muted: bool) -> String {
    format!(
      "https://www.youtube.com/embed/{}?autoplay={}&mute={}",
      self.video_id,
      u8::from(autoplay),
      u8::from(muted)
    )
  }
}

/// Extrae el id de vídeo de una URL arbitraria.
///
/// Solo devuelve algo si el segmento capturado mide exactamente 11
/// caracteres. No falla nunca: cualquier entrada no reconocida es `None`.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
  let captures = VIDEO_URL_PATTERN.captures(url)?;
  let candidate = captures.get(2)?.as_str();

  (candidate.chars().count() == VIDEO_ID_LEN).then(|| VideoId(candidate.to_string()))
}

/// Limpia el título de un vídeo quitando anotaciones conocidas.
///
/// Cada sufijo se intenta una vez, en orden, y se elimina su primera
/// aparición esté donde esté (no solo al final). Después se recortan los
/// espacios. Lo que no esté en la lista se queda tal cual.
pub fn parse_video_title(raw_title: &str) -> String {
  let mut title = raw_title.to_string();

  for suffix in TITLE_SUFFIXES {
    if title.contains(suffix) {
      title = title.replacen(suffix, "", 1);
    }
  }

  title.trim().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn id(url: &str) -> Option<String> {
    extract_video_id(url).map(|v| v.as_str().to_string())
  }

  #[test]
  fn recognizes_common_url_shapes() {
    let expected = Some("dQw4w9WgXcQ".to_string());
    assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), expected);
    assert_eq!(id("https://youtu.be/dQw4w9WgXcQ"), expected);
    assert_eq!(id("https://www.youtube.com/embed/dQw4w9WgXcQ"), expected);
    assert_eq!(id("https://www.youtube.com/v/dQw4w9WgXcQ?version=3"), expected);
    assert_eq!(id("https://www.youtube.com/u/w/dQw4w9WgXcQ"), expected);
    assert_eq!(id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"), expected);
    assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123#t=10"), expected);
    assert_eq!(id("https://youtu.be/dQw4w9WgXcQ?t=42"), expected);
  }

  #[test]
  fn rejects_anything_that_is_not_eleven_characters() {
    assert_eq!(id("not a url"), None);
    assert_eq!(id(""), None);
    assert_eq!(id("https://youtu.be/short"), None);
    assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQX"), None);
    assert_eq!(id("https://example.com/page"), None);
  }

  #[test]
  fn strips_known_suffixes() {
    assert_eq!(parse_video_title("Song Name (Official Video)"), "Song Name");
    assert_eq!(parse_video_title("Song Name [Official Video]"), "Song Name");
    assert_eq!(parse_video_title("Song Name | Official Video"), "Song Name");
    assert_eq!(parse_video_title("  Song Name (Lyric Video)  "), "Song Name");
  }

  #[test]
  fn suffix_removal_is_substring_based_and_case_sensitive() {
    assert_eq!(parse_video_title("A (Audio) B"), "A B");
    assert_eq!(parse_video_title("Song (official video)"), "Song (official video)");
    assert_eq!(parse_video_title("Song (Live at Wembley)"), "Song (Live at Wembley)");
  }

  #[test]
  fn each_suffix_is_removed_once() {
    assert_eq!(parse_video_title("X (Audio) (Audio)"), "X (Audio)");
    assert_eq!(parse_video_title("X (Official Audio) (Visualizer)"), "X");
  }

  #[test]
  fn builds_player_urls() {
    let reference = VideoReference::from_url("https://youtu.be/dQw4w9WgXcQ").unwrap();
    assert_eq!(reference.title, None);
    assert_eq!(reference.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    assert_eq!(
      reference.embed_url(false, true),
      "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=0&mute=1"
    );
  }
}
