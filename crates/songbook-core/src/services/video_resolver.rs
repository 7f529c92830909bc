use tracing::debug;

use crate::domain::video::{VideoId, VideoReference, extract_video_id, parse_video_title};
use crate::ports::VideoMetadataLookup;

/// Resuelve referencias de vídeo: id a partir de la URL y, si el servicio
/// externo responde, título y artista para autocompletar formularios.
///
/// Ningún fallo sale de aquí como error: "sin datos" es siempre `None`.
pub struct VideoResolver<L: VideoMetadataLookup> {
  lookup: L,
}

impl<L: VideoMetadataLookup> VideoResolver<L> {
  pub fn new(lookup: L) -> Self {
    Self { lookup }
  }

  pub fn extract_video_id(&self, url: &str) -> Option<VideoId> {
    extract_video_id(url)
  }

  /// Id más título limpio y artista (nombre del canal, o vacío si no viene).
  pub async fn resolve_metadata(&self, url: &str) -> Option<VideoReference> {
    let video_id = extract_video_id(url)?;

    let metadata = match self.lookup.lookup(url).await {
      Ok(metadata) => metadata,
      Err(e) => {
        debug!(%video_id, error = %e, "video metadata lookup failed");
        return None;
      }
    };

    let Some(raw_title) = metadata.title.filter(|title| !title.is_empty()) else {
      debug!(%video_id, "video metadata has no title");
      return None;
    };

    Some(VideoReference {
      video_id,
      title: Some(parse_video_title(&raw_title)),
      artist: Some(metadata.author_name.unwrap_or_default()),
    })
  }
}
