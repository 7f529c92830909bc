use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
  #[error("network error: {0}")]
  Network(String),

  #[error("unexpected status {0}")]
  Status(u16),

  #[error("malformed response: {0}")]
  Malformed(String),
}

/// Campos que se consumen de una respuesta estilo oEmbed.
///
/// Si `title` llega con un tipo distinto de string la deserialización falla
/// y el adapter lo reporta como `LookupError::Malformed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OEmbedMetadata {
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub author_name: Option<String>,
}

/// Port que abstrae la consulta de metadatos de un vídeo externo.
///
/// Implementaciones posibles:
/// - noembed.com u otro endpoint oEmbed vía HTTP
/// - un doble de pruebas en memoria
#[async_trait::async_trait]
pub trait VideoMetadataLookup: Send + Sync {
  /// Consulta los metadatos usando la URL original del vídeo como clave.
  async fn lookup(&self, url: &str) -> Result<OEmbedMetadata, LookupError>;
}
