use async_trait::async_trait;
use songbook_core::ports::{LookupError, OEmbedMetadata, VideoMetadataLookup};
use tracing::debug;

use crate::config::OEmbedConfig;

/// Cliente HTTP de un endpoint oEmbed (por defecto noembed.com).
///
/// Hace `GET <endpoint>?url=<url codificada>` y lee `title` y `author_name`
/// del JSON de respuesta.
#[derive(Debug, Clone)]
pub struct NoembedClient {
  http: reqwest::Client,
  endpoint: String,
}

impl NoembedClient {
  pub fn new(config: &OEmbedConfig) -> Result<Self, LookupError> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.timeout() {
      builder = builder.timeout(timeout);
    }
    let http = builder.build().map_err(|e| LookupError::Network(e.to_string()))?;

    Ok(Self { http, endpoint: config.endpoint.clone() })
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }
}

#[async_trait]
impl VideoMetadataLookup for NoembedClient {
  async fn lookup(&self, url: &str) -> Result<OEmbedMetadata, LookupError> {
    debug!(endpoint = %self.endpoint, url, "oembed lookup");

    let response = self
      .http
      .get(&self.endpoint)
      .query(&[("url", url)])
      .send()
      .await
      .map_err(|e| LookupError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      debug!(status = status.as_u16(), "oembed lookup rejected");
      return Err(LookupError::Status(status.as_u16()));
    }

    let body: serde_json::Value = response.json().await.map_err(|e| match e.is_decode() {
      true => LookupError::Malformed(e.to_string()),
      false => LookupError::Network(e.to_string()),
    })?;

    // Solo un objeto JSON cuenta como respuesta oEmbed; serde aceptaría también
    // un array posicional.
    if !body.is_object() {
      return Err(LookupError::Malformed("response is not a JSON object".to_string()));
    }
    serde_json::from_value(body).map_err(|e| LookupError::Malformed(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::TcpListener;
  use tokio::task::JoinHandle;

  /// Servidor de una sola petición: devuelve la línea de petición recibida.
  async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/embed", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let mut request = Vec::new();
      let mut buf = [0u8; 1024];
      while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
          break;
        }
        request.extend_from_slice(&buf[..n]);
      }

      let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
      );
      socket.write_all(response.as_bytes()).await.unwrap();
      socket.shutdown().await.ok();

      let text = String::from_utf8_lossy(&request).into_owned();
      text.lines().next().unwrap_or_default().to_string()
    });

    (endpoint, handle)
  }

  fn client(endpoint: String) -> NoembedClient {
    NoembedClient::new(&OEmbedConfig { endpoint, ..OEmbedConfig::default() }).unwrap()
  }

  #[tokio::test]
  async fn parses_title_and_author() {
    let (endpoint, server) =
      serve_once("200 OK", r#"{"title":"Song (Official Video)","author_name":"Band","provider_name":"YouTube"}"#).await;

    let meta = client(endpoint).lookup("https://youtu.be/dQw4w9WgXcQ").await.unwrap();

    assert_eq!(meta.title.as_deref(), Some("Song (Official Video)"));
    assert_eq!(meta.author_name.as_deref(), Some("Band"));

    let request_line = server.await.unwrap();
    assert!(request_line.starts_with("GET /embed?url=https%3A%2F%2Fyoutu.be%2FdQw4w9WgXcQ "), "{request_line}");
  }

  #[tokio::test]
  async fn error_payload_without_title_is_not_an_error() {
    let (endpoint, _server) = serve_once("200 OK", r#"{"error":"no matching providers found"}"#).await;

    let meta = client(endpoint).lookup("https://example.com/x").await.unwrap();

    assert_eq!(meta, OEmbedMetadata::default());
  }

  #[tokio::test]
  async fn non_success_status_is_reported() {
    let (endpoint, _server) = serve_once("404 Not Found", "{}").await;

    let err = client(endpoint).lookup("https://youtu.be/dQw4w9WgXcQ").await.unwrap_err();

    assert!(matches!(err, LookupError::Status(404)));
  }

  #[tokio::test]
  async fn non_json_body_is_malformed() {
    let (endpoint, _server) = serve_once("200 OK", "<html>nope</html>").await;

    let err = client(endpoint).lookup("https://youtu.be/dQw4w9WgXcQ").await.unwrap_err();

    assert!(matches!(err, LookupError::Malformed(_)));
  }

  #[tokio::test]
  async fn array_body_is_malformed() {
    let (endpoint, _server) = serve_once("200 OK", r#"["Some Title","Chan"]"#).await;

    let err = client(endpoint).lookup("https://youtu.be/dQw4w9WgXcQ").await.unwrap_err();

    assert!(matches!(err, LookupError::Malformed(_)));
  }

  #[tokio::test]
  async fn non_string_title_is_malformed() {
    let (endpoint, _server) = serve_once("200 OK", r#"{"title":42,"author_name":"Chan"}"#).await;

    let err = client(endpoint).lookup("https://youtu.be/dQw4w9WgXcQ").await.unwrap_err();

    assert!(matches!(err, LookupError::Malformed(_)));
  }

  #[tokio::test]
  async fn unreachable_endpoint_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/embed", listener.local_addr().unwrap());
    drop(listener);

    let err = client(endpoint).lookup("https://youtu.be/dQw4w9WgXcQ").await.unwrap_err();

    assert!(matches!(err, LookupError::Network(_)));
  }
}
