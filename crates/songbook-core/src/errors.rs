// crates/songbook-core/src/errors.rs
use thiserror::Error;

/// Error genérico del núcleo de Songbook.
///
/// Los stores nunca lo devuelven desde su contrato público: solo aparece en
/// los helpers consultivos (validación de formularios, control de sesión) y
/// las capas superiores (CLI, etc.) lo mapean a mensajes de usuario o logs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
  #[error("invalid {field}: {reason}")]
  Validation { field: &'static str, reason: &'static str },

  #[error("authentication required")]
  Unauthenticated,

  #[error("not found")]
  NotFound,
}
