use crate::domain::ids::AccountId;
use serde::{Deserialize, Serialize};

/// Cuenta registrada tal y como se persiste en la colección `users`.
///
/// El secreto se guarda en claro: no hay protección criptográfica de
/// credenciales en este diseño.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
  pub id: AccountId,
  pub name: String,
  /// Único entre todas las cuentas en el momento del registro (sensible a mayúsculas).
  pub email: String,
  #[serde(rename = "password")]
  pub secret: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar: Option<String>,
}

impl Account {
  /// ¿Coinciden exactamente email y secreto?
  pub fn matches(&self, email: &str, secret: &str) -> bool {
    self.email == email && self.secret == secret
  }
}

/// Datos para crear una cuenta nueva.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
  pub name: String,
  pub email: String,
  pub secret: String,
}

impl NewAccount {
  pub fn into_account(self, id: AccountId) -> Account {
    Account { id, name: self.name, email: self.email, secret: self.secret, avatar: None }
  }
}

/// Sesión activa: la cuenta sin el secreto.
///
/// Al deserializar un `Account` persistido como `Session` el campo
/// `password` se descarta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub id: AccountId,
  pub name: String,
  pub email: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar: Option<String>,
}

impl Session {
  /// Inicial en mayúscula del nombre, para avatares sin imagen.
  pub fn initial(&self) -> Option<char> {
    self.name.chars().next().and_then(|c| c.to_uppercase().next())
  }
}

impl From<&Account> for Session {
  fn from(account: &Account) -> Self {
    Session {
      id: account.id.clone(),
      name: account.name.clone(),
      email: account.email.clone(),
      avatar: account.avatar.clone(),
    }
  }
}
