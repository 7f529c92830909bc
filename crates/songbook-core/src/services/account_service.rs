use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::account::{Account, NewAccount, Session};
use crate::domain::ids::AccountId;
use crate::errors::CoreError;
use crate::ports::KeyValueStore;
use crate::ports::storage::keys;

/// Ajustes del store de cuentas.
#[derive(Debug, Clone)]
pub struct AccountSettings {
  /// Espera simulada antes de resolver login/registro (ida y vuelta de red).
  pub login_latency: Duration,
  /// Cuenta que se siembra si la colección `users` está vacía al arrancar.
  pub default_account: NewAccount,
}

impl Default for AccountSettings {
  fn default() -> Self {
    Self {
      login_latency: Duration::from_millis(800),
      default_account: NewAccount {
        name: "Songbook".to_string(),
        email: "admin@songbook.local".to_string(),
        secret: "songbook".to_string(),
      },
    }
  }
}

/// Cuentas registradas y sesión actual.
///
/// Único escritor de `users` y `currentUser`. Login y registro solo
/// informan éxito o fracaso: no distinguen "email desconocido" de
/// "secreto incorrecto".
pub struct AccountStore<S: KeyValueStore> {
  store: S,
  settings: AccountSettings,
  session: watch::Sender<Option<Session>>,
  loading: AtomicBool,
  pending: AtomicUsize,
  write_lock: Mutex<()>,
}

impl<S: KeyValueStore> AccountStore<S> {
  /// Crea el store sin restaurar nada: `is_loading()` es `true` hasta `restore()`.
  pub fn new(store: S, settings: AccountSettings) -> Self {
    let (session, _) = watch::channel(None);
    Self {
      store,
      settings,
      session,
      loading: AtomicBool::new(true),
      pending: AtomicUsize::new(0),
      write_lock: Mutex::new(()),
    }
  }

  /// Crea el store y restaura la sesión persistida.
  pub fn open(store: S, settings: AccountSettings) -> Self {
    let accounts = Self::new(store, settings);
    accounts.restore();
    accounts
  }

  /// Restaura la sesión persistida y siembra la cuenta por defecto si no hay
  /// ninguna. Solo tiene efecto la primera vez.
  pub fn restore(&self) {
    if !self.loading.load(Ordering::SeqCst) {
      return;
    }

    let _guard = self.write_lock();
    self.restore_session();
    self.ensure_default_account();
    self.loading.store(false, Ordering::SeqCst);
  }

  pub fn is_loading(&self) -> bool {
    self.loading.load(Ordering::SeqCst)
  }

  /// ¿Hay algún login o registro en curso?
  pub fn is_authenticating(&self) -> bool {
    self.pending.load(Ordering::SeqCst) > 0
  }

  pub fn session(&self) -> Option<Session> {
    self.session.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
    self.session.subscribe()
  }

  /// Sesión actual o `CoreError::Unauthenticated`, para proteger mutaciones.
  pub fn require_session(&self) -> Result<Session, CoreError> {
    self.session().ok_or(CoreError::Unauthenticated)
  }

  /// Inicia sesión si existe una cuenta con ese email y secreto exactos.
  ///
  /// Si falla, la sesión previa (si la hay) no se toca.
  pub async fn login(&self, email: &str, secret: &str) -> bool {
    let _pending = Pending::start(&self.pending);
    self.simulate_latency().await;

    let _guard = self.write_lock();
    let users = self.read_users();
    match users.iter().find(|account| account.matches(email, secret)) {
      Some(account) => {
        self.establish(account);
        true
      }
      None => {
        debug!("login rejected");
        false
      }
    }
  }

  /// Registra una cuenta nueva e inicia sesión con ella.
  ///
  /// Devuelve `false` si ya existe una cuenta con ese email exacto o si la
  /// colección no se pudo guardar.
  pub async fn register(&self, name: &str, email: &str, secret: &str) -> bool {
    let _pending = Pending::start(&self.pending);
    self.simulate_latency().await;

    let _guard = self.write_lock();
    let mut users = self.read_users();
    if users.iter().any(|account| account.email == email) {
      debug!("registration rejected");
      return false;
    }

    let account = NewAccount { name: name.to_string(), email: email.to_string(), secret: secret.to_string() }
      .into_account(AccountId::generate());
    users.push(account.clone());

    if let Err(e) = self.write_users(&users) {
      warn!(error = %e, "failed to persist accounts");
      return false;
    }

    info!(id = %account.id, "account registered");
    self.establish(&account);
    true
  }

  /// Cierra la sesión y borra su forma persistida.
  pub fn logout(&self) {
    self.session.send_replace(None);
    if let Err(e) = self.store.remove(keys::CURRENT_USER) {
      warn!(error = %e, "failed to clear persisted session");
    }
    info!("logged out");
  }

  fn write_lock(&self) -> MutexGuard<'_, ()> {
    self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
  }

  async fn simulate_latency(&self) {
    if !self.settings.login_latency.is_zero() {
      tokio::time::sleep(self.settings.login_latency).await;
    }
  }

  fn establish(&self, account: &Account) {
    self.session.send_replace(Some(Session::from(account)));

    let result = serde_json::to_string(account)
      .map_err(|e| e.to_string())
      .and_then(|json| self.store.set(keys::CURRENT_USER, &json).map_err(|e| e.to_string()));
    if let Err(e) = result {
      warn!(error = %e, "failed to persist session");
    }
    info!(id = %account.id, "session established");
  }

  fn restore_session(&self) {
    let raw = match self.store.get(keys::CURRENT_USER) {
      Ok(Some(raw)) => raw,
      Ok(None) => return,
      Err(e) => {
        warn!(error = %e, "could not read persisted session");
        return;
      }
    };

    match serde_json::from_str::<Session>(&raw) {
      Ok(session) => {
        debug!(id = %session.id, "session restored");
        self.session.send_replace(Some(session));
      }
      Err(e) => {
        warn!(error = %e, "persisted session is corrupt, discarding it");
        if let Err(e) = self.store.remove(keys::CURRENT_USER) {
          warn!(error = %e, "failed to clear corrupt session");
        }
      }
    }
  }

  fn ensure_default_account(&self) {
    if !self.read_users().is_empty() {
      return;
    }

    let account = self.settings.default_account.clone().into_account(AccountId::default_account());
    match self.write_users(&[account]) {
      Ok(()) => info!("default account created"),
      Err(e) => warn!(error = %e, "failed to create default account"),
    }
  }

  /// Lee `users`; datos ilegibles o corruptos cuentan como colección vacía.
  fn read_users(&self) -> Vec<Account> {
    match self.store.get(keys::USERS) {
      Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "stored accounts are corrupt, treating as empty");
        Vec::new()
      }),
      Ok(None) => Vec::new(),
      Err(e) => {
        warn!(error = %e, "could not read stored accounts");
        Vec::new()
      }
    }
  }

  fn write_users(&self, users: &[Account]) -> Result<(), String> {
    let json = serde_json::to_string(users).map_err(|e| e.to_string())?;
    self.store.set(keys::USERS, &json).map_err(|e| e.to_string())
  }
}

/// Marca una operación de autenticación en curso mientras vive.
struct Pending<'a>(&'a AtomicUsize);

impl<'a> Pending<'a> {
  fn start(counter: &'a AtomicUsize) -> Self {
    counter.fetch_add(1, Ordering::SeqCst);
    Pending(counter)
  }
}

impl Drop for Pending<'_> {
  fn drop(&mut self) {
    self.0.fetch_sub(1, Ordering::SeqCst);
  }
}
