/// Fuente de tiempo de los stores, en milisegundos desde epoch.
pub trait Clock: Send + Sync {
  fn now_millis(&self) -> i64;
}

/// Reloj real basado en `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now_millis(&self) -> i64 {
    chrono::Utc::now().timestamp_millis()
  }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
  fn now_millis(&self) -> i64 {
    (**self).now_millis()
  }
}
