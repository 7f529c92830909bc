use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::ids::SongId;
use crate::domain::song::{Song, SongInput};
use crate::ports::storage::keys;
use crate::ports::{Clock, KeyValueStore, SystemClock};

#[derive(Debug)]
struct CatalogState {
  songs: Vec<Song>,
  filter: String,
  loading: bool,
}

/// Catálogo de canciones persistido.
///
/// Es el único escritor de la colección `songs`: cada mutación reescribe la
/// colección entera. Mantiene además un término de búsqueda y publica la
/// vista filtrada por un canal `watch`.
pub struct CatalogStore<S, C = SystemClock>
where
  S: KeyValueStore,
  C: Clock,
{
  store: S,
  clock: C,
  state: Mutex<CatalogState>,
  view: watch::Sender<Vec<Song>>,
}

impl<S: KeyValueStore> CatalogStore<S, SystemClock> {
  /// Crea el catálogo con el reloj del sistema y carga la colección persistida.
  pub fn open(store: S) -> Self {
    let catalog = Self::new(store, SystemClock);
    catalog.load();
    catalog
  }
}

impl<S, C> CatalogStore<S, C>
where
  S: KeyValueStore,
  C: Clock,
{
  /// Crea el catálogo sin leer nada todavía: `is_loading()` es `true` hasta `load()`.
  pub fn new(store: S, clock: C) -> Self {
    let (view, _) = watch::channel(Vec::new());
    Self {
      store,
      clock,
      state: Mutex::new(CatalogState { songs: Vec::new(), filter: String::new(), loading: true }),
      view,
    }
  }

  /// Lee la colección persistida una sola vez. Llamadas posteriores no hacen nada.
  pub fn load(&self) {
    let mut state = self.state();
    self.load_locked(&mut state);
  }

  pub fn is_loading(&self) -> bool {
    self.state().loading
  }

  /// Canciones que pasan el filtro activo, en orden de inserción.
  pub fn list(&self) -> Vec<Song> {
    self.view.borrow().clone()
  }

  /// Colección completa, ignorando el filtro.
  pub fn all(&self) -> Vec<Song> {
    self.state().songs.clone()
  }

  pub fn get(&self, id: SongId) -> Option<Song> {
    self.state().songs.iter().find(|song| song.id == id).cloned()
  }

  pub fn filter(&self) -> String {
    self.state().filter.clone()
  }

  /// Sustituye el término de búsqueda. Un término vacío desactiva el filtro.
  pub fn set_filter(&self, term: impl Into<String>) {
    let mut state = self.state();
    state.filter = term.into();
    self.publish(&state);
  }

  pub fn clear_filter(&self) {
    self.set_filter(String::new());
  }

  /// Receptor de la vista filtrada; recibe un valor nuevo en cada cambio de
  /// colección o de filtro.
  pub fn subscribe(&self) -> watch::Receiver<Vec<Song>> {
    self.view.subscribe()
  }

  /// Crea una canción nueva al final de la colección y la persiste.
  pub fn add(&self, input: SongInput) -> Song {
    let mut state = self.state();
    self.load_locked(&mut state);

    let song = Song::new(input, self.clock.now_millis());
    debug!(id = %song.id, title = %song.title, "adding song");
    state.songs.push(song.clone());

    self.persist(&state);
    self.publish(&state);
    song
  }

  /// Reemplaza los campos editables de la canción `id`. Sin efecto si no existe.
  pub fn update(&self, id: SongId, input: SongInput) {
    let mut state = self.state();
    self.load_locked(&mut state);

    let now = self.clock.now_millis();
    let Some(song) = state.songs.iter_mut().find(|song| song.id == id) else {
      debug!(%id, "update ignored: unknown song");
      return;
    };
    song.apply(input, now);
    debug!(%id, "song updated");

    self.persist(&state);
    self.publish(&state);
  }

  /// Elimina la canción `id` si existe.
  pub fn remove(&self, id: SongId) {
    let mut state = self.state();
    self.load_locked(&mut state);

    let before = state.songs.len();
    state.songs.retain(|song| song.id != id);
    if state.songs.len() == before {
      debug!(%id, "remove ignored: unknown song");
      return;
    }
    debug!(%id, "song removed");

    self.persist(&state);
    self.publish(&state);
  }

  fn state(&self) -> MutexGuard<'_, CatalogState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn load_locked(&self, state: &mut CatalogState) {
    if !state.loading {
      return;
    }

    state.songs = match self.store.get(keys::SONGS) {
      Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "stored songs are corrupt, starting with an empty catalog");
        Vec::new()
      }),
      Ok(None) => Vec::new(),
      Err(e) => {
        warn!(error = %e, "could not read stored songs, starting with an empty catalog");
        Vec::new()
      }
    };
    state.loading = false;
    debug!(count = state.songs.len(), "catalog loaded");

    self.publish(state);
  }

  fn persist(&self, state: &CatalogState) {
    let result = serde_json::to_string(&state.songs)
      .map_err(|e| e.to_string())
      .and_then(|json| self.store.set(keys::SONGS, &json).map_err(|e| e.to_string()));

    if let Err(e) = result {
      warn!(error = %e, "failed to persist songs");
    }
  }

  fn publish(&self, state: &CatalogState) {
    let visible = if state.filter.is_empty() {
      state.songs.clone()
    } else {
      let term = state.filter.to_lowercase();
      state.songs.iter().filter(|song| song.matches_lowercase(&term)).cloned().collect()
    };
    self.view.send_replace(visible);
  }
}
