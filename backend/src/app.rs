use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use songbook_core::domain::{MusicalKey, Song, SongInput, VideoReference};
use songbook_core::ports::{KeyValueStore, VideoMetadataLookup};
use songbook_core::services::{AccountSettings, AccountStore, CatalogStore, VideoResolver};
use songbook_core::CoreError;
use tracing::{debug, info};

use crate::cli::{AuthCommand, Command, SongFields, SongsCommand, VideoCommand};
use crate::infrastructure::chord_sheet;

/// The three stores wired over one key/value backend.
pub struct App<S: KeyValueStore, L: VideoMetadataLookup> {
  catalog: CatalogStore<Arc<S>>,
  accounts: AccountStore<Arc<S>>,
  resolver: VideoResolver<L>,
}

impl<S: KeyValueStore, L: VideoMetadataLookup> App<S, L> {
  pub fn new(store: S, lookup: L, accounts: AccountSettings) -> Self {
    let store = Arc::new(store);
    App {
      catalog: CatalogStore::open(Arc::clone(&store)),
      accounts: AccountStore::open(store, accounts),
      resolver: VideoResolver::new(lookup),
    }
  }

  pub async fn execute(&self, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
      Command::Songs(cmd) => self.songs(cmd, out).await,
      Command::Auth(cmd) => self.auth(cmd, out).await,
      Command::Video(cmd) => self.video(cmd, out).await,
    }
  }

  async fn songs(&self, command: SongsCommand, out: &mut impl Write) -> Result<()> {
    match command {
      SongsCommand::List { filter, json } => {
        if let Some(term) = filter {
          self.catalog.set_filter(term);
        }
        let songs = self.catalog.list();
        if json {
          writeln!(out, "{}", serde_json::to_string_pretty(&songs)?)?;
        } else if songs.is_empty() {
          writeln!(out, "No songs.")?;
        } else {
          for song in &songs {
            writeln!(out, "{}", summary(song))?;
          }
        }
      }
      SongsCommand::Show { id, raw, json } => {
        let song = self.catalog.get(id).ok_or(CoreError::NotFound).with_context(|| format!("song {id}"))?;
        if json {
          writeln!(out, "{}", serde_json::to_string_pretty(&song)?)?;
        } else {
          write_song(&song, raw, out)?;
        }
      }
      SongsCommand::Add(fields) => {
        self.accounts.require_session()?;
        let mut input = SongInput::draft(MusicalKey::C);
        fields.apply_to(&mut input).context("could not read lyrics")?;
        self.fill_from_video(&mut input).await;
        input.validate()?;

        let song = self.catalog.add(input);
        info!(id = %song.id, "song added");
        writeln!(out, "Added {}", summary(&song))?;
      }
      SongsCommand::Edit { id, fields } => {
        self.accounts.require_session()?;
        let song = self.catalog.get(id).ok_or(CoreError::NotFound).with_context(|| format!("song {id}"))?;
        let mut input = song.to_input();
        fields.apply_to(&mut input).context("could not read lyrics")?;
        self.fill_from_video(&mut input).await;
        input.validate()?;

        self.catalog.update(id, input);
        info!(%id, "song updated");
        writeln!(out, "Updated {id}")?;
      }
      SongsCommand::Remove { id } => {
        self.accounts.require_session()?;
        if self.catalog.get(id).is_none() {
          return Err(CoreError::NotFound).with_context(|| format!("song {id}"));
        }
        self.catalog.remove(id);
        info!(%id, "song removed");
        writeln!(out, "Removed {id}")?;
      }
    }
    Ok(())
  }

  /// Fills an empty title or artist from the linked video, when it resolves.
  async fn fill_from_video(&self, input: &mut SongInput) {
    if !input.title.is_empty() && !input.artist.is_empty() {
      return;
    }
    let Some(url) = input.video_url.clone() else {
      return;
    };
    match self.resolver.resolve_metadata(&url).await {
      Some(reference) => input.apply_video_metadata(&reference),
      None => debug!(url = %url, "no video metadata to fill the form"),
    }
  }

  async fn auth(&self, command: AuthCommand, out: &mut impl Write) -> Result<()> {
    match command {
      AuthCommand::Login { email, password } => {
        if !self.accounts.login(&email, &password).await {
          bail!("invalid email or password");
        }
        self.write_session(out)?;
      }
      AuthCommand::Register { name, email, password } => {
        if !self.accounts.register(&name, &email, &password).await {
          bail!("could not register {email}");
        }
        self.write_session(out)?;
      }
      AuthCommand::Logout => {
        self.accounts.logout();
        writeln!(out, "Signed out.")?;
      }
      AuthCommand::Whoami => match self.accounts.session() {
        Some(_) => self.write_session(out)?,
        None => writeln!(out, "Not signed in.")?,
      },
    }
    Ok(())
  }

  fn write_session(&self, out: &mut impl Write) -> Result<()> {
    let session = self.accounts.require_session()?;
    writeln!(out, "Signed in as {} <{}>", session.name, session.email)?;
    Ok(())
  }

  async fn video(&self, command: VideoCommand, out: &mut impl Write) -> Result<()> {
    match command {
      VideoCommand::Id { url } => {
        let Some(id) = self.resolver.extract_video_id(&url) else {
          bail!("no video id in {url}");
        };
        writeln!(out, "{id}")?;
      }
      VideoCommand::Resolve { url } => {
        let reference = match self.resolver.resolve_metadata(&url).await {
          Some(reference) => reference,
          None => {
            let Some(reference) = VideoReference::from_url(&url) else {
              bail!("no video id in {url}");
            };
            writeln!(out, "No metadata available.")?;
            reference
          }
        };
        writeln!(out, "Id:     {}", reference.video_id)?;
        if let Some(title) = &reference.title {
          writeln!(out, "Title:  {title}")?;
        }
        if let Some(artist) = &reference.artist {
          writeln!(out, "Artist: {artist}")?;
        }
        writeln!(out, "Watch:  {}", reference.watch_url())?;
        writeln!(out, "Embed:  {}", reference.embed_url(false, false))?;
      }
    }
    Ok(())
  }
}

fn summary(song: &Song) -> String {
  format!("{}  {} - {} ({}, {} bpm)", song.id, song.title, song.artist, song.key, song.tempo)
}

fn write_song(song: &Song, raw: bool, out: &mut impl Write) -> Result<()> {
  writeln!(out, "{}", song.title)?;
  writeln!(out, "{}", song.artist)?;
  writeln!(out, "Key: {}  BPM: {}", song.key, song.tempo)?;
  if let Some(video) = song.video_url.as_deref().and_then(VideoReference::from_url) {
    writeln!(out, "Video: {}", video.watch_url())?;
  }
  writeln!(out)?;
  if raw {
    writeln!(out, "{}", song.lyrics)?;
  } else {
    writeln!(out, "{}", chord_sheet::render(&song.lyrics))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use songbook_core::domain::SongId;
  use songbook_core::ports::{LookupError, MemoryStore, OEmbedMetadata};
  use std::time::Duration;

  const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

  struct FixedLookup(Option<OEmbedMetadata>);

  #[async_trait]
  impl VideoMetadataLookup for FixedLookup {
    async fn lookup(&self, _url: &str) -> Result<OEmbedMetadata, LookupError> {
      self.0.clone().ok_or(LookupError::Status(404))
    }
  }

  fn app(lookup: FixedLookup) -> App<MemoryStore, FixedLookup> {
    let settings = AccountSettings { login_latency: Duration::ZERO, ..AccountSettings::default() };
    App::new(MemoryStore::new(), lookup, settings)
  }

  fn no_lookup() -> FixedLookup {
    FixedLookup(None)
  }

  async fn run(app: &App<MemoryStore, FixedLookup>, command: Command) -> Result<String> {
    let mut out = Vec::new();
    app.execute(command, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
  }

  async fn sign_in(app: &App<MemoryStore, FixedLookup>) {
    let defaults = AccountSettings::default().default_account;
    let login = AuthCommand::Login { email: defaults.email, password: defaults.secret };
    run(app, Command::Auth(login)).await.unwrap();
  }

  fn fields(title: &str, artist: &str, lyrics: &str) -> SongFields {
    SongFields {
      title: Some(title.into()),
      artist: Some(artist.into()),
      lyrics: Some(lyrics.into()),
      ..SongFields::default()
    }
  }

  #[tokio::test]
  async fn song_mutations_require_a_session() {
    let app = app(no_lookup());

    let err = run(&app, Command::Songs(SongsCommand::Add(fields("T", "A", "L")))).await.unwrap_err();

    assert_eq!(err.downcast_ref::<CoreError>(), Some(&CoreError::Unauthenticated));
    assert!(app.catalog.all().is_empty());
  }

  #[tokio::test]
  async fn add_fills_title_and_artist_from_the_video() {
    let metadata = OEmbedMetadata {
      title: Some("Never Gonna Give You Up (Official Music Video)".into()),
      author_name: Some("Rick Astley".into()),
    };
    let app = app(FixedLookup(Some(metadata)));
    sign_in(&app).await;

    let add = SongFields { lyrics: Some("[A]Never".into()), youtube_url: Some(URL.into()), ..SongFields::default() };
    run(&app, Command::Songs(SongsCommand::Add(add))).await.unwrap();

    let songs = app.catalog.all();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].title, "Never Gonna Give You Up");
    assert_eq!(songs[0].artist, "Rick Astley");
    assert_eq!(songs[0].tempo, 120);
  }

  #[tokio::test]
  async fn add_rejects_incomplete_songs() {
    let app = app(no_lookup());
    sign_in(&app).await;

    let add = SongFields { lyrics: Some("la".into()), youtube_url: Some(URL.into()), ..SongFields::default() };
    let err = run(&app, Command::Songs(SongsCommand::Add(add))).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Validation { field: "title", .. })));
  }

  #[tokio::test]
  async fn list_applies_the_filter() {
    let app = app(no_lookup());
    sign_in(&app).await;
    run(&app, Command::Songs(SongsCommand::Add(fields("Amazing Grace", "Newton", "x")))).await.unwrap();
    run(&app, Command::Songs(SongsCommand::Add(fields("Wonderwall", "Oasis", "y")))).await.unwrap();

    let listed = run(&app, Command::Songs(SongsCommand::List { filter: Some("OASIS".into()), json: false })).await.unwrap();

    assert!(listed.contains("Wonderwall"));
    assert!(!listed.contains("Amazing Grace"));
  }

  #[tokio::test]
  async fn edit_changes_only_the_given_fields() {
    let app = app(no_lookup());
    sign_in(&app).await;
    run(&app, Command::Songs(SongsCommand::Add(fields("Hallelujah", "Cohen", "[C]I heard")))).await.unwrap();
    let id = app.catalog.all()[0].id;

    let edit = SongFields { bpm: Some(56), ..SongFields::default() };
    run(&app, Command::Songs(SongsCommand::Edit { id, fields: edit })).await.unwrap();

    let song = app.catalog.get(id).unwrap();
    assert_eq!(song.tempo, 56);
    assert_eq!(song.title, "Hallelujah");
  }

  #[tokio::test]
  async fn unknown_ids_are_reported() {
    let app = app(no_lookup());
    sign_in(&app).await;

    let err = run(&app, Command::Songs(SongsCommand::Remove { id: SongId::new() })).await.unwrap_err();

    assert_eq!(err.downcast_ref::<CoreError>(), Some(&CoreError::NotFound));
  }

  #[tokio::test]
  async fn show_renders_the_chord_sheet() {
    let app = app(no_lookup());
    sign_in(&app).await;
    run(&app, Command::Songs(SongsCommand::Add(fields("Amazing Grace", "Newton", "[G]Amazing [D]grace")))).await.unwrap();
    let id = app.catalog.all()[0].id;

    let shown = run(&app, Command::Songs(SongsCommand::Show { id, raw: false, json: false })).await.unwrap();

    assert!(shown.contains("G       D\nAmazing grace"));
  }

  #[tokio::test]
  async fn register_twice_fails_and_logout_clears_the_session() {
    let app = app(no_lookup());
    let register = || AuthCommand::Register { name: "Ana".into(), email: "ana@example.com".into(), password: "pw".into() };

    let first = run(&app, Command::Auth(register())).await.unwrap();
    assert!(first.contains("Signed in as Ana <ana@example.com>"));
    assert!(run(&app, Command::Auth(register())).await.is_err());

    run(&app, Command::Auth(AuthCommand::Logout)).await.unwrap();
    let whoami = run(&app, Command::Auth(AuthCommand::Whoami)).await.unwrap();
    assert_eq!(whoami, "Not signed in.\n");
  }

  #[tokio::test]
  async fn resolve_without_metadata_still_prints_links() {
    let app = app(no_lookup());

    let printed = run(&app, Command::Video(VideoCommand::Resolve { url: URL.into() })).await.unwrap();

    assert!(printed.starts_with("No metadata available.\nId:     dQw4w9WgXcQ\n"));
    assert!(printed.contains("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=0&mute=0"));
    assert!(run(&app, Command::Video(VideoCommand::Id { url: "https://example.com".into() })).await.is_err());
  }
}
