use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use songbook_core::domain::{MusicalKey, SongId, SongInput};

/// Personal song and lyrics catalog.
#[derive(Parser, Debug)]
#[command(name = "songbook")]
#[command(about = "Personal song and lyrics catalog")]
#[command(version)]
pub struct Cli {
  /// Directory holding the JSON collections (overrides `[storage] data_dir`)
  #[arg(long, global = true, env = "SONGBOOK_DATA_DIR")]
  pub data_dir: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Browse and edit the song catalog
  #[command(subcommand)]
  Songs(SongsCommand),

  /// Sign in, register and sign out
  #[command(subcommand)]
  Auth(AuthCommand),

  /// Inspect YouTube links
  #[command(subcommand)]
  Video(VideoCommand),
}

#[derive(Subcommand, Debug)]
pub enum SongsCommand {
  /// List songs, optionally filtered by title, artist or key
  List {
    #[arg(long)]
    filter: Option<String>,
    /// Print the songs as JSON
    #[arg(long)]
    json: bool,
  },
  /// Show one song with its chord sheet
  Show {
    id: SongId,
    /// Print the lyrics exactly as stored
    #[arg(long)]
    raw: bool,
    #[arg(long, conflicts_with = "raw")]
    json: bool,
  },
  /// Add a song (title and artist are filled from the video when omitted)
  Add(SongFields),
  /// Change fields of an existing song
  Edit {
    id: SongId,
    #[command(flatten)]
    fields: SongFields,
  },
  /// Delete a song
  Remove { id: SongId },
}

#[derive(Args, Debug, Default, Clone)]
pub struct SongFields {
  #[arg(long)]
  pub title: Option<String>,
  #[arg(long)]
  pub artist: Option<String>,
  #[arg(long)]
  pub key: Option<MusicalKey>,
  #[arg(long)]
  pub bpm: Option<u32>,
  /// Lyrics with inline chords, e.g. "[G]Amazing [D]grace"
  #[arg(long, conflicts_with = "lyrics_file")]
  pub lyrics: Option<String>,
  #[arg(long)]
  pub lyrics_file: Option<PathBuf>,
  /// YouTube link; an empty value clears it
  #[arg(long)]
  pub youtube_url: Option<String>,
}

impl SongFields {
  /// Overwrites the fields given on the command line.
  pub fn apply_to(self, input: &mut SongInput) -> std::io::Result<()> {
    if let Some(title) = self.title {
      input.title = title;
    }
    if let Some(artist) = self.artist {
      input.artist = artist;
    }
    if let Some(key) = self.key {
      input.key = key;
    }
    if let Some(bpm) = self.bpm {
      input.tempo = bpm;
    }
    if let Some(lyrics) = self.lyrics {
      input.lyrics = lyrics;
    }
    if let Some(path) = self.lyrics_file {
      input.lyrics = std::fs::read_to_string(path)?;
    }
    if let Some(url) = self.youtube_url {
      let url = url.trim();
      input.video_url = (!url.is_empty()).then(|| url.to_string());
    }
    Ok(())
  }
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
  Login { email: String, password: String },
  Register { name: String, email: String, password: String },
  Logout,
  /// Show the signed-in account
  Whoami,
}

#[derive(Subcommand, Debug)]
pub enum VideoCommand {
  /// Print the 11-character video id of a link
  Id { url: String },
  /// Look up title and channel of a link
  Resolve { url: String },
}
