pub mod account;
pub mod chords;
pub mod ids;
pub mod musical_key;
pub mod song;
pub mod video;

pub use account::{Account, NewAccount, Session};
pub use chords::{Token, TokenKind, tokenize};
pub use ids::{AccountId, SongId};
pub use musical_key::MusicalKey;
pub use song::{Song, SongInput};
pub use video::{VideoId, VideoReference, extract_video_id, parse_video_title};
