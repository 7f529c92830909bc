pub mod clock;
pub mod metadata;
pub mod storage;

pub use clock::{Clock, SystemClock};
pub use metadata::{LookupError, OEmbedMetadata, VideoMetadataLookup};
pub use storage::{KeyValueStore, MemoryStore, StorageError, keys};
