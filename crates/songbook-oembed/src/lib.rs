mod client;
mod config;

pub use client::NoembedClient;
pub use config::{DEFAULT_ENDPOINT, OEmbedConfig};
