pub mod account_service;
pub mod catalog_service;
pub mod video_resolver;

pub use account_service::{AccountSettings, AccountStore};
pub use catalog_service::CatalogStore;
pub use video_resolver::VideoResolver;
