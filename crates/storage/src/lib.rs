#![forbid(unsafe_code)]

pub mod document;
pub mod repository;
pub mod store;

pub use document::StateDocument;
pub use repository::{STATE_KEY, STORAGE_VERSION, StateRepository, THEME_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError};
