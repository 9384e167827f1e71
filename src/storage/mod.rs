//! Article types and the durable local store for saved articles and settings.

mod local;
mod saved;
mod types;

pub use local::LocalStorage;
pub use saved::SavedSet;
pub use types::{Article, Settings, Source, StorageError, ViewMode};
