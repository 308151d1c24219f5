pub mod json;
pub mod repository;
pub mod sqlite;

pub use json::JsonChatFile;
pub use repository::{ChatRepository, StoreError};
pub use sqlite::ChatDb;
