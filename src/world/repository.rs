use thiserror::Error;

use crate::simulation::bounty::LifeChatData;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    InvalidData(String),
}

/// Durable home of the per-chat economy records.
pub trait ChatRepository {
    fn load(&mut self) -> Result<Vec<LifeChatData>, StoreError>;
    fn save(&mut self, chats: &[LifeChatData]) -> Result<(), StoreError>;
}
