use std::path::{Path, PathBuf};

use crate::core::serialization::{load_state_from_path, save_state_to_path, SaveState};
use crate::simulation::bounty::LifeChatData;
use crate::world::repository::{ChatRepository, StoreError};

/// Chat records kept as one pretty-printed JSON document.
pub struct JsonChatFile {
    path: PathBuf,
}

impl JsonChatFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChatRepository for JsonChatFile {
    /// A missing file is an empty store.
    fn load(&mut self) -> Result<Vec<LifeChatData>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        Ok(load_state_from_path(&self.path)?.chats)
    }

    fn save(&mut self, chats: &[LifeChatData]) -> Result<(), StoreError> {
        save_state_to_path(&SaveState::new(chats.to_vec()), &self.path)
    }
}
