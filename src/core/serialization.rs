use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::simulation::bounty::LifeChatData;
use crate::world::repository::StoreError;

pub const SAVE_VERSION: u32 = 1;

/// Everything that survives a restart: one record per chat group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    #[serde(default = "default_save_version")]
    pub version: u32,
    #[serde(default)]
    pub chats: Vec<LifeChatData>,
}

fn default_save_version() -> u32 {
    SAVE_VERSION
}

impl SaveState {
    pub fn new(chats: Vec<LifeChatData>) -> Self {
        Self {
            version: SAVE_VERSION,
            chats,
        }
    }
}

/// Serialize a save state into JSON for persistence.
pub fn save_state_to_json(state: &SaveState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}

/// Deserialize JSON back into a save state.
pub fn load_state_from_json(data: &str) -> serde_json::Result<SaveState> {
    serde_json::from_str(data)
}

/// Write a save state to a file path.
pub fn save_state_to_path<P: AsRef<Path>>(state: &SaveState, path: P) -> Result<(), StoreError> {
    let json = save_state_to_json(state)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a save state from a file path.
pub fn load_state_from_path<P: AsRef<Path>>(path: P) -> Result<SaveState, StoreError> {
    let data = fs::read_to_string(&path)?;
    let state = load_state_from_json(&data)?;
    if state.version > SAVE_VERSION {
        return Err(StoreError::InvalidData(format!(
            "save version {} is newer than supported {}",
            state.version, SAVE_VERSION
        )));
    }
    Ok(state)
}
