//! Collaborators supplied by the chat platform: the score ledger and the user directory.

use std::collections::HashMap;

use bevy_ecs::prelude::*;

use crate::components::identity::{ChatId, UserId, UserRef};

/// Per-chat score ledger. The ledger may clamp a change; callers must report
/// the returned delta, never the requested one.
pub trait ScoreLedger {
    fn score(&self, chat_id: ChatId, user_id: UserId) -> i64;
    fn alter_score(&mut self, chat_id: ChatId, user_id: UserId, delta: i64) -> i64;
}

pub trait UserDirectory {
    /// Resolves `@handle` or `handle`, case-insensitively, within a chat.
    fn find_by_handle(&self, chat_id: ChatId, handle: &str) -> Option<UserRef>;
    fn find_by_id(&self, chat_id: ChatId, user_id: UserId) -> Option<UserRef>;
}

/// Host collaborators installed into the world.
#[derive(Resource)]
pub struct HostServices {
    pub ledger: Box<dyn ScoreLedger + Send + Sync>,
    pub directory: Box<dyn UserDirectory + Send + Sync>,
}

impl HostServices {
    pub fn new(
        ledger: impl ScoreLedger + Send + Sync + 'static,
        directory: impl UserDirectory + Send + Sync + 'static,
    ) -> Self {
        Self {
            ledger: Box::new(ledger),
            directory: Box::new(directory),
        }
    }

    /// Directory name for `user_id`, falling back to the numeric id.
    pub fn user_or_placeholder(&self, chat_id: ChatId, user_id: UserId) -> UserRef {
        self.directory
            .find_by_id(chat_id, user_id)
            .unwrap_or_else(|| UserRef {
                id: user_id,
                name: user_id.to_string(),
            })
    }
}

pub fn normalize_handle(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_lowercase()
}

/// In-process ledger whose scores never drop below zero.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    scores: HashMap<(ChatId, UserId), i64>,
}

impl MemoryLedger {
    pub fn with_score(mut self, chat_id: ChatId, user_id: UserId, score: i64) -> Self {
        self.scores.insert((chat_id, user_id), score.max(0));
        self
    }
}

impl ScoreLedger for MemoryLedger {
    fn score(&self, chat_id: ChatId, user_id: UserId) -> i64 {
        self.scores.get(&(chat_id, user_id)).copied().unwrap_or(0)
    }

    fn alter_score(&mut self, chat_id: ChatId, user_id: UserId, delta: i64) -> i64 {
        let score = self.scores.entry((chat_id, user_id)).or_insert(0);
        let updated = score.saturating_add(delta).max(0);
        let applied = updated - *score;
        *score = updated;
        applied
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryDirectory {
    members: HashMap<ChatId, Vec<UserRef>>,
}

impl MemoryDirectory {
    pub fn with_member(mut self, chat_id: ChatId, user: UserRef) -> Self {
        self.add_member(chat_id, user);
        self
    }

    pub fn add_member(&mut self, chat_id: ChatId, user: UserRef) {
        let members = self.members.entry(chat_id).or_default();
        members.retain(|member| member.id != user.id);
        members.push(user);
    }
}

impl UserDirectory for MemoryDirectory {
    fn find_by_handle(&self, chat_id: ChatId, handle: &str) -> Option<UserRef> {
        let wanted = normalize_handle(handle);
        if wanted.is_empty() {
            return None;
        }
        self.members
            .get(&chat_id)?
            .iter()
            .find(|member| member.name.to_lowercase() == wanted)
            .cloned()
    }

    fn find_by_id(&self, chat_id: ChatId, user_id: UserId) -> Option<UserRef> {
        self.members
            .get(&chat_id)?
            .iter()
            .find(|member| member.id == user_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: ChatId = ChatId(1);

    #[test]
    fn ledger_reports_clamped_delta() {
        let mut ledger = MemoryLedger::default().with_score(CHAT, UserId(1), 50);
        assert_eq!(ledger.alter_score(CHAT, UserId(1), -80), -50);
        assert_eq!(ledger.score(CHAT, UserId(1)), 0);
        assert_eq!(ledger.alter_score(CHAT, UserId(1), 30), 30);
    }

    #[test]
    fn handles_resolve_with_or_without_at_sign() {
        let directory = MemoryDirectory::default().with_member(CHAT, UserRef::new(2, "Bob"));
        assert_eq!(directory.find_by_handle(CHAT, "@bob").unwrap().id, UserId(2));
        assert_eq!(directory.find_by_handle(CHAT, "BOB").unwrap().id, UserId(2));
        assert!(directory.find_by_handle(CHAT, "@").is_none());
        assert!(directory.find_by_handle(ChatId(2), "bob").is_none());
    }
}
