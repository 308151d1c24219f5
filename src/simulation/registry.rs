use std::collections::HashMap;

use bevy_ecs::prelude::*;

use crate::components::identity::{ChatId, UserId, UserRef};
use crate::simulation::life_user::LifeUser;
use crate::simulation::occupation::OccupationKind;

/// Snapshot of a live hospital stay, taken for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HospitalSnapshot {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub minutes: i64,
}

/// Every user the game has seen, keyed per chat so occupations never cross groups.
/// Entries are created lazily and never removed.
#[derive(Resource, Debug, Default)]
pub struct LifeRegistry {
    users: HashMap<(ChatId, UserId), LifeUser>,
}

impl LifeRegistry {
    pub fn find_or_create(&mut self, chat_id: ChatId, user: &UserRef) -> &mut LifeUser {
        let life_user = self
            .users
            .entry((chat_id, user.id))
            .or_insert_with(|| LifeUser::new(user.clone()));
        life_user.rename(&user.name);
        life_user
    }

    pub fn get(&self, chat_id: ChatId, id: UserId) -> Option<&LifeUser> {
        self.users.get(&(chat_id, id))
    }

    pub fn get_mut(&mut self, chat_id: ChatId, id: UserId) -> Option<&mut LifeUser> {
        self.users.get_mut(&(chat_id, id))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Users in `chat_id` whose occupation matches `filter`, ordered by end time.
    pub fn occupied_in<F>(&self, chat_id: ChatId, filter: F) -> Vec<&LifeUser>
    where
        F: Fn(OccupationKind) -> bool,
    {
        let mut users: Vec<&LifeUser> = self
            .users
            .iter()
            .filter(|((chat, _), user)| {
                *chat == chat_id
                    && user
                        .occupation()
                        .map(|occupation| filter(occupation.kind()))
                        .unwrap_or(false)
            })
            .map(|(_, user)| user)
            .collect();
        users.sort_by_key(|user| {
            (
                user.occupation().map(|o| o.end_time_ms()).unwrap_or(0),
                user.user().id,
            )
        });
        users
    }

    pub fn roster(&self, chat_id: ChatId, now_ms: u64, filter: fn(OccupationKind) -> bool) -> Vec<String> {
        self.occupied_in(chat_id, filter)
            .into_iter()
            .filter_map(|user| user.building_entry(now_ms))
            .collect()
    }

    /// Remaining time of every hospitalized user. Pure; may be called at any time.
    pub fn hospital_snapshots(&self, now_ms: u64) -> Vec<HospitalSnapshot> {
        let mut snapshots: Vec<HospitalSnapshot> = self
            .users
            .iter()
            .filter_map(|((chat_id, _), user)| {
                let occupation = user.occupation()?;
                (occupation.kind() == OccupationKind::Hospitalized).then(|| HospitalSnapshot {
                    chat_id: *chat_id,
                    user_id: user.user().id,
                    minutes: occupation.remaining_minutes(now_ms),
                })
            })
            .collect();
        snapshots.sort_by_key(|snapshot| (snapshot.chat_id, snapshot.user_id));
        snapshots
    }
}
