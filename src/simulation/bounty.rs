use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::components::identity::{ChatId, UserId};
use crate::simulation::registry::HospitalSnapshot;

/// A chat-scoped reward on a target. One record per target; police and
/// player contributions share it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounty {
    pub user_id: UserId,
    #[serde(rename = "bounty")]
    pub amount: i64,
    #[serde(default)]
    pub is_police_bounty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalStay {
    pub user_id: UserId,
    pub minutes: i64,
}

/// Persisted per-chat record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeChatData {
    pub chat_id: ChatId,
    #[serde(default)]
    pub users_not_tagged: Vec<UserId>,
    #[serde(default)]
    pub bounties: Vec<Bounty>,
    #[serde(default)]
    pub users_in_hospital: Vec<HospitalStay>,
}

impl LifeChatData {
    pub fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            users_not_tagged: Vec::new(),
            bounties: Vec::new(),
            users_in_hospital: Vec::new(),
        }
    }

    pub fn bounty_for(&self, user_id: UserId) -> Option<&Bounty> {
        self.bounties.iter().find(|bounty| bounty.user_id == user_id)
    }

    fn bounty_for_mut(&mut self, user_id: UserId) -> Option<&mut Bounty> {
        self.bounties.iter_mut().find(|bounty| bounty.user_id == user_id)
    }

    /// Merges duplicate records per target into the first one. Returns how many were folded away.
    pub fn normalize(&mut self) -> usize {
        let before = self.bounties.len();
        let mut merged: Vec<Bounty> = Vec::with_capacity(before);
        for bounty in self.bounties.drain(..) {
            match merged.iter_mut().find(|b| b.user_id == bounty.user_id) {
                Some(existing) => {
                    existing.amount += bounty.amount;
                    existing.is_police_bounty |= bounty.is_police_bounty;
                }
                None => merged.push(bounty),
            }
        }
        merged.retain(|bounty| bounty.amount > 0 || bounty.is_police_bounty);
        self.bounties = merged;

        self.users_not_tagged.sort();
        self.users_not_tagged.dedup();
        before - self.bounties.len()
    }
}

/// Bounties and notification preferences for every chat group.
#[derive(Resource, Debug, Default)]
pub struct ChatEconomyStore {
    chats: BTreeMap<ChatId, LifeChatData>,
}

impl ChatEconomyStore {
    pub fn get_or_create(&mut self, chat_id: ChatId) -> &mut LifeChatData {
        self.chats
            .entry(chat_id)
            .or_insert_with(|| LifeChatData::new(chat_id))
    }

    pub fn get(&self, chat_id: ChatId) -> Option<&LifeChatData> {
        self.chats.get(&chat_id)
    }

    pub fn chats(&self) -> impl Iterator<Item = &LifeChatData> {
        self.chats.values()
    }

    /// Installs a loaded record, normalizing legacy duplicate bounties.
    pub fn insert(&mut self, mut data: LifeChatData) {
        let folded = data.normalize();
        if folded > 0 {
            warn!(chat = %data.chat_id, folded, "merged duplicate bounty records");
        }
        self.chats.insert(data.chat_id, data);
    }

    /// Adds to the target's record and flags it as police-sourced. Returns the new total.
    pub fn add_police_bounty(&mut self, chat_id: ChatId, user_id: UserId, amount: f64) -> i64 {
        let chat = self.get_or_create(chat_id);
        match chat.bounty_for_mut(user_id) {
            Some(bounty) => {
                bounty.amount = (bounty.amount as f64 + amount).round() as i64;
                bounty.is_police_bounty = true;
                bounty.amount
            }
            None => {
                let amount = amount.round() as i64;
                chat.bounties.push(Bounty {
                    user_id,
                    amount,
                    is_police_bounty: true,
                });
                amount
            }
        }
    }

    /// Adds a player-funded contribution; an existing police flag is kept.
    pub fn place_bounty(
        &mut self,
        chat_id: ChatId,
        placer: UserId,
        target: UserId,
        amount: i64,
    ) -> i64 {
        let chat = self.get_or_create(chat_id);
        let total = match chat.bounty_for_mut(target) {
            Some(bounty) => {
                bounty.amount += amount;
                bounty.amount
            }
            None => {
                chat.bounties.push(Bounty {
                    user_id: target,
                    amount,
                    is_police_bounty: false,
                });
                amount
            }
        };
        tracing::debug!(chat = %chat_id, placer = %placer, target = %target, amount, total, "bounty placed");
        total
    }

    pub fn bounty_for(&self, chat_id: ChatId, user_id: UserId) -> Option<&Bounty> {
        self.get(chat_id).and_then(|chat| chat.bounty_for(user_id))
    }

    pub fn total_bounty_for_user(&self, chat_id: ChatId, user_id: UserId) -> i64 {
        self.get(chat_id)
            .map(|chat| {
                chat.bounties
                    .iter()
                    .filter(|bounty| bounty.user_id == user_id)
                    .map(|bounty| bounty.amount)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Highest first; equal amounts keep insertion order.
    pub fn list_bounties(&self, chat_id: ChatId) -> Vec<Bounty> {
        let mut bounties = self
            .get(chat_id)
            .map(|chat| chat.bounties.clone())
            .unwrap_or_default();
        bounties.sort_by(|a, b| b.amount.cmp(&a.amount));
        bounties
    }

    /// Removes the target's record so a killer can collect it.
    pub fn claim_bounty(&mut self, chat_id: ChatId, user_id: UserId) -> Option<Bounty> {
        let chat = self.chats.get_mut(&chat_id)?;
        let index = chat.bounties.iter().position(|b| b.user_id == user_id)?;
        Some(chat.bounties.remove(index))
    }

    /// Lowers the user's own record, police-flagged or not, never below zero.
    /// Returns the amount actually removed.
    pub fn reduce_bounty(&mut self, chat_id: ChatId, user_id: UserId, amount: i64) -> i64 {
        let Some(chat) = self.chats.get_mut(&chat_id) else {
            return 0;
        };
        let Some(bounty) = chat.bounty_for_mut(user_id) else {
            return 0;
        };
        let reduction = amount.clamp(0, bounty.amount.max(0));
        bounty.amount -= reduction;
        if bounty.amount == 0 {
            chat.bounties.retain(|b| b.user_id != user_id);
        }
        reduction
    }

    pub fn is_tagged(&self, chat_id: ChatId, user_id: UserId) -> bool {
        self.get(chat_id)
            .map(|chat| !chat.users_not_tagged.contains(&user_id))
            .unwrap_or(true)
    }

    /// Flips the opt-out flag. Returns whether the user is tagged afterwards.
    pub fn toggle_tagging(&mut self, chat_id: ChatId, user_id: UserId) -> bool {
        let chat = self.get_or_create(chat_id);
        if let Some(index) = chat.users_not_tagged.iter().position(|id| *id == user_id) {
            chat.users_not_tagged.remove(index);
            true
        } else {
            chat.users_not_tagged.push(user_id);
            false
        }
    }

    /// Replaces every chat's hospital list with the given snapshot.
    pub fn record_hospital_stays(&mut self, snapshots: &[HospitalSnapshot]) {
        for chat in self.chats.values_mut() {
            chat.users_in_hospital.clear();
        }
        for snapshot in snapshots {
            self.get_or_create(snapshot.chat_id)
                .users_in_hospital
                .push(HospitalStay {
                    user_id: snapshot.user_id,
                    minutes: snapshot.minutes,
                });
        }
    }

    /// Drains the persisted hospital lists so they can be re-armed.
    pub fn take_hospital_stays(&mut self) -> Vec<HospitalSnapshot> {
        let mut stays = Vec::new();
        for chat in self.chats.values_mut() {
            let chat_id = chat.chat_id;
            stays.extend(chat.users_in_hospital.drain(..).map(|stay| HospitalSnapshot {
                chat_id,
                user_id: stay.user_id,
                minutes: stay.minutes,
            }));
        }
        stays
    }
}
