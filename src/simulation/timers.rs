use std::collections::BTreeMap;

use bevy_ecs::prelude::*;

use crate::components::identity::{ChatId, UserId};
use crate::simulation::occupation::OccupationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Side effect applied when an occupation runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Pay the worker through the score ledger.
    Paycheck { reward: i64 },
    /// Work off part of the user's own bounty record, police-flagged or not.
    CommunityService { reduction: i64 },
    /// Notify only (prison sentence served, hospital discharge).
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledCompletion {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub kind: OccupationKind,
    pub due_ms: u64,
    pub completion: Completion,
}

/// Single-shot completion tasks, keyed by timer id.
/// An entry is removed exactly once, either by firing or by cancellation.
#[derive(Resource, Debug, Default)]
pub struct OccupationTimers {
    next_id: u64,
    pending: BTreeMap<TimerId, ScheduledCompletion>,
}

impl OccupationTimers {
    pub fn schedule(&mut self, task: ScheduledCompletion) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.insert(id, task);
        id
    }

    /// Drops a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn get(&self, id: TimerId) -> Option<&ScheduledCompletion> {
        self.pending.get(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every task due at `now_ms`, earliest first.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<(TimerId, ScheduledCompletion)> {
        let due_ids: Vec<TimerId> = self
            .pending
            .iter()
            .filter(|(_, task)| task.due_ms <= now_ms)
            .map(|(id, _)| *id)
            .collect();
        let mut due: Vec<(TimerId, ScheduledCompletion)> = due_ids
            .into_iter()
            .filter_map(|id| self.pending.remove(&id).map(|task| (id, task)))
            .collect();
        due.sort_by_key(|(id, task)| (task.due_ms, *id));
        due
    }
}
