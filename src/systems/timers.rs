use bevy_ecs::prelude::*;
use tracing::{debug, info, warn};

use crate::components::identity::{ChatId, UserId, UserRef};
use crate::simulation::bounty::ChatEconomyStore;
use crate::simulation::host::HostServices;
use crate::simulation::occupation::OccupationKind;
use crate::simulation::registry::{HospitalSnapshot, LifeRegistry};
use crate::simulation::time::GameClock;
use crate::simulation::timers::{Completion, OccupationTimers};
use crate::ui::text;

/// Out-of-band message for a chat, produced when an occupation completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub text: String,
}

#[derive(Resource, Debug, Default)]
pub struct Outbox(pub Vec<Notice>);

/// System: fires every occupation timer that is due at the current clock.
pub fn occupation_timer_system(
    clock: Res<GameClock>,
    mut registry: ResMut<LifeRegistry>,
    mut timers: ResMut<OccupationTimers>,
    mut store: ResMut<ChatEconomyStore>,
    mut host: ResMut<HostServices>,
    mut outbox: ResMut<Outbox>,
) {
    fire_due_timers(
        clock.now_ms,
        &mut registry,
        &mut timers,
        &mut store,
        &mut host,
        &mut outbox,
    );
}

pub fn fire_due_timers(
    now_ms: u64,
    registry: &mut LifeRegistry,
    timers: &mut OccupationTimers,
    store: &mut ChatEconomyStore,
    host: &mut HostServices,
    outbox: &mut Outbox,
) -> usize {
    let mut fired = 0;
    for (timer, task) in timers.take_due(now_ms) {
        let Some(life_user) = registry.get_mut(task.chat_id, task.user_id) else {
            warn!(chat = %task.chat_id, user = %task.user_id, timer = timer.0, "timer fired for unknown user");
            continue;
        };
        if life_user.release(timer).is_none() {
            continue;
        }
        // Stays restored from a save may carry a placeholder name.
        if let Some(current) = host.directory.find_by_id(task.chat_id, task.user_id) {
            life_user.rename(&current.name);
        }
        let user = life_user.user().clone();
        fired += 1;

        let message = match task.completion {
            Completion::Paycheck { reward } => {
                let earned = host.ledger.alter_score(task.chat_id, user.id, reward);
                text::done_working(earned)
            }
            Completion::CommunityService { reduction } => {
                let reduced = store.reduce_bounty(task.chat_id, user.id, reduction);
                text::done_community_service(reduced)
            }
            Completion::Release => match task.kind {
                OccupationKind::Hospitalized => text::RELEASED_FROM_HOSPITAL.to_string(),
                _ => text::RELEASED_FROM_PRISON.to_string(),
            },
        };
        debug!(user = %user.id, kind = ?task.kind, timer = timer.0, "occupation completed");

        let addressee = if store.is_tagged(task.chat_id, user.id) {
            user.mention()
        } else {
            user.name.clone()
        };
        outbox.0.push(Notice {
            chat_id: task.chat_id,
            user_id: user.id,
            text: text::prefixed(&addressee, &message),
        });
    }
    fired
}

/// Re-arms hospital stays captured before the last shutdown.
pub fn rearm_hospital_stays(
    registry: &mut LifeRegistry,
    timers: &mut OccupationTimers,
    host: &HostServices,
    stays: &[HospitalSnapshot],
    now_ms: u64,
) -> usize {
    for stay in stays {
        let user = match host.directory.find_by_id(stay.chat_id, stay.user_id) {
            Some(user) => user,
            None => {
                warn!(chat = %stay.chat_id, user = %stay.user_id, "hospital stay for a user unknown to the directory");
                UserRef {
                    id: stay.user_id,
                    name: stay.user_id.to_string(),
                }
            }
        };
        let minutes = stay.minutes.clamp(0, u32::MAX as i64) as u32;
        registry
            .find_or_create(stay.chat_id, &user)
            .hospitalize(timers, stay.chat_id, minutes, now_ms);
    }
    if !stays.is_empty() {
        info!(count = stays.len(), "hospital stays re-armed");
    }
    stays.len()
}
