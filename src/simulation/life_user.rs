use tracing::debug;

use crate::components::identity::{ChatId, UserRef};
use crate::simulation::occupation::{Occupation, OccupationKind};
use crate::simulation::timers::{Completion, OccupationTimers, ScheduledCompletion, TimerId};
use crate::ui::text;

/// Per-user game state. Holds at most one occupation, and a timer exactly when it does.
#[derive(Debug, Clone)]
pub struct LifeUser {
    user: UserRef,
    occupation: Option<Occupation>,
    timer: Option<TimerId>,
}

impl LifeUser {
    pub fn new(user: UserRef) -> Self {
        Self {
            user,
            occupation: None,
            timer: None,
        }
    }

    pub fn user(&self) -> &UserRef {
        &self.user
    }

    pub(crate) fn rename(&mut self, name: &str) {
        if self.user.name != name {
            self.user.name = name.to_string();
        }
    }

    pub fn occupation(&self) -> Option<&Occupation> {
        self.occupation.as_ref()
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn is_free(&self) -> bool {
        self.occupation.is_none()
    }

    pub fn is(&self, kind: OccupationKind) -> bool {
        self.occupation.as_ref().map(Occupation::kind) == Some(kind)
    }

    pub fn status(&self, now_ms: u64) -> String {
        match &self.occupation {
            Some(occupation) => format!(
                "{} {}",
                self.user.mention(),
                occupation.status_message(None, now_ms)
            ),
            None => text::YOU_ARE_FREE.to_string(),
        }
    }

    /// Status as seen by somebody else, e.g. when targeting this user.
    pub fn status_for_others(&self, now_ms: u64) -> Option<String> {
        self.occupation
            .as_ref()
            .map(|occupation| occupation.status_message(Some(&self.user.name), now_ms))
    }

    pub fn building_entry(&self, now_ms: u64) -> Option<String> {
        self.occupation.as_ref().map(|occupation| {
            format!(
                "{} ({})",
                self.user.name,
                text::minutes(occupation.remaining_minutes(now_ms))
            )
        })
    }

    pub fn start_work(
        &mut self,
        timers: &mut OccupationTimers,
        chat_id: ChatId,
        minutes: u32,
        now_ms: u64,
        completion: Completion,
    ) -> &Occupation {
        self.occupy(timers, OccupationKind::Working, chat_id, minutes, now_ms, completion)
    }

    pub fn incarcerate(
        &mut self,
        timers: &mut OccupationTimers,
        chat_id: ChatId,
        minutes: u32,
        now_ms: u64,
    ) -> &Occupation {
        self.occupy(
            timers,
            OccupationKind::Incarcerated,
            chat_id,
            minutes,
            now_ms,
            Completion::Release,
        )
    }

    pub fn hospitalize(
        &mut self,
        timers: &mut OccupationTimers,
        chat_id: ChatId,
        minutes: u32,
        now_ms: u64,
    ) -> &Occupation {
        self.occupy(
            timers,
            OccupationKind::Hospitalized,
            chat_id,
            minutes,
            now_ms,
            Completion::Release,
        )
    }

    pub fn start_community_service(
        &mut self,
        timers: &mut OccupationTimers,
        chat_id: ChatId,
        minutes: u32,
        now_ms: u64,
        completion: Completion,
    ) -> &Occupation {
        self.occupy(
            timers,
            OccupationKind::CommunityService,
            chat_id,
            minutes,
            now_ms,
            completion,
        )
    }

    /// Cancels the pending timer without running its completion.
    pub fn clear_occupation(&mut self, timers: &mut OccupationTimers) {
        if let Some(timer) = self.timer.take() {
            timers.cancel(timer);
        }
        self.occupation = None;
    }

    /// Called when `timer` has fired. Frees the user if it is still their live timer.
    pub(crate) fn release(&mut self, timer: TimerId) -> Option<Occupation> {
        if self.timer != Some(timer) {
            return None;
        }
        self.timer = None;
        self.occupation.take()
    }

    fn occupy(
        &mut self,
        timers: &mut OccupationTimers,
        kind: OccupationKind,
        chat_id: ChatId,
        minutes: u32,
        now_ms: u64,
        completion: Completion,
    ) -> &Occupation {
        if let Some(previous) = &self.occupation {
            debug!(
                user = %self.user.id,
                previous = ?previous.kind(),
                next = ?kind,
                "occupation superseded"
            );
        }
        self.clear_occupation(timers);

        let occupation = Occupation::new(kind, chat_id, minutes, now_ms);
        let timer = timers.schedule(ScheduledCompletion {
            user_id: self.user.id,
            chat_id,
            kind,
            due_ms: occupation.end_time_ms(),
            completion,
        });
        debug!(user = %self.user.id, ?kind, minutes, timer = timer.0, "occupation started");
        self.timer = Some(timer);
        self.occupation.insert(occupation)
    }
}
