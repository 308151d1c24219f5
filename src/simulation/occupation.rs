use serde::{Deserialize, Serialize};

use crate::components::identity::ChatId;
use crate::simulation::time::{minutes_to_ms, MS_PER_MINUTE};
use crate::ui::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupationKind {
    Working,
    Incarcerated,
    Hospitalized,
    CommunityService,
}

impl OccupationKind {
    /// Whether a hostile action may knock the holder out of this occupation.
    pub fn interruptible_for_hospitalization(self) -> bool {
        match self {
            OccupationKind::Working
            | OccupationKind::Incarcerated
            | OccupationKind::CommunityService => true,
            OccupationKind::Hospitalized => false,
        }
    }

    /// Occupations that appear on the office roster.
    pub fn is_office(self) -> bool {
        matches!(
            self,
            OccupationKind::Working | OccupationKind::CommunityService
        )
    }
}

/// A timed state a user occupies. The duration is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupation {
    kind: OccupationKind,
    chat_id: ChatId,
    waiting_time: u32,
    end_time_ms: u64,
}

impl Occupation {
    pub fn new(kind: OccupationKind, chat_id: ChatId, waiting_time: u32, now_ms: u64) -> Self {
        Self {
            kind,
            chat_id,
            waiting_time,
            end_time_ms: now_ms + minutes_to_ms(waiting_time),
        }
    }

    pub fn kind(&self) -> OccupationKind {
        self.kind
    }

    /// Chat the occupation was started from; completion notices go there.
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn waiting_time(&self) -> u32 {
        self.waiting_time
    }

    pub fn end_time_ms(&self) -> u64 {
        self.end_time_ms
    }

    pub fn interruptible_for_hospitalization(&self) -> bool {
        self.kind.interruptible_for_hospitalization()
    }

    pub fn remaining_minutes(&self, now_ms: u64) -> i64 {
        let remaining_ms = self.end_time_ms.saturating_sub(now_ms);
        (remaining_ms as f64 / MS_PER_MINUTE as f64).round() as i64
    }

    pub fn status_message(&self, name: Option<&str>, now_ms: u64) -> String {
        format!(
            "{} with {} to go {}",
            text::currently(self.kind, name),
            text::minutes(self.remaining_minutes(now_ms)),
            text::occupation_emoji(self.kind)
        )
    }

    pub fn start_message(&self, now_ms: u64) -> String {
        let minutes_left = self.remaining_minutes(now_ms);
        match self.kind {
            OccupationKind::Working => text::started_working(minutes_left),
            OccupationKind::Incarcerated => text::thrown_in_jail(minutes_left),
            OccupationKind::Hospitalized => text::hospitalized(minutes_left),
            OccupationKind::CommunityService => text::started_community_service(minutes_left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: ChatId = ChatId(1);

    #[test]
    fn remaining_minutes_counts_down_to_zero_at_end_time() {
        let occupation = Occupation::new(OccupationKind::Working, CHAT, 5, 0);
        let mut previous = i64::MAX;
        for step in 0..=10 {
            let now = step * 30_000;
            let remaining = occupation.remaining_minutes(now);
            assert!(remaining <= previous);
            previous = remaining;
        }
        assert_eq!(occupation.remaining_minutes(occupation.end_time_ms()), 0);
        assert_eq!(occupation.remaining_minutes(occupation.end_time_ms() + 90_000), 0);
    }

    #[test]
    fn remaining_minutes_rounds_to_nearest() {
        let occupation = Occupation::new(OccupationKind::Incarcerated, CHAT, 10, 0);
        assert_eq!(occupation.remaining_minutes(0), 10);
        assert_eq!(occupation.remaining_minutes(20_000), 10);
        assert_eq!(occupation.remaining_minutes(40_000), 9);
    }

    #[test]
    fn only_hospitalization_shields_from_hostile_actions() {
        assert!(OccupationKind::Working.interruptible_for_hospitalization());
        assert!(OccupationKind::Incarcerated.interruptible_for_hospitalization());
        assert!(OccupationKind::CommunityService.interruptible_for_hospitalization());
        assert!(!OccupationKind::Hospitalized.interruptible_for_hospitalization());
    }

    #[test]
    fn status_message_names_third_parties() {
        let occupation = Occupation::new(OccupationKind::Hospitalized, CHAT, 1, 0);
        assert_eq!(
            occupation.status_message(Some("bob"), 0),
            "bob is currently recovering in the hospital with 1 minute to go 🏥"
        );
        assert!(occupation
            .status_message(None, 0)
            .starts_with("You are currently recovering"));
    }

    #[test]
    fn start_message_reports_duration() {
        let occupation = Occupation::new(OccupationKind::Working, CHAT, 7, 0);
        assert_eq!(
            occupation.start_message(0),
            "You started working. You'll get paid in 7 minutes"
        );
    }
}
