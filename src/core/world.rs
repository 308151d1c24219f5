use bevy_ecs::prelude::*;
use tracing::info;

use crate::components::identity::{ChatId, UserId, UserRef};
use crate::core::ecs::{create_schedule, create_world};
use crate::core::serialization::SaveState;
use crate::rules::odds::Dice;
use crate::simulation::bounty::{ChatEconomyStore, LifeChatData};
use crate::simulation::host::HostServices;
use crate::simulation::occupation::Occupation;
use crate::simulation::registry::LifeRegistry;
use crate::simulation::settings::LifeSettings;
use crate::simulation::time::GameClock;
use crate::simulation::timers::OccupationTimers;
use crate::systems::commands::{CommandQueue, CommandRequest, LifeCommand, ReplyLog};
use crate::systems::timers::{rearm_hospital_stays, Notice, Outbox};
use crate::world::repository::{ChatRepository, StoreError};

/// Wrapper around the ECS world and schedule.
pub struct Game {
    world: World,
    schedule: Schedule,
    next_request: u64,
}

impl Game {
    pub fn new(seed: u64, settings: LifeSettings, host: HostServices) -> Self {
        Self {
            world: create_world(seed, settings, host),
            schedule: create_schedule(),
            next_request: 1,
        }
    }

    /// Replace the randomness source, e.g. with scripted rolls.
    pub fn set_dice(&mut self, dice: Dice) {
        self.world.insert_resource(dice);
    }

    pub fn now_ms(&self) -> u64 {
        self.world.resource::<GameClock>().now_ms
    }

    fn advance_to(&mut self, now_ms: u64) {
        self.world.resource_mut::<GameClock>().advance_to(now_ms);
    }

    /// Answer one command. Timers due by `now_ms` fire first.
    pub fn dispatch(&mut self, now_ms: u64, request: CommandRequest) -> String {
        let request_id = self.next_request;
        self.next_request += 1;
        self.advance_to(now_ms);
        self.world
            .resource_mut::<CommandQueue>()
            .0
            .push((request_id, request));

        self.schedule.run(&mut self.world);

        let mut replies = self.world.resource_mut::<ReplyLog>();
        match replies.0.iter().position(|reply| reply.request_id == request_id) {
            Some(index) => replies.0.remove(index).text,
            None => String::new(),
        }
    }

    /// Parse and answer a chat message. Text that is not a life command yields None.
    pub fn handle_message(
        &mut self,
        now_ms: u64,
        chat_id: ChatId,
        sender: UserRef,
        reply_to: Option<UserRef>,
        message: &str,
    ) -> Option<String> {
        let command = LifeCommand::parse(message)?;
        Some(self.dispatch(
            now_ms,
            CommandRequest {
                chat_id,
                sender,
                reply_to,
                command,
            },
        ))
    }

    /// Fire timers due by `now_ms` and hand back the completion notices.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Notice> {
        self.advance_to(now_ms);
        self.schedule.run(&mut self.world);
        self.drain_notices()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.world.resource_mut::<Outbox>().0)
    }

    pub fn score(&self, chat_id: ChatId, user_id: UserId) -> i64 {
        self.world
            .resource::<HostServices>()
            .ledger
            .score(chat_id, user_id)
    }

    pub fn occupation_of(&self, chat_id: ChatId, user_id: UserId) -> Option<Occupation> {
        self.world
            .resource::<LifeRegistry>()
            .get(chat_id, user_id)
            .and_then(|user| user.occupation().cloned())
    }

    pub fn chat_data(&self, chat_id: ChatId) -> Option<LifeChatData> {
        self.world.resource::<ChatEconomyStore>().get(chat_id).cloned()
    }

    pub fn settings(&self) -> &LifeSettings {
        self.world.resource::<LifeSettings>()
    }

    /// Capture every chat record, recording current hospital stays as remaining minutes.
    /// The live store keeps no hospital list afterwards.
    pub fn snapshot(&mut self, now_ms: u64) -> SaveState {
        self.advance_to(now_ms);
        let now_ms = self.now_ms();
        let stays = self.world.resource::<LifeRegistry>().hospital_snapshots(now_ms);
        let mut store = self.world.resource_mut::<ChatEconomyStore>();
        store.record_hospital_stays(&stays);
        let chats = store.chats().cloned().collect();
        store.take_hospital_stays();
        SaveState::new(chats)
    }

    /// Load chat records and re-arm the hospital stays they carry.
    pub fn restore(&mut self, now_ms: u64, state: SaveState) -> usize {
        self.advance_to(now_ms);
        let now_ms = self.now_ms();
        let chats = state.chats.len();
        let world = &mut self.world;
        let stays = {
            let mut store = world.resource_mut::<ChatEconomyStore>();
            for chat in state.chats {
                store.insert(chat);
            }
            store.take_hospital_stays()
        };

        world.resource_scope(|world, mut registry: Mut<LifeRegistry>| {
            world.resource_scope(|world, mut timers: Mut<OccupationTimers>| {
                let host = world.resource::<HostServices>();
                rearm_hospital_stays(&mut registry, &mut timers, host, &stays, now_ms)
            })
        });
        info!(chats, stays = stays.len(), "chat economy restored");
        chats
    }

    pub fn save_to(&mut self, now_ms: u64, repository: &mut dyn ChatRepository) -> Result<(), StoreError> {
        let state = self.snapshot(now_ms);
        repository.save(&state.chats)
    }

    pub fn load_from(&mut self, now_ms: u64, repository: &mut dyn ChatRepository) -> Result<usize, StoreError> {
        let chats = repository.load()?;
        Ok(self.restore(now_ms, SaveState::new(chats)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::host::{MemoryDirectory, MemoryLedger};
    use crate::simulation::occupation::OccupationKind;
    use crate::simulation::time::MS_PER_MINUTE;
    use crate::world::json::JsonChatFile;

    const CHAT: ChatId = ChatId(-100);
    const T0: u64 = 1_700_000_000_000;

    fn alice() -> UserRef {
        UserRef::new(1, "alice")
    }

    fn bob() -> UserRef {
        UserRef::new(2, "bob")
    }

    fn carol() -> UserRef {
        UserRef::new(3, "carol")
    }

    fn game_with(settings: LifeSettings, rolls: Vec<f64>) -> Game {
        let ledger = MemoryLedger::default()
            .with_score(CHAT, alice().id, 1000)
            .with_score(CHAT, bob().id, 200)
            .with_score(CHAT, carol().id, 50);
        let directory = MemoryDirectory::default()
            .with_member(CHAT, alice())
            .with_member(CHAT, bob())
            .with_member(CHAT, carol());
        let mut game = Game::new(7, settings, HostServices::new(ledger, directory));
        game.set_dice(Dice::scripted(7, rolls));
        game
    }

    fn game(rolls: Vec<f64>) -> Game {
        game_with(LifeSettings::default(), rolls)
    }

    fn say(game: &mut Game, now_ms: u64, sender: UserRef, message: &str) -> String {
        game.handle_message(now_ms, CHAT, sender, None, message)
            .unwrap()
    }

    fn reply(game: &mut Game, now_ms: u64, sender: UserRef, to: UserRef, message: &str) -> String {
        game.handle_message(now_ms, CHAT, sender, Some(to), message)
            .unwrap()
    }

    fn kind_of(game: &Game, user: &UserRef) -> Option<OccupationKind> {
        game.occupation_of(CHAT, user.id).map(|occupation| occupation.kind())
    }

    #[test]
    fn work_pays_out_when_the_shift_ends() {
        let mut game = game(vec![]);
        assert_eq!(
            say(&mut game, T0, alice(), "/work 5"),
            "@alice: You started working. You'll get paid in 5 minutes"
        );
        assert!(game.tick(T0 + 4 * MS_PER_MINUTE).is_empty());

        let notices = game.tick(T0 + 5 * MS_PER_MINUTE);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].text, "@alice: You're done working and earned 100 points!");
        assert_eq!(game.score(CHAT, alice().id), 1100);
        assert_eq!(kind_of(&game, &alice()), None);
    }

    #[test]
    fn shift_length_is_validated() {
        let mut game = game(vec![]);
        assert_eq!(
            say(&mut game, T0, alice(), "/work 481"),
            "@alice: Shifts can last at most 480 minutes ✋"
        );
        assert_eq!(
            say(&mut game, T0, alice(), "/work soon"),
            "@alice: Provide a valid, positive number please ✋"
        );
        assert_eq!(kind_of(&game, &alice()), None);
    }

    #[test]
    fn failed_hustle_jails_and_blocks_work_with_status() {
        let mut game = game(vec![0.9]);
        let reply = say(&mut game, T0, alice(), "/hustle");
        assert!(reply.starts_with("@alice: <b>The police got a hold of you.</b>"));
        assert_eq!(kind_of(&game, &alice()), Some(OccupationKind::Incarcerated));

        let status = say(&mut game, T0, alice(), "/status");
        assert!(status.starts_with("@alice You are currently in prison with"));
        assert_eq!(say(&mut game, T0, alice(), "/work"), status);
        assert_eq!(kind_of(&game, &alice()), Some(OccupationKind::Incarcerated));
        assert_eq!(game.score(CHAT, alice().id), 1000);
    }

    #[test]
    fn successful_hustle_earns_and_draws_police_attention() {
        let mut game = game(vec![0.1]);
        say(&mut game, T0, alice(), "/rob");
        let gained = game.score(CHAT, alice().id) - 1000;
        assert!((200..=500).contains(&gained));

        let chat = game.chat_data(CHAT).unwrap();
        let bounty = chat.bounty_for(alice().id).unwrap();
        assert!(bounty.is_police_bounty);
        assert_eq!(bounty.amount, gained / 2);
    }

    #[test]
    fn kill_is_priced_from_both_scores() {
        let mut game = game(vec![0.1]);
        assert_eq!(
            say(&mut game, T0, alice(), "/kill @bob"),
            "@alice: Killing bob will cost you 300 points. Send /confirm to go ahead or /cancel to back off 🔪"
        );

        let outcome = say(&mut game, T0 + 1_000, alice(), "/confirm");
        assert_eq!(
            outcome,
            "@alice: 💀 You took out bob. They'll be in the hospital for 480 minutes."
        );
        assert_eq!(game.score(CHAT, alice().id), 700);
        assert_eq!(kind_of(&game, &bob()), Some(OccupationKind::Hospitalized));

        let bounty = game.chat_data(CHAT).unwrap().bounty_for(alice().id).cloned().unwrap();
        assert_eq!(bounty.amount, 600);
        assert!(bounty.is_police_bounty);
    }

    #[test]
    fn kill_without_funds_is_refused() {
        let mut game = game(vec![]);
        assert_eq!(
            say(&mut game, T0, carol(), "/kill bob"),
            "@carol: This will cost you 100 points, which you don't have, you filthy peasant ✋"
        );
        assert_eq!(
            say(&mut game, T0, carol(), "/confirm"),
            "@carol: There is nothing to confirm ✋"
        );
        assert_eq!(game.score(CHAT, carol().id), 50);
    }

    #[test]
    fn hospitalised_target_cannot_be_attacked() {
        let mut game = game(vec![0.1]);
        say(&mut game, T0, alice(), "/kill bob");
        say(&mut game, T0, alice(), "/confirm");

        let reply = say(&mut game, T0, carol(), "/kill bob");
        assert!(reply.starts_with("@carol: bob is currently recovering in the hospital"));
    }

    #[test]
    fn confirmation_revalidates_the_actor() {
        let mut game = game(vec![0.9]);
        say(&mut game, T0, alice(), "/kill bob");
        say(&mut game, T0, alice(), "/hustle");
        let status = say(&mut game, T0, alice(), "/status");

        assert_eq!(say(&mut game, T0, alice(), "/confirm"), status);
        assert_eq!(game.score(CHAT, alice().id), 1000);
        assert_eq!(kind_of(&game, &bob()), None);
    }

    #[test]
    fn confirmation_expires() {
        let mut game = game(vec![0.1]);
        say(&mut game, T0, alice(), "/kill bob");
        assert_eq!(
            say(&mut game, T0 + 3 * MS_PER_MINUTE, alice(), "/confirm"),
            "@alice: There is nothing to confirm ✋"
        );
        assert_eq!(game.score(CHAT, alice().id), 1000);
    }

    #[test]
    fn failed_unlawful_kill_lands_the_killer_in_prison() {
        let mut game = game(vec![0.9]);
        say(&mut game, T0, alice(), "/kill bob");
        let reply = say(&mut game, T0, alice(), "/confirm");
        assert!(reply.starts_with("@alice: <b>Your attempt on bob failed.</b>"));
        assert_eq!(kind_of(&game, &alice()), Some(OccupationKind::Incarcerated));
        assert_eq!(game.score(CHAT, alice().id), 700);

        let remaining = game.occupation_of(CHAT, alice().id).unwrap().remaining_minutes(T0);
        assert!((25..=50).contains(&remaining));
        let bounty = game.chat_data(CHAT).unwrap().bounty_for(alice().id).cloned().unwrap();
        assert_eq!(bounty.amount, 150);
    }

    #[test]
    fn killing_a_wanted_user_claims_their_bounty_lawfully() {
        let mut game = game(vec![0.1, 0.1]);
        say(&mut game, T0, bob(), "/hustle");
        let wanted = game.chat_data(CHAT).unwrap().bounty_for(bob().id).cloned().unwrap();
        assert!(wanted.is_police_bounty);

        say(&mut game, T0, alice(), "/kill bob");
        let reply = say(&mut game, T0, alice(), "/confirm");
        assert!(reply.contains(&format!("You claimed a bounty of {} points!", wanted.amount)));

        let chat = game.chat_data(CHAT).unwrap();
        assert!(chat.bounty_for(bob().id).is_none());
        assert!(chat.bounty_for(alice().id).is_none());
    }

    #[test]
    fn breakout_requires_an_inmate() {
        let mut game = game(vec![]);
        assert_eq!(
            reply(&mut game, T0, alice(), bob(), "/breakout"),
            "@alice: bob is not in prison."
        );
        assert_eq!(
            say(&mut game, T0, alice(), "/breakout"),
            "@alice: To break someone out, reply to their message with <code>/breakout</code> ✋"
        );
        assert_eq!(game.score(CHAT, alice().id), 1000);
        assert!(game.chat_data(CHAT).map_or(true, |chat| chat.bounties.is_empty()));
    }

    #[test]
    fn breakout_frees_the_inmate_and_marks_both() {
        let mut game = game(vec![0.9, 0.1]);
        say(&mut game, T0, bob(), "/hustle");
        assert_eq!(kind_of(&game, &bob()), Some(OccupationKind::Incarcerated));

        let reply = reply(&mut game, T0, alice(), bob(), "/breakout");
        assert!(reply.starts_with("@alice: Broke out bob."));
        assert_eq!(kind_of(&game, &bob()), None);

        let reward = game.score(CHAT, alice().id) - 1000;
        assert!((100..=250).contains(&reward));
        let chat = game.chat_data(CHAT).unwrap();
        assert_eq!(chat.bounty_for(alice().id).unwrap().amount, reward);
        assert_eq!(
            chat.bounty_for(bob().id).unwrap().amount,
            (reward as f64 * 0.5).round() as i64
        );

        // the freed inmate's timer must not fire later
        assert!(game.tick(T0 + 60 * MS_PER_MINUTE).is_empty());
    }

    #[test]
    fn bribes_cost_money_either_way() {
        let mut game = game(vec![0.9, 0.5, 0.99]);
        say(&mut game, T0, bob(), "/hustle");

        assert_eq!(
            say(&mut game, T0, bob(), "/bribe 10"),
            "@bob: 👮🏻‍♂️ Your bribing attempt has failed! You've lost 10 points! 😭"
        );
        assert_eq!(game.score(CHAT, bob().id), 190);
        assert_eq!(kind_of(&game, &bob()), Some(OccupationKind::Incarcerated));

        assert_eq!(
            say(&mut game, T0, bob(), "/bribe 500"),
            "@bob: This will cost you 500 points, which you don't have, you filthy peasant ✋"
        );

        let reply = say(&mut game, T0, bob(), "/bribe 50");
        assert!(reply.contains("Your bribing attempt was successful"));
        assert_eq!(game.score(CHAT, bob().id), 140);
        assert_eq!(kind_of(&game, &bob()), None);
        assert_eq!(
            game.chat_data(CHAT).unwrap().bounty_for(bob().id).unwrap().amount,
            50
        );
    }

    #[test]
    fn bribing_while_free_is_refused() {
        let mut game = game(vec![]);
        assert_eq!(
            say(&mut game, T0, alice(), "/bribe 10"),
            "@alice: You are not in prison, silly 🤪"
        );
    }

    #[test]
    fn bounties_on_one_target_merge() {
        let mut game = game(vec![]);
        assert_eq!(
            say(&mut game, T0, alice(), "/placebounty @bob 100"),
            "📃 @alice put a bounty worth 100 points on @bob !"
        );
        say(&mut game, T0, carol(), "/placebounty bob 50");
        assert_eq!(
            say(&mut game, T0, alice(), "/placebounty @alice 10"),
            "@alice: You can't put a bounty on yourself ✋"
        );

        assert_eq!(game.score(CHAT, alice().id), 900);
        assert_eq!(game.score(CHAT, carol().id), 0);
        let chat = game.chat_data(CHAT).unwrap();
        assert_eq!(chat.bounties.len(), 1);
        assert_eq!(chat.bounties[0].amount, 150);
        assert!(!chat.bounties[0].is_police_bounty);

        assert_eq!(
            say(&mut game, T0, bob(), "/bounties"),
            "📃 <b> Bounties </b> 📃 \n-\tbob: 150 points"
        );
    }

    #[test]
    fn buildings_list_their_occupants() {
        let mut game = game(vec![0.9]);
        assert_eq!(
            say(&mut game, T0, alice(), "/office"),
            "It's an empty day at the office.."
        );
        say(&mut game, T0, alice(), "/work 5");
        say(&mut game, T0, carol(), "/communityservice 3");
        say(&mut game, T0, bob(), "/hustle");

        assert_eq!(
            say(&mut game, T0, bob(), "/office"),
            "🏢 <b> Players working at the office </b> 🏢 \n-\tcarol (3 minutes)\n-\talice (5 minutes)"
        );
        assert!(say(&mut game, T0, alice(), "/prison").contains("\n-\tbob ("));
        assert_eq!(
            say(&mut game, T0, alice(), "/hospital"),
            "No patients at the hospital today.."
        );
    }

    #[test]
    fn opted_out_users_are_not_tagged() {
        let mut game = game(vec![]);
        say(&mut game, T0, alice(), "/togglelifetags");
        say(&mut game, T0, alice(), "/work 2");
        let notices = game.tick(T0 + 2 * MS_PER_MINUTE);
        assert_eq!(notices[0].text, "alice: You're done working and earned 40 points!");
    }

    #[test]
    fn hospital_stays_survive_a_restart() {
        let settings = LifeSettings {
            hospital_duration_minutes: 60,
            ..LifeSettings::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let mut file = JsonChatFile::new(dir.path().join("life.json"));

        let mut before = game_with(settings.clone(), vec![0.1]);
        say(&mut before, T0, alice(), "/kill bob");
        say(&mut before, T0, alice(), "/confirm");
        before.save_to(T0 + 23 * MS_PER_MINUTE, &mut file).unwrap();

        let restart = T0 + 24 * 60 * MS_PER_MINUTE;
        let mut after = game_with(settings, vec![]);
        assert_eq!(after.load_from(restart, &mut file).unwrap(), 1);

        let stay = after.occupation_of(CHAT, bob().id).unwrap();
        assert_eq!(stay.kind(), OccupationKind::Hospitalized);
        assert_eq!(stay.remaining_minutes(restart), 37);
        assert!(after.chat_data(CHAT).unwrap().users_in_hospital.is_empty());
        assert_eq!(
            after.chat_data(CHAT).unwrap().bounty_for(alice().id).unwrap().amount,
            600
        );

        assert!(after.tick(restart + 36 * MS_PER_MINUTE).is_empty());
        let notices = after.tick(restart + 37 * MS_PER_MINUTE);
        assert_eq!(notices[0].text, "@bob: You're released from the hospital!");
    }

    const OTHER_CHAT: ChatId = ChatId(-200);

    fn two_chat_game(rolls: Vec<f64>) -> Game {
        let ledger = MemoryLedger::default()
            .with_score(CHAT, alice().id, 1000)
            .with_score(CHAT, bob().id, 200)
            .with_score(OTHER_CHAT, alice().id, 1000)
            .with_score(OTHER_CHAT, bob().id, 1000);
        let directory = MemoryDirectory::default()
            .with_member(CHAT, alice())
            .with_member(CHAT, bob())
            .with_member(OTHER_CHAT, alice())
            .with_member(OTHER_CHAT, bob());
        let mut game = Game::new(7, LifeSettings::default(), HostServices::new(ledger, directory));
        game.set_dice(Dice::scripted(7, rolls));
        game
    }

    #[test]
    fn occupations_stay_inside_their_chat() {
        let mut game = two_chat_game(vec![0.1]);
        say(&mut game, T0, bob(), "/work 5");

        let elsewhere = game
            .handle_message(T0, OTHER_CHAT, bob(), None, "/status")
            .unwrap();
        assert_eq!(elsewhere, "You are free to do as you like");

        game.handle_message(T0, OTHER_CHAT, alice(), None, "/kill bob");
        game.handle_message(T0, OTHER_CHAT, alice(), None, "/confirm");
        assert_eq!(
            game.occupation_of(OTHER_CHAT, bob().id).map(|o| o.kind()),
            Some(OccupationKind::Hospitalized)
        );
        assert_eq!(
            say(&mut game, T0, alice(), "/office"),
            "🏢 <b> Players working at the office </b> 🏢 \n-\tbob (5 minutes)"
        );

        let notices = game.tick(T0 + 5 * MS_PER_MINUTE);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].chat_id, CHAT);
        assert_eq!(notices[0].text, "@bob: You're done working and earned 100 points!");
        assert_eq!(game.score(CHAT, bob().id), 300);
        assert_eq!(
            game.occupation_of(OTHER_CHAT, bob().id).map(|o| o.kind()),
            Some(OccupationKind::Hospitalized)
        );
    }

    #[test]
    fn confirming_at_a_new_price_asks_again() {
        let mut game = game(vec![0.1]);
        say(&mut game, T0, bob(), "/work 1");
        assert!(say(&mut game, T0, alice(), "/kill bob").contains("will cost you 300 points"));

        let later = T0 + MS_PER_MINUTE;
        assert_eq!(
            say(&mut game, later, alice(), "/confirm"),
            "@alice: The price changed: killing bob now costs 305 points. Send /confirm to go ahead or /cancel to back off 🔪"
        );
        assert_eq!(game.score(CHAT, alice().id), 1000);
        assert_eq!(kind_of(&game, &bob()), None);

        say(&mut game, later, alice(), "/confirm");
        assert_eq!(game.score(CHAT, alice().id), 695);
        assert_eq!(kind_of(&game, &bob()), Some(OccupationKind::Hospitalized));
    }

    #[test]
    fn confirmation_revalidates_the_target() {
        let mut game = game(vec![0.1]);
        say(&mut game, T0, alice(), "/kill carol");
        say(&mut game, T0, bob(), "/kill carol");
        say(&mut game, T0, bob(), "/confirm");
        assert_eq!(kind_of(&game, &carol()), Some(OccupationKind::Hospitalized));

        let reply = say(&mut game, T0, alice(), "/confirm");
        assert!(reply.starts_with("@alice: carol is currently recovering in the hospital"));
        assert_eq!(game.score(CHAT, alice().id), 1000);
    }

    #[test]
    fn confirmation_revalidates_the_funds() {
        let mut game = game(vec![0.1]);
        say(&mut game, T0, alice(), "/kill bob");
        say(&mut game, T0, alice(), "/placebounty carol 950");
        assert_eq!(game.score(CHAT, alice().id), 50);

        assert_eq!(
            say(&mut game, T0, alice(), "/confirm"),
            "@alice: This will cost you 100 points, which you don't have, you filthy peasant ✋"
        );
        assert_eq!(game.score(CHAT, alice().id), 50);
        assert_eq!(kind_of(&game, &bob()), None);
    }

    #[test]
    fn work_is_possible_again_once_the_sentence_ends() {
        let mut game = game(vec![0.9]);
        say(&mut game, T0, alice(), "/hustle");
        let served = T0 + 20 * MS_PER_MINUTE;

        let notices = game.tick(served);
        assert_eq!(notices[0].text, "@alice: You're released from prison!");
        assert_eq!(
            say(&mut game, served, alice(), "/work 5"),
            "@alice: You started working. You'll get paid in 5 minutes"
        );
    }

    #[test]
    fn snapshot_does_not_leave_stays_in_the_live_store() {
        let mut game = game(vec![0.1]);
        say(&mut game, T0, alice(), "/kill bob");
        say(&mut game, T0, alice(), "/confirm");

        let state = game.snapshot(T0 + 10 * MS_PER_MINUTE);
        let saved = state.chats.iter().find(|chat| chat.chat_id == CHAT).unwrap();
        assert_eq!(saved.users_in_hospital[0].minutes, 470);
        assert!(game.chat_data(CHAT).unwrap().users_in_hospital.is_empty());
    }
}
