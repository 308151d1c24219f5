use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{ExecutorKind, SystemSet};

use crate::rules::odds::Dice;
use crate::simulation::bounty::ChatEconomyStore;
use crate::simulation::host::HostServices;
use crate::simulation::registry::LifeRegistry;
use crate::simulation::settings::LifeSettings;
use crate::simulation::time::GameClock;
use crate::simulation::timers::OccupationTimers;
use crate::systems::commands::{
    command_system, expire_kill_confirmations_system, CommandQueue, KillConfirmations, ReplyLog,
};
use crate::systems::timers::{occupation_timer_system, Outbox};

/// Canonical ordering within one schedule run.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum TickSet {
    Timers,
    Intake,
    Cleanup,
}

/// Build the ECS world with baseline resources.
pub fn create_world(seed: u64, settings: LifeSettings, host: HostServices) -> World {
    let mut world = World::new();
    world.insert_resource(GameClock::default());
    world.insert_resource(settings);
    world.insert_resource(host);
    world.insert_resource(Dice::new(seed));
    world.insert_resource(LifeRegistry::default());
    world.insert_resource(OccupationTimers::default());
    world.insert_resource(ChatEconomyStore::default());
    world.insert_resource(KillConfirmations::default());
    world.insert_resource(CommandQueue::default());
    world.insert_resource(ReplyLog::default());
    world.insert_resource(Outbox::default());
    world
}

/// Build the system schedule. Game state is only ever touched from one thread.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);

    schedule.configure_sets((TickSet::Timers, TickSet::Intake, TickSet::Cleanup).chain());

    schedule.add_systems((
        occupation_timer_system.in_set(TickSet::Timers),
        command_system.in_set(TickSet::Intake),
        expire_kill_confirmations_system.in_set(TickSet::Cleanup),
    ));

    schedule
}
