// Re-export core modules for use by the binary or other consumers
pub mod components;
pub mod core;
pub mod rules;
pub mod simulation;
pub mod systems;
pub mod ui;
pub mod world;

// Expose the main Game wrapper and types needed for interaction
pub use crate::components::identity::{ChatId, UserId, UserRef};
pub use crate::core::serialization::SaveState;
pub use crate::core::world::Game;
pub use crate::rules::outcome::LifeError;
pub use crate::simulation::bounty::{Bounty, ChatEconomyStore, LifeChatData};
pub use crate::simulation::host::{HostServices, ScoreLedger, UserDirectory};
pub use crate::simulation::settings::LifeSettings;
pub use crate::systems::commands::{CommandRequest, LifeCommand};
pub use crate::systems::timers::Notice;
