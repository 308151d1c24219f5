pub mod bounty;
pub mod host;
pub mod life_user;
pub mod occupation;
pub mod registry;
pub mod settings;
pub mod time;
pub mod timers;
