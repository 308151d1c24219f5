pub mod odds;
pub mod outcome;

pub use odds::Dice;
pub use outcome::LifeError;
