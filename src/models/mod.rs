//! Core data models.

mod game;
mod ids;
mod player;
mod stats;

pub use game::*;
pub use ids::*;
pub use player::*;
pub use stats::*;
