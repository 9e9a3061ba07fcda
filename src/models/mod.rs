//! Core data models for the cricket stats analyzer.

mod diagnostic;
mod leaderboard;
mod photo;
mod player;
mod record;
mod spotlight;

pub use diagnostic::*;
pub use leaderboard::*;
pub use photo::*;
pub use player::*;
pub use record::*;
pub use spotlight::*;
