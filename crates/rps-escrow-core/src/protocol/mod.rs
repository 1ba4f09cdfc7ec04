//! Protocol types and events.

mod events;
mod types;

pub use events::OutcomeEvent;
pub use types::{GameId, Outcome, Player};
