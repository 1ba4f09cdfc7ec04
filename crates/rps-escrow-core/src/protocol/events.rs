//! Protocol events.

use crate::protocol::GameId;
use rps_token::Address;
use serde::{Deserialize, Serialize};

/// Emitted once per game when a winner (or a draw) is decided, either by the
/// second move or by a timeout. `winner` is `Address::ZERO` for a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub game_id: GameId,
    pub winner: Address,
}

impl OutcomeEvent {
    pub fn is_draw(&self) -> bool {
        self.winner.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = OutcomeEvent {
            game_id: GameId::new(3),
            winner: Address::ZERO,
        };

        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["game_id"], 3);
        assert_eq!(
            json["winner"],
            "0x0000000000000000000000000000000000000000"
        );

        let back: OutcomeEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
        assert!(back.is_draw());
    }
}
