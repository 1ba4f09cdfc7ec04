//! Game definitions and logic.

mod rps;

pub use rps::{is_p1_winner, resolve, Move, WIN_TABLE};
