//! Error types for the escrow.
//!
//! Display strings are the observable rejection messages and must not change.
//! Every failed operation leaves balances and game records untouched.

use crate::protocol::GameId;
use rps_token::{Address, TokenError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a game operation was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    UnknownGame,
    NotOpen,
    NotOwner,
    NotPlayer,
    NotJoined,
    AlreadyMoved,
    Finished,
    InsufficientFunds,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::UnknownGame => "unknown game",
            Rejection::NotOpen => "game not open",
            Rejection::NotOwner => "caller does not own the game",
            Rejection::NotPlayer => "caller is not a player",
            Rejection::NotJoined => "no second player yet",
            Rejection::AlreadyMoved => "move already sent",
            Rejection::Finished => "game finished",
            Rejection::InsufficientFunds => "insufficient free balance",
        };
        f.write_str(reason)
    }
}

/// Error taxonomy, used to pick a response for a failed call
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Recoverable by depositing more or asking for less
    Funds,
    /// Wrong caller
    Authorization,
    /// Stale view of the game
    Lifecycle,
    /// Too early or too late
    Timing,
    /// Value-transfer collaborator failed
    Transfer,
}

#[derive(Debug, Error)]
pub enum EscrowError {
    #[error("Insufficient funds")]
    InsufficientExternalFunds {
        account: Address,
        available: u64,
        requested: u64,
    },

    #[error("Insufficient funds")]
    InsufficientFreeBalance {
        account: Address,
        available: u64,
        requested: u64,
    },

    #[error("Either game is closed or insufficient funds")]
    JoinRejected { game_id: GameId, reason: Rejection },

    #[error("Game not open and/or wrong gameId")]
    DiscardRejected { game_id: GameId, reason: Rejection },

    #[error("Either incorrect gameId, move already sent, or game finished")]
    MoveRejected { game_id: GameId, reason: Rejection },

    #[error("Timed out")]
    TimedOutWindow { game_id: GameId },

    #[error("Either player not in game or game is finished")]
    TimeOutRejected { game_id: GameId, reason: Rejection },

    #[error("Time not exceeded")]
    TimeNotExceeded { game_id: GameId },

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Token transfer declined")]
    TransferDeclined,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Balance overflow")]
    BalanceOverflow,
}

impl EscrowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EscrowError::InsufficientExternalFunds { .. }
            | EscrowError::InsufficientFreeBalance { .. } => ErrorKind::Funds,
            EscrowError::JoinRejected { reason, .. }
            | EscrowError::DiscardRejected { reason, .. }
            | EscrowError::MoveRejected { reason, .. }
            | EscrowError::TimeOutRejected { reason, .. } => match reason {
                Rejection::InsufficientFunds => ErrorKind::Funds,
                Rejection::NotOwner | Rejection::NotPlayer => ErrorKind::Authorization,
                _ => ErrorKind::Lifecycle,
            },
            EscrowError::TimedOutWindow { .. } | EscrowError::TimeNotExceeded { .. } => {
                ErrorKind::Timing
            }
            EscrowError::InvalidMove(_) => ErrorKind::Lifecycle,
            EscrowError::TransferDeclined
            | EscrowError::Token(_)
            | EscrowError::BalanceOverflow => ErrorKind::Transfer,
        }
    }

    /// Structured reason for the combined game rejections
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            EscrowError::JoinRejected { reason, .. }
            | EscrowError::DiscardRejected { reason, .. }
            | EscrowError::MoveRejected { reason, .. }
            | EscrowError::TimeOutRejected { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
