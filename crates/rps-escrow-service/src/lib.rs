//! RPS Escrow Service
//!
//! HTTP front end for the escrow: balances, game lifecycle and the readable
//! state surface. The calling account is taken from the `X-Account` header.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use handlers::*;
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Balances
        .route("/api/balance/:address", get(get_balance))
        .route("/api/deposit", post(deposit))
        .route("/api/withdraw", post(withdraw))
        // Games
        .route("/api/games", post(create_game))
        .route("/api/games/open", get(list_open_games))
        .route("/api/games/next-id", get(next_game_id))
        .route("/api/games/:id", get(get_game))
        .route("/api/games/:id/discard", post(discard_game))
        .route("/api/games/:id/join", post(join_game))
        .route("/api/games/:id/move", post(send_move))
        .route("/api/games/:id/timeout", post(time_out))
        // Views
        .route("/api/win-table/:one/:two", get(win_table))
        .route("/api/events", get(list_events))
        .route("/api/audit", get(audit))
        // System
        .route("/api/system/tick", post(tick))
        .route("/api/faucet", post(faucet))
        // Health
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}
