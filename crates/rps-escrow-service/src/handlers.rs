//! HTTP API handlers.

use axum::{extract::State, http::HeaderMap, Json};
use rps_escrow_core::{
    is_p1_winner, Game, GameId, GamePhase, LedgerAudit, Move, MoveReceipt, OutcomeEvent, Player,
};
use rps_token::Address;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// Header carrying the calling account
pub const ACCOUNT_HEADER: &str = "X-Account";

// ============ Request/Response types ============

#[derive(Deserialize)]
pub struct AmountRequest {
    pub amount: u64,
}

#[derive(Deserialize)]
pub struct CreateGameRequest {
    pub bet_amount: u64,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    #[serde(rename = "move")]
    pub mv: String,
}

#[derive(Deserialize)]
pub struct TickRequest {
    pub seconds: u64,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub account: Address,
    pub balance: u64,
}

#[derive(Serialize)]
pub struct GameResponse {
    #[serde(flatten)]
    pub game: Game,
    pub phase: GamePhase,
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        let phase = game.phase();
        Self { game, phase }
    }
}

#[derive(Serialize)]
pub struct CreateGameResponse {
    pub game_id: GameId,
}

#[derive(Serialize)]
pub struct TimeoutResponse {
    pub game_id: GameId,
    pub unresponsive: Player,
}

#[derive(Serialize)]
pub struct WinTableResponse {
    pub move_one: Move,
    pub move_two: Move,
    pub p1_wins: bool,
}

#[derive(Serialize)]
pub struct TickResponse {
    pub now: u64,
}

// ============ Helper to get caller from header ============

fn caller_from_headers(headers: &HeaderMap) -> Result<Address, AppError> {
    let raw = headers
        .get(ACCOUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthenticated(format!("Missing {ACCOUNT_HEADER} header")))?;
    raw.trim()
        .parse::<Address>()
        .map_err(|e| AppError::Unauthenticated(format!("Invalid {ACCOUNT_HEADER} header: {e}")))
}

// ============ Health ============

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

// ============ Balance handlers ============

pub async fn get_balance(
    State(state): State<AppState>,
    ApiPath(account): ApiPath<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account = account
        .parse::<Address>()
        .map_err(|e| AppError::BadRequest(format!("Invalid address: {e}")))?;
    Ok(Json(BalanceResponse {
        account,
        balance: state.escrow().balance_of(&account),
    }))
}

pub async fn deposit(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<AmountRequest>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account = caller_from_headers(&headers)?;
    let balance = state.escrow().deposit(account, req.amount).await?;
    Ok(Json(BalanceResponse { account, balance }))
}

pub async fn withdraw(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<AmountRequest>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account = caller_from_headers(&headers)?;
    let balance = state.escrow().withdraw(account, req.amount).await?;
    Ok(Json(BalanceResponse { account, balance }))
}

// ============ Game handlers ============

pub async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, AppError> {
    let creator = caller_from_headers(&headers)?;
    let game_id = state.escrow().create_game(creator, req.bet_amount)?;
    Ok(Json(CreateGameResponse { game_id }))
}

pub async fn list_open_games(State(state): State<AppState>) -> Json<Vec<GameResponse>> {
    let games = state.escrow().open_games();
    Json(games.into_iter().map(Into::into).collect())
}

pub async fn next_game_id(State(state): State<AppState>) -> Json<CreateGameResponse> {
    Json(CreateGameResponse {
        game_id: state.escrow().next_game_id(),
    })
}

pub async fn get_game(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<GameResponse>, AppError> {
    let game_id = GameId::new(id);
    let game = state
        .escrow()
        .game(game_id)
        .ok_or(AppError::GameNotFound(game_id))?;
    Ok(Json(game.into()))
}

pub async fn discard_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<GameResponse>, AppError> {
    let caller = caller_from_headers(&headers)?;
    let game_id = GameId::new(id);
    state.escrow().discard_created_game(caller, game_id)?;
    game_snapshot(&state, game_id)
}

pub async fn join_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<GameResponse>, AppError> {
    let caller = caller_from_headers(&headers)?;
    let game_id = GameId::new(id);
    state.escrow().join_game(caller, game_id)?;
    game_snapshot(&state, game_id)
}

pub async fn send_move(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<u64>,
    ApiJson(req): ApiJson<MoveRequest>,
) -> Result<Json<MoveReceipt>, AppError> {
    let caller = caller_from_headers(&headers)?;
    let mv: Move = req.mv.parse()?;
    let receipt = state.escrow().send_move(caller, GameId::new(id), mv)?;
    Ok(Json(receipt))
}

pub async fn time_out(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<TimeoutResponse>, AppError> {
    let caller = caller_from_headers(&headers)?;
    let game_id = GameId::new(id);
    let unresponsive = state.escrow().time_out(caller, game_id)?;
    Ok(Json(TimeoutResponse {
        game_id,
        unresponsive,
    }))
}

fn game_snapshot(state: &AppState, game_id: GameId) -> Result<Json<GameResponse>, AppError> {
    state
        .escrow()
        .game(game_id)
        .map(|game| Json(game.into()))
        .ok_or(AppError::GameNotFound(game_id))
}

// ============ Read-only views ============

pub async fn win_table(
    ApiPath((one, two)): ApiPath<(String, String)>,
) -> Result<Json<WinTableResponse>, AppError> {
    let move_one: Move = one.parse()?;
    let move_two: Move = two.parse()?;
    Ok(Json(WinTableResponse {
        move_one,
        move_two,
        p1_wins: is_p1_winner(move_one, move_two),
    }))
}

pub async fn list_events(State(state): State<AppState>) -> Json<Vec<OutcomeEvent>> {
    Json(state.escrow().events())
}

pub async fn audit(State(state): State<AppState>) -> Json<serde_json::Value> {
    let audit: LedgerAudit = state.escrow().audit();
    Json(serde_json::json!({
        "free": audit.free,
        "locked": audit.locked,
        "burned": audit.burned,
        "total": audit.total(),
        "custody": state.escrow().ledger().custody(),
    }))
}

// ============ System handlers ============

pub async fn tick(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TickRequest>,
) -> Result<Json<TickResponse>, AppError> {
    let now = state
        .advance_time(req.seconds)
        .ok_or(AppError::Disabled("Simulated clock"))?;
    tracing::info!(seconds = req.seconds, now, "simulated clock advanced");
    Ok(Json(TickResponse { now }))
}

/// Mint in-memory tokens to the caller's external account
pub async fn faucet(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<AmountRequest>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account = caller_from_headers(&headers)?;
    let token = state.faucet().ok_or(AppError::Disabled("Faucet"))?;
    let balance = token
        .mint(account, req.amount)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    tracing::info!(%account, amount = req.amount, "faucet minted tokens");
    Ok(Json(BalanceResponse { account, balance }))
}
