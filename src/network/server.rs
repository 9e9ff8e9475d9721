//! HTTP Game Server
//!
//! Axum router for the two game endpoints plus the per-user session
//! registry. Each user gets one `GameSession` behind a mutex; a request
//! that arrives while another is in flight for the same user is rejected
//! with a busy error rather than queued.
//!
//! Egg identifiers in responses are server-authoritative: a crack naming
//! an unknown egg buys a fresh one (first crack), and the client adopts
//! the returned uid.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::core::rng::derive_session_seed;
use crate::game::action::{Action, ActionOutcome};
use crate::game::egg::{EggType, EggUid};
use crate::game::resolver::ResolverConfig;
use crate::game::session::{GameError, GameSession};
use crate::game::store::Source;
use crate::network::journal::{JournalEntry, TransactionJournal};
use crate::network::protocol::{
    ActionRequest, ActionResponse, ErrorResponse, InitConfig, InitRequest, InitResponse,
    WireAction,
};
use crate::{CURRENCY, MAX_STORED, MAX_TRIES};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Force every crack to win (demo/testing override).
    pub force_win: bool,
    /// Force every win to be a bonus (demo/testing override).
    pub force_bonus: bool,
    /// Transaction journal path.
    pub log_path: PathBuf,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            force_win: false,
            force_bonus: false,
            log_path: PathBuf::from("server/logs/transactions.jsonl"),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ServerConfig {
    /// Build from the process environment: `PORT`, `FORCE_WIN`,
    /// `FORCE_BONUS`, `LOG_PATH`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.bind_addr = SocketAddr::from(([0, 0, 0, 0], port));
        }
        config.force_win = env_flag("FORCE_WIN");
        config.force_bonus = env_flag("FORCE_BONUS");
        if let Ok(path) = std::env::var("LOG_PATH") {
            config.log_path = PathBuf::from(path);
        }
        config
    }

    fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            force_win: self.force_win,
            force_bonus: self.force_bonus,
            ..Default::default()
        }
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors surfaced by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// `userId` or `token` absent or empty.
    #[error("missing userId or token")]
    MissingCredentials,

    /// Unrecognized action name.
    #[error("unknown action")]
    UnknownAction,

    /// Rejected by the session state machine.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Unexpected server-side failure.
    #[error("internal error")]
    Internal,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials | ApiError::UnknownAction => StatusCode::BAD_REQUEST,
            ApiError::Game(GameError::Busy) => StatusCode::CONFLICT,
            ApiError::Game(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Shared server state: session registry + journal.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    sessions: RwLock<BTreeMap<String, Arc<Mutex<GameSession>>>>,
    journal: TransactionJournal,
    config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                sessions: RwLock::new(BTreeMap::new()),
                journal: TransactionJournal::new(config.log_path.clone()),
                config,
            }),
        }
    }

    /// Look up or create the session for a user.
    pub async fn session_for(&self, user_id: &str) -> Arc<Mutex<GameSession>> {
        {
            let sessions = self.inner.sessions.read().await;
            if let Some(session) = sessions.get(user_id) {
                return session.clone();
            }
        }

        let mut sessions = self.inner.sessions.write().await;
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                let session_id = *uuid::Uuid::new_v4().as_bytes();
                let nonce = Utc::now().timestamp_millis() as u64;
                let seed = derive_session_seed(user_id, &session_id, nonce);
                info!(user_id, "session created");
                Arc::new(Mutex::new(GameSession::with_config(
                    seed,
                    self.inner.config.resolver_config(),
                )))
            })
            .clone()
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /game/init`: session bootstrap and shop catalog.
async fn handle_init(
    State(state): State<AppState>,
    Json(request): Json<InitRequest>,
) -> Result<Json<InitResponse>, ApiError> {
    if request.user_id.trim().is_empty() {
        return Err(ApiError::MissingCredentials);
    }
    debug!(user_id = %request.user_id, lang = ?request.lang, "init");

    let session = state.session_for(&request.user_id).await;
    let session = session.try_lock().map_err(|_| GameError::Busy)?;

    Ok(Json(InitResponse {
        api_status: "ok".to_string(),
        balance: session.balance(),
        config: InitConfig {
            eggs: EggType::catalog().into_iter().map(Into::into).collect(),
            currency: CURRENCY.to_string(),
            max_stored: MAX_STORED,
        },
        server_time: Utc::now().to_rfc3339(),
    }))
}

/// `POST /game/action`: crack/store/cashout/redeem against the session.
async fn handle_action(
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    if request.user_id.trim().is_empty() || request.token.trim().is_empty() {
        return Err(ApiError::MissingCredentials);
    }
    let wire = WireAction::parse(request.action.as_deref()).ok_or(ApiError::UnknownAction)?;

    let session = state.session_for(&request.user_id).await;
    let mut session = session.try_lock().map_err(|_| GameError::Busy)?;

    let balance_before = session.balance();
    let egg_type_hint = egg_type_hint(&session, &request);
    let outcome = dispatch(&mut session, wire, &request)?;
    let response = build_response(&session, &request, &outcome);

    let entry = JournalEntry {
        timestamp: Utc::now(),
        user_id: request.user_id.clone(),
        action: wire.as_str().to_string(),
        egg_id: response.egg_id.clone(),
        egg_type: egg_type_hint.as_str().to_string(),
        bet_amount: request.bet_amount.unwrap_or_else(|| egg_type_hint.base_bet()),
        win_amount: response.win_amount,
        result: response.result.clone(),
        bonus: response.bonus,
        balance_before,
        balance_after: response.balance,
    };
    if let Err(err) = state.inner.journal.append(&entry).await {
        // Journal failure never affects the committed action
        warn!(error = %err, path = %state.inner.journal.path().display(), "journal write failed");
    }

    Ok(Json(response))
}

/// Map a wire action onto session transitions.
fn dispatch(
    session: &mut GameSession,
    wire: WireAction,
    request: &ActionRequest,
) -> Result<ActionOutcome, ApiError> {
    let requested_uid = request.egg_id.as_deref().and_then(EggUid::from_uuid_str);
    let active_uid = session.active().map(|a| a.uid);

    match wire {
        WireAction::Crack => {
            let uid = match (requested_uid, active_uid) {
                (Some(uid), Some(active)) if uid == active => uid,
                (None, Some(active)) => active,
                (Some(uid), _) if session.egg_store().locate(uid) == Some(Source::Stored) => {
                    // Cracking a parked egg retrieves it first
                    session.apply(Action::Retrieve { egg_uid: uid })?;
                    uid
                }
                _ => {
                    // First crack for this egg buys it. Rejected with
                    // EggAlreadyActive while another egg is in play; the
                    // client must store or cash that one out first.
                    let egg_type = egg_type_hint(session, request);
                    match session.apply(Action::Buy { egg_type })? {
                        ActionOutcome::Bought { egg_uid, .. } => egg_uid,
                        _ => return Err(ApiError::Internal),
                    }
                }
            };
            Ok(session.apply(Action::Crack { egg_uid: uid })?)
        }
        WireAction::Store => {
            let uid = requested_uid.or(active_uid).ok_or(GameError::NoActiveEgg)?;
            Ok(session.apply(Action::Store { egg_uid: uid })?)
        }
        WireAction::Cashout => {
            let uid = requested_uid.or(active_uid).ok_or(GameError::NoActiveEgg)?;
            Ok(session.apply(Action::Cashout { egg_uid: uid })?)
        }
        WireAction::Redeem => {
            let uid = requested_uid.or(active_uid).ok_or(GameError::NoActiveEgg)?;
            Ok(session.apply(Action::Redeem { egg_uid: uid })?)
        }
    }
}

/// Egg type for purchases and journaling: explicit field first, then a
/// lookup of the targeted egg, then a bet-amount match, then gold.
fn egg_type_hint(session: &GameSession, request: &ActionRequest) -> EggType {
    if let Some(egg_type) = request.egg_type.as_deref().and_then(EggType::from_id) {
        return egg_type;
    }
    if let Some(egg) = request
        .egg_id
        .as_deref()
        .and_then(EggUid::from_uuid_str)
        .and_then(|uid| session.egg_store().get(uid))
    {
        return egg.egg_type;
    }
    if let Some(bet) = request.bet_amount {
        if let Some(egg_type) = EggType::catalog().into_iter().find(|t| t.base_bet() == bet) {
            return egg_type;
        }
    }
    EggType::default()
}

fn build_response(
    session: &GameSession,
    request: &ActionRequest,
    outcome: &ActionOutcome,
) -> ActionResponse {
    // Fallback level when the egg no longer exists server-side
    let request_level = request
        .try_index
        .map(|t| t.saturating_add(1).clamp(1, MAX_TRIES))
        .unwrap_or(1);

    let (status, result, win_amount, egg_id, level, bonus) = match outcome {
        ActionOutcome::Cracked {
            egg_uid,
            outcome,
            level,
            ..
        } => (
            Some(if outcome.did_win { 1 } else { 0 }),
            if outcome.did_win { "win" } else { "lose" },
            outcome.win_amount,
            *egg_uid,
            *level,
            outcome.is_bonus,
        ),
        ActionOutcome::Stored { egg_uid } => (
            None,
            "stored",
            0,
            *egg_uid,
            session
                .egg_store()
                .get(*egg_uid)
                .map(|e| e.level())
                .unwrap_or(request_level),
            false,
        ),
        ActionOutcome::CashedOut { egg_uid, amount } => {
            (Some(2), "cashout", *amount, *egg_uid, request_level, false)
        }
        ActionOutcome::Redeemed { egg_uid, amount } => {
            (Some(2), "redeemed", *amount, *egg_uid, request_level, false)
        }
        // Not reachable from the wire surface
        ActionOutcome::Bought { egg_uid, .. }
        | ActionOutcome::Retrieved { egg_uid } => {
            (None, "none", 0, *egg_uid, request_level, false)
        }
        ActionOutcome::TabSelected { .. } => {
            (None, "none", 0, EggUid::default(), request_level, false)
        }
    };

    ActionResponse {
        api_status: "ok".to_string(),
        status,
        result: result.to_string(),
        win_amount,
        balance: session.balance(),
        egg_id: egg_id.to_uuid_string(),
        level,
        bonus,
        server_time: Utc::now().to_rfc3339(),
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/game/init", post(handle_init))
        .route("/game/action", post(handle_action))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr;
    let state = AppState::new(config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = %bind_addr, "game server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
