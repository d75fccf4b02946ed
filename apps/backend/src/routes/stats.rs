use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::claims::AccessClaims;
use crate::db::require_db;
use crate::entities::{mulligan_history, training_sessions};
use crate::error::AppError;
use crate::routes::fmt_timestamp;
use crate::services::stats as stats_service;
use crate::services::stats::{round2, parse_json_column, MulliganCreate, SessionCreate};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub deck_name: Option<String>,
    pub deck_list: Option<Value>,
    #[serde(default)]
    pub total_hands: i32,
    #[serde(default)]
    pub total_mulligans: i32,
    #[serde(default)]
    pub total_cards_exchanged: i32,
    #[serde(default)]
    pub total_unink_before: i32,
    #[serde(default)]
    pub total_unink_after: i32,
    #[serde(default)]
    pub total_ink_cost_before: f64,
    #[serde(default)]
    pub total_ink_cost_after: f64,
    pub session_duration: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMulliganRequest {
    #[serde(default)]
    pub mulligan_number: i32,
    pub situation_role: Option<String>,
    pub situation_opponent: Option<String>,
    pub hand_before: Option<Value>,
    pub hand_after: Option<Value>,
    pub cards_exchanged: Option<Value>,
    #[serde(default)]
    pub unink_count_before: i32,
    #[serde(default)]
    pub unink_count_after: i32,
    #[serde(default)]
    pub avg_ink_cost_before: f64,
    #[serde(default)]
    pub avg_ink_cost_after: f64,
    pub decision_time: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

/// Training session as the trainer frontend reads it: stored JSON columns
/// come back parsed.
#[derive(Debug, Serialize)]
struct SessionView {
    id: i64,
    deck_name: Option<String>,
    deck_list: Value,
    total_hands: i32,
    total_mulligans: i32,
    total_cards_exchanged: i32,
    total_unink_before: i32,
    total_unink_after: i32,
    total_ink_cost_before: f64,
    total_ink_cost_after: f64,
    session_duration: Option<i32>,
    notes: Option<String>,
    session_date: String,
}

impl From<training_sessions::Model> for SessionView {
    fn from(model: training_sessions::Model) -> Self {
        Self {
            id: model.id,
            deck_name: model.deck_name,
            deck_list: parse_json_column(model.deck_list.as_deref()),
            total_hands: model.total_hands,
            total_mulligans: model.total_mulligans,
            total_cards_exchanged: model.total_cards_exchanged,
            total_unink_before: model.total_unink_before,
            total_unink_after: model.total_unink_after,
            total_ink_cost_before: model.total_ink_cost_before,
            total_ink_cost_after: model.total_ink_cost_after,
            session_duration: model.session_duration,
            notes: model.notes,
            session_date: fmt_timestamp(model.session_date),
        }
    }
}

#[derive(Debug, Serialize)]
struct MulliganView {
    id: i64,
    session_id: i64,
    mulligan_number: i32,
    situation_role: Option<String>,
    situation_opponent: Option<String>,
    hand_before: Value,
    hand_after: Value,
    cards_exchanged: Value,
    unink_count_before: i32,
    unink_count_after: i32,
    avg_ink_cost_before: f64,
    avg_ink_cost_after: f64,
    decision_time: Option<i32>,
    created_at: String,
}

impl From<mulligan_history::Model> for MulliganView {
    fn from(model: mulligan_history::Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id,
            mulligan_number: model.mulligan_number,
            situation_role: model.situation_role,
            situation_opponent: model.situation_opponent,
            hand_before: parse_json_column(model.hand_before.as_deref()),
            hand_after: parse_json_column(model.hand_after.as_deref()),
            cards_exchanged: parse_json_column(model.cards_exchanged.as_deref()),
            unink_count_before: model.unink_count_before,
            unink_count_after: model.unink_count_after,
            avg_ink_cost_before: model.avg_ink_cost_before,
            avg_ink_cost_after: model.avg_ink_cost_after,
            decision_time: model.decision_time,
            created_at: fmt_timestamp(model.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateSessionResponse {
    message: &'static str,
    session_id: i64,
}

#[derive(Debug, Serialize)]
struct SessionsResponse {
    sessions: Vec<SessionView>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct SessionDetailResponse {
    session: SessionView,
    mulligan_history: Vec<MulliganView>,
}

#[derive(Debug, Serialize)]
struct CreateMulliganResponse {
    message: &'static str,
    mulligan_id: i64,
}

#[derive(Debug, Serialize)]
struct StatisticsResponse {
    statistics: StatisticsView,
}

#[derive(Debug, Serialize)]
struct StatisticsView {
    total_sessions: i64,
    total_hands_practiced: i64,
    total_mulligans: i64,
    average_session_duration: f64,
    average_mulligans_per_session: f64,
}

#[derive(Debug, Serialize)]
struct LeaderboardResponse {
    leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
struct LeaderboardEntry {
    rank: usize,
    username: String,
    total_hands_practiced: i64,
    total_sessions: i64,
    average_session_duration: f64,
}

/// Record a finished training session for the authenticated user.
async fn create_session(
    claims: AccessClaims,
    req: web::Json<CreateSessionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let req = req.into_inner();

    let dto = SessionCreate {
        deck_name: req.deck_name,
        deck_list: req.deck_list.map(|v| v.to_string()),
        total_hands: req.total_hands,
        total_mulligans: req.total_mulligans,
        total_cards_exchanged: req.total_cards_exchanged,
        total_unink_before: req.total_unink_before,
        total_unink_after: req.total_unink_after,
        total_ink_cost_before: req.total_ink_cost_before,
        total_ink_cost_after: req.total_ink_cost_after,
        session_duration: req.session_duration,
        notes: req.notes,
    };

    let session_id = stats_service::create_session(db, claims.user_id, dto).await?;

    Ok(HttpResponse::Created().json(CreateSessionResponse {
        message: "Training session created",
        session_id,
    }))
}

/// Newest-first sessions for the authenticated user.
async fn sessions(
    claims: AccessClaims,
    query: web::Query<LimitQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let limit = query.limit.unwrap_or(50);

    let sessions = stats_service::list_sessions(db, claims.user_id, limit).await?;
    let sessions: Vec<SessionView> = sessions.into_iter().map(SessionView::from).collect();

    let count = sessions.len();
    Ok(HttpResponse::Ok().json(SessionsResponse { sessions, count }))
}

/// One session plus its mulligan history.
async fn session_detail(
    claims: AccessClaims,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let session_id = path.into_inner();

    let (session, history) = stats_service::session_detail(db, claims.user_id, session_id).await?;

    Ok(HttpResponse::Ok().json(SessionDetailResponse {
        session: SessionView::from(session),
        mulligan_history: history.into_iter().map(MulliganView::from).collect(),
    }))
}

/// Append a mulligan decision to one of the user's sessions.
async fn record_mulligan(
    claims: AccessClaims,
    path: web::Path<i64>,
    req: web::Json<CreateMulliganRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let session_id = path.into_inner();
    let req = req.into_inner();

    let dto = MulliganCreate {
        mulligan_number: req.mulligan_number,
        situation_role: req.situation_role,
        situation_opponent: req.situation_opponent,
        hand_before: req.hand_before.map(|v| v.to_string()),
        hand_after: req.hand_after.map(|v| v.to_string()),
        cards_exchanged: req.cards_exchanged.map(|v| v.to_string()),
        unink_count_before: req.unink_count_before,
        unink_count_after: req.unink_count_after,
        avg_ink_cost_before: req.avg_ink_cost_before,
        avg_ink_cost_after: req.avg_ink_cost_after,
        decision_time: req.decision_time,
    };

    let mulligan_id = stats_service::record_mulligan(db, claims.user_id, session_id, dto).await?;

    Ok(HttpResponse::Created().json(CreateMulliganResponse {
        message: "Mulligan history saved",
        mulligan_id,
    }))
}

/// Refresh and return the authenticated user's aggregate statistics.
async fn user_stats(
    claims: AccessClaims,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;

    let stats = stats_service::user_statistics(db, claims.user_id).await?;

    Ok(HttpResponse::Ok().json(StatisticsResponse {
        statistics: StatisticsView {
            total_sessions: stats.total_sessions,
            total_hands_practiced: stats.total_hands_practiced,
            total_mulligans: stats.total_mulligans,
            average_session_duration: stats.average_session_duration,
            average_mulligans_per_session: stats.average_mulligans_per_session,
        },
    }))
}

/// Global leaderboard; the only public stats route.
async fn leaderboard(
    query: web::Query<LimitQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let limit = query.limit.unwrap_or(10);

    let rows = stats_service::leaderboard(db, limit).await?;
    let leaderboard = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| LeaderboardEntry {
            rank: index + 1,
            username: row.username,
            total_hands_practiced: row.total_hands_practiced,
            total_sessions: row.total_sessions,
            average_session_duration: round2(row.average_session_duration),
        })
        .collect();

    Ok(HttpResponse::Ok().json(LeaderboardResponse { leaderboard }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/session").route(web::post().to(create_session)))
        .service(web::resource("/sessions").route(web::get().to(sessions)))
        .service(web::resource("/session/{id}").route(web::get().to(session_detail)))
        .service(web::resource("/session/{id}/mulligan").route(web::post().to(record_mulligan)))
        .service(web::resource("/user/stats").route(web::get().to(user_stats)))
        .service(web::resource("/leaderboard").route(web::get().to(leaderboard)));
}
