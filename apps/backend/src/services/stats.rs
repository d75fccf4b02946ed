//! Practice-statistics flows: session tracking, mulligan history, rollups,
//! and the global leaderboard.

use sea_orm::ConnectionTrait;
use serde_json::Value;
use tracing::{debug, info};

use crate::entities::{mulligan_history, training_sessions};
use crate::error::AppError;
use crate::repos::sessions as sessions_repo;
use crate::repos::stats as stats_repo;
pub use crate::repos::sessions::{MulliganCreate, SessionCreate};
pub use crate::repos::stats::LeaderboardRow;

/// Per-user statistics as returned by the API (averages pre-rounded).
#[derive(Debug, Clone, PartialEq)]
pub struct UserStatistics {
    pub total_sessions: i64,
    pub total_hands_practiced: i64,
    pub total_mulligans: i64,
    pub average_session_duration: f64,
    pub average_mulligans_per_session: f64,
}

/// Record a finished training session and refresh the user's rollup.
pub async fn create_session(
    conn: &(impl ConnectionTrait + Send + Sync),
    user_id: i64,
    dto: SessionCreate,
) -> Result<i64, AppError> {
    let session = sessions_repo::create_session(conn, user_id, dto).await?;
    refresh_user_stats(conn, user_id).await?;

    info!(user_id, session_id = session.id, "training session recorded");
    Ok(session.id)
}

pub async fn list_sessions(
    conn: &(impl ConnectionTrait + Send + Sync),
    user_id: i64,
    limit: u64,
) -> Result<Vec<training_sessions::Model>, AppError> {
    Ok(sessions_repo::find_recent_for_user(conn, user_id, limit).await?)
}

/// A session with its mulligan history, or 404 if it does not exist or
/// belongs to someone else.
pub async fn session_detail(
    conn: &(impl ConnectionTrait + Send + Sync),
    user_id: i64,
    session_id: i64,
) -> Result<(training_sessions::Model, Vec<mulligan_history::Model>), AppError> {
    let session = require_session(conn, user_id, session_id).await?;
    let history = sessions_repo::history_for_session(conn, session_id).await?;
    Ok((session, history))
}

/// Append a mulligan-history entry to one of the user's sessions.
pub async fn record_mulligan(
    conn: &(impl ConnectionTrait + Send + Sync),
    user_id: i64,
    session_id: i64,
    dto: MulliganCreate,
) -> Result<i64, AppError> {
    require_session(conn, user_id, session_id).await?;

    let entry = sessions_repo::insert_mulligan(conn, session_id, dto).await?;
    debug!(user_id, session_id, mulligan_id = entry.id, "mulligan recorded");
    Ok(entry.id)
}

/// Recompute the user's rollup, persist it, and return the API view.
pub async fn user_statistics(
    conn: &(impl ConnectionTrait + Send + Sync),
    user_id: i64,
) -> Result<UserStatistics, AppError> {
    let aggregates = refresh_user_stats(conn, user_id).await?;

    let average_mulligans_per_session = if aggregates.total_sessions > 0 {
        round2(aggregates.total_mulligans as f64 / aggregates.total_sessions as f64)
    } else {
        0.0
    };

    Ok(UserStatistics {
        total_sessions: aggregates.total_sessions,
        total_hands_practiced: aggregates.total_hands_practiced,
        total_mulligans: aggregates.total_mulligans,
        average_session_duration: round2(aggregates.average_session_duration),
        average_mulligans_per_session,
    })
}

pub async fn leaderboard(
    conn: &(impl ConnectionTrait + Send + Sync),
    limit: u64,
) -> Result<Vec<LeaderboardRow>, AppError> {
    Ok(stats_repo::leaderboard(conn, limit).await?)
}

async fn require_session(
    conn: &(impl ConnectionTrait + Send + Sync),
    user_id: i64,
    session_id: i64,
) -> Result<training_sessions::Model, AppError> {
    sessions_repo::find_for_user(conn, session_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("SESSION_NOT_FOUND", "Session not found".to_string()))
}

async fn refresh_user_stats(
    conn: &(impl ConnectionTrait + Send + Sync),
    user_id: i64,
) -> Result<stats_repo::SessionAggregates, AppError> {
    let aggregates = stats_repo::aggregate_for_user(conn, user_id).await?;
    stats_repo::upsert_user_stats(conn, user_id, &aggregates).await?;
    Ok(aggregates)
}

/// Round half-up to two decimals, as the frontend displays them.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a stored JSON text column leniently; corrupt data reads as null
/// rather than failing the whole response.
pub fn parse_json_column(raw: Option<&str>) -> Value {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{parse_json_column, round2};

    #[test]
    fn round2_matches_display_rounding() {
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(1.2345), 1.23);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn parse_json_column_is_lenient() {
        assert_eq!(parse_json_column(Some(r#"["a","b"]"#)), json!(["a", "b"]));
        assert_eq!(parse_json_column(Some("not json")), json!(null));
        assert_eq!(parse_json_column(None), json!(null));
    }
}
