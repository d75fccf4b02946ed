//! Aggregate statistics repository.
//!
//! The rollup and leaderboard read with raw SQL: SeaORM's query builder has
//! no pleasant spelling for multi-aggregate selects, and the statements are
//! small enough to read at a glance.

use sea_orm::{ConnectionTrait, EntityTrait, Set, Statement};
use sea_orm::sea_query::OnConflict;
use time::OffsetDateTime;

use crate::entities::user_stats;

/// COUNT/SUM/AVG rollup over one user's training sessions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionAggregates {
    pub total_sessions: i64,
    pub total_hands_practiced: i64,
    pub total_mulligans: i64,
    pub average_session_duration: f64,
}

#[derive(Debug, Clone)]
pub struct LeaderboardRow {
    pub username: String,
    pub total_hands_practiced: i64,
    pub total_sessions: i64,
    pub average_session_duration: f64,
}

pub async fn aggregate_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<SessionAggregates, sea_orm::DbErr> {
    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        r#"
        SELECT
            COUNT(*) AS total_sessions,
            COALESCE(SUM(total_hands), 0) AS total_hands_practiced,
            COALESCE(SUM(total_mulligans), 0) AS total_mulligans,
            COALESCE(AVG(session_duration), 0.0) AS average_session_duration
        FROM training_sessions
        WHERE user_id = ?
        "#,
        [user_id.into()],
    );

    let row = conn
        .query_one(stmt)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("aggregate query returned no row".into()))?;

    Ok(SessionAggregates {
        total_sessions: row.try_get("", "total_sessions")?,
        total_hands_practiced: row.try_get("", "total_hands_practiced")?,
        total_mulligans: row.try_get("", "total_mulligans")?,
        average_session_duration: row.try_get("", "average_session_duration")?,
    })
}

/// Write the rollup into user_stats, replacing any previous row.
pub async fn upsert_user_stats<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    aggregates: &SessionAggregates,
) -> Result<(), sea_orm::DbErr> {
    let stats_active = user_stats::ActiveModel {
        user_id: Set(user_id),
        total_sessions: Set(aggregates.total_sessions as i32),
        total_hands_practiced: Set(aggregates.total_hands_practiced as i32),
        total_mulligans: Set(aggregates.total_mulligans as i32),
        average_session_duration: Set(aggregates.average_session_duration),
        last_updated: Set(OffsetDateTime::now_utc()),
    };

    user_stats::Entity::insert(stats_active)
        .on_conflict(
            OnConflict::column(user_stats::Column::UserId)
                .update_columns([
                    user_stats::Column::TotalSessions,
                    user_stats::Column::TotalHandsPracticed,
                    user_stats::Column::TotalMulligans,
                    user_stats::Column::AverageSessionDuration,
                    user_stats::Column::LastUpdated,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

/// Active users ranked by hands practiced, best first.
pub async fn leaderboard<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    limit: u64,
) -> Result<Vec<LeaderboardRow>, sea_orm::DbErr> {
    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        r#"
        SELECT
            u.username AS username,
            us.total_hands_practiced AS total_hands_practiced,
            us.total_sessions AS total_sessions,
            us.average_session_duration AS average_session_duration
        FROM user_stats us
        JOIN users u ON u.id = us.user_id
        WHERE u.is_active = 1
        ORDER BY us.total_hands_practiced DESC
        LIMIT ?
        "#,
        [(limit as i64).into()],
    );

    let rows = conn.query_all(stmt).await?;
    rows.into_iter()
        .map(|row| {
            Ok(LeaderboardRow {
                username: row.try_get("", "username")?,
                total_hands_practiced: row.try_get("", "total_hands_practiced")?,
                total_sessions: row.try_get("", "total_sessions")?,
                average_session_duration: row.try_get("", "average_session_duration")?,
            })
        })
        .collect()
}
