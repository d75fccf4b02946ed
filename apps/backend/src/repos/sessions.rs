//! Training-session and mulligan-history repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::{mulligan_history, training_sessions};

/// New-session payload as written by the trainer frontend. Counter fields
/// default to 0 when the client omits them.
#[derive(Debug, Clone, Default)]
pub struct SessionCreate {
    pub deck_name: Option<String>,
    pub deck_list: Option<String>,
    pub total_hands: i32,
    pub total_mulligans: i32,
    pub total_cards_exchanged: i32,
    pub total_unink_before: i32,
    pub total_unink_after: i32,
    pub total_ink_cost_before: f64,
    pub total_ink_cost_after: f64,
    pub session_duration: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MulliganCreate {
    pub mulligan_number: i32,
    pub situation_role: Option<String>,
    pub situation_opponent: Option<String>,
    pub hand_before: Option<String>,
    pub hand_after: Option<String>,
    pub cards_exchanged: Option<String>,
    pub unink_count_before: i32,
    pub unink_count_after: i32,
    pub avg_ink_cost_before: f64,
    pub avg_ink_cost_after: f64,
    pub decision_time: Option<i32>,
}

pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    dto: SessionCreate,
) -> Result<training_sessions::Model, sea_orm::DbErr> {
    let session_active = training_sessions::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        deck_name: Set(dto.deck_name),
        deck_list: Set(dto.deck_list),
        total_hands: Set(dto.total_hands),
        total_mulligans: Set(dto.total_mulligans),
        total_cards_exchanged: Set(dto.total_cards_exchanged),
        total_unink_before: Set(dto.total_unink_before),
        total_unink_after: Set(dto.total_unink_after),
        total_ink_cost_before: Set(dto.total_ink_cost_before),
        total_ink_cost_after: Set(dto.total_ink_cost_after),
        session_duration: Set(dto.session_duration),
        notes: Set(dto.notes),
        session_date: Set(OffsetDateTime::now_utc()),
    };

    session_active.insert(conn).await
}

/// Newest-first sessions for a user, capped at `limit`.
pub async fn find_recent_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    limit: u64,
) -> Result<Vec<training_sessions::Model>, sea_orm::DbErr> {
    training_sessions::Entity::find()
        .filter(training_sessions::Column::UserId.eq(user_id))
        .order_by_desc(training_sessions::Column::SessionDate)
        .limit(limit)
        .all(conn)
        .await
}

/// Fetch a session only if it belongs to the given user. Other users'
/// sessions are indistinguishable from nonexistent ones.
pub async fn find_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    user_id: i64,
) -> Result<Option<training_sessions::Model>, sea_orm::DbErr> {
    training_sessions::Entity::find_by_id(session_id)
        .filter(training_sessions::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

pub async fn insert_mulligan<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    dto: MulliganCreate,
) -> Result<mulligan_history::Model, sea_orm::DbErr> {
    let mulligan_active = mulligan_history::ActiveModel {
        id: NotSet,
        session_id: Set(session_id),
        mulligan_number: Set(dto.mulligan_number),
        situation_role: Set(dto.situation_role),
        situation_opponent: Set(dto.situation_opponent),
        hand_before: Set(dto.hand_before),
        hand_after: Set(dto.hand_after),
        cards_exchanged: Set(dto.cards_exchanged),
        unink_count_before: Set(dto.unink_count_before),
        unink_count_after: Set(dto.unink_count_after),
        avg_ink_cost_before: Set(dto.avg_ink_cost_before),
        avg_ink_cost_after: Set(dto.avg_ink_cost_after),
        decision_time: Set(dto.decision_time),
        created_at: Set(OffsetDateTime::now_utc()),
    };

    mulligan_active.insert(conn).await
}

pub async fn history_for_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Vec<mulligan_history::Model>, sea_orm::DbErr> {
    mulligan_history::Entity::find()
        .filter(mulligan_history::Column::SessionId.eq(session_id))
        .order_by_asc(mulligan_history::Column::MulliganNumber)
        .all(conn)
        .await
}
