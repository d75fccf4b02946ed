use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mulligan_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "session_id")]
    pub session_id: i64,
    #[sea_orm(column_name = "mulligan_number")]
    pub mulligan_number: i32,
    /// "play" or "draw"
    #[sea_orm(column_name = "situation_role")]
    pub situation_role: Option<String>,
    #[sea_orm(column_name = "situation_opponent")]
    pub situation_opponent: Option<String>,
    // Hands and exchanged cards stored as JSON text blobs
    #[sea_orm(column_name = "hand_before")]
    pub hand_before: Option<String>,
    #[sea_orm(column_name = "hand_after")]
    pub hand_after: Option<String>,
    #[sea_orm(column_name = "cards_exchanged")]
    pub cards_exchanged: Option<String>,
    #[sea_orm(column_name = "unink_count_before")]
    pub unink_count_before: i32,
    #[sea_orm(column_name = "unink_count_after")]
    pub unink_count_after: i32,
    #[sea_orm(column_name = "avg_ink_cost_before")]
    pub avg_ink_cost_before: f64,
    #[sea_orm(column_name = "avg_ink_cost_after")]
    pub avg_ink_cost_after: f64,
    #[sea_orm(column_name = "decision_time")]
    pub decision_time: Option<i32>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::training_sessions::Entity",
        from = "Column::SessionId",
        to = "super::training_sessions::Column::Id"
    )]
    TrainingSession,
}

impl Related<super::training_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainingSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
