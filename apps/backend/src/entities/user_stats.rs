use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Aggregated per-user rollup, refreshed by upsert after session writes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "user_id")]
    pub user_id: i64,
    #[sea_orm(column_name = "total_sessions")]
    pub total_sessions: i32,
    #[sea_orm(column_name = "total_hands_practiced")]
    pub total_hands_practiced: i32,
    #[sea_orm(column_name = "total_mulligans")]
    pub total_mulligans: i32,
    #[sea_orm(column_name = "average_session_duration")]
    pub average_session_duration: f64,
    #[sea_orm(column_name = "last_updated")]
    pub last_updated: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
