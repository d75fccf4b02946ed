use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "training_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "user_id")]
    pub user_id: i64,
    #[sea_orm(column_name = "deck_name")]
    pub deck_name: Option<String>,
    /// Deck list stored as a JSON text blob, parsed at the API boundary
    #[sea_orm(column_name = "deck_list")]
    pub deck_list: Option<String>,
    #[sea_orm(column_name = "total_hands")]
    pub total_hands: i32,
    #[sea_orm(column_name = "total_mulligans")]
    pub total_mulligans: i32,
    #[sea_orm(column_name = "total_cards_exchanged")]
    pub total_cards_exchanged: i32,
    #[sea_orm(column_name = "total_unink_before")]
    pub total_unink_before: i32,
    #[sea_orm(column_name = "total_unink_after")]
    pub total_unink_after: i32,
    #[sea_orm(column_name = "total_ink_cost_before")]
    pub total_ink_cost_before: f64,
    #[sea_orm(column_name = "total_ink_cost_after")]
    pub total_ink_cost_after: f64,
    #[sea_orm(column_name = "session_duration")]
    pub session_duration: Option<i32>,
    pub notes: Option<String>,
    #[sea_orm(column_name = "session_date")]
    pub session_date: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::mulligan_history::Entity")]
    MulliganHistory,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::mulligan_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MulliganHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
