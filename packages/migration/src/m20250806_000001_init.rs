use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    IsActive,
    CreatedAt,
    LastLogin,
}

#[derive(Iden)]
enum TrainingSessions {
    Table,
    Id,
    UserId,
    DeckName,
    DeckList,
    TotalHands,
    TotalMulligans,
    TotalCardsExchanged,
    TotalUninkBefore,
    TotalUninkAfter,
    TotalInkCostBefore,
    TotalInkCostAfter,
    SessionDuration,
    Notes,
    SessionDate,
}

#[derive(Iden)]
enum MulliganHistory {
    Table,
    Id,
    SessionId,
    MulliganNumber,
    SituationRole,
    SituationOpponent,
    HandBefore,
    HandAfter,
    CardsExchanged,
    UninkCountBefore,
    UninkCountAfter,
    AvgInkCostBefore,
    AvgInkCostAfter,
    DecisionTime,
    CreatedAt,
}

#[derive(Iden)]
enum UserStats {
    Table,
    UserId,
    TotalSessions,
    TotalHandsPracticed,
    TotalMulligans,
    AverageSessionDuration,
    LastUpdated,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::LastLogin)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // training_sessions
        manager
            .create_table(
                Table::create()
                    .table(TrainingSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrainingSessions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(TrainingSessions::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TrainingSessions::DeckName).string().null())
                    .col(ColumnDef::new(TrainingSessions::DeckList).text().null())
                    .col(
                        ColumnDef::new(TrainingSessions::TotalHands)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TrainingSessions::TotalMulligans)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TrainingSessions::TotalCardsExchanged)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TrainingSessions::TotalUninkBefore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TrainingSessions::TotalUninkAfter)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TrainingSessions::TotalInkCostBefore)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TrainingSessions::TotalInkCostAfter)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TrainingSessions::SessionDuration)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(TrainingSessions::Notes).text().null())
                    .col(
                        ColumnDef::new(TrainingSessions::SessionDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_training_sessions_user_id")
                            .from(TrainingSessions::Table, TrainingSessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_training_sessions_user_id")
                    .table(TrainingSessions::Table)
                    .col(TrainingSessions::UserId)
                    .to_owned(),
            )
            .await?;

        // mulligan_history
        manager
            .create_table(
                Table::create()
                    .table(MulliganHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MulliganHistory::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(MulliganHistory::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MulliganHistory::MulliganNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MulliganHistory::SituationRole)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MulliganHistory::SituationOpponent)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(MulliganHistory::HandBefore).text().null())
                    .col(ColumnDef::new(MulliganHistory::HandAfter).text().null())
                    .col(
                        ColumnDef::new(MulliganHistory::CardsExchanged)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MulliganHistory::UninkCountBefore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MulliganHistory::UninkCountAfter)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MulliganHistory::AvgInkCostBefore)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MulliganHistory::AvgInkCostAfter)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MulliganHistory::DecisionTime)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MulliganHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mulligan_history_session_id")
                            .from(MulliganHistory::Table, MulliganHistory::SessionId)
                            .to(TrainingSessions::Table, TrainingSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_mulligan_history_session_id")
                    .table(MulliganHistory::Table)
                    .col(MulliganHistory::SessionId)
                    .to_owned(),
            )
            .await?;

        // user_stats (one row per user, refreshed by upsert)
        manager
            .create_table(
                Table::create()
                    .table(UserStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserStats::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserStats::TotalSessions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::TotalHandsPracticed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::TotalMulligans)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::AverageSessionDuration)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_stats_user_id")
                            .from(UserStats::Table, UserStats::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserStats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MulliganHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrainingSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
