use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;

use crate::config::db::{db_url, prod_db_path, DbProfile};
use crate::error::AppError;

/// Single entrypoint for database startup: connect, enable foreign keys,
/// and bring the schema up to date.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    if profile == DbProfile::Prod {
        ensure_db_dir()?;
    }

    let url = db_url(profile);

    let mut options = ConnectOptions::new(url.clone());
    options.sqlx_logging(false);
    if profile == DbProfile::Test {
        // An in-memory SQLite database exists per connection; pin the pool
        // to one so every query sees the same schema.
        options.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(options)
        .await
        .map_err(|e| AppError::db(format!("failed to connect to {url}: {e}")))?;

    conn.execute(Statement::from_string(
        conn.get_database_backend(),
        "PRAGMA foreign_keys = ON".to_string(),
    ))
    .await?;

    migrate(&conn, MigrationCommand::Up).await?;

    info!(%url, "database ready");
    Ok(conn)
}

/// Make sure the directory holding the SQLite file exists before sqlx
/// tries to create the file inside it.
fn ensure_db_dir() -> Result<(), AppError> {
    let path = prod_db_path();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config(format!(
                    "failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }
    Ok(())
}
