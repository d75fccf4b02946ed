use std::env;
use std::path::PathBuf;

/// Database profile enum for different environments
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DbProfile {
    /// File-backed SQLite at `DB_PATH`
    Prod,
    /// Private in-memory SQLite, one per test state
    Test,
}

const DEFAULT_DB_PATH: &str = "./database/drawstep.db";

/// Filesystem path of the production database file.
pub fn prod_db_path() -> PathBuf {
    PathBuf::from(env::var("DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()))
}

/// SQLite connection URL for the given profile.
pub fn db_url(profile: DbProfile) -> String {
    match profile {
        // mode=rwc creates the file on first start
        DbProfile::Prod => format!("sqlite://{}?mode=rwc", prod_db_path().display()),
        DbProfile::Test => "sqlite::memory:".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::{db_url, DbProfile};

    #[test]
    fn test_profile_is_in_memory() {
        assert_eq!(db_url(DbProfile::Test), "sqlite::memory:");
    }

    #[test]
    fn prod_url_uses_db_path_env() {
        env::set_var("DB_PATH", "/tmp/drawstep-test.db");
        assert_eq!(
            db_url(DbProfile::Prod),
            "sqlite:///tmp/drawstep-test.db?mode=rwc"
        );
        env::remove_var("DB_PATH");
    }
}
