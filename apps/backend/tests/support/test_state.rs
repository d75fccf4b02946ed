use backend::config::db::DbProfile;
use backend::infra::state::build_state;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use backend::AppError;

/// Fresh AppState over a private in-memory SQLite database with a
/// test-speed bcrypt cost.
pub async fn build_test_state() -> Result<AppState, AppError> {
    build_test_state_with_security(test_security()).await
}

pub async fn build_test_state_with_security(
    security: SecurityConfig,
) -> Result<AppState, AppError> {
    build_state()
        .with_db(DbProfile::Test)
        .with_security(security)
        .build()
        .await
}

/// Security config for tests: stable secret, minimum bcrypt cost so suites
/// stay fast.
pub fn test_security() -> SecurityConfig {
    SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes()).with_bcrypt_cost(4)
}
