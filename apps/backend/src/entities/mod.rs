pub mod mulligan_history;
pub mod training_sessions;
pub mod user_stats;
pub mod users;
