use actix_web::web;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub mod auth;
pub mod health;
pub mod stats;

/// Configure application routes.
///
/// Used by `main.rs` and by test app builders so both register the same
/// paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Auth routes: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // Statistics routes: /api/stats/**
    cfg.service(web::scope("/api/stats").configure(stats::configure_routes));
}

/// RFC3339 timestamp rendering for response bodies.
pub(crate) fn fmt_timestamp(t: OffsetDateTime) -> String {
    t.format(&Rfc3339).unwrap_or_else(|_| "unknown".to_string())
}
