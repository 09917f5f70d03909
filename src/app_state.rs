//! Application state shared across all handlers.

use crate::auth::jwt::JwtService;
use crate::config::Config;

/// Application state shared across handlers.
///
/// Holds the database pool, configuration, and the JWT service needed to
/// process API requests. Everything durable lives in PostgreSQL; no
/// cross-request mutable state is kept in-process.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub db: sqlx::PgPool,
    /// Application configuration
    pub config: Config,
    /// JWT access/refresh token service
    pub jwt_service: JwtService,
}
