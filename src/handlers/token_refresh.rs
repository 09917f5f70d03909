//! Session refresh.
//!
//! Exchanges a valid refresh cookie for a brand new access/refresh pair.
//! A missing, invalid or expired token clears both cookies so a client
//! with a dead session does not keep retrying with the same stale token;
//! transient server faults leave the cookies in place.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;
use crate::auth::cookies::{REFRESH_COOKIE, clear_auth_cookies, get_cookie_value, set_auth_cookies};
use crate::error::{ApiError, ErrorResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    pub expires_in: i64,
}

/// Rotate the session's token pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "auth",
    responses(
        (status = 200, description = "New token pair installed", body = RefreshResponse),
        (status = 401, description = "Missing or invalid refresh token; cookies cleared")
    )
)]
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match try_refresh(&state, &headers).await {
        Ok(response) => response,
        Err(err) if !should_clear_session(&err) => err.into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "Session refresh rejected");
            let cookies = clear_auth_cookies(state.config.secure_cookies());
            (
                StatusCode::UNAUTHORIZED,
                cookies,
                Json(ErrorResponse {
                    success: false,
                    message: "Session expired, please log in again".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Only token problems end the session. A transient server fault (pool
/// exhausted, lookup failed) surfaces as 500 and leaves the cookies alone
/// so the client can retry with the same refresh token.
fn should_clear_session(err: &ApiError) -> bool {
    !matches!(err, ApiError::Database(_) | ApiError::Internal(_))
}

async fn try_refresh(state: &AppState, headers: &HeaderMap) -> Result<Response, ApiError> {
    let token = get_cookie_value(headers, REFRESH_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("No refresh token".to_string()))?;

    let claims = state.jwt_service.decode_refresh(&token)?;

    // The fresh access token carries the current profile role, so a role
    // change takes effect at the next refresh.
    let row: Option<(String, bool)> =
        sqlx::query_as("SELECT role, is_active FROM users WHERE id = $1")
            .bind(claims.sub)
            .fetch_optional(&state.db)
            .await?;

    let (role, is_active) =
        row.ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))?;
    if !is_active {
        return Err(ApiError::Unauthorized("Account is disabled".to_string()));
    }

    let pair = state
        .jwt_service
        .mint_pair(claims.sub, &claims.email, Some(role))?;
    let cookies = set_auth_cookies(
        &pair.access_token,
        &pair.refresh_token,
        state.config.access_token_ttl,
        state.config.refresh_token_ttl,
        state.config.secure_cookies(),
    );

    Ok((
        cookies,
        Json(RefreshResponse {
            success: true,
            message: "Session refreshed".to_string(),
            expires_in: state.jwt_service.access_ttl(),
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_failures_keep_the_session_cookies() {
        assert!(!should_clear_session(&ApiError::Database(
            sqlx::Error::PoolTimedOut
        )));
        assert!(!should_clear_session(&ApiError::Internal(
            "lookup failed".to_string()
        )));
    }

    #[test]
    fn token_problems_end_the_session() {
        assert!(should_clear_session(&ApiError::Unauthorized(
            "Invalid or expired refresh token".to_string()
        )));
        assert!(should_clear_session(&ApiError::Unauthorized(
            "No refresh token".to_string()
        )));
    }
}
