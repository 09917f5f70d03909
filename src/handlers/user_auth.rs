//! Buyer authentication: signup, login, logout and session introspection.
//!
//! Successful signup/login mint an access/refresh pair and install both as
//! httpOnly cookies. Bodies never carry tokens.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::auth::cookies::{clear_auth_cookies, set_auth_cookies};
use crate::auth::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::UserRow;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public view of an identity row. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub phone: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: row.role,
            address: row.address,
            city: row.city,
            state: row.state,
            pincode: row.pincode,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Register a new buyer account
#[utoipa::path(
    post,
    path = "/api/user/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failed or email already in use")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), ApiError> {
    payload.validate()?;

    let password_hash = crate::auth::password::PasswordService::hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, role)
        VALUES ($1, $2, $3, $4, 'user')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.email.to_lowercase())
    .bind(&password_hash)
    .bind(&payload.full_name)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if ApiError::is_unique_violation(&e) {
            ApiError::BadRequest("Email already in use".to_string())
        } else {
            ApiError::Database(e)
        }
    })?;

    let pair = state
        .jwt_service
        .mint_pair(user.id, &user.email, Some(user.role.clone()))?;
    let cookies = set_auth_cookies(
        &pair.access_token,
        &pair.refresh_token,
        state.config.access_token_ttl,
        state.config.refresh_token_ttl,
        state.config.secure_cookies(),
    );

    tracing::info!(user_id = %user.id, "New buyer account created");

    Ok((
        StatusCode::CREATED,
        cookies,
        Json(AuthResponse {
            success: true,
            message: "Account created".to_string(),
            user: user.into(),
        }),
    ))
}

/// Authenticate a buyer and install session cookies
#[utoipa::path(
    post,
    path = "/api/user/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    payload.validate()?;

    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(payload.email.to_lowercase())
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = crate::auth::password::PasswordService::verify_password(
        &payload.password,
        &user.password_hash,
    )?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is disabled".to_string()));
    }

    // Sellers authenticate through the seller login, which also checks the
    // verification gate.
    if user.role == "seller" {
        return Err(ApiError::Forbidden(
            "Please use the seller login".to_string(),
        ));
    }

    let pair = state
        .jwt_service
        .mint_pair(user.id, &user.email, Some(user.role.clone()))?;
    let cookies = set_auth_cookies(
        &pair.access_token,
        &pair.refresh_token,
        state.config.access_token_ttl,
        state.config.refresh_token_ttl,
        state.config.secure_cookies(),
    );

    tracing::info!(user_id = %user.id, "Buyer logged in");

    Ok((
        cookies,
        Json(AuthResponse {
            success: true,
            message: "Login successful".to_string(),
            user: user.into(),
        }),
    ))
}

/// Clear both auth cookies
#[utoipa::path(
    post,
    path = "/api/user/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
pub async fn logout(State(state): State<AppState>) -> (HeaderMap, Json<MessageResponse>) {
    let cookies = clear_auth_cookies(state.config.secure_cookies());

    (
        cookies,
        Json(MessageResponse {
            success: true,
            message: "Logged out".to_string(),
        }),
    )
}

/// Return the profile behind the current session
#[utoipa::path(
    get,
    path = "/api/user/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Current session user", body = AuthResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("cookie_auth" = []))
)]
pub async fn session(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(claims.sub)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Session user no longer exists".to_string()))?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Session active".to_string(),
        user: user.into(),
    }))
}
