//! Seller authentication and onboarding.
//!
//! A seller account is two rows sharing one id: an auth identity in `users`
//! (role `seller`) and a tenant profile in `sellers`. If the profile insert
//! fails after the identity was created, the identity is deleted again on a
//! best-effort basis so the email is not left unusable.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::auth::cookies::set_auth_cookies;
use crate::auth::password::PasswordService;
use crate::error::ApiError;
use crate::models::SellerRow;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SellerSignupRequest {
    #[validate(length(min = 1, message = "Brand name is required"))]
    pub brand_name: String,
    #[validate(email(message = "A valid business email is required"))]
    pub business_email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
    pub gst_number: Option<String>,
    pub business_address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SellerLoginRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SellerProfile {
    pub id: Uuid,
    pub brand_name: String,
    pub business_email: String,
    pub phone_number: String,
    pub gst_number: Option<String>,
    pub business_address: Option<String>,
    pub is_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<SellerRow> for SellerProfile {
    fn from(row: SellerRow) -> Self {
        Self {
            id: row.id,
            brand_name: row.brand_name,
            business_email: row.business_email,
            phone_number: row.phone_number,
            gst_number: row.gst_number,
            business_address: row.business_address,
            is_verified: row.is_verified,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SellerAuthResponse {
    pub success: bool,
    pub message: String,
    pub seller: SellerProfile,
}

/// Map a failed identity insert. The unique constraint firing means no
/// identity row was written, so a duplicate email surfaces as a plain 400.
fn identity_insert_error(e: sqlx::Error) -> ApiError {
    if ApiError::is_unique_violation(&e) {
        ApiError::BadRequest("Email already in use".to_string())
    } else {
        ApiError::Database(e)
    }
}

/// Create the identity + profile pair for a new seller.
///
/// Used by self-service signup (unverified) and by the admin create-seller
/// flow (pre-verified).
pub(crate) async fn create_seller_account(
    db: &PgPool,
    payload: &SellerSignupRequest,
    verified: bool,
) -> Result<SellerRow, ApiError> {
    let password_hash = PasswordService::hash_password(&payload.password)?;
    let email = payload.business_email.to_lowercase();
    let seller_id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, role)
        VALUES ($1, $2, $3, $4, 'seller')
        "#,
    )
    .bind(seller_id)
    .bind(&email)
    .bind(&password_hash)
    .bind(&payload.brand_name)
    .execute(db)
    .await
    .map_err(identity_insert_error)?;

    let profile = sqlx::query_as::<_, SellerRow>(
        r#"
        INSERT INTO sellers
            (id, brand_name, business_email, phone_number, gst_number,
             business_address, is_verified)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(seller_id)
    .bind(&payload.brand_name)
    .bind(&email)
    .bind(&payload.phone_number)
    .bind(&payload.gst_number)
    .bind(&payload.business_address)
    .bind(verified)
    .fetch_one(db)
    .await;

    match profile {
        Ok(profile) => Ok(profile),
        Err(e) => {
            // Roll back the identity so the email can be reused. If this
            // also fails the orphan is logged for manual cleanup.
            if let Err(cleanup) = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(seller_id)
                .execute(db)
                .await
            {
                tracing::error!(
                    seller_id = %seller_id,
                    error = %cleanup,
                    "Failed to remove orphaned seller identity"
                );
            }

            if ApiError::is_unique_violation(&e) {
                Err(ApiError::BadRequest(
                    "Brand name or email already in use".to_string(),
                ))
            } else {
                Err(ApiError::Database(e))
            }
        }
    }
}

/// Register a new seller account (pending verification)
#[utoipa::path(
    post,
    path = "/api/seller/auth/signup",
    tag = "seller-auth",
    request_body = SellerSignupRequest,
    responses(
        (status = 201, description = "Seller registered, pending verification", body = SellerAuthResponse),
        (status = 400, description = "Validation failed or email already in use")
    )
)]
pub async fn seller_signup(
    State(state): State<AppState>,
    Json(payload): Json<SellerSignupRequest>,
) -> Result<(StatusCode, Json<SellerAuthResponse>), ApiError> {
    payload.validate()?;

    let seller = create_seller_account(&state.db, &payload, false).await?;

    tracing::info!(seller_id = %seller.id, brand = %seller.brand_name, "Seller registered");

    Ok((
        StatusCode::CREATED,
        Json(SellerAuthResponse {
            success: true,
            message: "Seller account created and pending verification".to_string(),
            seller: seller.into(),
        }),
    ))
}

/// Authenticate a verified seller
#[utoipa::path(
    post,
    path = "/api/seller/auth/login",
    tag = "seller-auth",
    request_body = SellerLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SellerAuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Seller not yet verified")
    )
)]
pub async fn seller_login(
    State(state): State<AppState>,
    Json(payload): Json<SellerLoginRequest>,
) -> Result<(HeaderMap, Json<SellerAuthResponse>), ApiError> {
    payload.validate()?;

    let email = payload.email.to_lowercase();

    let identity: Option<(Uuid, String, bool)> =
        sqlx::query_as("SELECT id, password_hash, is_active FROM users WHERE email = $1 AND role = 'seller'")
            .bind(&email)
            .fetch_optional(&state.db)
            .await?;

    let (seller_id, password_hash, is_active) = identity
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !PasswordService::verify_password(&payload.password, &password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !is_active {
        return Err(ApiError::Forbidden("Account is disabled".to_string()));
    }

    let seller = sqlx::query_as::<_, SellerRow>("SELECT * FROM sellers WHERE id = $1")
        .bind(seller_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    if !seller.is_verified {
        return Err(ApiError::Forbidden(
            "Seller account is pending verification".to_string(),
        ));
    }

    let pair = state
        .jwt_service
        .mint_pair(seller_id, &email, Some("seller".to_string()))?;
    let cookies = set_auth_cookies(
        &pair.access_token,
        &pair.refresh_token,
        state.config.access_token_ttl,
        state.config.refresh_token_ttl,
        state.config.secure_cookies(),
    );

    tracing::info!(seller_id = %seller_id, "Seller logged in");

    Ok((
        cookies,
        Json(SellerAuthResponse {
            success: true,
            message: "Login successful".to_string(),
            seller: seller.into(),
        }),
    ))
}
