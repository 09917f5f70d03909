//! Admin surface: seller provisioning, verification, token inspection and
//! catalog moderation. Every handler resolves the caller's role through the
//! full cascade before touching anything.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::roles::{require_admin, resolve_role};
use crate::error::ApiError;
use crate::models::SellerRow;

use super::seller_auth::{
    SellerAuthResponse, SellerProfile, SellerSignupRequest, create_seller_account,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthCheckResponse {
    pub success: bool,
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateTokenRequest {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateTokenResponse {
    pub success: bool,
    pub valid: bool,
    pub user_id: Uuid,
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SellerListResponse {
    pub success: bool,
    pub sellers: Vec<SellerProfile>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetProductActiveRequest {
    pub is_active: bool,
}

/// Provision a pre-verified seller account
#[utoipa::path(
    post,
    path = "/api/admin/sellers/create-seller",
    tag = "admin",
    request_body = SellerSignupRequest,
    responses(
        (status = 201, description = "Seller created and verified", body = SellerAuthResponse),
        (status = 400, description = "Validation failed or email already in use"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("cookie_auth" = []))
)]
pub async fn create_seller(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<SellerSignupRequest>,
) -> Result<(StatusCode, Json<SellerAuthResponse>), ApiError> {
    require_admin(&claims, &state.db).await?;
    payload.validate()?;

    let seller = create_seller_account(&state.db, &payload, true).await?;

    tracing::info!(
        seller_id = %seller.id,
        admin_id = %claims.sub,
        "Seller provisioned by admin"
    );

    Ok((
        StatusCode::CREATED,
        Json(SellerAuthResponse {
            success: true,
            message: "Seller account created".to_string(),
            seller: seller.into(),
        }),
    ))
}

/// Confirm the caller holds the admin role
#[utoipa::path(
    get,
    path = "/api/admin/sellers/auth-check",
    tag = "admin",
    responses(
        (status = 200, description = "Caller is an admin", body = AuthCheckResponse),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("cookie_auth" = []))
)]
pub async fn auth_check(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Result<Json<AuthCheckResponse>, ApiError> {
    require_admin(&claims, &state.db).await?;

    Ok(Json(AuthCheckResponse {
        success: true,
        role: "admin".to_string(),
    }))
}

/// Inspect an arbitrary access token
#[utoipa::path(
    post,
    path = "/api/admin/sellers/validate-token",
    tag = "admin",
    request_body = ValidateTokenRequest,
    responses(
        (status = 200, description = "Token is valid", body = ValidateTokenResponse),
        (status = 401, description = "Token is invalid or expired"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("cookie_auth" = []))
)]
pub async fn validate_token(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<ValidateTokenRequest>,
) -> Result<Json<ValidateTokenResponse>, ApiError> {
    require_admin(&claims, &state.db).await?;

    let inspected = state.jwt_service.decode_access(&payload.token)?;
    let role = resolve_role(&inspected, &state.db).await?;

    Ok(Json(ValidateTokenResponse {
        success: true,
        valid: true,
        user_id: inspected.sub,
        email: inspected.email,
        role: role.map(|r| r.as_str().to_string()),
    }))
}

/// List every seller, verified or not
#[utoipa::path(
    get,
    path = "/api/admin/sellers",
    tag = "admin",
    responses(
        (status = 200, description = "All sellers", body = SellerListResponse),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("cookie_auth" = []))
)]
pub async fn list_sellers(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Result<Json<SellerListResponse>, ApiError> {
    require_admin(&claims, &state.db).await?;

    let sellers = sqlx::query_as::<_, SellerRow>("SELECT * FROM sellers ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(SellerListResponse {
        success: true,
        sellers: sellers.into_iter().map(Into::into).collect(),
    }))
}

/// Mark a seller as verified, unlocking seller login
#[utoipa::path(
    post,
    path = "/api/admin/sellers/{id}/verify",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Seller id")),
    responses(
        (status = 200, description = "Seller verified", body = SellerAuthResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Seller not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn verify_seller(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SellerAuthResponse>, ApiError> {
    require_admin(&claims, &state.db).await?;

    let seller = sqlx::query_as::<_, SellerRow>(
        "UPDATE sellers SET is_verified = TRUE WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Seller not found".to_string()))?;

    tracing::info!(seller_id = %id, admin_id = %claims.sub, "Seller verified");

    Ok(Json(SellerAuthResponse {
        success: true,
        message: "Seller verified".to_string(),
        seller: seller.into(),
    }))
}

/// Toggle a product's storefront visibility
#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}/active",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = SetProductActiveRequest,
    responses(
        (status = 200, description = "Visibility updated"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Product not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn set_product_active(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetProductActiveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&claims, &state.db).await?;

    let result = sqlx::query(
        "UPDATE products SET is_active = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(payload.is_active)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    tracing::info!(
        product_id = %id,
        admin_id = %claims.sub,
        is_active = payload.is_active,
        "Product visibility updated"
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Product visibility updated"
    })))
}
