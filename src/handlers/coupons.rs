//! Coupon lookup for cart preview.

use axum::{
    extract::{Path, State},
    response::Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;
use crate::error::ApiError;
use crate::models::CouponRow;

#[derive(Debug, Serialize, ToSchema)]
pub struct CouponView {
    pub code: String,
    pub discount_type: String,
    pub discount_value: Decimal,
    pub brand_scope: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CouponResponse {
    pub success: bool,
    pub coupon: CouponView,
}

/// Look up an active coupon by code
#[utoipa::path(
    get,
    path = "/api/coupons/{code}",
    tag = "coupons",
    params(("code" = String, Path, description = "Coupon code, case-insensitive")),
    responses(
        (status = 200, description = "Coupon terms", body = CouponResponse),
        (status = 404, description = "Coupon missing or inactive")
    )
)]
pub async fn get_coupon(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CouponResponse>, ApiError> {
    let coupon = sqlx::query_as::<_, CouponRow>(
        "SELECT * FROM coupons WHERE code = $1 AND is_active",
    )
    .bind(code.to_uppercase())
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Coupon not found".to_string()))?;

    Ok(Json(CouponResponse {
        success: true,
        coupon: CouponView {
            code: coupon.code,
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            brand_scope: coupon.brand_scope,
        },
    }))
}
