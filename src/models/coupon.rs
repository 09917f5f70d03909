use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Flat,
}

impl DiscountType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "percentage" => Some(DiscountType::Percentage),
            "flat" => Some(DiscountType::Flat),
            _ => None,
        }
    }
}

/// Discount code row. `brand_scope` restricts the coupon to items of a
/// single seller brand when present.
#[derive(Debug, Clone, FromRow)]
pub struct CouponRow {
    pub code: String,
    pub discount_type: String,
    pub discount_value: Decimal,
    pub brand_scope: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
