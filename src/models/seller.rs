use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Seller tenant row. Shares its id with the auth identity row.
/// `brand_name` is immutable post-creation; `is_verified` gates login.
#[derive(Debug, Clone, FromRow)]
pub struct SellerRow {
    pub id: Uuid,
    pub brand_name: String,
    pub business_email: String,
    pub phone_number: String,
    pub gst_number: Option<String>,
    pub business_address: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}
