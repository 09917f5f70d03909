use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog product row. Storefront visibility requires `is_active` and not
/// `is_draft`; both flags are independent of the owning seller's state.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub category: String,
    pub mrp: Decimal,
    pub selling_price: Decimal,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub stock_quantity: i32,
    pub images: Vec<String>,
    pub is_active: bool,
    pub is_draft: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
