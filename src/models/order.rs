//! Orders and the per-item fulfilment lifecycle.
//!
//! Each order item moves through a strictly linear forward path
//! pending → processing → shipped → delivered, one step at a time.
//! `cancelled` is reachable from any non-terminal state; `delivered` and
//! `cancelled` are terminal. Shipping additionally requires a tracking
//! number supplied with the transition itself.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl ItemStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ItemStatus::Pending),
            "processing" => Some(ItemStatus::Processing),
            "shipped" => Some(ItemStatus::Shipped),
            "delivered" => Some(ItemStatus::Delivered),
            "cancelled" => Some(ItemStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Processing => "processing",
            ItemStatus::Shipped => "shipped",
            ItemStatus::Delivered => "delivered",
            ItemStatus::Cancelled => "cancelled",
        }
    }

    /// The single next state on the linear forward path, if any.
    pub fn next_forward(&self) -> Option<ItemStatus> {
        match self {
            ItemStatus::Pending => Some(ItemStatus::Processing),
            ItemStatus::Processing => Some(ItemStatus::Shipped),
            ItemStatus::Shipped => Some(ItemStatus::Delivered),
            ItemStatus::Delivered | ItemStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Delivered | ItemStatus::Cancelled)
    }

    /// Transitions a seller may take from this state: exactly the next
    /// linear state plus cancellation, or nothing at a terminal state.
    pub fn offered_transitions(&self) -> Vec<ItemStatus> {
        match self.next_forward() {
            Some(next) => vec![next, ItemStatus::Cancelled],
            None => vec![],
        }
    }

    /// Whether `target` is a legal single-step transition. No skipping, no
    /// backward moves, no leaving a terminal state.
    pub fn can_transition_to(&self, target: ItemStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.next_forward() == Some(target) || target == ItemStatus::Cancelled
    }
}

/// Validate a requested transition before anything is persisted.
///
/// A move into `shipped` without a non-empty tracking number is held back:
/// the caller must collect one and resubmit.
pub fn validate_transition(
    current: ItemStatus,
    target: ItemStatus,
    tracking_number: Option<&str>,
) -> Result<(), ApiError> {
    if !current.can_transition_to(target) {
        return Err(ApiError::BadRequest(format!(
            "Cannot move item from {} to {}",
            current.as_str(),
            target.as_str()
        )));
    }

    if target == ItemStatus::Shipped
        && tracking_number.map(str::trim).unwrap_or("").is_empty()
    {
        return Err(ApiError::BadRequest(
            "Tracking number is required to mark an item as shipped".to_string(),
        ));
    }

    Ok(())
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub customer_name: String,
    pub shipping_address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub discount: Decimal,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub payment_status: String,
    pub coupon_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One line of an order, individually tracked through fulfilment.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub quantity: i32,
    pub price_at_time: Decimal,
    pub item_status: String,
    pub tracking_number: Option<String>,
    pub updated_at: DateTime<Utc>,
}
