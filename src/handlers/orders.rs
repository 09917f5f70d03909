//! Orders: checkout, buyer history, and seller fulfilment.
//!
//! Checkout recomputes every amount server-side from catalog and coupon
//! rows; client-supplied prices are never trusted. Stock is decremented
//! inside the same transaction that writes the order, with the decrement
//! guarded so concurrent checkouts cannot oversell.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::roles::require_seller;
use crate::error::ApiError;
use crate::models::{
    CouponRow, DiscountType, ItemStatus, OrderItemRow, OrderRow, validate_transition,
};
use crate::pricing::{CartLine, CartTotals, CouponTerms, compute_totals};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    #[validate(length(min = 1, message = "Size is required"))]
    pub size: String,
    #[validate(length(min = 1, message = "Color is required"))]
    pub color: String,
    // Upper bound keeps the value inside the stock column's i32 range.
    #[validate(range(min = 1, max = 2_147_483_647, message = "Quantity is out of range"))]
    pub quantity: u32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<CheckoutItem>,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "Shipping address is required"))]
    pub shipping_address: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "Pincode is required"))]
    pub pincode: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub payment_method: String,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub quantity: i32,
    pub price_at_time: Decimal,
    pub item_status: String,
    pub tracking_number: Option<String>,
}

impl From<OrderItemRow> for OrderItemView {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            size: row.size,
            color: row.color,
            quantity: row.quantity,
            price_at_time: row.price_at_time,
            item_status: row.item_status,
            tracking_number: row.tracking_number,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderView {
    pub id: Uuid,
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
    pub items: Vec<OrderItemView>,
}

impl OrderView {
    fn from_parts(order: OrderRow, items: Vec<OrderItemRow>) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer_name,
            shipping_address: order.shipping_address,
            city: order.city,
            state: order.state,
            pincode: order.pincode,
            phone: order.phone,
            subtotal: order.subtotal,
            shipping_fee: order.shipping_fee,
            discount: order.discount,
            total_amount: order.total_amount,
            payment_method: order.payment_method,
            payment_status: order.payment_status,
            coupon_code: order.coupon_code,
            created_at: order.created_at,
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub success: bool,
    pub order: OrderView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderListResponse {
    pub success: bool,
    pub orders: Vec<OrderView>,
}

/// An order item joined with the shipping context a seller needs to
/// fulfil it.
#[derive(Debug, FromRow)]
struct SellerOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub quantity: i32,
    pub price_at_time: Decimal,
    pub item_status: String,
    pub tracking_number: Option<String>,
    pub customer_name: String,
    pub shipping_address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
    pub order_created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SellerOrderItemView {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub quantity: i32,
    pub price_at_time: Decimal,
    pub item_status: String,
    pub tracking_number: Option<String>,
    pub customer_name: String,
    pub shipping_address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
    pub order_created_at: DateTime<Utc>,
    /// Transitions the seller may take next: the single forward step plus
    /// cancellation, or nothing once the item is terminal.
    pub available_actions: Vec<ItemStatus>,
}

impl From<SellerOrderItemRow> for SellerOrderItemView {
    fn from(row: SellerOrderItemRow) -> Self {
        let available_actions = ItemStatus::parse(&row.item_status)
            .map(|status| status.offered_transitions())
            .unwrap_or_default();

        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            size: row.size,
            color: row.color,
            quantity: row.quantity,
            price_at_time: row.price_at_time,
            item_status: row.item_status,
            tracking_number: row.tracking_number,
            customer_name: row.customer_name,
            shipping_address: row.shipping_address,
            city: row.city,
            state: row.state,
            pincode: row.pincode,
            phone: row.phone,
            order_created_at: row.order_created_at,
            available_actions,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SellerOrderListResponse {
    pub success: bool,
    pub items: Vec<SellerOrderItemView>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemStatusRequest {
    pub status: String,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateItemStatusResponse {
    pub success: bool,
    pub item: OrderItemView,
    pub available_actions: Vec<ItemStatus>,
}

/// A checkout line resolved against the catalog.
#[derive(Debug, FromRow)]
struct PricedProduct {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub selling_price: Decimal,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub brand_name: String,
}

/// Place an order
#[utoipa::path(
    post,
    path = "/api/user/orders",
    tag = "orders",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Validation failed, invalid coupon, or insufficient stock"),
        (status = 401, description = "Not authenticated")
    ),
    security(("cookie_auth" = []))
)]
pub async fn checkout(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    payload.validate()?;

    let coupon = match &payload.coupon_code {
        Some(code) => Some(load_coupon(&state, code).await?),
        None => None,
    };

    let mut tx = state.db.begin().await?;

    let mut lines = Vec::with_capacity(payload.items.len());
    let mut priced = Vec::with_capacity(payload.items.len());

    for item in &payload.items {
        let product = sqlx::query_as::<_, PricedProduct>(
            r#"
            SELECT p.id, p.seller_id, p.name, p.selling_price, p.sizes, p.colors,
                   s.brand_name
            FROM products p
            JOIN sellers s ON s.id = p.seller_id
            WHERE p.id = $1 AND p.is_active AND NOT p.is_draft
            "#,
        )
        .bind(item.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest(format!("Product {} is not available", item.product_id))
        })?;

        if !product.sizes.is_empty() && !product.sizes.contains(&item.size) {
            return Err(ApiError::BadRequest(format!(
                "Size {} is not offered for {}",
                item.size, product.name
            )));
        }
        if !product.colors.is_empty() && !product.colors.contains(&item.color) {
            return Err(ApiError::BadRequest(format!(
                "Color {} is not offered for {}",
                item.color, product.name
            )));
        }

        // Guarded decrement: zero rows affected means the stock is gone and
        // the whole transaction rolls back.
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity - $2, updated_at = NOW()
            WHERE id = $1 AND stock_quantity >= $2
            "#,
        )
        .bind(product.id)
        .bind(item.quantity as i32)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::BadRequest(format!(
                "Insufficient stock for {}",
                product.name
            )));
        }

        lines.push(CartLine {
            brand_name: product.brand_name.clone(),
            unit_price: product.selling_price,
            quantity: item.quantity,
        });
        priced.push(product);
    }

    let totals: CartTotals = compute_totals(&lines, state.config.shipping_fee, coupon.as_ref());

    let order = sqlx::query_as::<_, OrderRow>(
        r#"
        INSERT INTO orders
            (id, user_id, customer_name, shipping_address, city, state, pincode,
             phone, subtotal, shipping_fee, discount, total_amount,
             payment_method, payment_status, coupon_code)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 'pending', $14)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(claims.sub)
    .bind(&payload.customer_name)
    .bind(&payload.shipping_address)
    .bind(&payload.city)
    .bind(&payload.state)
    .bind(&payload.pincode)
    .bind(&payload.phone)
    .bind(totals.subtotal)
    .bind(totals.shipping_fee)
    .bind(totals.discount)
    .bind(totals.total)
    .bind(&payload.payment_method)
    .bind(payload.coupon_code.as_ref().map(|c| c.to_uppercase()))
    .fetch_one(&mut *tx)
    .await?;

    let mut items = Vec::with_capacity(payload.items.len());
    for (item, product) in payload.items.iter().zip(&priced) {
        let row = sqlx::query_as::<_, OrderItemRow>(
            r#"
            INSERT INTO order_items
                (id, order_id, product_id, seller_id, product_name, size, color,
                 quantity, price_at_time, item_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.id)
        .bind(product.id)
        .bind(product.seller_id)
        .bind(&product.name)
        .bind(&item.size)
        .bind(&item.color)
        .bind(item.quantity as i32)
        .bind(product.selling_price)
        .fetch_one(&mut *tx)
        .await?;

        items.push(row);
    }

    tx.commit().await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %claims.sub,
        total = %order.total_amount,
        "Order placed"
    );

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            success: true,
            order: OrderView::from_parts(order, items),
        }),
    ))
}

async fn load_coupon(state: &AppState, code: &str) -> Result<CouponTerms, ApiError> {
    let row = sqlx::query_as::<_, CouponRow>(
        "SELECT * FROM coupons WHERE code = $1 AND is_active",
    )
    .bind(code.to_uppercase())
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::BadRequest("Invalid coupon code".to_string()))?;

    let discount_type = DiscountType::parse(&row.discount_type).ok_or_else(|| {
        ApiError::Internal(format!(
            "Coupon {} has unknown discount type {}",
            row.code, row.discount_type
        ))
    })?;

    Ok(CouponTerms {
        discount_type,
        discount_value: row.discount_value,
        brand_scope: row.brand_scope,
    })
}

/// List the caller's orders, newest first
#[utoipa::path(
    get,
    path = "/api/user/orders",
    tag = "orders",
    responses(
        (status = 200, description = "Order history", body = OrderListResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("cookie_auth" = []))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Result<Json<OrderListResponse>, ApiError> {
    let orders = sqlx::query_as::<_, OrderRow>(
        "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(claims.sub)
    .fetch_all(&state.db)
    .await?;

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut items = sqlx::query_as::<_, OrderItemRow>(
        "SELECT * FROM order_items WHERE order_id = ANY($1)",
    )
    .bind(&order_ids)
    .fetch_all(&state.db)
    .await?;

    let views = orders
        .into_iter()
        .map(|order| {
            let (own, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut items)
                .into_iter()
                .partition(|item| item.order_id == order.id);
            items = rest;
            OrderView::from_parts(order, own)
        })
        .collect();

    Ok(Json(OrderListResponse {
        success: true,
        orders: views,
    }))
}

/// List order items belonging to the calling seller
#[utoipa::path(
    get,
    path = "/api/seller/orders",
    tag = "seller-orders",
    responses(
        (status = 200, description = "Items awaiting fulfilment", body = SellerOrderListResponse),
        (status = 403, description = "Caller is not a seller")
    ),
    security(("cookie_auth" = []))
)]
pub async fn list_seller_order_items(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Result<Json<SellerOrderListResponse>, ApiError> {
    require_seller(&claims, &state.db).await?;

    let rows = sqlx::query_as::<_, SellerOrderItemRow>(
        r#"
        SELECT oi.id, oi.order_id, oi.product_id, oi.product_name, oi.size,
               oi.color, oi.quantity, oi.price_at_time, oi.item_status,
               oi.tracking_number,
               o.customer_name, o.shipping_address, o.city, o.state, o.pincode,
               o.phone, o.created_at AS order_created_at
        FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        WHERE oi.seller_id = $1
        ORDER BY o.created_at DESC
        "#,
    )
    .bind(claims.sub)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(SellerOrderListResponse {
        success: true,
        items: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Advance an order item through its fulfilment lifecycle
#[utoipa::path(
    patch,
    path = "/api/seller/orders/items/{id}/status",
    tag = "seller-orders",
    params(("id" = Uuid, Path, description = "Order item id")),
    request_body = UpdateItemStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UpdateItemStatusResponse),
        (status = 400, description = "Illegal transition or missing tracking number"),
        (status = 403, description = "Caller is not a seller"),
        (status = 404, description = "Item not found under this seller")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_item_status(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemStatusRequest>,
) -> Result<Json<UpdateItemStatusResponse>, ApiError> {
    require_seller(&claims, &state.db).await?;

    let item = sqlx::query_as::<_, OrderItemRow>(
        "SELECT * FROM order_items WHERE id = $1 AND seller_id = $2",
    )
    .bind(id)
    .bind(claims.sub)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Order item not found".to_string()))?;

    let current = ItemStatus::parse(&item.item_status).ok_or_else(|| {
        ApiError::Internal(format!(
            "Order item {} has unknown status {}",
            item.id, item.item_status
        ))
    })?;
    let target = ItemStatus::parse(&payload.status)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown status {}", payload.status)))?;

    validate_transition(current, target, payload.tracking_number.as_deref())?;

    let tracking = if target == ItemStatus::Shipped {
        payload
            .tracking_number
            .as_deref()
            .map(str::trim)
            .map(str::to_string)
    } else {
        item.tracking_number.clone()
    };

    let updated = sqlx::query_as::<_, OrderItemRow>(
        r#"
        UPDATE order_items
        SET item_status = $3, tracking_number = $4, updated_at = NOW()
        WHERE id = $1 AND seller_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(claims.sub)
    .bind(target.as_str())
    .bind(&tracking)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(
        item_id = %id,
        seller_id = %claims.sub,
        from = current.as_str(),
        to = target.as_str(),
        "Order item status updated"
    );

    Ok(Json(UpdateItemStatusResponse {
        success: true,
        item: updated.into(),
        available_actions: target.offered_transitions(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32) -> CheckoutItem {
        CheckoutItem {
            product_id: Uuid::new_v4(),
            size: "M".to_string(),
            color: "Black".to_string(),
            quantity,
        }
    }

    fn request(items: Vec<CheckoutItem>) -> CheckoutRequest {
        CheckoutRequest {
            items,
            customer_name: "Asha Rao".to_string(),
            shipping_address: "12 Harbour Lane".to_string(),
            city: "Mumbai".to_string(),
            state: "MH".to_string(),
            pincode: "400001".to_string(),
            phone: "9800000000".to_string(),
            payment_method: "cod".to_string(),
            coupon_code: None,
        }
    }

    #[test]
    fn quantity_must_fit_the_stock_column() {
        // u32::MAX would wrap negative when bound as i32 and turn the
        // guarded stock decrement into an increment.
        assert!(request(vec![item(u32::MAX)]).validate().is_err());
        assert!(request(vec![item(i32::MAX as u32 + 1)]).validate().is_err());
        assert!(request(vec![item(i32::MAX as u32)]).validate().is_ok());
        assert!(request(vec![item(2)]).validate().is_ok());
    }

    #[test]
    fn zero_quantity_and_empty_carts_are_rejected() {
        assert!(request(vec![item(0)]).validate().is_err());
        assert!(request(vec![]).validate().is_err());
    }
}
