//! Product catalog: public storefront reads and seller-side CRUD.
//!
//! Storefront visibility requires `is_active AND NOT is_draft`. Seller
//! endpoints always operate on the caller's own rows; ownership is enforced
//! in the WHERE clause, not after the fetch.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::roles::require_seller;
use crate::error::ApiError;
use crate::models::ProductRow;

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub mrp: Decimal,
    pub selling_price: Decimal,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock_quantity: i32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_draft: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub mrp: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub stock_quantity: Option<i32>,
    pub images: Option<Vec<String>>,
    pub is_draft: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductView {
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
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProductRow> for ProductView {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            seller_id: row.seller_id,
            name: row.name,
            category: row.category,
            mrp: row.mrp,
            selling_price: row.selling_price,
            sizes: row.sizes,
            colors: row.colors,
            stock_quantity: row.stock_quantity,
            images: row.images,
            is_active: row.is_active,
            is_draft: row.is_draft,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<ProductView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub success: bool,
    pub product: ProductView,
}

fn validate_pricing(mrp: Decimal, selling_price: Decimal) -> Result<(), ApiError> {
    if mrp <= Decimal::ZERO || selling_price <= Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "Prices must be greater than zero".to_string(),
        ));
    }
    if selling_price > mrp {
        return Err(ApiError::BadRequest(
            "Selling price cannot exceed MRP".to_string(),
        ));
    }
    Ok(())
}

/// Browse the public catalog
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    params(
        ("category" = Option<String>, Query, description = "Filter by category")
    ),
    responses(
        (status = 200, description = "Visible products", body = ProductListResponse)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let products = match &query.category {
        Some(category) => {
            sqlx::query_as::<_, ProductRow>(
                r#"
                SELECT * FROM products
                WHERE is_active AND NOT is_draft AND category = $1
                ORDER BY created_at DESC
                "#,
            )
            .bind(category)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as::<_, ProductRow>(
                r#"
                SELECT * FROM products
                WHERE is_active AND NOT is_draft
                ORDER BY created_at DESC
                "#,
            )
            .fetch_all(&state.db)
            .await?
        }
    };

    Ok(Json(ProductListResponse {
        success: true,
        products: products.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch a single visible product
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product detail", body = ProductResponse),
        (status = 404, description = "Product not found or not visible")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = sqlx::query_as::<_, ProductRow>(
        "SELECT * FROM products WHERE id = $1 AND is_active AND NOT is_draft",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductResponse {
        success: true,
        product: product.into(),
    }))
}

/// List the caller's own products, drafts included
#[utoipa::path(
    get,
    path = "/api/seller/products",
    tag = "seller-products",
    responses(
        (status = 200, description = "Seller's products", body = ProductListResponse),
        (status = 403, description = "Caller is not a seller")
    ),
    security(("cookie_auth" = []))
)]
pub async fn list_own_products(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Result<Json<ProductListResponse>, ApiError> {
    require_seller(&claims, &state.db).await?;

    let products = sqlx::query_as::<_, ProductRow>(
        "SELECT * FROM products WHERE seller_id = $1 ORDER BY created_at DESC",
    )
    .bind(claims.sub)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ProductListResponse {
        success: true,
        products: products.into_iter().map(Into::into).collect(),
    }))
}

/// Create a product under the caller's brand
#[utoipa::path(
    post,
    path = "/api/seller/products",
    tag = "seller-products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Caller is not a seller")
    ),
    security(("cookie_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    require_seller(&claims, &state.db).await?;
    payload.validate()?;
    validate_pricing(payload.mrp, payload.selling_price)?;

    let product = sqlx::query_as::<_, ProductRow>(
        r#"
        INSERT INTO products
            (id, seller_id, name, category, mrp, selling_price, sizes, colors,
             stock_quantity, images, is_draft)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(claims.sub)
    .bind(&payload.name)
    .bind(&payload.category)
    .bind(payload.mrp)
    .bind(payload.selling_price)
    .bind(&payload.sizes)
    .bind(&payload.colors)
    .bind(payload.stock_quantity)
    .bind(&payload.images)
    .bind(payload.is_draft)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(product_id = %product.id, seller_id = %claims.sub, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            product: product.into(),
        }),
    ))
}

/// Update one of the caller's products
#[utoipa::path(
    put,
    path = "/api/seller/products/{id}",
    tag = "seller-products",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Caller is not a seller"),
        (status = 404, description = "Product not found under this seller")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    require_seller(&claims, &state.db).await?;

    let current = sqlx::query_as::<_, ProductRow>(
        "SELECT * FROM products WHERE id = $1 AND seller_id = $2",
    )
    .bind(id)
    .bind(claims.sub)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    let mrp = payload.mrp.unwrap_or(current.mrp);
    let selling_price = payload.selling_price.unwrap_or(current.selling_price);
    validate_pricing(mrp, selling_price)?;

    let stock_quantity = payload.stock_quantity.unwrap_or(current.stock_quantity);
    if stock_quantity < 0 {
        return Err(ApiError::BadRequest("Stock cannot be negative".to_string()));
    }

    let product = sqlx::query_as::<_, ProductRow>(
        r#"
        UPDATE products SET
            name = $3,
            category = $4,
            mrp = $5,
            selling_price = $6,
            sizes = $7,
            colors = $8,
            stock_quantity = $9,
            images = $10,
            is_draft = $11,
            updated_at = NOW()
        WHERE id = $1 AND seller_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(claims.sub)
    .bind(payload.name.as_deref().unwrap_or(&current.name))
    .bind(payload.category.as_deref().unwrap_or(&current.category))
    .bind(mrp)
    .bind(selling_price)
    .bind(payload.sizes.as_ref().unwrap_or(&current.sizes))
    .bind(payload.colors.as_ref().unwrap_or(&current.colors))
    .bind(stock_quantity)
    .bind(payload.images.as_ref().unwrap_or(&current.images))
    .bind(payload.is_draft.unwrap_or(current.is_draft))
    .fetch_one(&state.db)
    .await?;

    Ok(Json(ProductResponse {
        success: true,
        product: product.into(),
    }))
}

/// Delete one of the caller's products
#[utoipa::path(
    delete,
    path = "/api/seller/products/{id}",
    tag = "seller-products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 403, description = "Caller is not a seller"),
        (status = 404, description = "Product not found under this seller")
    ),
    security(("cookie_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_seller(&claims, &state.db).await?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1 AND seller_id = $2")
        .bind(id)
        .bind(claims.sub)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    tracing::info!(product_id = %id, seller_id = %claims.sub, "Product deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Product deleted"
    })))
}
