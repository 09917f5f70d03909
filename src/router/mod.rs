//! Router configuration.
//!
//! Three route groups: public storefront/auth endpoints, authenticated
//! buyer/seller/admin endpoints behind the auth middleware, and the Swagger
//! UI. Role checks happen inside handlers, not in routing, so every
//! authenticated route sees the same claims extraction path.

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::AppState;
use crate::auth;
use crate::handlers::{admin, coupons, health, orders, products, seller_auth, token_refresh, user_auth};
use crate::middleware::{add_security_headers, auth_logger_middleware, request_logger_middleware};
use crate::openapi::ApiDoc;

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    let public_auth = Router::new()
        .route("/api/user/auth/signup", post(user_auth::signup))
        .route("/api/user/auth/login", post(user_auth::login))
        .route("/api/user/auth/logout", post(user_auth::logout))
        .route("/api/auth/refresh", post(token_refresh::refresh))
        .route("/api/seller/auth/signup", post(seller_auth::seller_signup))
        .route("/api/seller/auth/login", post(seller_auth::seller_login))
        .layer(from_fn(auth_logger_middleware));

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/products", get(products::list_products))
        .route("/api/products/{id}", get(products::get_product))
        .route("/api/coupons/{code}", get(coupons::get_coupon))
        .merge(public_auth)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()));

    let protected_routes = Router::new()
        .route("/api/user/auth/session", get(user_auth::session))
        // Buyer orders
        .route("/api/user/orders", post(orders::checkout))
        .route("/api/user/orders", get(orders::list_orders))
        // Seller catalog and fulfilment
        .route("/api/seller/products", get(products::list_own_products))
        .route("/api/seller/products", post(products::create_product))
        .route("/api/seller/products/{id}", put(products::update_product))
        .route("/api/seller/products/{id}", delete(products::delete_product))
        .route("/api/seller/orders", get(orders::list_seller_order_items))
        .route(
            "/api/seller/orders/items/{id}/status",
            patch(orders::update_item_status),
        )
        // Admin
        .route("/api/admin/sellers", get(admin::list_sellers))
        .route("/api/admin/sellers/create-seller", post(admin::create_seller))
        .route("/api/admin/sellers/auth-check", get(admin::auth_check))
        .route("/api/admin/sellers/validate-token", post(admin::validate_token))
        .route("/api/admin/sellers/{id}/verify", post(admin::verify_seller))
        .route(
            "/api/admin/products/{id}/active",
            patch(admin::set_product_active),
        )
        .layer(from_fn_with_state(
            app_state.clone(),
            auth::middleware::auth_middleware,
        ));

    public_routes
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(add_security_headers))
                .layer(from_fn(request_logger_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(std::time::Duration::from_secs(30)))
                .layer(cors_layer(&app_state)),
        )
        .with_state(app_state)
}

/// CORS restricted to the configured frontend origins. Credentials are
/// allowed because the session rides in cookies.
fn cors_layer(app_state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
