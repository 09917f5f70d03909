use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace API",
        version = "0.1.0",
        description = "Multi-tenant fashion marketplace backend",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Buyer auth
        crate::handlers::user_auth::signup,
        crate::handlers::user_auth::login,
        crate::handlers::user_auth::logout,
        crate::handlers::user_auth::session,
        crate::handlers::token_refresh::refresh,

        // Seller auth
        crate::handlers::seller_auth::seller_signup,
        crate::handlers::seller_auth::seller_login,

        // Catalog
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::list_own_products,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,

        // Coupons
        crate::handlers::coupons::get_coupon,

        // Orders
        crate::handlers::orders::checkout,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::list_seller_order_items,
        crate::handlers::orders::update_item_status,

        // Admin
        crate::handlers::admin::create_seller,
        crate::handlers::admin::auth_check,
        crate::handlers::admin::validate_token,
        crate::handlers::admin::list_sellers,
        crate::handlers::admin::verify_seller,
        crate::handlers::admin::set_product_active,
    ),
    components(schemas(
        crate::handlers::health::HealthStatus,

        crate::auth::Claims,
        crate::handlers::user_auth::SignupRequest,
        crate::handlers::user_auth::LoginRequest,
        crate::handlers::user_auth::UserProfile,
        crate::handlers::user_auth::AuthResponse,
        crate::handlers::user_auth::MessageResponse,
        crate::handlers::token_refresh::RefreshResponse,

        crate::handlers::seller_auth::SellerSignupRequest,
        crate::handlers::seller_auth::SellerLoginRequest,
        crate::handlers::seller_auth::SellerProfile,
        crate::handlers::seller_auth::SellerAuthResponse,

        crate::handlers::products::CreateProductRequest,
        crate::handlers::products::UpdateProductRequest,
        crate::handlers::products::ProductView,
        crate::handlers::products::ProductResponse,
        crate::handlers::products::ProductListResponse,

        crate::handlers::coupons::CouponView,
        crate::handlers::coupons::CouponResponse,

        crate::models::ItemStatus,
        crate::models::DiscountType,
        crate::pricing::CartTotals,
        crate::handlers::orders::CheckoutItem,
        crate::handlers::orders::CheckoutRequest,
        crate::handlers::orders::OrderItemView,
        crate::handlers::orders::OrderView,
        crate::handlers::orders::OrderResponse,
        crate::handlers::orders::OrderListResponse,
        crate::handlers::orders::SellerOrderItemView,
        crate::handlers::orders::SellerOrderListResponse,
        crate::handlers::orders::UpdateItemStatusRequest,
        crate::handlers::orders::UpdateItemStatusResponse,

        crate::handlers::admin::AuthCheckResponse,
        crate::handlers::admin::ValidateTokenRequest,
        crate::handlers::admin::ValidateTokenResponse,
        crate::handlers::admin::SellerListResponse,
        crate::handlers::admin::SetProductActiveRequest,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Buyer authentication and session management"),
        (name = "seller-auth", description = "Seller registration and login"),
        (name = "products", description = "Public product catalog"),
        (name = "seller-products", description = "Seller catalog management"),
        (name = "coupons", description = "Coupon lookup"),
        (name = "orders", description = "Checkout and buyer order history"),
        (name = "seller-orders", description = "Seller order fulfilment"),
        (name = "admin", description = "Administrative operations")
    ),
    modifiers(&CookieAuth)
)]
pub struct ApiDoc;

struct CookieAuth;

impl utoipa::Modify for CookieAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("accessToken"))),
            );
        }
    }
}
