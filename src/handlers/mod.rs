pub mod admin;
pub mod coupons;
pub mod health;
pub mod orders;
pub mod products;
pub mod seller_auth;
pub mod token_refresh;
pub mod user_auth;
