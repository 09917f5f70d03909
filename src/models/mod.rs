pub mod coupon;
pub mod order;
pub mod product;
pub mod seller;
pub mod user;

pub use coupon::{CouponRow, DiscountType};
pub use order::{ItemStatus, OrderItemRow, OrderRow, validate_transition};
pub use product::ProductRow;
pub use seller::SellerRow;
pub use user::UserRow;
