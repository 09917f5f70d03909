//! Pricing scenarios mirrored on real carts: multiple brands, scoped and
//! unscoped coupons, and the zero floor.

use marketplace_api::models::DiscountType;
use marketplace_api::pricing::{CartLine, CouponTerms, compute_totals};
use rust_decimal::Decimal;

fn rupees(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn line(brand: &str, price: i64, qty: u32) -> CartLine {
    CartLine {
        brand_name: brand.to_string(),
        unit_price: rupees(price),
        quantity: qty,
    }
}

#[test]
fn mixed_brand_cart_with_percentage_coupon() {
    let cart = vec![
        line("Aurora", 799, 2),  // 1598
        line("Meridian", 1299, 1), // 1299
        line("Aurora", 450, 3),  // 1350
    ];
    let coupon = CouponTerms {
        discount_type: DiscountType::Percentage,
        discount_value: rupees(20),
        brand_scope: None,
    };

    let totals = compute_totals(&cart, rupees(50), Some(&coupon));

    assert_eq!(totals.subtotal, rupees(4247));
    // 20% of 4247
    assert_eq!(totals.discount, Decimal::new(8494, 1));
    assert_eq!(totals.total, rupees(4247) + rupees(50) - Decimal::new(8494, 1));
}

#[test]
fn brand_scope_matches_case_insensitively() {
    let cart = vec![line("AURORA", 1000, 1), line("Meridian", 500, 1)];
    let coupon = CouponTerms {
        discount_type: DiscountType::Percentage,
        discount_value: rupees(10),
        brand_scope: Some("aurora".to_string()),
    };

    let totals = compute_totals(&cart, rupees(50), Some(&coupon));
    assert_eq!(totals.discount, rupees(100));
    assert_eq!(totals.total, rupees(1450));
}

#[test]
fn flat_coupon_never_exceeds_eligible_spend() {
    let cart = vec![line("Aurora", 150, 1)];
    let coupon = CouponTerms {
        discount_type: DiscountType::Flat,
        discount_value: rupees(500),
        brand_scope: None,
    };

    let totals = compute_totals(&cart, rupees(50), Some(&coupon));
    assert_eq!(totals.discount, rupees(150));
    // Shipping still owed after the discount eats the whole subtotal.
    assert_eq!(totals.total, rupees(50));
}

#[test]
fn totals_without_coupon_are_subtotal_plus_shipping() {
    let cart = vec![line("Aurora", 999, 1), line("Aurora", 1, 1)];
    let totals = compute_totals(&cart, rupees(50), None);

    assert_eq!(totals.subtotal, rupees(1000));
    assert_eq!(totals.discount, Decimal::ZERO);
    assert_eq!(totals.total, rupees(1050));
}

#[test]
fn total_never_goes_negative() {
    let cart = vec![line("Aurora", 10, 1)];
    let coupon = CouponTerms {
        discount_type: DiscountType::Percentage,
        discount_value: rupees(100),
        brand_scope: None,
    };

    // 100% off with zero shipping: exactly zero, never below.
    let totals = compute_totals(&cart, Decimal::ZERO, Some(&coupon));
    assert_eq!(totals.total, Decimal::ZERO);
}
