//! Cart pricing.
//!
//! Pure, synchronous total computation. Checkout recomputes every amount
//! from the authoritative catalog and coupon rows rather than trusting
//! client-supplied figures.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::DiscountType;

/// One priced cart line. `brand_name` is the owning seller's brand, used
/// for coupon brand scoping.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub brand_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// Coupon terms relevant to pricing.
#[derive(Debug, Clone)]
pub struct CouponTerms {
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub brand_scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Compute cart totals.
///
/// Subtotal is Σ(unit_price × quantity). The shipping fee is independent of
/// any coupon. A percentage coupon discounts the eligible subtotal; a flat
/// coupon applies its value, capped at the eligible subtotal. Brand scoping
/// restricts eligibility to lines of that brand. The final total is floored
/// at zero.
pub fn compute_totals(
    lines: &[CartLine],
    shipping_fee: Decimal,
    coupon: Option<&CouponTerms>,
) -> CartTotals {
    let subtotal: Decimal = lines
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity))
        .sum();

    let discount = coupon
        .map(|coupon| coupon_discount(lines, subtotal, coupon))
        .unwrap_or(Decimal::ZERO);

    let total = (subtotal + shipping_fee - discount).max(Decimal::ZERO);

    CartTotals {
        subtotal,
        shipping_fee,
        discount,
        total,
    }
}

fn coupon_discount(lines: &[CartLine], subtotal: Decimal, coupon: &CouponTerms) -> Decimal {
    let eligible_subtotal = match &coupon.brand_scope {
        Some(brand) => lines
            .iter()
            .filter(|line| line.brand_name.eq_ignore_ascii_case(brand))
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum(),
        None => subtotal,
    };

    if eligible_subtotal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    match coupon.discount_type {
        DiscountType::Percentage => {
            eligible_subtotal * coupon.discount_value / Decimal::from(100)
        }
        DiscountType::Flat => coupon.discount_value.min(eligible_subtotal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(brand: &str, price: i64, qty: u32) -> CartLine {
        CartLine {
            brand_name: brand.to_string(),
            unit_price: Decimal::new(price, 0),
            quantity: qty,
        }
    }

    #[test]
    fn subtotal_sums_price_times_quantity() {
        let totals = compute_totals(
            &[line("a", 250, 2), line("b", 500, 1)],
            Decimal::ZERO,
            None,
        );
        assert_eq!(totals.subtotal, Decimal::new(1000, 0));
        assert_eq!(totals.total, Decimal::new(1000, 0));
    }

    #[test]
    fn ten_percent_off_thousand_with_fifty_shipping_is_950() {
        let coupon = CouponTerms {
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::new(10, 0),
            brand_scope: None,
        };
        let totals = compute_totals(
            &[line("a", 1000, 1)],
            Decimal::new(50, 0),
            Some(&coupon),
        );

        assert_eq!(totals.subtotal, Decimal::new(1000, 0));
        assert_eq!(totals.discount, Decimal::new(100, 0));
        assert_eq!(totals.total, Decimal::new(950, 0));
    }

    #[test]
    fn flat_coupon_subtracts_fixed_amount() {
        let coupon = CouponTerms {
            discount_type: DiscountType::Flat,
            discount_value: Decimal::new(200, 0),
            brand_scope: None,
        };
        let totals = compute_totals(
            &[line("a", 600, 1)],
            Decimal::new(50, 0),
            Some(&coupon),
        );
        assert_eq!(totals.discount, Decimal::new(200, 0));
        assert_eq!(totals.total, Decimal::new(450, 0));
    }

    #[test]
    fn brand_scoped_coupon_only_discounts_matching_lines() {
        let coupon = CouponTerms {
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::new(50, 0),
            brand_scope: Some("Aurora".to_string()),
        };
        let totals = compute_totals(
            &[line("Aurora", 400, 1), line("Other", 600, 1)],
            Decimal::ZERO,
            Some(&coupon),
        );

        // 50% of the 400 eligible, nothing off the other brand.
        assert_eq!(totals.discount, Decimal::new(200, 0));
        assert_eq!(totals.total, Decimal::new(800, 0));
    }

    #[test]
    fn scoped_coupon_with_no_matching_lines_discounts_nothing() {
        let coupon = CouponTerms {
            discount_type: DiscountType::Flat,
            discount_value: Decimal::new(100, 0),
            brand_scope: Some("Aurora".to_string()),
        };
        let totals = compute_totals(&[line("Other", 500, 1)], Decimal::ZERO, Some(&coupon));
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::new(500, 0));
    }

    #[test]
    fn total_is_floored_at_zero() {
        let coupon = CouponTerms {
            discount_type: DiscountType::Flat,
            discount_value: Decimal::new(10_000, 0),
            brand_scope: None,
        };
        let totals = compute_totals(&[line("a", 100, 1)], Decimal::ZERO, Some(&coupon));
        // Flat discount capped at the eligible subtotal.
        assert_eq!(totals.discount, Decimal::new(100, 0));
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn shipping_fee_is_unaffected_by_coupon() {
        let coupon = CouponTerms {
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::new(100, 0),
            brand_scope: None,
        };
        let totals = compute_totals(
            &[line("a", 300, 1)],
            Decimal::new(50, 0),
            Some(&coupon),
        );
        assert_eq!(totals.shipping_fee, Decimal::new(50, 0));
        assert_eq!(totals.total, Decimal::new(50, 0));
    }

    #[test]
    fn empty_cart_totals_shipping_only() {
        let totals = compute_totals(&[], Decimal::new(50, 0), None);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::new(50, 0));
    }
}
