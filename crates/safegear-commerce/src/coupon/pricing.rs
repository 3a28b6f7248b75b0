//! Order pricing with an applied coupon.

use crate::coupon::Coupon;
use crate::error::CommerceError;
use crate::ids::{CategoryId, CouponId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A line of an order as seen by the discount computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Categories the product belongs to.
    pub category_ids: Vec<CategoryId>,
    /// Line total (unit price times quantity).
    pub amount: Money,
}

impl OrderLine {
    /// Create a line with no category information.
    pub fn new(product_id: ProductId, amount: Money) -> Self {
        Self {
            product_id,
            category_ids: Vec::new(),
            amount,
        }
    }

    /// Attach the product's categories.
    pub fn with_categories(mut self, category_ids: Vec<CategoryId>) -> Self {
        self.category_ids = category_ids;
        self
    }
}

/// A coupon that has been applied to an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedCoupon {
    /// The coupon ID.
    pub coupon_id: CouponId,
    /// The coupon code used.
    pub code: String,
    /// Amount discounted.
    pub amount: Money,
}

impl AppliedCoupon {
    /// Create from a coupon and its computed discount.
    pub fn from_coupon(coupon: &Coupon, amount: Money) -> Self {
        Self {
            coupon_id: coupon.id.clone(),
            code: coupon.code.clone(),
            amount,
        }
    }
}

/// Pricing breakdown for an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderPricing {
    /// Subtotal before discounts.
    pub subtotal: Money,
    /// Total discount amount.
    pub discount_total: Money,
    /// Final total (subtotal - discounts, floored at zero).
    pub grand_total: Money,
    /// The coupon that produced the discount, if any.
    pub applied: Option<AppliedCoupon>,
}

impl OrderPricing {
    /// Check if a discount is applied.
    pub fn has_discount(&self) -> bool {
        self.discount_total.is_positive()
    }
}

/// Price an order, optionally applying a coupon.
///
/// The subtotal is the sum of line amounts. The coupon contributes a
/// discount per its own rules; a coupon that doesn't apply simply yields
/// no discount rather than an error.
pub fn price_order(
    coupon: Option<&Coupon>,
    now: i64,
    items: &[OrderLine],
    currency: Currency,
) -> Result<OrderPricing, CommerceError> {
    if let Some(line) = items.iter().find(|line| line.amount.currency != currency) {
        return Err(CommerceError::CurrencyMismatch {
            expected: currency.code().to_string(),
            got: line.amount.currency.code().to_string(),
        });
    }
    let subtotal = Money::try_sum(items.iter().map(|line| &line.amount), currency)
        .ok_or(CommerceError::Overflow)?;

    let discount_total = coupon
        .map(|c| c.discount_at(now, subtotal, items))
        .unwrap_or_else(|| Money::zero(currency));

    let grand_total = subtotal
        .try_subtract(&discount_total)
        .ok_or(CommerceError::Overflow)?;
    let grand_total = Money::new(grand_total.amount_cents.max(0), currency);

    let applied = match coupon {
        Some(c) if discount_total.is_positive() => Some(AppliedCoupon::from_coupon(c, discount_total)),
        _ => None,
    };

    Ok(OrderPricing {
        subtotal,
        discount_total,
        grand_total,
        applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const DAY: i64 = 86_400;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn lines() -> Vec<OrderLine> {
        vec![
            OrderLine::new(ProductId::new("prod-helmet"), usd(4000)),
            OrderLine::new(ProductId::new("prod-gloves"), usd(1000)),
        ]
    }

    #[test]
    fn test_pricing_without_coupon() {
        let pricing = price_order(None, NOW, &lines(), Currency::USD).unwrap();
        assert_eq!(pricing.subtotal.amount_cents, 5000);
        assert!(!pricing.has_discount());
        assert_eq!(pricing.grand_total.amount_cents, 5000);
        assert!(pricing.applied.is_none());
    }

    #[test]
    fn test_pricing_with_coupon() {
        let coupon = Coupon::percentage("SAVE10", 10.0, NOW - DAY, NOW + DAY);
        let pricing = price_order(Some(&coupon), NOW, &lines(), Currency::USD).unwrap();

        assert_eq!(pricing.subtotal.amount_cents, 5000);
        assert_eq!(pricing.discount_total.amount_cents, 500);
        assert_eq!(pricing.grand_total.amount_cents, 4500);

        let applied = pricing.applied.unwrap();
        assert_eq!(applied.code, "SAVE10");
        assert_eq!(applied.amount.amount_cents, 500);
    }

    #[test]
    fn test_pricing_with_inapplicable_coupon() {
        let coupon = Coupon::percentage("SAVE10", 10.0, NOW - DAY, NOW + DAY)
            .with_minimum_order(usd(100_000));
        let pricing = price_order(Some(&coupon), NOW, &lines(), Currency::USD).unwrap();

        assert!(!pricing.has_discount());
        assert_eq!(pricing.grand_total, pricing.subtotal);
        assert!(pricing.applied.is_none());
    }

    #[test]
    fn test_pricing_currency_mismatch_errors() {
        let items = vec![OrderLine::new(
            ProductId::new("prod-helmet"),
            Money::new(4000, Currency::EUR),
        )];
        let result = price_order(None, NOW, &items, Currency::USD);
        assert!(result.is_err());
    }

    #[test]
    fn test_grand_total_never_negative() {
        let coupon = Coupon::fixed("BIG", usd(10_000), NOW - DAY, NOW + DAY);
        let items = vec![OrderLine::new(ProductId::new("prod-gloves"), usd(1000))];
        let pricing = price_order(Some(&coupon), NOW, &items, Currency::USD).unwrap();

        // Fixed discount caps at the applicable amount, so the floor is
        // already respected upstream.
        assert_eq!(pricing.discount_total.amount_cents, 1000);
        assert_eq!(pricing.grand_total.amount_cents, 0);
    }
}
