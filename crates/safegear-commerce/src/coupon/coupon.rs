//! Coupon definition, validity, and discount evaluation.

use crate::coupon::OrderLine;
use crate::ids::{CategoryId, CouponId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Kind of coupon, used for persistence and payload validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CouponKind {
    /// Percentage off the applicable amount.
    Percentage,
    /// Fixed amount off.
    Fixed,
}

impl CouponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponKind::Percentage => "percentage",
            CouponKind::Fixed => "fixed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "percentage" => Some(CouponKind::Percentage),
            "fixed" => Some(CouponKind::Fixed),
            _ => None,
        }
    }
}

/// Value of the coupon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CouponValue {
    /// Percentage off (0.0 - 100.0).
    Percentage(f64),
    /// Fixed amount off.
    Fixed(Money),
}

impl CouponValue {
    /// The kind tag for this value.
    pub fn kind(&self) -> CouponKind {
        match self {
            CouponValue::Percentage(_) => CouponKind::Percentage,
            CouponValue::Fixed(_) => CouponKind::Fixed,
        }
    }
}

/// A coupon definition.
///
/// Created by an administrator, redeemed by the order pipeline, and
/// soft-disabled via `active` rather than deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// Unique coupon identifier.
    pub id: CouponId,
    /// Coupon code (e.g., "HELMET20"), stored uppercase.
    pub code: String,
    /// Description for display.
    pub description: Option<String>,
    /// Value of the coupon.
    pub value: CouponValue,
    /// Order total required before the coupon applies.
    pub minimum_order_amount: Money,
    /// Cap on the computed discount (meaningful for percentage coupons).
    pub maximum_discount_amount: Option<Money>,
    /// Maximum number of redemptions (None = unlimited).
    pub usage_limit: Option<i64>,
    /// Current redemption count.
    pub used_count: i64,
    /// Per-user redemption limit, tracked for the order pipeline.
    pub user_usage_limit: Option<i64>,
    /// When non-empty, only these products are eligible.
    pub applicable_products: Vec<ProductId>,
    /// When non-empty, only products in these categories are eligible.
    pub applicable_categories: Vec<CategoryId>,
    /// Start of the validity window (inclusive, Unix seconds).
    pub starts_at: i64,
    /// End of the validity window (inclusive, Unix seconds).
    pub ends_at: i64,
    /// Whether the coupon is enabled.
    pub active: bool,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Coupon {
    /// Create a new percentage coupon valid over the given window.
    pub fn percentage(code: impl Into<String>, percent: f64, starts_at: i64, ends_at: i64) -> Self {
        Self::new(code, CouponValue::Percentage(percent), starts_at, ends_at)
    }

    /// Create a new fixed-amount coupon valid over the given window.
    pub fn fixed(code: impl Into<String>, amount: Money, starts_at: i64, ends_at: i64) -> Self {
        Self::new(code, CouponValue::Fixed(amount), starts_at, ends_at)
    }

    fn new(code: impl Into<String>, value: CouponValue, starts_at: i64, ends_at: i64) -> Self {
        let now = current_timestamp();
        let currency = match &value {
            CouponValue::Fixed(amount) => amount.currency,
            CouponValue::Percentage(_) => Default::default(),
        };
        Self {
            id: CouponId::generate(),
            code: normalize_code(code),
            description: None,
            value,
            minimum_order_amount: Money::zero(currency),
            maximum_discount_amount: None,
            usage_limit: None,
            used_count: 0,
            user_usage_limit: None,
            applicable_products: Vec::new(),
            applicable_categories: Vec::new(),
            starts_at,
            ends_at,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Require a minimum order total.
    pub fn with_minimum_order(mut self, amount: Money) -> Self {
        self.minimum_order_amount = amount;
        self
    }

    /// Cap the computed discount.
    pub fn with_discount_cap(mut self, amount: Money) -> Self {
        self.maximum_discount_amount = Some(amount);
        self
    }

    /// Limit total redemptions.
    pub fn with_usage_limit(mut self, limit: i64) -> Self {
        self.usage_limit = Some(limit);
        self
    }

    /// Limit redemptions per user.
    pub fn with_user_usage_limit(mut self, limit: i64) -> Self {
        self.user_usage_limit = Some(limit);
        self
    }

    /// Restrict to specific products.
    pub fn restricted_to_products(mut self, products: Vec<ProductId>) -> Self {
        self.applicable_products = products;
        self
    }

    /// Restrict to specific categories.
    pub fn restricted_to_categories(mut self, categories: Vec<CategoryId>) -> Self {
        self.applicable_categories = categories;
        self
    }

    /// Currency of the coupon's monetary fields.
    pub fn currency(&self) -> crate::money::Currency {
        match &self.value {
            CouponValue::Fixed(amount) => amount.currency,
            CouponValue::Percentage(_) => self.minimum_order_amount.currency,
        }
    }

    /// Check validity at the given time.
    ///
    /// Pure and deterministic for a given `now`: active, inside the
    /// inclusive window, and not exhausted.
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.active && self.starts_at <= now && now <= self.ends_at && !self.is_exhausted()
    }

    /// Check validity against the system clock.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(current_timestamp())
    }

    /// Check if the redemption limit has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.usage_limit
            .map(|limit| self.used_count >= limit)
            .unwrap_or(false)
    }

    /// Check if the window has closed at the given time.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.ends_at
    }

    /// Whether the coupon declares product or category restrictions.
    pub fn has_restrictions(&self) -> bool {
        !self.applicable_products.is_empty() || !self.applicable_categories.is_empty()
    }

    /// Whether a line item is eligible under the restriction sets.
    fn line_matches(&self, line: &OrderLine) -> bool {
        if self.applicable_products.contains(&line.product_id) {
            return true;
        }
        line.category_ids
            .iter()
            .any(|c| self.applicable_categories.contains(c))
    }

    /// The portion of the order eligible for discounting.
    ///
    /// Without restrictions the whole order qualifies. With restrictions,
    /// eligible line amounts are summed; lines in a different currency are
    /// skipped and the sum never exceeds the order total.
    fn applicable_amount(&self, order_total: Money, items: &[OrderLine]) -> Money {
        if !self.has_restrictions() {
            return order_total;
        }
        let mut cents: i64 = 0;
        for line in items {
            if line.amount.currency == order_total.currency && self.line_matches(line) {
                cents = cents.saturating_add(line.amount.amount_cents.max(0));
            }
        }
        Money::new(cents.min(order_total.amount_cents), order_total.currency)
    }

    /// Compute the discount for an order at the given time.
    ///
    /// Always returns a usable amount; invalid or inapplicable states
    /// degrade to zero rather than erroring. The result is non-negative
    /// and never exceeds the applicable amount.
    pub fn discount_at(&self, now: i64, order_total: Money, items: &[OrderLine]) -> Money {
        let zero = Money::zero(order_total.currency);
        if !self.is_valid_at(now) {
            return zero;
        }
        if order_total.amount_cents < self.minimum_order_amount.amount_cents {
            return zero;
        }
        let applicable = self.applicable_amount(order_total, items);
        if !applicable.is_positive() {
            return zero;
        }

        let cents = match &self.value {
            CouponValue::Percentage(percent) => {
                let mut discount = applicable.percentage(*percent).amount_cents;
                if let Some(cap) = &self.maximum_discount_amount {
                    discount = discount.min(cap.amount_cents);
                }
                discount
            }
            CouponValue::Fixed(amount) => amount.amount_cents,
        };

        Money::new(cents.clamp(0, applicable.amount_cents), order_total.currency)
    }

    /// Record a redemption.
    ///
    /// Must be invoked exactly once per completed order that consumed the
    /// coupon; the order pipeline owns that at-most-once guarantee. Under
    /// concurrent load, prefer the conditional update in the storage layer
    /// over read-modify-write through this method.
    pub fn record_usage(&mut self) {
        self.used_count += 1;
        self.updated_at = current_timestamp();
    }
}

/// Normalize a coupon code: trimmed and uppercased.
pub fn normalize_code(code: impl Into<String>) -> String {
    code.into().trim().to_uppercase()
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    const NOW: i64 = 1_700_000_000;
    const DAY: i64 = 86_400;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn open_window() -> (i64, i64) {
        (NOW - DAY, NOW + DAY)
    }

    #[test]
    fn test_code_normalization() {
        let (starts, ends) = open_window();
        let coupon = Coupon::percentage("  helmet20 ", 20.0, starts, ends);
        assert_eq!(coupon.code, "HELMET20");
    }

    #[test]
    fn test_validity_window_inclusive() {
        let coupon = Coupon::percentage("TEST", 10.0, NOW, NOW + DAY);
        assert!(coupon.is_valid_at(NOW));
        assert!(coupon.is_valid_at(NOW + DAY));
        assert!(!coupon.is_valid_at(NOW - 1));
        assert!(!coupon.is_valid_at(NOW + DAY + 1));
    }

    #[test]
    fn test_inactive_coupon_invalid() {
        let (starts, ends) = open_window();
        let mut coupon = Coupon::percentage("TEST", 10.0, starts, ends);
        assert!(coupon.is_valid_at(NOW));

        coupon.active = false;
        assert!(!coupon.is_valid_at(NOW));
    }

    #[test]
    fn test_usage_limit_exhaustion() {
        let (starts, ends) = open_window();
        let mut coupon = Coupon::percentage("TEST", 10.0, starts, ends).with_usage_limit(5);

        coupon.used_count = 4;
        assert!(coupon.is_valid_at(NOW));

        coupon.used_count = 5;
        assert!(coupon.is_exhausted());
        assert!(!coupon.is_valid_at(NOW));
    }

    #[test]
    fn test_percentage_with_cap_and_minimum() {
        // Scenario: 20% off, capped at $5.00, minimum order $10.00,
        // order total $50.00 -> min(50 * 0.20, 5) = $5.00
        let (starts, ends) = open_window();
        let coupon = Coupon::percentage("SAVE20", 20.0, starts, ends)
            .with_minimum_order(usd(1000))
            .with_discount_cap(usd(500));

        let discount = coupon.discount_at(NOW, usd(5000), &[]);
        assert_eq!(discount.amount_cents, 500);
    }

    #[test]
    fn test_percentage_without_cap() {
        let (starts, ends) = open_window();
        let coupon = Coupon::percentage("SAVE10", 10.0, starts, ends);

        let discount = coupon.discount_at(NOW, usd(5000), &[]);
        assert_eq!(discount.amount_cents, 500);
    }

    #[test]
    fn test_fixed_capped_at_order_amount() {
        // Fixed $3.00 off a $2.00 order discounts only $2.00.
        let (starts, ends) = open_window();
        let coupon = Coupon::fixed("TAKE3", usd(300), starts, ends);

        let discount = coupon.discount_at(NOW, usd(200), &[]);
        assert_eq!(discount.amount_cents, 200);
    }

    #[test]
    fn test_below_minimum_is_zero() {
        let (starts, ends) = open_window();
        let coupon =
            Coupon::percentage("SAVE10", 10.0, starts, ends).with_minimum_order(usd(2000));

        let discount = coupon.discount_at(NOW, usd(1500), &[]);
        assert!(discount.is_zero());
    }

    #[test]
    fn test_expired_is_zero() {
        let coupon = Coupon::percentage("OLD", 50.0, NOW - 10 * DAY, NOW - DAY);
        let discount = coupon.discount_at(NOW, usd(100_000), &[]);
        assert!(discount.is_zero());
    }

    #[test]
    fn test_exhausted_is_zero() {
        let (starts, ends) = open_window();
        let mut coupon = Coupon::percentage("ONCE", 10.0, starts, ends).with_usage_limit(1);
        coupon.used_count = 1;

        let discount = coupon.discount_at(NOW, usd(5000), &[]);
        assert!(discount.is_zero());
    }

    #[test]
    fn test_discount_is_pure() {
        let (starts, ends) = open_window();
        let coupon = Coupon::percentage("SAVE15", 15.0, starts, ends);

        let first = coupon.discount_at(NOW, usd(7300), &[]);
        let second = coupon.discount_at(NOW, usd(7300), &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_percentage_over_hundred_clamps_to_applicable() {
        let (starts, ends) = open_window();
        let coupon = Coupon::percentage("GLITCH", 150.0, starts, ends);

        let discount = coupon.discount_at(NOW, usd(1000), &[]);
        assert_eq!(discount.amount_cents, 1000);
    }

    #[test]
    fn test_percentage_rounding_half_up() {
        // 15% of $0.35 is 5.25 cents -> 5; 15% of $0.37 is 5.55 -> 6
        let (starts, ends) = open_window();
        let coupon = Coupon::percentage("SAVE15", 15.0, starts, ends);

        assert_eq!(coupon.discount_at(NOW, usd(35), &[]).amount_cents, 5);
        assert_eq!(coupon.discount_at(NOW, usd(37), &[]).amount_cents, 6);
    }

    #[test]
    fn test_product_restriction_sums_matching_lines() {
        let (starts, ends) = open_window();
        let helmet = ProductId::new("prod-helmet");
        let gloves = ProductId::new("prod-gloves");
        let coupon = Coupon::percentage("HELMETS10", 10.0, starts, ends)
            .restricted_to_products(vec![helmet.clone()]);

        let items = vec![
            OrderLine::new(helmet, usd(4000)),
            OrderLine::new(gloves, usd(1000)),
        ];

        // Only the helmet line is eligible: 10% of $40.00
        let discount = coupon.discount_at(NOW, usd(5000), &items);
        assert_eq!(discount.amount_cents, 400);
    }

    #[test]
    fn test_category_restriction_matches_line_categories() {
        let (starts, ends) = open_window();
        let head = CategoryId::new("cat-head");
        let coupon = Coupon::fixed("HEAD5", usd(500), starts, ends)
            .restricted_to_categories(vec![head.clone()]);

        let items = vec![
            OrderLine::new(ProductId::new("prod-helmet"), usd(300)).with_categories(vec![head]),
            OrderLine::new(ProductId::new("prod-boots"), usd(9000)),
        ];

        // Fixed $5.00 capped by the $3.00 eligible amount.
        let discount = coupon.discount_at(NOW, usd(9300), &items);
        assert_eq!(discount.amount_cents, 300);
    }

    #[test]
    fn test_restricted_coupon_with_no_matching_lines_is_zero() {
        let (starts, ends) = open_window();
        let coupon = Coupon::percentage("NICHE", 25.0, starts, ends)
            .restricted_to_products(vec![ProductId::new("prod-respirator")]);

        let items = vec![OrderLine::new(ProductId::new("prod-boots"), usd(5000))];
        let discount = coupon.discount_at(NOW, usd(5000), &items);
        assert!(discount.is_zero());
    }

    #[test]
    fn test_restricted_coupon_without_items_is_zero() {
        // Callers that pass no line detail get no discount from a
        // restricted coupon.
        let (starts, ends) = open_window();
        let coupon = Coupon::percentage("NICHE", 25.0, starts, ends)
            .restricted_to_categories(vec![CategoryId::new("cat-eye")]);

        let discount = coupon.discount_at(NOW, usd(5000), &[]);
        assert!(discount.is_zero());
    }

    #[test]
    fn test_record_usage_increments() {
        let (starts, ends) = open_window();
        let mut coupon = Coupon::fixed("TAKE3", usd(300), starts, ends);
        assert_eq!(coupon.used_count, 0);

        coupon.record_usage();
        coupon.record_usage();
        assert_eq!(coupon.used_count, 2);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(CouponKind::from_str("percentage"), Some(CouponKind::Percentage));
        assert_eq!(CouponKind::from_str("FIXED"), Some(CouponKind::Fixed));
        assert_eq!(CouponKind::from_str("bogo"), None);

        let (starts, ends) = open_window();
        let coupon = Coupon::fixed("TAKE3", usd(300), starts, ends);
        assert_eq!(coupon.value.kind().as_str(), "fixed");
    }
}
