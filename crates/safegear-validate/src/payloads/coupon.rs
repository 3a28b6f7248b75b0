//! Coupon create/update payload.

use crate::payloads::{
    alphanumeric_code, currency_code, default_currency, default_true, iso_datetime, parse_datetime,
};
use crate::violations::{check, Violation};
use safegear_commerce::coupon::{Coupon, CouponKind};
use safegear_commerce::ids::{CategoryId, ProductId};
use safegear_commerce::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn coupon_kind(value: &str) -> Result<(), ValidationError> {
    if CouponKind::from_str(value).is_none() {
        return Err(crate::violations::invalid(
            "kind",
            "must be \"percentage\" or \"fixed\"",
        ));
    }
    Ok(())
}

/// Admin payload for creating or updating a coupon.
///
/// Monetary fields are decimal currency units ("49.99"); timestamps are
/// ISO-8601 strings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponPayload {
    #[validate(
        length(min = 3, max = 30, message = "code must be 3-30 characters"),
        custom(function = alphanumeric_code)
    )]
    pub code: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(custom(function = coupon_kind))]
    pub kind: String,
    #[validate(range(min = 0.0, message = "value must be non-negative"))]
    pub value: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub minimum_order_amount: f64,
    #[validate(range(min = 0.0))]
    pub maximum_discount_amount: Option<f64>,
    #[validate(range(min = 1))]
    pub usage_limit: Option<i64>,
    #[validate(range(min = 1))]
    pub user_usage_limit: Option<i64>,
    #[serde(default)]
    pub applicable_products: Vec<String>,
    #[serde(default)]
    pub applicable_categories: Vec<String>,
    #[validate(custom(function = iso_datetime))]
    pub starts_at: String,
    #[validate(custom(function = iso_datetime))]
    pub ends_at: String,
    #[serde(default = "default_currency")]
    #[validate(custom(function = currency_code))]
    pub currency: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl CouponPayload {
    /// Collect every violation in the payload: declarative field rules
    /// plus the cross-field rules below.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = check(self).err().unwrap_or_default();

        if CouponKind::from_str(&self.kind) == Some(CouponKind::Percentage) && self.value > 100.0 {
            violations.push(Violation {
                field: "value".to_string(),
                code: "percentage_range".to_string(),
                message: "percentage value cannot exceed 100".to_string(),
            });
        }

        if let (Some(starts), Some(ends)) =
            (parse_datetime(&self.starts_at), parse_datetime(&self.ends_at))
        {
            if starts > ends {
                violations.push(Violation {
                    field: "ends_at".to_string(),
                    code: "window".to_string(),
                    message: "end date must not precede start date".to_string(),
                });
            }
        }

        violations
    }

    /// Convert a valid payload into a domain coupon.
    pub fn into_coupon(self) -> Result<Coupon, Vec<Violation>> {
        let violations = self.violations();
        if !violations.is_empty() {
            return Err(violations);
        }

        // Checked above; treat any residue as a payload violation, not a panic.
        let currency = Currency::from_code(&self.currency).ok_or_else(bad_payload)?;
        let kind = CouponKind::from_str(&self.kind).ok_or_else(bad_payload)?;
        let starts_at = parse_datetime(&self.starts_at).ok_or_else(bad_payload)?;
        let ends_at = parse_datetime(&self.ends_at).ok_or_else(bad_payload)?;

        let mut coupon = match kind {
            CouponKind::Percentage => Coupon::percentage(self.code, self.value, starts_at, ends_at),
            CouponKind::Fixed => Coupon::fixed(
                self.code,
                Money::from_decimal(self.value, currency),
                starts_at,
                ends_at,
            ),
        };

        coupon.description = self.description;
        coupon.minimum_order_amount = Money::from_decimal(self.minimum_order_amount, currency);
        coupon.maximum_discount_amount = self
            .maximum_discount_amount
            .map(|v| Money::from_decimal(v, currency));
        coupon.usage_limit = self.usage_limit;
        coupon.user_usage_limit = self.user_usage_limit;
        coupon.applicable_products = self.applicable_products.into_iter().map(ProductId::new).collect();
        coupon.applicable_categories = self
            .applicable_categories
            .into_iter()
            .map(CategoryId::new)
            .collect();
        coupon.active = self.active;
        Ok(coupon)
    }
}

fn bad_payload() -> Vec<Violation> {
    vec![Violation {
        field: "__all__".to_string(),
        code: "payload".to_string(),
        message: "payload could not be converted".to_string(),
    }]
}
