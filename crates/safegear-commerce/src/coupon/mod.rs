//! Coupon module.
//!
//! Discount rules with validity windows, usage caps, and restriction sets,
//! plus the pricing types the order pipeline consumes.

mod coupon;
mod pricing;

pub use coupon::{normalize_code, Coupon, CouponKind, CouponValue};
pub use pricing::{price_order, AppliedCoupon, OrderLine, OrderPricing};
