//! Admin payload validation for the SafeGear storefront.
//!
//! Incoming create/update payloads are checked declaratively with the
//! `validator` derive; failures surface as a structured list of
//! [`Violation`]s for user-facing display, never as exceptions. Payloads
//! that pass convert into `safegear-commerce` domain types.
//!
//! # Example
//!
//! ```rust,ignore
//! let payload: CouponPayload = serde_json::from_slice(&body)?;
//! match payload.into_coupon() {
//!     Ok(coupon) => repo.insert(&coupon)?,
//!     Err(violations) => return bad_request(&violations),
//! }
//! ```

pub mod payloads;
pub mod violations;

pub use payloads::{CategoryPayload, CouponPayload, ProductPayload};
pub use violations::{check, Violation};
