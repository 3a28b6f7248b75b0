//! Admin CRUD payloads.
//!
//! Field-shape rules live on the payload structs as `validator` attributes;
//! cross-field rules (validity windows, kind-dependent ranges, optional URL
//! shapes) are collected alongside them so a payload reports every
//! violation in one pass.

mod category;
mod coupon;
mod product;

pub use category::CategoryPayload;
pub use coupon::CouponPayload;
pub use product::ProductPayload;

use crate::violations::invalid;
use safegear_commerce::money::Currency;
use validator::ValidationError;

/// Parse an ISO-8601 / RFC 3339 timestamp into Unix seconds.
pub(crate) fn parse_datetime(value: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.timestamp())
}

pub(crate) fn iso_datetime(value: &str) -> Result<(), ValidationError> {
    if parse_datetime(value).is_none() {
        return Err(invalid("iso_datetime", "must be an ISO-8601 timestamp"));
    }
    Ok(())
}

pub(crate) fn alphanumeric_code(value: &str) -> Result<(), ValidationError> {
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("alphanumeric", "must contain only letters and digits"));
    }
    Ok(())
}

pub(crate) fn slug_format(value: &str) -> Result<(), ValidationError> {
    let ok = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !value.starts_with('-')
        && !value.ends_with('-');
    if !ok {
        return Err(invalid(
            "slug",
            "must be lowercase letters, digits, and dashes",
        ));
    }
    Ok(())
}

pub(crate) fn currency_code(value: &str) -> Result<(), ValidationError> {
    if Currency::from_code(value).is_none() {
        return Err(invalid("currency", "unsupported currency code"));
    }
    Ok(())
}

/// Shape check for optional URLs; scheme only, resolution is not our job.
pub(crate) fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

pub(crate) fn default_currency() -> String {
    "USD".to_string()
}

pub(crate) fn default_true() -> bool {
    true
}
