//! Coupon persistence.

use crate::{params, Db, DbError};
use safegear_commerce::coupon::{normalize_code, Coupon, CouponKind, CouponValue};
use safegear_commerce::ids::{CategoryId, CouponId, ProductId};
use safegear_commerce::money::{Currency, Money};
use serde::Deserialize;

const COLUMNS: &str = "id, code, description, kind, percent, amount_cents, currency, \
     minimum_order_cents, maximum_discount_cents, usage_limit, used_count, \
     user_usage_limit, applicable_products, applicable_categories, starts_at, \
     ends_at, active, created_at, updated_at";

/// Flat row shape for the `coupons` table.
#[derive(Debug, Deserialize)]
struct CouponRow {
    id: String,
    code: String,
    description: Option<String>,
    kind: String,
    percent: Option<f64>,
    amount_cents: Option<i64>,
    currency: String,
    minimum_order_cents: i64,
    maximum_discount_cents: Option<i64>,
    usage_limit: Option<i64>,
    used_count: i64,
    user_usage_limit: Option<i64>,
    applicable_products: String,
    applicable_categories: String,
    starts_at: i64,
    ends_at: i64,
    active: i64,
    created_at: i64,
    updated_at: i64,
}

impl CouponRow {
    fn into_coupon(self) -> Result<Coupon, DbError> {
        let currency = Currency::from_code(&self.currency)
            .ok_or_else(|| DbError::DeserializeError(format!("unknown currency: {}", self.currency)))?;

        let value = match CouponKind::from_str(&self.kind) {
            Some(CouponKind::Percentage) => CouponValue::Percentage(self.percent.unwrap_or(0.0)),
            Some(CouponKind::Fixed) => {
                CouponValue::Fixed(Money::new(self.amount_cents.unwrap_or(0), currency))
            }
            None => {
                return Err(DbError::DeserializeError(format!(
                    "unknown coupon kind: {}",
                    self.kind
                )))
            }
        };

        let applicable_products: Vec<ProductId> = serde_json::from_str(&self.applicable_products)?;
        let applicable_categories: Vec<CategoryId> =
            serde_json::from_str(&self.applicable_categories)?;

        Ok(Coupon {
            id: CouponId::new(self.id),
            code: self.code,
            description: self.description,
            value,
            minimum_order_amount: Money::new(self.minimum_order_cents, currency),
            maximum_discount_amount: self
                .maximum_discount_cents
                .map(|cents| Money::new(cents, currency)),
            usage_limit: self.usage_limit,
            used_count: self.used_count,
            user_usage_limit: self.user_usage_limit,
            applicable_products,
            applicable_categories,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            active: self.active != 0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Coupon repository.
pub struct CouponRepository<'a> {
    db: &'a Db,
}

impl<'a> CouponRepository<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Insert a new coupon. Fails on duplicate code.
    pub fn insert(&self, coupon: &Coupon) -> Result<(), DbError> {
        let (percent, amount_cents) = split_value(&coupon.value);
        self.db.execute(
            "INSERT INTO coupons (id, code, description, kind, percent, amount_cents, \
             currency, minimum_order_cents, maximum_discount_cents, usage_limit, \
             used_count, user_usage_limit, applicable_products, applicable_categories, \
             starts_at, ends_at, active, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                coupon.id.as_str(),
                coupon.code.as_str(),
                coupon.description.clone(),
                coupon.value.kind().as_str(),
                percent,
                amount_cents,
                coupon.currency().code(),
                coupon.minimum_order_amount.amount_cents,
                coupon.maximum_discount_amount.map(|m| m.amount_cents),
                coupon.usage_limit,
                coupon.used_count,
                coupon.user_usage_limit,
                serde_json::to_string(&coupon.applicable_products)?,
                serde_json::to_string(&coupon.applicable_categories)?,
                coupon.starts_at,
                coupon.ends_at,
                coupon.active,
                coupon.created_at,
                coupon.updated_at,
            ],
        )?;
        tracing::debug!(code = %coupon.code, "coupon inserted");
        Ok(())
    }

    /// Update an existing coupon's definition by id.
    ///
    /// `used_count` is deliberately not written here; redemption counting
    /// goes through [`Self::redeem`] only.
    pub fn update(&self, coupon: &Coupon) -> Result<(), DbError> {
        let (percent, amount_cents) = split_value(&coupon.value);
        self.db.execute(
            "UPDATE coupons SET code = ?, description = ?, kind = ?, percent = ?, \
             amount_cents = ?, currency = ?, minimum_order_cents = ?, \
             maximum_discount_cents = ?, usage_limit = ?, user_usage_limit = ?, \
             applicable_products = ?, applicable_categories = ?, starts_at = ?, \
             ends_at = ?, active = ?, updated_at = ? WHERE id = ?",
            params![
                coupon.code.as_str(),
                coupon.description.clone(),
                coupon.value.kind().as_str(),
                percent,
                amount_cents,
                coupon.currency().code(),
                coupon.minimum_order_amount.amount_cents,
                coupon.maximum_discount_amount.map(|m| m.amount_cents),
                coupon.usage_limit,
                coupon.user_usage_limit,
                serde_json::to_string(&coupon.applicable_products)?,
                serde_json::to_string(&coupon.applicable_categories)?,
                coupon.starts_at,
                coupon.ends_at,
                coupon.active,
                coupon.updated_at,
                coupon.id.as_str(),
            ],
        )?;
        tracing::debug!(code = %coupon.code, "coupon updated");
        Ok(())
    }

    /// Fetch a coupon by id.
    pub fn find_by_id(&self, id: &CouponId) -> Result<Option<Coupon>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM coupons WHERE id = ?");
        let row: Option<CouponRow> = self.db.query_optional(&sql, params![id.as_str()])?;
        row.map(CouponRow::into_coupon).transpose()
    }

    /// Fetch a coupon by code (case-insensitive).
    pub fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM coupons WHERE code = ?");
        let row: Option<CouponRow> =
            self.db.query_optional(&sql, params![normalize_code(code)])?;
        row.map(CouponRow::into_coupon).transpose()
    }

    /// List all coupons, newest first.
    pub fn list(&self) -> Result<Vec<Coupon>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM coupons ORDER BY created_at DESC");
        let rows: Vec<CouponRow> = self.db.query_as(&sql, params![])?;
        rows.into_iter().map(CouponRow::into_coupon).collect()
    }

    /// Count a redemption against the usage limit.
    ///
    /// The increment and the limit check happen in one conditional UPDATE,
    /// so concurrent redemptions from separate processes cannot push
    /// `used_count` past `usage_limit`. Returns whether a redemption was
    /// counted. Callers invoke this exactly once per confirmed order.
    pub fn redeem(&self, code: &str, now: i64) -> Result<bool, DbError> {
        let code = normalize_code(code);
        self.db.execute(
            "UPDATE coupons SET used_count = used_count + 1, updated_at = ? \
             WHERE code = ? AND active = 1 \
             AND (usage_limit IS NULL OR used_count < usage_limit)",
            params![now, code.as_str()],
        )?;
        let counted = self.db.changes()? > 0;
        if counted {
            tracing::debug!(code = %code, "coupon redemption counted");
        } else {
            tracing::warn!(code = %code, "coupon redemption rejected");
        }
        Ok(counted)
    }
}

fn split_value(value: &CouponValue) -> (Option<f64>, Option<i64>) {
    match value {
        CouponValue::Percentage(percent) => (Some(*percent), None),
        CouponValue::Fixed(amount) => (None, Some(amount.amount_cents)),
    }
}
