//! Product create/update payload.

use crate::payloads::{currency_code, default_currency, is_http_url, slug_format};
use crate::violations::{check, invalid, Violation};
use safegear_commerce::catalog::{Product, ProductStatus};
use safegear_commerce::ids::CategoryId;
use safegear_commerce::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn sku_format(value: &str) -> Result<(), ValidationError> {
    let ok = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        return Err(invalid("sku", "must be letters, digits, dashes, underscores"));
    }
    Ok(())
}

fn product_status(value: &str) -> Result<(), ValidationError> {
    if ProductStatus::from_str(value).is_none() {
        return Err(invalid("status", "must be draft, active, or archived"));
    }
    Ok(())
}

fn default_status() -> String {
    "active".to_string()
}

/// Admin payload for creating or updating a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(
        length(min = 1, max = 40, message = "sku must be 1-40 characters"),
        custom(function = sku_format)
    )]
    pub sku: String,
    #[validate(length(min = 2, max = 120, message = "name must be 2-120 characters"))]
    pub name: String,
    #[validate(length(min = 2, max = 120), custom(function = slug_format))]
    pub slug: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub price: f64,
    #[serde(default = "default_currency")]
    #[validate(custom(function = currency_code))]
    pub currency: String,
    #[serde(default = "default_status")]
    #[validate(custom(function = product_status))]
    pub status: String,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
}

impl ProductPayload {
    /// Collect every violation in the payload.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = check(self).err().unwrap_or_default();

        if let Some(url) = &self.image_url {
            if !is_http_url(url) {
                violations.push(Violation {
                    field: "image_url".to_string(),
                    code: "url".to_string(),
                    message: "image URL must be http(s)".to_string(),
                });
            }
        }

        violations
    }

    /// Convert a valid payload into a domain product.
    pub fn into_product(self) -> Result<Product, Vec<Violation>> {
        let violations = self.violations();
        if !violations.is_empty() {
            return Err(violations);
        }

        let currency = Currency::from_code(&self.currency).ok_or_else(bad_payload)?;
        let status = ProductStatus::from_str(&self.status).ok_or_else(bad_payload)?;

        let mut product = Product::new(
            self.sku,
            self.name,
            self.slug,
            Money::from_decimal(self.price, currency),
        );
        product.description = self.description;
        product.status = status;
        product.category_ids = self.category_ids.into_iter().map(CategoryId::new).collect();
        product.tags = self.tags;
        product.image_url = self.image_url;
        Ok(product)
    }
}

fn bad_payload() -> Vec<Violation> {
    vec![Violation {
        field: "__all__".to_string(),
        code: "payload".to_string(),
        message: "payload could not be converted".to_string(),
    }]
}
