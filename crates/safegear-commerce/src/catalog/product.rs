//! Product types.

use crate::ids::{CategoryId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Product status in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductStatus {
    /// Product is in draft mode, not visible to customers.
    Draft,
    /// Product is active and visible.
    #[default]
    Active,
    /// Product is archived, not visible but data preserved.
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(ProductStatus::Draft),
            "active" => Some(ProductStatus::Active),
            "archived" => Some(ProductStatus::Archived),
            _ => None,
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Stock keeping unit (unique).
    pub sku: String,
    /// Product name.
    pub name: String,
    /// URL-friendly slug (unique).
    pub slug: String,
    /// Full description.
    pub description: Option<String>,
    /// Product visibility status.
    pub status: ProductStatus,
    /// Unit price.
    pub price: Money,
    /// Categories this product belongs to.
    pub category_ids: Vec<CategoryId>,
    /// Tags for filtering/search.
    pub tags: Vec<String>,
    /// Main product image URL.
    pub image_url: Option<String>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Product {
    /// Create a new active product.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        slug: impl Into<String>,
        price: Money,
    ) -> Self {
        let now = current_timestamp();
        Self {
            id: ProductId::generate(),
            sku: sku.into(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            status: ProductStatus::Active,
            price,
            category_ids: Vec::new(),
            tags: Vec::new(),
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the product is available for purchase.
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// Add a category to this product.
    pub fn add_category(&mut self, category_id: CategoryId) {
        if !self.category_ids.contains(&category_id) {
            self.category_ids.push(category_id);
        }
    }

    /// Add a tag to this product.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Archive the product (soft removal from the storefront).
    pub fn archive(&mut self) {
        self.status = ProductStatus::Archived;
        self.updated_at = current_timestamp();
    }
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

    #[test]
    fn test_product_creation() {
        let product = Product::new(
            "HLM-001",
            "Class E Hard Hat",
            "class-e-hard-hat",
            Money::new(3499, Currency::USD),
        );
        assert_eq!(product.sku, "HLM-001");
        assert!(product.is_available());
        assert_eq!(product.price.amount_cents, 3499);
    }

    #[test]
    fn test_add_category_dedupes() {
        let mut product = Product::new(
            "GLV-004",
            "Cut-Resistant Gloves",
            "cut-resistant-gloves",
            Money::new(1299, Currency::USD),
        );
        let cat = CategoryId::new("cat-hand-protection");
        product.add_category(cat.clone());
        product.add_category(cat);
        assert_eq!(product.category_ids.len(), 1);
    }

    #[test]
    fn test_archive() {
        let mut product = Product::new(
            "VST-010",
            "Hi-Vis Vest",
            "hi-vis-vest",
            Money::new(899, Currency::USD),
        );
        product.archive();
        assert!(!product.is_available());
        assert_eq!(product.status, ProductStatus::Archived);
    }
}
