//! Product persistence.

use crate::{params, Db, DbError};
use safegear_commerce::catalog::{Product, ProductStatus};
use safegear_commerce::ids::{CategoryId, ProductId};
use safegear_commerce::money::{Currency, Money};
use serde::Deserialize;

const COLUMNS: &str = "id, sku, name, slug, description, status, price_cents, currency, \
     category_ids, tags, image_url, created_at, updated_at";

/// Flat row shape for the `products` table.
#[derive(Debug, Deserialize)]
struct ProductRow {
    id: String,
    sku: String,
    name: String,
    slug: String,
    description: Option<String>,
    status: String,
    price_cents: i64,
    currency: String,
    category_ids: String,
    tags: String,
    image_url: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, DbError> {
        let currency = Currency::from_code(&self.currency)
            .ok_or_else(|| DbError::DeserializeError(format!("unknown currency: {}", self.currency)))?;
        let status = ProductStatus::from_str(&self.status)
            .ok_or_else(|| DbError::DeserializeError(format!("unknown status: {}", self.status)))?;

        let category_ids: Vec<CategoryId> = serde_json::from_str(&self.category_ids)?;
        let tags: Vec<String> = serde_json::from_str(&self.tags)?;

        Ok(Product {
            id: ProductId::new(self.id),
            sku: self.sku,
            name: self.name,
            slug: self.slug,
            description: self.description,
            status,
            price: Money::new(self.price_cents, currency),
            category_ids,
            tags,
            image_url: self.image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Product repository.
pub struct ProductRepository<'a> {
    db: &'a Db,
}

impl<'a> ProductRepository<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Insert a new product. Fails on duplicate sku or slug.
    pub fn insert(&self, product: &Product) -> Result<(), DbError> {
        self.db.execute(
            "INSERT INTO products (id, sku, name, slug, description, status, \
             price_cents, currency, category_ids, tags, image_url, created_at, \
             updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                product.id.as_str(),
                product.sku.as_str(),
                product.name.as_str(),
                product.slug.as_str(),
                product.description.clone(),
                product.status.as_str(),
                product.price.amount_cents,
                product.price.currency.code(),
                serde_json::to_string(&product.category_ids)?,
                serde_json::to_string(&product.tags)?,
                product.image_url.clone(),
                product.created_at,
                product.updated_at,
            ],
        )?;
        tracing::debug!(sku = %product.sku, "product inserted");
        Ok(())
    }

    /// Update an existing product by id.
    pub fn update(&self, product: &Product) -> Result<(), DbError> {
        self.db.execute(
            "UPDATE products SET sku = ?, name = ?, slug = ?, description = ?, \
             status = ?, price_cents = ?, currency = ?, category_ids = ?, tags = ?, \
             image_url = ?, updated_at = ? WHERE id = ?",
            params![
                product.sku.as_str(),
                product.name.as_str(),
                product.slug.as_str(),
                product.description.clone(),
                product.status.as_str(),
                product.price.amount_cents,
                product.price.currency.code(),
                serde_json::to_string(&product.category_ids)?,
                serde_json::to_string(&product.tags)?,
                product.image_url.clone(),
                product.updated_at,
                product.id.as_str(),
            ],
        )?;
        tracing::debug!(sku = %product.sku, "product updated");
        Ok(())
    }

    /// Fetch a product by id.
    pub fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = ?");
        let row: Option<ProductRow> = self.db.query_optional(&sql, params![id.as_str()])?;
        row.map(ProductRow::into_product).transpose()
    }

    /// Fetch a product by slug (storefront lookup).
    pub fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE slug = ?");
        let row: Option<ProductRow> = self.db.query_optional(&sql, params![slug])?;
        row.map(ProductRow::into_product).transpose()
    }

    /// List products visible on the storefront.
    pub fn list_active(&self) -> Result<Vec<Product>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE status = 'active' ORDER BY name ASC");
        let rows: Vec<ProductRow> = self.db.query_as(&sql, params![])?;
        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// List all products for the admin panel, newest first.
    pub fn list(&self) -> Result<Vec<Product>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM products ORDER BY created_at DESC");
        let rows: Vec<ProductRow> = self.db.query_as(&sql, params![])?;
        rows.into_iter().map(ProductRow::into_product).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> ProductRow {
        ProductRow {
            id: "prod-1".to_string(),
            sku: "HLM-001".to_string(),
            name: "Class E Hard Hat".to_string(),
            slug: "class-e-hard-hat".to_string(),
            description: None,
            status: "active".to_string(),
            price_cents: 3499,
            currency: "USD".to_string(),
            category_ids: "[\"cat-head\"]".to_string(),
            tags: "[\"ansi-z89\"]".to_string(),
            image_url: None,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_row_into_product() {
        let product = sample_row().into_product().unwrap();
        assert_eq!(product.sku, "HLM-001");
        assert_eq!(product.price.amount_cents, 3499);
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.category_ids, vec![CategoryId::new("cat-head")]);
    }

    #[test]
    fn test_row_with_unknown_status_fails() {
        let mut row = sample_row();
        row.status = "hidden".to_string();
        assert!(row.into_product().is_err());
    }

    #[test]
    fn test_row_with_malformed_tags_fails() {
        let mut row = sample_row();
        row.tags = "not-json".to_string();
        assert!(row.into_product().is_err());
    }
}
