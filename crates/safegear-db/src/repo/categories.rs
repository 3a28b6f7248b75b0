//! Category persistence.

use crate::{params, Db, DbError};
use safegear_commerce::catalog::Category;
use safegear_commerce::ids::CategoryId;
use serde::Deserialize;

const COLUMNS: &str = "id, parent_id, name, slug, description, image_url, position, \
     product_count, created_at, updated_at";

/// Flat row shape for the `categories` table.
#[derive(Debug, Deserialize)]
struct CategoryRow {
    id: String,
    parent_id: Option<String>,
    name: String,
    slug: String,
    description: Option<String>,
    image_url: Option<String>,
    position: i64,
    product_count: i64,
    created_at: i64,
    updated_at: i64,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            id: CategoryId::new(self.id),
            parent_id: self.parent_id.map(CategoryId::new),
            name: self.name,
            slug: self.slug,
            description: self.description,
            image_url: self.image_url,
            position: self.position as i32,
            product_count: self.product_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Category repository.
pub struct CategoryRepository<'a> {
    db: &'a Db,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Insert a new category. Fails on duplicate slug.
    pub fn insert(&self, category: &Category) -> Result<(), DbError> {
        self.db.execute(
            "INSERT INTO categories (id, parent_id, name, slug, description, \
             image_url, position, product_count, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                category.id.as_str(),
                category.parent_id.as_ref().map(|id| id.as_str().to_string()),
                category.name.as_str(),
                category.slug.as_str(),
                category.description.clone(),
                category.image_url.clone(),
                category.position,
                category.product_count,
                category.created_at,
                category.updated_at,
            ],
        )?;
        tracing::debug!(slug = %category.slug, "category inserted");
        Ok(())
    }

    /// Update an existing category by id.
    pub fn update(&self, category: &Category) -> Result<(), DbError> {
        self.db.execute(
            "UPDATE categories SET parent_id = ?, name = ?, slug = ?, \
             description = ?, image_url = ?, position = ?, product_count = ?, \
             updated_at = ? WHERE id = ?",
            params![
                category.parent_id.as_ref().map(|id| id.as_str().to_string()),
                category.name.as_str(),
                category.slug.as_str(),
                category.description.clone(),
                category.image_url.clone(),
                category.position,
                category.product_count,
                category.updated_at,
                category.id.as_str(),
            ],
        )?;
        tracing::debug!(slug = %category.slug, "category updated");
        Ok(())
    }

    /// Fetch a category by id.
    pub fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM categories WHERE id = ?");
        let row: Option<CategoryRow> = self.db.query_optional(&sql, params![id.as_str()])?;
        Ok(row.map(CategoryRow::into_category))
    }

    /// List all categories ordered for display.
    pub fn list(&self) -> Result<Vec<Category>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM categories ORDER BY position ASC, name ASC");
        let rows: Vec<CategoryRow> = self.db.query_as(&sql, params![])?;
        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }

    /// List direct children of a category.
    pub fn list_children(&self, parent: &CategoryId) -> Result<Vec<Category>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM categories WHERE parent_id = ? ORDER BY position ASC, name ASC"
        );
        let rows: Vec<CategoryRow> = self.db.query_as(&sql, params![parent.as_str()])?;
        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_into_category() {
        let row = CategoryRow {
            id: "cat-head".to_string(),
            parent_id: Some("cat-ppe".to_string()),
            name: "Head Protection".to_string(),
            slug: "head-protection".to_string(),
            description: None,
            image_url: None,
            position: 2,
            product_count: 14,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        };
        let category = row.into_category();
        assert_eq!(category.parent_id, Some(CategoryId::new("cat-ppe")));
        assert_eq!(category.position, 2);
        assert_eq!(category.product_count, 14);
    }
}
