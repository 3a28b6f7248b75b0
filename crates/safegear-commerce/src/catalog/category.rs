//! Category types for product organization.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category.
///
/// Categories form a shallow tree via `parent_id`; the storefront uses a
/// single level of nesting (e.g., "Head Protection" > "Hard Hats").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Parent category ID (None for root categories).
    pub parent_id: Option<CategoryId>,
    /// Category name.
    pub name: String,
    /// URL-friendly slug (unique).
    pub slug: String,
    /// Category description.
    pub description: Option<String>,
    /// Category image URL.
    pub image_url: Option<String>,
    /// Sort order position within parent.
    pub position: i32,
    /// Number of products in this category.
    pub product_count: i64,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Category {
    /// Create a new root category.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = current_timestamp();
        Self {
            id: CategoryId::generate(),
            parent_id: None,
            name: name.into(),
            slug: slug.into(),
            description: None,
            image_url: None,
            position: 0,
            product_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a child of an existing category.
    pub fn new_child(parent: &Category, name: impl Into<String>, slug: impl Into<String>) -> Self {
        let mut category = Self::new(name, slug);
        category.parent_id = Some(parent.id.clone());
        category
    }

    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
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

    #[test]
    fn test_root_category() {
        let cat = Category::new("Head Protection", "head-protection");
        assert!(cat.is_root());
        assert_eq!(cat.name, "Head Protection");
    }

    #[test]
    fn test_child_category() {
        let parent = Category::new("Head Protection", "head-protection");
        let child = Category::new_child(&parent, "Hard Hats", "hard-hats");

        assert!(!child.is_root());
        assert_eq!(child.parent_id, Some(parent.id));
    }
}
