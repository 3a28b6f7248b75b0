//! Category create/update payload.

use crate::payloads::{is_http_url, slug_format};
use crate::violations::{check, Violation};
use safegear_commerce::catalog::Category;
use safegear_commerce::ids::CategoryId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Admin payload for creating or updating a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryPayload {
    #[validate(length(min = 2, max = 80, message = "name must be 2-80 characters"))]
    pub name: String,
    #[validate(length(min = 2, max = 80), custom(function = slug_format))]
    pub slug: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub position: i32,
}

impl CategoryPayload {
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

    /// Convert a valid payload into a domain category.
    pub fn into_category(self) -> Result<Category, Vec<Violation>> {
        let violations = self.violations();
        if !violations.is_empty() {
            return Err(violations);
        }

        let mut category = Category::new(self.name, self.slug);
        category.parent_id = self.parent_id.map(CategoryId::new);
        category.description = self.description;
        category.image_url = self.image_url;
        category.position = self.position;
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CategoryPayload {
        CategoryPayload {
            name: "Head Protection".to_string(),
            slug: "head-protection".to_string(),
            description: None,
            parent_id: None,
            image_url: None,
            position: 0,
        }
    }

    #[test]
    fn test_valid_payload_converts() {
        let category = payload().into_category().unwrap();
        assert_eq!(category.name, "Head Protection");
        assert!(category.is_root());
    }

    #[test]
    fn test_parent_id_carried() {
        let mut p = payload();
        p.parent_id = Some("cat-ppe".to_string());
        let category = p.into_category().unwrap();
        assert!(!category.is_root());
    }

    #[test]
    fn test_short_name_rejected() {
        let mut p = payload();
        p.name = "H".to_string();
        assert!(p.violations().iter().any(|v| v.field == "name"));
    }

    #[test]
    fn test_negative_position_rejected() {
        let mut p = payload();
        p.position = -2;
        assert!(p.violations().iter().any(|v| v.field == "position"));
    }
}
