//! Category types for product organization.

use serde::{Deserialize, Serialize};

use crate::i18n::{Localize, Normalizer};
use crate::ids::CategoryId;

/// A product category. Categories with a parent are subcategories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    /// Parent category ID (None for top-level categories).
    #[serde(default, alias = "parentId", alias = "parent")]
    pub parent_id: Option<CategoryId>,
    #[serde(default, alias = "nameEn")]
    pub name_en: Option<String>,
    #[serde(default, alias = "nameAr")]
    pub name_ar: Option<String>,
    #[serde(default, alias = "descriptionEn")]
    pub description_en: Option<String>,
    #[serde(default, alias = "descriptionAr")]
    pub description_ar: Option<String>,
    #[serde(default, alias = "image_url")]
    pub image: Option<String>,
}

impl Category {
    pub fn new(id: u64, name_en: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            parent_id: None,
            name_en: Some(name_en.into()),
            name_ar: None,
            description_en: None,
            description_ar: None,
            image: None,
        }
    }

    pub fn with_parent(mut self, parent: u64) -> Self {
        self.parent_id = Some(CategoryId::new(parent));
        self
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_child_of(&self, parent: CategoryId) -> bool {
        self.parent_id == Some(parent)
    }
}

impl Localize for Category {
    fn localize(&mut self, normalizer: &dyn Normalizer) {
        normalizer.fill_pair(&mut self.name_en, &mut self.name_ar);
        normalizer.fill_description(
            &mut self.description_en,
            &mut self.description_ar,
            self.name_en.as_deref(),
            self.name_ar.as_deref(),
        );
    }
}

/// Categories without a parent.
pub fn top_level(categories: &[Category]) -> impl Iterator<Item = &Category> {
    categories.iter().filter(|c| c.is_top_level())
}

/// Direct children of a category.
pub fn children_of(categories: &[Category], parent: CategoryId) -> impl Iterator<Item = &Category> {
    categories.iter().filter(move |c| c.is_child_of(parent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<Category> {
        vec![
            Category::new(1, "Clothing"),
            Category::new(2, "Shirts").with_parent(1),
            Category::new(3, "Home"),
            Category::new(4, "Trousers").with_parent(1),
        ]
    }

    #[test]
    fn test_top_level() {
        let ids: Vec<u64> = top_level(&tree()).map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_children_of() {
        let categories = tree();
        let ids: Vec<u64> = children_of(&categories, CategoryId::new(1))
            .map(|c| c.id.get())
            .collect();
        assert_eq!(ids, vec![2, 4]);
        assert_eq!(children_of(&categories, CategoryId::new(3)).count(), 0);
    }

    #[test]
    fn test_parent_alias() {
        let category: Category =
            serde_json::from_str(r#"{"id": 9, "parentId": "1", "name_ar": "قمصان"}"#).unwrap();
        assert_eq!(category.parent_id, Some(CategoryId::new(1)));
        assert!(!category.is_top_level());
    }
}
