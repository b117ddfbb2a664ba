//! Curated and rule-based product collections.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::i18n::{Localize, Normalizer};
use crate::ids::{deserialize_key, slugify, CategoryId, ProductId};
use crate::money::Money;

fn default_true() -> bool {
    true
}

/// How a collection picks its products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollectionType {
    /// An explicit list of product IDs.
    #[default]
    Manual,
    /// Every product matching a set of rules.
    Automated,
}

impl CollectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionType::Manual => "manual",
            CollectionType::Automated => "automated",
        }
    }
}

/// Criteria for an automated collection. Unset rules match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CollectionRules {
    /// Matches the product's category or subcategory.
    #[serde(default, alias = "categoryId", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, alias = "inStock", skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(default, alias = "minPrice", skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Money>,
    #[serde(default, alias = "maxPrice", skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Money>,
    #[serde(default, alias = "isFeatured", skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl CollectionRules {
    pub fn matches(&self, product: &Product) -> bool {
        self.category_id.map_or(true, |c| product.in_category(c))
            && self.in_stock.map_or(true, |s| product.in_stock == s)
            && self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
            && self.featured.map_or(true, |f| product.is_featured == f)
    }
}

/// A named group of products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    /// Explicit key; collections without one are addressed by slug.
    #[serde(default, deserialize_with = "deserialize_key")]
    pub id: Option<String>,
    #[serde(default, alias = "nameEn")]
    pub name_en: Option<String>,
    #[serde(default, alias = "nameAr")]
    pub name_ar: Option<String>,
    #[serde(default, alias = "descriptionEn")]
    pub description_en: Option<String>,
    #[serde(default, alias = "descriptionAr")]
    pub description_ar: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: CollectionType,
    #[serde(default = "default_true", alias = "isActive")]
    pub is_active: bool,
    #[serde(default, alias = "isFeatured")]
    pub is_featured: bool,
    #[serde(default)]
    pub image: Option<String>,
    /// Product IDs, in display order, for manual collections.
    #[serde(default, alias = "productIds", alias = "product_ids")]
    pub products: Vec<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<CollectionRules>,
    #[serde(default, alias = "sortOrder", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

impl Collection {
    pub fn manual(id: impl Into<String>, name_en: impl Into<String>, products: &[u64]) -> Self {
        Self {
            id: Some(id.into()),
            name_en: Some(name_en.into()),
            name_ar: None,
            description_en: None,
            description_ar: None,
            kind: CollectionType::Manual,
            is_active: true,
            is_featured: false,
            image: None,
            products: products.iter().copied().map(ProductId::new).collect(),
            rules: None,
            sort_order: None,
        }
    }

    pub fn automated(id: impl Into<String>, name_en: impl Into<String>, rules: CollectionRules) -> Self {
        Self {
            kind: CollectionType::Automated,
            products: Vec::new(),
            rules: Some(rules),
            ..Self::manual(id, name_en, &[])
        }
    }

    /// Slug derived from the name.
    pub fn slug(&self) -> String {
        let name = self
            .name_en
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.name_ar.as_deref())
            .unwrap_or_default();
        slugify(name)
    }

    /// The key the collection is addressed by: its ID, or its slug.
    pub fn key(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => self.slug(),
        }
    }

    /// Whether a path key refers to this collection.
    pub fn matches_key(&self, key: &str) -> bool {
        let key = key.trim();
        !key.is_empty() && (self.id.as_deref() == Some(key) || self.slug() == key)
    }

    /// Ensure the collection carries its key as `id` on output.
    pub fn with_resolved_key(mut self) -> Self {
        if self.id.is_none() {
            let slug = self.slug();
            if !slug.is_empty() {
                self.id = Some(slug);
            }
        }
        self
    }
}

impl Localize for Collection {
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
