//! Product and option types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::i18n::{Localize, Normalizer};
use crate::ids::{CategoryId, ProductId};
use crate::money::Money;
use crate::search::{Searchable, SortKey, SortValue};

fn default_true() -> bool {
    true
}

/// One selectable value of a product option (e.g. "Large").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionChoice {
    #[serde(alias = "value", alias = "label")]
    pub name: String,
    /// Added to the unit price when chosen.
    #[serde(default, alias = "priceModifier", alias = "price")]
    pub price_modifier: Money,
}

/// A named group of choices (e.g. "Size").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductOption {
    pub name: String,
    #[serde(default, alias = "isRequired")]
    pub required: bool,
    #[serde(default, alias = "values")]
    pub choices: Vec<OptionChoice>,
}

impl ProductOption {
    /// Find a choice by name, ignoring case.
    pub fn choice(&self, name: &str) -> Option<&OptionChoice> {
        self.choices
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, alias = "nameEn")]
    pub name_en: Option<String>,
    #[serde(default, alias = "nameAr")]
    pub name_ar: Option<String>,
    #[serde(default, alias = "descriptionEn")]
    pub description_en: Option<String>,
    #[serde(default, alias = "descriptionAr")]
    pub description_ar: Option<String>,
    #[serde(default)]
    pub price: Money,
    /// Price before a sale, if the product is discounted.
    #[serde(default, alias = "originalPrice", skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    #[serde(default = "default_true", alias = "inStock", alias = "isAvailable")]
    pub in_stock: bool,
    #[serde(default, alias = "isFeatured")]
    pub is_featured: bool,
    #[serde(default, alias = "categoryId")]
    pub category_id: Option<CategoryId>,
    #[serde(default, alias = "subcategoryId")]
    pub subcategory_id: Option<CategoryId>,
    /// Primary image path.
    #[serde(default, alias = "mainImage", alias = "image_url")]
    pub image: Option<String>,
    /// Gallery image paths.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, alias = "hasRequiredOptions", skip_serializing_if = "Option::is_none")]
    pub has_required_options: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ProductOption>,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// A bare product, mostly useful in tests and fixtures.
    pub fn new(id: u64, name_en: impl Into<String>, price: Money) -> Self {
        Self {
            id: ProductId::new(id),
            name_en: Some(name_en.into()),
            name_ar: None,
            description_en: None,
            description_ar: None,
            price,
            original_price: None,
            in_stock: true,
            is_featured: false,
            category_id: None,
            subcategory_id: None,
            image: None,
            images: Vec::new(),
            rating: None,
            has_required_options: None,
            options: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_category(mut self, category: u64) -> Self {
        self.category_id = Some(CategoryId::new(category));
        self
    }

    pub fn with_subcategory(mut self, subcategory: u64) -> Self {
        self.subcategory_id = Some(CategoryId::new(subcategory));
        self
    }

    pub fn with_option(mut self, option: ProductOption) -> Self {
        self.options.push(option);
        self
    }

    /// Name to show when the language doesn't matter.
    pub fn display_name(&self) -> &str {
        self.name_en
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.name_ar.as_deref())
            .unwrap_or_default()
    }

    /// Whether the product sits in a category, directly or as a subcategory.
    pub fn in_category(&self, category: CategoryId) -> bool {
        self.category_id == Some(category) || self.subcategory_id == Some(category)
    }

    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }

    /// Whether options must be chosen before adding to a cart.
    pub fn requires_options(&self) -> bool {
        self.has_required_options.unwrap_or(false) || self.options.iter().any(|o| o.required)
    }

    /// Find an option group by name, ignoring case.
    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name.trim()))
    }
}

impl Localize for Product {
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

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        [
            &self.name_en,
            &self.name_ar,
            &self.description_en,
            &self.description_ar,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .collect()
    }

    fn sort_value(&self, key: SortKey) -> SortValue<'_> {
        match key {
            SortKey::CreatedAt => self.created_at.into(),
            SortKey::UpdatedAt => self.updated_at.into(),
            SortKey::Rating => self.rating.into(),
            SortKey::Name => SortValue::Text(self.display_name()),
            SortKey::Price => SortValue::Number(self.price.to_decimal()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::ScriptFallback;

    #[test]
    fn test_deserialize_mixed_casing() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "4",
            "nameEn": "Lamp",
            "price": "19.90",
            "categoryId": 2,
            "inStock": false,
            "options": [
                { "name": "Color", "required": true, "values": [{ "value": "Red", "priceModifier": 2 }] }
            ]
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(4));
        assert_eq!(product.name_en.as_deref(), Some("Lamp"));
        assert_eq!(product.price, Money::new(1990));
        assert!(!product.in_stock);
        assert!(product.requires_options());
        assert_eq!(
            product.option("color").unwrap().choice("red").unwrap().price_modifier,
            Money::new(200)
        );
    }

    #[test]
    fn test_defaults() {
        let product: Product = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(product.in_stock);
        assert!(!product.requires_options());
        assert_eq!(product.display_name(), "");
    }

    #[test]
    fn test_in_category() {
        let product = Product::new(1, "Mug", Money::new(500))
            .with_category(3)
            .with_subcategory(7);
        assert!(product.in_category(CategoryId::new(3)));
        assert!(product.in_category(CategoryId::new(7)));
        assert!(!product.in_category(CategoryId::new(4)));
    }

    #[test]
    fn test_localize_arabic_only() {
        let mut product: Product =
            serde_json::from_str(r#"{"id": 1, "name_ar": "قميص"}"#).unwrap();
        product.localize(&ScriptFallback);

        assert_eq!(product.name_en, None);
        assert_eq!(product.name_ar.as_deref(), Some("قميص"));
        assert!(product.description_en.unwrap().contains("قميص"));
        assert!(product.description_ar.unwrap().contains("قميص"));
    }
}
