//! Cart and line item types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vitrine_cache::{Document, ResourceFamily};

use crate::cart::{CartSummary, LineItemPricing};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::{CartItemId, ProductId, UserId};
use crate::money::Money;

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// What the product looked like when it was added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

fn default_true() -> bool {
    true
}

impl ProductSnapshot {
    pub fn of(product: &Product) -> Self {
        Self {
            name_en: product.name_en.clone(),
            name_ar: product.name_ar.clone(),
            price: product.price,
            image: product.image.clone(),
            in_stock: product.in_stock,
        }
    }
}

/// A chosen option value and what it adds to the unit price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedOption {
    pub name: String,
    pub choice: String,
    #[serde(default)]
    pub price_modifier: Money,
}

/// Resolve requested `name -> choice` selections against a product.
///
/// Choices the product doesn't define are kept with no price modifier.
pub fn select_options(product: &Product, requested: &BTreeMap<String, String>) -> Vec<SelectedOption> {
    requested
        .iter()
        .filter(|(_, choice)| !choice.trim().is_empty())
        .map(|(name, choice)| {
            let price_modifier = product
                .option(name)
                .and_then(|option| option.choice(choice))
                .map(|c| c.price_modifier)
                .unwrap_or_default();
            SelectedOption {
                name: name.clone(),
                choice: choice.trim().to_string(),
                price_modifier,
            }
        })
        .collect()
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    /// Product details as of add time (or the last sync).
    pub product: ProductSnapshot,
    pub quantity: i64,
    #[serde(default)]
    pub options: Vec<SelectedOption>,
    pub pricing: LineItemPricing,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Recompute pricing from the snapshot, options and quantity.
    fn reprice(&mut self) -> Result<(), CommerceError> {
        self.pricing = LineItemPricing::compute(self.product.price, &self.options, self.quantity)?;
        Ok(())
    }
}

/// A user's shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Last line item ID handed out. Never decreases, so IDs aren't reused.
    #[serde(default)]
    pub next_item_id: u64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            next_item_id: 0,
            updated_at: None,
        }
    }

    fn allocate_id(&mut self) -> CartItemId {
        let highest = self.items.iter().map(|i| i.id.get()).max().unwrap_or(0);
        self.next_item_id = self.next_item_id.max(highest) + 1;
        CartItemId::new(self.next_item_id)
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Add a product to the cart.
    ///
    /// Adding a product that already has a line merges into it: quantities
    /// are summed and capped at [`MAX_QUANTITY_PER_ITEM`], the original
    /// snapshot is kept, and non-empty options replace the old ones.
    ///
    /// Returns an error if:
    /// - Quantity is not positive, or over the limit for a new line
    /// - The product requires options and none were given
    /// - Arithmetic overflow would occur
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        options: Vec<SelectedOption>,
    ) -> Result<CartItemId, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if product.requires_options() && options.is_empty() {
            return Err(CommerceError::MissingRequiredOptions(product.id));
        }

        let now = Utc::now();

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            existing.quantity = existing
                .quantity
                .saturating_add(quantity)
                .min(MAX_QUANTITY_PER_ITEM);
            if !options.is_empty() {
                existing.options = options;
            }
            existing.reprice()?;
            existing.updated_at = now;
            let id = existing.id;
            self.touch();
            return Ok(id);
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit {
                quantity,
                max: MAX_QUANTITY_PER_ITEM,
            });
        }

        let snapshot = ProductSnapshot::of(product);
        let pricing = LineItemPricing::compute(snapshot.price, &options, quantity)?;
        let id = self.allocate_id();
        self.items.push(CartItem {
            id,
            product_id: product.id,
            product: snapshot,
            quantity,
            options,
            pricing,
            added_at: now,
            updated_at: now,
        });
        self.touch();
        Ok(id)
    }

    /// Change a line's quantity and, optionally, its options.
    ///
    /// A quantity of zero or less removes the line.
    pub fn update_item(
        &mut self,
        item_id: CartItemId,
        quantity: i64,
        options: Option<Vec<SelectedOption>>,
    ) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return if self.remove_item(item_id) {
                Ok(())
            } else {
                Err(CommerceError::CartItemNotFound(item_id))
            };
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit {
                quantity,
                max: MAX_QUANTITY_PER_ITEM,
            });
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(CommerceError::CartItemNotFound(item_id))?;
        item.quantity = quantity;
        if let Some(options) = options {
            item.options = options;
        }
        item.reprice()?;
        item.updated_at = Utc::now();
        self.touch();
        Ok(())
    }

    /// Remove a line. Returns whether it existed.
    pub fn remove_item(&mut self, item_id: CartItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    /// Refresh every snapshot from the current catalog.
    ///
    /// Lines whose product no longer exists are dropped; returns how many.
    pub fn sync(&mut self, products: &[Product]) -> Result<usize, CommerceError> {
        let len_before = self.items.len();
        self.items
            .retain(|item| products.iter().any(|p| p.id == item.product_id));
        let dropped = len_before - self.items.len();

        for item in &mut self.items {
            if let Some(product) = products.iter().find(|p| p.id == item.product_id) {
                item.product = ProductSnapshot::of(product);
                for option in &mut item.options {
                    option.price_modifier = product
                        .option(&option.name)
                        .and_then(|o| o.choice(&option.choice))
                        .map(|c| c.price_modifier)
                        .unwrap_or_default();
                }
                item.reprice()?;
            }
        }
        self.touch();
        Ok(dropped)
    }

    pub fn get_item(&self, item_id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item count and subtotal.
    pub fn summary(&self) -> Result<CartSummary, CommerceError> {
        let subtotal = self
            .items
            .iter()
            .try_fold(Money::ZERO, |acc, item| acc.checked_add(item.pricing.line_total))
            .ok_or(CommerceError::Overflow)?;
        Ok(CartSummary {
            item_count: self.item_count(),
            line_count: self.items.len(),
            subtotal,
        })
    }
}

impl Document for Cart {
    const FAMILY: ResourceFamily = ResourceFamily::Cart;
    type Scope = UserId;

    fn empty(user_id: UserId) -> Self {
        Cart::new(user_id)
    }
}
