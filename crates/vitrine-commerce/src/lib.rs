//! Storefront domain types and logic for Vitrine.
//!
//! This crate holds everything the storefront knows about its records,
//! independent of how requests reach it:
//!
//! - **Catalog**: Products, categories, collections and collection resolution
//! - **Cart**: Per-user carts and wishlists, line pricing, coupons
//! - **Content**: Product comments and static pages
//! - **Search**: Free-text search, filters, sorting, pagination
//! - **I18n / Assets**: Bilingual field fallback and image URL building
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_commerce::prelude::*;
//!
//! let shirt = Product::new(3, "Shirt", Money::from_decimal(19.99));
//!
//! let mut cart = Cart::new(UserId::new(7));
//! cart.add_item(&shirt, 2, Vec::new())?;
//! cart.add_item(&shirt, 1, Vec::new())?;
//!
//! let summary = cart.summary()?;
//! println!("{} items, subtotal {}", summary.item_count, summary.subtotal);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod assets;
pub mod cart;
pub mod catalog;
pub mod content;
pub mod i18n;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{
        resolve_collection, Category, Collection, CollectionRules, CollectionType, Product,
        ProductOption,
    };

    // Cart
    pub use crate::cart::{
        select_options, validate_coupon, Cart, CartItem, CartSummary, Coupon, CouponQuote,
        LineItemPricing, SelectedOption, Wishlist,
    };

    // Content
    pub use crate::content::{Comment, CommentBook, CommentDraft, PageBook, PageDraft, StaticPage};

    // Search
    pub use crate::search::{ListParams, Page, Pagination, Query, Searchable, SortKey, SortOrder};

    // Presentation
    pub use crate::assets::{AssetMode, AssetResolver, DisplayUrls};
    pub use crate::i18n::{Localize, Normalizer, ScriptFallback};
}
