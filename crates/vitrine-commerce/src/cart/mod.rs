//! Shopping cart module.
//!
//! Contains per-user cart and wishlist documents, line pricing, and coupon
//! validation.

mod cart;
mod coupon;
mod pricing;
mod wishlist;

pub use cart::{select_options, Cart, CartItem, ProductSnapshot, SelectedOption, MAX_QUANTITY_PER_ITEM};
pub use coupon::{validate_coupon, Coupon, CouponKind, CouponQuote};
pub use pricing::{CartSummary, LineItemPricing};
pub use wishlist::Wishlist;
