//! Commerce error types.

use thiserror::Error;
use vitrine_cache::CacheError;

use crate::ids::{CartItemId, CategoryId, CommentId, ProductId};
use crate::money::Money;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Collection not found by ID or slug.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    CartItemNotFound(CartItemId),

    /// Comment not found.
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Static page not found by ID or slug.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {quantity} exceeds maximum allowed ({max})")]
    QuantityExceedsLimit { quantity: i64, max: i64 },

    /// Product needs options chosen before it can be added.
    #[error("Product {0} requires options to be selected")]
    MissingRequiredOptions(ProductId),

    /// Rating outside the accepted range.
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),

    /// Unknown or inactive coupon code.
    #[error("Invalid coupon code: {0}")]
    InvalidCoupon(String),

    /// Coupon past its expiry.
    #[error("Coupon expired: {0}")]
    CouponExpired(String),

    /// Order amount below the coupon's minimum.
    #[error("Coupon {code} requires a minimum amount of {minimum}")]
    CouponBelowMinimum { code: String, minimum: Money },

    /// A required field is missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Arithmetic overflow in price calculation.
    #[error("Arithmetic overflow in price calculation")]
    Overflow,

    /// The overlay could not be read or written.
    #[error(transparent)]
    Storage(#[from] CacheError),
}

impl CommerceError {
    /// HTTP-style status for presenting the error to a caller.
    pub fn status_code(&self) -> u16 {
        match self {
            CommerceError::ProductNotFound(_)
            | CommerceError::CategoryNotFound(_)
            | CommerceError::CollectionNotFound(_)
            | CommerceError::CartItemNotFound(_)
            | CommerceError::CommentNotFound(_)
            | CommerceError::PageNotFound(_) => 404,
            CommerceError::InvalidQuantity(_)
            | CommerceError::QuantityExceedsLimit { .. }
            | CommerceError::MissingRequiredOptions(_)
            | CommerceError::InvalidRating(_)
            | CommerceError::InvalidCoupon(_)
            | CommerceError::CouponExpired(_)
            | CommerceError::CouponBelowMinimum { .. }
            | CommerceError::Validation(_) => 400,
            CommerceError::Overflow | CommerceError::Storage(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }

    /// Whether the caller can fix this by changing the request.
    pub fn is_domain(&self) -> bool {
        !matches!(self, CommerceError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CommerceError::ProductNotFound(ProductId::new(1)).status_code(), 404);
        assert_eq!(CommerceError::InvalidRating(9).status_code(), 400);
        assert_eq!(CommerceError::Overflow.status_code(), 500);
        assert!(CommerceError::PageNotFound("about".into()).is_not_found());
    }

    #[test]
    fn test_messages() {
        let err = CommerceError::CouponBelowMinimum {
            code: "SAVE10".into(),
            minimum: Money::new(5000),
        };
        assert_eq!(
            err.to_string(),
            "Coupon SAVE10 requires a minimum amount of 50.00"
        );
    }
}
