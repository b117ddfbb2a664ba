//! Coupon codes and validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::money::Money;

fn default_true() -> bool {
    true
}

/// How a coupon's value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponKind {
    /// `value` percent off the amount.
    Percentage,
    /// `value` off the amount, in currency units.
    #[serde(alias = "fixed_amount", alias = "amount")]
    Fixed,
}

impl CouponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponKind::Percentage => "percentage",
            CouponKind::Fixed => "fixed",
        }
    }
}

/// A coupon definition from the coupons dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    pub code: String,
    #[serde(rename = "type", alias = "discountType", alias = "discount_type")]
    pub kind: CouponKind,
    pub value: f64,
    #[serde(default, alias = "minAmount", alias = "min_order_amount", skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Money>,
    #[serde(default, alias = "maxDiscount", skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<Money>,
    #[serde(default = "default_true", alias = "isActive", alias = "active")]
    pub is_active: bool,
    #[serde(default, alias = "expiresAt", alias = "expiry_date", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum number of uses (None = unlimited).
    #[serde(default, alias = "usageLimit", skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<i64>,
    #[serde(default, alias = "usedCount", alias = "used_count")]
    pub usage_count: i64,
    #[serde(default, alias = "descriptionEn", skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(default, alias = "descriptionAr", skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
}

impl Coupon {
    pub fn percentage(code: impl Into<String>, percent: f64) -> Self {
        Self {
            code: code.into(),
            kind: CouponKind::Percentage,
            value: percent,
            min_amount: None,
            max_discount: None,
            is_active: true,
            expires_at: None,
            usage_limit: None,
            usage_count: 0,
            description_en: None,
            description_ar: None,
        }
    }

    pub fn fixed(code: impl Into<String>, amount: Money) -> Self {
        Self {
            kind: CouponKind::Fixed,
            value: amount.to_decimal(),
            ..Self::percentage(code, 0.0)
        }
    }

    pub fn with_minimum(mut self, amount: Money) -> Self {
        self.min_amount = Some(amount);
        self
    }

    pub fn with_max_discount(mut self, amount: Money) -> Self {
        self.max_discount = Some(amount);
        self
    }

    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }

    pub fn is_exhausted(&self) -> bool {
        self.usage_limit
            .is_some_and(|limit| self.usage_count >= limit)
    }

    pub fn matches_code(&self, code: &str) -> bool {
        self.code.trim().eq_ignore_ascii_case(code.trim())
    }

    /// Discount for an amount, never more than the amount itself.
    pub fn discount_for(&self, amount: Money) -> Money {
        let discount = match self.kind {
            CouponKind::Percentage => {
                let discount = amount.percentage(self.value);
                match self.max_discount {
                    Some(max) => discount.min(max),
                    None => discount,
                }
            }
            CouponKind::Fixed => Money::from_decimal(self.value),
        };
        discount.clamp(Money::ZERO, amount.max(Money::ZERO))
    }
}

/// Outcome of applying a coupon to an amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponQuote {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: CouponKind,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

/// Look up a coupon by code and price it against an amount.
pub fn validate_coupon(
    coupons: &[Coupon],
    code: &str,
    amount: Money,
    now: DateTime<Utc>,
) -> Result<CouponQuote, CommerceError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(CommerceError::Validation("Coupon code is required".to_string()));
    }

    let coupon = coupons
        .iter()
        .find(|c| c.matches_code(code) && c.is_active && !c.is_exhausted())
        .ok_or_else(|| CommerceError::InvalidCoupon(code.to_string()))?;

    if coupon.is_expired(now) {
        return Err(CommerceError::CouponExpired(coupon.code.clone()));
    }

    if let Some(minimum) = coupon.min_amount {
        if amount < minimum {
            return Err(CommerceError::CouponBelowMinimum {
                code: coupon.code.clone(),
                minimum,
            });
        }
    }

    let discount = coupon.discount_for(amount);
    Ok(CouponQuote {
        code: coupon.code.clone(),
        kind: coupon.kind,
        subtotal: amount,
        discount,
        total: amount - discount,
    })
}
