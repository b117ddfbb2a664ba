//! Cart pricing calculations.

use serde::{Deserialize, Serialize};

use crate::cart::SelectedOption;
use crate::error::CommerceError;
use crate::money::Money;

/// Pricing breakdown for a single line item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct LineItemPricing {
    /// Product price per unit, without options.
    pub unit_price: Money,
    /// Sum of the selected options' modifiers, per unit.
    pub options_price: Money,
    /// (unit_price + options_price) * quantity.
    pub line_total: Money,
}

impl LineItemPricing {
    pub fn compute(
        unit_price: Money,
        options: &[SelectedOption],
        quantity: i64,
    ) -> Result<Self, CommerceError> {
        let options_price = options
            .iter()
            .try_fold(Money::ZERO, |acc, o| acc.checked_add(o.price_modifier))
            .ok_or(CommerceError::Overflow)?;
        let line_total = unit_price
            .checked_add(options_price)
            .and_then(|per_unit| per_unit.checked_mul(quantity))
            .ok_or(CommerceError::Overflow)?;

        Ok(Self {
            unit_price,
            options_price,
            line_total,
        })
    }

    /// Price of one unit including options.
    pub fn effective_unit_price(&self) -> Money {
        self.unit_price + self.options_price
    }
}

/// Totals for a whole cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct CartSummary {
    /// Sum of quantities.
    pub item_count: i64,
    /// Number of distinct lines.
    pub line_count: usize,
    pub subtotal: Money,
}
