//! # Discount Module
//!
//! Quantity-based discount tiers and per-line pricing.
//!
//! ## Tiers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity     1 ─── 3 │ 4 ───────── 9 │ 10 ──────── 20                  │
//! │  discount        0%   │      10%      │      20%                        │
//! │                                                                         │
//! │  quantity < 1 or > 20 never reaches this module: validation rejects it │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Pricing
//! ```text
//! gross    = unit_price × quantity
//! discount = gross × tier%            (rounded half-up to the cent)
//! total    = gross - discount         (so discount + total == gross exactly)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Quantity at which the 10% tier starts.
pub const TEN_PERCENT_MIN_QUANTITY: i64 = 4;

/// Quantity at which the 20% tier starts.
pub const TWENTY_PERCENT_MIN_QUANTITY: i64 = 10;

// =============================================================================
// Discount Tier
// =============================================================================

/// The discount percentage a line earns from its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTier {
    /// Fewer than 4 units.
    None,
    /// 4 to 9 units.
    TenPercent,
    /// 10 to 20 units.
    TwentyPercent,
}

impl DiscountTier {
    /// Picks the tier for a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use salesdesk_core::DiscountTier;
    ///
    /// assert_eq!(DiscountTier::for_quantity(3), DiscountTier::None);
    /// assert_eq!(DiscountTier::for_quantity(4), DiscountTier::TenPercent);
    /// assert_eq!(DiscountTier::for_quantity(10), DiscountTier::TwentyPercent);
    /// ```
    pub const fn for_quantity(quantity: i64) -> Self {
        if quantity >= TWENTY_PERCENT_MIN_QUANTITY {
            DiscountTier::TwentyPercent
        } else if quantity >= TEN_PERCENT_MIN_QUANTITY {
            DiscountTier::TenPercent
        } else {
            DiscountTier::None
        }
    }

    /// Discount rate in basis points (1000 = 10%).
    pub const fn bps(&self) -> u32 {
        match self {
            DiscountTier::None => 0,
            DiscountTier::TenPercent => 1000,
            DiscountTier::TwentyPercent => 2000,
        }
    }

    /// Discount rate as a whole percentage, for display.
    pub const fn percent(&self) -> u32 {
        self.bps() / 100
    }
}

// =============================================================================
// Line Pricing
// =============================================================================

/// Derived money values of one sale line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePricing {
    pub tier: DiscountTier,
    pub gross: Money,
    pub discount: Money,
    pub total: Money,
}

impl LinePricing {
    /// Prices `quantity` units at `unit_price`.
    ///
    /// ## Example
    /// ```rust
    /// use salesdesk_core::{LinePricing, Money};
    ///
    /// let line = LinePricing::compute(Money::from_cents(10_000), 10);
    /// assert_eq!(line.discount.cents(), 20_000);
    /// assert_eq!(line.total.cents(), 80_000);
    /// ```
    pub fn compute(unit_price: Money, quantity: i64) -> Self {
        let tier = DiscountTier::for_quantity(quantity);
        let gross = unit_price.multiply_quantity(quantity);
        let discount = gross.percentage_of(tier.bps());

        LinePricing {
            tier,
            gross,
            discount,
            total: gross - discount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
