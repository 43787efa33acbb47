//! Cart total derivation.
//!
//! ```text
//! subtotal = Σ price × quantity
//! discount = subtotal × 10%            (promo SAVE10 only)
//! shipping = 0 if subtotal > 100       (else flat 9.99)
//! tax      = (subtotal − discount) × 8%
//! total    = subtotal − discount + shipping + tax
//! ```
//!
//! Nothing is rounded here; [`Price::display`] rounds to cents.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Price;

/// Subtotals strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::new(dec!(100));

/// Flat shipping fee below the threshold.
pub const FLAT_SHIPPING_FEE: Price = Price::new(dec!(9.99));

/// Sales tax applied after discount.
pub const TAX_RATE: Decimal = dec!(0.08);

/// Anything that can be priced: a unit price and a quantity.
pub trait PricedLine {
    fn unit_price(&self) -> Price;
    fn quantity(&self) -> u32;

    fn line_total(&self) -> Price {
        self.unit_price() * self.quantity()
    }
}

impl PricedLine for (Price, u32) {
    fn unit_price(&self) -> Price {
        self.0
    }

    fn quantity(&self) -> u32 {
        self.1
    }
}

/// Rejected promo code input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoError {
    #[error("Invalid promo code: {0}")]
    Unknown(String),
}

/// A recognised promo code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromoCode {
    /// 10% off the subtotal.
    #[serde(rename = "SAVE10")]
    Save10,
}

impl PromoCode {
    /// Parse user input. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::Unknown`] for any other code.
    pub fn parse(input: &str) -> Result<Self, PromoError> {
        if input.trim().eq_ignore_ascii_case("save10") {
            Ok(Self::Save10)
        } else {
            Err(PromoError::Unknown(input.trim().to_owned()))
        }
    }

    /// Canonical code as shown on the cart page.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Save10 => "SAVE10",
        }
    }

    /// Fraction of the subtotal taken off.
    #[must_use]
    pub const fn rate(&self) -> Decimal {
        match self {
            Self::Save10 => dec!(0.10),
        }
    }
}

impl std::fmt::Display for PromoCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Derived order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Price,
    pub discount: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
    pub item_count: u32,
    pub promo: Option<PromoCode>,
}

impl PriceBreakdown {
    /// `true` when there was nothing to price.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Whether shipping is free.
    #[must_use]
    pub const fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }

    /// How much more the shopper must add to get free shipping.
    ///
    /// `None` once shipping is free or the cart is empty.
    #[must_use]
    pub fn amount_to_free_shipping(&self) -> Option<Price> {
        if self.is_empty() || self.ships_free() {
            None
        } else {
            Some(FREE_SHIPPING_THRESHOLD - self.subtotal)
        }
    }
}

/// Derive the order summary for a set of lines.
///
/// An empty set of lines prices to all zeros, shipping included.
#[must_use]
pub fn calculate<L: PricedLine>(lines: &[L], promo: Option<PromoCode>) -> PriceBreakdown {
    let item_count = lines
        .iter()
        .map(PricedLine::quantity)
        .fold(0, u32::saturating_add);
    if lines.is_empty() {
        return PriceBreakdown {
            promo,
            ..PriceBreakdown::default()
        };
    }

    let subtotal: Price = lines.iter().map(PricedLine::line_total).sum();
    let discount = promo.map_or(Price::ZERO, |code| subtotal * code.rate());
    let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
        Price::ZERO
    } else {
        FLAT_SHIPPING_FEE
    };
    let tax = (subtotal - discount) * TAX_RATE;
    let total = subtotal - discount + shipping + tax;

    PriceBreakdown {
        subtotal,
        discount,
        shipping,
        tax,
        total,
        item_count,
        promo,
    }
}
