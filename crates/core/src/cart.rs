//! Cart lines and the client's cached cart.
//!
//! The backend owns the cart. Every mutation returns the canonical line list,
//! which replaces the cached [`Cart`] wholesale. The cache never holds a line
//! with quantity zero.

use serde::{Deserialize, Serialize};

use crate::catalog::ProductImage;
use crate::pricing::{self, PriceBreakdown, PricedLine, PromoCode};
use crate::types::{Price, ProductId};

/// The product fields the cart endpoints populate on each line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartProduct {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// A cart line as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: CartProduct,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// A cached cart item, flattened for display and pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl From<CartLine> for CartItem {
    fn from(line: CartLine) -> Self {
        let image = line.product.images.into_iter().next().map(|img| img.url);
        Self {
            id: line.product.id,
            name: line.product.name,
            price: line.product.price,
            quantity: line.quantity,
            image,
            size: line.size,
        }
    }
}

impl PricedLine for CartItem {
    fn unit_price(&self) -> Price {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// What a requested quantity change turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// Send a quantity update.
    Update(u32),
    /// The quantity would drop to zero or below; remove the line instead.
    Remove,
}

impl QuantityChange {
    /// Classify a requested quantity.
    #[must_use]
    pub fn for_quantity(quantity: i64) -> Self {
        if quantity <= 0 {
            return Self::Remove;
        }
        u32::try_from(quantity).map_or(Self::Update(u32::MAX), Self::Update)
    }
}

/// The client's cached copy of the cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Build a cart from backend lines, dropping any zero-quantity line.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::default();
        cart.replace(lines);
        cart
    }

    /// Replace the cached items with the backend's canonical list.
    pub fn replace(&mut self, lines: impl IntoIterator<Item = CartLine>) {
        self.items = lines
            .into_iter()
            .filter(|line| line.quantity > 0)
            .map(CartItem::from)
            .collect();
    }

    /// Cached items in backend order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Whether the cart holds a line for `id`.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .map(|item| item.quantity)
            .fold(0, u32::saturating_add)
    }

    /// Classify a step of `delta` units on an existing line.
    ///
    /// Returns `None` when the product is not in the cart.
    #[must_use]
    pub fn step(&self, id: &ProductId, delta: i64) -> Option<QuantityChange> {
        self.get(id)
            .map(|item| QuantityChange::for_quantity(i64::from(item.quantity) + delta))
    }

    /// Drop everything, e.g. after checkout or logout.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Derived totals for the cached items.
    #[must_use]
    pub fn summary(&self, promo: Option<PromoCode>) -> PriceBreakdown {
        pricing::calculate(&self.items, promo)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn line(id: &str, price: Price, quantity: u32) -> CartLine {
        CartLine {
            product: CartProduct {
                id: ProductId::new(id),
                name: format!("Product {id}"),
                price,
                images: vec![ProductImage {
                    url: format!("https://cdn/{id}.jpg"),
                    public_id: None,
                }],
            },
            quantity,
            size: None,
        }
    }

    #[test]
    fn test_quantity_change_redirects_to_remove() {
        assert_eq!(QuantityChange::for_quantity(0), QuantityChange::Remove);
        assert_eq!(QuantityChange::for_quantity(-3), QuantityChange::Remove);
        assert_eq!(QuantityChange::for_quantity(2), QuantityChange::Update(2));
    }

    #[test]
    fn test_replace_drops_zero_quantity_lines() {
        let cart = Cart::from_lines([
            line("a", Price::new(dec!(10)), 2),
            line("b", Price::new(dec!(5)), 0),
        ]);
        assert_eq!(cart.len(), 1);
        assert!(!cart.contains(&ProductId::new("b")));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_item_count_saturates() {
        let cart = Cart::from_lines([
            line("a", Price::new(dec!(1)), u32::MAX),
            line("b", Price::new(dec!(1)), 3),
        ]);
        assert_eq!(cart.item_count(), u32::MAX);
        assert_eq!(cart.summary(None).item_count, u32::MAX);
    }

    #[test]
    fn test_step_on_last_unit_removes() {
        let cart = Cart::from_lines([line("a", Price::new(dec!(10)), 1)]);
        let id = ProductId::new("a");
        assert_eq!(cart.step(&id, -1), Some(QuantityChange::Remove));
        assert_eq!(cart.step(&id, 1), Some(QuantityChange::Update(2)));
        assert_eq!(cart.step(&ProductId::new("zz"), 1), None);
    }

    #[test]
    fn test_line_flattening_keeps_first_image() {
        let cart = Cart::from_lines([line("a", Price::new(dec!(12.5)), 3)]);
        let item = &cart.items()[0];
        assert_eq!(item.image.as_deref(), Some("https://cdn/a.jpg"));
        assert_eq!(item.line_total().amount(), dec!(37.5));
    }

    #[test]
    fn test_backend_line_shape() {
        let json = r#"{"product": {"_id": "p1", "name": "Cap", "price": 15, "images": []}, "quantity": 2, "size": "M"}"#;
        let line: CartLine = serde_json::from_str(json).unwrap();
        let item = CartItem::from(line);
        assert_eq!(item.size.as_deref(), Some("M"));
        assert_eq!(item.image, None);
    }
}
