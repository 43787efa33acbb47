//! Favourite items and the local membership set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// A favourited product snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteItem {
    #[serde(alias = "_id", alias = "productId")]
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FavouriteItem {
    /// Snapshot a product as it is favourited now.
    #[must_use]
    pub fn from_product(product: &Product, size: Option<String>) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.primary_image().map(str::to_owned),
            size,
            created_at: Some(Utc::now()),
        }
    }
}

/// Membership set of favourited products, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavouriteSet {
    items: Vec<FavouriteItem>,
}

impl FavouriteSet {
    #[must_use]
    pub fn items(&self) -> &[FavouriteItem] {
        &self.items
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Add an item unless one with the same product id is already present.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, item: FavouriteItem) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Flip membership of `item`. Returns `true` if it is now a favourite.
    pub fn toggle(&mut self, item: FavouriteItem) -> bool {
        if self.remove(&item.id) {
            false
        } else {
            self.items.push(item);
            true
        }
    }

    /// Replace the set wholesale, dropping duplicate product ids.
    pub fn replace(&mut self, items: impl IntoIterator<Item = FavouriteItem>) {
        self.items.clear();
        for item in items {
            self.insert(item);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn item(id: &str) -> FavouriteItem {
        FavouriteItem {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            price: Price::new(dec!(25)),
            image: None,
            size: None,
            created_at: None,
        }
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut set = FavouriteSet::default();
        assert!(set.toggle(item("a")));
        assert!(set.contains(&ProductId::new("a")));
        assert!(!set.toggle(item("a")));
        assert!(set.is_empty());
    }

    #[test]
    fn test_insert_ignores_duplicates() {
        let mut set = FavouriteSet::default();
        assert!(set.insert(item("a")));
        assert!(!set.insert(item("a")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_replace_dedupes_backend_list() {
        let mut set = FavouriteSet::default();
        set.insert(item("old"));
        set.replace([item("a"), item("b"), item("a")]);
        assert_eq!(set.len(), 2);
        assert!(!set.contains(&ProductId::new("old")));
    }

    #[test]
    fn test_persisted_shape_is_a_plain_list() {
        let mut set = FavouriteSet::default();
        set.insert(item("a"));
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "a");

        let back: FavouriteSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_backend_item_with_underscore_id() {
        let json = r#"{"_id": "p9", "name": "Scarf", "price": 19.5, "image": "/scarf.jpg"}"#;
        let fav: FavouriteItem = serde_json::from_str(json).unwrap();
        assert_eq!(fav.id.as_str(), "p9");
        assert_eq!(fav.image.as_deref(), Some("/scarf.jpg"));
    }
}
