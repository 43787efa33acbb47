//! Catalogue types: products, images, reviews, and admin product drafts.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ImageId, Price, ProductId};

/// Maximum number of images a product may carry.
pub const MAX_PRODUCT_IMAGES: usize = 4;

/// A stored product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// Public URL of the image.
    pub url: String,
    /// Storage identifier used by the backend's image host.
    #[serde(default, alias = "public_id", skip_serializing_if = "Option::is_none")]
    pub public_id: Option<ImageId>,
}

/// A customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(alias = "user", alias = "username")]
    pub author: String,
    pub comment: String,
    #[serde(alias = "createdAt", alias = "date")]
    pub timestamp: DateTime<Utc>,
}

/// A product as served by the catalogue endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, rename = "size", alias = "sizes")]
    pub sizes: Vec<String>,
    #[serde(default, rename = "featuredAt", alias = "featured")]
    pub featured: bool,
    #[serde(default, alias = "comments")]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Decimal>,
}

const fn default_in_stock() -> bool {
    true
}

impl Product {
    /// URL of the first image, used as the thumbnail everywhere.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(|img| img.url.as_str())
    }

    /// Whether the product can be added to a cart.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.in_stock && self.stock > 0
    }

    /// Whether `size` is one of the offered sizes. Products without sizes
    /// accept no size selection.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s.eq_ignore_ascii_case(size))
    }

    /// Case-insensitive match on name, description, or category.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.category.to_lowercase().contains(&query)
    }
}

/// Sort orders for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Keep backend order.
    #[default]
    Featured,
    PriceLowToHigh,
    PriceHighToLow,
    Name,
}

impl std::str::FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "price-low" | "price-asc" => Ok(Self::PriceLowToHigh),
            "price-high" | "price-desc" => Ok(Self::PriceHighToLow),
            "name" => Ok(Self::Name),
            _ => Err(format!("invalid sort: {s}")),
        }
    }
}

/// Filter for the product listing page.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Free-text search over name, description, and category.
    pub query: Option<String>,
    /// Exact category (case-insensitive).
    pub category: Option<String>,
    /// Only products flagged for promotional placement.
    pub featured_only: bool,
    /// Hide products that cannot be bought.
    pub in_stock_only: bool,
    pub sort: ProductSort,
}

impl ProductFilter {
    /// Apply the filter and sort to a catalogue.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut matched: Vec<&Product> = products
            .iter()
            .filter(|p| self.query.as_deref().is_none_or(|q| p.matches_query(q)))
            .filter(|p| {
                self.category
                    .as_deref()
                    .is_none_or(|c| p.category.eq_ignore_ascii_case(c))
            })
            .filter(|p| !self.featured_only || p.featured)
            .filter(|p| !self.in_stock_only || p.is_available())
            .collect();

        match self.sort {
            ProductSort::Featured => {}
            ProductSort::PriceLowToHigh => matched.sort_by_key(|p| p.price),
            ProductSort::PriceHighToLow => matched.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::Name => matched.sort_by_key(|p| p.name.to_lowercase()),
        }
        matched
    }
}

/// Distinct categories in catalogue order.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products {
        let category = product.category.as_str();
        if !category.is_empty() && !seen.iter().any(|c| c.eq_ignore_ascii_case(category)) {
            seen.push(category);
        }
    }
    seen
}

// =============================================================================
// Admin Drafts
// =============================================================================

/// Why a product draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("price cannot be negative")]
    NegativePrice,
    #[error("Maximum {} images allowed", MAX_PRODUCT_IMAGES)]
    TooManyImages,
}

/// Input for creating or updating a product.
///
/// Mirrors the admin product form: required fields are optional here so a
/// partially filled draft can be represented and rejected by [`validate`].
///
/// [`validate`]: ProductDraft::validate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Option<Decimal>,
    pub category: String,
    pub stock: Option<u32>,
    pub in_stock: bool,
    pub featured: bool,
    pub features: Vec<String>,
    pub sizes: Vec<String>,
    /// Images already stored on the backend (kept on update).
    pub existing_images: Vec<ProductImage>,
    /// New image files to upload.
    pub new_images: Vec<PathBuf>,
}

impl ProductDraft {
    /// A blank draft; new products are in stock unless stated otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self {
            in_stock: true,
            ..Self::default()
        }
    }

    /// Pre-fill a draft from an existing product for editing.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: Some(product.price.amount()),
            category: product.category.clone(),
            stock: Some(product.stock),
            in_stock: product.in_stock,
            featured: product.featured,
            features: product.features.clone(),
            sizes: product.sizes.clone(),
            existing_images: product.images.clone(),
            new_images: Vec::new(),
        }
    }

    /// Add a feature bullet. Blank input is ignored.
    pub fn add_feature(&mut self, feature: &str) {
        push_trimmed(&mut self.features, feature);
    }

    /// Add an offered size. Blank input is ignored.
    pub fn add_size(&mut self, size: &str) {
        push_trimmed(&mut self.sizes, size);
    }

    /// Queue image files for upload.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::TooManyImages`] and leaves the draft unchanged
    /// if the total would exceed [`MAX_PRODUCT_IMAGES`].
    pub fn add_images(&mut self, files: impl IntoIterator<Item = PathBuf>) -> Result<(), DraftError> {
        let files: Vec<PathBuf> = files.into_iter().collect();
        if self.image_count() + files.len() > MAX_PRODUCT_IMAGES {
            return Err(DraftError::TooManyImages);
        }
        self.new_images.extend(files);
        Ok(())
    }

    /// Total images after submission.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.existing_images.len() + self.new_images.len()
    }

    /// Required-field check run before submission.
    ///
    /// # Errors
    ///
    /// Returns the first class of problem found: missing fields, a negative
    /// price, or too many images.
    pub fn validate(&self) -> Result<(), DraftError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.price.is_none() {
            missing.push("price");
        }
        if self.stock.is_none() {
            missing.push("stock");
        }
        if !missing.is_empty() {
            return Err(DraftError::MissingFields(missing));
        }
        if self.price.is_some_and(|p| p.is_sign_negative()) {
            return Err(DraftError::NegativePrice);
        }
        if self.image_count() > MAX_PRODUCT_IMAGES {
            return Err(DraftError::TooManyImages);
        }
        Ok(())
    }
}

fn push_trimmed(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        list.push(value.to_owned());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn product(id: &str, name: &str, price: Decimal, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: format!("{name} description"),
            price: Price::new(price),
            category: category.to_string(),
            stock: 5,
            in_stock: true,
            images: vec![],
            features: vec![],
            sizes: vec![],
            featured: false,
            reviews: vec![],
            rating: None,
        }
    }

    #[test]
    fn test_product_deserializes_backend_shape() {
        let json = r#"{
            "_id": "65f0",
            "name": "Linen Shirt",
            "description": "Breathable",
            "price": 49.5,
            "category": "Shirts",
            "stock": 12,
            "inStock": true,
            "images": [{"url": "https://cdn/x.jpg", "public_id": "shop/x"}],
            "features": ["Organic"],
            "size": ["S", "M"],
            "featuredAt": true,
            "reviews": [{"author": "Ana", "comment": "Great", "timestamp": "2025-01-02T03:04:05Z"}]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "65f0");
        assert_eq!(product.price.amount(), dec!(49.5));
        assert_eq!(product.sizes, vec!["S", "M"]);
        assert!(product.featured);
        assert_eq!(product.primary_image(), Some("https://cdn/x.jpg"));
        assert_eq!(
            product.images[0].public_id.as_ref().map(ImageId::as_str),
            Some("shop/x")
        );
        assert_eq!(product.reviews[0].author, "Ana");
    }

    #[test]
    fn test_product_defaults_for_sparse_payload() {
        let product: Product =
            serde_json::from_str(r#"{"_id": "1", "name": "Mug", "price": 8}"#).unwrap();
        assert!(product.in_stock);
        assert!(product.images.is_empty());
        assert!(!product.featured);
        assert!(!product.is_available()); // stock defaults to zero
    }

    #[test]
    fn test_filter_by_query_category_and_sort() {
        let catalogue = vec![
            product("1", "Canvas Tote", dec!(25), "Bags"),
            product("2", "Leather Tote", dec!(120), "Bags"),
            product("3", "Wool Scarf", dec!(40), "Accessories"),
        ];

        let filter = ProductFilter {
            query: Some("tote".to_string()),
            sort: ProductSort::PriceHighToLow,
            ..ProductFilter::default()
        };
        let names: Vec<_> = filter.apply(&catalogue).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Leather Tote", "Canvas Tote"]);

        let filter = ProductFilter {
            category: Some("accessories".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(filter.apply(&catalogue).len(), 1);
    }

    #[test]
    fn test_categories_are_distinct_in_order() {
        let catalogue = vec![
            product("1", "A", dec!(1), "Bags"),
            product("2", "B", dec!(1), "Shoes"),
            product("3", "C", dec!(1), "bags"),
        ];
        assert_eq!(categories(&catalogue), vec!["Bags", "Shoes"]);
    }

    #[test]
    fn test_draft_requires_fields() {
        let draft = ProductDraft::new();
        assert_eq!(
            draft.validate(),
            Err(DraftError::MissingFields(vec![
                "name",
                "description",
                "price",
                "stock"
            ]))
        );
    }

    #[test]
    fn test_draft_trims_features_and_sizes() {
        let mut draft = ProductDraft::new();
        draft.add_feature("  Waterproof ");
        draft.add_feature("   ");
        draft.add_size("XL");
        assert_eq!(draft.features, vec!["Waterproof"]);
        assert_eq!(draft.sizes, vec!["XL"]);
    }

    #[test]
    fn test_draft_image_limit_counts_existing() {
        let mut draft = ProductDraft::from_product(&product("1", "Cap", dec!(15), "Hats"));
        draft.existing_images = vec![
            ProductImage {
                url: "a".to_string(),
                public_id: None,
            };
            3
        ];
        assert!(draft.add_images([PathBuf::from("one.jpg")]).is_ok());
        assert_eq!(
            draft.add_images([PathBuf::from("two.jpg")]),
            Err(DraftError::TooManyImages)
        );
        assert_eq!(draft.image_count(), 4);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_rejects_negative_price() {
        let mut draft = ProductDraft::from_product(&product("1", "Cap", dec!(15), "Hats"));
        draft.price = Some(dec!(-1));
        assert_eq!(draft.validate(), Err(DraftError::NegativePrice));
    }
}
