//! Catalogue endpoints, cached.

use std::sync::Arc;

use serde::Deserialize;
use shopfront_core::catalog::Product;
use shopfront_core::types::ProductId;
use tracing::{debug, instrument};

use super::{ApiClient, ApiError, CatalogueKey, Scope};

/// The listing endpoints answer with either a bare array or `{products}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductList {
    Bare(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

impl From<ProductList> for Vec<Product> {
    fn from(list: ProductList) -> Self {
        match list {
            ProductList::Bare(products) | ProductList::Wrapped { products } => products,
        }
    }
}

impl ApiClient {
    /// Every product in the catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        self.cached_listing(CatalogueKey::All, "products/getAllProducts")
            .await
    }

    /// Products flagged for the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        self.cached_listing(CatalogueKey::Featured, "products/getFeaturedProducts")
            .await
    }

    /// Look a product up in the catalogue.
    ///
    /// Returns `Ok(None)` if no product has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be fetched.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Option<Product>, ApiError> {
        let products = self.products().await?;
        Ok(products.iter().find(|p| &p.id == id).cloned())
    }

    async fn cached_listing(
        &self,
        key: CatalogueKey,
        path: &str,
    ) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(products) = self.inner.catalogue.get(&key).await {
            debug!(?key, "Cache hit for catalogue");
            return Ok(products);
        }

        let list: ProductList = self.get(path, Scope::Customer).await?;
        let products = Arc::new(Vec::from(list));
        self.inner.catalogue.insert(key, Arc::clone(&products)).await;
        Ok(products)
    }
}
