//! Product browsing over the cached catalogue.

use shopfront_core::catalog::{Product, ProductFilter, categories};
use shopfront_core::types::ProductId;

use super::Shopfront;
use crate::error::{ClientError, Result};

/// Catalogue operations.
#[derive(Clone, Copy)]
pub struct CatalogService<'a> {
    pub(super) shop: &'a Shopfront,
}

impl CatalogService<'_> {
    /// Products matching `filter`, in the filter's sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be fetched.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let products = self
            .shop
            .api()
            .products()
            .await
            .map_err(|e| self.shop.fail("Failed to load products", e))?;
        Ok(filter.apply(&products).into_iter().cloned().collect())
    }

    /// # Errors
    ///
    /// Returns an error if the featured list cannot be fetched.
    pub async fn featured(&self) -> Result<Vec<Product>> {
        let products = self
            .shop
            .api()
            .featured_products()
            .await
            .map_err(|e| self.shop.fail("Failed to load products", e))?;
        Ok(products.as_ref().clone())
    }

    /// # Errors
    ///
    /// Returns [`ClientError::ProductNotFound`] for an unknown id, or an error
    /// if the catalogue cannot be fetched.
    pub async fn product(&self, id: &ProductId) -> Result<Product> {
        self.shop
            .api()
            .product(id)
            .await
            .map_err(|e| self.shop.fail("Failed to load product", e))?
            .ok_or_else(|| self.shop.fail("Product not found", ClientError::ProductNotFound(id.clone())))
    }

    /// Distinct categories in catalogue order.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be fetched.
    pub async fn categories(&self) -> Result<Vec<String>> {
        let products = self
            .shop
            .api()
            .products()
            .await
            .map_err(|e| self.shop.fail("Failed to load products", e))?;
        Ok(categories(&products).into_iter().map(str::to_owned).collect())
    }
}
