//! Cart endpoints. Every mutation answers with the canonical line list.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use shopfront_core::cart::CartLine;
use shopfront_core::types::ProductId;
use tracing::instrument;

use super::{ApiClient, ApiError, Scope};

/// Body of `cart/addItemCart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateQuantity<'a> {
    product_id: &'a ProductId,
    quantity: u32,
}

#[derive(Deserialize)]
struct CartItems {
    #[serde(default)]
    items: Vec<CartLine>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cart_items(&self) -> Result<Vec<CartLine>, ApiError> {
        let body: CartItems = self.get("cart/getCartItems", Scope::Customer).await?;
        Ok(body.items)
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %item.product_id))]
    pub async fn add_to_cart(&self, item: &AddToCart) -> Result<Vec<CartLine>, ApiError> {
        let body: CartItems = self
            .send_json(Method::POST, "cart/addItemCart", Scope::Customer, item)
            .await?;
        Ok(body.items)
    }

    /// Set a line's quantity. Callers route quantities below one to
    /// [`remove_from_cart`](Self::remove_from_cart) instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_cart_quantity(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, ApiError> {
        let body = UpdateQuantity {
            product_id,
            quantity,
        };
        let body: CartItems = self
            .send_json(Method::PUT, "cart/updateQuantity", Scope::Customer, &body)
            .await?;
        Ok(body.items)
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> Result<Vec<CartLine>, ApiError> {
        let path = format!("cart/remove/{product_id}");
        let body: CartItems = self
            .send(self.request(Method::DELETE, &path, Scope::Customer))
            .await?;
        Ok(body.items)
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::DELETE, "cart/clear", Scope::Customer))
            .await
    }
}
