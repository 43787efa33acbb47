//! Favourites endpoints for signed-in customers.

use reqwest::Method;
use serde::Serialize;
use shopfront_core::favourite::FavouriteItem;
use shopfront_core::types::{ProductId, UserId};
use tracing::instrument;

use super::{ApiClient, ApiError, Scope};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FavouriteBody<'a> {
    product_id: &'a ProductId,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn favourites(&self, user_id: &UserId) -> Result<Vec<FavouriteItem>, ApiError> {
        self.get(&format!("user/{user_id}/favourites"), Scope::Customer)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_favourite(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let request = self
            .request(Method::POST, "favourites/add", Scope::Customer)
            .json(&FavouriteBody { product_id });
        self.send_empty(request).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_favourite(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let path = format!("favourites/remove/{product_id}");
        self.send_empty(self.request(Method::DELETE, &path, Scope::Customer))
            .await
    }
}
