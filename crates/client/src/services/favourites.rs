//! Favourites toggle.
//!
//! Signed-in customers go through the backend and the local set follows the
//! result. Guests keep their favourites on the device under the `favourites`
//! key; they are not merged into the account at login.

use shopfront_core::favourite::{FavouriteItem, FavouriteSet};
use shopfront_core::types::ProductId;
use tracing::instrument;

use super::{Notification, Shopfront};
use crate::error::{ClientError, Result};
use crate::storage::keys;

/// Favourites operations.
#[derive(Clone, Copy)]
pub struct FavouritesService<'a> {
    pub(super) shop: &'a Shopfront,
}

impl FavouritesService<'_> {
    pub async fn list(&self) -> FavouriteSet {
        self.shop.store().read(|s| s.favourites.clone()).await
    }

    pub async fn contains(&self, id: &ProductId) -> bool {
        self.shop.store().read(|s| s.favourites.contains(id)).await
    }

    /// Flip a product's membership. Returns `true` if it is now a favourite.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails (signed-in only) or the
    /// store cannot be persisted. On failure membership is unchanged.
    #[instrument(skip(self, item), fields(product_id = %item.id))]
    pub async fn toggle(&self, item: FavouriteItem) -> Result<bool> {
        let (signed_in, present) = self
            .shop
            .store()
            .read(|s| (s.is_signed_in(), s.favourites.contains(&item.id)))
            .await;

        if signed_in {
            let api = self.shop.api();
            let sent = if present {
                api.remove_favourite(&item.id).await
            } else {
                api.add_favourite(&item.id).await
            };
            sent.map_err(|e| self.shop.fail("Failed to update favourites", e))?;
        }

        let now_favourite = self
            .shop
            .store()
            .update(|s| s.favourites.toggle(item))
            .await?;

        if !signed_in {
            let favourites = self.list().await;
            self.shop
                .store()
                .storage()
                .set(keys::FAVOURITES, &favourites)
                .await?;
        }

        self.shop.notify(if now_favourite {
            Notification::success("Added to favourites")
        } else {
            Notification::info("Removed from favourites")
        });
        Ok(now_favourite)
    }

    /// Toggle a catalogue product by id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ProductNotFound`] if the product is neither a
    /// current favourite nor in the catalogue, or any error from
    /// [`toggle`](Self::toggle).
    pub async fn toggle_product(&self, id: &ProductId, size: Option<String>) -> Result<bool> {
        let existing = self
            .shop
            .store()
            .read(|s| s.favourites.items().iter().find(|f| &f.id == id).cloned())
            .await;
        let item = match existing {
            Some(item) => item,
            None => {
                let product = self
                    .shop
                    .api()
                    .product(id)
                    .await
                    .map_err(|e| self.shop.fail("Failed to update favourites", e))?
                    .ok_or_else(|| {
                        self.shop
                            .fail("Failed to update favourites", ClientError::ProductNotFound(id.clone()))
                    })?;
                FavouriteItem::from_product(&product, size)
            }
        };
        self.toggle(item).await
    }

    /// Replace the local set with the signed-in customer's favourites.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotSignedIn`] without a session that carries a
    /// user id, or an error if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<FavouriteSet> {
        let user_id = self
            .shop
            .store()
            .read(|s| s.auth.as_ref().and_then(|a| a.id.clone()))
            .await
            .ok_or_else(|| self.shop.fail("Failed to fetch favourites", ClientError::NotSignedIn))?;

        let items = self
            .shop
            .api()
            .favourites(&user_id)
            .await
            .map_err(|e| self.shop.fail("Failed to fetch favourites", e))?;

        let set = self
            .shop
            .store()
            .update(|s| {
                s.favourites.replace(items);
                s.favourites.clone()
            })
            .await?;
        Ok(set)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use shopfront_core::session::{BearerToken, UserSession};
    use shopfront_core::types::{Price, Role};

    use super::*;
    use crate::services::testing::offline_shop;
    use crate::services::{TransitionPolicy, Variant};
    use crate::store::Store;

    fn item(id: &str) -> FavouriteItem {
        FavouriteItem {
            id: ProductId::new(id),
            name: "Scarf".into(),
            price: Price::new(dec!(19)),
            image: None,
            size: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_guest_toggle_is_local_and_survives_reload() {
        let (shop, _) = offline_shop(TransitionPolicy::Enforce).await;

        assert!(shop.favourites().toggle(item("p1")).await.unwrap());
        assert!(shop.favourites().contains(&ProductId::new("p1")).await);

        let reloaded = Store::load(shop.store().storage().clone()).await.unwrap();
        assert!(reloaded.read(|s| s.favourites.contains(&ProductId::new("p1"))).await);

        assert!(!shop.favourites().toggle(item("p1")).await.unwrap());
        let stored: FavouriteSet = shop
            .store()
            .storage()
            .get(keys::FAVOURITES)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_signed_in_toggle_failure_keeps_membership() {
        let (shop, notifier) = offline_shop(TransitionPolicy::Enforce).await;
        shop.store()
            .update(|s| {
                s.auth = Some(UserSession {
                    id: None,
                    username: "ada".into(),
                    token: BearerToken::new("t"),
                    role: Role::User,
                });
            })
            .await
            .unwrap();

        let err = shop.favourites().toggle(item("p1")).await.unwrap_err();
        assert!(matches!(err, ClientError::Api(_)));
        assert!(!shop.favourites().contains(&ProductId::new("p1")).await);
        assert_eq!(notifier.of_variant(Variant::Destructive).len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_requires_user_id() {
        let (shop, _) = offline_shop(TransitionPolicy::Enforce).await;
        let err = shop.favourites().fetch().await.unwrap_err();
        assert!(matches!(err, ClientError::NotSignedIn));
    }
}
