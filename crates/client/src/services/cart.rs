//! Cart synchronisation.
//!
//! The backend owns the cart. Each mutation is one round trip whose response
//! replaces the cached items. Nothing is applied optimistically.

use shopfront_core::cart::{Cart, CartLine, QuantityChange};
use shopfront_core::pricing::{PriceBreakdown, PromoCode};
use shopfront_core::types::ProductId;
use tracing::instrument;

use super::{Notification, Shopfront};
use crate::api::AddToCart;
use crate::error::{ClientError, Result};
use crate::storage::keys;

/// Cart operations.
#[derive(Clone, Copy)]
pub struct CartService<'a> {
    pub(super) shop: &'a Shopfront,
}

impl CartService<'_> {
    /// The cached cart.
    pub async fn current(&self) -> Cart {
        self.shop.store().read(|s| s.cart.clone()).await
    }

    /// Derived totals for the cached cart and the applied promo code.
    pub async fn summary(&self) -> PriceBreakdown {
        self.shop
            .store()
            .read(|s| s.cart.summary(s.promo))
            .await
    }

    /// Reload the cart from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the cached cart is unchanged.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<Cart> {
        let lines = self
            .shop
            .api()
            .cart_items()
            .await
            .map_err(|e| self.shop.fail("Failed to load cart", e))?;
        self.replace(lines).await
    }

    /// Add a product, or more units of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the cached cart is unchanged.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add(&self, product_id: &ProductId, quantity: u32, size: Option<String>) -> Result<Cart> {
        let item = AddToCart {
            product_id: product_id.clone(),
            quantity: (quantity > 1).then_some(quantity),
            size,
        };
        let lines = self
            .shop
            .api()
            .add_to_cart(&item)
            .await
            .map_err(|e| self.shop.fail("Failed to add to cart", e))?;
        let cart = self.replace(lines).await?;
        self.shop.notify(Notification::success("Added to cart"));
        Ok(cart)
    }

    /// Set a line's quantity. Zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the cached cart is unchanged.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_quantity(&self, product_id: &ProductId, quantity: i64) -> Result<Cart> {
        self.apply(product_id, QuantityChange::for_quantity(quantity))
            .await
    }

    /// Step a line up or down by `delta` units.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ProductNotFound`] if the product is not in the
    /// cart, or an error if the request fails.
    pub async fn step(&self, product_id: &ProductId, delta: i64) -> Result<Cart> {
        let change = self
            .shop
            .store()
            .read(|s| s.cart.step(product_id, delta))
            .await
            .ok_or_else(|| {
                self.shop
                    .fail("Not in cart", ClientError::ProductNotFound(product_id.clone()))
            })?;
        self.apply(product_id, change).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails; the cached cart is unchanged.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&self, product_id: &ProductId) -> Result<Cart> {
        let lines = self
            .shop
            .api()
            .remove_from_cart(product_id)
            .await
            .map_err(|e| self.shop.fail("Failed to remove item", e))?;
        let cart = self.replace(lines).await?;
        self.shop.notify(Notification::info("Item removed from cart"));
        Ok(cart)
    }

    /// Empty the cart on the backend and locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the cached cart is unchanged.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        self.shop
            .api()
            .clear_cart()
            .await
            .map_err(|e| self.shop.fail("Failed to clear cart", e))?;
        self.replace(Vec::new()).await?;
        Ok(())
    }

    /// Apply a promo code typed by the shopper.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Promo`] for an unknown code; the applied code,
    /// if any, stays as it was.
    pub async fn apply_promo(&self, input: &str) -> Result<PromoCode> {
        let code = PromoCode::parse(input).map_err(|e| {
            self.shop
                .notify(Notification::destructive("Invalid promo code", e.to_string()));
            ClientError::from(e)
        })?;
        self.shop
            .store()
            .update(|s| s.promo = Some(code))
            .await?;
        self.shop.notify(
            Notification::success("Promo code applied")
                .with_description(format!("{code} applied to your order")),
        );
        Ok(code)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be persisted.
    pub async fn remove_promo(&self) -> Result<()> {
        self.shop.store().update(|s| s.promo = None).await?;
        Ok(())
    }

    async fn apply(&self, product_id: &ProductId, change: QuantityChange) -> Result<Cart> {
        match change {
            QuantityChange::Remove => self.remove(product_id).await,
            QuantityChange::Update(quantity) => {
                let lines = self
                    .shop
                    .api()
                    .update_cart_quantity(product_id, quantity)
                    .await
                    .map_err(|e| self.shop.fail("Failed to update quantity", e))?;
                self.replace(lines).await
            }
        }
    }

    async fn replace(&self, lines: Vec<CartLine>) -> Result<Cart> {
        let cart = self
            .shop
            .store()
            .update(|s| {
                s.cart.replace(lines);
                s.cart.clone()
            })
            .await?;
        self.shop
            .store()
            .mirror(keys::CART_ITEMS, cart.items())
            .await;
        Ok(cart)
    }
}
