//! Checkout, order history, and admin order management.

use std::collections::BTreeMap;

use shopfront_core::order::{
    NewOrder, Order, OrderFilter, PaymentMethod, ShippingInfo, counts_by_status,
};
use shopfront_core::types::{OrderId, OrderStatus};
use tracing::instrument;

use super::{Notification, Shopfront};
use crate::error::{ClientError, Result};
use crate::storage::keys;

/// Who decides whether a status change is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Check the transition graph locally; illegal moves never reach the
    /// backend.
    #[default]
    Enforce,
    /// Send any status and let the backend decide.
    Delegate,
}

/// Order operations.
#[derive(Clone, Copy)]
pub struct OrdersService<'a> {
    pub(super) shop: &'a Shopfront,
}

impl OrdersService<'_> {
    // =========================================================================
    // Customer
    // =========================================================================

    /// Reload the signed-in customer's order history.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotSignedIn`] without a session, or an error if
    /// the request fails.
    #[instrument(skip(self))]
    pub async fn history(&self) -> Result<Vec<Order>> {
        if !self.shop.store().read(|s| s.is_signed_in()).await {
            return Err(self.shop.fail("Failed to load orders", ClientError::NotSignedIn));
        }
        let orders = self
            .shop
            .api()
            .my_orders()
            .await
            .map_err(|e| self.shop.fail("Failed to load orders", e))?;
        self.shop
            .store()
            .update(|s| s.orders.history.clone_from(&orders))
            .await?;
        Ok(orders)
    }

    /// Cached history narrowed by search text and status.
    pub async fn filtered(&self, filter: &OrderFilter) -> Vec<Order> {
        self.shop
            .store()
            .read(|s| filter.apply(&s.orders.history).into_iter().cloned().collect())
            .await
    }

    /// Place an order for the cached cart.
    ///
    /// Required fields are checked before anything is sent. On success the
    /// order becomes the current order, and the cart and promo code are
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Checkout`] for missing input, or an error if the
    /// backend rejects the order.
    #[instrument(skip(self, shipping_info, email))]
    pub async fn checkout(
        &self,
        shipping_info: ShippingInfo,
        email: &str,
        payment_method: PaymentMethod,
    ) -> Result<Order> {
        let new_order = self
            .shop
            .store()
            .read(|s| NewOrder::from_cart(&s.cart, s.promo, shipping_info, email, payment_method))
            .await
            .map_err(|e| self.shop.fail("Checkout failed", e))?;

        let order = self
            .shop
            .api()
            .place_order(&new_order)
            .await
            .map_err(|e| self.shop.fail("Checkout failed", e))?;

        self.shop
            .store()
            .update(|s| {
                s.orders.current = Some(order.clone());
                s.orders.history.insert(0, order.clone());
                s.cart.clear();
                s.promo = None;
            })
            .await?;
        self.shop.store().mirror(keys::ORDER, &order).await;
        self.shop.store().unmirror(keys::CART_ITEMS).await;

        tracing::info!(order_id = %order.display_id(), total = %order.total, "Order placed");
        self.shop.notify(
            Notification::success("Order placed")
                .with_description(format!("Order {} is confirmed", order.display_id())),
        );
        Ok(order)
    }

    /// The order placed most recently on this device.
    pub async fn current(&self) -> Option<Order> {
        self.shop.store().read(|s| s.orders.current.clone()).await
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Reload every order for the admin list.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AdminRequired`] without an admin session, or an
    /// error if the request fails.
    #[instrument(skip(self))]
    pub async fn admin_list(&self) -> Result<Vec<Order>> {
        self.shop.require_admin().await?;
        let orders = self
            .shop
            .api()
            .all_orders()
            .await
            .map_err(|e| self.shop.fail("Failed to load orders", e))?;
        self.shop
            .store()
            .update(|s| s.orders.admin.clone_from(&orders))
            .await?;
        Ok(orders)
    }

    /// Cached admin list narrowed by search text and status.
    pub async fn admin_filtered(&self, filter: &OrderFilter) -> Vec<Order> {
        self.shop
            .store()
            .read(|s| filter.apply(&s.orders.admin).into_iter().cloned().collect())
            .await
    }

    /// Orders per status in the cached admin list.
    pub async fn status_counts(&self) -> BTreeMap<&'static str, usize> {
        self.shop
            .store()
            .read(|s| counts_by_status(&s.orders.admin))
            .await
    }

    /// Move an order to `status`.
    ///
    /// Under [`TransitionPolicy::Enforce`] an illegal move is rejected before
    /// any request. On success only the affected order's status changes in
    /// the cached list.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidTransition`], [`ClientError::OrderNotFound`]
    /// when enforcing against an order that is not cached, or an error if the
    /// backend rejects the change.
    #[instrument(skip(self), fields(order_id = %order_id, status = %status))]
    pub async fn update_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<()> {
        const TITLE: &str = "Failed to update order status";
        self.shop.require_admin().await?;

        if self.shop.policy() == TransitionPolicy::Enforce {
            let current = self
                .shop
                .store()
                .read(|s| {
                    s.orders
                        .admin
                        .iter()
                        .find(|o| &o.id == order_id)
                        .map(|o| o.status)
                })
                .await
                .ok_or_else(|| self.shop.fail(TITLE, ClientError::OrderNotFound(order_id.clone())))?;
            current
                .transition_to(status)
                .map_err(|e| self.shop.fail(TITLE, e))?;
        }

        self.shop
            .api()
            .update_order_status(order_id, status)
            .await
            .map_err(|e| self.shop.fail(TITLE, e))?;

        self.shop
            .store()
            .update(|s| {
                for order in s.orders.admin.iter_mut().filter(|o| &o.id == order_id) {
                    order.status = status;
                }
            })
            .await?;
        self.shop.notify(
            Notification::success("Order status updated")
                .with_description(format!("Order is now {status}")),
        );
        Ok(())
    }

    /// Delete an order and drop it from the cached admin list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the cached list is unchanged.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete(&self, order_id: &OrderId) -> Result<()> {
        self.shop.require_admin().await?;
        self.shop
            .api()
            .delete_order(order_id)
            .await
            .map_err(|e| self.shop.fail("Failed to delete order", e))?;
        self.shop
            .store()
            .update(|s| s.orders.admin.retain(|o| &o.id != order_id))
            .await?;
        self.shop.notify(Notification::success("Order deleted"));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shopfront_core::session::{AdminSession, BearerToken};
    use shopfront_core::types::{Price, Role};

    use super::*;
    use crate::services::Variant;
    use crate::services::testing::offline_shop;

    fn order(id: &str, status: OrderStatus) -> Order {
        serde_json::from_value(serde_json::json!({
            "_id": id, "status": status, "total": 10, "items": []
        }))
        .unwrap()
    }

    async fn sign_in_admin(shop: &Shopfront, orders: Vec<Order>) {
        shop.store()
            .update(|s| {
                s.admin_auth = Some(AdminSession {
                    username: "root".into(),
                    token: BearerToken::new("t"),
                    role: Role::Admin,
                });
                s.orders.admin = orders;
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_illegal_transition_rejected_before_request() {
        let (shop, notifier) = offline_shop(TransitionPolicy::Enforce).await;
        sign_in_admin(&shop, vec![order("o1", OrderStatus::Delivered)]).await;

        let err = shop
            .orders()
            .update_status(&OrderId::new("o1"), OrderStatus::Pending)
            .await
            .unwrap_err();
        // A connection error would mean the request went out
        assert!(matches!(err, ClientError::InvalidTransition(_)));
        assert_eq!(notifier.of_variant(Variant::Destructive).len(), 1);
    }

    #[tokio::test]
    async fn test_delegate_sends_any_status() {
        let (shop, _) = offline_shop(TransitionPolicy::Delegate).await;
        sign_in_admin(&shop, vec![order("o1", OrderStatus::Delivered)]).await;

        let err = shop
            .orders()
            .update_status(&OrderId::new("o1"), OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api(_)));
        let status = shop.store().read(|s| s.orders.admin[0].status).await;
        assert_eq!(status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_admin_actions_require_admin_session() {
        let (shop, _) = offline_shop(TransitionPolicy::Enforce).await;
        let err = shop.orders().admin_list().await.unwrap_err();
        assert!(matches!(err, ClientError::AdminRequired));
    }

    #[tokio::test]
    async fn test_checkout_validates_before_sending() {
        let (shop, notifier) = offline_shop(TransitionPolicy::Enforce).await;
        let err = shop
            .orders()
            .checkout(ShippingInfo::default(), "a@b.co", PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Checkout(_)));
        assert_eq!(notifier.take().len(), 1);
        assert!(shop.orders().current().await.is_none());
    }

    #[tokio::test]
    async fn test_counts_from_cached_admin_list() {
        let (shop, _) = offline_shop(TransitionPolicy::Enforce).await;
        sign_in_admin(
            &shop,
            vec![
                order("o1", OrderStatus::Pending),
                order("o2", OrderStatus::Pending),
                order("o3", OrderStatus::Shipped),
            ],
        )
        .await;
        let counts = shop.orders().status_counts().await;
        assert_eq!(counts.get("pending"), Some(&2));
        assert_eq!(counts.get("shipped"), Some(&1));
        assert_eq!(counts.get("delivered"), Some(&0));

        let total: Price = shop
            .store()
            .read(|s| s.orders.admin.iter().map(|o| o.total).sum())
            .await;
        assert_eq!(total, Price::from_cents(3000));
    }
}
