//! Customer order and admin order-management endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use shopfront_core::order::{NewOrder, Order};
use shopfront_core::types::{OrderId, OrderStatus};
use tracing::instrument;

use super::{ApiClient, ApiError, Scope};

#[derive(Deserialize)]
struct AllOrders {
    #[serde(default)]
    orders: Vec<Order>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate<'a> {
    status: OrderStatus,
    order_id: &'a OrderId,
}

impl ApiClient {
    /// The signed-in customer's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("orders/getOrders", Scope::Customer).await
    }

    /// # Errors
    ///
    /// Returns an error if the order is rejected or the request fails.
    #[instrument(skip(self, order), fields(items = order.order_items.len()))]
    pub async fn place_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.send_json(Method::POST, "orders/placeOrder", Scope::Customer, order)
            .await
    }

    /// Every order in the shop, for the admin order list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        let body: AllOrders = self.get("orders/getAllOrders", Scope::Admin).await?;
        Ok(body.orders)
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the change or the request
    /// fails.
    #[instrument(skip(self), fields(order_id = %order_id, status = %status))]
    pub async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let body = StatusUpdate { status, order_id };
        let request = self
            .request(Method::PATCH, "admin/updateOrderStatus", Scope::Admin)
            .json(&body);
        self.send_empty(request).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete_order(&self, order_id: &OrderId) -> Result<(), ApiError> {
        let path = format!("admin/deleteOrder/{order_id}");
        self.send_empty(self.request(Method::DELETE, &path, Scope::Admin))
            .await
    }
}
