//! Admin analytics endpoints.

use shopfront_core::analytics::{
    CustomersSummary, Dashboard, OrdersSummary, ProductsSummary, SalesSummary,
};
use tracing::instrument;

use super::{ApiClient, ApiError, Scope};

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn sales_summary(&self) -> Result<SalesSummary, ApiError> {
        self.get("analytics/sales", Scope::Admin).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn orders_summary(&self) -> Result<OrdersSummary, ApiError> {
        self.get("analytics/orders", Scope::Admin).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn products_summary(&self) -> Result<ProductsSummary, ApiError> {
        self.get("analytics/products", Scope::Admin).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn customers_summary(&self) -> Result<CustomersSummary, ApiError> {
        self.get("analytics/customers", Scope::Admin).await
    }

    /// Fetch all four aggregates concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first error if any of the requests fails.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        let (sales, orders, products, customers) = tokio::try_join!(
            self.sales_summary(),
            self.orders_summary(),
            self.products_summary(),
            self.customers_summary(),
        )?;

        Ok(Dashboard {
            sales,
            orders,
            products,
            customers,
        })
    }
}
