//! Admin dashboard aggregates.
//!
//! The backend computes every figure; these types only describe the payloads
//! of the four `analytics/*` endpoints. Every field defaults when absent so a
//! partially populated store still renders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderStatus, Price, ProductId};

/// Stock level below which a product is shown as critical.
pub const CRITICAL_STOCK: u32 = 5;

/// Revenue bucketed by a key (a date or a category).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RevenueBucket {
    #[serde(rename = "_id")]
    pub key: String,
    #[serde(default)]
    pub total: Price,
}

/// A count bucketed by a key (a date, a status, or a location).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountBucket {
    #[serde(rename = "_id")]
    pub key: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesSummary {
    pub total_sales: Price,
    pub sales_by_date: Vec<RevenueBucket>,
    pub sales_by_category: Vec<RevenueBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrdersSummary {
    pub order_status: Vec<CountBucket>,
    pub avg_order_value: Price,
    pub orders_by_date: Vec<CountBucket>,
}

impl OrdersSummary {
    /// Count for one status, zero when the backend omitted it.
    #[must_use]
    pub fn count_for(&self, status: OrderStatus) -> u64 {
        self.order_status
            .iter()
            .filter(|bucket| bucket.key.parse::<OrderStatus>().ok() == Some(status))
            .map(|bucket| bucket.count)
            .sum()
    }

    /// Orders across all statuses.
    #[must_use]
    pub fn total_orders(&self) -> u64 {
        self.order_status.iter().map(|bucket| bucket.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopProduct {
    pub name: String,
    pub total_sold: u64,
    pub total_revenue: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub stock: u32,
}

impl LowStockProduct {
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        self.stock < CRITICAL_STOCK
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub avg_rating: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductsSummary {
    pub top_products: Vec<TopProduct>,
    pub low_stock: Vec<LowStockProduct>,
    pub top_rated: Vec<RatedProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopCustomer {
    pub name: String,
    pub total_spent: Price,
    pub order_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomersSummary {
    pub top_customers: Vec<TopCustomer>,
    pub customer_locations: Vec<CountBucket>,
    /// New customers in the last 30 days.
    pub new_customers: u64,
}

/// All four aggregates, fetched together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dashboard {
    pub sales: SalesSummary,
    pub orders: OrdersSummary,
    pub products: ProductsSummary,
    pub customers: CustomersSummary,
}
