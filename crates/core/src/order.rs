//! Orders, checkout input, and order-history filtering.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, CartItem};
use crate::pricing::PromoCode;
use crate::types::{Email, EmailError, OrderId, OrderStatus, Price};

// =============================================================================
// Orders
// =============================================================================

/// A line on a placed order.
///
/// Lines are snapshots taken at checkout and do not follow later product
/// edits, so historical orders stay as they were bought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl OrderLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// An order as returned by the order endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    /// Human-facing order number; falls back to `id` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, alias = "orderItems")]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(alias = "totalCost")]
    pub total: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_info: Option<ShippingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<NaiveDate>,
    #[serde(default, alias = "date", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// The order number to show the customer.
    #[must_use]
    pub fn display_id(&self) -> &str {
        self.order_id.as_deref().unwrap_or_else(|| self.id.as_str())
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .map(|line| line.quantity)
            .fold(0, u32::saturating_add)
    }

    /// Case-insensitive match on the order number or any item name.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.id.as_str().to_lowercase().contains(&query)
            || self.display_id().to_lowercase().contains(&query)
            || self
                .items
                .iter()
                .any(|line| line.name.to_lowercase().contains(&query))
    }
}

/// Status selector on the order history page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Search and status filter over a list of orders.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub query: String,
    pub status: StatusFilter,
}

impl OrderFilter {
    /// Orders matching both the search text and the status selector.
    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders
            .iter()
            .filter(|order| order.matches_query(&self.query))
            .filter(|order| match self.status {
                StatusFilter::All => true,
                StatusFilter::Only(status) => order.status == status,
            })
            .collect()
    }
}

/// Number of orders in each status, with every status present.
#[must_use]
pub fn counts_by_status(orders: &[Order]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> =
        OrderStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    for order in orders {
        *counts.entry(order.status.as_str()).or_insert(0) += 1;
    }
    counts
}

// =============================================================================
// Checkout
// =============================================================================

/// Where an order ships to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub firstname: String,
    pub lastname: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub state: String,
    pub phone: String,
}

impl ShippingInfo {
    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("firstname", &self.firstname),
            ("lastname", &self.lastname),
            ("address", &self.address),
            ("city", &self.city),
            ("zip", &self.zip),
            ("state", &self.state),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Contact details sent with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub email: Email,
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    #[serde(rename = "cod")]
    CashOnDelivery,
    Paypal,
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "cod" | "cash" => Ok(Self::CashOnDelivery),
            "paypal" => Ok(Self::Paypal),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Why an order cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("your cart is empty")]
    EmptyCart,
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
}

/// Request body for placing an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub order_items: Vec<CartItem>,
    /// Total rounded to cents, as charged.
    pub total_cost: Price,
    pub shipping_info: ShippingInfo,
    pub payment_method: PaymentMethod,
    pub user_info: UserInfo,
}

impl NewOrder {
    /// Build an order from the cached cart after required-field checks.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] if the cart is empty, a shipping field is
    /// blank, or the email does not parse.
    pub fn from_cart(
        cart: &Cart,
        promo: Option<PromoCode>,
        shipping_info: ShippingInfo,
        email: &str,
        payment_method: PaymentMethod,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let missing = shipping_info.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }
        let email = Email::parse(email)?;
        let summary = cart.summary(promo);

        Ok(Self {
            order_items: cart.items().to_vec(),
            total_cost: Price::new(summary.total.rounded()),
            shipping_info,
            payment_method,
            user_info: UserInfo { email },
        })
    }
}
