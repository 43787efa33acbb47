//! Checkout and order history.

use clap::{Args, Subcommand};
use shopfront_client::Shopfront;
use shopfront_core::order::{OrderFilter, PaymentMethod, ShippingInfo, StatusFilter};

use super::CommandError;
use crate::render;

#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    firstname: String,
    #[arg(long)]
    lastname: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    zip: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    email: String,

    /// card, cod, or paypal
    #[arg(long, default_value = "card")]
    payment: PaymentMethod,
}

#[derive(Subcommand)]
pub enum OrdersAction {
    /// Reload and list your orders
    List(FilterArgs),
    /// Show the order placed last on this device
    Last,
}

/// Search text and status selector shared with the admin order list.
#[derive(Args)]
pub struct FilterArgs {
    /// Match order number or item name
    #[arg(short, long, default_value = "")]
    search: String,

    /// all, or one order status
    #[arg(long, default_value = "all")]
    status: StatusFilter,
}

impl From<FilterArgs> for OrderFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            query: args.search,
            status: args.status,
        }
    }
}

pub async fn checkout(shop: &Shopfront, args: CheckoutArgs) -> Result<(), CommandError> {
    let shipping = ShippingInfo {
        firstname: args.firstname,
        lastname: args.lastname,
        address: args.address,
        city: args.city,
        zip: args.zip,
        state: args.state,
        phone: args.phone,
    };
    let order = shop
        .orders()
        .checkout(shipping, &args.email, args.payment)
        .await?;
    render::order(&order);
    Ok(())
}

pub async fn run(shop: &Shopfront, action: OrdersAction) -> Result<(), CommandError> {
    let orders = shop.orders();
    match action {
        OrdersAction::List(filter) => {
            orders.history().await?;
            render::orders(&orders.filtered(&filter.into()).await);
        }
        OrdersAction::Last => match orders.current().await {
            Some(order) => render::order(&order),
            None => render::lines(&["No order placed yet"]),
        },
    }
    Ok(())
}
