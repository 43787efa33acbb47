//! Plain-text output for command results.

#![allow(clippy::print_stdout)]

use std::collections::BTreeMap;

use shopfront_core::analytics::Dashboard;
use shopfront_core::cart::Cart;
use shopfront_core::catalog::Product;
use shopfront_core::favourite::FavouriteSet;
use shopfront_core::order::Order;
use shopfront_core::pricing::PriceBreakdown;
use shopfront_core::session::{AdminSession, UserSession};

pub fn lines<S: AsRef<str>>(lines: &[S]) {
    for line in lines {
        println!("{}", line.as_ref());
    }
}

pub fn sessions(user: Option<&UserSession>, admin: Option<&AdminSession>) {
    match user {
        Some(user) => println!("customer: {}", user.username),
        None => println!("customer: guest"),
    }
    if let Some(admin) = admin {
        println!("admin:    {} ({})", admin.username, admin.role);
    }
}

pub fn products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found");
        return;
    }
    for product in products {
        let availability = if product.is_available() {
            format!("{} in stock", product.stock)
        } else {
            "sold out".to_string()
        };
        println!(
            "{:<26} {:<32} {:>10}  {:<12} {}",
            product.id,
            product.name,
            product.price.display(),
            product.category,
            availability
        );
    }
}

pub fn product(product: &Product) {
    println!("{} ({})", product.name, product.id);
    println!("{}", product.price.display());
    if !product.category.is_empty() {
        println!("Category: {}", product.category);
    }
    if !product.sizes.is_empty() {
        println!("Sizes: {}", product.sizes.join(", "));
    }
    if !product.description.is_empty() {
        println!("\n{}", product.description);
    }
    for feature in &product.features {
        println!("  - {feature}");
    }
    if !product.reviews.is_empty() {
        println!("\nReviews:");
        for review in &product.reviews {
            println!(
                "  {} ({}): {}",
                review.author,
                review.timestamp.format("%Y-%m-%d"),
                review.comment
            );
        }
    }
}

pub fn cart(cart: &Cart, summary: &PriceBreakdown) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for item in cart.items() {
        let size = item.size.as_deref().map(|s| format!(" [{s}]")).unwrap_or_default();
        println!(
            "{:<26} {}{size} x{} @ {}",
            item.id,
            item.name,
            item.quantity,
            item.price.display()
        );
    }
    println!();
    println!("Subtotal ({} items): {:>10}", summary.item_count, summary.subtotal.display());
    if let Some(promo) = summary.promo {
        println!("Discount ({promo}): {:>16}", format!("-{}", summary.discount.display()));
    }
    let shipping = if summary.shipping.is_zero() {
        "Free".to_string()
    } else {
        summary.shipping.display()
    };
    println!("Shipping: {shipping:>22}");
    if let Some(hint) = free_shipping_hint(summary) {
        println!("{hint}");
    }
    println!("Tax: {:>27}", summary.tax.display());
    println!("Total: {:>25}", summary.total.display());
}

fn free_shipping_hint(summary: &PriceBreakdown) -> Option<String> {
    summary
        .amount_to_free_shipping()
        .map(|remaining| format!("Add {} more for free shipping!", remaining.display()))
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders found");
        return;
    }
    for order in orders {
        let date = order
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "{:<26} {:<10} {:<11} {:>3} items {:>10}",
            order.display_id(),
            date,
            order.status,
            order.item_count(),
            order.total.display()
        );
    }
}

pub fn order(order: &Order) {
    let status = if order.status.is_terminal() {
        format!("{}, final", order.status)
    } else {
        order.status.to_string()
    };
    println!("Order {} ({status})", order.display_id());
    for line in &order.items {
        println!(
            "  {} x{} {:>10}",
            line.name,
            line.quantity,
            line.line_total().display()
        );
    }
    println!("Total: {}", order.total.display());
    if let Some(tracking) = &order.tracking_number {
        println!("Tracking: {tracking}");
    }
    if let Some(eta) = order.estimated_delivery {
        println!("Estimated delivery: {eta}");
    }
}

pub fn status_counts(counts: &BTreeMap<&'static str, usize>) {
    for (status, count) in counts {
        println!("{status:<11} {count:>5}");
    }
}

pub fn favourites(favourites: &FavouriteSet) {
    if favourites.is_empty() {
        println!("No favourites yet");
        return;
    }
    for item in favourites.items() {
        println!("{:<26} {:<32} {:>10}", item.id, item.name, item.price.display());
    }
}

pub fn dashboard(dashboard: &Dashboard) {
    let Dashboard {
        sales,
        orders,
        products,
        customers,
    } = dashboard;

    println!("Sales");
    println!("  Total: {}", sales.total_sales.display());
    for bucket in &sales.sales_by_category {
        println!("  {:<20} {:>12}", bucket.key, bucket.total.display());
    }

    println!("\nOrders");
    println!("  Count: {}", orders.total_orders());
    println!("  Average value: {}", orders.avg_order_value.display());
    for bucket in &orders.order_status {
        println!("  {:<20} {:>12}", bucket.key, bucket.count);
    }

    println!("\nTop products");
    for product in &products.top_products {
        println!(
            "  {:<32} {:>6} sold {:>12}",
            product.name,
            product.total_sold,
            product.total_revenue.display()
        );
    }
    if !products.low_stock.is_empty() {
        println!("\nLow stock");
        for product in &products.low_stock {
            let marker = if product.is_critical() { "!" } else { " " };
            println!("{marker} {:<32} {:>6}", product.name, product.stock);
        }
    }

    println!("\nCustomers");
    println!("  New: {}", customers.new_customers);
    for customer in &customers.top_customers {
        println!(
            "  {:<32} {:>4} orders {:>12}",
            customer.name,
            customer.order_count,
            customer.total_spent.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use shopfront_core::pricing::calculate;
    use shopfront_core::types::Price;

    use super::*;

    #[test]
    fn test_free_shipping_hint_below_threshold() {
        let summary = calculate(&[(Price::from_cents(3_000), 2)], None);
        assert_eq!(
            free_shipping_hint(&summary).as_deref(),
            Some("Add $40.00 more for free shipping!")
        );
    }

    #[test]
    fn test_no_hint_once_shipping_is_free() {
        let summary = calculate(&[(Price::from_cents(6_000), 2)], None);
        assert!(free_shipping_hint(&summary).is_none());

        let empty = calculate::<(Price, u32)>(&[], None);
        assert!(free_shipping_hint(&empty).is_none());
    }
}
