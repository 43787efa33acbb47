//! Admin commands: orders, products, and analytics.
//!
//! Every action needs an admin session from `shop auth admin-login`.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use shopfront_client::Shopfront;
use shopfront_core::catalog::{DraftError, ProductDraft};
use shopfront_core::types::{OrderId, OrderStatus, ProductId};

use super::CommandError;
use super::orders::FilterArgs;
use crate::render;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Sales, order, product, and customer dashboard
    Analytics,
}

#[derive(Subcommand)]
pub enum OrdersAction {
    /// Reload and list every order
    List(FilterArgs),
    /// Orders per status
    Counts,
    /// Move an order to a new status
    SetStatus { id: OrderId, status: OrderStatus },
    /// Delete an order
    Delete { id: OrderId },
}

#[derive(Subcommand)]
pub enum ProductsAction {
    /// Create a product
    Create(ProductArgs),
    /// Update a product; unset fields keep their current values
    Update {
        id: ProductId,

        #[command(flatten)]
        fields: ProductArgs,
    },
    /// Delete a product
    Delete { id: ProductId },
}

/// Product form fields.
#[derive(Args)]
pub struct ProductArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    stock: Option<u32>,

    /// Mark the product as sold out
    #[arg(long)]
    sold_out: bool,

    /// Flag for promotional placement
    #[arg(long)]
    featured: bool,

    /// Feature bullet (repeatable)
    #[arg(long = "feature")]
    features: Vec<String>,

    /// Offered size (repeatable)
    #[arg(long = "size")]
    sizes: Vec<String>,

    /// Image file to upload (repeatable)
    #[arg(long = "image")]
    images: Vec<PathBuf>,
}

impl ProductArgs {
    /// Overlay the given fields on `draft`.
    fn apply_to(self, draft: &mut ProductDraft) -> Result<(), DraftError> {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if self.price.is_some() {
            draft.price = self.price;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if self.stock.is_some() {
            draft.stock = self.stock;
        }
        if self.sold_out {
            draft.in_stock = false;
        }
        if self.featured {
            draft.featured = true;
        }
        for feature in &self.features {
            draft.add_feature(feature);
        }
        for size in &self.sizes {
            draft.add_size(size);
        }
        draft.add_images(self.images)
    }
}

pub async fn run(shop: &Shopfront, action: AdminAction) -> Result<(), CommandError> {
    match action {
        AdminAction::Orders { action } => orders(shop, action).await,
        AdminAction::Products { action } => products(shop, action).await,
        AdminAction::Analytics => {
            render::dashboard(&shop.admin().dashboard().await?);
            Ok(())
        }
    }
}

async fn orders(shop: &Shopfront, action: OrdersAction) -> Result<(), CommandError> {
    let orders = shop.orders();
    match action {
        OrdersAction::List(filter) => {
            orders.admin_list().await?;
            render::orders(&orders.admin_filtered(&filter.into()).await);
        }
        OrdersAction::Counts => {
            orders.admin_list().await?;
            render::status_counts(&orders.status_counts().await);
        }
        OrdersAction::SetStatus { id, status } => {
            // Enforcing the status flow needs the order's current status
            orders.admin_list().await?;
            orders.update_status(&id, status).await?;
        }
        OrdersAction::Delete { id } => orders.delete(&id).await?,
    }
    Ok(())
}

async fn products(shop: &Shopfront, action: ProductsAction) -> Result<(), CommandError> {
    let admin = shop.admin();
    match action {
        ProductsAction::Create(fields) => {
            let mut draft = ProductDraft::new();
            fields.apply_to(&mut draft)?;
            admin.create_product(&draft).await?;
        }
        ProductsAction::Update { id, fields } => {
            let mut draft = ProductDraft::from_product(&shop.catalog().product(&id).await?);
            fields.apply_to(&mut draft)?;
            admin.update_product(&id, &draft).await?;
        }
        ProductsAction::Delete { id } => admin.delete_product(&id).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use rust_decimal::Decimal;

    use super::*;

    #[derive(Parser)]
    struct Form {
        #[command(flatten)]
        fields: ProductArgs,
    }

    fn parse(args: &[&str]) -> ProductArgs {
        Form::try_parse_from(std::iter::once("form").chain(args.iter().copied()))
            .unwrap()
            .fields
    }

    #[test]
    fn test_update_keeps_unset_fields() {
        let mut draft = ProductDraft {
            name: "Lamp".into(),
            description: "Brass".into(),
            price: Some(Decimal::new(6000, 2)),
            stock: Some(3),
            ..ProductDraft::new()
        };
        parse(&["--price", "55.5", "--feature", "  dimmable "])
            .apply_to(&mut draft)
            .unwrap();

        assert_eq!(draft.name, "Lamp");
        assert_eq!(draft.price, Some(Decimal::new(555, 1)));
        assert_eq!(draft.features, vec!["dimmable".to_string()]);
        assert!(draft.in_stock);
    }

    #[test]
    fn test_too_many_images_rejected() {
        let mut draft = ProductDraft::new();
        let err = parse(&[
            "--image", "a.png", "--image", "b.png", "--image", "c.png", "--image", "d.png",
            "--image", "e.png",
        ])
        .apply_to(&mut draft)
        .unwrap_err();
        assert_eq!(err, DraftError::TooManyImages);
    }
}
