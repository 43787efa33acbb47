//! Catalogue browsing.

use clap::Subcommand;
use shopfront_client::Shopfront;
use shopfront_core::catalog::{ProductFilter, ProductSort};
use shopfront_core::types::ProductId;

use super::CommandError;
use crate::render;

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List products
    List {
        /// Search name, description, and category
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// featured, price-low, price-high, or name
        #[arg(long, default_value = "featured")]
        sort: ProductSort,

        /// Only products flagged as featured
        #[arg(long)]
        featured: bool,

        /// Hide sold-out products
        #[arg(long)]
        in_stock: bool,
    },
    /// Show the featured products
    Featured,
    /// Show one product with its reviews
    Show { id: ProductId },
    /// List product categories
    Categories,
}

pub async fn run(shop: &Shopfront, action: ProductsAction) -> Result<(), CommandError> {
    let catalog = shop.catalog();
    match action {
        ProductsAction::List {
            search,
            category,
            sort,
            featured,
            in_stock,
        } => {
            let filter = ProductFilter {
                query: search,
                category,
                featured_only: featured,
                in_stock_only: in_stock,
                sort,
            };
            render::products(&catalog.list(&filter).await?);
        }
        ProductsAction::Featured => render::products(&catalog.featured().await?),
        ProductsAction::Show { id } => render::product(&catalog.product(&id).await?),
        ProductsAction::Categories => render::lines(&catalog.categories().await?),
    }
    Ok(())
}
