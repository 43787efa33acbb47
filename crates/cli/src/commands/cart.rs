//! Cart commands.

use clap::Subcommand;
use shopfront_client::Shopfront;
use shopfront_core::types::ProductId;

use super::CommandError;
use crate::render;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cached cart and its price breakdown
    Show,
    /// Reload the cart from the backend
    Sync,
    /// Add a product
    Add {
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[arg(short, long)]
        size: Option<String>,
    },
    /// Set a line's quantity; zero or less removes it
    Set {
        id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Increase a line by one
    Inc { id: ProductId },
    /// Decrease a line by one, removing it at zero
    Dec { id: ProductId },
    /// Remove a line
    Remove { id: ProductId },
    /// Empty the cart
    Clear,
    /// Apply a promo code
    Promo { code: String },
    /// Drop the applied promo code
    RemovePromo,
}

pub async fn run(shop: &Shopfront, action: CartAction) -> Result<(), CommandError> {
    let cart = shop.cart();
    match action {
        CartAction::Show => {}
        CartAction::Sync => {
            cart.fetch().await?;
        }
        CartAction::Add { id, quantity, size } => {
            cart.add(&id, quantity, size).await?;
        }
        CartAction::Set { id, quantity } => {
            cart.update_quantity(&id, quantity).await?;
        }
        CartAction::Inc { id } => {
            cart.step(&id, 1).await?;
        }
        CartAction::Dec { id } => {
            cart.step(&id, -1).await?;
        }
        CartAction::Remove { id } => {
            cart.remove(&id).await?;
        }
        CartAction::Clear => cart.clear().await?,
        CartAction::Promo { code } => {
            cart.apply_promo(&code).await?;
        }
        CartAction::RemovePromo => cart.remove_promo().await?,
    }
    render::cart(&cart.current().await, &cart.summary().await);
    Ok(())
}
