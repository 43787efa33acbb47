//! Favourites commands.

use clap::Subcommand;
use shopfront_client::Shopfront;
use shopfront_core::types::ProductId;

use super::CommandError;
use crate::render;

#[derive(Subcommand)]
pub enum FavouritesAction {
    /// Show favourites
    List,
    /// Reload favourites from the backend (signed-in only)
    Sync,
    /// Add or remove a product
    Toggle {
        id: ProductId,

        #[arg(short, long)]
        size: Option<String>,
    },
}

pub async fn run(shop: &Shopfront, action: FavouritesAction) -> Result<(), CommandError> {
    let favourites = shop.favourites();
    match action {
        FavouritesAction::List => render::favourites(&favourites.list().await),
        FavouritesAction::Sync => render::favourites(&favourites.fetch().await?),
        FavouritesAction::Toggle { id, size } => {
            favourites.toggle_product(&id, size).await?;
        }
    }
    Ok(())
}
