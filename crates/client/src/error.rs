//! Unified error type for client workflows.

use shopfront_core::catalog::DraftError;
use shopfront_core::order::CheckoutError;
use shopfront_core::pricing::PromoError;
use shopfront_core::session::SessionError;
use shopfront_core::types::{OrderId, ProductId, TransitionError};
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Anything a service operation can fail with.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Promo(#[from] PromoError),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Please sign in first")]
    NotSignedIn,

    #[error("Admin sign-in required")]
    AdminRequired,

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),
}

impl ClientError {
    /// Whether the error came from local validation rather than the backend.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Promo(_)
                | Self::InvalidTransition(_)
                | Self::Checkout(_)
                | Self::Draft(_)
                | Self::Session(_)
        )
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
