//! Command implementations.
//!
//! Each submodule owns its clap subcommand enum and a `run` function that
//! drives the matching client service and prints the result.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favourites;
pub mod orders;

use shopfront_client::{ClientError, ConfigError};
use shopfront_core::catalog::DraftError;
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// Product form input rejected before anything was sent.
    #[error(transparent)]
    Draft(#[from] DraftError),
}

impl CommandError {
    /// Input the user can fix, as opposed to a backend or environment fault.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Config(_) => false,
            Self::Client(e) => e.is_validation(),
            Self::Draft(_) => true,
        }
    }
}
