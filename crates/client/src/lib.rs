//! Shopfront Client - REST API client, state store, and storefront workflows.
//!
//! # Architecture
//!
//! - [`api`] talks to the shop backend over JSON/REST
//! - [`storage`] is a file-backed key/value store standing in for browser
//!   local storage
//! - [`store`] holds the cached session, cart, orders, and favourites, and
//!   persists them after every change
//! - [`services`] pairs the two: each workflow calls the backend and only on
//!   success updates the store and raises a notification
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopfront_client::{ClientConfig, Shopfront, TracingNotifier};
//!
//! let config = ClientConfig::from_env()?;
//! let shop = Shopfront::open(&config, Arc::new(TracingNotifier)).await?;
//! let summary = shop.cart().summary().await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod storage;
pub mod store;

pub use api::{ApiClient, ApiError, Credentials};
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, Result};
pub use services::{
    MemoryNotifier, Notification, Notifier, Shopfront, TracingNotifier, TransitionPolicy, Variant,
};
pub use storage::{LocalStorage, StorageError};
pub use store::{State, Store};
