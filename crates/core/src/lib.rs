//! Shopfront Core - Domain types and pricing rules.
//!
//! This crate provides the types shared by every Shopfront component:
//! - `client` - REST API client, persisted state store, and workflows
//! - `cli` - The `shop` command-line storefront and admin tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure calculations - no I/O, no
//! HTTP clients, no storage. The backend is authoritative for every entity;
//! the types here describe the client's cached copy of them.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, and statuses
//! - [`catalog`] - Products, images, reviews, and product drafts
//! - [`cart`] - Cart lines and the local cart cache
//! - [`order`] - Orders, checkout input, and order filtering
//! - [`favourite`] - Favourite items and the membership set
//! - [`session`] - Customer and admin sessions
//! - [`pricing`] - Subtotal, discount, shipping, tax, and total
//! - [`analytics`] - Admin dashboard aggregates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod favourite;
pub mod order;
pub mod pricing;
pub mod session;
pub mod types;

pub use types::*;
