//! Quote Engine library crate.
//!
//! This crate exposes the buyback and repair pricing calculators as
//! reusable modules.  Request handlers fetch a device's catalog snapshot
//! and call [`calculate_buyback_price`] or [`calculate_repair_price`]
//! directly, or go through [`engine::quote`] with a [`catalog::PriceCatalog`].
//! The HTTP surface lives in [`api`].

pub mod api;
pub mod buyback;
pub mod catalog;
pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod repair;

pub use buyback::calculate_buyback_price;
pub use error::Unpriced;
pub use models::{Deduction, PricingRequest, PricingResult};
pub use repair::calculate_repair_price;
