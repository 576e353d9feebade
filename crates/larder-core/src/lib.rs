//! Core types and logic for the Larder recipe/pantry backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It owns the domain types, the quantity/name-matching logic that drives
//! recipe suggestions and shopping-list auto-fill, and the [`store::PantryStore`]
//! trait that storage backends implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod feasibility;
pub mod ingredient;
pub mod matching;
pub mod normalize;
pub mod pantry;
pub mod quantity;
pub mod recipe;
pub mod reconcile;
pub mod shopping;
pub mod store;
pub mod suggest;
pub mod user;

pub use error::{Error, Result};
