//! # cart-core
//!
//! Shopping cart aggregation and pricing engine for sidekick-cart.
//!
//! This crate provides:
//! - `Sellable` trait for anything that can be put in a cart
//! - `Cart` and `LineItem` with quantity merging and running totals
//! - `CartSnapshot` for JSON/TOML session storage
//! - `Product` and `ProductCatalog` as a ready-made sellable
//! - `Seller::sell` for turning carts into orders
//! - `CartError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{Cart, Currency, Money, Product};
//!
//! let widget = Product::new("widget", "Super Duper Widget", Money::from_cents(2995, Currency::USD));
//!
//! let mut cart = Cart::new(Currency::USD);
//! cart.add(&widget, 2)?;
//! assert_eq!(cart.total().to_string(), "59.90");
//!
//! // Park the cart in the session
//! let json = cart.to_json()?;
//! let cart = Cart::from_json(&json)?;
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod money;
pub mod order;
pub mod sellable;
pub mod snapshot;

// Re-exports for convenience
pub use cart::{Cart, CartEntry, Find, LineItem};
pub use catalog::{Product, ProductCatalog};
pub use config::CartConfig;
pub use error::{CartError, CartResult};
pub use money::{Currency, Money};
pub use order::{Buyer, Order, OrderLine, SellArgument, SellOptions, Seller};
pub use sellable::{ItemKey, OrderHooks, Sellable, SellableSource};
pub use snapshot::{CartSnapshot, LineItemSnapshot};
