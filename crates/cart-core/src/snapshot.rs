//! # Cart Snapshots
//!
//! Portable, human-readable cart state for session storage.
//!
//! A snapshot keeps each line item's identity, name, price and quantity.
//! It never keeps a live link to the sellable: after a restore, use
//! [`LineItem::sellable`](crate::cart::LineItem::sellable) with a
//! [`SellableSource`](crate::sellable::SellableSource) to get one back.

use crate::cart::{Cart, LineItem};
use crate::error::{CartError, CartResult};
use crate::money::{Currency, Money};
use crate::sellable::ItemKey;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Serialized form of a line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_number: Option<String>,

    pub name: String,

    pub unit_price: Money,

    pub quantity: u32,
}

/// Serialized form of a cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    #[serde(default)]
    pub currency: Currency,

    #[serde(default)]
    pub line_items: Vec<LineItemSnapshot>,
}

impl From<&LineItem> for LineItemSnapshot {
    fn from(item: &LineItem) -> Self {
        Self {
            item_number: item.item_number.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

impl Cart {
    /// Capture the cart's current state
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            currency: self.currency(),
            line_items: self.line_items().iter().map(LineItemSnapshot::from).collect(),
        }
    }

    /// Rebuild a cart from a snapshot.
    ///
    /// Rejects zero quantities, duplicate item numbers and prices in a
    /// foreign currency. Items without an item number get fresh detached
    /// keys, so they only match the restored line item itself.
    pub fn restore(snapshot: CartSnapshot) -> CartResult<Cart> {
        let mut cart = Cart::new(snapshot.currency);
        let mut seen = HashSet::new();

        for item in snapshot.line_items {
            if item.quantity == 0 {
                return Err(CartError::InvalidArgument(format!(
                    "line item '{}' has zero quantity",
                    item.name
                )));
            }
            cart.check_currency(&item.unit_price)?;

            let key = match &item.item_number {
                Some(number) => {
                    if !seen.insert(number.clone()) {
                        return Err(CartError::InvalidArgument(format!(
                            "duplicate line item #{}",
                            number
                        )));
                    }
                    ItemKey::Number(number.clone())
                }
                None => Cart::detached_key(),
            };

            cart.push_restored(LineItem::restored(
                item.item_number,
                item.name,
                item.unit_price,
                item.quantity,
                key,
            ));
        }

        debug!("Restored cart with {} line items", cart.len());
        Ok(cart)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> CartResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Restore from JSON produced by [`Cart::to_json`]
    pub fn from_json(json: &str) -> CartResult<Cart> {
        let snapshot: CartSnapshot = serde_json::from_str(json)?;
        Cart::restore(snapshot)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> CartResult<String> {
        Ok(toml::to_string(&self.snapshot())?)
    }

    /// Restore from TOML produced by [`Cart::to_toml`]
    pub fn from_toml(toml_str: &str) -> CartResult<Cart> {
        let snapshot: CartSnapshot = toml::from_str(toml_str)?;
        Cart::restore(snapshot)
    }
}
