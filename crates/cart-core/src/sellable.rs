//! # Sellable Capability
//!
//! Anything with a price that can go into a cart. The cart only reads a
//! sellable at add-time and keeps a snapshot; it never holds on to the
//! sellable itself.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │            Sellable (trait)              │
//! │  ├── item_number()   stable identity     │
//! │  ├── name()                              │
//! │  ├── price()                             │
//! │  └── order_hooks()   optional capability │
//! └──────────────────────────────────────────┘
//!          ▲                      ▲
//!   ┌──────┴──────┐        ┌──────┴──────┐
//!   │   Product   │        │  LineItem   │
//!   └─────────────┘        └─────────────┘
//! ```

use crate::money::Money;
use crate::order::Seller;
use std::fmt;

/// A priced item that can be added to a cart or sold in an order.
pub trait Sellable {
    /// Stable identity used to merge repeated adds.
    ///
    /// Items returning `None` are matched by object address instead.
    fn item_number(&self) -> Option<String>;

    /// Display name, captured when the item is added.
    fn name(&self) -> String;

    /// Unit price. Items without a price cannot be added to a cart.
    fn price(&self) -> Option<Money>;

    /// Hooks the order builder calls around adding this item to an order.
    fn order_hooks(&self) -> Option<&dyn OrderHooks> {
        None
    }
}

/// Optional callbacks invoked by [`Seller::sell`], never by the cart.
pub trait OrderHooks {
    fn before_add_to_order(&self, _seller: &Seller) {}

    fn after_add_to_order(&self, _seller: &Seller) {}
}

/// Live lookup of sellables by item number.
///
/// Line items only keep an identity snapshot; a source resolves it back to
/// a live record when one still exists.
pub trait SellableSource {
    type Item: Sellable;

    fn find_sellable(&self, item_number: &str) -> Option<&Self::Item>;
}

/// Identity used to decide whether two inputs are "the same sellable"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKey {
    /// Stable item number
    Number(String),
    /// Address of a live sellable without an item number, together with
    /// the name and price seen at that address. The cart does not keep the
    /// sellable alive, so a later object at the same address only matches
    /// if it also looks the same.
    Reference {
        addr: usize,
        name: String,
        price: Option<Money>,
    },
    /// Restored line item without an item number
    Detached(u64),
}

impl ItemKey {
    /// Derive the key for a live sellable: item number first, address second.
    pub fn of(sellable: &dyn Sellable) -> Self {
        match sellable.item_number() {
            Some(number) => ItemKey::Number(number),
            None => ItemKey::Reference {
                addr: sellable as *const _ as *const () as usize,
                name: sellable.name(),
                price: sellable.price(),
            },
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Number(number) => write!(f, "#{}", number),
            ItemKey::Reference { addr, name, .. } => write!(f, "ref:{:#x}({})", addr, name),
            ItemKey::Detached(id) => write!(f, "detached:{}", id),
        }
    }
}
