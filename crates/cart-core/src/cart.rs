//! # Cart
//!
//! In-memory shopping cart for sidekick-cart.
//!
//! A cart holds at most one [`LineItem`] per sellable identity, in the
//! order the items were first added. Adding the same sellable again bumps
//! the quantity. Totals are computed on read.

use crate::error::{CartError, CartResult};
use crate::money::{Currency, Money};
use crate::sellable::{ItemKey, Sellable, SellableSource};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static NEXT_DETACHED: AtomicU64 = AtomicU64::new(0);

/// A cart entry: a snapshot of a sellable plus a quantity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Item number of the sellable at add-time
    pub item_number: Option<String>,

    /// Sellable name at add-time
    pub name: String,

    /// Sellable price at add-time
    pub unit_price: Money,

    /// Quantity, always positive while the item is in a cart
    pub quantity: u32,

    key: ItemKey,
}

impl LineItem {
    /// Snapshot a sellable.
    ///
    /// Fails with `InvalidArgument` if the sellable has no price.
    pub fn from_sellable(sellable: &dyn Sellable, quantity: u32) -> CartResult<Self> {
        let unit_price = sellable.price().ok_or_else(|| {
            CartError::InvalidArgument(format!("sellable '{}' has no price", sellable.name()))
        })?;
        Ok(Self {
            item_number: sellable.item_number(),
            name: sellable.name(),
            unit_price,
            quantity,
            key: ItemKey::of(sellable),
        })
    }

    pub(crate) fn restored(
        item_number: Option<String>,
        name: String,
        unit_price: Money,
        quantity: u32,
        key: ItemKey,
    ) -> Self {
        Self {
            item_number,
            name,
            unit_price,
            quantity,
            key,
        }
    }

    /// Identity this line item is matched by
    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Resolve the originating sellable, if the source still has it.
    pub fn sellable<'s, S: SellableSource>(&self, source: &'s S) -> Option<&'s S::Item> {
        self.item_number
            .as_deref()
            .and_then(|number| source.find_sellable(number))
    }
}

impl Sellable for LineItem {
    fn item_number(&self) -> Option<String> {
        self.item_number.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn price(&self) -> Option<Money> {
        Some(self.unit_price)
    }
}

/// What a cart operation acts on: a live sellable or an existing line item
#[derive(Clone, Copy)]
pub enum CartEntry<'a> {
    Sellable(&'a dyn Sellable),
    LineItem(&'a LineItem),
}

impl CartEntry<'_> {
    /// Identity key used for matching
    pub fn key(&self) -> ItemKey {
        match self {
            CartEntry::Sellable(sellable) => ItemKey::of(*sellable),
            CartEntry::LineItem(item) => item.key.clone(),
        }
    }
}

impl fmt::Debug for CartEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartEntry::Sellable(_) => f.debug_tuple("Sellable").field(&self.key()).finish(),
            CartEntry::LineItem(item) => f.debug_tuple("LineItem").field(item).finish(),
        }
    }
}

impl<'a> From<&'a LineItem> for CartEntry<'a> {
    fn from(item: &'a LineItem) -> Self {
        CartEntry::LineItem(item)
    }
}

impl<'a> From<&'a dyn Sellable> for CartEntry<'a> {
    fn from(sellable: &'a dyn Sellable) -> Self {
        CartEntry::Sellable(sellable)
    }
}

/// Lookup mode for [`Cart::find`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Find {
    #[default]
    First,
}

/// Shopping cart denominated in a single currency
#[derive(Debug, Clone)]
pub struct Cart {
    currency: Currency,
    line_items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            line_items: Vec::new(),
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Line items in first-added order
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Number of distinct line items
    pub fn len(&self) -> usize {
        self.line_items.len()
    }

    /// Sum of all quantities
    pub fn item_count(&self) -> u32 {
        self.line_items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Build a line item requesting `quantity` units, without inserting it.
    ///
    /// Adding it to a cart that lacks it appends it with that quantity.
    pub fn cart_line_item(&self, sellable: &dyn Sellable, quantity: u32) -> CartResult<LineItem> {
        if quantity == 0 {
            return Err(CartError::InvalidArgument(
                "quantity must be positive".to_string(),
            ));
        }
        let item = LineItem::from_sellable(sellable, quantity)?;
        self.check_currency(&item.unit_price)?;
        Ok(item)
    }

    /// Add `quantity` of an entry.
    ///
    /// An entry already in the cart has its quantity increased by
    /// `quantity`. A new sellable is snapshotted and appended with
    /// `quantity`; a new line item is appended with its own requested
    /// quantity. Nothing changes on error.
    pub fn add<'a>(
        &mut self,
        entry: impl Into<CartEntry<'a>>,
        quantity: u32,
    ) -> CartResult<&LineItem> {
        let entry = entry.into();
        if quantity == 0 {
            warn!("Rejected add with zero quantity: {:?}", entry);
            return Err(CartError::InvalidArgument(
                "quantity must be positive".to_string(),
            ));
        }
        match entry {
            CartEntry::Sellable(sellable) if sellable.price().is_none() => {
                warn!("Rejected add of unpriced sellable: {}", sellable.name());
                return Err(CartError::InvalidArgument(format!(
                    "sellable '{}' has no price",
                    sellable.name()
                )));
            }
            CartEntry::LineItem(item) if item.quantity == 0 => {
                warn!("Rejected add of empty line item: {}", item.name);
                return Err(CartError::InvalidArgument(format!(
                    "line item '{}' has zero quantity",
                    item.name
                )));
            }
            _ => {}
        }

        let key = entry.key();
        if let Some(index) = self.position(&key) {
            let item = &mut self.line_items[index];
            item.quantity = checked_quantity(&item.unit_price, item.quantity, quantity)?;
            debug!("Merged line item {}: quantity={}", key, item.quantity);
            return Ok(&self.line_items[index]);
        }

        let item = match entry {
            CartEntry::Sellable(sellable) => LineItem::from_sellable(sellable, quantity)?,
            CartEntry::LineItem(item) => item.clone(),
        };
        self.check_currency(&item.unit_price)?;
        checked_quantity(&item.unit_price, 0, item.quantity)?;

        debug!(
            "Appended line item {}: name={}, quantity={}",
            key, item.name, item.quantity
        );
        let index = self.line_items.len();
        self.line_items.push(item);
        Ok(&self.line_items[index])
    }

    /// Add a single unit of an entry
    pub fn add_one<'a>(&mut self, entry: impl Into<CartEntry<'a>>) -> CartResult<&LineItem> {
        self.add(entry, 1)
    }

    /// Remove the matching line item entirely.
    ///
    /// Returns `None` when nothing matches.
    pub fn remove<'a>(&mut self, entry: impl Into<CartEntry<'a>>) -> Option<LineItem> {
        let key = entry.into().key();
        let index = self.position(&key)?;
        debug!("Removed line item {}", key);
        Some(self.line_items.remove(index))
    }

    /// Set the quantity of the matching line item.
    ///
    /// A quantity of zero removes the item. Never inserts. Returns the
    /// updated (or removed) line item.
    pub fn update<'a>(
        &mut self,
        entry: impl Into<CartEntry<'a>>,
        quantity: u32,
    ) -> Option<LineItem> {
        let entry = entry.into();
        if quantity == 0 {
            return self.remove(entry);
        }
        let key = entry.key();
        let index = self.position(&key)?;
        let item = &mut self.line_items[index];
        item.quantity = quantity;
        debug!("Updated line item {}: quantity={}", key, quantity);
        Some(item.clone())
    }

    /// Look up the line item matching an entry
    pub fn find<'a>(&self, mode: Find, entry: impl Into<CartEntry<'a>>) -> Option<&LineItem> {
        let key = entry.into().key();
        match mode {
            Find::First => self.line_items.iter().find(|item| item.key == key),
        }
    }

    /// Remove every line item
    pub fn empty(&mut self) {
        if !self.line_items.is_empty() {
            debug!("Emptied cart: {} line items dropped", self.line_items.len());
        }
        self.line_items.clear();
    }

    /// Sum of all line item totals in the cart's currency.
    ///
    /// # Panics
    ///
    /// Panics if a line item is priced in another currency. `add` and
    /// `restore` reject such items, so this indicates a bug.
    pub fn total(&self) -> Money {
        self.line_items
            .iter()
            .fold(Money::zero(self.currency), |sum, item| sum + item.total())
    }

    /// Alias for [`Cart::total`]
    pub fn total_price(&self) -> Money {
        self.total()
    }

    fn position(&self, key: &ItemKey) -> Option<usize> {
        self.line_items.iter().position(|item| &item.key == key)
    }

    pub(crate) fn check_currency(&self, price: &Money) -> CartResult<()> {
        if price.currency != self.currency {
            warn!(
                "Rejected price in {} for {} cart",
                price.currency, self.currency
            );
            return Err(CartError::CurrencyMismatch {
                expected: self.currency,
                found: price.currency,
            });
        }
        Ok(())
    }

    /// Key unique across every cart in the process
    pub(crate) fn detached_key() -> ItemKey {
        ItemKey::Detached(NEXT_DETACHED.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn push_restored(&mut self, item: LineItem) {
        self.line_items.push(item);
    }
}

/// New quantity after adding `extra`, or `InvalidArgument` if the quantity
/// or the line total would overflow
fn checked_quantity(unit_price: &Money, current: u32, extra: u32) -> CartResult<u32> {
    current
        .checked_add(extra)
        .filter(|quantity| unit_price.checked_times(*quantity).is_some())
        .ok_or_else(|| {
            warn!("Rejected quantity overflow: {} + {}", current, extra);
            CartError::InvalidArgument(format!(
                "quantity {} + {} is too large",
                current, extra
            ))
        })
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}
