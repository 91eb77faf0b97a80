//! # Order Types
//!
//! Turning sellables and carts into orders.
//!
//! A [`Seller`] sells a mix of sellables and carts to a [`Buyer`]. Every
//! argument is validated before anything happens, then each sellable gets
//! its [`OrderHooks`](crate::sellable::OrderHooks) called around being
//! added to the order.
//!
//! ```rust,ignore
//! let order = merchant.sell_to(customer, [SellArgument::Cart(&cart)])?;
//! ```

use crate::cart::{Cart, LineItem};
use crate::error::{CartError, CartResult};
use crate::money::{Currency, Money};
use crate::sellable::Sellable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The selling party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: String,
    pub name: String,
}

/// The buying party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Buyer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
        }
    }

    /// Builder: set email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Buy from a seller; same as [`Seller::sell_to`] with this buyer
    pub fn purchase_from<'a>(
        &self,
        seller: &Seller,
        arguments: impl IntoIterator<Item = SellArgument<'a>>,
    ) -> CartResult<Order> {
        seller.sell_to(self.clone(), arguments)
    }
}

/// Options for [`Seller::sell`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SellOptions {
    /// Who the order is sold to
    pub to: Option<Buyer>,
}

impl SellOptions {
    /// Later options override earlier ones field by field
    fn merge(&mut self, other: SellOptions) {
        if other.to.is_some() {
            self.to = other.to;
        }
    }
}

/// One argument to [`Seller::sell`]
#[derive(Clone, Copy)]
pub enum SellArgument<'a> {
    Options(&'a SellOptions),
    Sellable(&'a dyn Sellable),
    /// Every line item of the cart, with its quantity
    Cart(&'a Cart),
}

impl std::fmt::Debug for SellArgument<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SellArgument::Options(options) => f.debug_tuple("Options").field(options).finish(),
            SellArgument::Sellable(sellable) => {
                f.debug_tuple("Sellable").field(&sellable.name()).finish()
            }
            SellArgument::Cart(cart) => f.debug_tuple("Cart").field(&cart.len()).finish(),
        }
    }
}

/// A line on an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_number: Option<String>,

    pub name: String,

    pub unit_price: Money,

    pub quantity: u32,
}

impl OrderLine {
    pub fn total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// A sales order, ready for an external checkout to persist and charge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID (generated)
    pub id: String,

    pub seller_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Buyer>,

    pub line_items: Vec<OrderLine>,

    /// Currency (same for all lines)
    pub currency: Currency,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Order {
    fn new(seller: &Seller, buyer: Option<Buyer>, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            seller_id: seller.id.clone(),
            buyer,
            line_items: Vec::new(),
            currency,
            created_at: Utc::now(),
        }
    }

    /// Calculate order total
    pub fn total(&self) -> Money {
        self.line_items
            .iter()
            .fold(Money::zero(self.currency), |sum, line| sum + line.total())
    }

    /// Check if order is empty
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Get item count
    pub fn item_count(&self) -> u32 {
        self.line_items
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }
}

enum Pending<'a> {
    Sellable(&'a dyn Sellable, Money),
    Line(&'a LineItem),
}

impl Seller {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Options every sale starts from
    pub fn default_sell_options(&self) -> SellOptions {
        SellOptions::default()
    }

    /// Sell to a buyer. The buyer wins over any `to` given in the arguments.
    pub fn sell_to<'a>(
        &self,
        buyer: Buyer,
        arguments: impl IntoIterator<Item = SellArgument<'a>>,
    ) -> CartResult<Order> {
        self.build_order(arguments, SellOptions { to: Some(buyer) })
    }

    /// Build an order from sellables, carts and options.
    ///
    /// Fails with `InvalidArgument` when no sellable is given or one has no
    /// price, and with `CurrencyMismatch` when prices disagree. No hook runs
    /// unless every argument is valid.
    pub fn sell<'a>(
        &self,
        arguments: impl IntoIterator<Item = SellArgument<'a>>,
    ) -> CartResult<Order> {
        self.build_order(arguments, SellOptions::default())
    }

    fn build_order<'a>(
        &self,
        arguments: impl IntoIterator<Item = SellArgument<'a>>,
        overrides: SellOptions,
    ) -> CartResult<Order> {
        let mut options = self.default_sell_options();
        let mut pending = Vec::new();

        for argument in arguments {
            match argument {
                SellArgument::Options(extra) => options.merge(extra.clone()),
                SellArgument::Cart(cart) => {
                    pending.extend(cart.line_items().iter().map(Pending::Line))
                }
                SellArgument::Sellable(sellable) => {
                    let price = sellable.price().ok_or_else(|| {
                        warn!("Refusing to sell unpriced sellable: {}", sellable.name());
                        CartError::InvalidArgument(
                            "Sellable models must have a price".to_string(),
                        )
                    })?;
                    pending.push(Pending::Sellable(sellable, price));
                }
            }
        }
        options.merge(overrides);

        let currency = match pending.first() {
            Some(Pending::Sellable(_, price)) => price.currency,
            Some(Pending::Line(item)) => item.unit_price.currency,
            None => {
                return Err(CartError::InvalidArgument(
                    "No sellable (e.g. product) provided".to_string(),
                ))
            }
        };
        for entry in &pending {
            let found = match entry {
                Pending::Sellable(_, price) => price.currency,
                Pending::Line(item) => item.unit_price.currency,
            };
            if found != currency {
                return Err(CartError::CurrencyMismatch {
                    expected: currency,
                    found,
                });
            }
        }

        let mut order = Order::new(self, options.to, currency);
        for entry in pending {
            match entry {
                Pending::Sellable(sellable, unit_price) => {
                    let hooks = sellable.order_hooks();
                    if let Some(hooks) = hooks {
                        hooks.before_add_to_order(self);
                    }
                    order.line_items.push(OrderLine {
                        item_number: sellable.item_number(),
                        name: sellable.name(),
                        unit_price,
                        quantity: 1,
                    });
                    if let Some(hooks) = hooks {
                        hooks.after_add_to_order(self);
                    }
                }
                Pending::Line(item) => order.line_items.push(OrderLine {
                    item_number: item.item_number.clone(),
                    name: item.name.clone(),
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                }),
            }
            debug!("Order {}: {} lines", order.id, order.line_items.len());
        }

        info!(
            "Created order {} for seller {}: total={}",
            order.id,
            self.id,
            order.total().display()
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartEntry;
    use crate::catalog::Product;
    use crate::sellable::OrderHooks;
    use std::cell::RefCell;

    fn widget() -> Product {
        Product::new("1", "Super Duper Widget", Money::from_cents(2995, Currency::USD))
    }

    fn knob() -> Product {
        Product::new("2", "Shiny Knob", Money::from_cents(399, Currency::USD))
    }

    fn merchant() -> Seller {
        Seller::new("m-1", "Merchant")
    }

    /// Records hook calls in order
    struct Ticket {
        calls: RefCell<Vec<String>>,
    }

    impl Sellable for Ticket {
        fn item_number(&self) -> Option<String> {
            Some("ticket".to_string())
        }

        fn name(&self) -> String {
            "Concert Ticket".to_string()
        }

        fn price(&self) -> Option<Money> {
            Some(Money::from_cents(5000, Currency::USD))
        }

        fn order_hooks(&self) -> Option<&dyn OrderHooks> {
            Some(self)
        }
    }

    impl OrderHooks for Ticket {
        fn before_add_to_order(&self, seller: &Seller) {
            self.calls.borrow_mut().push(format!("before:{}", seller.id));
        }

        fn after_add_to_order(&self, seller: &Seller) {
            self.calls.borrow_mut().push(format!("after:{}", seller.id));
        }
    }

    #[test]
    fn test_sell_products() {
        let (widget, knob) = (widget(), knob());

        let order = merchant()
            .sell([SellArgument::Sellable(&widget), SellArgument::Sellable(&knob)])
            .unwrap();

        assert_eq!(order.seller_id, "m-1");
        assert!(order.buyer.is_none());
        assert_eq!(order.line_items.len(), 2);
        assert_eq!(order.total().to_string(), "33.94");
        assert_eq!(order.item_count(), 2);
    }

    #[test]
    fn test_sell_to_buyer() {
        let widget = widget();
        let buyer = Buyer::new("u-1", "Sam User").with_email("sam@example.com");

        let order = merchant()
            .sell_to(buyer.clone(), [SellArgument::Sellable(&widget)])
            .unwrap();

        assert_eq!(order.buyer, Some(buyer));
    }

    #[test]
    fn test_buyer_purchase_from() {
        let (widget, knob) = (widget(), knob());
        let buyer = Buyer::new("u-1", "Sam User");
        let mut cart = Cart::default();
        cart.add(CartEntry::Sellable(&knob), 2).unwrap();

        let order = buyer
            .purchase_from(
                &merchant(),
                [SellArgument::Sellable(&widget), SellArgument::Cart(&cart)],
            )
            .unwrap();

        assert_eq!(order.seller_id, "m-1");
        assert_eq!(order.buyer, Some(buyer.clone()));
        assert_eq!(order.line_items.len(), 2);
        assert_eq!(order.total().to_string(), "37.93");

        assert!(matches!(
            buyer.purchase_from(&merchant(), Vec::<SellArgument>::new()),
            Err(CartError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_options_merge_later_wins() {
        let widget = widget();
        let first = SellOptions {
            to: Some(Buyer::new("u-1", "Sam")),
        };
        let second = SellOptions {
            to: Some(Buyer::new("u-2", "Alex")),
        };

        let order = merchant()
            .sell([
                SellArgument::Options(&first),
                SellArgument::Sellable(&widget),
                SellArgument::Options(&second),
                SellArgument::Options(&SellOptions::default()),
            ])
            .unwrap();

        assert_eq!(order.buyer.unwrap().id, "u-2");
    }

    #[test]
    fn test_sell_cart() {
        let (widget, knob) = (widget(), knob());
        let mut cart = Cart::default();
        cart.add(CartEntry::Sellable(&widget), 2).unwrap();
        cart.add(CartEntry::Sellable(&knob), 3).unwrap();

        let order = merchant().sell([SellArgument::Cart(&cart)]).unwrap();

        assert_eq!(order.line_items.len(), 2);
        assert_eq!(order.line_items[0].quantity, 2);
        assert_eq!(order.total(), cart.total());
        assert_eq!(order.total().to_string(), "71.87");
    }

    #[test]
    fn test_hooks_run_around_each_line() {
        let ticket = Ticket {
            calls: RefCell::new(Vec::new()),
        };

        merchant().sell([SellArgument::Sellable(&ticket)]).unwrap();

        assert_eq!(*ticket.calls.borrow(), ["before:m-1", "after:m-1"]);
    }

    #[test]
    fn test_sell_nothing_fails() {
        let empty = Cart::default();
        let options = SellOptions::default();

        let result = merchant().sell([SellArgument::Options(&options), SellArgument::Cart(&empty)]);
        assert!(matches!(result, Err(CartError::InvalidArgument(_))));
    }

    #[test]
    fn test_unpriced_sellable_fails_before_hooks() {
        let ticket = Ticket {
            calls: RefCell::new(Vec::new()),
        };
        let mut teaser = widget();
        teaser.price = None;

        let result = merchant().sell([SellArgument::Sellable(&ticket), SellArgument::Sellable(&teaser)]);

        assert!(matches!(result, Err(CartError::InvalidArgument(_))));
        assert!(ticket.calls.borrow().is_empty());
    }

    #[test]
    fn test_mixed_currencies_fail() {
        let widget = widget();
        let euro = Product::new("3", "Euro Gizmo", Money::from_cents(500, Currency::EUR));

        let result = merchant().sell([SellArgument::Sellable(&widget), SellArgument::Sellable(&euro)]);

        assert_eq!(
            result.unwrap_err(),
            CartError::CurrencyMismatch {
                expected: Currency::USD,
                found: Currency::EUR
            }
        );
    }

    #[test]
    fn test_order_serializes() {
        let widget = widget();
        let order = merchant().sell([SellArgument::Sellable(&widget)]).unwrap();

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["seller_id"], "m-1");
        assert_eq!(json["line_items"][0]["unit_price"]["amount"], 2995);
        assert!(Uuid::parse_str(&order.id).is_ok());
    }
}
