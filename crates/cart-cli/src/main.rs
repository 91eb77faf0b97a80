//! # Sidekick-Cart CLI
//!
//! Fill a cart from the product catalog and print it.
//!
//! ## Usage
//!
//! ```bash
//! # Optional environment
//! export CART_CURRENCY=USD
//! export CART_CATALOG=config/products.toml
//! export CART_SNAPSHOT=cart.json
//!
//! # Add two widgets and a knob, drop the gear, then sell the cart
//! sidekick-cart widget:2 knob -gear --checkout
//! ```
//!
//! With `CART_SNAPSHOT` set, the cart is restored from that file first and
//! saved back afterwards. Otherwise the snapshot is printed.

use anyhow::{bail, Context};
use cart_core::{Cart, CartConfig, ProductCatalog, SellArgument, Seller};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// One command-line cart instruction
#[derive(Debug, PartialEq, Eq)]
enum ItemSpec {
    Add { id: String, quantity: u32 },
    Remove { id: String },
}

fn parse_item_spec(arg: &str) -> anyhow::Result<ItemSpec> {
    if let Some(id) = arg.strip_prefix('-') {
        if id.is_empty() {
            bail!("missing item id in '{}'", arg);
        }
        return Ok(ItemSpec::Remove { id: id.to_string() });
    }

    let (id, quantity) = match arg.split_once(':') {
        Some((id, quantity)) => (
            id,
            quantity
                .parse::<u32>()
                .with_context(|| format!("invalid quantity in '{}'", arg))?,
        ),
        None => (arg, 1),
    };
    if id.is_empty() {
        bail!("missing item id in '{}'", arg);
    }
    Ok(ItemSpec::Add {
        id: id.to_string(),
        quantity,
    })
}

fn load_catalog(config: &CartConfig) -> anyhow::Result<ProductCatalog> {
    if !config.catalog_path.exists() {
        warn!(
            "No product catalog at {}, using empty catalog",
            config.catalog_path.display()
        );
        return Ok(ProductCatalog::new());
    }
    Ok(ProductCatalog::load(&config.catalog_path)?)
}

fn load_cart(config: &CartConfig) -> anyhow::Result<Cart> {
    match &config.snapshot_path {
        Some(path) if path.exists() => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let cart = Cart::from_json(&json)?;
            info!("Restored {} line items from {}", cart.len(), path.display());
            Ok(cart)
        }
        _ => Ok(config.new_cart()),
    }
}

fn apply(cart: &mut Cart, catalog: &ProductCatalog, spec: &ItemSpec) -> anyhow::Result<()> {
    match spec {
        ItemSpec::Add { id, quantity } => {
            let product = catalog.require(id)?;
            cart.add(product, *quantity)?;
        }
        ItemSpec::Remove { id } => {
            let removed = match catalog.get(id) {
                Some(product) => cart.remove(product),
                None => None,
            };
            if removed.is_none() {
                warn!("Nothing to remove for {}", id);
            }
        }
    }
    Ok(())
}

fn print_cart(cart: &Cart) {
    println!("Cart ({})", cart.currency());
    for item in cart.line_items() {
        println!(
            "  {:>3} x {:<30} {:>10}",
            item.quantity,
            item.name,
            item.total().display()
        );
    }
    println!("  Total: {}", cart.total().display());
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = CartConfig::from_env()?;
    let catalog = load_catalog(&config)?;
    let mut cart = load_cart(&config)?;

    let mut checkout = false;
    for arg in std::env::args().skip(1) {
        if arg == "--checkout" {
            checkout = true;
            continue;
        }
        let spec = parse_item_spec(&arg)?;
        apply(&mut cart, &catalog, &spec)?;
    }

    print_cart(&cart);

    let json = cart.to_json()?;
    match &config.snapshot_path {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Saved cart snapshot to {}", path.display());
        }
        None => println!("{}", json),
    }

    if checkout {
        let seller = Seller::new("sidekick-cart", "Sidekick Cart");
        let order = seller.sell([SellArgument::Cart(&cart)])?;
        println!("{}", serde_json::to_string_pretty(&order)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::{Currency, Money, Product};

    fn catalog() -> ProductCatalog {
        let mut catalog = ProductCatalog::new();
        catalog.add(Product::new(
            "widget",
            "Super Duper Widget",
            Money::from_cents(2995, Currency::USD),
        ));
        catalog.add(Product::new("knob", "Shiny Knob", Money::from_cents(399, Currency::USD)));
        catalog
    }

    #[test]
    fn test_parse_item_spec() {
        assert_eq!(
            parse_item_spec("widget").unwrap(),
            ItemSpec::Add {
                id: "widget".into(),
                quantity: 1
            }
        );
        assert_eq!(
            parse_item_spec("knob:3").unwrap(),
            ItemSpec::Add {
                id: "knob".into(),
                quantity: 3
            }
        );
        assert_eq!(
            parse_item_spec("-knob").unwrap(),
            ItemSpec::Remove { id: "knob".into() }
        );
        assert!(parse_item_spec("knob:lots").is_err());
        assert!(parse_item_spec(":2").is_err());
        assert!(parse_item_spec("-").is_err());
    }

    #[test]
    fn test_apply_specs() {
        let catalog = catalog();
        let mut cart = Cart::default();

        for arg in ["widget:2", "knob", "knob:2", "-widget", "-missing"] {
            apply(&mut cart, &catalog, &parse_item_spec(arg).unwrap()).unwrap();
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line_items()[0].quantity, 3);
        assert_eq!(cart.total().to_string(), "11.97");
    }

    #[test]
    fn test_apply_unknown_item_fails() {
        let catalog = catalog();
        let mut cart = Cart::default();

        let spec = parse_item_spec("gizmo").unwrap();
        assert!(apply(&mut cart, &catalog, &spec).is_err());
        assert!(cart.is_empty());
    }
}
