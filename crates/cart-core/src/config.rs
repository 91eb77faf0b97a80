//! # Cart Configuration
//!
//! Settings are loaded from environment variables (and a `.env` file if
//! present).

use crate::cart::Cart;
use crate::error::{CartError, CartResult};
use crate::money::Currency;
use std::env;
use std::path::PathBuf;

/// Cart settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Currency new carts are created in
    pub default_currency: Currency,

    /// Product catalog TOML file
    pub catalog_path: PathBuf,

    /// Where a cart snapshot is saved/restored, if anywhere
    pub snapshot_path: Option<PathBuf>,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `CART_CURRENCY` (default `USD`)
    /// - `CART_CATALOG` (default `config/products.toml`)
    /// - `CART_SNAPSHOT`
    pub fn from_env() -> CartResult<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CartResult<Self> {
        let default_currency = match lookup("CART_CURRENCY") {
            Some(code) => code.parse::<Currency>().map_err(|_| {
                CartError::Configuration(format!("CART_CURRENCY '{}' is not supported", code))
            })?,
            None => Currency::default(),
        };

        Ok(Self {
            default_currency,
            catalog_path: lookup("CART_CATALOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config/products.toml")),
            snapshot_path: lookup("CART_SNAPSHOT")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Create an empty cart in the default currency
    pub fn new_cart(&self) -> Cart {
        Cart::new(self.default_currency)
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            default_currency: Currency::default(),
            catalog_path: PathBuf::from("config/products.toml"),
            snapshot_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, CartConfig::default());
        assert_eq!(config.new_cart().currency(), Currency::USD);
    }

    #[test]
    fn test_explicit_values() {
        let config = CartConfig::from_lookup(lookup(&[
            ("CART_CURRENCY", "eur"),
            ("CART_CATALOG", "/etc/shop/products.toml"),
            ("CART_SNAPSHOT", "/tmp/cart.json"),
        ]))
        .unwrap();

        assert_eq!(config.default_currency, Currency::EUR);
        assert_eq!(config.catalog_path, PathBuf::from("/etc/shop/products.toml"));
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/cart.json")));
        assert_eq!(config.new_cart().currency(), Currency::EUR);
    }

    #[test]
    fn test_invalid_currency() {
        let result = CartConfig::from_lookup(lookup(&[("CART_CURRENCY", "doubloons")]));

        assert!(matches!(result, Err(CartError::Configuration(_))));
    }

    #[test]
    fn test_blank_snapshot_path_ignored() {
        let config = CartConfig::from_lookup(lookup(&[("CART_SNAPSHOT", "  ")])).unwrap();

        assert!(config.snapshot_path.is_none());
    }
}
