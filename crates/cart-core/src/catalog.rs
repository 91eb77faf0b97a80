//! # Product Catalog
//!
//! Products are the stock [`Sellable`] of sidekick-cart.
//! A catalog is loaded from `config/products.toml`.

use crate::cart::CartEntry;
use crate::error::{CartError, CartResult};
use crate::money::Money;
use crate::sellable::{Sellable, SellableSource};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (e.g., "widget-pro")
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Price; a product without one is listed but cannot be sold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,

    /// Whether this product is active and available for purchase
    #[serde(default = "default_true")]
    pub active: bool,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create a new priced product
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price: Some(price),
            active: true,
            image_url: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

impl Sellable for Product {
    fn item_number(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn price(&self) -> Option<Money> {
        self.price
    }
}

impl<'a> From<&'a Product> for CartEntry<'a> {
    fn from(product: &'a Product) -> Self {
        CartEntry::Sellable(product)
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Find an active product by ID or fail with `ItemNotFound`
    pub fn require(&self, id: &str) -> CartResult<&Product> {
        self.find_sellable(id).ok_or_else(|| CartError::ItemNotFound {
            item_number: id.to_string(),
        })
    }

    /// Get all active products
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> CartResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load catalog from a TOML file
    pub fn load(path: impl AsRef<Path>) -> CartResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CartError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_toml(&content)?;
        info!("Loaded {} products from {}", catalog.products.len(), path.display());
        Ok(catalog)
    }
}

impl SellableSource for ProductCatalog {
    type Item = Product;

    fn find_sellable(&self, item_number: &str) -> Option<&Product> {
        self.get(item_number).filter(|p| p.active)
    }
}
