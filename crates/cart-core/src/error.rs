//! # Cart Error Types
//!
//! Typed error handling for the sidekick-cart engine.
//! Fallible cart operations return `Result<T, CartError>`.
//!
//! Lookups that miss (`remove`, `update`, `find`) are not errors: they
//! return `None`.

use crate::money::Currency;
use thiserror::Error;

/// Core error type for cart, catalog and order operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Bad input detected before any mutation (missing price, zero quantity,
    /// empty batch of sellables)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A price in one currency met a cart or order in another
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },

    /// Currency code not supported
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Item number not present in a catalog
    #[error("Item not found: {item_number}")]
    ItemNotFound { item_number: String },

    /// Configuration errors (bad env values, unreadable files)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Snapshot serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CartError {
    /// Returns true if the caller can recover by fixing its input.
    ///
    /// A currency mismatch means something upstream built the cart wrong.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, CartError::CurrencyMismatch { .. })
    }
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        CartError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(err: toml::de::Error) -> Self {
        CartError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for CartError {
    fn from(err: toml::ser::Error) -> Self {
        CartError::Serialization(err.to_string())
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors() {
        assert!(CartError::InvalidArgument("no price".into()).is_caller_error());
        assert!(CartError::ItemNotFound {
            item_number: "x".into()
        }
        .is_caller_error());
        assert!(!CartError::CurrencyMismatch {
            expected: Currency::USD,
            found: Currency::EUR
        }
        .is_caller_error());
    }

    #[test]
    fn test_error_messages() {
        let err = CartError::CurrencyMismatch {
            expected: Currency::USD,
            found: Currency::EUR,
        };
        assert_eq!(err.to_string(), "Currency mismatch: expected USD, found EUR");

        let err = CartError::UnsupportedCurrency {
            currency: "XYZ".into(),
        };
        assert_eq!(err.to_string(), "Unsupported currency: XYZ");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: CartError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CartError::Serialization(_)));
    }
}
