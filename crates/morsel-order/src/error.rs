//! # Order Error Types
//!
//! Error types for the async layer.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Checkout     │  │      Menu       │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  EmptyCart      │  │  Source         │  │  Io                     │ │
//! │  │  AlreadySubmit. │  │  Malformed      │  │  Parse                  │ │
//! │  │  Sink           │  │                 │  │  Invalid                │ │
//! │  │  SinkTimeout    │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error here is recoverable: the caller can show the message and
//! let the user retry.

use morsel_core::ValidationError;
use thiserror::Error;

// =============================================================================
// Checkout
// =============================================================================

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Why a submission did not produce an order.
///
/// `Clone + PartialEq` so it can live inside the observable
/// [`CheckoutState`](crate::checkout::CheckoutState).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Submission attempted with no lines. The sink was not called.
    #[error("Cart is empty. Add items before placing an order.")]
    EmptyCart,

    /// Another submission is still in flight.
    #[error("An order is already being submitted")]
    AlreadySubmitting,

    /// The order sink rejected the order. The message is the sink's own.
    #[error("{0}")]
    Sink(String),

    /// The order sink did not answer within the configured bound.
    #[error("Order sink did not respond within {0} seconds")]
    SinkTimeout(u64),
}

impl CheckoutError {
    /// Returns true if the cart was left intact and a retry makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::Sink(_) | CheckoutError::SinkTimeout(_))
    }
}

/// Failure reported by an [`OrderSink`](crate::sink::OrderSink).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        SinkError {
            message: message.into(),
        }
    }
}

impl From<SinkError> for CheckoutError {
    fn from(err: SinkError) -> Self {
        CheckoutError::Sink(err.message)
    }
}

// =============================================================================
// Menu
// =============================================================================

/// Result type alias for menu operations.
pub type MenuResult<T> = Result<T, MenuError>;

/// Menu source failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    /// The external source reported an error.
    #[error("{0}")]
    Source(String),

    /// A document could not be mapped to a menu entry.
    #[error("Menu document {id:?} rejected: {reason}")]
    Malformed { id: String, reason: ValidationError },
}

impl From<serde_json::Error> for MenuError {
    fn from(err: serde_json::Error) -> Self {
        MenuError::Source(format!("Invalid menu data: {}", err))
    }
}

impl From<std::io::Error> for MenuError {
    fn from(err: std::io::Error) -> Self {
        MenuError::Source(format!("Menu unavailable: {}", err))
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration load failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of its allowed range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
