//! # API Error Type
//!
//! Unified error type for kiosk commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Command handler  Result<T, ApiError>                                   │
//! │         │                                                               │
//! │         ├── CoreError::EntryNotFound ────────► NOT_FOUND               │
//! │         ├── ValidationError ─────────────────► VALIDATION_ERROR        │
//! │         ├── CheckoutError::EmptyCart ────────► EMPTY_CART              │
//! │         ├── CheckoutError::AlreadySubmitting ► ORDER_IN_PROGRESS       │
//! │         ├── CheckoutError::Sink/SinkTimeout ─► ORDER_SINK_ERROR        │
//! │         └── MenuError ───────────────────────► MENU_SOURCE_ERROR       │
//! │                                                                         │
//! │  The terminal prints `message`; a mobile shell would branch on `code`. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use morsel_core::{CoreError, ValidationError};
use morsel_order::{CheckoutError, MenuError};
use serde::Serialize;

/// Error returned from kiosk commands.
///
/// ```json
/// { "code": "ORDER_SINK_ERROR", "message": "orders collection is read-only" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// What the user can do next, when there is something
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Menu entry not offered
    NotFound,

    /// Input could not be understood
    ValidationError,

    /// Checkout attempted with an empty cart
    EmptyCart,

    /// A submission is still pending
    OrderInProgress,

    /// The order sink rejected or timed out; cart kept for retry
    OrderSinkError,

    /// The menu source failed; last-known-good menu still shown
    MenuSourceError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            hint: None,
        }
    }

    /// Attaches a follow-up suggestion.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EntryNotFound(id) => {
                ApiError::new(ErrorCode::NotFound, format!("Menu item not found: {}", id))
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        let code = match err {
            CheckoutError::EmptyCart => ErrorCode::EmptyCart,
            CheckoutError::AlreadySubmitting => ErrorCode::OrderInProgress,
            CheckoutError::Sink(_) | CheckoutError::SinkTimeout(_) => ErrorCode::OrderSinkError,
        };
        let api = ApiError::new(code, err.to_string());

        if err.is_retryable() {
            api.with_hint("Your cart was kept. Type 'checkout' to try again.")
        } else {
            api
        }
    }
}

impl From<MenuError> for ApiError {
    fn from(err: MenuError) -> Self {
        ApiError::new(ErrorCode::MenuSourceError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
