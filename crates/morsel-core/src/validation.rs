//! # Validation Module
//!
//! Input validation for data crossing into the core: menu documents from
//! the catalog, the configured tax rate, and quantities typed by a user.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Data source mapping (morsel-order::menu)                     │
//! │  ├── Missing fields get defaults                                       │
//! │  └── THIS MODULE: reject ids/prices the cart cannot hold               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Configuration (morsel-order::config)                         │
//! │  └── THIS MODULE: tax rate must be a fraction in [0, 1)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: UI commands (apps/kiosk)                                     │
//! │  └── THIS MODULE: quantity text must parse as an integer               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{MenuEntry, TaxRate};
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a menu entry id.
pub const MAX_ENTRY_ID_LEN: usize = 128;

// =============================================================================
// Menu Validators
// =============================================================================

/// Validates a menu entry id.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 128 characters
///
/// ```rust
/// use morsel_core::validation::validate_entry_id;
///
/// assert!(validate_entry_id("margherita").is_ok());
/// assert!(validate_entry_id("  ").is_err());
/// ```
pub fn validate_entry_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > MAX_ENTRY_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_ENTRY_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a decimal price and converts it to Money.
///
/// ## Rules
/// - Must be a finite number
/// - Must be non-negative (zero is allowed: free items)
///
/// ```rust
/// use morsel_core::validation::validate_price;
///
/// assert_eq!(validate_price(10.99).unwrap().cents(), 1099);
/// assert!(validate_price(-1.0).is_err());
/// ```
pub fn validate_price(price: f64) -> ValidationResult<Money> {
    let money = Money::from_decimal(price).ok_or_else(|| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: "must be a finite number".to_string(),
    })?;

    if money.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(money)
}

/// Validates an already-mapped menu entry.
pub fn validate_menu_entry(entry: &MenuEntry) -> ValidationResult<()> {
    validate_entry_id(&entry.id)?;

    if entry.price_cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a tax rate given as a fraction and converts it.
///
/// ## Rules
/// - Must be finite and within `[0, 1)`
/// - Must still be below 100% once rounded to basis points
///
/// ```rust
/// use morsel_core::validation::validate_tax_fraction;
///
/// assert_eq!(validate_tax_fraction(0.08).unwrap().bps(), 800);
/// assert!(validate_tax_fraction(1.0).is_err());
/// ```
pub fn validate_tax_fraction(fraction: f64) -> ValidationResult<TaxRate> {
    let out_of_range = || ValidationError::OutOfRange {
        field: "tax_rate".to_string(),
        min: "0".to_string(),
        max: "1".to_string(),
    };

    if !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
        return Err(out_of_range());
    }

    let rate = TaxRate::from_fraction(fraction);
    if rate.bps() >= 10_000 {
        return Err(out_of_range());
    }

    Ok(rate)
}

/// Parses a quantity typed by the user.
///
/// Zero and negatives are accepted: the cart treats those as removal.
/// Anything above [`MAX_LINE_QUANTITY`] is rejected.
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let quantity = input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: format!("'{}' is not a whole number", input.trim()),
        })?;

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: "0".to_string(),
            max: (MAX_LINE_QUANTITY + 1).to_string(),
        });
    }

    Ok(quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================
