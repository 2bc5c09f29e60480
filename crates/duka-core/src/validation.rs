//! # Validation Module
//!
//! Checks for values a user types in (item forms, sale quantities, ids).
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Validation Happens                           │
//! │                                                                         │
//! │  User input (CLI flags)                                                 │
//! │  ├── Type parsing (clap)                                                │
//! │  └── THIS MODULE: business rules                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Stored documents                                                       │
//! │  └── NOT validated; repaired by the normalizer instead                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use duka_core::validation::{validate_item_name, validate_sale_quantity};
//!
//! validate_item_name("Bar Soap").unwrap();
//! validate_sale_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an inventory item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use duka_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Sugar 1kg").is_ok());
/// assert!(validate_item_name("  ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a free-text item description. Empty is fine.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(())
}

/// Validates a record id typed by the user and returns it trimmed.
pub fn validate_record_key(key: &str) -> ValidationResult<&str> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }
    Ok(key)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity being sold.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// Checking it against the stock on hand is done by
/// [`crate::inventory::record_sale`].
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level for a new item. Zero is allowed.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a price. Zero is allowed (free items).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Parses a price typed in currency units (`"45"`, `"12.50"`).
///
/// ## Example
/// ```rust
/// use duka_core::validation::parse_price;
///
/// assert_eq!(parse_price("buy", "12.50").unwrap().cents(), 1250);
/// assert!(parse_price("buy", "-1").is_err());
/// assert!(parse_price("buy", "ten").is_err());
/// ```
pub fn parse_price(field: &str, text: &str) -> ValidationResult<Money> {
    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not an amount", text.trim()),
    };

    let units: f64 = text.trim().parse().map_err(|_| invalid())?;
    let price = Money::from_units(units).ok_or_else(invalid)?;
    validate_price(field, price)?;
    Ok(price)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Bar Soap").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"x".repeat(500)).is_ok());
        assert!(validate_description(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_validate_record_key() {
        assert_eq!(validate_record_key(" 1704103200000 ").unwrap(), "1704103200000");
        assert!(validate_record_key("").is_err());
    }

    #[test]
    fn test_quantities() {
        assert!(validate_sale_quantity(1).is_ok());
        assert!(validate_sale_quantity(0).is_err());
        assert!(validate_sale_quantity(-3).is_err());

        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("sell", "45").unwrap(), Money::from_cents(4_500));
        assert_eq!(parse_price("sell", " 0 ").unwrap(), Money::zero());
        assert!(parse_price("sell", "NaN").is_err());
        assert!(parse_price("sell", "").is_err());

        let err = parse_price("buy", "-2").unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }
}
