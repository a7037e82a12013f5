//! # Validation Module
//!
//! Field validation for catalog edits and cart operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Register (forms / CLI arguments)                             │
//! │  └── THIS MODULE: name non-empty, price ≥ 0, stock ≥ 0, qty > 0        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repositories                                                 │
//! │  └── Trust their input, no re-validation                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (price >= 0), CHECK (stock >= 0)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopfront_core::validation::{parse_stock, validate_quantity};
//!
//! assert_eq!(parse_stock("12").unwrap(), 12);
//! assert!(parse_stock("-1").is_err());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{InventoryFields, ServiceFields};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item or service name: non-empty, at most 200 characters.
pub fn validate_name(name: &str) -> ValidationResult<()> {
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

/// Validates a search term and returns it trimmed. Empty is allowed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level. Zero is allowed.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a line quantity: 1 to [`MAX_ITEM_QUANTITY`].
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Parses and validates a price typed by the operator.
pub fn parse_price(input: &str) -> ValidationResult<Money> {
    let price = Money::parse(input).map_err(|err| match err {
        ValidationError::Required { .. } => ValidationError::Required {
            field: "price".to_string(),
        },
        ValidationError::InvalidFormat { reason, .. } => ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason,
        },
        other => other,
    })?;
    validate_price(price)?;
    Ok(price)
}

/// Parses and validates a stock level typed by the operator.
pub fn parse_stock(input: &str) -> ValidationResult<i64> {
    let stock: i64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "stock".to_string(),
            reason: "must be a whole number".to_string(),
        })?;
    validate_stock(stock)?;
    Ok(stock)
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates everything an inventory add/edit form submits.
pub fn validate_inventory_fields(fields: &InventoryFields) -> ValidationResult<()> {
    validate_name(&fields.name)?;
    validate_price(fields.price)?;
    validate_stock(fields.stock)
}

/// Validates everything a service add/edit form submits.
pub fn validate_service_fields(fields: &ServiceFields) -> ValidationResult<()> {
    validate_name(&fields.name)?;
    validate_price(fields.price)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("RAM 8GB").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("1000").unwrap(), Money::from_major_minor(1000, 0));
        assert_eq!(parse_price("0").unwrap(), Money::zero());
        assert!(matches!(
            parse_price("-5"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_price("five"),
            Err(ValidationError::InvalidFormat { ref field, .. }) if field == "price"
        ));
    }

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock(" 7 ").unwrap(), 7);
        assert_eq!(parse_stock("0").unwrap(), 0);
        assert!(parse_stock("-1").is_err());
        assert!(parse_stock("2.5").is_err());
    }

    #[test]
    fn test_validate_inventory_fields() {
        let mut fields = InventoryFields {
            name: "SSD 512GB".to_string(),
            brand: None,
            category: Some("Storage".to_string()),
            price: Money::from_major_minor(2500, 0),
            stock: 4,
        };
        assert!(validate_inventory_fields(&fields).is_ok());

        fields.stock = -1;
        assert!(validate_inventory_fields(&fields).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  ram ").unwrap(), "ram");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }
}
