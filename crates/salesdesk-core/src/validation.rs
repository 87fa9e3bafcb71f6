//! # Validation Module
//!
//! Field-level business rule validation for sale commands.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (axum Json extractor)                                   │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── Malformed JSON → 400 before any command runs                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required / length checks on customer and product fields          │
//! │  ├── Quantity range, positive unit price                              │
//! │  └── Item list: non-empty, bounded, unique product codes              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints on quantity and price                           │
//! │  └── UNIQUE(sale_id, product_code), UNIQUE(number)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Single-field validators return the first failure for that field.
//! Command validators (`validate_items`, `validate_draft`) keep going and
//! collect every failure into [`ValidationErrors`].
//!
//! ## Usage
//! ```rust
//! use salesdesk_core::validation::{validate_customer_name, validate_quantity};
//!
//! assert!(validate_customer_name("Ada Lovelace").is_ok());
//! assert!(validate_customer_name("   ").is_err());
//! assert!(validate_quantity("quantity", 21).is_err());
//! ```

use std::collections::HashSet;

use crate::error::{ValidationError, ValidationErrors};
use crate::money::Money;
use crate::types::{DateRange, NewSaleItem, SaleDraft};
use crate::{
    MAX_CUSTOMER_DOCUMENT_LEN, MAX_CUSTOMER_NAME_LEN, MAX_ITEM_QUANTITY, MAX_PRODUCT_CODE_LEN,
    MAX_PRODUCT_NAME_LEN, MAX_SALE_ITEMS, MAX_UNIT_PRICE_CENTS, MIN_ITEM_QUANTITY,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Shared rule: non-blank after trimming, at most `max` characters.
fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates the customer's name.
///
/// ## Rules
/// - Must not be empty or whitespace only
/// - At most 100 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_text("customerName", name, MAX_CUSTOMER_NAME_LEN)
}

/// Validates the customer's document (CPF, CNPJ, tax id...).
///
/// ## Example
/// ```rust
/// use salesdesk_core::validation::validate_customer_document;
///
/// assert!(validate_customer_document("123.456.789-00").is_ok());
/// assert!(validate_customer_document("").is_err());
/// assert!(validate_customer_document(&"9".repeat(21)).is_err());
/// ```
pub fn validate_customer_document(document: &str) -> ValidationResult<()> {
    validate_text("customerDocument", document, MAX_CUSTOMER_DOCUMENT_LEN)
}

pub fn validate_product_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_text(field, name, MAX_PRODUCT_NAME_LEN)
}

pub fn validate_product_code(field: &str, code: &str) -> ValidationResult<()> {
    validate_text(field, code, MAX_PRODUCT_CODE_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be within `[1, 20]`; values outside are rejected, never clamped
///
/// ## Where It Runs
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  POST /sales  { items: [ { quantity: 25, ... } ] }                      │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity("items[0].quantity", 25) ← THIS FUNCTION            │
/// │       │                                                                 │
/// │       ├── qty < 1 or qty > 20 → "must be between 1 and 20"             │
/// │       │                                                                 │
/// │       └── OK → DiscountTier::for_quantity(qty)                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if !(MIN_ITEM_QUANTITY..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: MIN_ITEM_QUANTITY,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Free items are not sold, so zero is rejected,
/// and prices above [`MAX_UNIT_PRICE_CENTS`] are out of range.
///
/// ## Example
/// ```rust
/// use salesdesk_core::{validation::validate_unit_price, Money};
///
/// assert!(validate_unit_price("unitPriceCents", Money::from_cents(1099)).is_ok());
/// assert!(validate_unit_price("unitPriceCents", Money::zero()).is_err());
/// assert!(validate_unit_price("unitPriceCents", Money::from_cents(i64::MAX / 10)).is_err());
/// ```
pub fn validate_unit_price(field: &str, price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    if price.cents() > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Item Validators
// =============================================================================

/// Validates one requested line. Field paths are prefixed with `prefix`,
/// e.g. `items[2]`.
pub fn validate_item(prefix: &str, item: &NewSaleItem) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    errors.check(validate_product_name(
        &format!("{prefix}.productName"),
        &item.product_name,
    ));
    errors.check(validate_product_code(
        &format!("{prefix}.productCode"),
        &item.product_code,
    ));
    errors.check(validate_quantity(
        &format!("{prefix}.quantity"),
        item.quantity,
    ));
    errors.check(validate_unit_price(
        &format!("{prefix}.unitPriceCents"),
        item.unit_price,
    ));

    errors
}

/// Validates a full batch of requested lines.
///
/// ## Rules
/// - At least one item, at most 20
/// - Every item valid on its own
/// - Product codes unique across the batch (compared after trimming)
pub fn validate_items(items: &[NewSaleItem]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if items.is_empty() {
        errors.push(ValidationError::EmptyCollection {
            field: "items".to_string(),
        });
        return errors;
    }

    if items.len() > MAX_SALE_ITEMS {
        errors.push(ValidationError::TooMany {
            field: "items".to_string(),
            max: MAX_SALE_ITEMS,
        });
    }

    let mut seen = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        let prefix = format!("items[{index}]");
        errors.extend(validate_item(&prefix, item));

        let code = item.product_code.trim();
        if !code.is_empty() && !seen.insert(code) {
            errors.push(ValidationError::Duplicate {
                field: format!("{prefix}.productCode"),
                value: code.to_string(),
            });
        }
    }

    errors
}

/// Validates a create or update command as a whole.
///
/// ## Example
/// ```rust
/// use salesdesk_core::{validation::validate_draft, SaleDraft};
///
/// let draft = SaleDraft {
///     customer_name: " ".to_string(),
///     customer_document: String::new(),
///     items: vec![],
/// };
/// // customerName, customerDocument and items all reported at once
/// assert_eq!(validate_draft(&draft).unwrap_err().len(), 3);
/// ```
pub fn validate_draft(draft: &SaleDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_customer_name(&draft.customer_name));
    errors.check(validate_customer_document(&draft.customer_document));
    errors.extend(validate_items(&draft.items));

    errors.into_result()
}

// =============================================================================
// Query Validators
// =============================================================================

/// Rejects a date range whose start lies after its end.
pub fn validate_date_range(range: &DateRange) -> ValidationResult<()> {
    if let (Some(start), Some(end)) = (range.start, range.end) {
        if start > end {
            return Err(ValidationError::InvalidFormat {
                field: "startDate".to_string(),
                reason: "must not be after endDate".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn item(code: &str, quantity: i64, cents: i64) -> NewSaleItem {
        NewSaleItem {
            product_name: format!("Product {code}"),
            product_code: code.to_string(),
            quantity,
            unit_price: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_validate_customer_fields() {
        assert!(validate_customer_name("Ada Lovelace").is_ok());
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name(" \t ").is_err());
        assert!(validate_customer_name(&"a".repeat(100)).is_ok());
        assert!(matches!(
            validate_customer_name(&"a".repeat(101)),
            Err(ValidationError::TooLong { max: 100, .. })
        ));

        assert!(validate_customer_document(&"1".repeat(20)).is_ok());
        assert!(validate_customer_document(&"1".repeat(21)).is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 100 two-byte characters
        assert!(validate_customer_name(&"é".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("quantity", 1).is_ok());
        assert!(validate_quantity("quantity", 20).is_ok());

        assert!(validate_quantity("quantity", 0).is_err());
        assert!(validate_quantity("quantity", -1).is_err());
        assert!(validate_quantity("quantity", 21).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price("p", Money::from_cents(1)).is_ok());
        assert!(validate_unit_price("p", Money::zero()).is_err());
        assert!(validate_unit_price("p", Money::from_cents(-100)).is_err());

        assert!(validate_unit_price("p", Money::from_cents(MAX_UNIT_PRICE_CENTS)).is_ok());
        assert_eq!(
            validate_unit_price("p", Money::from_cents(MAX_UNIT_PRICE_CENTS + 1)),
            Err(ValidationError::OutOfRange {
                field: "p".to_string(),
                min: 1,
                max: MAX_UNIT_PRICE_CENTS,
            })
        );
    }

    #[test]
    fn test_largest_sale_total_fits() {
        let items: Vec<_> = (0..MAX_SALE_ITEMS)
            .map(|i| item(&format!("P{i}"), MAX_ITEM_QUANTITY, MAX_UNIT_PRICE_CENTS))
            .collect();
        assert!(validate_items(&items).is_empty());

        let gross = MAX_UNIT_PRICE_CENTS
            .checked_mul(MAX_ITEM_QUANTITY)
            .and_then(|line| line.checked_mul(MAX_SALE_ITEMS as i64));
        assert!(gross.is_some());
    }

    #[test]
    fn test_validate_item_reports_every_field() {
        let bad = NewSaleItem {
            product_name: String::new(),
            product_code: " ".to_string(),
            quantity: 0,
            unit_price: Money::zero(),
        };
        let errors = validate_item("items[3]", &bad);
        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();

        assert_eq!(
            fields,
            vec![
                "items[3].productName",
                "items[3].productCode",
                "items[3].quantity",
                "items[3].unitPriceCents",
            ]
        );
    }

    #[test]
    fn test_validate_items_empty_and_too_many() {
        let errors = validate_items(&[]);
        assert!(matches!(
            errors.iter().next(),
            Some(ValidationError::EmptyCollection { .. })
        ));

        let many: Vec<_> = (0..21).map(|i| item(&format!("P{i}"), 1, 100)).collect();
        let errors = validate_items(&many);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.iter().next(),
            Some(ValidationError::TooMany { max: 20, .. })
        ));

        let twenty: Vec<_> = (0..20).map(|i| item(&format!("P{i}"), 1, 100)).collect();
        assert!(validate_items(&twenty).is_empty());
    }

    #[test]
    fn test_validate_items_duplicate_codes() {
        let items = vec![item("BEER", 1, 100), item("WINE", 1, 100), item(" BEER ", 2, 100)];
        let errors = validate_items(&items);

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.iter().next(),
            Some(&ValidationError::Duplicate {
                field: "items[2].productCode".to_string(),
                value: "BEER".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_draft() {
        let draft = SaleDraft {
            customer_name: "Ada".to_string(),
            customer_document: "123".to_string(),
            items: vec![item("BEER", 10, 10_000)],
        };
        assert!(validate_draft(&draft).is_ok());

        let draft = SaleDraft {
            items: vec![item("BEER", 25, 10_000)],
            ..draft
        };
        let errors = validate_draft(&draft).unwrap_err();
        assert_eq!(errors.iter().next().map(|e| e.field()), Some("items[0].quantity"));
    }

    #[test]
    fn test_validate_date_range() {
        let now = Utc::now();
        assert!(validate_date_range(&DateRange::all()).is_ok());
        assert!(validate_date_range(&DateRange::new(Some(now), Some(now))).is_ok());
        assert!(
            validate_date_range(&DateRange::new(Some(now), Some(now - Duration::days(1))))
                .is_err()
        );
    }
}
