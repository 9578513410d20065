//! # Validation Module
//!
//! Input validation for Kardex. Every check here runs before any write, so
//! a failure has no side effects.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Engine entry points (this module)                            │
//! │  ├── quantity > 0, price > 0, tax-id digit count                       │
//! │  └── fail fast, typed errors, zero side effects                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store (SQLite)                                               │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── CHECK (quantity >= 0) as the last line of defense                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kardex_core::validation::{validate_movement_quantity, validate_tax_id};
//! use kardex_core::ReceiptType;
//!
//! validate_movement_quantity(5).unwrap();
//! assert_eq!(validate_tax_id("12345678").unwrap(), ReceiptType::Receipt);
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::ReceiptType;
use crate::{INVOICE_TAX_ID_DIGITS, RECEIPT_TAX_ID_DIGITS};

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a movement quantity.
///
/// ## Rules
/// - Must be strictly positive. A zero-quantity movement is rejected, not
///   treated as a no-op.
pub fn validate_movement_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    Ok(())
}

/// Validates a sale unit price in cents.
///
/// ## Rules
/// - Must be strictly positive: a sale never moves goods for free.
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::must_be_positive("unit_price"));
    }

    Ok(())
}

/// Validates a catalog price in cents.
///
/// Zero is allowed here (a product may be listed before pricing), negative
/// is not.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must not be negative".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a required string field is non-blank.
///
/// Returns the trimmed value on success.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(value.to_string())
}

/// Validates a product code (part number).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use kardex_core::validation::validate_product_code;
///
/// assert!(validate_product_code("FLT-0042").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("has space").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::required("code"));
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// Deliberately shallow: non-blank, contains `@` and `.`. Deliverability is
/// the mail collaborator's problem, not the engine's.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if !email.contains('@') || !email.contains('.') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must contain '@' and '.'".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Tax Id Classification
// =============================================================================

/// Validates a customer tax identifier and derives the receipt type.
///
/// ## Rules
/// - Exactly 8 digits (DNI) → [`ReceiptType::Receipt`] (boleta)
/// - Exactly 11 digits (RUC) → [`ReceiptType::Invoice`] (factura)
/// - Anything else (wrong length, non-digits, blank) → `InvalidTaxId`
///
/// ## Example
/// ```rust
/// use kardex_core::validation::validate_tax_id;
/// use kardex_core::ReceiptType;
///
/// assert_eq!(validate_tax_id("12345678").unwrap(), ReceiptType::Receipt);
/// assert_eq!(validate_tax_id("20123456789").unwrap(), ReceiptType::Invoice);
/// assert!(validate_tax_id("1234567").is_err());
/// assert!(validate_tax_id("123456789012").is_err());
/// ```
pub fn validate_tax_id(tax_id: &str) -> ValidationResult<ReceiptType> {
    let tax_id = tax_id.trim();

    if !tax_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidTaxId {
            digits: tax_id.chars().filter(|c| c.is_ascii_digit()).count(),
        });
    }

    match tax_id.len() {
        n if n == RECEIPT_TAX_ID_DIGITS => Ok(ReceiptType::Receipt),
        n if n == INVOICE_TAX_ID_DIGITS => Ok(ReceiptType::Invoice),
        n => Err(ValidationError::InvalidTaxId { digits: n }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
