//! # Error Types
//!
//! Validation error types for kardex-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kardex-core errors (this file)                                        │
//! │  └── ValidationError  - Input validation failures, no side effects     │
//! │                                                                         │
//! │  kardex-engine errors (separate crate)                                 │
//! │  ├── EngineError      - Business-rule and consistency failures         │
//! │  └── StoreError       - Transport-level store failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → EngineError → caller                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, digit count, etc.)
//! 3. Errors are enum variants, never String
//! 4. Validation errors are rejected before any write occurs

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input does not meet requirements. They are always
/// raised before any write, so they carry no partial state and are fully
/// recoverable by correcting the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed email or product code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The tax id is not an 8-digit DNI or an 11-digit RUC.
    ///
    /// ## When This Occurs
    /// - Wrong digit count (7, 12, ...)
    /// - Non-digit characters
    /// - Blank tax id
    #[error("tax id must have 8 or 11 digits, got {digits}")]
    InvalidTaxId { digits: usize },
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates a MustBePositive error for a field.
    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }
}

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
