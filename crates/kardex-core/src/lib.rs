//! # kardex-core: Pure Business Logic for Kardex
//!
//! This crate is the **heart** of Kardex, an inventory movement ledger and
//! stock-reconciliation engine for an auto-parts business. It contains all
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Kardex Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 kardex-engine (orchestration)                   │   │
//! │  │    MovementLedger ──► StockReconciler ──► SaleCoordinator      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kardex-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ validation│  │  alerts   │  │   │
//! │  │   │  Product  │  │   Money   │  │  tax id   │  │ low stock │  │   │
//! │  │   │  Movement │  │  (cents)  │  │  quantity │  │ depleted  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   kardex-store (SQLite layer)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Movement, Transaction, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error types
//! - [`validation`] - Business rule validation, including tax-id classification
//! - [`alerts`] - Low-stock observer (pure function of reconciler output)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use kardex_core::validation::validate_tax_id;
//! use kardex_core::ReceiptType;
//!
//! // An 8-digit DNI buys a boleta, an 11-digit RUC buys a factura.
//! assert_eq!(validate_tax_id("12345678").unwrap(), ReceiptType::Receipt);
//! assert_eq!(validate_tax_id("20123456789").unwrap(), ReceiptType::Invoice);
//! assert!(validate_tax_id("1234567").is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alerts;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kardex_core::Money` instead of
// `use kardex_core::money::Money`

pub use alerts::{LowStockObserver, StockAlert};
pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default low-stock threshold.
///
/// ## Business Reason
/// A product with 10 units or fewer is close enough to stock-out that the
/// back office wants a restock alert. Configurable through the engine config.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Digit count of a personal tax id (DNI), which classifies a sale as a
/// boleta ([`ReceiptType::Receipt`]).
pub const RECEIPT_TAX_ID_DIGITS: usize = 8;

/// Digit count of a business tax id (RUC), which classifies a sale as a
/// factura ([`ReceiptType::Invoice`]).
pub const INVOICE_TAX_ID_DIGITS: usize = 11;
