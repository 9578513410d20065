//! # Engine Error Types
//!
//! Error taxonomy for the reconciliation engine.
//!
//! ## Error Classes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Engine Error Classes                             │
//! │                                                                         │
//! │  Validation (no side effects, caller fixes input and retries)          │
//! │  ├── InvalidQuantity                                                   │
//! │  ├── InvalidTaxId                                                      │
//! │  ├── ProductNotFound / ProductInactive                                 │
//! │  └── Validation(field-level)                                           │
//! │                                                                         │
//! │  Business rule (no writes occurred)                                    │
//! │  └── InsufficientStock { available }                                   │
//! │                                                                         │
//! │  Consistency / transport (at least one write occurred)                 │
//! │  ├── StockUpdateFailed { movement_id, rolled_back }                    │
//! │  ├── Conflict { attempts }                                             │
//! │  ├── Transport(StoreError)                                             │
//! │  └── SaleRecordedButStockNotAdjusted { transaction_id }                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is an expected, typed outcome: the engine never panics
//! past its boundary for a business failure, and consistency errors carry
//! enough state (movement id, transaction id) for the caller to resume the
//! remaining step instead of blindly restarting.

use thiserror::Error;

use kardex_core::{MovementId, ProductId, TransactionId, ValidationError};

use std::time::Duration;

// =============================================================================
// Store Error
// =============================================================================

/// Transport-level failure talking to the backing store.
///
/// A timed-out operation is indistinguishable from a failed one at this
/// level; both trigger the same compensation and retry rules upstream.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach the store at all.
    #[error("store connection failed: {0}")]
    Connection(String),

    /// A single store operation exceeded its configured timeout.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// The store rejected or failed the operation.
    #[error("store query failed: {0}")]
    Query(String),
}

/// Result type for store-port operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Engine Error
// =============================================================================

/// The discriminated outcome type for every engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Movement or sale quantity was zero or negative.
    ///
    /// Zero-quantity movements are rejected, not treated as no-ops.
    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    /// The referenced product does not exist.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// The referenced product is soft-deleted and excluded from stock
    /// operations.
    #[error("product {0} is inactive")]
    ProductInactive(ProductId),

    /// An EXIT would drive stock negative. No writes occurred; the caller
    /// must always be shown the available quantity.
    #[error(
        "insufficient stock for product {product_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// Tax id was not 8 (DNI) or 11 (RUC) digits. The transaction was not
    /// created.
    #[error("tax id must have 8 or 11 digits, got {digits}")]
    InvalidTaxId { digits: usize },

    /// A field-level validation failure, raised before any write.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The stock write kept losing the conditional-update race. The
    /// appended movement was deactivated; retrying the whole operation is
    /// safe.
    #[error("stock write for product {product_id} lost the update race {attempts} times")]
    Conflict { product_id: ProductId, attempts: u32 },

    /// The movement was appended but the stock write failed.
    ///
    /// `rolled_back` reports whether the compensating deactivation of the
    /// movement succeeded. When it did, retrying the same logical movement
    /// converges to the state a first-attempt success would have produced.
    /// When it did not, the movement id identifies the orphaned active row
    /// for manual reconciliation.
    #[error("stock update failed after movement {movement_id} was recorded (rolled_back: {rolled_back})")]
    StockUpdateFailed {
        movement_id: MovementId,
        rolled_back: bool,
        #[source]
        source: StoreError,
    },

    /// A store operation failed before any write of this operation
    /// happened, or outside the compensated window.
    #[error("transport error: {0}")]
    Transport(#[from] StoreError),

    /// The sale's Transaction row was persisted but the compensating EXIT
    /// movement did not complete.
    ///
    /// This is a deliberate, audit-preserving terminal state: the
    /// transaction is NOT rolled back, and the caller must surface it
    /// through a distinct acknowledgment path, never as a plain success.
    #[error("sale {transaction_id} recorded but stock not adjusted: {source}")]
    SaleRecordedButStockNotAdjusted {
        transaction_id: TransactionId,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// True for errors raised before any write (input or business-rule
    /// rejections the caller can fix and retry freely).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidQuantity(_)
                | EngineError::ProductNotFound(_)
                | EngineError::ProductInactive(_)
                | EngineError::InvalidTaxId { .. }
                | EngineError::Validation(_)
        )
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
