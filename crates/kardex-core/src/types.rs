//! # Domain Types
//!
//! Core domain types used throughout Kardex.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Movement     │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  code (business)│   │  type ENTRY/EXIT│   │  tax_id         │       │
//! │  │  quantity >= 0  │   │  quantity > 0   │   │  receipt_type   │       │
//! │  │  price_cents    │   │  transaction_id?│   │  unit_price     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  MovementType   │   │   ReceiptType   │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Entry          │   │  Receipt (8)    │   │  Cash           │       │
//! │  │  Exit           │   │  Invoice (11)   │   │  Card, Transfer │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every persisted entity has a store-assigned `i64` row id. Products also
//! carry a `code` business key (unique, human-readable part number).
//!
//! ## Soft Delete
//! Nothing is ever physically deleted: products, movements and transactions
//! all carry an `is_active` flag. Corrections to the movement ledger are new
//! compensating movements, never edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Store-assigned product identity.
pub type ProductId = i64;

/// Store-assigned movement identity.
pub type MovementId = i64;

/// Store-assigned transaction identity.
pub type TransactionId = i64;

/// Employee identity. Opaque here: employees are managed by an external
/// system; the engine only records who triggered a stock event.
pub type EmployeeId = i64;

// =============================================================================
// Product
// =============================================================================

/// A product in the auto-parts catalog.
///
/// `quantity` is the authoritative stock level. Once the engine is in play it
/// has exactly one writer (the stock reconciler); every mutation round-trips
/// through a fresh read or a conditional store-side update, never a cached
/// value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Store-assigned identity.
    pub id: ProductId,

    /// Part number - unique business key (e.g., "FLT-0042").
    pub code: String,

    /// Display name.
    pub name: String,

    /// Unit price in cents. Never negative.
    pub price_cents: i64,

    /// Current stock level. Invariant: never negative.
    pub quantity: i64,

    /// Whether the product is active (soft delete). Inactive products are
    /// excluded from sales and stock operations.
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Movement Type
// =============================================================================

/// The direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Increases stock (restocking, returned goods).
    Entry,
    /// Decreases stock (a sale or internal use).
    Exit,
}

impl MovementType {
    /// Returns the signed effect of a movement of `quantity` units on stock.
    ///
    /// ## Example
    /// ```rust
    /// use kardex_core::MovementType;
    ///
    /// assert_eq!(MovementType::Entry.signed_delta(5), 5);
    /// assert_eq!(MovementType::Exit.signed_delta(5), -5);
    /// ```
    #[inline]
    pub const fn signed_delta(&self, quantity: i64) -> i64 {
        match self {
            MovementType::Entry => quantity,
            MovementType::Exit => -quantity,
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementType::Entry => write!(f, "entry"),
            MovementType::Exit => write!(f, "exit"),
        }
    }
}

// =============================================================================
// Movement
// =============================================================================

/// A recorded stock event in the append-only ledger.
///
/// Created once per stock event, never mutated after creation except for
/// soft-deactivation (`is_active = false`), which marks a movement whose
/// effect was never applied to stock or which was compensated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Movement {
    /// Store-assigned identity.
    pub id: MovementId,

    /// ENTRY or EXIT.
    pub movement_type: MovementType,

    /// The product whose stock this movement affects.
    pub product_id: ProductId,

    /// The employee who registered the movement.
    pub employee_id: EmployeeId,

    /// Units moved. Invariant: always positive.
    pub quantity: i64,

    /// Optional free-text annotation.
    pub note: Option<String>,

    /// The sale that synthesized this movement, set only for sale-driven
    /// exits.
    pub transaction_id: Option<TransactionId>,

    /// When the movement was recorded.
    pub occurred_at: DateTime<Utc>,

    /// Soft-delete flag. Inactive movements are excluded from any
    /// quantity recomputation or audit total.
    pub is_active: bool,
}

impl Movement {
    /// Signed effect of this movement on stock, or zero when deactivated.
    #[inline]
    pub fn effective_delta(&self) -> i64 {
        if self.is_active {
            self.movement_type.signed_delta(self.quantity)
        } else {
            0
        }
    }
}

/// Input for appending a movement to the ledger.
///
/// The store assigns the identity and timestamp; the draft carries only the
/// business content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementDraft {
    pub movement_type: MovementType,
    pub product_id: ProductId,
    pub employee_id: EmployeeId,
    pub quantity: i64,
    pub note: Option<String>,
    pub transaction_id: Option<TransactionId>,
}

impl MovementDraft {
    /// Creates a draft with no note and no owning transaction.
    pub fn new(
        movement_type: MovementType,
        product_id: ProductId,
        employee_id: EmployeeId,
        quantity: i64,
    ) -> Self {
        MovementDraft {
            movement_type,
            product_id,
            employee_id,
            quantity,
            note: None,
            transaction_id: None,
        }
    }

    /// Attaches a free-text note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Links the movement to the sale that caused it.
    pub fn for_transaction(mut self, transaction_id: TransactionId) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }
}

// =============================================================================
// Receipt Type
// =============================================================================

/// Customer-facing document class, derived solely from the digit count of
/// the customer's tax identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ReceiptType {
    /// Boleta - issued to a person (8-digit DNI).
    Receipt,
    /// Factura - issued to a business (11-digit RUC).
    Invoice,
}

impl std::fmt::Display for ReceiptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReceiptType::Receipt => write!(f, "receipt"),
            ReceiptType::Invoice => write!(f, "invoice"),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Bank transfer.
    Transfer,
}

// =============================================================================
// Transaction
// =============================================================================

/// A persisted sale (boleta/factura).
///
/// Immutable once written; never deleted, only deactivated. When the sale
/// completes, exactly one EXIT [`Movement`] with matching `product_id` and
/// `quantity` is linked back to it via the movement's `transaction_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: TransactionId,

    /// Customer DNI (8 digits) or RUC (11 digits).
    pub tax_id: String,

    pub customer_name: String,
    pub address: String,
    pub email: String,

    /// When the receipt was issued.
    pub issue_date: DateTime<Utc>,

    pub product_id: ProductId,

    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,

    /// Units sold. Always positive.
    pub quantity: i64,

    pub payment_method: PaymentMethod,
    pub observations: Option<String>,
    pub employee_id: EmployeeId,

    /// Derived from `tax_id` digit count at validation time.
    pub receipt_type: ReceiptType,

    /// Soft-delete flag.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total (unit price × quantity) as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.unit_price_cents * self.quantity)
    }
}

/// Input for persisting a transaction.
///
/// `receipt_type` must already be derived from the validated tax id; the
/// store assigns identity, issue date and creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub tax_id: String,
    pub customer_name: String,
    pub address: String,
    pub email: String,
    pub product_id: ProductId,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub payment_method: PaymentMethod,
    pub observations: Option<String>,
    pub employee_id: EmployeeId,
    pub receipt_type: ReceiptType,
}

// =============================================================================
// Sale Draft
// =============================================================================

/// Caller-facing input for registering a sale.
///
/// The receipt type is *not* part of the draft: it is derived during
/// validation from the tax id, never supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDraft {
    pub tax_id: String,
    pub customer_name: String,
    pub address: String,
    pub email: String,
    pub product_id: ProductId,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub payment_method: PaymentMethod,
    pub observations: Option<String>,
    pub employee_id: EmployeeId,
}

// =============================================================================
// Unit Tests
// =============================================================================
