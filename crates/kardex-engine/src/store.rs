//! # Store Ports
//!
//! The engine's narrow view of the backing data store, expressed as
//! object-safe async traits. The store itself (HTTP service, SQLite file,
//! in-memory test double) is an external collaborator; the engine only ever
//! talks to these three ports.
//!
//! ## Port Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Store Ports                                    │
//! │                                                                         │
//! │   StockReconciler ────► ProductStore    get_product                    │
//! │         │                               update_quantity (conditional)  │
//! │         │                                                               │
//! │         └─────────────► MovementStore   insert_movement                │
//! │                                         deactivate_movement            │
//! │                                         movements_for_product          │
//! │                                                                         │
//! │   SaleCoordinator ────► TransactionStore insert_transaction            │
//! │                                          deactivate_transaction        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Conditional Update
//! `update_quantity(id, expected, new)` is the engine's atomicity primitive:
//! the store applies the write only if the current quantity still equals
//! `expected` ("set quantity = new where id = ? and quantity = expected").
//! A [`QuantityUpdate::Stale`] answer means another writer got there first
//! and the reconciler must re-read before trying again. Lost updates are not
//! acceptable; a store that can only do unconditional update-by-id cannot
//! implement this port.

use async_trait::async_trait;

use kardex_core::{
    Movement, MovementDraft, MovementId, Product, ProductId, Transaction, TransactionDraft,
    TransactionId,
};

use crate::error::StoreResult;

// =============================================================================
// Quantity Update Outcome
// =============================================================================

/// Outcome of a conditional stock write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The write was applied; stock now equals the new value.
    Applied,
    /// The guard failed: the row's quantity no longer matched `expected`
    /// (or the row is gone). Nothing was written.
    Stale,
}

// =============================================================================
// Product Store
// =============================================================================

/// Read and conditionally write a product's stock.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetches a product by id. `Ok(None)` when no such row exists.
    async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Conditionally sets the product's quantity to `new`, but only if it
    /// still equals `expected`.
    async fn update_quantity(
        &self,
        id: ProductId,
        expected: i64,
        new: i64,
    ) -> StoreResult<QuantityUpdate>;
}

// =============================================================================
// Movement Store
// =============================================================================

/// Append-only persistence for stock movements.
#[async_trait]
pub trait MovementStore: Send + Sync {
    /// Appends a movement row. The store assigns the identity and the
    /// timestamp; existing rows are never overwritten.
    async fn insert_movement(&self, draft: &MovementDraft) -> StoreResult<Movement>;

    /// Marks a movement inactive (rollback annotation / compensation).
    /// The row itself is never removed.
    async fn deactivate_movement(&self, id: MovementId) -> StoreResult<()>;

    /// All movements for a product, newest first. Includes deactivated
    /// rows; audit callers filter on `is_active`.
    async fn movements_for_product(&self, product_id: ProductId) -> StoreResult<Vec<Movement>>;
}

// =============================================================================
// Transaction Store
// =============================================================================

/// Persistence for sale transactions (boletas/facturas).
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists a transaction. The store assigns identity, issue date and
    /// creation timestamp. Rows are immutable once written.
    async fn insert_transaction(&self, draft: &TransactionDraft) -> StoreResult<Transaction>;

    /// Marks a transaction inactive. Transactions are never deleted.
    async fn deactivate_transaction(&self, id: TransactionId) -> StoreResult<()>;
}
