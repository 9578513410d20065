//! # Movement Ledger
//!
//! Durable, append-only record of stock events, queryable by product.
//!
//! ## Ledger Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Movement Ledger                                   │
//! │                                                                         │
//! │  append(draft)              one new row, never an overwrite            │
//! │  deactivate(id)             rollback annotation, row stays             │
//! │  movements_for_product(id)  newest first, audit history                │
//! │  recorded_delta(id)         Σ signed quantities over ACTIVE rows       │
//! │                                                                         │
//! │  Corrections are new compensating movements, never edits: the ledger   │
//! │  is the audit trail, Product.quantity is the materialized balance.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::debug;

use kardex_core::{validation, Movement, MovementDraft, MovementId, ProductId};

use crate::error::{EngineError, EngineResult, StoreResult};
use crate::store::MovementStore;

// =============================================================================
// Movement Ledger
// =============================================================================

/// Validated facade over a [`MovementStore`].
#[derive(Clone)]
pub struct MovementLedger {
    store: Arc<dyn MovementStore>,
}

impl MovementLedger {
    /// Creates a ledger over the given movement store.
    pub fn new(store: Arc<dyn MovementStore>) -> Self {
        MovementLedger { store }
    }

    /// Appends a movement to the ledger.
    ///
    /// ## Validation
    /// The draft's quantity must be positive; otherwise the append fails
    /// with `InvalidQuantity` and nothing is written.
    pub async fn append(&self, draft: &MovementDraft) -> EngineResult<Movement> {
        validation::validate_movement_quantity(draft.quantity)
            .map_err(|_| EngineError::InvalidQuantity(draft.quantity))?;

        debug!(
            movement_type = %draft.movement_type,
            product_id = draft.product_id,
            quantity = draft.quantity,
            transaction_id = ?draft.transaction_id,
            "Appending movement"
        );

        let movement = self.store.insert_movement(draft).await?;
        Ok(movement)
    }

    /// Marks a movement inactive. Used by the reconciler as the rollback
    /// annotation when a stock write fails after the append.
    pub async fn deactivate(&self, id: MovementId) -> StoreResult<()> {
        debug!(movement_id = id, "Deactivating movement");
        self.store.deactivate_movement(id).await
    }

    /// All movements for a product, newest first. Includes deactivated
    /// rows so the audit trail shows attempted-but-compensated events.
    pub async fn movements_for_product(
        &self,
        product_id: ProductId,
    ) -> EngineResult<Vec<Movement>> {
        let movements = self.store.movements_for_product(product_id).await?;
        Ok(movements)
    }

    /// Net signed effect of all **active** movements for a product.
    ///
    /// For any product whose starting quantity is known, the audit
    /// invariant is `quantity == initial + recorded_delta`.
    pub async fn recorded_delta(&self, product_id: ProductId) -> EngineResult<i64> {
        let movements = self.store.movements_for_product(product_id).await?;
        Ok(movements.iter().map(Movement::effective_delta).sum())
    }
}
