//! # Sale Coordinator
//!
//! Orchestrates a complete sale: validate the draft, persist the
//! transaction (boleta/factura), then hand the paired EXIT movement to the
//! stock reconciler.
//!
//! ## The Sale Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       register_sale(draft)                              │
//! │                                                                         │
//! │  1. Classify tax id (8 → boleta, 11 → factura)  ── InvalidTaxId        │
//! │  2. Validate quantity, price, customer fields   ── first violation     │
//! │  3. Insert Transaction (frozen unit price)                             │
//! │  4. Reconciler: EXIT movement linked to the transaction                │
//! │        │                                                                │
//! │        ├── ok  → SaleOutcome { transaction, movement, new_quantity }   │
//! │        │                                                                │
//! │        └── err → SaleRecordedButStockNotAdjusted { transaction_id }    │
//! │                  (the transaction is KEPT, not rolled back)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why The Transaction Survives A Failed Movement
//! The receipt was issued to a customer: deleting it would erase a document
//! with legal meaning. The coordinator instead reports a distinct terminal
//! state carrying the transaction id, so the stock adjustment can be
//! resumed without re-selling.

use std::future::Future;
use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use kardex_core::{
    validation, MovementDraft, MovementId, MovementType, ReceiptType, SaleDraft, TransactionDraft,
    TransactionId, ValidationError,
};

use crate::error::{EngineError, EngineResult, StoreError, StoreResult};
use crate::reconciler::StockReconciler;
use crate::store::TransactionStore;

// =============================================================================
// Sale Outcome
// =============================================================================

/// Successful result of a registered sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleOutcome {
    pub transaction_id: TransactionId,
    /// Derived from the tax id, never supplied by the caller.
    pub receipt_type: ReceiptType,
    /// The EXIT movement the sale synthesized.
    pub movement_id: MovementId,
    /// Stock level after the exit.
    pub new_quantity: i64,
}

// =============================================================================
// Sale Coordinator
// =============================================================================

/// Front door for sales. Owns the transaction store and delegates the
/// stock side effect to the reconciler.
pub struct SaleCoordinator {
    transactions: Arc<dyn TransactionStore>,
    reconciler: Arc<StockReconciler>,
}

impl SaleCoordinator {
    /// Creates a coordinator over the given transaction store and
    /// reconciler.
    pub fn new(transactions: Arc<dyn TransactionStore>, reconciler: Arc<StockReconciler>) -> Self {
        SaleCoordinator {
            transactions,
            reconciler,
        }
    }

    /// The reconciler this coordinator drives.
    pub fn reconciler(&self) -> &StockReconciler {
        &self.reconciler
    }

    /// Registers a sale: one immutable transaction plus one linked EXIT
    /// movement.
    ///
    /// Validation runs in full before any write; a rejected draft leaves
    /// no trace. After the transaction is persisted, a failed stock
    /// adjustment surfaces as `SaleRecordedButStockNotAdjusted` and the
    /// transaction is kept.
    pub async fn register_sale(&self, draft: SaleDraft) -> EngineResult<SaleOutcome> {
        let op_id = Uuid::new_v4();

        // Step 1-2: validate everything up front. First violated field
        // wins; nothing has been written yet.
        let (transaction_draft, receipt_type) = Self::validated_transaction_draft(draft)?;

        debug!(
            %op_id,
            product_id = transaction_draft.product_id,
            quantity = transaction_draft.quantity,
            receipt_type = %receipt_type,
            "Registering sale"
        );

        // Step 3: persist the receipt with the unit price frozen as quoted.
        let transaction = self
            .bounded(self.transactions.insert_transaction(&transaction_draft))
            .await?;

        // Step 4: the paired EXIT movement, linked back to the sale.
        let movement_draft = MovementDraft::new(
            MovementType::Exit,
            transaction.product_id,
            transaction.employee_id,
            transaction.quantity,
        )
        .with_note(format!("sale {}", transaction.id))
        .for_transaction(transaction.id);

        match self.reconciler.register_movement(movement_draft).await {
            Ok(outcome) => {
                info!(
                    %op_id,
                    transaction_id = transaction.id,
                    movement_id = outcome.movement_id,
                    new_quantity = outcome.new_quantity,
                    receipt_type = %receipt_type,
                    "Sale completed"
                );
                Ok(SaleOutcome {
                    transaction_id: transaction.id,
                    receipt_type,
                    movement_id: outcome.movement_id,
                    new_quantity: outcome.new_quantity,
                })
            }
            Err(source) => {
                // The receipt exists and stays. Surfacing the transaction
                // id lets the stock adjustment be resumed, not re-sold.
                warn!(
                    %op_id,
                    transaction_id = transaction.id,
                    error = %source,
                    "Sale recorded but stock adjustment failed"
                );
                Err(EngineError::SaleRecordedButStockNotAdjusted {
                    transaction_id: transaction.id,
                    source: Box::new(source),
                })
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Validates a sale draft into a persistable transaction draft.
    ///
    /// Ordering matters: the tax id is classified first so its dedicated
    /// error is never masked by a later field check.
    fn validated_transaction_draft(
        draft: SaleDraft,
    ) -> EngineResult<(TransactionDraft, ReceiptType)> {
        let receipt_type = match validation::validate_tax_id(&draft.tax_id) {
            Ok(receipt_type) => receipt_type,
            Err(ValidationError::InvalidTaxId { digits }) => {
                return Err(EngineError::InvalidTaxId { digits });
            }
            Err(other) => return Err(other.into()),
        };

        validation::validate_movement_quantity(draft.quantity)
            .map_err(|_| EngineError::InvalidQuantity(draft.quantity))?;
        validation::validate_unit_price_cents(draft.unit_price_cents)?;

        let customer_name = validation::validate_required("customer_name", &draft.customer_name)?;
        let address = validation::validate_required("address", &draft.address)?;
        validation::validate_email(&draft.email)?;

        Ok((
            TransactionDraft {
                tax_id: draft.tax_id.trim().to_string(),
                customer_name,
                address,
                email: draft.email.trim().to_string(),
                product_id: draft.product_id,
                unit_price_cents: draft.unit_price_cents,
                quantity: draft.quantity,
                payment_method: draft.payment_method,
                observations: draft.observations,
                employee_id: draft.employee_id,
                receipt_type,
            },
            receipt_type,
        ))
    }

    /// Wraps a store call in the reconciler's configured timeout.
    async fn bounded<T>(&self, fut: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        let op_timeout = self.reconciler.config().op_timeout();
        match timeout(op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(op_timeout)),
        }
    }
}
