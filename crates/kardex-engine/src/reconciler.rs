//! # Stock Reconciler
//!
//! The only authorized mutator of `Product.quantity`. For every accepted
//! movement the product's quantity reflects the cumulative effect of all
//! accepted movements, and stock never goes negative.
//!
//! ## The Register Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   register_movement(draft)                              │
//! │                                                                         │
//! │  1. Validate quantity > 0                 ── InvalidQuantity           │
//! │  2. Read product                          ── ProductNotFound/Inactive  │
//! │  3. Compute new = current ± quantity                                   │
//! │  4. Guard: EXIT below zero?               ── InsufficientStock         │
//! │  5. Append movement to the ledger          (audit row exists even if   │
//! │                                             the stock write fails)     │
//! │  6. Conditional write: quantity = new                                  │
//! │        WHERE quantity = current                                        │
//! │        │                                                                │
//! │        ├── Applied → publish StockEvent, done                          │
//! │        │                                                                │
//! │        ├── Stale → re-read, re-guard, retry (bounded)                  │
//! │        │     ├── now insufficient → deactivate movement,               │
//! │        │     │                      InsufficientStock{available}       │
//! │        │     └── attempts exhausted → deactivate, Conflict             │
//! │        │                                                                │
//! │        └── transport failure → deactivate movement,                    │
//! │                                StockUpdateFailed{movement_id}          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Append Before Write
//! If the stock write fails, the fact that an attempt occurred stays
//! auditable as a deactivated ledger row. The reverse order could apply a
//! quantity change with no ledger record at all, which is worse.
//!
//! ## Concurrency
//! Two callers racing on the same product both read the same `current`,
//! but only one conditional write can match it. The loser re-reads the
//! fresh value and either retries or fails the business guard against it.
//! Lost updates cannot happen; the retry count is bounded by config.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use kardex_core::{
    validation, Movement, MovementDraft, MovementId, MovementType, Product, ProductId,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, StoreError, StoreResult};
use crate::events::StockEvent;
use crate::ledger::MovementLedger;
use crate::store::{MovementStore, ProductStore, QuantityUpdate};

// =============================================================================
// Movement Outcome
// =============================================================================

/// Successful result of a registered movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementOutcome {
    pub movement_id: MovementId,
    pub product_id: ProductId,
    /// The authoritative stock level after the write.
    pub new_quantity: i64,
}

// =============================================================================
// Stock Reconciler
// =============================================================================

/// Applies stock movements to the authoritative product quantity as a
/// single logical unit, compensating on partial failure.
pub struct StockReconciler {
    products: Arc<dyn ProductStore>,
    ledger: MovementLedger,
    config: EngineConfig,
    events: broadcast::Sender<StockEvent>,
}

impl StockReconciler {
    /// Creates a reconciler over the given stores.
    pub fn new(
        products: Arc<dyn ProductStore>,
        movements: Arc<dyn MovementStore>,
        config: EngineConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        StockReconciler {
            products,
            ledger: MovementLedger::new(movements),
            config,
            events,
        }
    }

    /// Subscribes to post-commit stock events.
    pub fn subscribe(&self) -> broadcast::Receiver<StockEvent> {
        self.events.subscribe()
    }

    /// The underlying movement ledger, for audit queries.
    pub fn ledger(&self) -> &MovementLedger {
        &self.ledger
    }

    /// The engine configuration in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers a stock movement and applies its effect to the product's
    /// quantity.
    ///
    /// On success the caller may assume `Product.quantity` equals
    /// [`MovementOutcome::new_quantity`]. On `StockUpdateFailed` the
    /// appended movement has been deactivated (unless `rolled_back` says
    /// otherwise) and retrying the same logical movement is safe: the
    /// retry recomputes from current state rather than replaying stale
    /// values.
    pub async fn register_movement(&self, draft: MovementDraft) -> EngineResult<MovementOutcome> {
        let op_id = Uuid::new_v4();

        // Step 1: validate. No side effects on failure.
        validation::validate_movement_quantity(draft.quantity)
            .map_err(|_| EngineError::InvalidQuantity(draft.quantity))?;

        debug!(
            %op_id,
            movement_type = %draft.movement_type,
            product_id = draft.product_id,
            quantity = draft.quantity,
            "Registering movement"
        );

        // Step 2: the only read of truth immediately before mutation.
        let product = self.fetch_active_product(draft.product_id).await?;

        // Steps 3-4: compute and guard before any write.
        let mut current = product.quantity;
        let mut new_quantity = self.guarded_new_quantity(&draft, current)?;

        // Step 5: append the movement before touching stock, so a failed
        // write still leaves an auditable (deactivated) attempt.
        let movement = match timeout(self.config.op_timeout(), self.ledger.append(&draft)).await {
            Ok(appended) => appended?,
            Err(_) => {
                return Err(EngineError::Transport(StoreError::Timeout(
                    self.config.op_timeout(),
                )))
            }
        };

        // Step 6: conditional write, bounded re-read loop on staleness.
        let max_attempts = self.config.max_write_attempts.max(1);
        for attempt in 1..=max_attempts {
            let written = self
                .bounded(self.products.update_quantity(
                    draft.product_id,
                    current,
                    new_quantity,
                ))
                .await;

            match written {
                Ok(QuantityUpdate::Applied) => {
                    info!(
                        %op_id,
                        movement_id = movement.id,
                        product_id = draft.product_id,
                        new_quantity,
                        attempt,
                        "Movement applied"
                    );
                    self.publish(StockEvent {
                        product_id: draft.product_id,
                        new_quantity,
                        movement_id: movement.id,
                    });
                    return Ok(MovementOutcome {
                        movement_id: movement.id,
                        product_id: draft.product_id,
                        new_quantity,
                    });
                }

                Ok(QuantityUpdate::Stale) if attempt < max_attempts => {
                    debug!(
                        %op_id,
                        product_id = draft.product_id,
                        attempt,
                        "Stock write lost the race, re-reading"
                    );
                    let (fresh_current, fresh_new) =
                        self.reread_and_guard(&draft, &movement).await?;
                    current = fresh_current;
                    new_quantity = fresh_new;
                }

                Ok(QuantityUpdate::Stale) => break,

                // Step 7: compensation. The ledger row exists but stock was
                // never updated; deactivate the movement rather than leave
                // the ledger diverged from the materialized quantity.
                Err(store_err) => {
                    let rolled_back = self.rollback_movement(movement.id).await;
                    warn!(
                        %op_id,
                        movement_id = movement.id,
                        product_id = draft.product_id,
                        rolled_back,
                        error = %store_err,
                        "Stock write failed after movement append"
                    );
                    return Err(EngineError::StockUpdateFailed {
                        movement_id: movement.id,
                        rolled_back,
                        source: store_err,
                    });
                }
            }
        }

        // Attempts exhausted: every write answered Stale. The movement's
        // effect was never applied, so it must not stay active.
        let rolled_back = self.rollback_movement(movement.id).await;
        warn!(
            %op_id,
            movement_id = movement.id,
            product_id = draft.product_id,
            attempts = max_attempts,
            rolled_back,
            "Stock write conflicted on every attempt"
        );
        Err(EngineError::Conflict {
            product_id: draft.product_id,
            attempts: max_attempts,
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Fetches a product, rejecting missing and inactive rows.
    async fn fetch_active_product(&self, id: ProductId) -> EngineResult<Product> {
        let product = self
            .bounded(self.products.get_product(id))
            .await?
            .ok_or(EngineError::ProductNotFound(id))?;

        if !product.is_active {
            return Err(EngineError::ProductInactive(id));
        }

        Ok(product)
    }

    /// Computes the post-movement quantity, enforcing the non-negative
    /// stock guard for exits.
    fn guarded_new_quantity(&self, draft: &MovementDraft, current: i64) -> EngineResult<i64> {
        let new_quantity = current + draft.movement_type.signed_delta(draft.quantity);

        if draft.movement_type == MovementType::Exit && new_quantity < 0 {
            return Err(EngineError::InsufficientStock {
                product_id: draft.product_id,
                available: current,
                requested: draft.quantity,
            });
        }

        Ok(new_quantity)
    }

    /// Re-reads current stock after a stale write and re-applies the
    /// guard. If the fresh value no longer covers an exit, the appended
    /// movement is deactivated and `InsufficientStock` carries the fresh
    /// availability.
    async fn reread_and_guard(
        &self,
        draft: &MovementDraft,
        movement: &Movement,
    ) -> EngineResult<(i64, i64)> {
        let fresh = match self.bounded(self.products.get_product(draft.product_id)).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                // The row vanished between the first read and the retry.
                let rolled_back = self.rollback_movement(movement.id).await;
                return Err(EngineError::StockUpdateFailed {
                    movement_id: movement.id,
                    rolled_back,
                    source: StoreError::Query(format!(
                        "product {} disappeared during stock write",
                        draft.product_id
                    )),
                });
            }
            Err(store_err) => {
                let rolled_back = self.rollback_movement(movement.id).await;
                return Err(EngineError::StockUpdateFailed {
                    movement_id: movement.id,
                    rolled_back,
                    source: store_err,
                });
            }
        };

        match self.guarded_new_quantity(draft, fresh.quantity) {
            Ok(new_quantity) => Ok((fresh.quantity, new_quantity)),
            Err(guard_err) => {
                // A concurrent exit consumed the stock first. This
                // movement never took effect, so it leaves the ledger as
                // a deactivated attempt.
                let rolled_back = self.rollback_movement(movement.id).await;
                debug!(
                    movement_id = movement.id,
                    product_id = draft.product_id,
                    available = fresh.quantity,
                    rolled_back,
                    "Re-read failed the stock guard"
                );
                Err(guard_err)
            }
        }
    }

    /// Best-effort rollback annotation: marks the appended movement
    /// inactive. Returns whether the annotation reached the store; a
    /// `false` means an active movement exists whose effect was never
    /// applied, flagged for manual reconciliation.
    async fn rollback_movement(&self, movement_id: MovementId) -> bool {
        match self.bounded(self.ledger.deactivate(movement_id)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    movement_id,
                    error = %e,
                    "Failed to deactivate movement after stock write failure"
                );
                false
            }
        }
    }

    /// Wraps a store call in the configured timeout. An elapsed timeout
    /// is reported as a transport failure.
    async fn bounded<T>(&self, fut: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        match timeout(self.config.op_timeout(), fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.config.op_timeout())),
        }
    }

    /// Fire-and-forget event publication. A send error only means there
    /// are currently no subscribers.
    fn publish(&self, event: StockEvent) {
        let _ = self.events.send(event);
    }
}
