//! # Post-Commit Stock Events
//!
//! The reconciler's post-commit hook: every successfully applied movement
//! publishes one [`StockEvent`] on a broadcast channel. Subscribers
//! (low-stock observation, notification pipelines) consume the stream
//! without being able to influence the write path.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Stock Event Flow                                   │
//! │                                                                         │
//! │  StockReconciler                                                       │
//! │       │ commit (movement appended AND stock written)                   │
//! │       ▼                                                                 │
//! │  broadcast::Sender<StockEvent>                                         │
//! │       ├──► LowStockObserver subscriber                                 │
//! │       └──► notification pipeline subscriber                            │
//! │                                                                         │
//! │  Events are fire-and-forget: a lagging or absent subscriber never      │
//! │  blocks or fails a stock write.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use kardex_core::{MovementId, ProductId};

// =============================================================================
// Stock Event
// =============================================================================

/// Emitted after a movement and its stock write have both committed.
///
/// `new_quantity` is the authoritative stock level the write produced;
/// consumers must not re-derive it from cached reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEvent {
    pub product_id: ProductId,
    pub new_quantity: i64,
    pub movement_id: MovementId,
}
