//! # Low-Stock Alerts
//!
//! Pure evaluation of post-reconciliation stock levels against a threshold.
//!
//! ## Consumer Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Low Stock Observation                               │
//! │                                                                         │
//! │  StockReconciler commits a movement                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StockEvent { product_id, new_quantity, movement_id }                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LowStockObserver::evaluate(product_id, new_quantity)                  │
//! │       │                                                                 │
//! │       ├── new_quantity == 0            → Some(Depleted)                │
//! │       ├── 0 < new_quantity <= threshold → Some(Low)                    │
//! │       └── otherwise                     → None                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The observer is a pure function of its inputs. It persists nothing; what
//! a notification pipeline does with the alert is outside this crate.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;
use crate::DEFAULT_LOW_STOCK_THRESHOLD;

// =============================================================================
// Stock Alert
// =============================================================================

/// A signal that a product's stock crossed an attention threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StockAlert {
    /// Stock is positive but at or under the threshold.
    Low {
        product_id: ProductId,
        remaining: i64,
    },
    /// Stock hit exactly zero.
    Depleted { product_id: ProductId },
}

impl StockAlert {
    /// The product this alert concerns.
    pub fn product_id(&self) -> ProductId {
        match self {
            StockAlert::Low { product_id, .. } => *product_id,
            StockAlert::Depleted { product_id } => *product_id,
        }
    }
}

// =============================================================================
// Low Stock Observer
// =============================================================================

/// Flags products at or under a configurable threshold.
#[derive(Debug, Clone, Copy)]
pub struct LowStockObserver {
    threshold: i64,
}

impl LowStockObserver {
    /// Creates an observer with the given threshold.
    pub fn new(threshold: i64) -> Self {
        LowStockObserver { threshold }
    }

    /// The configured threshold.
    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Evaluates a post-reconciliation stock level.
    ///
    /// Returns `Depleted` at exactly zero, `Low` when positive but at or
    /// under the threshold, and nothing otherwise.
    pub fn evaluate(&self, product_id: ProductId, new_quantity: i64) -> Option<StockAlert> {
        if new_quantity == 0 {
            return Some(StockAlert::Depleted { product_id });
        }

        if new_quantity > 0 && new_quantity <= self.threshold {
            return Some(StockAlert::Low {
                product_id,
                remaining: new_quantity,
            });
        }

        None
    }
}

impl Default for LowStockObserver {
    fn default() -> Self {
        LowStockObserver::new(DEFAULT_LOW_STOCK_THRESHOLD)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
