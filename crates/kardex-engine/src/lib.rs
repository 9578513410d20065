//! # Kardex Engine
//!
//! Inventory movement ledger and stock-reconciliation engine. This crate
//! owns the write path for stock: every quantity change flows through the
//! reconciler, every change leaves a ledger row, and sales tie a receipt
//! to its stock exit.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         kardex-engine                                   │
//! │                                                                         │
//! │   SaleCoordinator ──────┐                                              │
//! │     validate sale       │                                              │
//! │     insert transaction  ▼                                              │
//! │                   StockReconciler ───► broadcast StockEvent            │
//! │                     guard + CAS loop         │                         │
//! │                         │                    ▼                         │
//! │                   MovementLedger       LowStockObserver                │
//! │                     append-only        (kardex-core)                   │
//! │                         │                                              │
//! │  ───────────────────────┼───────────────────────────────────────────   │
//! │                         ▼                                              │
//! │        ProductStore / MovementStore / TransactionStore                 │
//! │              (async ports; SQLite adapter in kardex-store)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Model
//! No cross-store transactions are assumed. The reconciler sequences
//! movement-append before the conditional stock write and compensates by
//! deactivating the movement when the write fails, so the ledger and the
//! materialized quantity never silently diverge. Concurrent writers are
//! serialized by the store-side conditional update; losers re-read and
//! retry within a bounded budget.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod ledger;
pub mod reconciler;
pub mod store;

pub use config::EngineConfig;
pub use coordinator::{SaleCoordinator, SaleOutcome};
pub use error::{EngineError, EngineResult, StoreError, StoreResult};
pub use events::StockEvent;
pub use ledger::MovementLedger;
pub use reconciler::{MovementOutcome, StockReconciler};
pub use store::{MovementStore, ProductStore, QuantityUpdate, TransactionStore};
