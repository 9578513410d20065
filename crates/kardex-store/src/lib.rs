//! # kardex-store: Storage Layer for Kardex
//!
//! SQLite implementation of the engine's store ports, using sqlx for
//! async access and embedded migrations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kardex Data Flow                                 │
//! │                                                                         │
//! │  StockReconciler / SaleCoordinator (kardex-engine)                     │
//! │       │                                                                 │
//! │       │  ProductStore / MovementStore / TransactionStore ports         │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    kardex-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (repository/) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 001_init.sql │  │   │
//! │  │   │ WAL mode      │    │ MovementRepo  │    │ ...          │  │   │
//! │  │   │ Foreign keys  │    │ TxnRepo       │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (or :memory: in tests)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types and port-boundary mapping
//! - [`repository`] - Repository implementations (product, movement, transaction)
//! - [`ports`] - Engine store-port implementations on [`Database`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kardex_engine::{EngineConfig, StockReconciler, SaleCoordinator};
//! use kardex_store::{Database, DbConfig};
//!
//! let db = Arc::new(Database::new(DbConfig::new("kardex.db")).await?);
//!
//! let reconciler = Arc::new(StockReconciler::new(
//!     db.clone(),
//!     db.clone(),
//!     EngineConfig::load_or_default(None),
//! ));
//! let sales = SaleCoordinator::new(db, reconciler);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod ports;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::movement::MovementRepository;
pub use repository::product::ProductRepository;
pub use repository::transaction::TransactionRepository;
