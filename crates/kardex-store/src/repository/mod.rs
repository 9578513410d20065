//! # Repository Module
//!
//! Database repository implementations for Kardex.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Engine port call                                                      │
//! │       │                                                                 │
//! │       │  db.products().update_quantity_if(id, expected, new)           │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── create(&self, code, name, price, qty)                             │
//! │  └── update_quantity_if(&self, id, expected, new)                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • The engine tests against in-memory port doubles                     │
//! │  • Can swap database implementations behind the same ports             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog and conditional stock writes
//! - [`movement::MovementRepository`] - Append-only stock ledger
//! - [`transaction::TransactionRepository`] - Sale receipts

pub mod movement;
pub mod product;
pub mod transaction;
