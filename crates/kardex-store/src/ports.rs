//! # Engine Port Implementations
//!
//! Adapts the SQLite repositories to the store ports the engine consumes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Port → Repository Mapping                             │
//! │                                                                         │
//! │  ProductStore::get_product        → ProductRepository::get_by_id       │
//! │  ProductStore::update_quantity    → ProductRepository::update_quantity_if │
//! │  MovementStore::insert_movement   → MovementRepository::insert          │
//! │  MovementStore::deactivate_movement → MovementRepository::deactivate   │
//! │  MovementStore::movements_for_product → MovementRepository::list_for_product │
//! │  TransactionStore::insert_transaction → TransactionRepository::insert  │
//! │  TransactionStore::deactivate_transaction → TransactionRepository::deactivate │
//! │                                                                         │
//! │  DbError maps to StoreError at this boundary; the engine never sees    │
//! │  sqlx types.                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use kardex_core::{
    Movement, MovementDraft, MovementId, Product, ProductId, Transaction, TransactionDraft,
    TransactionId,
};
use kardex_engine::{
    MovementStore, ProductStore, QuantityUpdate, StoreResult, TransactionStore,
};

use crate::pool::Database;

#[async_trait]
impl ProductStore for Database {
    async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.products().get_by_id(id).await?)
    }

    async fn update_quantity(
        &self,
        id: ProductId,
        expected: i64,
        new: i64,
    ) -> StoreResult<QuantityUpdate> {
        let applied = self.products().update_quantity_if(id, expected, new).await?;
        Ok(if applied {
            QuantityUpdate::Applied
        } else {
            QuantityUpdate::Stale
        })
    }
}

#[async_trait]
impl MovementStore for Database {
    async fn insert_movement(&self, draft: &MovementDraft) -> StoreResult<Movement> {
        Ok(self.movements().insert(draft).await?)
    }

    async fn deactivate_movement(&self, id: MovementId) -> StoreResult<()> {
        Ok(self.movements().deactivate(id).await?)
    }

    async fn movements_for_product(&self, product_id: ProductId) -> StoreResult<Vec<Movement>> {
        Ok(self.movements().list_for_product(product_id).await?)
    }
}

#[async_trait]
impl TransactionStore for Database {
    async fn insert_transaction(&self, draft: &TransactionDraft) -> StoreResult<Transaction> {
        Ok(self.transactions().insert(draft).await?)
    }

    async fn deactivate_transaction(&self, id: TransactionId) -> StoreResult<()> {
        Ok(self.transactions().deactivate(id).await?)
    }
}
