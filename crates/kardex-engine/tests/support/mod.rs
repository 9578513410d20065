//! Shared in-memory store double for engine tests.
//!
//! Implements all three store ports over a `Mutex<Inner>` with the same
//! conditional-update contract as the SQLite adapter, plus knobs for
//! injecting transport failures, forced staleness, write delays and a
//! read rendezvous barrier for interleaving tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Barrier;

use kardex_core::{
    Movement, MovementDraft, MovementId, Product, ProductId, Transaction, TransactionDraft,
    TransactionId,
};
use kardex_engine::{
    MovementStore, ProductStore, QuantityUpdate, StoreError, StoreResult, TransactionStore,
};

#[derive(Default)]
struct Inner {
    products: HashMap<ProductId, Product>,
    movements: Vec<Movement>,
    transactions: Vec<Transaction>,
    next_movement_id: MovementId,
    next_transaction_id: TransactionId,
}

/// In-memory store implementing all three engine ports.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_movement_inserts: AtomicBool,
    fail_movement_deactivations: AtomicBool,
    fail_transaction_inserts: AtomicBool,
    /// Next N conditional writes answer `Stale` without writing.
    forced_stale_writes: AtomicU32,
    /// Sleep applied inside the conditional write, for timeout tests.
    quantity_write_delay: Mutex<Option<Duration>>,
    /// First `read_barrier_budget` product reads rendezvous here, so two
    /// tasks can be forced to observe the same starting quantity.
    read_barrier: Mutex<Option<Arc<Barrier>>>,
    read_barrier_budget: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seeds a product with the given stock level.
    pub fn seed_product(&self, id: ProductId, code: &str, quantity: i64) {
        let now = Utc::now();
        let mut inner = self.inner.lock().unwrap();
        inner.products.insert(
            id,
            Product {
                id,
                code: code.to_string(),
                name: format!("Part {code}"),
                price_cents: 10_99,
                quantity,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn deactivate_product(&self, id: ProductId) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(product) = inner.products.get_mut(&id) {
            product.is_active = false;
        }
    }

    pub fn remove_product(&self, id: ProductId) {
        self.inner.lock().unwrap().products.remove(&id);
    }

    pub fn product_quantity(&self, id: ProductId) -> i64 {
        self.inner.lock().unwrap().products[&id].quantity
    }

    pub fn movements(&self) -> Vec<Movement> {
        self.inner.lock().unwrap().movements.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.inner.lock().unwrap().transactions.clone()
    }

    // ---- failure injection ----

    pub fn fail_movement_inserts(&self) {
        self.fail_movement_inserts.store(true, Ordering::SeqCst);
    }

    pub fn fail_movement_deactivations(&self) {
        self.fail_movement_deactivations.store(true, Ordering::SeqCst);
    }

    pub fn fail_transaction_inserts(&self) {
        self.fail_transaction_inserts.store(true, Ordering::SeqCst);
    }

    /// Forces the next `n` conditional writes to answer `Stale`.
    pub fn force_stale_writes(&self, n: u32) {
        self.forced_stale_writes.store(n, Ordering::SeqCst);
    }

    pub fn delay_quantity_writes(&self, delay: Duration) {
        *self.quantity_write_delay.lock().unwrap() = Some(delay);
    }

    /// Arms a rendezvous barrier on the next `budget` product reads.
    pub fn arm_read_barrier(&self, parties: usize, budget: u32) {
        *self.read_barrier.lock().unwrap() = Some(Arc::new(Barrier::new(parties)));
        self.read_barrier_budget.store(budget, Ordering::SeqCst);
    }

    fn injected() -> StoreError {
        StoreError::Query("injected failure".to_string())
    }

    /// Consumes one unit of a budgeted counter. Returns true while budget
    /// remains.
    fn take_budget(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let barrier = {
            let armed = self.read_barrier.lock().unwrap();
            match armed.as_ref() {
                Some(b) if Self::take_budget(&self.read_barrier_budget) => Some(Arc::clone(b)),
                _ => None,
            }
        };
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }

        Ok(self.inner.lock().unwrap().products.get(&id).cloned())
    }

    async fn update_quantity(
        &self,
        id: ProductId,
        expected: i64,
        new: i64,
    ) -> StoreResult<QuantityUpdate> {
        let delay = *self.quantity_write_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if Self::take_budget(&self.forced_stale_writes) {
            return Ok(QuantityUpdate::Stale);
        }

        let mut inner = self.inner.lock().unwrap();
        match inner.products.get_mut(&id) {
            Some(product) if product.is_active && product.quantity == expected => {
                product.quantity = new;
                product.updated_at = Utc::now();
                Ok(QuantityUpdate::Applied)
            }
            _ => Ok(QuantityUpdate::Stale),
        }
    }
}

#[async_trait]
impl MovementStore for MemoryStore {
    async fn insert_movement(&self, draft: &MovementDraft) -> StoreResult<Movement> {
        if self.fail_movement_inserts.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        let mut inner = self.inner.lock().unwrap();
        inner.next_movement_id += 1;
        let movement = Movement {
            id: inner.next_movement_id,
            movement_type: draft.movement_type,
            product_id: draft.product_id,
            employee_id: draft.employee_id,
            quantity: draft.quantity,
            note: draft.note.clone(),
            transaction_id: draft.transaction_id,
            occurred_at: Utc::now(),
            is_active: true,
        };
        inner.movements.push(movement.clone());
        Ok(movement)
    }

    async fn deactivate_movement(&self, id: MovementId) -> StoreResult<()> {
        if self.fail_movement_deactivations.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        let mut inner = self.inner.lock().unwrap();
        match inner.movements.iter_mut().find(|m| m.id == id) {
            Some(movement) => {
                movement.is_active = false;
                Ok(())
            }
            None => Err(StoreError::Query(format!("no movement {id}"))),
        }
    }

    async fn movements_for_product(&self, product_id: ProductId) -> StoreResult<Vec<Movement>> {
        let inner = self.inner.lock().unwrap();
        let mut movements: Vec<Movement> = inner
            .movements
            .iter()
            .filter(|m| m.product_id == product_id)
            .cloned()
            .collect();
        movements.reverse();
        Ok(movements)
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn insert_transaction(&self, draft: &TransactionDraft) -> StoreResult<Transaction> {
        if self.fail_transaction_inserts.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        let now = Utc::now();
        let mut inner = self.inner.lock().unwrap();
        inner.next_transaction_id += 1;
        let transaction = Transaction {
            id: inner.next_transaction_id,
            tax_id: draft.tax_id.clone(),
            customer_name: draft.customer_name.clone(),
            address: draft.address.clone(),
            email: draft.email.clone(),
            issue_date: now,
            product_id: draft.product_id,
            unit_price_cents: draft.unit_price_cents,
            quantity: draft.quantity,
            payment_method: draft.payment_method,
            observations: draft.observations.clone(),
            employee_id: draft.employee_id,
            receipt_type: draft.receipt_type,
            is_active: true,
            created_at: now,
        };
        inner.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn deactivate_transaction(&self, id: TransactionId) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        match inner.transactions.iter_mut().find(|t| t.id == id) {
            Some(transaction) => {
                transaction.is_active = false;
                Ok(())
            }
            None => Err(StoreError::Query(format!("no transaction {id}"))),
        }
    }
}
