//! # Transaction Repository
//!
//! Database operations for sale receipts (boletas/facturas).
//!
//! Transactions are immutable once written; corrections happen through
//! compensating movements and, in the extreme, deactivation.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kardex_core::{Transaction, TransactionDraft, TransactionId};

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Persists a transaction.
    ///
    /// SQLite assigns the id; issue date and creation timestamp are set
    /// here. The returned transaction is the row as persisted.
    pub async fn insert(&self, draft: &TransactionDraft) -> DbResult<Transaction> {
        let now = Utc::now();

        debug!(
            product_id = draft.product_id,
            quantity = draft.quantity,
            receipt_type = %draft.receipt_type,
            "Inserting transaction"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO transactions
                (tax_id, customer_name, address, email, issue_date, product_id,
                 unit_price_cents, quantity, payment_method, observations,
                 employee_id, receipt_type, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 1, ?13)
            "#,
        )
        .bind(&draft.tax_id)
        .bind(&draft.customer_name)
        .bind(&draft.address)
        .bind(&draft.email)
        .bind(now)
        .bind(draft.product_id)
        .bind(draft.unit_price_cents)
        .bind(draft.quantity)
        .bind(draft.payment_method)
        .bind(&draft.observations)
        .bind(draft.employee_id)
        .bind(draft.receipt_type)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", id))
    }

    /// Gets a transaction by its row id.
    pub async fn get_by_id(&self, id: TransactionId) -> DbResult<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, tax_id, customer_name, address, email, issue_date, product_id,
                   unit_price_cents, quantity, payment_method, observations,
                   employee_id, receipt_type, is_active, created_at
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Marks a transaction inactive. Transactions are never deleted.
    pub async fn deactivate(&self, id: TransactionId) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions SET is_active = 0 WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        debug!(transaction_id = id, "Transaction deactivated");
        Ok(())
    }

    /// Lists active transactions for a product, newest first.
    pub async fn list_for_product(&self, product_id: i64) -> DbResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, tax_id, customer_name, address, email, issue_date, product_id,
                   unit_price_cents, quantity, payment_method, observations,
                   employee_id, receipt_type, is_active, created_at
            FROM transactions
            WHERE product_id = ?1 AND is_active = 1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}
