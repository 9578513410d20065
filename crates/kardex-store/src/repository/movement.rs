//! # Movement Repository
//!
//! Database operations for the append-only stock ledger.
//!
//! Rows are inserted once and only ever touched again to flip
//! `is_active` off when the reconciler compensates a failed stock write.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kardex_core::{Movement, MovementDraft, MovementId, ProductId};

/// Repository for movement database operations.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Appends a movement row.
    ///
    /// SQLite assigns the id, this method assigns the timestamp. The
    /// returned movement is the row as persisted.
    pub async fn insert(&self, draft: &MovementDraft) -> DbResult<Movement> {
        let occurred_at = Utc::now();

        debug!(
            movement_type = %draft.movement_type,
            product_id = draft.product_id,
            quantity = draft.quantity,
            "Inserting movement"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO movements
                (movement_type, product_id, employee_id, quantity, note, transaction_id, occurred_at, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1)
            "#,
        )
        .bind(draft.movement_type)
        .bind(draft.product_id)
        .bind(draft.employee_id)
        .bind(draft.quantity)
        .bind(&draft.note)
        .bind(draft.transaction_id)
        .bind(occurred_at)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Movement", id))
    }

    /// Gets a movement by its row id.
    pub async fn get_by_id(&self, id: MovementId) -> DbResult<Option<Movement>> {
        let movement = sqlx::query_as::<_, Movement>(
            r#"
            SELECT id, movement_type, product_id, employee_id, quantity, note,
                   transaction_id, occurred_at, is_active
            FROM movements
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movement)
    }

    /// Marks a movement inactive (rollback annotation). The row stays.
    pub async fn deactivate(&self, id: MovementId) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE movements SET is_active = 0 WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Movement", id));
        }

        debug!(movement_id = id, "Movement deactivated");
        Ok(())
    }

    /// All movements for a product, newest first, deactivated rows
    /// included.
    pub async fn list_for_product(&self, product_id: ProductId) -> DbResult<Vec<Movement>> {
        let movements = sqlx::query_as::<_, Movement>(
            r#"
            SELECT id, movement_type, product_id, employee_id, quantity, note,
                   transaction_id, occurred_at, is_active
            FROM movements
            WHERE product_id = ?1
            ORDER BY occurred_at DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }
}
