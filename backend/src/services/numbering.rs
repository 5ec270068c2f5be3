//! Per-customer invoice numbering
//!
//! The policy itself lives in `shared::numbering`; this service binds it to
//! the customers and invoices tables.
//!
//! `next_number` is purely a read; the counter only moves through `advance`,
//! called once per successfully committed invoice. Two concurrent requests
//! can therefore observe the same candidate number. The UNIQUE constraint
//! on invoices catches the loser, and the conflict is resolved
//! interactively (see the invoice service).

use sqlx::PgPool;
use uuid::Uuid;

use shared::numbering::{advanced_counter, resolve_next_number};

use crate::error::{AppError, AppResult};

/// Numbering service backed by the customers and invoices tables
#[derive(Clone)]
pub struct NumberingService {
    db: PgPool,
}

impl NumberingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Next invoice number for a customer; no side effects
    pub async fn next_number(&self, customer_id: Uuid) -> AppResult<i64> {
        let stored = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT next_invoice_no FROM customers WHERE id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        // A stored counter decides by itself; reading history would be wasted
        if stored.is_some() {
            return Ok(resolve_next_number(stored, None));
        }

        let max_issued = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MAX(invoice_no) FROM invoices WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        Ok(resolve_next_number(stored, max_issued))
    }

    /// Advance the stored counter past a number that was just used
    ///
    /// Called exactly once per successful save, after the invoice
    /// transaction commits.
    pub async fn advance(&self, customer_id: Uuid, used_number: i64) -> AppResult<()> {
        let result = sqlx::query("UPDATE customers SET next_invoice_no = $1 WHERE id = $2")
            .bind(advanced_counter(used_number))
            .bind(customer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }
        Ok(())
    }
}
