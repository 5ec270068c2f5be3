//! Customer management service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Customer service
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Customer record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    /// Stored invoice counter; None until the first save or an explicit
    /// starting number is given
    pub next_invoice_no: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a customer
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerInput {
    #[validate(length(min = 1, max = 200, message = "Customer name is required"))]
    pub name: String,
    pub address: Option<String>,
    /// Optional starting invoice number for the new customer
    pub starting_invoice_no: Option<i64>,
}

impl CustomerService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a customer, optionally with a starting invoice number
    pub async fn create(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        input
            .validate()
            .map_err(|e| AppError::validation("name", e.to_string()))?;

        if let Some(start) = input.starting_invoice_no {
            if start <= 0 {
                return Err(AppError::validation(
                    "starting_invoice_no",
                    "Starting invoice number must be a positive integer",
                ));
            }
        }

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, address, next_invoice_no)
            VALUES ($1, $2, $3)
            RETURNING id, name, address, next_invoice_no, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.address)
        .bind(input.starting_invoice_no)
        .fetch_one(&self.db)
        .await?;

        Ok(customer)
    }

    /// List all customers ordered by name
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, address, next_invoice_no, created_at FROM customers ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }

    /// Get a single customer
    pub async fn get(&self, customer_id: Uuid) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            "SELECT id, name, address, next_invoice_no, created_at FROM customers WHERE id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))
    }

    /// Delete a customer, refused while any invoice references them
    pub async fn delete(&self, customer_id: Uuid) -> AppResult<()> {
        let invoice_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM invoices WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        if invoice_count > 0 {
            return Err(AppError::CustomerHasInvoices);
        }

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }
        Ok(())
    }
}
