//! Product price-list service
//!
//! Products pre-fill the description and unit price of invoice line items;
//! line items themselves stay free-form.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 200, message = "Product name is required"))]
    pub name: String,
    pub price: Decimal,
}

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        input
            .validate()
            .map_err(|e| AppError::validation("name", e.to_string()))?;

        if input.price < Decimal::ZERO {
            return Err(AppError::validation("price", "Price cannot be negative"));
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price)
            VALUES ($1, $2)
            RETURNING id, name, price, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.price)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// List all products ordered by name
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, created_at FROM products ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }
}
