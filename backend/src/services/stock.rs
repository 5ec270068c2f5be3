//! Stock ledger service
//!
//! One canonical stock model: every movement appends to the
//! `stock_movements` journal and updates the `stock_levels` running balance
//! (keyed by lens + power) in the same transaction, so reads never
//! re-aggregate history. Outbound movements need a doctor and enough stock,
//! and additionally write the per-staff delivery log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{MovementDirection, SessionUser};
use shared::validation::can_withdraw;

use crate::error::{AppError, AppResult};

/// Stock ledger service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Lens catalogue entry
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Lens {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Doctor receiving deliveries
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Running balance for a lens and power
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockLevel {
    pub lens_id: Uuid,
    pub lens_name: String,
    pub power: String,
    pub quantity_available: i32,
}

/// Journal entry for a stock movement
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    pub lens_id: Uuid,
    pub lens_name: String,
    pub doctor_name: Option<String>,
    pub power: String,
    pub quantity: i32,
    pub direction: String,
    pub created_at: DateTime<Utc>,
}

/// Per-staff delivery log entry
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmployeeDelivery {
    pub id: Uuid,
    pub username: String,
    pub lens_name: String,
    pub doctor_name: Option<String>,
    pub power: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a stock movement
#[derive(Debug, Deserialize)]
pub struct RecordMovementInput {
    pub lens_id: Uuid,
    #[serde(default)]
    pub power: String,
    pub quantity: i32,
    pub direction: MovementDirection,
    /// Required for OUT movements
    pub doctor_id: Option<Uuid>,
}

/// Filters for the delivery log
#[derive(Debug, Default, Deserialize)]
pub struct DeliveryFilter {
    pub username: Option<String>,
    pub doctor_id: Option<Uuid>,
    pub lens_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

impl StockService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Add a lens to the catalogue; names are unique
    pub async fn add_lens(&self, name: &str) -> AppResult<Lens> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name", "Lens name is required"));
        }

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM lenses WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.db)
                .await?;
        if exists {
            return Err(AppError::DuplicateEntry(format!("Lens '{}'", name)));
        }

        let lens = sqlx::query_as::<_, Lens>(
            "INSERT INTO lenses (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.db)
        .await?;

        Ok(lens)
    }

    /// List lenses ordered by name
    pub async fn list_lenses(&self) -> AppResult<Vec<Lens>> {
        let lenses =
            sqlx::query_as::<_, Lens>("SELECT id, name, created_at FROM lenses ORDER BY name")
                .fetch_all(&self.db)
                .await?;
        Ok(lenses)
    }

    /// Add a doctor; names are unique
    pub async fn add_doctor(&self, name: &str) -> AppResult<Doctor> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name", "Doctor name is required"));
        }

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM doctors WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.db)
                .await?;
        if exists {
            return Err(AppError::DuplicateEntry(format!("Doctor '{}'", name)));
        }

        let doctor = sqlx::query_as::<_, Doctor>(
            "INSERT INTO doctors (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.db)
        .await?;

        Ok(doctor)
    }

    /// List doctors ordered by name
    pub async fn list_doctors(&self) -> AppResult<Vec<Doctor>> {
        let doctors =
            sqlx::query_as::<_, Doctor>("SELECT id, name, created_at FROM doctors ORDER BY name")
                .fetch_all(&self.db)
                .await?;
        Ok(doctors)
    }

    /// Record a stock movement and update the running balance
    pub async fn record_movement(
        &self,
        user: &SessionUser,
        input: RecordMovementInput,
    ) -> AppResult<StockMovement> {
        if input.quantity <= 0 {
            return Err(AppError::validation(
                "quantity",
                "Quantity must be a positive integer",
            ));
        }
        if input.direction == MovementDirection::Out && input.doctor_id.is_none() {
            return Err(AppError::validation(
                "doctor_id",
                "Doctor is required for stock OUT",
            ));
        }

        let lens_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM lenses WHERE id = $1)")
                .bind(input.lens_id)
                .fetch_one(&self.db)
                .await?;
        if !lens_exists {
            return Err(AppError::NotFound("Lens".to_string()));
        }

        let power = input.power.trim().to_string();
        let mut tx = self.db.begin().await?;

        match input.direction {
            MovementDirection::In => {
                sqlx::query(
                    r#"
                    INSERT INTO stock_levels (lens_id, power, quantity_available, updated_at)
                    VALUES ($1, $2, $3, now())
                    ON CONFLICT (lens_id, power)
                    DO UPDATE SET
                        quantity_available = stock_levels.quantity_available + EXCLUDED.quantity_available,
                        updated_at = now()
                    "#,
                )
                .bind(input.lens_id)
                .bind(&power)
                .bind(input.quantity)
                .execute(&mut *tx)
                .await?;
            }
            MovementDirection::Out => {
                let available = sqlx::query_scalar::<_, i32>(
                    "SELECT quantity_available FROM stock_levels
                     WHERE lens_id = $1 AND power = $2
                     FOR UPDATE",
                )
                .bind(input.lens_id)
                .bind(&power)
                .fetch_optional(&mut *tx)
                .await?
                .unwrap_or(0);

                if !can_withdraw(available, input.quantity) {
                    tx.rollback().await?;
                    return Err(AppError::InsufficientStock {
                        requested: input.quantity,
                        available,
                    });
                }

                sqlx::query(
                    "UPDATE stock_levels
                     SET quantity_available = quantity_available - $1, updated_at = now()
                     WHERE lens_id = $2 AND power = $3",
                )
                .bind(input.quantity)
                .bind(input.lens_id)
                .bind(&power)
                .execute(&mut *tx)
                .await?;

                sqlx::query(
                    r#"
                    INSERT INTO employee_deliveries (username, lens_id, doctor_id, power, quantity)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(&user.username)
                .bind(input.lens_id)
                .bind(input.doctor_id)
                .bind(&power)
                .bind(input.quantity)
                .execute(&mut *tx)
                .await?;
            }
        }

        let movement_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO stock_movements (lens_id, doctor_id, power, quantity, direction, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(input.lens_id)
        .bind(input.doctor_id)
        .bind(&power)
        .bind(input.quantity)
        .bind(input.direction.as_str())
        .bind(user.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT m.id, m.lens_id, l.name AS lens_name, d.name AS doctor_name,
                   m.power, m.quantity, m.direction, m.created_at
            FROM stock_movements m
            JOIN lenses l ON l.id = m.lens_id
            LEFT JOIN doctors d ON d.id = m.doctor_id
            WHERE m.id = $1
            "#,
        )
        .bind(movement_id)
        .fetch_one(&self.db)
        .await?;

        Ok(movement)
    }

    /// Current running balances with stock on hand
    pub async fn list_levels(&self) -> AppResult<Vec<StockLevel>> {
        let levels = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT s.lens_id, l.name AS lens_name, s.power, s.quantity_available
            FROM stock_levels s
            JOIN lenses l ON l.id = s.lens_id
            WHERE s.quantity_available > 0
            ORDER BY l.name, s.power
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(levels)
    }

    /// Most recent movements, newest first
    pub async fn recent_movements(&self, limit: i64) -> AppResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT m.id, m.lens_id, l.name AS lens_name, d.name AS doctor_name,
                   m.power, m.quantity, m.direction, m.created_at
            FROM stock_movements m
            JOIN lenses l ON l.id = m.lens_id
            LEFT JOIN doctors d ON d.id = m.doctor_id
            ORDER BY m.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        Ok(movements)
    }

    /// Delivery log, optionally filtered by staff, doctor, lens or date
    pub async fn list_deliveries(&self, filter: DeliveryFilter) -> AppResult<Vec<EmployeeDelivery>> {
        let deliveries = sqlx::query_as::<_, EmployeeDelivery>(
            r#"
            SELECT e.id, e.username, l.name AS lens_name, d.name AS doctor_name,
                   e.power, e.quantity, e.created_at
            FROM employee_deliveries e
            JOIN lenses l ON l.id = e.lens_id
            LEFT JOIN doctors d ON d.id = e.doctor_id
            WHERE ($1::text IS NULL OR e.username = $1)
              AND ($2::uuid IS NULL OR e.doctor_id = $2)
              AND ($3::uuid IS NULL OR e.lens_id = $3)
              AND ($4::date IS NULL OR e.created_at::date = $4)
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(&filter.username)
        .bind(filter.doctor_id)
        .bind(filter.lens_id)
        .bind(filter.date)
        .fetch_all(&self.db)
        .await?;
        Ok(deliveries)
    }

    /// Deliveries made by one staff member (team dashboard)
    pub async fn deliveries_for(&self, username: &str) -> AppResult<Vec<EmployeeDelivery>> {
        self.list_deliveries(DeliveryFilter {
            username: Some(username.to_string()),
            ..Default::default()
        })
        .await
    }
}
