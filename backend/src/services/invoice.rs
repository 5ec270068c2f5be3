//! Invoice save-and-generate workflow
//!
//! A save moves through DRAFT -> SAVED -> FINALIZED, with a CONFLICT detour
//! when the invoice number is already taken:
//!
//! - DRAFT: items validated and composed in memory, nothing persisted.
//! - The header and its line items are inserted in one transaction. A
//!   unique violation on `invoice_no` is the CONFLICT signal.
//! - CONFLICT with `replace_existing = false`: nothing is mutated and the
//!   caller gets a 409 to present the replace-or-cancel choice (ABORTED).
//! - CONFLICT with `replace_existing = true`: the old invoice and its items
//!   are deleted and the insert retried inside the same transaction
//!   (RESOLVED).
//! - After commit the customer's counter advances and the PDF is rendered
//!   (FINALIZED). Render happens last so a failed save never produces a
//!   document.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::layout::{compose, InvoiceLayout, LayoutRow};
use shared::models::{BillTo, InvoiceItemDraft};
use shared::numbering::{conflict_action, ConflictAction};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::numbering::NumberingService;
use crate::services::pdf::{PdfRenderer, RenderOptions};

/// Invoice workflow service
#[derive(Clone)]
pub struct InvoiceService {
    db: PgPool,
    config: Arc<Config>,
}

/// Invoice header record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_no: i64,
    pub date: NaiveDate,
    pub customer_id: Uuid,
    pub total: Decimal,
    pub amount_words: String,
    pub created_at: DateTime<Utc>,
}

/// Invoice line item record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub power: String,
    pub quantity: i32,
    pub price: Decimal,
    pub amount: Decimal,
}

/// Invoice header together with its items
#[derive(Debug, Serialize)]
pub struct InvoiceWithItems {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

/// Input for saving an invoice and generating its PDF
#[derive(Debug, Deserialize)]
pub struct SaveInvoiceInput {
    pub customer_id: Uuid,
    /// Explicit number; omitted means "assign the customer's next number"
    pub invoice_no: Option<i64>,
    /// Issue date; defaults to today
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<InvoiceItemDraft>,
    /// Caller-declared total, checked against the computed sum when present
    pub total: Option<Decimal>,
    /// Resolve an invoice-number conflict by replacing the old invoice
    #[serde(default)]
    pub replace_existing: bool,
    /// Draw the letterhead image behind every page
    #[serde(default = "default_true")]
    pub use_letterhead: bool,
    /// Print the tax identification line in the header
    #[serde(default = "default_true")]
    pub print_ntn: bool,
}

fn default_true() -> bool {
    true
}

/// Result of a successful save: the stored header and the rendered document
pub struct SavedInvoice {
    pub invoice: Invoice,
    pub pdf: Vec<u8>,
    pub filename: String,
}

#[derive(FromRow)]
struct CustomerRow {
    name: String,
    address: Option<String>,
}

impl InvoiceService {
    pub fn new(db: PgPool, config: Arc<Config>) -> Self {
        Self { db, config }
    }

    /// Save an invoice and render its PDF
    pub async fn save_and_generate(&self, input: SaveInvoiceInput) -> AppResult<SavedInvoice> {
        let customer = sqlx::query_as::<_, CustomerRow>(
            "SELECT name, address FROM customers WHERE id = $1",
        )
        .bind(input.customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        let numbering = NumberingService::new(self.db.clone());
        let invoice_no = match input.invoice_no {
            Some(no) if no > 0 => no,
            Some(_) => {
                return Err(AppError::validation(
                    "invoice_no",
                    "Invoice number must be a positive integer",
                ))
            }
            None => numbering.next_number(input.customer_id).await?,
        };

        let date = input.date.unwrap_or_else(|| Utc::now().date_naive());
        let bill_to = BillTo {
            name: customer.name,
            address: customer.address.unwrap_or_default(),
        };

        // Composition validates every item and the declared total before any
        // write happens; the layout is reused for rendering after commit.
        let layout = compose(invoice_no, date, bill_to, &input.items, input.total)?;

        let invoice = self
            .insert_with_conflict_handling(&input, invoice_no, date, &layout)
            .await?;

        // SAVED: the counter only moves once the insert is durable
        numbering.advance(input.customer_id, invoice_no).await?;

        let renderer = PdfRenderer::new(&self.config.invoice);
        let pdf = renderer.render(
            &layout,
            &RenderOptions {
                use_letterhead: input.use_letterhead,
                print_ntn: input.print_ntn,
            },
        )?;

        tracing::info!(invoice_no, customer_id = %input.customer_id, "invoice finalized");

        Ok(SavedInvoice {
            filename: format!("Invoice_{}.pdf", invoice.invoice_no),
            invoice,
            pdf,
        })
    }

    /// List invoice headers, newest first
    pub async fn list(&self) -> AppResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, invoice_no, date, customer_id, total, amount_words, created_at
            FROM invoices
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(invoices)
    }

    /// Get an invoice with its line items
    pub async fn get(&self, invoice_id: Uuid) -> AppResult<InvoiceWithItems> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, invoice_no, date, customer_id, total, amount_words, created_at
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        let items = sqlx::query_as::<_, InvoiceItem>(
            r#"
            SELECT id, invoice_id, description, power, quantity, price, amount
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.db)
        .await?;

        Ok(InvoiceWithItems { invoice, items })
    }

    async fn insert_with_conflict_handling(
        &self,
        input: &SaveInvoiceInput,
        invoice_no: i64,
        date: NaiveDate,
        layout: &InvoiceLayout,
    ) -> AppResult<Invoice> {
        let mut tx = self.db.begin().await?;

        match Self::insert_invoice(&mut tx, input, invoice_no, date, layout).await {
            Ok(invoice) => {
                tx.commit().await?;
                Ok(invoice)
            }
            Err(err) => {
                tx.rollback().await?;

                match conflict_action(is_unique_violation(&err), input.replace_existing) {
                    ConflictAction::Propagate => Err(AppError::DatabaseError(err)),
                    // ABORTED: the caller decides whether to replace
                    ConflictAction::Abort => Err(AppError::InvoiceNumberConflict { invoice_no }),
                    // RESOLVED: drop the old invoice and retry inside one
                    // transaction so a failed retry leaves the old one intact
                    ConflictAction::Replace => self.replace_and_retry(input, invoice_no, date, layout).await,
                }
            }
        }
    }

    async fn replace_and_retry(
        &self,
        input: &SaveInvoiceInput,
        invoice_no: i64,
        date: NaiveDate,
        layout: &InvoiceLayout,
    ) -> AppResult<Invoice> {
        let mut tx = self.db.begin().await?;

        let existing_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM invoices WHERE invoice_no = $1",
        )
        .bind(invoice_no)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
            .bind(existing_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(existing_id)
            .execute(&mut *tx)
            .await?;

        let invoice = Self::insert_invoice(&mut tx, input, invoice_no, date, layout)
            .await
            .map_err(AppError::DatabaseError)?;
        tx.commit().await?;

        tracing::info!(invoice_no, "replaced existing invoice after conflict");
        Ok(invoice)
    }

    async fn insert_invoice(
        tx: &mut Transaction<'_, Postgres>,
        input: &SaveInvoiceInput,
        invoice_no: i64,
        date: NaiveDate,
        layout: &InvoiceLayout,
    ) -> Result<Invoice, sqlx::Error> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (invoice_no, date, customer_id, total, amount_words)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, invoice_no, date, customer_id, total, amount_words, created_at
            "#,
        )
        .bind(invoice_no)
        .bind(date)
        .bind(input.customer_id)
        .bind(layout.total)
        .bind(&layout.amount_in_words)
        .fetch_one(&mut **tx)
        .await?;

        // Items are stored as printed: formatted power, recomputed amounts.
        // Blank padding rows exist only in the layout, never in the tables.
        let printed_rows: Vec<&LayoutRow> = layout
            .pages
            .iter()
            .flat_map(|p| p.rows.iter())
            .filter(|r| !r.is_blank())
            .collect();

        for (item, row) in input.items.iter().zip(printed_rows) {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (invoice_id, description, power, quantity, price, amount)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(invoice.id)
            .bind(item.description.trim())
            .bind(&row.power)
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.amount())
            .execute(&mut **tx)
            .await?;
        }

        Ok(invoice)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
