//! Invoice page-layout composer
//!
//! Turns an invoice number, date, customer and line items into the model the
//! PDF renderer draws page by page. All decisions that affect what ends up
//! on paper are made here, so they can be tested without touching a PDF
//! library: line amounts, the grand total, pagination, blank-row padding on
//! the first page, the TOTAL row and the amount-in-words line.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::models::{BillTo, InvoiceItemDraft};
use crate::validation::{format_power, validate_price, validate_quantity};
use crate::words::rupees_in_words;

/// Body rows a single page of the item table can hold
pub const MAX_ROWS_PER_PAGE: usize = 28;

/// The first page is padded with blank rows up to this count so short
/// invoices still fill the pre-printed form
pub const MIN_ROWS_FIRST_PAGE: usize = 12;

/// Errors detected while composing a layout, before any rendering happens
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("item {index}: {message}")]
    Item { index: usize, message: &'static str },

    #[error("declared total {declared} does not match computed total {computed}")]
    TotalMismatch { declared: Decimal, computed: Decimal },

    #[error("invoice total cannot be negative")]
    NegativeTotal,
}

/// One row of the printed item table, already formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutRow {
    pub serial: String,
    pub description: String,
    pub power: String,
    pub quantity: String,
    pub rate: String,
    pub amount: String,
}

impl LayoutRow {
    pub fn blank() -> Self {
        LayoutRow {
            serial: String::new(),
            description: String::new(),
            power: String::new(),
            quantity: String::new(),
            rate: String::new(),
            amount: String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.serial.is_empty() && self.description.is_empty() && self.amount.is_empty()
    }

    /// Cells in column order: #, description, power, qty, rate, amount
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.serial,
            &self.description,
            &self.power,
            &self.quantity,
            &self.rate,
            &self.amount,
        ]
    }
}

/// A single page of the item table
#[derive(Debug, Clone, Serialize)]
pub struct InvoicePage {
    pub rows: Vec<LayoutRow>,
    /// Present on the final page only
    pub total_row: Option<LayoutRow>,
}

/// The composed print model handed to the PDF renderer
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceLayout {
    pub invoice_no: i64,
    /// Display date, dd/mm/yyyy
    pub date: String,
    pub bill_to: BillTo,
    pub pages: Vec<InvoicePage>,
    pub total: Decimal,
    pub amount_in_words: String,
}

impl InvoiceLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Compose the print layout for an invoice
///
/// Line amounts and the grand total are recomputed here; a caller-declared
/// total that disagrees with the computed sum is rejected rather than
/// rendered. An empty item list is accepted (the table is padded with blank
/// rows) to match the web entry form, which allows saving a bare invoice.
pub fn compose(
    invoice_no: i64,
    date: NaiveDate,
    bill_to: BillTo,
    items: &[InvoiceItemDraft],
    declared_total: Option<Decimal>,
) -> Result<InvoiceLayout, ComposeError> {
    let mut rows = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;

    for (index, item) in items.iter().enumerate() {
        if item.description.trim().is_empty() {
            return Err(ComposeError::Item {
                index,
                message: "description is required",
            });
        }
        validate_quantity(item.quantity).map_err(|message| ComposeError::Item { index, message })?;
        validate_price(item.price).map_err(|message| ComposeError::Item { index, message })?;

        let amount = item.amount();
        total += amount;

        rows.push(LayoutRow {
            serial: (index + 1).to_string(),
            description: item.description.trim().to_string(),
            power: format_power(&item.power),
            quantity: item.quantity.to_string(),
            rate: format!("{:.2}", item.price),
            amount: format!("{:.2}", amount),
        });
    }

    if let Some(declared) = declared_total {
        if declared != total {
            return Err(ComposeError::TotalMismatch {
                declared,
                computed: total,
            });
        }
    }
    if total < Decimal::ZERO {
        return Err(ComposeError::NegativeTotal);
    }

    let total_row = LayoutRow {
        serial: String::new(),
        description: String::new(),
        power: String::new(),
        quantity: String::new(),
        rate: "TOTAL".to_string(),
        amount: format!("{:.2}", total),
    };

    let mut pages: Vec<InvoicePage> = rows
        .chunks(MAX_ROWS_PER_PAGE)
        .map(|chunk| InvoicePage {
            rows: chunk.to_vec(),
            total_row: None,
        })
        .collect();
    if pages.is_empty() {
        pages.push(InvoicePage {
            rows: Vec::new(),
            total_row: None,
        });
    }

    let first = &mut pages[0];
    while first.rows.len() < MIN_ROWS_FIRST_PAGE {
        first.rows.push(LayoutRow::blank());
    }

    if let Some(last) = pages.last_mut() {
        last.total_row = Some(total_row);
    }

    Ok(InvoiceLayout {
        invoice_no,
        date: date.format("%d/%m/%Y").to_string(),
        bill_to,
        pages,
        total,
        amount_in_words: rupees_in_words(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(description: &str, power: &str, quantity: i32, price: &str) -> InvoiceItemDraft {
        InvoiceItemDraft {
            description: description.to_string(),
            power: power.to_string(),
            quantity,
            price: dec(price),
        }
    }

    fn bill_to() -> BillTo {
        BillTo {
            name: "Acme Clinic".into(),
            address: "Mall Road\nLahore".into(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    #[test]
    fn single_item_layout() {
        let items = vec![item("Lens A", "8", 2, "100.00")];
        let layout = compose(560, date(), bill_to(), &items, Some(dec("200.00"))).unwrap();

        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.total, dec("200.00"));
        assert_eq!(layout.amount_in_words, "Rupees Two hundred Only.");
        assert_eq!(layout.date, "14/03/2024");

        let page = &layout.pages[0];
        assert_eq!(page.rows.len(), MIN_ROWS_FIRST_PAGE);
        assert_eq!(page.rows[0].power, "8.0D");
        assert_eq!(page.rows[0].amount, "200.00");
        assert!(page.rows[1].is_blank());

        let total_row = page.total_row.as_ref().unwrap();
        assert_eq!(total_row.rate, "TOTAL");
        assert_eq!(total_row.amount, "200.00");
    }

    #[test]
    fn declared_total_must_match() {
        let items = vec![item("Lens A", "", 1, "50.00")];
        let err = compose(560, date(), bill_to(), &items, Some(dec("60.00"))).unwrap_err();
        assert_eq!(
            err,
            ComposeError::TotalMismatch {
                declared: dec("60.00"),
                computed: dec("50.00"),
            }
        );
    }

    #[test]
    fn empty_items_still_produce_a_padded_page() {
        let layout = compose(560, date(), bill_to(), &[], None).unwrap();
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.pages[0].rows.len(), MIN_ROWS_FIRST_PAGE);
        assert!(layout.pages[0].rows.iter().all(LayoutRow::is_blank));
        assert!(layout.pages[0].total_row.is_some());
        assert_eq!(layout.amount_in_words, "Rupees Zero Only.");
    }

    #[test]
    fn items_split_into_pages_with_total_on_last() {
        let items: Vec<_> = (0..MAX_ROWS_PER_PAGE * 2 + 5)
            .map(|i| item(&format!("Lens {}", i), "", 1, "10.00"))
            .collect();
        let layout = compose(560, date(), bill_to(), &items, None).unwrap();

        assert_eq!(layout.page_count(), 3);
        assert_eq!(layout.pages[0].rows.len(), MAX_ROWS_PER_PAGE);
        assert_eq!(layout.pages[1].rows.len(), MAX_ROWS_PER_PAGE);
        assert_eq!(layout.pages[2].rows.len(), 5);
        assert!(layout.pages[0].total_row.is_none());
        assert!(layout.pages[1].total_row.is_none());
        assert!(layout.pages[2].total_row.is_some());
    }

    #[test]
    fn invalid_items_are_rejected_with_index() {
        let items = vec![item("Lens A", "", 1, "10.00"), item("", "", 1, "10.00")];
        let err = compose(560, date(), bill_to(), &items, None).unwrap_err();
        assert_eq!(
            err,
            ComposeError::Item {
                index: 1,
                message: "description is required",
            }
        );

        let items = vec![item("Lens A", "", 0, "10.00")];
        assert!(matches!(
            compose(560, date(), bill_to(), &items, None),
            Err(ComposeError::Item { index: 0, .. })
        ));
    }

    #[test]
    fn serials_continue_across_pages() {
        let items: Vec<_> = (0..MAX_ROWS_PER_PAGE + 1)
            .map(|i| item(&format!("Lens {}", i), "", 1, "10.00"))
            .collect();
        let layout = compose(560, date(), bill_to(), &items, None).unwrap();
        assert_eq!(layout.pages[1].rows[0].serial, (MAX_ROWS_PER_PAGE + 1).to_string());
    }
}
