//! Invoice drafting models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A line item as entered by the user, before an invoice is saved
///
/// The amount is never stored on the draft: it is always recomputed as
/// `quantity * price` so it cannot drift from its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItemDraft {
    pub description: String,
    /// Free-form lens power ("8", "7.5", or a non-numeric label)
    #[serde(default)]
    pub power: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl InvoiceItemDraft {
    /// Line amount, recomputed from quantity and unit price
    pub fn amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Customer details as they appear on the printed invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillTo {
    pub name: String,
    /// Newline-delimited address block; empty means no address lines
    #[serde(default)]
    pub address: String,
}

impl BillTo {
    /// Address split into printable lines, skipping blank ones
    pub fn address_lines(&self) -> Vec<&str> {
        self.address
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect()
    }
}
