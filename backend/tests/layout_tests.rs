//! Invoice layout composer tests
//!
//! Tests for the page-layout composer:
//! - totals are recomputed from the items, never trusted from the caller
//! - rows are split across pages with the TOTAL row on the last page only
//! - short invoices are padded so the printed table is not stubby
//! - serial numbers run continuously across pages

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::layout::{compose, ComposeError, MAX_ROWS_PER_PAGE, MIN_ROWS_FIRST_PAGE};
use shared::models::{BillTo, InvoiceItemDraft};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn bill_to() -> BillTo {
    BillTo {
        name: "Acme Clinic".to_string(),
        address: "12 Canal Road\nLahore".to_string(),
    }
}

fn item(description: &str, power: &str, quantity: i32, price: &str) -> InvoiceItemDraft {
    InvoiceItemDraft {
        description: description.to_string(),
        power: power.to_string(),
        quantity,
        price: dec(price),
    }
}

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A one-item invoice: recomputed total, formatted power, padded page
    #[test]
    fn test_single_item_invoice() {
        let items = vec![item("Lens A", "8", 2, "100.00")];
        let layout = compose(560, test_date(), bill_to(), &items, None).unwrap();

        assert_eq!(layout.invoice_no, 560);
        assert_eq!(layout.date, "15/03/2024");
        assert_eq!(layout.total, dec("200.00"));
        assert_eq!(layout.amount_in_words, "Rupees Two hundred Only.");
        assert_eq!(layout.pages.len(), 1);

        let page = &layout.pages[0];
        assert_eq!(page.rows.len(), MIN_ROWS_FIRST_PAGE);

        let first = &page.rows[0];
        assert_eq!(first.serial, "1");
        assert_eq!(first.power, "8.0D");
        assert_eq!(first.quantity, "2");
        assert_eq!(first.amount, "200.00");

        // Remaining rows are the blank padding
        assert!(page.rows[1..].iter().all(|r| r.is_blank()));

        let total = page.total_row.as_ref().unwrap();
        assert_eq!(total.rate, "TOTAL");
        assert_eq!(total.amount, "200.00");
    }

    /// A declared total matching the items is accepted
    #[test]
    fn test_matching_declared_total_accepted() {
        let items = vec![item("Lens A", "8", 2, "100.00")];
        let layout = compose(560, test_date(), bill_to(), &items, Some(dec("200.00"))).unwrap();
        assert_eq!(layout.total, dec("200.00"));
    }

    /// A declared total that disagrees with the items is rejected
    #[test]
    fn test_mismatched_declared_total_rejected() {
        let items = vec![item("Lens A", "8", 2, "100.00")];
        let err = compose(560, test_date(), bill_to(), &items, Some(dec("250.00"))).unwrap_err();

        assert_eq!(
            err,
            ComposeError::TotalMismatch {
                declared: dec("250.00"),
                computed: dec("200.00"),
            }
        );
    }

    /// An invalid item is reported with its index
    #[test]
    fn test_invalid_item_reported_by_index() {
        let items = vec![
            item("Lens A", "", 1, "50.00"),
            item("", "", 1, "50.00"),
        ];
        let err = compose(560, test_date(), bill_to(), &items, None).unwrap_err();

        match err {
            ComposeError::Item { index, .. } => assert_eq!(index, 1),
            other => panic!("expected item error, got {other:?}"),
        }
    }

    /// Zero and negative quantities are rejected
    #[test]
    fn test_non_positive_quantity_rejected() {
        for quantity in [0, -1] {
            let items = vec![item("Lens A", "", quantity, "50.00")];
            assert!(compose(560, test_date(), bill_to(), &items, None).is_err());
        }
    }

    /// An invoice with no items still produces one padded page
    #[test]
    fn test_empty_invoice_single_padded_page() {
        let layout = compose(560, test_date(), bill_to(), &[], None).unwrap();

        assert_eq!(layout.pages.len(), 1);
        assert_eq!(layout.total, Decimal::ZERO);
        assert_eq!(layout.pages[0].rows.len(), MIN_ROWS_FIRST_PAGE);
        assert!(layout.pages[0].rows.iter().all(|r| r.is_blank()));
        assert!(layout.pages[0].total_row.is_some());
    }

    /// The TOTAL row appears on the last page and nowhere else
    #[test]
    fn test_total_row_on_last_page_only() {
        let items: Vec<_> = (0..MAX_ROWS_PER_PAGE * 2 + 5)
            .map(|i| item(&format!("Lens {i}"), "", 1, "10.00"))
            .collect();
        let layout = compose(560, test_date(), bill_to(), &items, None).unwrap();

        assert_eq!(layout.pages.len(), 3);
        assert!(layout.pages[0].total_row.is_none());
        assert!(layout.pages[1].total_row.is_none());
        assert!(layout.pages[2].total_row.is_some());
        assert_eq!(layout.pages[2].rows.len(), 5);
    }

    /// Serial numbers continue across page boundaries
    #[test]
    fn test_serials_continue_across_pages() {
        let items: Vec<_> = (0..MAX_ROWS_PER_PAGE + 3)
            .map(|i| item(&format!("Lens {i}"), "", 1, "10.00"))
            .collect();
        let layout = compose(560, test_date(), bill_to(), &items, None).unwrap();

        let last_on_first = &layout.pages[0].rows[MAX_ROWS_PER_PAGE - 1];
        let first_on_second = &layout.pages[1].rows[0];
        assert_eq!(last_on_first.serial, MAX_ROWS_PER_PAGE.to_string());
        assert_eq!(first_on_second.serial, (MAX_ROWS_PER_PAGE + 1).to_string());
    }

    /// Power strings pass through the display formatter
    #[test]
    fn test_power_formatting_in_rows() {
        let items = vec![
            item("Lens A", "8", 1, "10.00"),
            item("Lens B", "7.5", 1, "10.00"),
            item("Lens C", "plano", 1, "10.00"),
            item("Lens D", "", 1, "10.00"),
        ];
        let layout = compose(560, test_date(), bill_to(), &items, None).unwrap();

        let rows = &layout.pages[0].rows;
        assert_eq!(rows[0].power, "8.0D");
        assert_eq!(rows[1].power, "7.5D");
        assert_eq!(rows[2].power, "plano");
        assert_eq!(rows[3].power, "");
    }

    /// Multi-line addresses split into trimmed, non-empty lines
    #[test]
    fn test_bill_to_address_lines() {
        let bill = BillTo {
            name: "Acme Clinic".to_string(),
            address: "12 Canal Road  \n\nLahore\n".to_string(),
        };
        assert_eq!(bill.address_lines(), vec!["12 Canal Road", "Lahore"]);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn item_strategy() -> impl Strategy<Value = InvoiceItemDraft> {
        ("[A-Za-z][A-Za-z ]{0,29}", 1i32..50, 1u32..10_000).prop_map(|(description, quantity, cents)| {
            InvoiceItemDraft {
                description,
                power: String::new(),
                quantity,
                price: Decimal::new(cents as i64, 2),
            }
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Page count is the row count divided by the page capacity, rounded up
        #[test]
        fn prop_page_count_matches_capacity(
            items in prop::collection::vec(item_strategy(), 1..100)
        ) {
            let layout = compose(560, test_date(), bill_to(), &items, None).unwrap();
            let expected = (items.len() + MAX_ROWS_PER_PAGE - 1) / MAX_ROWS_PER_PAGE;
            prop_assert_eq!(layout.pages.len(), expected);
        }

        /// The total always equals the sum of quantity times price
        #[test]
        fn prop_total_is_sum_of_amounts(
            items in prop::collection::vec(item_strategy(), 1..60)
        ) {
            let layout = compose(560, test_date(), bill_to(), &items, None).unwrap();
            let expected: Decimal = items
                .iter()
                .map(|i| Decimal::from(i.quantity) * i.price)
                .sum();
            prop_assert_eq!(layout.total, expected);
        }

        /// Exactly one page carries the TOTAL row, and it is the last one
        #[test]
        fn prop_single_total_row_on_last_page(
            items in prop::collection::vec(item_strategy(), 1..100)
        ) {
            let layout = compose(560, test_date(), bill_to(), &items, None).unwrap();
            let with_total: Vec<_> = layout
                .pages
                .iter()
                .enumerate()
                .filter(|(_, p)| p.total_row.is_some())
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(with_total, vec![layout.pages.len() - 1]);
        }

        /// Non-blank serials count up from 1 without gaps across all pages
        #[test]
        fn prop_serials_are_continuous(
            items in prop::collection::vec(item_strategy(), 1..100)
        ) {
            let layout = compose(560, test_date(), bill_to(), &items, None).unwrap();
            let serials: Vec<String> = layout
                .pages
                .iter()
                .flat_map(|p| p.rows.iter())
                .filter(|r| !r.is_blank())
                .map(|r| r.serial.clone())
                .collect();
            let expected: Vec<String> = (1..=items.len()).map(|n| n.to_string()).collect();
            prop_assert_eq!(serials, expected);
        }
    }
}
