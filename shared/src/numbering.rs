//! Per-customer invoice numbering policy
//!
//! Each customer carries an optional stored counter. When present it is the
//! next number verbatim; when absent the next number is derived from the
//! highest number ever issued to that customer, plus the fixed step. A
//! brand-new customer starts at the fixed default.

/// Fixed increment applied to a customer's counter after each save
pub const STEP: i64 = 3;

/// Starting number for customers with no history and no stored counter
pub const DEFAULT_START: i64 = 560;

/// Decide the next invoice number from what is known about the customer
pub fn resolve_next_number(stored: Option<i64>, max_issued: Option<i64>) -> i64 {
    match (stored, max_issued) {
        (Some(next), _) => next,
        (None, Some(max)) => max + STEP,
        (None, None) => DEFAULT_START,
    }
}

/// The counter value to store once `used_number` has been committed
pub fn advanced_counter(used_number: i64) -> i64 {
    used_number + STEP
}

/// Resolution for an invoice insert that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    /// Surface the number collision; the caller chooses what happens next
    Abort,
    /// Delete the invoice holding the number and retry the insert
    Replace,
    /// Not a number collision; pass the error through untouched
    Propagate,
}

/// Decide how a failed invoice insert is handled
///
/// Only a unique violation on the invoice number is a collision; the
/// caller's `replace_existing` flag picks between aborting and replacing.
/// Every other failure propagates.
pub fn conflict_action(unique_violation: bool, replace_existing: bool) -> ConflictAction {
    match (unique_violation, replace_existing) {
        (false, _) => ConflictAction::Propagate,
        (true, false) => ConflictAction::Abort,
        (true, true) => ConflictAction::Replace,
    }
}
