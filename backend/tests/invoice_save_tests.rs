//! Invoice save conflict tests
//!
//! Tests for the replace-or-abort handling of invoice number collisions:
//! - a unique violation with replacement requested replaces the old invoice
//! - a unique violation without it aborts and mutates nothing
//! - any other insert failure propagates regardless of the flag
//! - after a resolved save the customer's counter advances by the step

use proptest::prelude::*;

use shared::numbering::{
    advanced_counter, conflict_action, resolve_next_number, ConflictAction,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Saving 560 while 560 exists, with replacement selected: the old
    /// invoice is dropped and the counter advances to 563
    #[test]
    fn test_replace_selected_resolves_collision() {
        let invoice_no = 560;
        let collision = true;

        assert_eq!(conflict_action(collision, true), ConflictAction::Replace);
        assert_eq!(advanced_counter(invoice_no), 563);
        assert_eq!(
            resolve_next_number(Some(advanced_counter(invoice_no)), Some(invoice_no)),
            563
        );
    }

    /// Saving 560 while 560 exists, without replacement: the save aborts
    #[test]
    fn test_replace_declined_aborts() {
        assert_eq!(conflict_action(true, false), ConflictAction::Abort);
    }

    /// Failures that are not number collisions pass through, whatever the
    /// caller asked for
    #[test]
    fn test_other_failures_propagate() {
        assert_eq!(conflict_action(false, false), ConflictAction::Propagate);
        assert_eq!(conflict_action(false, true), ConflictAction::Propagate);
    }

    /// The flag only ever selects between abort and replace; it can never
    /// turn an unrelated failure into a replacement
    #[test]
    fn test_flag_is_inert_without_a_collision() {
        for replace_existing in [false, true] {
            assert_ne!(
                conflict_action(false, replace_existing),
                ConflictAction::Replace
            );
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Replacement reuses the colliding number, so the counter after a
        /// resolved save is the same as after a clean save of that number
        #[test]
        fn prop_resolved_save_advances_like_a_clean_save(invoice_no in 1i64..1_000_000) {
            prop_assert_eq!(conflict_action(true, true), ConflictAction::Replace);
            prop_assert_eq!(
                resolve_next_number(Some(advanced_counter(invoice_no)), Some(invoice_no)),
                invoice_no + 3
            );
        }

        /// Exactly one action per (collision, flag) pair, and Replace only
        /// with both a collision and the flag
        #[test]
        fn prop_replace_needs_collision_and_flag(
            collision in prop::bool::ANY,
            replace_existing in prop::bool::ANY
        ) {
            let action = conflict_action(collision, replace_existing);
            prop_assert_eq!(
                action == ConflictAction::Replace,
                collision && replace_existing
            );
            prop_assert_eq!(action == ConflictAction::Abort, collision && !replace_existing);
            prop_assert_eq!(action == ConflictAction::Propagate, !collision);
        }
    }
}
