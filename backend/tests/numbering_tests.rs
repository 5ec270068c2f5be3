//! Invoice numbering tests
//!
//! Tests for the per-customer numbering policy:
//! - a stored counter is the next number verbatim
//! - without a counter, the next number is max issued plus the step
//! - a fresh customer starts at the default
//! - the counter advances by the step after each committed save

use proptest::prelude::*;
use shared::numbering::{advanced_counter, resolve_next_number, DEFAULT_START, STEP};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A stored counter is used verbatim, regardless of history
    #[test]
    fn test_stored_counter_verbatim() {
        assert_eq!(resolve_next_number(Some(560), None), 560);
        assert_eq!(resolve_next_number(Some(560), Some(9000)), 560);
        assert_eq!(resolve_next_number(Some(1), Some(9000)), 1);
    }

    /// Without a counter, max issued plus the step
    #[test]
    fn test_derived_from_history() {
        assert_eq!(resolve_next_number(None, Some(560)), 563);
        assert_eq!(resolve_next_number(None, Some(563)), 566);
    }

    /// No counter and no history means the default start
    #[test]
    fn test_fresh_customer_default() {
        assert_eq!(resolve_next_number(None, None), DEFAULT_START);
        assert_eq!(DEFAULT_START, 560);
    }

    /// Saving moves the counter past the number just used
    #[test]
    fn test_advance_after_save() {
        assert_eq!(advanced_counter(560), 563);
        assert_eq!(advanced_counter(563), 566);
    }

    /// Two saves in a row issue numbers STEP apart
    #[test]
    fn test_consecutive_saves_step_apart() {
        let first = resolve_next_number(None, None);
        let counter = advanced_counter(first);
        let second = resolve_next_number(Some(counter), Some(first));

        assert_eq!(second - first, STEP);
    }

    /// An explicit starting counter overrides the default for the first save
    #[test]
    fn test_explicit_starting_counter() {
        let first = resolve_next_number(Some(1200), None);
        assert_eq!(first, 1200);
        assert_eq!(advanced_counter(first), 1203);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The stored counter always wins over history
        #[test]
        fn prop_stored_counter_wins(
            stored in 1i64..1_000_000,
            max_issued in proptest::option::of(1i64..1_000_000)
        ) {
            prop_assert_eq!(resolve_next_number(Some(stored), max_issued), stored);
        }

        /// Without a counter the next number is strictly greater than history
        #[test]
        fn prop_next_exceeds_history(max_issued in 1i64..1_000_000) {
            let next = resolve_next_number(None, Some(max_issued));
            prop_assert!(next > max_issued);
            prop_assert_eq!(next - max_issued, STEP);
        }

        /// Advancing then resolving yields numbers exactly STEP apart
        #[test]
        fn prop_sequence_is_arithmetic(start in 1i64..1_000_000, saves in 1usize..20) {
            let mut used = start;
            for _ in 1..saves {
                let next = resolve_next_number(Some(advanced_counter(used)), Some(used));
                prop_assert_eq!(next, used + STEP);
                used = next;
            }
            prop_assert_eq!(used, start + STEP * (saves as i64 - 1));
        }
    }
}
