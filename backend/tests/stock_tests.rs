//! Stock ledger tests
//!
//! Tests for the running-balance stock model:
//! - balances are the sum of IN movements minus OUT movements
//! - an OUT movement larger than the balance is rejected whole
//! - movement directions round-trip through their wire form

use proptest::prelude::*;

use shared::models::MovementDirection;
use shared::validation::can_withdraw;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Directions serialize to the journal's uppercase form
    #[test]
    fn test_direction_wire_form() {
        assert_eq!(MovementDirection::In.as_str(), "IN");
        assert_eq!(MovementDirection::Out.as_str(), "OUT");
        assert_eq!(MovementDirection::parse("IN"), Some(MovementDirection::In));
        assert_eq!(MovementDirection::parse("OUT"), Some(MovementDirection::Out));
        assert_eq!(MovementDirection::parse("SIDEWAYS"), None);
    }

    /// A balance covers a withdrawal up to and including itself
    #[test]
    fn test_withdrawal_within_balance() {
        assert!(can_withdraw(10, 1));
        assert!(can_withdraw(10, 10));
        assert!(!can_withdraw(10, 11));
        assert!(!can_withdraw(0, 1));
    }

    /// Non-positive withdrawals are never valid
    #[test]
    fn test_non_positive_withdrawal_rejected() {
        assert!(!can_withdraw(10, 0));
        assert!(!can_withdraw(10, -5));
    }

    /// Replaying a movement history gives the expected balance
    #[test]
    fn test_balance_replay() {
        let history = [
            (MovementDirection::In, 50),
            (MovementDirection::In, 30),
            (MovementDirection::Out, 20),
            (MovementDirection::In, 10),
            (MovementDirection::Out, 15),
        ];

        let balance = history.iter().fold(0i32, |acc, (dir, qty)| match dir {
            MovementDirection::In => acc + qty,
            MovementDirection::Out => acc - qty,
        });

        assert_eq!(balance, 55);
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

        /// Applying only withdrawals that pass the check keeps the balance
        /// non-negative
        #[test]
        fn prop_guarded_balance_never_negative(
            movements in prop::collection::vec((prop::bool::ANY, 1i32..100), 1..50)
        ) {
            let mut balance = 0i32;
            for (incoming, qty) in movements {
                if incoming {
                    balance += qty;
                } else if can_withdraw(balance, qty) {
                    balance -= qty;
                }
            }
            prop_assert!(balance >= 0);
        }

        /// A rejected withdrawal leaves the balance untouched
        #[test]
        fn prop_rejected_withdrawal_changes_nothing(
            available in 0i32..100,
            requested in 1i32..200
        ) {
            let before = available;
            let after = if can_withdraw(available, requested) {
                available - requested
            } else {
                available
            };

            if requested > available {
                prop_assert_eq!(after, before);
            } else {
                prop_assert_eq!(after, before - requested);
            }
        }
    }
}
