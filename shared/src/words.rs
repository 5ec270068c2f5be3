//! Amount-in-words conversion for printed invoices
//!
//! Financial documents in the target jurisdiction must carry the total
//! spelled out; the wording is always `"Rupees {words} Only."` with only the
//! first letter capitalized, matching the layout of the pre-printed
//! stationery.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const UNITS: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(i64, &str); 4] = [
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Spell out a non-negative integer in English words
///
/// Hundreds take an "and" before the remainder ("one hundred and five").
pub fn number_to_words(n: i64) -> String {
    debug_assert!(n >= 0);
    if n < 20 {
        return UNITS[n as usize].to_string();
    }
    if n < 100 {
        let tens = TENS[(n / 10) as usize];
        return if n % 10 == 0 {
            tens.to_string()
        } else {
            format!("{}-{}", tens, UNITS[(n % 10) as usize])
        };
    }
    if n < 1_000 {
        let head = format!("{} hundred", UNITS[(n / 100) as usize]);
        return if n % 100 == 0 {
            head
        } else {
            format!("{} and {}", head, number_to_words(n % 100))
        };
    }
    for (scale, name) in SCALES {
        if n >= scale {
            let head = format!("{} {}", number_to_words(n / scale), name);
            return if n % scale == 0 {
                head
            } else {
                format!("{} {}", head, number_to_words(n % scale))
            };
        }
    }
    unreachable!("all i64 magnitudes covered by the scale table")
}

/// Render an invoice total as the legal amount-in-words line
///
/// The total is truncated to whole rupees before conversion. Negative totals
/// are the caller's validation problem; this function only ever sees amounts
/// that already passed composition.
pub fn rupees_in_words(total: Decimal) -> String {
    let rupees = total.trunc().to_i64().unwrap_or(0).max(0);
    let mut words = number_to_words(rupees);
    if let Some(first) = words.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    format!("Rupees {} Only.", words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn small_numbers() {
        assert_eq!(number_to_words(0), "zero");
        assert_eq!(number_to_words(7), "seven");
        assert_eq!(number_to_words(13), "thirteen");
        assert_eq!(number_to_words(20), "twenty");
        assert_eq!(number_to_words(42), "forty-two");
        assert_eq!(number_to_words(99), "ninety-nine");
    }

    #[test]
    fn hundreds_use_and() {
        assert_eq!(number_to_words(100), "one hundred");
        assert_eq!(number_to_words(101), "one hundred and one");
        assert_eq!(number_to_words(200), "two hundred");
        assert_eq!(number_to_words(563), "five hundred and sixty-three");
    }

    #[test]
    fn larger_scales() {
        assert_eq!(number_to_words(1_000), "one thousand");
        assert_eq!(
            number_to_words(2_345),
            "two thousand three hundred and forty-five"
        );
        assert_eq!(number_to_words(1_000_000), "one million");
        assert_eq!(
            number_to_words(1_234_567),
            "one million two hundred and thirty-four thousand five hundred and sixty-seven"
        );
    }

    #[test]
    fn rupee_phrasing() {
        assert_eq!(rupees_in_words(dec("200.00")), "Rupees Two hundred Only.");
        assert_eq!(rupees_in_words(dec("0")), "Rupees Zero Only.");
        // truncation, not rounding
        assert_eq!(rupees_in_words(dec("560.99")), "Rupees Five hundred and sixty Only.");
    }
}
