//! Validation and formatting helpers shared by the web handlers and the
//! invoice composer

use rust_decimal::Decimal;

/// Normalize a free-form lens power string for display
///
/// Numeric input is rendered with one decimal place and the dioptre suffix
/// ("8" -> "8.0D", "7.5" -> "7.5D"); empty input stays empty; anything
/// non-numeric passes through unchanged.
pub fn format_power(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    match value.parse::<f64>() {
        Ok(num) => format!("{:.1}D", num),
        Err(_) => value.to_string(),
    }
}

/// Quantities entered for line items and stock movements must be positive
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be a positive integer");
    }
    Ok(())
}

/// Unit prices must not be negative
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// A stock balance covers a withdrawal up to and including itself
///
/// Shortfalls are rejected whole; there are no partial withdrawals.
pub fn can_withdraw(available: i32, requested: i32) -> bool {
    requested > 0 && requested <= available
}
