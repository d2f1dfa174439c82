/// Amounts are stored as REAL columns, so money stays a plain `f64` in EUR.
pub type Amount = f64;

/// Currency every rate and total is expressed in.
pub const CURRENCY: &str = "EUR";

/// Format an amount with two decimal places.
/// Example: 40.0 -> "40.00", -2.5 -> "-2.50"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}

/// Format an amount prefixed with the currency code, as shown on the console.
/// Example: 40.0 -> "EUR 40.00"
pub fn format_money(amount: Amount) -> String {
    format!("{} {}", CURRENCY, format_amount(amount))
}

/// Format a stored amount exactly as persisted, without rounding.
/// Example: 40.0 -> "EUR 40", 3.3333333333333335 -> "EUR 3.3333333333333335"
pub fn format_stored_money(amount: Amount) -> String {
    format!("{} {}", CURRENCY, amount)
}
