//! Balance units. 1 KSS = 100,000,000 units.

use rust_decimal::Decimal;

pub const DECIMALS: u32 = 8;
pub const UNITS_PER_KSS: i64 = 100_000_000;

/// Exact decimal KSS amount for a raw unit balance.
pub fn to_decimal(units: i64) -> Decimal {
    Decimal::new(units, DECIMALS)
}

/// `12.50000000`-style rendering used in console tables.
pub fn format_kss(amount: Decimal) -> String {
    format!("{:.8}", amount)
}
