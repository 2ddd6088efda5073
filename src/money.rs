//! Monetary amounts: validation of client input, storage helpers and
//! division-safe percentages.
//!
//! Amounts are [Decimal]s so that sums of two-digit values stay exact. They are
//! stored in SQLite as TEXT and parsed back when rows are mapped.

use std::str::FromStr;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusqlite::{Row, types::Type};

use crate::Error;

/// The maximum number of decimal places accepted for an amount.
pub const MAX_DECIMAL_PLACES: u32 = 2;

/// The largest amount accepted from a client or stored in a running total.
///
/// Sums of many amounts below this bound stay far from [Decimal::MAX].
/// 9_999_999_999_999.99 (mantissa 999_999_999_999_999, scale 2).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_7FFF, 0x0003_8D7E, 0, false, 2);

/// Check that `amount` is positive, at most [MAX_AMOUNT] and has at most two
/// decimal places.
///
/// `field` names the amount in the error message, e.g. "amount" or "targetAmount".
///
/// # Errors
///
/// Returns an [Error::Validation] describing the first rule that failed.
pub fn validate_positive_amount(amount: Decimal, field: &str) -> Result<Decimal, Error> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(format!("{field} must be greater than 0")));
    }

    if amount > MAX_AMOUNT {
        return Err(exceeds_max_amount(field));
    }

    if amount.normalize().scale() > MAX_DECIMAL_PLACES {
        return Err(Error::Validation(format!(
            "{field} must have at most {MAX_DECIMAL_PLACES} decimal places"
        )));
    }

    Ok(amount)
}

/// Check that `amount` is zero or positive, at most [MAX_AMOUNT] and has at
/// most two decimal places.
///
/// # Errors
///
/// Returns an [Error::Validation] describing the first rule that failed.
pub fn validate_non_negative_amount(amount: Decimal, field: &str) -> Result<Decimal, Error> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::Validation(format!("{field} must not be negative")));
    }

    if amount.is_zero() {
        return Ok(Decimal::ZERO);
    }

    validate_positive_amount(amount, field)
}

/// Add two amounts, failing if the result is above [MAX_AMOUNT].
///
/// # Errors
///
/// Returns an [Error::Validation] naming `field` if the sum is too large.
pub fn add_amounts(lhs: Decimal, rhs: Decimal, field: &str) -> Result<Decimal, Error> {
    lhs.checked_add(rhs)
        .filter(|sum| *sum <= MAX_AMOUNT)
        .ok_or_else(|| exceeds_max_amount(field))
}

fn exceeds_max_amount(field: &str) -> Error {
    Error::Validation(format!("{field} must be at most {MAX_AMOUNT}"))
}

/// Calculate `part / whole * 100`.
///
/// Returns 0 when `whole` is zero or the division overflows, never NaN.
pub fn percentage(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }

    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percent| percent.to_f64())
        .unwrap_or(0.0)
}

/// Read a decimal stored as TEXT from column `index` of `row`.
pub(crate) fn get_decimal(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let raw: String = row.get(index)?;

    Decimal::from_str(&raw).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}


#[cfg(test)]
mod percentage_tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::money::percentage;

    #[test]
    fn zero_denominator_gives_zero() {
        assert_eq!(percentage(dec!(50), Decimal::ZERO), 0.0);
    }

    #[test]
    fn computes_percentage() {
        assert_eq!(percentage(dec!(25), dec!(200)), 12.5);
    }

    #[test]
    fn is_not_capped() {
        assert_eq!(percentage(dec!(300), dec!(200)), 150.0);
    }
}
