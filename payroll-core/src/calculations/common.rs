//! Shared helpers for monetary arithmetic.

use rust_decimal::Decimal;

/// Absolute tolerance used when comparing computed monetary amounts.
///
/// Result self-checks treat two amounts closer than this as equal, so
/// callers that post-process values through binary floats stay within
/// contract.
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 round away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps `value` into `[min, max]`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::clamp;
///
/// assert_eq!(clamp(dec!(8000), dec!(3000), dec!(30000)), dec!(8000));
/// assert_eq!(clamp(dec!(35000), dec!(3000), dec!(30000)), dec!(30000));
/// assert_eq!(clamp(dec!(1000), dec!(3000), dec!(30000)), dec!(3000));
/// ```
pub fn clamp(
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Decimal {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Whether two amounts agree within [`MONEY_TOLERANCE`].
pub fn amounts_agree(
    a: Decimal,
    b: Decimal,
) -> bool {
    (a - b).abs() < MONEY_TOLERANCE
}
