//! Money values as the schema stores them: NUMERIC(12, 2).

use rust_decimal::Decimal;

use crate::error::AppError;

/// Digits after the decimal point a stored amount may carry.
pub const MONEY_SCALE: u32 = 2;

/// Largest value a NUMERIC(12, 2) column holds: 9_999_999_999.99.
pub const MAX_MONEY: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Reject values the column would round or overflow. Trailing zeros are fine (`1.500`).
pub(crate) fn check_money(value: Decimal, field: &str) -> Result<(), AppError> {
    if value.normalize().scale() > MONEY_SCALE {
        return Err(AppError::InvalidRequest(format!(
            "{field} must have at most {MONEY_SCALE} decimal places"
        )));
    }
    if value.abs() > MAX_MONEY {
        return Err(AppError::InvalidRequest(format!(
            "{field} must not exceed {MAX_MONEY}"
        )));
    }
    Ok(())
}
