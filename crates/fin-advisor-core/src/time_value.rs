use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::AdvisorError;
use crate::types::{Money, Percent, Rate};
use crate::AdvisorResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Convert a quoted annual percentage into a monthly decimal rate: pct / (12 * 100).
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    annual_rate_pct / (MONTHS_PER_YEAR * dec!(100))
}

/// Round half-up (midpoint away from zero) to `dp` decimal places.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Compounding factor (1 + rate)^nper.
///
/// Uses checked exponentiation by squaring, so the cost grows with
/// log2(nper) rather than nper.
pub fn compound_factor(rate: Rate, nper: u32) -> AdvisorResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| AdvisorError::InvalidArgument {
            field: "tenure_months".into(),
            reason: format!("Compounding (1 + {rate})^{nper} overflows decimal range"),
        })
}

/// Level payment that fully amortises `principal` over `nper` periods at `rate`.
///
/// Unlike a spreadsheet PMT the sign is positive and no future value is
/// carried. A zero rate degrades to straight-line division.
pub fn level_payment(principal: Money, rate: Rate, nper: u32) -> AdvisorResult<Money> {
    if nper == 0 {
        return Err(AdvisorError::InvalidArgument {
            field: "tenure_months".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    let n = Decimal::from(nper);
    if rate.is_zero() {
        return Ok(principal / n);
    }

    let factor = compound_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        // rate too small to register at 28 digits
        return Ok(principal / n);
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| AdvisorError::InvalidArgument {
            field: "principal".into(),
            reason: "Installment overflows decimal range".into(),
        })
}
