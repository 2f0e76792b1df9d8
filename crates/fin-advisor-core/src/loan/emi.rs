//! Equated Monthly Installment (EMI) on a reducing-balance loan.
//!
//! EMI = P * r * (1 + r)^n / ((1 + r)^n - 1), with r = annual% / 1200.
//! A zero rate falls back to straight-line P / n. The installment is
//! rounded half-up to whole currency units and totals are derived from the
//! rounded installment so `total_payable == installment * n` always holds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::{level_payment, monthly_rate, round_half_up};
use crate::{types::*, AdvisorError, AdvisorResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanCalculationInput {
    /// Amount borrowed.
    pub principal: Money,
    /// Nominal annual rate in percent (10.5 = 10.5%).
    pub annual_rate_pct: Percent,
    /// Number of monthly installments.
    pub tenure_months: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanCalculationResult {
    pub monthly_installment: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub monthly_rate: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the rounded EMI and the totals it implies.
pub fn calculate_loan(
    principal: Money,
    annual_rate_pct: Percent,
    tenure_months: u32,
) -> AdvisorResult<LoanCalculationResult> {
    validate(principal, annual_rate_pct, tenure_months)?;

    let rate = monthly_rate(annual_rate_pct);
    let emi = round_half_up(level_payment(principal, rate, tenure_months)?, 0);
    let total_payable = emi
        .checked_mul(Decimal::from(tenure_months))
        .ok_or_else(|| AdvisorError::InvalidArgument {
            field: "principal".into(),
            reason: "Total payable overflows decimal range".into(),
        })?;

    Ok(LoanCalculationResult {
        monthly_installment: emi,
        total_interest: total_payable - principal,
        total_payable,
        monthly_rate: rate,
    })
}

/// [`calculate_loan`] taking the input record.
pub fn calculate_loan_input(input: &LoanCalculationInput) -> AdvisorResult<LoanCalculationResult> {
    calculate_loan(input.principal, input.annual_rate_pct, input.tenure_months)
}

/// [`calculate_loan`] wrapped in the standard computation envelope.
pub fn analyse_loan(
    input: &LoanCalculationInput,
) -> AdvisorResult<ComputationOutput<LoanCalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = calculate_loan_input(input)?;

    if input.annual_rate_pct.is_zero() {
        warnings.push("Zero interest rate: installment is straight-line principal / tenure".into());
    }
    if result.total_interest > input.principal {
        warnings.push(format!(
            "Total interest {} exceeds the principal borrowed",
            result.total_interest
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "rounding": "half-up to whole currency units",
        "compounding": "monthly, reducing balance",
    });

    Ok(with_metadata(
        "Reducing-balance EMI (equated monthly installment)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

pub(crate) fn validate(
    principal: Money,
    annual_rate_pct: Percent,
    tenure_months: u32,
) -> AdvisorResult<()> {
    if principal <= Decimal::ZERO {
        return Err(AdvisorError::InvalidArgument {
            field: "principal".into(),
            reason: "Principal must be positive.".into(),
        });
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(AdvisorError::InvalidArgument {
            field: "annual_rate_pct".into(),
            reason: "Interest rate cannot be negative.".into(),
        });
    }
    if tenure_months < 1 {
        return Err(AdvisorError::InvalidArgument {
            field: "tenure_months".into(),
            reason: "Tenure must be at least one month.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
