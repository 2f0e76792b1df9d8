use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::emi::{calculate_loan, validate};
use crate::time_value::{monthly_rate, round_half_up};
use crate::{types::*, AdvisorError, AdvisorResult};

/// Interest is charged in minor currency units.
const INTEREST_DP: u32 = 2;

/// Longest schedule that will be itemised (100 years of monthly rows).
pub const MAX_SCHEDULE_MONTHS: u32 = 1200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    pub annual_rate_pct: Percent,
    pub tenure_months: u32,
    /// Due date of the first installment; later ones fall on the same day
    /// of each following month (clamped to month end).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_due_date: Option<NaiveDate>,
}

/// A single month in the amortisation schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub installment: Money,
    pub periods: Vec<SchedulePeriod>,
    pub periods_count: u32,
    pub total_interest: Money,
    pub total_paid: Money,
}

/// Build the month-by-month repayment schedule behind an EMI.
pub fn build_amortization_schedule(
    input: &ScheduleInput,
) -> AdvisorResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input.principal, input.annual_rate_pct, input.tenure_months)?;
    if input.tenure_months > MAX_SCHEDULE_MONTHS {
        return Err(AdvisorError::InvalidArgument {
            field: "tenure_months".into(),
            reason: format!("Schedules are limited to {MAX_SCHEDULE_MONTHS} months."),
        });
    }

    let emi = calculate_loan(input.principal, input.annual_rate_pct, input.tenure_months)?
        .monthly_installment;
    let rate = monthly_rate(input.annual_rate_pct);

    let mut periods = Vec::new();
    let mut balance = input.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut shortfall_warned = false;

    for period in 1..=input.tenure_months {
        let opening = balance;
        let interest = round_half_up(
            opening.checked_mul(rate).ok_or_else(balance_overflow)?,
            INTEREST_DP,
        );

        if !shortfall_warned && interest > Decimal::ZERO && emi <= interest {
            warnings.push(format!(
                "Installment {emi} does not cover interest {interest} in month {period}; \
                 the balance grows until the final payment"
            ));
            shortfall_warned = true;
        }

        // Final month (or an early payoff) settles whatever is left
        let (payment, principal) = if period == input.tenure_months || emi - interest >= opening {
            (interest.checked_add(opening).ok_or_else(balance_overflow)?, opening)
        } else {
            (emi, emi - interest)
        };

        balance = opening.checked_sub(principal).ok_or_else(balance_overflow)?;
        total_interest = total_interest
            .checked_add(interest)
            .ok_or_else(balance_overflow)?;
        total_paid = total_paid.checked_add(payment).ok_or_else(balance_overflow)?;

        periods.push(SchedulePeriod {
            period,
            due_date: due_date(input.first_due_date, period)?,
            opening_balance: opening,
            payment,
            interest,
            principal,
            closing_balance: balance,
        });

        if balance.is_zero() && period < input.tenure_months {
            warnings.push(format!(
                "Rounded installment clears the loan after {period} of {} months",
                input.tenure_months
            ));
            break;
        }
    }

    if let Some(last) = periods.last() {
        if (last.payment - emi).abs() >= Decimal::ONE {
            warnings.push(format!(
                "Final payment {} differs from the installment {emi} due to rounding",
                last.payment
            ));
        }
    }

    let output = AmortizationSchedule {
        installment: emi,
        periods_count: periods.len() as u32,
        periods,
        total_interest,
        total_paid,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": rate.to_string(),
        "interest_rounding": "half-up to 2 dp per period",
        "final_period": "pays off remaining balance",
    });

    Ok(with_metadata(
        "Reducing-balance amortisation schedule",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn balance_overflow() -> AdvisorError {
    AdvisorError::InvalidArgument {
        field: "principal".into(),
        reason: "Schedule balance overflows decimal range".into(),
    }
}

fn due_date(first: Option<NaiveDate>, period: u32) -> AdvisorResult<Option<NaiveDate>> {
    match first {
        None => Ok(None),
        Some(first) => first
            .checked_add_months(Months::new(period - 1))
            .map(Some)
            .ok_or_else(|| AdvisorError::InvalidArgument {
                field: "first_due_date".into(),
                reason: format!("Due date for period {period} is out of range"),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_input() -> ScheduleInput {
        ScheduleInput {
            principal: dec!(100_000),
            annual_rate_pct: dec!(12),
            tenure_months: 12,
            first_due_date: None,
        }
    }

    #[test]
    fn test_schedule_has_one_row_per_month() {
        let out = build_amortization_schedule(&base_input()).unwrap();
        assert_eq!(out.result.periods.len(), 12);
        assert_eq!(out.result.periods_count, 12);
        assert_eq!(out.result.installment, dec!(8885));
    }

    #[test]
    fn test_first_period_split() {
        let out = build_amortization_schedule(&base_input()).unwrap();
        let first = &out.result.periods[0];
        // 1% of 100k
        assert_eq!(first.interest, dec!(1000));
        assert_eq!(first.principal, dec!(7885));
        assert_eq!(first.closing_balance, dec!(92_115));
    }

    #[test]
    fn test_schedule_clears_balance() {
        let out = build_amortization_schedule(&base_input()).unwrap();
        let last = out.result.periods.last().unwrap();
        assert_eq!(last.closing_balance, Decimal::ZERO);

        let principal_repaid: Decimal = out.result.periods.iter().map(|p| p.principal).sum();
        assert_eq!(principal_repaid, dec!(100_000));
        assert_eq!(out.result.total_paid, dec!(100_000) + out.result.total_interest);
    }

    #[test]
    fn test_balances_chain() {
        let out = build_amortization_schedule(&base_input()).unwrap();
        for pair in out.result.periods.windows(2) {
            assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
        }
    }

    #[test]
    fn test_zero_rate_schedule() {
        let input = ScheduleInput {
            principal: dec!(1200),
            annual_rate_pct: Decimal::ZERO,
            tenure_months: 12,
            first_due_date: None,
        };
        let out = build_amortization_schedule(&input).unwrap();
        assert!(out.result.periods.iter().all(|p| p.interest.is_zero()));
        assert!(out.result.periods.iter().all(|p| p.payment == dec!(100)));
        assert_eq!(out.result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_early_payoff_from_rounding() {
        // 10 / 12 rounds up to 1 per month, so the loan is gone after 10 months
        let input = ScheduleInput {
            principal: dec!(10),
            annual_rate_pct: Decimal::ZERO,
            tenure_months: 12,
            first_due_date: None,
        };
        let out = build_amortization_schedule(&input).unwrap();
        assert_eq!(out.result.periods_count, 10);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_due_dates_clamp_to_month_end() {
        let mut input = base_input();
        input.first_due_date = NaiveDate::from_ymd_opt(2026, 1, 31);
        let out = build_amortization_schedule(&input).unwrap();
        assert_eq!(out.result.periods[0].due_date, NaiveDate::from_ymd_opt(2026, 1, 31));
        assert_eq!(out.result.periods[1].due_date, NaiveDate::from_ymd_opt(2026, 2, 28));
        assert_eq!(out.result.periods[11].due_date, NaiveDate::from_ymd_opt(2026, 12, 31));
    }

    #[test]
    fn test_tenure_beyond_schedule_limit_rejected() {
        for tenure in [MAX_SCHEDULE_MONTHS + 1, u32::MAX] {
            let mut input = base_input();
            input.tenure_months = tenure;
            match build_amortization_schedule(&input).unwrap_err() {
                AdvisorError::InvalidArgument { field, .. } => assert_eq!(field, "tenure_months"),
                other => panic!("Expected InvalidArgument, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_installment_below_interest_warns() {
        // 40 at 12% over 50 years: the EMI rounds to 0
        let input = ScheduleInput {
            principal: dec!(40),
            annual_rate_pct: dec!(12),
            tenure_months: 600,
            first_due_date: None,
        };
        let out = build_amortization_schedule(&input).unwrap();
        assert_eq!(out.result.installment, Decimal::ZERO);
        assert_eq!(out.result.periods_count, 600);
        assert!(out.result.periods[1].opening_balance > dec!(40));
        assert_eq!(out.result.periods.last().unwrap().closing_balance, Decimal::ZERO);
        let shortfall = out
            .warnings
            .iter()
            .filter(|w| w.contains("does not cover interest"))
            .count();
        assert_eq!(shortfall, 1);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let mut input = base_input();
        input.tenure_months = 0;
        assert!(build_amortization_schedule(&input).is_err());
    }
}
