//! Side-by-side comparison of lender offers for the same loan amount.
//!
//! Each offer is priced with the EMI calculator, loaded with its processing
//! fee, screened against the lender's amount and income limits, and ranked
//! by total borrowing cost (interest plus fee).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;

use super::emi::calculate_loan;
use crate::time_value::round_half_up;
use crate::{types::*, AdvisorError, AdvisorResult};

/// EMI burden above which an offer is flagged as stretching the borrower.
const EMI_TO_INCOME_ALERT: Decimal = dec!(0.5);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOffer {
    pub provider: String,
    pub annual_rate_pct: Percent,
    pub tenure_months: u32,
    /// Upfront fee as a percentage of the amount borrowed.
    #[serde(default)]
    pub processing_fee_pct: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Money>,
    /// Minimum monthly income the lender accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_income: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferComparisonInput {
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<Money>,
    /// Installments already being paid on other loans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_emi: Option<Money>,
    pub offers: Vec<LoanOffer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferQuote {
    pub provider: String,
    pub annual_rate_pct: Percent,
    pub tenure_months: u32,
    pub emi: Money,
    pub total_payable: Money,
    pub total_interest: Money,
    pub processing_fee: Money,
    pub total_cost: Money,
    pub emi_to_income: Option<Rate>,
    pub eligible: bool,
    pub ineligibility_reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferComparison {
    pub quotes: Vec<OfferQuote>,
    pub best_offer: Option<String>,
    pub savings_vs_costliest: Option<Money>,
    pub eligible_count: usize,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price, screen and rank a set of loan offers.
pub fn compare_loan_offers(
    input: &OfferComparisonInput,
) -> AdvisorResult<ComputationOutput<OfferComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let existing_emi = input.existing_emi.unwrap_or(Decimal::ZERO);
    let mut quotes = Vec::with_capacity(input.offers.len());

    for (idx, offer) in input.offers.iter().enumerate() {
        let quote = quote_offer(input, offer, existing_emi).map_err(|e| match e {
            AdvisorError::InvalidArgument { field, reason } => AdvisorError::InvalidArgument {
                field: format!("offers[{idx}].{field}"),
                reason,
            },
            other => other,
        })?;

        if quote.eligible {
            if let Some(ratio) = quote.emi_to_income {
                if ratio > EMI_TO_INCOME_ALERT {
                    warnings.push(format!(
                        "{}: EMI-to-income ratio {}% exceeds {}%",
                        quote.provider,
                        round_half_up(ratio.saturating_mul(dec!(100)), 1),
                        (EMI_TO_INCOME_ALERT * dec!(100)).normalize(),
                    ));
                }
            }
        }
        quotes.push(quote);
    }

    quotes.sort_by(rank);

    let eligible: Vec<&OfferQuote> = quotes.iter().filter(|q| q.eligible).collect();
    let best_offer = eligible.first().map(|q| q.provider.clone());
    let savings_vs_costliest = match (eligible.first(), eligible.last()) {
        (Some(best), Some(worst)) if eligible.len() > 1 => {
            worst.total_cost.checked_sub(best.total_cost)
        }
        _ => None,
    };
    let eligible_count = eligible.len();

    if eligible_count == 0 {
        warnings.push("No offer is eligible for the requested amount and income".into());
    }

    let output = OfferComparison {
        quotes,
        best_offer,
        savings_vs_costliest,
        eligible_count,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "amount": input.amount.to_string(),
        "existing_emi": existing_emi.to_string(),
        "ranking": "eligible first, then total interest + processing fee",
    });

    Ok(with_metadata(
        "Loan offer comparison (EMI + processing fee)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn quote_offer(
    input: &OfferComparisonInput,
    offer: &LoanOffer,
    existing_emi: Money,
) -> AdvisorResult<OfferQuote> {
    if offer.processing_fee_pct < Decimal::ZERO {
        return Err(AdvisorError::InvalidArgument {
            field: "processing_fee_pct".into(),
            reason: "Processing fee cannot be negative.".into(),
        });
    }

    let loan = calculate_loan(input.amount, offer.annual_rate_pct, offer.tenure_months)?;
    let processing_fee = input
        .amount
        .checked_mul(offer.processing_fee_pct)
        .map(|fee| round_half_up(fee / dec!(100), 0))
        .ok_or_else(|| AdvisorError::InvalidArgument {
            field: "processing_fee_pct".into(),
            reason: "Processing fee overflows decimal range".into(),
        })?;
    let total_cost = loan
        .total_interest
        .checked_add(processing_fee)
        .ok_or_else(|| AdvisorError::InvalidArgument {
            field: "processing_fee_pct".into(),
            reason: "Total cost overflows decimal range".into(),
        })?;

    let emi_to_income = match input.monthly_income.filter(|income| !income.is_zero()) {
        Some(income) => Some(
            loan.monthly_installment
                .checked_add(existing_emi)
                .and_then(|outgo| outgo.checked_div(income))
                .ok_or_else(|| AdvisorError::InvalidArgument {
                    field: "monthly_income".into(),
                    reason: "EMI-to-income ratio overflows decimal range".into(),
                })?,
        ),
        None => None,
    };

    let mut reasons = Vec::new();
    if let Some(max) = offer.max_amount {
        if input.amount > max {
            reasons.push(format!("Amount exceeds lender maximum of {max}"));
        }
    }
    if let (Some(min), Some(income)) = (offer.min_income, input.monthly_income) {
        if income < min {
            reasons.push(format!("Monthly income below lender minimum of {min}"));
        }
    }

    Ok(OfferQuote {
        provider: offer.provider.clone(),
        annual_rate_pct: offer.annual_rate_pct,
        tenure_months: offer.tenure_months,
        emi: loan.monthly_installment,
        total_payable: loan.total_payable,
        total_interest: loan.total_interest,
        processing_fee,
        total_cost,
        emi_to_income,
        eligible: reasons.is_empty(),
        ineligibility_reasons: reasons,
    })
}

fn rank(a: &OfferQuote, b: &OfferQuote) -> Ordering {
    b.eligible
        .cmp(&a.eligible)
        .then_with(|| a.total_cost.cmp(&b.total_cost))
        .then_with(|| a.provider.cmp(&b.provider))
}

fn validate_input(input: &OfferComparisonInput) -> AdvisorResult<()> {
    if input.offers.is_empty() {
        return Err(AdvisorError::InvalidArgument {
            field: "offers".into(),
            reason: "At least one offer is required.".into(),
        });
    }
    if input.amount <= Decimal::ZERO {
        return Err(AdvisorError::InvalidArgument {
            field: "amount".into(),
            reason: "Loan amount must be positive.".into(),
        });
    }
    if let Some(income) = input.monthly_income {
        if income < Decimal::ZERO {
            return Err(AdvisorError::InvalidArgument {
                field: "monthly_income".into(),
                reason: "Monthly income cannot be negative.".into(),
            });
        }
    }
    if let Some(emi) = input.existing_emi {
        if emi < Decimal::ZERO {
            return Err(AdvisorError::InvalidArgument {
                field: "existing_emi".into(),
                reason: "Existing EMI cannot be negative.".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn offer(provider: &str, rate: Decimal, tenure: u32, fee: Decimal) -> LoanOffer {
        LoanOffer {
            provider: provider.into(),
            annual_rate_pct: rate,
            tenure_months: tenure,
            processing_fee_pct: fee,
            max_amount: None,
            min_income: None,
        }
    }

    fn base_input() -> OfferComparisonInput {
        OfferComparisonInput {
            amount: dec!(500_000),
            monthly_income: Some(dec!(85_000)),
            existing_emi: None,
            offers: vec![
                offer("Bajaj Finserv", dec!(11.99), 60, dec!(3.0)),
                offer("HDFC Bank", dec!(9.5), 60, dec!(2.5)),
                offer("MoneyTap", dec!(13.5), 36, dec!(2.0)),
            ],
        }
    }

    #[test]
    fn test_quotes_sorted_by_total_cost() {
        let out = compare_loan_offers(&base_input()).unwrap();
        let costs: Vec<Money> = out.result.quotes.iter().map(|q| q.total_cost).collect();
        let mut sorted = costs.clone();
        sorted.sort();
        assert_eq!(costs, sorted);
        // shorter tenure beats the lower rate on total cost
        assert_eq!(out.result.best_offer.as_deref(), Some("MoneyTap"));
    }

    #[test]
    fn test_processing_fee_and_total_cost() {
        let out = compare_loan_offers(&base_input()).unwrap();
        let hdfc = out
            .result
            .quotes
            .iter()
            .find(|q| q.provider == "HDFC Bank")
            .unwrap();
        assert_eq!(hdfc.processing_fee, dec!(12_500));
        assert_eq!(hdfc.total_cost, hdfc.total_interest + dec!(12_500));
        assert_eq!(hdfc.emi, calculate_loan(dec!(500_000), dec!(9.5), 60).unwrap().monthly_installment);
    }

    #[test]
    fn test_savings_vs_costliest() {
        let out = compare_loan_offers(&base_input()).unwrap();
        let quotes = &out.result.quotes;
        let expected = quotes.last().unwrap().total_cost - quotes.first().unwrap().total_cost;
        assert_eq!(out.result.savings_vs_costliest, Some(expected));
        assert_eq!(out.result.eligible_count, 3);
    }

    #[test]
    fn test_ineligible_offers_rank_last() {
        let mut input = base_input();
        input.offers[2].max_amount = Some(dec!(400_000));
        let out = compare_loan_offers(&input).unwrap();
        let last = out.result.quotes.last().unwrap();
        assert_eq!(last.provider, "MoneyTap");
        assert!(!last.eligible);
        assert_eq!(last.ineligibility_reasons.len(), 1);
        assert_eq!(out.result.best_offer.as_deref(), Some("HDFC Bank"));
    }

    #[test]
    fn test_income_floor() {
        let mut input = base_input();
        input.monthly_income = Some(dec!(20_000));
        for o in &mut input.offers {
            o.min_income = Some(dec!(25_000));
        }
        let out = compare_loan_offers(&input).unwrap();
        assert_eq!(out.result.eligible_count, 0);
        assert!(out.result.best_offer.is_none());
        assert!(out.result.savings_vs_costliest.is_none());
        assert!(out.warnings.iter().any(|w| w.contains("No offer")));
    }

    #[test]
    fn test_emi_to_income_alert() {
        let mut input = base_input();
        input.monthly_income = Some(dec!(30_000));
        input.existing_emi = Some(dec!(5_000));
        let out = compare_loan_offers(&input).unwrap();
        let moneytap = out
            .result
            .quotes
            .iter()
            .find(|q| q.provider == "MoneyTap")
            .unwrap();
        let ratio = moneytap.emi_to_income.unwrap();
        assert_eq!(ratio, (moneytap.emi + dec!(5_000)) / dec!(30_000));
        assert!(out.warnings.iter().any(|w| w.starts_with("MoneyTap")));
    }

    #[test]
    fn test_reject_empty_offers() {
        let mut input = base_input();
        input.offers.clear();
        let err = compare_loan_offers(&input).unwrap_err();
        match err {
            AdvisorError::InvalidArgument { field, .. } => assert_eq!(field, "offers"),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_offer_error_carries_index() {
        let mut input = base_input();
        input.offers[2].tenure_months = 0;
        let err = compare_loan_offers(&input).unwrap_err();
        match err {
            AdvisorError::InvalidArgument { field, .. } => {
                assert_eq!(field, "offers[2].tenure_months")
            }
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_emi_to_income_overflow_is_invalid_argument() {
        let mut input = base_input();
        input.monthly_income = Some(dec!(0.0000000000000000000000001));
        match compare_loan_offers(&input).unwrap_err() {
            AdvisorError::InvalidArgument { field, .. } => {
                assert_eq!(field, "offers[0].monthly_income")
            }
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }
}
