use std::str::FromStr;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use fin_advisor_core::health::policy::ScoringPolicy;
use fin_advisor_core::health::profile::FinancialProfile;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(field: &str, value: &str) -> NapiResult<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|e| to_napi_error(format!("Invalid {field} '{value}': {e}")))
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

/// Positional form: decimal strings in, loan result JSON out.
#[napi]
pub fn loan_emi(principal: String, annual_rate_pct: String, tenure_months: u32) -> NapiResult<String> {
    let result = fin_advisor_core::calculate_loan(
        parse_decimal("principal", &principal)?,
        parse_decimal("annual_rate_pct", &annual_rate_pct)?,
        tenure_months,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&result).map_err(to_napi_error)
}

#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let input: fin_advisor_core::loan::emi::LoanCalculationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fin_advisor_core::loan::emi::analyse_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: fin_advisor_core::loan::schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fin_advisor_core::loan::schedule::build_amortization_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_loan_offers(input_json: String) -> NapiResult<String> {
    let input: fin_advisor_core::loan::offers::OfferComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fin_advisor_core::loan::offers::compare_loan_offers(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Financial health
// ---------------------------------------------------------------------------

#[napi]
pub fn financial_health(profile_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let profile: FinancialProfile = serde_json::from_str(&profile_json).map_err(to_napi_error)?;
    let policy: ScoringPolicy = match policy_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => ScoringPolicy::default(),
    };
    let output = fin_advisor_core::health::scorer::assess_financial_health(&profile, &policy)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
