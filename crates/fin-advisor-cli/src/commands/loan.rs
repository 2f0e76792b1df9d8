use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use fin_advisor_core::loan::emi::{analyse_loan, LoanCalculationInput};
use fin_advisor_core::loan::offers::{compare_loan_offers, OfferComparisonInput};
use fin_advisor_core::loan::schedule::{build_amortization_schedule, ScheduleInput};

use super::{log_warnings, read_record};

/// Arguments for the EMI calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EmiArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 10.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure: Option<u32>,
}

/// Arguments for the amortisation schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: EmiArgs,

    /// Due date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub first_due_date: Option<NaiveDate>,
}

/// Arguments for comparing loan offers
#[derive(Args)]
pub struct CompareOffersArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanCalculationInput = match read_record(args.input.as_deref())? {
        Some(record) => record,
        None => loan_from_flags(&args)?,
    };
    debug!(
        principal = %loan_input.principal,
        rate = %loan_input.annual_rate_pct,
        tenure = loan_input.tenure_months,
        "calculating EMI"
    );

    let output = analyse_loan(&loan_input)?;
    info!(emi = %output.result.monthly_installment, "EMI calculated");
    log_warnings(&output.warnings);
    Ok(serde_json::to_value(output)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = match read_record(args.loan.input.as_deref())? {
        Some(record) => record,
        None => {
            let loan = loan_from_flags(&args.loan)?;
            ScheduleInput {
                principal: loan.principal,
                annual_rate_pct: loan.annual_rate_pct,
                tenure_months: loan.tenure_months,
                first_due_date: args.first_due_date,
            }
        }
    };

    let output = build_amortization_schedule(&schedule_input)?;
    info!(
        installment = %output.result.installment,
        periods = output.result.periods_count,
        "schedule built"
    );
    log_warnings(&output.warnings);
    Ok(serde_json::to_value(output)?)
}

pub fn run_compare_offers(args: CompareOffersArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let offers_input: OfferComparisonInput = read_record(args.input.as_deref())?
        .ok_or("--input <offers.json> is required (or pipe JSON on stdin)")?;
    debug!(offers = offers_input.offers.len(), amount = %offers_input.amount, "comparing offers");

    let output = compare_loan_offers(&offers_input)?;
    info!(
        best = output.result.best_offer.as_deref().unwrap_or("none"),
        eligible = output.result.eligible_count,
        "offers compared"
    );
    log_warnings(&output.warnings);
    Ok(serde_json::to_value(output)?)
}

fn loan_from_flags(args: &EmiArgs) -> Result<LoanCalculationInput, Box<dyn std::error::Error>> {
    Ok(LoanCalculationInput {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
        tenure_months: args.tenure.ok_or("--tenure is required (or provide --input)")?,
    })
}
