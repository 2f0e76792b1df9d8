//! Composite financial health score.
//!
//! Six sub-scores, each on a nominal 0–100 scale:
//! 1. **Income stability** -- employment type + income tier + experience tier.
//! 2. **Debt-to-income** -- tiered on expenses / total income.
//! 3. **Savings** -- tiered on (income - expenses) / income, plus a bonus
//!    when the investments description is detailed.
//! 4. **Credit history** -- bureau score rescaled from 850 to 100.
//! 5. **Completeness** -- share of profile fields filled in.
//! 6. **Banking** -- base plus preferred-bank and salary-account bonuses.
//!
//! The weighted sum is rounded half-up to the health score, which drives the
//! risk tier and a capped eligibility percentage.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::credit_band::CreditBand;
use super::policy::{RiskThresholds, ScoringPolicy};
use super::profile::{profile_completeness, EmploymentType, FinancialProfile};
use crate::time_value::round_half_up;
use crate::{types::*, AdvisorError, AdvisorResult};

const MAX_CREDIT_SCORE: u16 = 850;
const CREDIT_SCALE_DIVISOR: Decimal = dec!(8.5);
const SUBSCORE_CEILING: Score = dec!(100);
const BANKING_BASE: Score = dec!(60);
const BANKING_BONUS: Score = dec!(20);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub fn classify(score: u32, thresholds: &RiskThresholds) -> Self {
        if score >= thresholds.low {
            RiskCategory::Low
        } else if score >= thresholds.medium {
            RiskCategory::Medium
        } else {
            RiskCategory::High
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskCategory::Low => write!(f, "low"),
            RiskCategory::Medium => write!(f, "medium"),
            RiskCategory::High => write!(f, "high"),
        }
    }
}

/// Sub-scores before weighting. Rounded to whole points when reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub income_stability: Score,
    pub debt_to_income: Score,
    pub savings: Score,
    pub credit_history: Score,
    pub completeness: Score,
    pub banking: Score,
}

impl ScoreBreakdown {
    pub fn entries(&self) -> [(&'static str, Score); 6] {
        [
            ("income_stability", self.income_stability),
            ("debt_to_income", self.debt_to_income),
            ("savings", self.savings),
            ("credit_history", self.credit_history),
            ("completeness", self.completeness),
            ("banking", self.banking),
        ]
    }

    fn map(self, f: impl Fn(Score) -> Score) -> Self {
        ScoreBreakdown {
            income_stability: f(self.income_stability),
            debt_to_income: f(self.debt_to_income),
            savings: f(self.savings),
            credit_history: f(self.credit_history),
            completeness: f(self.completeness),
            banking: f(self.banking),
        }
    }

    fn weighted_sum(&self, policy: &ScoringPolicy) -> Option<Decimal> {
        let w = &policy.weights;
        [
            (self.income_stability, w.income_stability),
            (self.debt_to_income, w.debt_to_income),
            (self.savings, w.savings),
            (self.credit_history, w.credit_history),
            (self.completeness, w.completeness),
            (self.banking, w.banking),
        ]
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (score, weight)| {
            acc.checked_add(score.checked_mul(weight)?)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialHealthResult {
    pub financial_health_score: u32,
    pub risk_category: RiskCategory,
    pub eligibility_score: u32,
    pub breakdown: ScoreBreakdown,
    pub credit_band: CreditBand,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score a profile with the reference [`ScoringPolicy`].
pub fn calculate_financial_health(
    profile: &FinancialProfile,
) -> AdvisorResult<FinancialHealthResult> {
    calculate_financial_health_with_policy(profile, &ScoringPolicy::default())
}

/// Score a profile under a caller-supplied policy.
pub fn calculate_financial_health_with_policy(
    profile: &FinancialProfile,
    policy: &ScoringPolicy,
) -> AdvisorResult<FinancialHealthResult> {
    policy.validate()?;
    let raw = sub_scores(profile, policy)?;
    finish(profile, policy, raw)
}

/// [`calculate_financial_health_with_policy`] wrapped in the computation
/// envelope, with a warning for every sub-score that runs past 100.
pub fn assess_financial_health(
    profile: &FinancialProfile,
    policy: &ScoringPolicy,
) -> AdvisorResult<ComputationOutput<FinancialHealthResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    policy.validate()?;
    let raw = sub_scores(profile, policy)?;

    if !policy.clamp_subscores {
        for (name, value) in raw.entries() {
            if value > SUBSCORE_CEILING {
                warnings.push(format!(
                    "Sub-score {name} is {} (above 100, unclamped)",
                    round_half_up(value, 2)
                ));
            }
        }
    }
    if let Some(total) = policy.weights.total().filter(|t| *t != Decimal::ONE) {
        warnings.push(format!("Sub-score weights sum to {total}, not 1"));
    }

    let result = finish(profile, policy, raw)?;

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "weights": policy.weights,
        "risk_thresholds": policy.risk_thresholds,
        "eligibility_multiplier": policy.eligibility_multiplier.to_string(),
        "clamp_subscores": policy.clamp_subscores,
    });

    Ok(with_metadata(
        "Weighted financial health score (six sub-scores)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Sub-scores
// ---------------------------------------------------------------------------

fn sub_scores(profile: &FinancialProfile, policy: &ScoringPolicy) -> AdvisorResult<ScoreBreakdown> {
    validate_profile(profile)?;

    let income = profile.total_income()?;
    let expenses = profile.monthly_expenses;
    let ratio_overflow = || AdvisorError::InvalidArgument {
        field: "monthly_income".into(),
        reason: "Income is too small relative to expenses to form a ratio".into(),
    };
    let expense_ratio = expenses.checked_div(income).ok_or_else(ratio_overflow)?;
    let savings_rate = (income - expenses)
        .checked_div(income)
        .ok_or_else(ratio_overflow)?;
    let savings = savings_score(savings_rate)
        .checked_add(investments_bonus(&profile.investments, policy))
        .ok_or_else(|| AdvisorError::InvalidArgument {
            field: "investments_bonus".into(),
            reason: "Savings sub-score overflows decimal range".into(),
        })?;

    let raw = ScoreBreakdown {
        income_stability: income_stability_score(
            profile.employment_type,
            income,
            profile.work_experience_years,
        ),
        debt_to_income: debt_to_income_score(expense_ratio),
        savings,
        credit_history: Decimal::from(profile.credit_score) / CREDIT_SCALE_DIVISOR,
        completeness: profile_completeness(profile)?.ratio_pct,
        banking: banking_score(profile, policy),
    };

    if policy.clamp_subscores {
        Ok(raw.map(|v| v.clamp(Decimal::ZERO, SUBSCORE_CEILING)))
    } else {
        Ok(raw)
    }
}

fn finish(
    profile: &FinancialProfile,
    policy: &ScoringPolicy,
    raw: ScoreBreakdown,
) -> AdvisorResult<FinancialHealthResult> {
    let weighted = raw
        .weighted_sum(policy)
        .ok_or_else(|| AdvisorError::InvalidArgument {
            field: "weights".into(),
            reason: "Weighted score overflows decimal range".into(),
        })?;
    let score = to_points(round_half_up(weighted, 0), "weights")?;
    let eligibility = Decimal::from(score)
        .checked_mul(policy.eligibility_multiplier)
        .ok_or_else(|| AdvisorError::InvalidArgument {
            field: "eligibility_multiplier".into(),
            reason: "Eligibility score overflows decimal range".into(),
        })?;
    let eligibility =
        to_points(round_half_up(eligibility, 0), "eligibility_multiplier")?.min(policy.eligibility_cap);

    Ok(FinancialHealthResult {
        financial_health_score: score,
        risk_category: RiskCategory::classify(score, &policy.risk_thresholds),
        eligibility_score: eligibility,
        breakdown: raw.map(|v| round_half_up(v, 0)),
        credit_band: CreditBand::from_credit_score(profile.credit_score),
    })
}

fn income_stability_score(employment: EmploymentType, income: Money, experience: Decimal) -> Score {
    let base = match employment {
        EmploymentType::Salaried => dec!(40),
        EmploymentType::Business => dec!(35),
        EmploymentType::SelfEmployed => dec!(30),
        EmploymentType::Freelancer | EmploymentType::Other => Decimal::ZERO,
    };

    let income_tier = if income >= dec!(100_000) {
        dec!(30)
    } else if income >= dec!(50_000) {
        dec!(20)
    } else if income >= dec!(25_000) {
        dec!(10)
    } else {
        Decimal::ZERO
    };

    let experience_tier = if experience >= dec!(5) {
        dec!(30)
    } else if experience >= dec!(2) {
        dec!(20)
    } else {
        dec!(10)
    };

    base + income_tier + experience_tier
}

fn debt_to_income_score(ratio: Rate) -> Score {
    if ratio <= dec!(0.3) {
        dec!(100)
    } else if ratio <= dec!(0.5) {
        dec!(80)
    } else if ratio <= dec!(0.7) {
        dec!(60)
    } else {
        dec!(30)
    }
}

fn savings_score(savings_rate: Rate) -> Score {
    if savings_rate >= dec!(0.3) {
        dec!(100)
    } else if savings_rate >= dec!(0.2) {
        dec!(80)
    } else if savings_rate >= dec!(0.1) {
        dec!(60)
    } else {
        dec!(30)
    }
}

/// Length is measured in UTF-16 code units, the way browser form fields
/// report it, so an astral-plane character such as an emoji counts twice.
fn investments_bonus(investments: &str, policy: &ScoringPolicy) -> Score {
    if investments.encode_utf16().count() > policy.investments_detail_chars {
        policy.investments_bonus
    } else {
        Decimal::ZERO
    }
}

fn banking_score(profile: &FinancialProfile, policy: &ScoringPolicy) -> Score {
    let mut score = BANKING_BASE;
    if policy.is_preferred_bank(&profile.bank_name) {
        score += BANKING_BONUS;
    }
    if policy.is_salary_account(&profile.account_type) {
        score += BANKING_BONUS;
    }
    score
}

fn to_points(value: Decimal, field: &str) -> AdvisorResult<u32> {
    value.to_u32().ok_or_else(|| AdvisorError::InvalidArgument {
        field: field.into(),
        reason: format!("Score {value} is outside the representable range"),
    })
}

fn validate_profile(profile: &FinancialProfile) -> AdvisorResult<()> {
    let non_negative = [
        ("monthly_income", profile.monthly_income),
        ("secondary_income", profile.secondary_income.unwrap_or(Decimal::ZERO)),
        ("monthly_expenses", profile.monthly_expenses),
        ("work_experience_years", profile.work_experience_years),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(AdvisorError::InvalidArgument {
                field: field.into(),
                reason: "Value cannot be negative.".into(),
            });
        }
    }
    if profile.total_income()? <= Decimal::ZERO {
        return Err(AdvisorError::InvalidArgument {
            field: "monthly_income".into(),
            reason: "Total monthly income must be positive.".into(),
        });
    }
    if profile.credit_score > MAX_CREDIT_SCORE {
        return Err(AdvisorError::InvalidArgument {
            field: "credit_score".into(),
            reason: format!("Credit score cannot exceed {MAX_CREDIT_SCORE}."),
        });
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

    #[test]
    fn test_income_stability_tiers() {
        assert_eq!(
            income_stability_score(EmploymentType::Salaried, dec!(100_000), dec!(5)),
            dec!(100)
        );
        assert_eq!(
            income_stability_score(EmploymentType::Business, dec!(50_000), dec!(2)),
            dec!(75)
        );
        assert_eq!(
            income_stability_score(EmploymentType::SelfEmployed, dec!(25_000), dec!(1.5)),
            dec!(50)
        );
        assert_eq!(
            income_stability_score(EmploymentType::Freelancer, dec!(24_999), Decimal::ZERO),
            dec!(10)
        );
    }

    #[test]
    fn test_debt_to_income_boundaries_inclusive() {
        assert_eq!(debt_to_income_score(dec!(0.3)), dec!(100));
        assert_eq!(debt_to_income_score(dec!(0.31)), dec!(80));
        assert_eq!(debt_to_income_score(dec!(0.5)), dec!(80));
        assert_eq!(debt_to_income_score(dec!(0.7)), dec!(60));
        assert_eq!(debt_to_income_score(dec!(0.71)), dec!(30));
    }

    #[test]
    fn test_savings_boundaries_inclusive() {
        assert_eq!(savings_score(dec!(0.3)), dec!(100));
        assert_eq!(savings_score(dec!(0.2)), dec!(80));
        assert_eq!(savings_score(dec!(0.1)), dec!(60));
        assert_eq!(savings_score(dec!(0.09)), dec!(30));
        assert_eq!(savings_score(dec!(-0.5)), dec!(30));
    }

    #[test]
    fn test_investments_bonus_needs_more_than_threshold() {
        let policy = ScoringPolicy::default();
        assert_eq!(investments_bonus(&"x".repeat(50), &policy), Decimal::ZERO);
        assert_eq!(investments_bonus(&"x".repeat(51), &policy), dec!(20));
        // multi-byte characters count once
        assert_eq!(investments_bonus(&"₹".repeat(50), &policy), Decimal::ZERO);
    }

    #[test]
    fn test_risk_category_boundaries() {
        let t = RiskThresholds::default();
        assert_eq!(RiskCategory::classify(750, &t), RiskCategory::Low);
        assert_eq!(RiskCategory::classify(749, &t), RiskCategory::Medium);
        assert_eq!(RiskCategory::classify(600, &t), RiskCategory::Medium);
        assert_eq!(RiskCategory::classify(599, &t), RiskCategory::High);
    }

    #[test]
    fn test_banking_score() {
        let policy = ScoringPolicy::default();
        let mut profile = FinancialProfile {
            bank_name: "hdfc".into(),
            account_type: "salary".into(),
            ..Default::default()
        };
        assert_eq!(banking_score(&profile, &policy), dec!(100));
        profile.account_type = "savings".into();
        assert_eq!(banking_score(&profile, &policy), dec!(80));
        profile.bank_name = "sbi".into();
        assert_eq!(banking_score(&profile, &policy), dec!(60));
    }

    #[test]
    fn test_zero_income_rejected() {
        let profile = FinancialProfile {
            monthly_income: Decimal::ZERO,
            ..Default::default()
        };
        match calculate_financial_health(&profile).unwrap_err() {
            AdvisorError::InvalidArgument { field, .. } => assert_eq!(field, "monthly_income"),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_secondary_income_alone_is_enough() {
        let profile = FinancialProfile {
            secondary_income: Some(dec!(30_000)),
            ..Default::default()
        };
        assert!(calculate_financial_health(&profile).is_ok());
    }

    #[test]
    fn test_credit_score_above_scale_rejected() {
        let profile = FinancialProfile {
            monthly_income: dec!(50_000),
            credit_score: 851,
            ..Default::default()
        };
        match calculate_financial_health(&profile).unwrap_err() {
            AdvisorError::InvalidArgument { field, .. } => assert_eq!(field, "credit_score"),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_expenses_rejected() {
        let profile = FinancialProfile {
            monthly_income: dec!(50_000),
            monthly_expenses: dec!(-1),
            ..Default::default()
        };
        assert!(calculate_financial_health(&profile).is_err());
    }
}
