use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{types::*, AdvisorError, AdvisorResult};

/// Weight applied to each sub-score in the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubScoreWeights {
    pub income_stability: Decimal,
    pub debt_to_income: Decimal,
    pub savings: Decimal,
    pub credit_history: Decimal,
    pub completeness: Decimal,
    pub banking: Decimal,
}

impl Default for SubScoreWeights {
    fn default() -> Self {
        SubScoreWeights {
            income_stability: dec!(0.25),
            debt_to_income: dec!(0.20),
            savings: dec!(0.20),
            credit_history: dec!(0.15),
            completeness: dec!(0.10),
            banking: dec!(0.10),
        }
    }
}

impl SubScoreWeights {
    fn named(&self) -> [(&'static str, Decimal); 6] {
        [
            ("income_stability", self.income_stability),
            ("debt_to_income", self.debt_to_income),
            ("savings", self.savings),
            ("credit_history", self.credit_history),
            ("completeness", self.completeness),
            ("banking", self.banking),
        ]
    }

    /// Sum of the six weights, or `None` if it leaves the decimal range.
    pub fn total(&self) -> Option<Decimal> {
        self.named()
            .iter()
            .try_fold(Decimal::ZERO, |acc, (_, w)| acc.checked_add(*w))
    }
}

/// Composite-score cut-offs for the risk tiers (score >= low => low risk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub low: u32,
    pub medium: u32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            low: 750,
            medium: 600,
        }
    }
}

/// Tunable parameters of the financial health score.
///
/// The default reproduces the reference scoring exactly, including sub-scores
/// that may exceed 100 through the investments bonus. Set `clamp_subscores`
/// to cap every sub-score at 100 before weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub weights: SubScoreWeights,
    pub preferred_banks: Vec<String>,
    pub salary_account_type: String,
    /// Investment descriptions longer than this many UTF-16 code units earn the bonus.
    pub investments_detail_chars: usize,
    pub investments_bonus: Score,
    pub risk_thresholds: RiskThresholds,
    pub eligibility_multiplier: Decimal,
    pub eligibility_cap: u32,
    pub clamp_subscores: bool,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy {
            weights: SubScoreWeights::default(),
            preferred_banks: vec!["hdfc".into(), "icici".into()],
            salary_account_type: "salary".into(),
            investments_detail_chars: 50,
            investments_bonus: dec!(20),
            risk_thresholds: RiskThresholds::default(),
            eligibility_multiplier: dec!(1.2),
            eligibility_cap: 100,
            clamp_subscores: false,
        }
    }
}

impl ScoringPolicy {
    pub fn is_preferred_bank(&self, bank_name: &str) -> bool {
        let bank = bank_name.trim();
        self.preferred_banks
            .iter()
            .any(|b| b.trim().eq_ignore_ascii_case(bank))
    }

    pub fn is_salary_account(&self, account_type: &str) -> bool {
        account_type
            .trim()
            .eq_ignore_ascii_case(self.salary_account_type.trim())
    }

    pub fn validate(&self) -> AdvisorResult<()> {
        for (name, weight) in self.weights.named() {
            if weight < Decimal::ZERO {
                return Err(AdvisorError::InvalidArgument {
                    field: format!("weights.{name}"),
                    reason: "Sub-score weights cannot be negative.".into(),
                });
            }
        }
        if self.weights.total().is_none() {
            return Err(AdvisorError::InvalidArgument {
                field: "weights".into(),
                reason: "Sub-score weights overflow when summed.".into(),
            });
        }
        if self.risk_thresholds.medium > self.risk_thresholds.low {
            return Err(AdvisorError::InvalidArgument {
                field: "risk_thresholds".into(),
                reason: "Medium-risk threshold cannot exceed the low-risk threshold.".into(),
            });
        }
        if self.eligibility_multiplier < Decimal::ZERO {
            return Err(AdvisorError::InvalidArgument {
                field: "eligibility_multiplier".into(),
                reason: "Eligibility multiplier cannot be negative.".into(),
            });
        }
        if self.investments_bonus < Decimal::ZERO {
            return Err(AdvisorError::InvalidArgument {
                field: "investments_bonus".into(),
                reason: "Investments bonus cannot be negative.".into(),
            });
        }
        Ok(())
    }
}
