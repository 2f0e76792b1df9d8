use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::*;
use crate::{AdvisorError, AdvisorResult};

/// How the applicant earns their income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    Salaried,
    SelfEmployed,
    Business,
    Freelancer,
    #[default]
    Other,
}

impl EmploymentType {
    /// Lenient parse: case-insensitive, `_` accepted for `-`, unknown values
    /// become [`EmploymentType::Other`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "salaried" => Self::Salaried,
            "self-employed" => Self::SelfEmployed,
            "business" => Self::Business,
            "freelancer" => Self::Freelancer,
            _ => Self::Other,
        }
    }
}

impl<'de> Deserialize<'de> for EmploymentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

impl std::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmploymentType::Salaried => write!(f, "salaried"),
            EmploymentType::SelfEmployed => write!(f, "self-employed"),
            EmploymentType::Business => write!(f, "business"),
            EmploymentType::Freelancer => write!(f, "freelancer"),
            EmploymentType::Other => write!(f, "other"),
        }
    }
}

/// Everything the onboarding and profile screens collect about a borrower.
///
/// Every field takes part in the completeness sub-score, so adding a field
/// here changes the denominator of that ratio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialProfile {
    // Personal
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub marital_status: String,

    // Address
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,

    // Professional
    pub employment_type: EmploymentType,
    pub company_name: String,
    pub designation: String,
    pub work_experience_years: Decimal,
    pub monthly_income: Money,
    pub secondary_income: Option<Money>,

    // Financial
    pub monthly_expenses: Money,
    pub existing_loans: String,
    pub credit_cards: String,
    /// Free text; only its length is used, as a proxy for holding investments.
    pub investments: String,
    pub bank_name: String,
    pub account_type: String,

    // Documents
    pub pan_card: String,
    pub aadhar_card: String,

    /// Bureau score on the 300–850 style scale (0 = no history).
    pub credit_score: u16,
}

impl FinancialProfile {
    pub fn total_income(&self) -> AdvisorResult<Money> {
        self.monthly_income
            .checked_add(self.secondary_income.unwrap_or(Decimal::ZERO))
            .ok_or_else(|| AdvisorError::InvalidArgument {
                field: "secondary_income".into(),
                reason: "Total income overflows decimal range".into(),
            })
    }
}

/// Share of profile fields that carry a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    pub filled: usize,
    pub total: usize,
    pub ratio_pct: Decimal,
}

/// Count the profile fields whose string form is non-empty.
///
/// The record is serialised to a flat JSON object so the count always covers
/// every field. `null` and `""` are empty; numbers and enum tags are filled.
pub fn profile_completeness(profile: &FinancialProfile) -> AdvisorResult<Completeness> {
    let value = serde_json::to_value(profile)?;
    let fields = value.as_object().map(|m| m.values().collect::<Vec<_>>()).unwrap_or_default();

    let total = fields.len();
    let filled = fields.iter().filter(|v| !stringify(v).is_empty()).count();
    let ratio_pct = if total == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(filled as u64) / Decimal::from(total as u64) * Decimal::ONE_HUNDRED
    };

    Ok(Completeness {
        filled,
        total,
        ratio_pct,
    })
}

fn stringify(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_employment_type_parse() {
        assert_eq!(EmploymentType::parse("Salaried"), EmploymentType::Salaried);
        assert_eq!(EmploymentType::parse("self_employed"), EmploymentType::SelfEmployed);
        assert_eq!(EmploymentType::parse(" business "), EmploymentType::Business);
        assert_eq!(EmploymentType::parse("student"), EmploymentType::Other);
    }

    #[test]
    fn test_employment_type_wire_format() {
        let json = serde_json::to_string(&EmploymentType::SelfEmployed).unwrap();
        assert_eq!(json, "\"self-employed\"");
        let back: EmploymentType = serde_json::from_str("\"freelancer\"").unwrap();
        assert_eq!(back, EmploymentType::Freelancer);
        assert_eq!(EmploymentType::SelfEmployed.to_string(), "self-employed");
    }

    #[test]
    fn test_total_income_includes_secondary() {
        let profile = FinancialProfile {
            monthly_income: dec!(85_000),
            secondary_income: Some(dec!(15_000)),
            ..Default::default()
        };
        assert_eq!(profile.total_income().unwrap(), dec!(100_000));
    }

    #[test]
    fn test_completeness_of_default_profile() {
        // numeric fields and the enum tag always stringify to something
        let c = profile_completeness(&FinancialProfile::default()).unwrap();
        assert_eq!(c.total, 25);
        assert_eq!(c.filled, 5);
        assert_eq!(c.ratio_pct, dec!(20));
    }

    #[test]
    fn test_completeness_counts_text_and_optional() {
        let profile = FinancialProfile {
            full_name: "Rajesh Kumar".into(),
            city: "Gurgaon".into(),
            secondary_income: Some(dec!(15_000)),
            ..Default::default()
        };
        let c = profile_completeness(&profile).unwrap();
        assert_eq!(c.filled, 8);
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let profile: FinancialProfile = serde_json::from_str(
            r#"{"monthly_income": "50000", "employment_type": "business"}"#,
        )
        .unwrap();
        assert_eq!(profile.monthly_income, dec!(50_000));
        assert_eq!(profile.employment_type, EmploymentType::Business);
        assert!(profile.full_name.is_empty());
        assert!(profile.secondary_income.is_none());
    }
}
