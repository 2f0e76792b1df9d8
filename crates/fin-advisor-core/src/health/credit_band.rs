use serde::{Deserialize, Serialize};

/// Coarse label for a bureau credit score, as shown next to the score dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl CreditBand {
    pub fn from_credit_score(score: u16) -> Self {
        match score {
            750..=u16::MAX => CreditBand::Excellent,
            650..=749 => CreditBand::Good,
            550..=649 => CreditBand::Fair,
            _ => CreditBand::Poor,
        }
    }
}

impl std::fmt::Display for CreditBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreditBand::Excellent => write!(f, "excellent"),
            CreditBand::Good => write!(f, "good"),
            CreditBand::Fair => write!(f, "fair"),
            CreditBand::Poor => write!(f, "poor"),
        }
    }
}
