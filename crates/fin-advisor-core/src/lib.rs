pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "health")]
pub mod health;

#[cfg(feature = "store")]
pub mod store;

pub use error::AdvisorError;
pub use types::*;

#[cfg(feature = "loan")]
pub use loan::emi::{calculate_loan, LoanCalculationInput, LoanCalculationResult};

#[cfg(feature = "health")]
pub use health::scorer::{calculate_financial_health, FinancialHealthResult, RiskCategory};

/// Standard result type for all fin-advisor operations
pub type AdvisorResult<T> = Result<T, AdvisorError>;
