//! Financial health scoring from a borrower profile.

pub mod credit_band;
pub mod policy;
pub mod profile;
pub mod scorer;
