//! Loan arithmetic: the EMI calculator and the tools built on it.

pub mod emi;
pub mod offers;
pub mod schedule;
