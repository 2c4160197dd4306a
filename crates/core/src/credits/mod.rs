//! Usage ledger logic for metered operations.
//!
//! Every metered feature (interview analysis, audio transcription, suggestion
//! generation, job/resume/email parsing) spends credits from a per-user
//! account, bounded by rolling daily and monthly caps. This module holds the
//! pure half of that ledger: the cost table, the calendar-window reset
//! policy, and the quota evaluation that decides whether a spend is
//! permitted. Persistence and the atomic deduction live in the database
//! crate.

pub mod cost;
pub mod error;
pub mod evaluator;
pub mod types;
pub mod window;

#[cfg(test)]
mod evaluator_props;

pub use cost::{DAILY_LIMIT, MONTHLY_LIMIT, OperationKind, SIGNUP_BONUS};
pub use error::CreditError;
pub use evaluator::QuotaEvaluator;
pub use types::{AccountSnapshot, AccountStanding, CreditDecision, CreditStatus, DenialReason, SpendOutcome};
