//! Ledger decision and status types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cost::{DAILY_LIMIT, MONTHLY_LIMIT};

/// In-memory copy of an account row after window resets have been applied.
///
/// Input to the pure quota evaluation; never written back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSnapshot {
    /// Spendable units remaining.
    pub balance: i64,
    /// Units spent in the current daily window.
    pub daily_used: i64,
    /// Units spent in the current monthly window.
    pub monthly_used: i64,
}

/// Why a spend is not currently permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The balance does not cover the operation's cost.
    InsufficientBalance,
    /// The spend would exceed the daily cap.
    DailyLimitReached,
    /// The spend would exceed the monthly cap.
    MonthlyLimitReached,
}

impl DenialReason {
    /// Returns the wire reason code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InsufficientBalance => "insufficient_balance",
            Self::DailyLimitReached => "daily_limit_reached",
            Self::MonthlyLimitReached => "monthly_limit_reached",
        }
    }
}

/// Advisory decision returned by the quota check.
#[derive(Debug, Clone, Serialize)]
pub struct CreditDecision {
    /// Whether the spend is currently permitted.
    pub allowed: bool,
    /// Denial reason when not permitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
    /// Balance at the moment of the check.
    pub balance: i64,
    /// Daily usage at the moment of the check.
    pub daily_used: i64,
    /// Monthly usage at the moment of the check.
    pub monthly_used: i64,
    /// Daily headroom; net of the prospective cost when allowed.
    pub daily_remaining: i64,
    /// Monthly headroom; net of the prospective cost when allowed.
    pub monthly_remaining: i64,
}

/// Account status for self-service screens and admin reporting.
#[derive(Debug, Clone, Serialize)]
pub struct CreditStatus {
    /// Spendable units remaining.
    pub balance: i64,
    /// Units spent in the current daily window.
    pub daily_used: i64,
    /// Units spent in the current monthly window.
    pub monthly_used: i64,
    /// Daily headroom (`limit - used`).
    pub daily_remaining: i64,
    /// Monthly headroom (`limit - used`).
    pub monthly_remaining: i64,
    /// The daily cap.
    pub daily_limit: i64,
    /// The monthly cap.
    pub monthly_limit: i64,
}

impl CreditStatus {
    /// Builds the status view of a snapshot.
    #[must_use]
    pub fn of(snapshot: &AccountSnapshot) -> Self {
        Self {
            balance: snapshot.balance,
            daily_used: snapshot.daily_used,
            monthly_used: snapshot.monthly_used,
            daily_remaining: (DAILY_LIMIT - snapshot.daily_used).max(0),
            monthly_remaining: (MONTHLY_LIMIT - snapshot.monthly_used).max(0),
            daily_limit: DAILY_LIMIT,
            monthly_limit: MONTHLY_LIMIT,
        }
    }
}

/// One row of the admin balance ranking.
#[derive(Debug, Clone, Serialize)]
pub struct AccountStanding {
    /// Owning user.
    pub user_id: Uuid,
    /// Status fields for that account.
    #[serde(flatten)]
    pub status: CreditStatus,
}

/// Result of a deduction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendOutcome {
    /// Whether the deduction was applied.
    pub success: bool,
    /// Denial reason when it was not.
    pub reason: Option<DenialReason>,
}

impl SpendOutcome {
    /// A successful deduction.
    #[must_use]
    pub const fn applied() -> Self {
        Self {
            success: true,
            reason: None,
        }
    }

    /// A denied deduction.
    #[must_use]
    pub const fn denied(reason: DenialReason) -> Self {
        Self {
            success: false,
            reason: Some(reason),
        }
    }
}
