//! Quota evaluation over account snapshots.

use super::cost::{DAILY_LIMIT, MONTHLY_LIMIT, OperationKind};
use super::types::{AccountSnapshot, CreditDecision, DenialReason};

/// Pure quota evaluation for the ledger.
pub struct QuotaEvaluator;

impl QuotaEvaluator {
    /// Decides whether `kind` may be spent against `snapshot`.
    ///
    /// Disqualifying conditions are evaluated in order: balance, then the
    /// daily cap, then the monthly cap; the first failure wins. An allowed
    /// decision reports the headroom left after the prospective spend; a
    /// denied one reports the current headroom.
    #[must_use]
    pub fn evaluate(snapshot: &AccountSnapshot, kind: OperationKind) -> CreditDecision {
        let cost = kind.cost();

        let reason = if snapshot.balance < cost {
            Some(DenialReason::InsufficientBalance)
        } else if snapshot.daily_used + cost > DAILY_LIMIT {
            Some(DenialReason::DailyLimitReached)
        } else if snapshot.monthly_used + cost > MONTHLY_LIMIT {
            Some(DenialReason::MonthlyLimitReached)
        } else {
            None
        };

        let spent = if reason.is_none() { cost } else { 0 };

        CreditDecision {
            allowed: reason.is_none(),
            reason,
            balance: snapshot.balance,
            daily_used: snapshot.daily_used,
            monthly_used: snapshot.monthly_used,
            daily_remaining: (DAILY_LIMIT - snapshot.daily_used - spent).max(0),
            monthly_remaining: (MONTHLY_LIMIT - snapshot.monthly_used - spent).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credits::cost::SIGNUP_BONUS;

    fn snapshot(balance: i64, daily_used: i64, monthly_used: i64) -> AccountSnapshot {
        AccountSnapshot {
            balance,
            daily_used,
            monthly_used,
        }
    }

    #[test]
    fn test_fresh_account_is_allowed() {
        let decision = QuotaEvaluator::evaluate(
            &snapshot(SIGNUP_BONUS, 0, 0),
            OperationKind::AudioTranscription,
        );

        assert!(decision.allowed);
        assert!(decision.reason.is_none());
        assert_eq!(decision.balance, SIGNUP_BONUS);
        assert_eq!(decision.daily_remaining, 195);
        assert_eq!(decision.monthly_remaining, 1995);
    }

    #[test]
    fn test_insufficient_balance_denied() {
        let decision =
            QuotaEvaluator::evaluate(&snapshot(3, 0, 0), OperationKind::AudioTranscription);

        assert!(!decision.allowed);
        assert_eq!(decision.reason, Some(DenialReason::InsufficientBalance));
        assert_eq!(decision.balance, 3);
        assert_eq!(decision.daily_remaining, DAILY_LIMIT);
    }

    #[test]
    fn test_daily_limit_denied_despite_balance() {
        let decision =
            QuotaEvaluator::evaluate(&snapshot(1000, 198, 198), OperationKind::AudioTranscription);

        assert!(!decision.allowed);
        assert_eq!(decision.reason, Some(DenialReason::DailyLimitReached));
        assert_eq!(decision.daily_remaining, 2);
    }

    #[test]
    fn test_monthly_limit_denied() {
        let decision =
            QuotaEvaluator::evaluate(&snapshot(1000, 0, 1998), OperationKind::AudioTranscription);

        assert!(!decision.allowed);
        assert_eq!(decision.reason, Some(DenialReason::MonthlyLimitReached));
        assert_eq!(decision.monthly_remaining, 2);
    }

    #[test]
    fn test_balance_outranks_limit_reasons() {
        // Balance, daily, and monthly would each deny; balance is reported.
        let decision =
            QuotaEvaluator::evaluate(&snapshot(1, 200, 2000), OperationKind::AudioTranscription);

        assert_eq!(decision.reason, Some(DenialReason::InsufficientBalance));
    }

    #[test]
    fn test_daily_reason_outranks_monthly() {
        let decision =
            QuotaEvaluator::evaluate(&snapshot(1000, 200, 2000), OperationKind::AudioTranscription);

        assert_eq!(decision.reason, Some(DenialReason::DailyLimitReached));
    }

    #[test]
    fn test_exact_cost_at_both_caps_is_allowed() {
        let decision =
            QuotaEvaluator::evaluate(&snapshot(5, 195, 1995), OperationKind::AudioTranscription);

        assert!(decision.allowed);
        assert_eq!(decision.daily_remaining, 0);
        assert_eq!(decision.monthly_remaining, 0);
    }
}
