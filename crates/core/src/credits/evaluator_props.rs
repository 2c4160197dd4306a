//! Property tests for quota evaluation.

use proptest::prelude::*;

use super::cost::{DAILY_LIMIT, MONTHLY_LIMIT, OperationKind};
use super::evaluator::QuotaEvaluator;
use super::types::{AccountSnapshot, DenialReason};

fn any_operation() -> impl Strategy<Value = OperationKind> {
    prop::sample::select(OperationKind::ALL.to_vec())
}

fn any_snapshot() -> impl Strategy<Value = AccountSnapshot> {
    (0_i64..10_000, 0_i64..=DAILY_LIMIT, 0_i64..=MONTHLY_LIMIT).prop_map(
        |(balance, daily_used, monthly_used)| AccountSnapshot {
            balance,
            daily_used,
            monthly_used,
        },
    )
}

proptest! {
    // An allowed decision never permits a cap or the balance to be exceeded.
    #[test]
    fn allowed_implies_within_all_bounds(snapshot in any_snapshot(), kind in any_operation()) {
        let decision = QuotaEvaluator::evaluate(&snapshot, kind);
        if decision.allowed {
            prop_assert!(snapshot.balance >= kind.cost());
            prop_assert!(snapshot.daily_used + kind.cost() <= DAILY_LIMIT);
            prop_assert!(snapshot.monthly_used + kind.cost() <= MONTHLY_LIMIT);
        }
    }

    // Reported headroom is never negative, allowed or not.
    #[test]
    fn headroom_is_never_negative(snapshot in any_snapshot(), kind in any_operation()) {
        let decision = QuotaEvaluator::evaluate(&snapshot, kind);
        prop_assert!(decision.daily_remaining >= 0);
        prop_assert!(decision.monthly_remaining >= 0);
    }

    // `allowed` and `reason` are always consistent.
    #[test]
    fn reason_present_iff_denied(snapshot in any_snapshot(), kind in any_operation()) {
        let decision = QuotaEvaluator::evaluate(&snapshot, kind);
        prop_assert_eq!(decision.allowed, decision.reason.is_none());
    }

    // Insufficient balance is always reported ahead of the cap reasons.
    #[test]
    fn balance_reason_has_precedence(
        daily_used in 0_i64..=DAILY_LIMIT,
        monthly_used in 0_i64..=MONTHLY_LIMIT,
        kind in any_operation(),
    ) {
        let snapshot = AccountSnapshot { balance: kind.cost() - 1, daily_used, monthly_used };
        let decision = QuotaEvaluator::evaluate(&snapshot, kind);
        prop_assert_eq!(decision.reason, Some(DenialReason::InsufficientBalance));
    }

    // The decision echoes the snapshot it was computed from.
    #[test]
    fn decision_echoes_snapshot(snapshot in any_snapshot(), kind in any_operation()) {
        let decision = QuotaEvaluator::evaluate(&snapshot, kind);
        prop_assert_eq!(decision.balance, snapshot.balance);
        prop_assert_eq!(decision.daily_used, snapshot.daily_used);
        prop_assert_eq!(decision.monthly_used, snapshot.monthly_used);
    }
}
