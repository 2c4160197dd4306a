//! Calendar-window reset policy.
//!
//! Usage counters are scoped to rolling windows that reset on local calendar
//! boundaries: the daily counter when the (year, month, day) tuple changes,
//! the monthly counter when the (year, month) tuple changes. Both decisions
//! are pure functions of the two instants involved; the database layer is
//! responsible for persisting the reset. Applying a reset twice with the
//! same `now` is a no-op the second time, since the stored timestamp then
//! shares the calendar tuple with `now`.

use chrono::Datelike;

/// Returns true iff `now` falls on a different local calendar day than
/// `last_reset`.
#[must_use]
pub fn needs_daily_reset<T: Datelike>(last_reset: &T, now: &T) -> bool {
    (last_reset.year(), last_reset.month(), last_reset.day())
        != (now.year(), now.month(), now.day())
}

/// Returns true iff `now` falls in a different local calendar month than
/// `last_reset`.
#[must_use]
pub fn needs_monthly_reset<T: Datelike>(last_reset: &T, now: &T) -> bool {
    (last_reset.year(), last_reset.month()) != (now.year(), now.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_never_resets() {
        let d = date(2026, 3, 14);
        assert!(!needs_daily_reset(&d, &d));
        assert!(!needs_monthly_reset(&d, &d));
    }

    #[test]
    fn test_next_day_resets_daily_only() {
        let last = date(2026, 3, 14);
        let now = date(2026, 3, 15);
        assert!(needs_daily_reset(&last, &now));
        assert!(!needs_monthly_reset(&last, &now));
    }

    #[test]
    fn test_month_boundary_resets_both() {
        let last = date(2026, 3, 31);
        let now = date(2026, 4, 1);
        assert!(needs_daily_reset(&last, &now));
        assert!(needs_monthly_reset(&last, &now));
    }

    #[test]
    fn test_year_boundary_resets_both() {
        let last = date(2025, 12, 31);
        let now = date(2026, 1, 1);
        assert!(needs_daily_reset(&last, &now));
        assert!(needs_monthly_reset(&last, &now));
    }

    #[test]
    fn test_same_day_of_month_in_other_month_resets_both() {
        // Same day-of-month is not the same day.
        let last = date(2026, 3, 14);
        let now = date(2026, 4, 14);
        assert!(needs_daily_reset(&last, &now));
        assert!(needs_monthly_reset(&last, &now));
    }

    #[test]
    fn test_reset_is_idempotent() {
        // After a reset the stored timestamp becomes `now`; evaluating the
        // policy again against the same `now` must report nothing to do.
        let last = date(2026, 3, 14);
        let now = date(2026, 3, 15);
        assert!(needs_daily_reset(&last, &now));
        assert!(!needs_daily_reset(&now, &now));
        assert!(!needs_monthly_reset(&now, &now));
    }
}
