//! Per-move time budgeting from raw clock parameters.

use std::time::Duration;

/// Fraction of the usable clock assumed to cover the rest of the game.
const EXPECTED_MOVES_LEFT: u32 = 30;

/// Hard cap: never spend more than this fraction of the remaining clock.
const MAX_CLOCK_FRACTION: u32 = 4;

/// Compute the wall-clock budget for one move.
///
/// A non-zero `time_per_move` is an explicit allotment and wins outright,
/// clamped to the remaining clock. Otherwise the budget is a clock fraction
/// plus most of the increment, capped at a quarter of what remains:
///
/// ```text
/// reserve = time_left / 20
/// budget  = (time_left - reserve) / 30 + increment * 3/4
/// budget  = min(budget, time_left / 4)
/// ```
///
/// The floor of one millisecond keeps a lost-on-time scramble from
/// requesting a zero-length search.
pub fn move_budget(time_left: Duration, time_per_move: Duration, increment: Duration) -> Duration {
    if !time_per_move.is_zero() {
        return time_per_move.min(time_left).max(Duration::from_millis(1));
    }

    let reserve = time_left / 20;
    let usable = time_left.saturating_sub(reserve);
    let base = usable / EXPECTED_MOVES_LEFT + increment.mul_f64(0.75);
    let capped = base.min(time_left / MAX_CLOCK_FRACTION);
    capped.max(Duration::from_millis(1))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::move_budget;

    #[test]
    fn explicit_per_move_time_wins() {
        let budget = move_budget(
            Duration::from_secs(60),
            Duration::from_secs(2),
            Duration::from_secs(5),
        );
        assert_eq!(budget, Duration::from_secs(2));
    }

    #[test]
    fn per_move_time_clamped_to_clock() {
        let budget = move_budget(
            Duration::from_millis(500),
            Duration::from_secs(10),
            Duration::ZERO,
        );
        assert_eq!(budget, Duration::from_millis(500));
    }

    #[test]
    fn sudden_death_spends_a_clock_fraction() {
        let budget = move_budget(Duration::from_secs(60), Duration::ZERO, Duration::ZERO);
        // (60s - 3s) / 30 = 1.9s
        assert_eq!(budget, Duration::from_millis(1900));
    }

    #[test]
    fn increment_is_mostly_added() {
        let with_inc = move_budget(
            Duration::from_secs(60),
            Duration::ZERO,
            Duration::from_secs(2),
        );
        let without = move_budget(Duration::from_secs(60), Duration::ZERO, Duration::ZERO);
        assert_eq!(with_inc - without, Duration::from_millis(1500));
    }

    #[test]
    fn budget_never_exceeds_a_quarter_of_the_clock() {
        let budget = move_budget(
            Duration::from_secs(4),
            Duration::ZERO,
            Duration::from_secs(30),
        );
        assert_eq!(budget, Duration::from_secs(1));
    }

    #[test]
    fn floor_of_one_millisecond() {
        let budget = move_budget(Duration::ZERO, Duration::ZERO, Duration::ZERO);
        assert_eq!(budget, Duration::from_millis(1));
    }
}
