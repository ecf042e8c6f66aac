//! Per-node statistics and the bandit selection formula.

/// Score granted to an empty or never-visited child slot, so every move is
/// tried once before its statistics are trusted. Ties on this score resolve
/// to the lowest slot index, giving a stable left-to-right first sweep.
pub const FIRST_PLAY_URGENCY: f64 = f64::INFINITY;

/// Statistics accumulator of one tree node.
///
/// The concrete type is chosen once, at tree construction, as a generic
/// parameter — selection is monomorphized, never dynamically dispatched.
/// Single-writer: the driver is the only mutator.
pub trait Value: Default {
    /// Fold one trajectory's reward into the accumulator.
    fn update(&mut self, reward: f64);

    /// Number of rewards folded in so far.
    fn visits(&self) -> u32;

    /// Average observed reward; 0 before the first visit.
    fn mean(&self) -> f64;

    /// Exploration bonus relative to the parent's visit total.
    ///
    /// Only meaningful once `visits() > 0`; selection never asks earlier.
    fn confidence_bound(&self, parent_visits: u32) -> f64;
}

/// The UCB1 accumulator: visit count, reward sum, and the
/// `sqrt(2 ln N / n)` uncertainty bonus.
#[derive(Debug, Clone, Default)]
pub struct UcbValue {
    visits: u32,
    reward_sum: f64,
}

impl Value for UcbValue {
    #[inline]
    fn update(&mut self, reward: f64) {
        self.visits += 1;
        self.reward_sum += reward;
    }

    #[inline]
    fn visits(&self) -> u32 {
        self.visits
    }

    #[inline]
    fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward_sum / f64::from(self.visits)
        }
    }

    #[inline]
    fn confidence_bound(&self, parent_visits: u32) -> f64 {
        debug_assert!(self.visits > 0, "bound queried before the first visit");
        (2.0 * f64::from(parent_visits.max(1)).ln() / f64::from(self.visits)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::{UcbValue, Value};

    #[test]
    fn update_accumulates() {
        let mut value = UcbValue::default();
        assert_eq!(value.visits(), 0);
        assert_eq!(value.mean(), 0.0);

        value.update(1.0);
        value.update(0.0);
        value.update(0.5);
        assert_eq!(value.visits(), 3);
        assert!((value.mean() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn bound_shrinks_with_visits() {
        let mut seldom = UcbValue::default();
        seldom.update(0.5);
        let mut often = UcbValue::default();
        for _ in 0..100 {
            often.update(0.5);
        }
        assert!(seldom.confidence_bound(1000) > often.confidence_bound(1000));
    }

    #[test]
    fn bound_grows_with_parent_visits() {
        let mut value = UcbValue::default();
        value.update(0.5);
        assert!(value.confidence_bound(10_000) > value.confidence_bound(10));
    }

    #[test]
    fn bound_formula_exact() {
        let mut value = UcbValue::default();
        for _ in 0..4 {
            value.update(1.0);
        }
        let expected = (2.0 * 100.0_f64.ln() / 4.0).sqrt();
        assert!((value.confidence_bound(100) - expected).abs() < 1e-12);
    }

    #[test]
    fn single_parent_visit_gives_zero_bound() {
        let mut value = UcbValue::default();
        value.update(0.5);
        assert_eq!(value.confidence_bound(1), 0.0);
    }
}
