//! Leaf evaluation by random playout.

use morra_core::Position;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::trace;

use crate::oracle::{NoOracle, Oracle};
use crate::search::draw::{dead_material, fifty_moves};
use crate::search::heuristics::{MovePicker, UniformPicker};

/// Safety cap on simulated plies. Random games routinely run for several
/// hundred plies before the fifty-move rule ends them; the cap only exists
/// to bound pathological shuffles. A playout that reaches it is unresolved
/// and yields no reward at all, so it never leaks into the statistics.
const DEFAULT_MAX_PLIES: u32 = 2_048;

/// Consult the oracle only once this few figures remain.
const DEFAULT_ORACLE_THRESHOLD: u32 = 5;

/// Plays pseudo-random games to a terminal or drawn state.
///
/// Each simulation runs on its own prototype copy of the leaf position; the
/// shared search cursor is never touched.
pub struct RolloutPolicy<P: MovePicker = UniformPicker, O: Oracle = NoOracle> {
    picker: P,
    oracle: O,
    rng: SmallRng,
    max_plies: u32,
    oracle_threshold: u32,
}

impl RolloutPolicy {
    /// Uniform playouts without an oracle.
    pub fn new(seed: u64) -> RolloutPolicy {
        RolloutPolicy::with_parts(seed, UniformPicker, NoOracle)
    }
}

impl<P: MovePicker, O: Oracle> RolloutPolicy<P, O> {
    /// Assemble a policy from its pluggable pieces.
    pub fn with_parts(seed: u64, picker: P, oracle: O) -> RolloutPolicy<P, O> {
        RolloutPolicy {
            picker,
            oracle,
            rng: SmallRng::seed_from_u64(seed),
            max_plies: DEFAULT_MAX_PLIES,
            oracle_threshold: DEFAULT_ORACLE_THRESHOLD,
        }
    }

    /// Override the unresolved-simulation ply cap.
    pub fn max_plies(mut self, max_plies: u32) -> Self {
        self.max_plies = max_plies;
        self
    }

    /// Override the piece-count threshold for oracle probes.
    pub fn oracle_threshold(mut self, threshold: u32) -> Self {
        self.oracle_threshold = threshold;
        self
    }

    /// Simulate from `cursor` to a result.
    ///
    /// Returns the reward from the perspective of the side to move at entry:
    /// 1.0 win, 0.5 draw, 0.0 loss — or `None` when the ply cap fires before
    /// any terminal or drawn state is reached.
    pub fn simulate(&mut self, mut cursor: Position) -> Option<f64> {
        let start_side = cursor.side_to_move();

        for _ in 0..self.max_plies {
            if fifty_moves(&cursor) || dead_material(&cursor) {
                return Some(0.5);
            }

            if cursor.piece_count() <= self.oracle_threshold
                && let Some(verdict) = self.oracle.probe(&cursor)
            {
                return Some(match verdict.winner {
                    None => 0.5,
                    Some(winner) if winner == start_side => 1.0,
                    Some(_) => 0.0,
                });
            }

            let moves = cursor.legal_moves();
            if moves.is_empty() {
                if !cursor.in_check() {
                    return Some(0.5); // stalemate
                }
                // Checkmate: the side to move here has lost.
                return Some(if cursor.side_to_move() == start_side {
                    0.0
                } else {
                    1.0
                });
            }

            let index = self.picker.pick(&cursor, &moves, &mut self.rng);
            cursor.apply(moves[index]);
        }

        trace!(max_plies = self.max_plies, "rollout unresolved at the ply cap");
        None
    }
}
