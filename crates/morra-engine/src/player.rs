//! The search driver and the engine's outward boundary.
//!
//! One trajectory = select → expand → rollout → backup, run on the shared
//! cursor position. Descent applies moves in place and unwinds them in exact
//! reverse order before the trajectory ends; the rollout itself plays on a
//! prototype copy. The scheduler is polled exactly once per trajectory.

use std::time::Duration;

use morra_core::{Move, Position, Undo};
use tracing::debug;

use crate::oracle::{NoOracle, Oracle};
use crate::search::control::{Scheduler, TimeScheduler};
use crate::search::heuristics::{MovePicker, UniformPicker};
use crate::search::rollout::RolloutPolicy;
use crate::search::tree::{BestMoveRule, SearchTree};
use crate::search::value::{UcbValue, Value};

/// Counters for one `choose_move` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Trajectories whose reward was backed up.
    pub completed: u64,
    /// Trajectories discarded because the rollout stayed unresolved.
    pub discarded: u64,
}

/// The MCTS player: owns the cursor position and the tree, reuses subtrees
/// across plies.
pub struct Player<V: Value = UcbValue, P: MovePicker = UniformPicker, O: Oracle = NoOracle> {
    position: Position,
    tree: SearchTree<V>,
    rollout: RolloutPolicy<P, O>,
    rule: BestMoveRule,
    stats: SearchStats,
}

impl Player {
    /// A player with the default accumulator, uniform rollouts, and no
    /// oracle.
    pub fn new(position: Position, seed: u64) -> Player {
        Player::with_parts(position, RolloutPolicy::new(seed), BestMoveRule::MostVisits)
    }
}

impl<V: Value, P: MovePicker, O: Oracle> Player<V, P, O> {
    /// Assemble a player from its pluggable pieces.
    pub fn with_parts(
        mut position: Position,
        rollout: RolloutPolicy<P, O>,
        rule: BestMoveRule,
    ) -> Player<V, P, O> {
        let root_moves = position.legal_moves();
        Player {
            position,
            tree: SearchTree::new(root_moves),
            rollout,
            rule,
            stats: SearchStats::default(),
        }
    }

    /// The current cursor position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Read-only view of the search tree (inspection and tests).
    pub fn tree(&self) -> &SearchTree<V> {
        &self.tree
    }

    /// Counters from the most recent `choose_move` call.
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    /// Root visit total (equals completed trajectories since the root was
    /// created or promoted).
    pub fn root_visits(&self) -> u32 {
        self.tree.value(self.tree.root()).visits()
    }

    /// Pick a move under a wall-clock budget derived from
    /// `(time_left, time_per_move, increment)`.
    ///
    /// Returns `None` when the side to move has no legal move — game over,
    /// never an error.
    pub fn choose_move(
        &mut self,
        time_left: Duration,
        time_per_move: Duration,
        increment: Duration,
    ) -> Option<Move> {
        let mut scheduler = TimeScheduler::new(time_left, time_per_move, increment);
        self.choose_move_with(&mut scheduler)
    }

    /// Pick a move under an arbitrary scheduler.
    pub fn choose_move_with<S: Scheduler>(&mut self, scheduler: &mut S) -> Option<Move> {
        self.stats = SearchStats::default();
        while scheduler.should_continue() {
            if self.run_trajectory() {
                self.stats.completed += 1;
            } else {
                self.stats.discarded += 1;
            }
        }

        let root = self.tree.root();
        let Some(slot) = self.tree.best_slot(self.rule) else {
            debug!("no materialized root child; reporting game over");
            return None;
        };
        let mv = self.tree.move_at(root, slot);
        debug!(
            chosen = %mv,
            completed = self.stats.completed,
            discarded = self.stats.discarded,
            tree_nodes = self.tree.len(),
            "search finished"
        );

        // Play the move on our own cursor and keep the chosen subtree as the
        // next root; siblings die here.
        self.position.apply(mv);
        self.adopt_child(slot);
        Some(mv)
    }

    /// Feed the position reached after the opponent's reply.
    ///
    /// Replays each root move against the pre-move snapshot and compares
    /// the outcome with `observed`; a structural match promotes that child's
    /// subtree (statistics preserved), anything else starts a fresh root.
    pub fn observe(&mut self, observed: &Position) {
        let root = self.tree.root();
        let mut matched = None;
        for slot in 0..self.tree.move_count(root) {
            let mv = self.tree.move_at(root, slot);
            let replayed = self.position.apply_guarded(mv);
            if *replayed == *observed {
                matched = Some((slot, mv));
                break;
            }
        }

        match matched {
            Some((slot, mv)) => {
                self.position.apply(mv);
                self.adopt_child(slot);
                debug!(reply = %mv, reused = self.root_visits(), "opponent reply matched");
            }
            None => {
                debug!("opponent reply not found among root moves; fresh tree");
                self.position = observed.clone();
                let root_moves = self.position.legal_moves();
                self.tree = SearchTree::new(root_moves);
            }
        }
    }

    /// Promote the child in `slot` to root, or install a fresh root when the
    /// slot was never materialized. `self.position` must already hold the
    /// child's position.
    fn adopt_child(&mut self, slot: usize) {
        let root = self.tree.root();
        let fresh = SearchTree::new(morra_core::MoveList::new());
        let tree = std::mem::replace(&mut self.tree, fresh);
        self.tree = match tree.child(root, slot) {
            Some(child) => tree.promote(child),
            None => SearchTree::new(self.position.legal_moves()),
        };
    }

    /// One full trajectory. Returns `false` when the rollout stayed
    /// unresolved, in which case no statistic anywhere was touched.
    fn run_trajectory(&mut self) -> bool {
        let mut node = self.tree.root();
        let mut path = vec![node];
        let mut applied: Vec<(Move, Undo)> = Vec::new();

        let leaf_reward = loop {
            match self.tree.select_slot(node) {
                // No legal moves: terminal leaf on the shared cursor.
                None => {
                    break Some(if self.position.in_check() { 0.0 } else { 0.5 });
                }
                Some(slot) => {
                    let mv = self.tree.move_at(node, slot);
                    let undo = self.position.apply(mv);
                    applied.push((mv, undo));
                    match self.tree.child(node, slot) {
                        Some(child) => {
                            path.push(child);
                            node = child;
                        }
                        None => {
                            // Expansion: materialize, then evaluate from a
                            // prototype copy of the cursor.
                            let moves = self.position.legal_moves();
                            let child = self.tree.materialize(node, slot, moves);
                            path.push(child);
                            break self.rollout.simulate(self.position.clone());
                        }
                    }
                }
            }
        };

        let completed = match leaf_reward {
            Some(leaf_reward) => {
                // Each ply flips whose perspective the reward measures.
                let mut reward = 1.0 - leaf_reward;
                for &id in path.iter().rev() {
                    self.tree.value_mut(id).update(reward);
                    reward = 1.0 - reward;
                }
                true
            }
            None => false,
        };

        // Unwind the descent in exact reverse order.
        while let Some((mv, undo)) = applied.pop() {
            self.position.unapply(mv, undo);
        }

        completed
    }
}

#[cfg(test)]
mod tests {
    use morra_core::Position;

    use super::Player;
    use crate::search::control::TrajectoryBudget;

    #[test]
    fn cursor_is_restored_after_every_search() {
        let mut player = Player::new(Position::starting_position(), 9);
        let before = player.position().clone();
        let mut budget = TrajectoryBudget::new(64);
        let mv = player.choose_move_with(&mut budget).expect("a legal move");
        // The chosen move was applied to the cursor; undo it mentally by
        // replaying from the start position.
        let mut expected = before;
        expected.apply(mv);
        assert_eq!(player.position(), &expected);
        assert_eq!(player.position().hash(), expected.hash());
    }

    #[test]
    fn root_visits_equal_completed_trajectories() {
        let mut player = Player::new(Position::starting_position(), 17);
        let mut completed: u64 = 0;
        for _ in 0..50 {
            if player.run_trajectory() {
                completed += 1;
            }
        }
        assert!(completed > 0);
        assert_eq!(u64::from(player.root_visits()), completed);
    }

    #[test]
    fn scheduler_is_polled_once_per_trajectory() {
        let mut player = Player::new(Position::starting_position(), 3);
        let mut budget = TrajectoryBudget::new(200);
        let _ = player.choose_move_with(&mut budget);
        let stats = player.last_stats();
        assert_eq!(stats.completed + stats.discarded, 200);
        assert!(stats.completed > 0, "some trajectories must resolve");
    }

    #[test]
    fn terminal_root_reports_none() {
        // White is checkmated; there is no move to return.
        let position: Position = "6k1/8/8/8/8/8/5PPP/4r1K1 w - - 0 1".parse().unwrap();
        let mut player = Player::new(position, 1);
        let mut budget = TrajectoryBudget::new(50);
        assert_eq!(player.choose_move_with(&mut budget), None);
    }

    #[test]
    fn zero_budget_reports_none_even_with_legal_moves() {
        // No trajectory ever ran, so no child was materialized; the boundary
        // reports "no move" rather than guessing.
        let mut player = Player::new(Position::starting_position(), 1);
        let mut budget = TrajectoryBudget::new(0);
        assert_eq!(player.choose_move_with(&mut budget), None);
    }

    #[test]
    fn stalemate_root_reports_none() {
        let position: Position = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let mut player = Player::new(position, 1);
        let mut budget = TrajectoryBudget::new(50);
        assert_eq!(player.choose_move_with(&mut budget), None);
    }
}
