//! The search tree: an arena of nodes with index-based child references.
//!
//! Each node owns its fixed legal-move list and a parallel array of child
//! slots, every slot starting empty. A slot is materialized the first time
//! selection descends through it. Promoting a child extracts its whole
//! subtree into a fresh arena, statistics intact, and drops every sibling
//! subtree en masse.

use morra_core::{Move, MoveList};

use super::value::{FIRST_PLAY_URGENCY, Value};

/// Index of a node within its arena.
pub type NodeId = usize;

/// One tree vertex: statistics plus lazily materialized children.
pub struct Node<V> {
    /// Statistics accumulator.
    pub value: V,
    /// The legal moves of this node's position, fixed at creation.
    moves: MoveList,
    /// Child arena indices, parallel to `moves`. Empty until visited.
    children: Vec<Option<NodeId>>,
}

impl<V: Value> Node<V> {
    fn new(moves: MoveList) -> Node<V> {
        let slots = moves.len();
        Node {
            value: V::default(),
            moves,
            children: vec![None; slots],
        }
    }
}

/// Arena-backed search tree.
pub struct SearchTree<V> {
    nodes: Vec<Node<V>>,
    root: NodeId,
}

impl<V: Value> SearchTree<V> {
    /// Create a tree whose root holds the given legal moves.
    pub fn new(root_moves: MoveList) -> SearchTree<V> {
        SearchTree {
            nodes: vec![Node::new(root_moves)],
            root: 0,
        }
    }

    /// The root node's id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total nodes in the arena, unreachable ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` if the arena holds no nodes. Never true in practice;
    /// present for container-API completeness.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Statistics of a node.
    #[inline]
    pub fn value(&self, id: NodeId) -> &V {
        &self.nodes[id].value
    }

    /// Mutable statistics of a node (backpropagation).
    #[inline]
    pub fn value_mut(&mut self, id: NodeId) -> &mut V {
        &mut self.nodes[id].value
    }

    /// Number of legal moves at a node.
    #[inline]
    pub fn move_count(&self, id: NodeId) -> usize {
        self.nodes[id].moves.len()
    }

    /// The move in a given slot.
    #[inline]
    pub fn move_at(&self, id: NodeId, slot: usize) -> Move {
        self.nodes[id].moves[slot]
    }

    /// The materialized child in a slot, if any.
    #[inline]
    pub fn child(&self, id: NodeId, slot: usize) -> Option<NodeId> {
        self.nodes[id].children[slot]
    }

    /// Pick the slot to descend through, or `None` when the node has no
    /// legal moves (terminal position).
    ///
    /// Empty and zero-visit slots score [`FIRST_PLAY_URGENCY`]; visited
    /// children score mean plus confidence bound against *this* node's
    /// visit total. Strictly-greater comparison keeps the first slot on
    /// ties.
    pub fn select_slot(&self, id: NodeId) -> Option<usize> {
        let node = &self.nodes[id];
        if node.moves.is_empty() {
            return None;
        }
        let parent_visits = node.value.visits();

        let mut best_slot = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (slot, child) in node.children.iter().enumerate() {
            let score = match child {
                Some(child_id) if self.nodes[*child_id].value.visits() > 0 => {
                    let value = &self.nodes[*child_id].value;
                    value.mean() + value.confidence_bound(parent_visits)
                }
                _ => FIRST_PLAY_URGENCY,
            };
            if score > best_score {
                best_score = score;
                best_slot = slot;
            }
        }
        Some(best_slot)
    }

    /// Fill an empty slot with a fresh node holding `moves`.
    pub fn materialize(&mut self, id: NodeId, slot: usize, moves: MoveList) -> NodeId {
        debug_assert!(self.nodes[id].children[slot].is_none(), "slot already filled");
        let child_id = self.nodes.len();
        self.nodes.push(Node::new(moves));
        self.nodes[id].children[slot] = Some(child_id);
        child_id
    }

    /// The best root slot under `rule`, scanning materialized children only
    /// and keeping the first on ties. `None` means no child was ever
    /// materialized — a terminal game state as far as the caller knows.
    pub fn best_slot(&self, rule: BestMoveRule) -> Option<usize> {
        let node = &self.nodes[self.root];
        let mut best: Option<(usize, &V)> = None;
        for (slot, child) in node.children.iter().enumerate() {
            let Some(child_id) = child else { continue };
            let value = &self.nodes[*child_id].value;
            match best {
                Some((_, incumbent)) if !rule.better(value, incumbent) => {}
                _ => best = Some((slot, value)),
            }
        }
        best.map(|(slot, _)| slot)
    }

    /// Sum of the root children's visit counts (conservation checks).
    pub fn children_visits(&self, id: NodeId) -> u64 {
        self.nodes[id]
            .children
            .iter()
            .flatten()
            .map(|&child_id| u64::from(self.nodes[child_id].value.visits()))
            .sum()
    }

    /// Extract the subtree under `new_root` into a fresh arena, preserving
    /// every node's statistics. Everything outside that subtree is dropped.
    pub fn promote(self, new_root: NodeId) -> SearchTree<V> {
        // Discovery pass: assign compact ids in DFS order.
        let mut remap = vec![usize::MAX; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![new_root];
        remap[new_root] = 0;
        order.push(new_root);
        while let Some(id) = stack.pop() {
            for child in self.nodes[id].children.iter().flatten() {
                debug_assert_eq!(remap[*child], usize::MAX, "tree node reached twice");
                remap[*child] = order.len();
                order.push(*child);
                stack.push(*child);
            }
        }

        // Move pass: lift the reachable nodes out in discovery order.
        let mut old: Vec<Option<Node<V>>> = self.nodes.into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for id in order {
            let mut node = old[id].take().expect("discovery order visits each node once");
            for child in node.children.iter_mut() {
                *child = child.map(|child_id| remap[child_id]);
            }
            nodes.push(node);
        }

        SearchTree { nodes, root: 0 }
    }
}

/// Total order over child statistics used by the root move choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestMoveRule {
    /// Prefer the child with the highest visit count (the robust choice).
    MostVisits,
    /// Prefer the child with the highest average reward.
    HighestMean,
}

impl BestMoveRule {
    /// Return `true` if `candidate` is strictly better than `incumbent`.
    pub fn better<V: Value>(self, candidate: &V, incumbent: &V) -> bool {
        match self {
            BestMoveRule::MostVisits => candidate.visits() > incumbent.visits(),
            BestMoveRule::HighestMean => candidate.mean() > incumbent.mean(),
        }
    }
}

#[cfg(test)]
mod tests {
    use morra_core::Position;

    use super::{BestMoveRule, SearchTree};
    use crate::search::value::{UcbValue, Value};

    fn tree_from(fen: &str) -> (Position, SearchTree<UcbValue>) {
        let mut position: Position = fen.parse().unwrap();
        let moves = position.legal_moves();
        (position, SearchTree::new(moves))
    }

    fn starting_tree() -> (Position, SearchTree<UcbValue>) {
        tree_from(morra_core::STARTING_FEN)
    }

    #[test]
    fn fresh_tree_has_a_lone_root() {
        let (_, tree) = starting_tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.move_count(tree.root()), 20);
        assert_eq!(tree.value(tree.root()).visits(), 0);
    }

    #[test]
    fn selection_sweeps_slots_left_to_right_first() {
        let (mut position, mut tree) = starting_tree();
        let root = tree.root();
        // With every slot empty, selection must take slot 0, then 1, ...
        for expected_slot in 0..3 {
            let slot = tree.select_slot(root).unwrap();
            assert_eq!(slot, expected_slot);
            let mv = tree.move_at(root, slot);
            let undo = position.apply(mv);
            let moves = position.legal_moves();
            let child = tree.materialize(root, slot, moves);
            position.unapply(mv, undo);
            tree.value_mut(child).update(0.5);
            tree.value_mut(root).update(0.5);
        }
    }

    #[test]
    fn terminal_node_reports_no_child() {
        let (_, tree) = tree_from("6k1/8/8/8/8/8/5PPP/4r1K1 w - - 0 1");
        assert_eq!(tree.move_count(tree.root()), 0);
        assert_eq!(tree.select_slot(tree.root()), None);
    }

    #[test]
    fn selection_prefers_the_rewarding_child_once_all_are_visited() {
        let (mut position, mut tree) = starting_tree();
        let root = tree.root();
        let slots = tree.move_count(root);
        for slot in 0..slots {
            let mv = tree.move_at(root, slot);
            let undo = position.apply(mv);
            let moves = position.legal_moves();
            let child = tree.materialize(root, slot, moves);
            position.unapply(mv, undo);
            // Slot 7 is the lucky one.
            let reward = if slot == 7 { 1.0 } else { 0.0 };
            tree.value_mut(child).update(reward);
            tree.value_mut(root).update(reward);
        }
        assert_eq!(tree.select_slot(root), Some(7));
    }

    #[test]
    fn best_slot_rules_and_tie_break() {
        let (mut position, mut tree) = starting_tree();
        let root = tree.root();
        // Materialize three children with distinct profiles:
        // slot 0: 3 visits, mean 1/3; slot 1: 2 visits, mean 1/2;
        // slot 2: 3 visits, mean 1/3 (ties slot 0 on both rules).
        let profiles: [(usize, &[f64]); 3] = [
            (0, &[1.0, 0.0, 0.0]),
            (1, &[1.0, 0.0]),
            (2, &[0.0, 1.0, 0.0]),
        ];
        for (slot, rewards) in profiles {
            let mv = tree.move_at(root, slot);
            let undo = position.apply(mv);
            let moves = position.legal_moves();
            let child = tree.materialize(root, slot, moves);
            position.unapply(mv, undo);
            for &reward in rewards {
                tree.value_mut(child).update(reward);
                tree.value_mut(root).update(reward);
            }
        }
        // Most visits: slots 0 and 2 tie at 3 — first seen wins.
        assert_eq!(tree.best_slot(BestMoveRule::MostVisits), Some(0));
        // Highest mean: slot 1 wins outright.
        assert_eq!(tree.best_slot(BestMoveRule::HighestMean), Some(1));
    }

    #[test]
    fn best_slot_with_no_materialized_children() {
        let (_, tree) = starting_tree();
        assert_eq!(tree.best_slot(BestMoveRule::MostVisits), None);
    }

    #[test]
    fn promote_preserves_statistics_and_drops_siblings() {
        let (mut position, mut tree) = starting_tree();
        let root = tree.root();

        // Materialize two root children; give the first a grandchild.
        let mv0 = tree.move_at(root, 0);
        let undo = position.apply(mv0);
        let child0 = tree.materialize(root, 0, position.legal_moves());
        let gmv = tree.move_at(child0, 4);
        let gundo = position.apply(gmv);
        let grandchild = tree.materialize(child0, 4, position.legal_moves());
        position.unapply(gmv, gundo);
        position.unapply(mv0, undo);

        let mv1 = tree.move_at(root, 1);
        let undo = position.apply(mv1);
        let _child1 = tree.materialize(root, 1, position.legal_moves());
        position.unapply(mv1, undo);

        for _ in 0..5 {
            tree.value_mut(child0).update(1.0);
        }
        tree.value_mut(grandchild).update(0.5);

        let promoted = tree.promote(child0);
        assert_eq!(promoted.len(), 2, "child plus its grandchild survive");
        let new_root = promoted.root();
        assert_eq!(promoted.value(new_root).visits(), 5);
        // The grandchild slot mapping survived the index remap.
        let kept = promoted.child(new_root, 4).expect("grandchild slot kept");
        assert_eq!(promoted.value(kept).visits(), 1);
        for slot in 0..promoted.move_count(new_root) {
            if slot != 4 {
                assert_eq!(promoted.child(new_root, slot), None);
            }
        }
    }
}
