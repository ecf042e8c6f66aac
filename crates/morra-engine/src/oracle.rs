//! The endgame-tablebase boundary, consumed but never built here.
//!
//! Rollouts consult the oracle once the piece count drops to a threshold.
//! An answer is exact — the simulation ends on the spot; an absent answer
//! means "unknown, keep simulating".

use std::collections::HashMap;

use morra_core::{Color, Position};

/// An exact endgame verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleVerdict {
    /// The winning side, or `None` for a drawn position.
    pub winner: Option<Color>,
    /// Distance to the end in plies, under best play.
    pub ply_distance: u16,
}

/// A precomputed exact win/loss/draw lookup.
pub trait Oracle {
    /// Look the position up. `None` means the oracle has no entry.
    fn probe(&self, position: &Position) -> Option<OracleVerdict>;
}

/// The default collaborator: knows nothing, so rollouts always simulate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOracle;

impl Oracle for NoOracle {
    fn probe(&self, _position: &Position) -> Option<OracleVerdict> {
        None
    }
}

/// An in-memory oracle keyed by the signed position hash — the same
/// fingerprint an external tablebase would index by. Loaded up front by
/// whoever owns the precomputed data.
#[derive(Debug, Clone, Default)]
pub struct TableOracle {
    entries: HashMap<i64, OracleVerdict>,
}

impl TableOracle {
    pub fn new() -> TableOracle {
        TableOracle::default()
    }

    /// Record the verdict for a position.
    pub fn insert(&mut self, position: &Position, verdict: OracleVerdict) {
        self.entries.insert(position.signed_hash(), verdict);
    }

    /// Number of stored verdicts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if no verdicts are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Oracle for TableOracle {
    fn probe(&self, position: &Position) -> Option<OracleVerdict> {
        self.entries.get(&position.signed_hash()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{NoOracle, Oracle, OracleVerdict, TableOracle};
    use morra_core::{Color, Position};

    #[test]
    fn no_oracle_never_answers() {
        let position = Position::starting_position();
        assert_eq!(NoOracle.probe(&position), None);
    }

    #[test]
    fn table_oracle_roundtrip() {
        let position: Position = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1".parse().unwrap();
        let verdict = OracleVerdict {
            winner: Some(Color::White),
            ply_distance: 28,
        };
        let mut oracle = TableOracle::new();
        assert!(oracle.is_empty());
        oracle.insert(&position, verdict);
        assert_eq!(oracle.len(), 1);
        assert_eq!(oracle.probe(&position), Some(verdict));
        assert_eq!(oracle.probe(&Position::starting_position()), None);
    }

    #[test]
    fn lookup_distinguishes_side_to_move() {
        let white: Position = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1".parse().unwrap();
        let black: Position = "4k3/8/8/8/8/8/4P3/4K3 b - - 0 1".parse().unwrap();
        let mut oracle = TableOracle::new();
        oracle.insert(
            &white,
            OracleVerdict {
                winner: Some(Color::White),
                ply_distance: 28,
            },
        );
        assert!(oracle.probe(&white).is_some());
        assert_eq!(oracle.probe(&black), None);
    }
}
