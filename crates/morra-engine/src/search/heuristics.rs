//! Pluggable move choice for rollouts.

use morra_core::{MoveList, PieceKind, Position};
use rand::Rng;
use rand::rngs::SmallRng;

/// Chooses which legal reply a rollout plays next.
///
/// Implementations receive the full legal move list and return an index into
/// it; the list is never empty.
pub trait MovePicker {
    fn pick(&self, position: &Position, moves: &MoveList, rng: &mut SmallRng) -> usize;
}

/// Uniformly random choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPicker;

impl MovePicker for UniformPicker {
    fn pick(&self, _position: &Position, moves: &MoveList, rng: &mut SmallRng) -> usize {
        rng.random_range(0..moves.len())
    }
}

/// Rough figure worth for victim ordering.
fn victim_worth(kind: PieceKind) -> u32 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight | PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::Queen => 9,
        PieceKind::King => 0,
    }
}

/// Capture-biased choice: with probability `bias`, play the capture with the
/// most valuable victim (first such on ties); otherwise fall back to a
/// uniform pick over all replies.
#[derive(Debug, Clone, Copy)]
pub struct CaptureBiased {
    bias: f64,
}

impl CaptureBiased {
    pub fn new(bias: f64) -> CaptureBiased {
        CaptureBiased {
            bias: bias.clamp(0.0, 1.0),
        }
    }
}

impl Default for CaptureBiased {
    fn default() -> Self {
        CaptureBiased::new(0.75)
    }
}

impl MovePicker for CaptureBiased {
    fn pick(&self, _position: &Position, moves: &MoveList, rng: &mut SmallRng) -> usize {
        if rng.random_bool(self.bias) {
            let mut best: Option<(usize, u32)> = None;
            for (index, mv) in moves.iter().enumerate() {
                if let Some(victim) = mv.captured() {
                    let worth = victim_worth(victim);
                    if best.is_none_or(|(_, incumbent)| worth > incumbent) {
                        best = Some((index, worth));
                    }
                }
            }
            if let Some((index, _)) = best {
                return index;
            }
        }
        rng.random_range(0..moves.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{CaptureBiased, MovePicker, UniformPicker};
    use morra_core::Position;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn uniform_pick_is_in_range() {
        let mut position = Position::starting_position();
        let moves = position.legal_moves();
        let mut rng = SmallRng::seed_from_u64(7);
        let picker = UniformPicker;
        for _ in 0..200 {
            assert!(picker.pick(&position, &moves, &mut rng) < moves.len());
        }
    }

    #[test]
    fn full_bias_always_takes_the_biggest_victim() {
        // Pawn can take the queen or the knight; queen must win.
        let mut position: Position = "4k3/8/8/2q1n3/3P4/8/8/4K3 w - - 0 1".parse().unwrap();
        let moves = position.legal_moves();
        let picker = CaptureBiased::new(1.0);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let index = picker.pick(&position, &moves, &mut rng);
            let mv = moves[index];
            assert_eq!(mv.captured(), Some(morra_core::PieceKind::Queen));
        }
    }

    #[test]
    fn zero_bias_degenerates_to_uniform() {
        let mut position: Position = "4k3/8/8/2q1n3/3P4/8/8/4K3 w - - 0 1".parse().unwrap();
        let moves = position.legal_moves();
        let picker = CaptureBiased::new(0.0);
        let mut rng = SmallRng::seed_from_u64(7);
        let mut saw_non_capture = false;
        for _ in 0..200 {
            let mv = moves[picker.pick(&position, &moves, &mut rng)];
            saw_non_capture |= !mv.is_capture();
        }
        assert!(saw_non_capture, "unbiased picks must reach quiet moves");
    }
}
