//! Knight move generation.

use crate::attacks::knight_attacks;
use crate::bitboard::Bitboard;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::position::Position;

use super::{KingCapture, MoveList};

pub(super) fn generate(
    position: &Position,
    us: Color,
    royal: Bitboard,
    list: &mut MoveList,
) -> Result<(), KingCapture> {
    let them = us.flip();
    let own = position.side(us);
    let enemy = position.side(them);

    for src in position.pieces(us, PieceKind::Knight) {
        let attacks = knight_attacks(src);
        if (attacks & royal).any() {
            return Err(KingCapture);
        }
        let targets = attacks & !own;
        for dst in targets & enemy {
            let captured = position
                .kind_on(dst, them)
                .expect("enemy-masked target must hold an enemy figure");
            list.push(Move::capture(PieceKind::Knight, src, dst, captured));
        }
        for dst in targets & !enemy {
            list.push(Move::quiet(PieceKind::Knight, src, dst));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::position::Position;
    use crate::square::Square;

    #[test]
    fn lone_knight_in_the_center() {
        let mut position: Position = "4k3/8/8/8/3N4/8/8/4K3 w - - 0 1".parse().unwrap();
        let moves = position.legal_moves();
        let knight_moves: Vec<_> = moves
            .iter()
            .filter(|mv| mv.source() == Square::D4)
            .collect();
        assert_eq!(knight_moves.len(), 8);
    }

    #[test]
    fn knight_captures_are_tagged() {
        let mut position: Position = "4k3/8/8/8/3N4/1p6/8/4K3 w - - 0 1".parse().unwrap();
        let moves = position.legal_moves();
        let capture = moves
            .iter()
            .find(|mv| mv.source() == Square::D4 && mv.dest() == Square::B3)
            .expect("Nxb3 must be generated");
        assert!(capture.is_capture());
    }
}
