//! Bishop, rook, and queen move generation via ray walks.

use crate::attacks::{bishop_attacks, queen_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

use super::{KingCapture, MoveList};

const SLIDERS: [(PieceKind, fn(Square, Bitboard) -> Bitboard); 3] = [
    (PieceKind::Bishop, bishop_attacks),
    (PieceKind::Rook, rook_attacks),
    (PieceKind::Queen, queen_attacks),
];

pub(super) fn generate(
    position: &Position,
    us: Color,
    royal: Bitboard,
    list: &mut MoveList,
) -> Result<(), KingCapture> {
    let them = us.flip();
    let own = position.side(us);
    let enemy = position.side(them);
    let occupied = position.occupied();

    for (kind, attacks_fn) in SLIDERS {
        for src in position.pieces(us, kind) {
            let attacks = attacks_fn(src, occupied);
            if (attacks & royal).any() {
                return Err(KingCapture);
            }
            let targets = attacks & !own;
            for dst in targets & enemy {
                let captured = position
                    .kind_on(dst, them)
                    .expect("enemy-masked target must hold an enemy figure");
                list.push(Move::capture(kind, src, dst, captured));
            }
            for dst in targets & !enemy {
                list.push(Move::quiet(kind, src, dst));
            }
        }
    }
    Ok(())
}
