//! Pawn move generation: pushes, captures, en passant, promotion expansion.

use crate::attacks::pawn_attacks;
use crate::bitboard::Bitboard;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::rank::Rank;

use super::{KingCapture, MoveList};

const PROMOTION_FIGURES: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

pub(super) fn generate(
    position: &Position,
    us: Color,
    royal: Bitboard,
    list: &mut MoveList,
) -> Result<(), KingCapture> {
    let them = us.flip();
    let enemy = position.side(them);
    let occupied = position.occupied();
    let promo_rank = Rank::promotion(us);
    let start_rank = Rank::pawn_start(us);
    let forward: i8 = match us {
        Color::White => 8,
        Color::Black => -8,
    };
    // The en-passant file belongs to the side to move; when probing the
    // opponent's replies it is out of scope.
    let ep_square = if us == position.side_to_move() {
        position.en_passant_square()
    } else {
        None
    };

    for src in position.pieces(us, PieceKind::Pawn) {
        // The raw capture pattern decides the royal test: a pawn covers its
        // two capture squares whether or not it may capture there this ply.
        let attacks = pawn_attacks(us, src);
        if (attacks & royal).any() {
            return Err(KingCapture);
        }

        for dst in attacks & enemy {
            let captured = position
                .kind_on(dst, them)
                .expect("enemy-masked target must hold an enemy figure");
            if dst.rank() == promo_rank {
                for promoted in PROMOTION_FIGURES {
                    list.push(Move::promotion(src, dst, promoted, Some(captured)));
                }
            } else {
                list.push(Move::capture(PieceKind::Pawn, src, dst, captured));
            }
        }

        if let Some(ep) = ep_square
            && attacks.contains(ep)
        {
            list.push(Move::en_passant(src, ep));
        }

        if let Some(one) = src.offset(forward)
            && !occupied.contains(one)
        {
            if one.rank() == promo_rank {
                for promoted in PROMOTION_FIGURES {
                    list.push(Move::promotion(src, one, promoted, None));
                }
            } else {
                list.push(Move::quiet(PieceKind::Pawn, src, one));
                if src.rank() == start_rank
                    && let Some(two) = one.offset(forward)
                    && !occupied.contains(two)
                {
                    list.push(Move::quiet(PieceKind::Pawn, src, two));
                }
            }
        }
    }
    Ok(())
}
