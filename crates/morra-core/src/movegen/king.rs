//! King move and castle generation.
//!
//! Phase 1 only checks that a castle's rights are intact and its path is
//! clear; attack safety of the transit squares is the legality filter's job,
//! via the castle corridor the apply records.

use crate::attacks::king_attacks;
use crate::bitboard::Bitboard;
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

use super::{KingCapture, MoveList};

/// Squares that must be empty between king and rook, per color and wing.
fn castle_path(color: Color, side: CastleSide) -> Bitboard {
    let squares: &[Square] = match (color, side) {
        (Color::White, CastleSide::KingSide) => &[Square::F1, Square::G1],
        (Color::White, CastleSide::QueenSide) => &[Square::B1, Square::C1, Square::D1],
        (Color::Black, CastleSide::KingSide) => &[Square::F8, Square::G8],
        (Color::Black, CastleSide::QueenSide) => &[Square::B8, Square::C8, Square::D8],
    };
    squares
        .iter()
        .fold(Bitboard::EMPTY, |bb, &sq| bb.with(sq))
}

/// The rook's home square for a castle, per color and wing.
fn castle_rook_home(color: Color, side: CastleSide) -> Square {
    match (color, side) {
        (Color::White, CastleSide::KingSide) => Square::H1,
        (Color::White, CastleSide::QueenSide) => Square::A1,
        (Color::Black, CastleSide::KingSide) => Square::H8,
        (Color::Black, CastleSide::QueenSide) => Square::A8,
    }
}

pub(super) fn generate(
    position: &Position,
    us: Color,
    royal: Bitboard,
    list: &mut MoveList,
) -> Result<(), KingCapture> {
    let them = us.flip();
    let own = position.side(us);
    let enemy = position.side(them);
    let src = position.king_square(us);

    let attacks = king_attacks(src);
    if (attacks & royal).any() {
        return Err(KingCapture);
    }
    let targets = attacks & !own;
    for dst in targets & enemy {
        let captured = position
            .kind_on(dst, them)
            .expect("enemy-masked target must hold an enemy figure");
        list.push(Move::capture(PieceKind::King, src, dst, captured));
    }
    for dst in targets & !enemy {
        list.push(Move::quiet(PieceKind::King, src, dst));
    }

    // Castles. The rook-presence check guards against rights that outlived
    // their rook in a hand-built position.
    let occupied = position.occupied();
    for side in [CastleSide::KingSide, CastleSide::QueenSide] {
        if !position.castling().has(us, side) {
            continue;
        }
        if (castle_path(us, side) & occupied).any() {
            continue;
        }
        if !position
            .pieces(us, PieceKind::Rook)
            .contains(castle_rook_home(us, side))
        {
            continue;
        }
        list.push(Move::castle(us, side));
    }

    Ok(())
}
