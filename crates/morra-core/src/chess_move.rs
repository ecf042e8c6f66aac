//! The move codec: a full move description packed into a `u32`.
//!
//! Unlike a from/to-only encoding, the packed word carries the moving
//! figure, the captured figure, and the promotion figure, so applying and
//! un-applying a move needs no board lookups beyond the word itself.

use std::fmt;

use crate::color::Color;
use crate::castle_rights::CastleSide;
use crate::piece_kind::PieceKind;
use crate::square::Square;

const SRC_SHIFT: u32 = 0;
const DST_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const KIND_SHIFT: u32 = 15;
const CAPTURED_SHIFT: u32 = 18;
const PROMO_SHIFT: u32 = 21;

const SQ_MASK: u32 = 0x3F;
const PIECE_MASK: u32 = 0x7;

/// The category of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// A non-capturing move, including the double pawn push.
    Quiet = 0,
    /// A capture of the figure on the destination square.
    Capture = 1,
    CastleKingSide = 2,
    CastleQueenSide = 3,
    /// The en-passant pawn capture; the captured pawn is not on `dest`.
    EnPassant = 4,
    /// A pawn reaching the last rank, capturing or not.
    Promotion = 5,
}

impl MoveKind {
    #[inline]
    const fn from_bits(bits: u32) -> MoveKind {
        match bits {
            0 => MoveKind::Quiet,
            1 => MoveKind::Capture,
            2 => MoveKind::CastleKingSide,
            3 => MoveKind::CastleQueenSide,
            4 => MoveKind::EnPassant,
            _ => MoveKind::Promotion,
        }
    }
}

/// A move packed into 24 bits of a `u32`.
///
/// ```text
/// bits  0-5:  source square        (0-63)
/// bits  6-11: destination square   (0-63)
/// bits 12-14: moving figure        (PieceKind index)
/// bits 15-17: move kind            (MoveKind)
/// bits 18-20: captured figure + 1  (0 = none)
/// bits 21-23: promotion figure + 1 (0 = none)
/// ```
///
/// Equality is by value on the packed word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// Create a non-capturing move.
    pub const fn quiet(piece: PieceKind, source: Square, dest: Square) -> Move {
        Move(Self::base(piece, source, dest) | (MoveKind::Quiet as u32) << KIND_SHIFT)
    }

    /// Create a capture of `captured` on the destination square.
    pub const fn capture(
        piece: PieceKind,
        source: Square,
        dest: Square,
        captured: PieceKind,
    ) -> Move {
        Move(
            Self::base(piece, source, dest)
                | (MoveKind::Capture as u32) << KIND_SHIFT
                | (captured as u32 + 1) << CAPTURED_SHIFT,
        )
    }

    /// Create a castle for `color` toward `side`, encoded as the king's move.
    pub const fn castle(color: Color, side: CastleSide) -> Move {
        let (source, dest, kind) = match (color, side) {
            (Color::White, CastleSide::KingSide) => {
                (Square::E1, Square::G1, MoveKind::CastleKingSide)
            }
            (Color::White, CastleSide::QueenSide) => {
                (Square::E1, Square::C1, MoveKind::CastleQueenSide)
            }
            (Color::Black, CastleSide::KingSide) => {
                (Square::E8, Square::G8, MoveKind::CastleKingSide)
            }
            (Color::Black, CastleSide::QueenSide) => {
                (Square::E8, Square::C8, MoveKind::CastleQueenSide)
            }
        };
        Move(Self::base(PieceKind::King, source, dest) | (kind as u32) << KIND_SHIFT)
    }

    /// Create an en-passant capture. The captured pawn is implicit.
    pub const fn en_passant(source: Square, dest: Square) -> Move {
        Move(
            Self::base(PieceKind::Pawn, source, dest)
                | (MoveKind::EnPassant as u32) << KIND_SHIFT
                | (PieceKind::Pawn as u32 + 1) << CAPTURED_SHIFT,
        )
    }

    /// Create a promotion, optionally capturing on the last rank.
    pub const fn promotion(
        source: Square,
        dest: Square,
        promoted: PieceKind,
        captured: Option<PieceKind>,
    ) -> Move {
        let captured_bits = match captured {
            Some(kind) => kind as u32 + 1,
            None => 0,
        };
        Move(
            Self::base(PieceKind::Pawn, source, dest)
                | (MoveKind::Promotion as u32) << KIND_SHIFT
                | captured_bits << CAPTURED_SHIFT
                | (promoted as u32 + 1) << PROMO_SHIFT,
        )
    }

    #[inline]
    const fn base(piece: PieceKind, source: Square, dest: Square) -> u32 {
        (source.index() as u32) << SRC_SHIFT
            | (dest.index() as u32) << DST_SHIFT
            | (piece as u32) << PIECE_SHIFT
    }

    /// Extract the source square.
    #[inline]
    pub const fn source(self) -> Square {
        Square::from_index_unchecked((self.0 >> SRC_SHIFT & SQ_MASK) as u8)
    }

    /// Extract the destination square.
    #[inline]
    pub const fn dest(self) -> Square {
        Square::from_index_unchecked((self.0 >> DST_SHIFT & SQ_MASK) as u8)
    }

    /// Extract the moving figure.
    #[inline]
    pub const fn piece(self) -> PieceKind {
        match PieceKind::from_index((self.0 >> PIECE_SHIFT & PIECE_MASK) as u8) {
            Some(kind) => kind,
            None => unreachable!(),
        }
    }

    /// Extract the move kind.
    #[inline]
    pub const fn kind(self) -> MoveKind {
        MoveKind::from_bits(self.0 >> KIND_SHIFT & PIECE_MASK)
    }

    /// Extract the captured figure, if any.
    #[inline]
    pub const fn captured(self) -> Option<PieceKind> {
        match self.0 >> CAPTURED_SHIFT & PIECE_MASK {
            0 => None,
            bits => PieceKind::from_index(bits as u8 - 1),
        }
    }

    /// Extract the promotion figure, if any.
    #[inline]
    pub const fn promoted(self) -> Option<PieceKind> {
        match self.0 >> PROMO_SHIFT & PIECE_MASK {
            0 => None,
            bits => PieceKind::from_index(bits as u8 - 1),
        }
    }

    /// Return `true` if the move removes an enemy figure from the board.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured().is_some()
    }

    /// Return `true` for either castle kind.
    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(
            self.kind(),
            MoveKind::CastleKingSide | MoveKind::CastleQueenSide
        )
    }

    /// Return `true` if the fifty-move counter resets after this move.
    #[inline]
    pub const fn resets_clock(self) -> bool {
        matches!(self.piece(), PieceKind::Pawn) || self.is_capture()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source(), self.dest())?;
        if let Some(promoted) = self.promoted() {
            write!(f, "{}", promoted.fen_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?} {:?})", self, self.piece(), self.kind())
    }
}
