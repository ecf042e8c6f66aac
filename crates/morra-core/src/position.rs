//! The position: all mutable game state, destructive move application, and
//! its exact inverse.
//!
//! A move is applied in place; [`Position::apply`] returns an [`Undo`]
//! snapshot that the *caller* keeps on its own frame and hands back to
//! [`Position::unapply`]. Nested apply/unapply during recursive descent
//! therefore never share undo storage. [`UndoGuard`] pairs the two calls
//! through `Drop` for scopes that may exit early.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::chess_move::{Move, MoveKind};
use crate::color::Color;
use crate::error::PositionError;
use crate::file::File;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;
use crate::zobrist;

/// Castling rights lost when a square is the source or destination of a move.
static RIGHTS_REVOKED: [CastleRights; 64] = {
    let mut table = [CastleRights::NONE; 64];
    table[Square::E1.index()] = CastleRights::WHITE_BOTH;
    table[Square::A1.index()] = CastleRights::WHITE_QUEEN;
    table[Square::H1.index()] = CastleRights::WHITE_KING;
    table[Square::E8.index()] = CastleRights::BLACK_BOTH;
    table[Square::A8.index()] = CastleRights::BLACK_QUEEN;
    table[Square::H8.index()] = CastleRights::BLACK_KING;
    table
};

/// One move's worth of restore data: the fields a move may clobber that the
/// board toggles alone cannot bring back.
#[derive(Clone, Copy)]
pub struct Undo {
    castling: CastleRights,
    en_passant: Option<File>,
    halfmove_clock: u16,
    fullmove_number: u16,
    castle_corridor: Bitboard,
    hash: u64,
}

/// Complete game state on 12 figure bitboards plus 2 colour aggregates.
#[derive(Clone)]
pub struct Position {
    /// Per-colour, per-figure occupancy. `pieces[c][k]` holds the figures of
    /// kind `k` and colour `c`.
    pieces: [[Bitboard; PieceKind::COUNT]; Color::COUNT],
    /// Colour aggregates; each must equal the union of that colour's six
    /// figure boards at all times.
    sides: [Bitboard; Color::COUNT],
    side_to_move: Color,
    castling: CastleRights,
    /// En-passant target file, live for exactly one ply after a double push.
    en_passant: Option<File>,
    halfmove_clock: u16,
    fullmove_number: u16,
    /// King transit squares of the castle applied last ply. Consulted only by
    /// the legality filter; cleared by the next apply.
    castle_corridor: Bitboard,
    /// Incremental zobrist hash. The sign bit tracks the side to move.
    hash: u64,
}

impl Position {
    /// Return the standard initial arrangement.
    pub fn starting_position() -> Position {
        crate::fen::STARTING_FEN
            .parse()
            .expect("the starting FEN is well-formed")
    }

    /// Construct from raw components. Used by FEN parsing; the hash is
    /// recomputed from scratch afterwards.
    pub(crate) fn from_raw(
        pieces: [[Bitboard; PieceKind::COUNT]; Color::COUNT],
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<File>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> Position {
        let mut sides = [Bitboard::EMPTY; Color::COUNT];
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                sides[color.index()] |= pieces[color.index()][kind.index()];
            }
        }
        let mut position = Position {
            pieces,
            sides,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            castle_corridor: Bitboard::EMPTY,
            hash: 0,
        };
        position.hash = zobrist::hash_from_scratch(&position);
        position
    }

    // --- Accessors ---

    /// Figures of `kind` and `color`.
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    /// All figures of `color`.
    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    /// All occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.sides[Color::White.index()] | self.sides[Color::Black.index()]
    }

    /// The side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Current castling rights.
    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// En-passant target file, if the last move was a double push.
    #[inline]
    pub fn en_passant_file(&self) -> Option<File> {
        self.en_passant
    }

    /// En-passant target square, derived from the file and the side to move.
    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        let file = self.en_passant?;
        // The capture square sits behind the pawn that just double-pushed.
        let rank = crate::rank::Rank::en_passant(self.side_to_move.flip());
        Some(Square::new(rank, file))
    }

    /// Halfmove clock for the fifty-move rule.
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Fullmove number. Best-effort bookkeeping, not load-bearing.
    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// King transit squares of a castle applied last ply.
    #[inline]
    pub fn castle_corridor(&self) -> Bitboard {
        self.castle_corridor
    }

    /// The incremental zobrist hash.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// The hash as a signed value: negative exactly when Black is to move.
    #[inline]
    pub fn signed_hash(&self) -> i64 {
        self.hash as i64
    }

    /// The king square of `color`.
    ///
    /// # Panics
    ///
    /// Panics if the position has no king of that color (invalid state).
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color, PieceKind::King)
            .lsb()
            .expect("each side must have a king")
    }

    /// Figure count over both sides (oracle threshold checks).
    #[inline]
    pub fn piece_count(&self) -> u32 {
        self.occupied().count()
    }

    /// The colored figure on `sq`, if any.
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        let color = Color::ALL
            .into_iter()
            .find(|&color| self.sides[color.index()].contains(sq))?;
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces(color, kind).contains(sq))
            .map(|kind| Piece::new(kind, color))
    }

    /// The figure kind of `color` on `sq`, if any.
    pub fn kind_on(&self, sq: Square, color: Color) -> Option<PieceKind> {
        if !self.sides[color.index()].contains(sq) {
            return None;
        }
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces(color, kind).contains(sq))
    }

    /// Validate the structural invariants.
    pub fn validate(&self) -> Result<(), PositionError> {
        for color in Color::ALL {
            let kings = self.pieces(color, PieceKind::King).count();
            if kings != 1 {
                let color = match color {
                    Color::White => "white",
                    Color::Black => "black",
                };
                return Err(PositionError::InvalidKingCount {
                    color,
                    count: kings,
                });
            }
        }

        let back_ranks = Bitboard::RANK_1 | Bitboard::RANK_8;
        let pawns =
            self.pieces(Color::White, PieceKind::Pawn) | self.pieces(Color::Black, PieceKind::Pawn);
        if (pawns & back_ranks).any() {
            return Err(PositionError::PawnsOnBackRank);
        }

        let mut union = Bitboard::EMPTY;
        let mut total = 0;
        for color in Color::ALL {
            let mut aggregate = Bitboard::EMPTY;
            for kind in PieceKind::ALL {
                let bb = self.pieces(color, kind);
                aggregate |= bb;
                total += bb.count();
            }
            if aggregate != self.sides[color.index()] {
                return Err(PositionError::InconsistentAggregate);
            }
            union |= aggregate;
        }
        if union.count() != total {
            return Err(PositionError::OverlappingPieces);
        }

        Ok(())
    }

    // --- Make / unmake ---

    /// XOR a figure into or out of its boards. Hash is the caller's concern.
    #[inline]
    fn toggle(&mut self, sq: Square, kind: PieceKind, color: Color) {
        let mask = sq.bitboard();
        self.pieces[color.index()][kind.index()] ^= mask;
        self.sides[color.index()] ^= mask;
    }

    /// Move a figure of `color` from `src` to `dst`, updating the hash.
    #[inline]
    fn shift(&mut self, kind: PieceKind, color: Color, src: Square, dst: Square) {
        self.toggle(src, kind, color);
        self.toggle(dst, kind, color);
        let piece = Piece::new(kind, color);
        self.hash ^= zobrist::piece_square(piece, src);
        self.hash ^= zobrist::piece_square(piece, dst);
    }

    /// Remove or restore a lone figure, updating the hash.
    #[inline]
    fn toggle_hashed(&mut self, sq: Square, kind: PieceKind, color: Color) {
        self.toggle(sq, kind, color);
        self.hash ^= zobrist::piece_square(Piece::new(kind, color), sq);
    }

    /// Apply `mv` destructively and return the snapshot needed to undo it.
    ///
    /// The move must be one generated for this position; applying anything
    /// else is a programmer error and corrupts the state.
    pub fn apply(&mut self, mv: Move) -> Undo {
        let us = self.side_to_move;
        let them = us.flip();
        let src = mv.source();
        let dst = mv.dest();

        let undo = Undo {
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            castle_corridor: self.castle_corridor,
            hash: self.hash,
        };

        // Retire the one-ply fields and their hash contributions.
        if let Some(file) = self.en_passant.take() {
            self.hash ^= zobrist::en_passant_file(file);
        }
        self.hash ^= zobrist::castling(self.castling);
        self.castle_corridor = Bitboard::EMPTY;

        match mv.kind() {
            MoveKind::Quiet => {
                self.shift(mv.piece(), us, src, dst);
                // A double push opens the en-passant file for one ply.
                if mv.piece() == PieceKind::Pawn && src.index().abs_diff(dst.index()) == 16 {
                    let file = src.file();
                    self.en_passant = Some(file);
                }
            }
            MoveKind::Capture => {
                if let Some(captured) = mv.captured() {
                    self.toggle_hashed(dst, captured, them);
                }
                self.shift(mv.piece(), us, src, dst);
            }
            MoveKind::CastleKingSide | MoveKind::CastleQueenSide => {
                self.shift(PieceKind::King, us, src, dst);
                let (rook_src, rook_dst) = rook_castle_squares(mv.kind(), us);
                self.shift(PieceKind::Rook, us, rook_src, rook_dst);
                self.castle_corridor = castle_corridor(mv.kind(), us);
            }
            MoveKind::EnPassant => {
                self.shift(PieceKind::Pawn, us, src, dst);
                // The captured pawn stands beside ours, not on `dst`.
                let victim = Square::new(src.rank(), dst.file());
                self.toggle_hashed(victim, PieceKind::Pawn, them);
            }
            MoveKind::Promotion => {
                if let Some(captured) = mv.captured() {
                    self.toggle_hashed(dst, captured, them);
                }
                self.toggle_hashed(src, PieceKind::Pawn, us);
                let promoted = mv.promoted().expect("promotion move carries its figure");
                self.toggle_hashed(dst, promoted, us);
            }
        }

        self.castling = self
            .castling
            .remove(RIGHTS_REVOKED[src.index()])
            .remove(RIGHTS_REVOKED[dst.index()]);
        self.hash ^= zobrist::castling(self.castling);

        if let Some(file) = self.en_passant {
            self.hash ^= zobrist::en_passant_file(file);
        }

        self.halfmove_clock = if mv.resets_clock() {
            0
        } else {
            self.halfmove_clock + 1
        };
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = them;
        self.hash ^= zobrist::SIDE_TO_MOVE;

        undo
    }

    /// Undo the most recent [`apply`](Self::apply) of `mv`, restoring
    /// bit-identical state, hash included.
    pub fn unapply(&mut self, mv: Move, undo: Undo) {
        let us = self.side_to_move.flip(); // the side that made the move
        let them = self.side_to_move;
        let src = mv.source();
        let dst = mv.dest();

        // Board toggles are their own inverse; replay them.
        match mv.kind() {
            MoveKind::Quiet => {
                self.toggle(src, mv.piece(), us);
                self.toggle(dst, mv.piece(), us);
            }
            MoveKind::Capture => {
                self.toggle(src, mv.piece(), us);
                self.toggle(dst, mv.piece(), us);
                if let Some(captured) = mv.captured() {
                    self.toggle(dst, captured, them);
                }
            }
            MoveKind::CastleKingSide | MoveKind::CastleQueenSide => {
                self.toggle(src, PieceKind::King, us);
                self.toggle(dst, PieceKind::King, us);
                let (rook_src, rook_dst) = rook_castle_squares(mv.kind(), us);
                self.toggle(rook_src, PieceKind::Rook, us);
                self.toggle(rook_dst, PieceKind::Rook, us);
            }
            MoveKind::EnPassant => {
                self.toggle(src, PieceKind::Pawn, us);
                self.toggle(dst, PieceKind::Pawn, us);
                let victim = Square::new(src.rank(), dst.file());
                self.toggle(victim, PieceKind::Pawn, them);
            }
            MoveKind::Promotion => {
                self.toggle(src, PieceKind::Pawn, us);
                let promoted = mv.promoted().expect("promotion move carries its figure");
                self.toggle(dst, promoted, us);
                if let Some(captured) = mv.captured() {
                    self.toggle(dst, captured, them);
                }
            }
        }

        self.side_to_move = us;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.castle_corridor = undo.castle_corridor;
        self.hash = undo.hash;
    }

    /// Apply `mv` under a guard whose `Drop` runs the matching unapply, so
    /// the pairing survives early returns and panics.
    pub fn apply_guarded(&mut self, mv: Move) -> UndoGuard<'_> {
        let undo = self.apply(mv);
        UndoGuard {
            position: self,
            mv,
            undo,
        }
    }
}

/// Rook source and destination for a castle of `kind` by `color`.
fn rook_castle_squares(kind: MoveKind, color: Color) -> (Square, Square) {
    match (kind, color) {
        (MoveKind::CastleKingSide, Color::White) => (Square::H1, Square::F1),
        (MoveKind::CastleQueenSide, Color::White) => (Square::A1, Square::D1),
        (MoveKind::CastleKingSide, Color::Black) => (Square::H8, Square::F8),
        (MoveKind::CastleQueenSide, Color::Black) => (Square::A8, Square::D8),
        _ => unreachable!("not a castle kind"),
    }
}

/// King start, transit, and landing squares for a castle — every square the
/// legality filter must treat as royal for one filtering pass.
fn castle_corridor(kind: MoveKind, color: Color) -> Bitboard {
    let squares: [Square; 3] = match (kind, color) {
        (MoveKind::CastleKingSide, Color::White) => [Square::E1, Square::F1, Square::G1],
        (MoveKind::CastleQueenSide, Color::White) => [Square::E1, Square::D1, Square::C1],
        (MoveKind::CastleKingSide, Color::Black) => [Square::E8, Square::F8, Square::G8],
        (MoveKind::CastleQueenSide, Color::Black) => [Square::E8, Square::D8, Square::C8],
        _ => unreachable!("not a castle kind"),
    };
    squares
        .into_iter()
        .fold(Bitboard::EMPTY, |bb, sq| bb.with(sq))
}

/// Equality is game-state equality: boards, side to move, rights, en-passant
/// file, halfmove clock, and hash. The castle corridor (generation scratch)
/// and the fullmove number (best-effort) do not participate.
impl PartialEq for Position {
    fn eq(&self, other: &Position) -> bool {
        self.pieces == other.pieces
            && self.sides == other.sides
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.hash == other.hash
    }
}

impl Eq for Position {}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{self}\")")
    }
}

/// Scope guard returned by [`Position::apply_guarded`].
///
/// Dereferences to the position with the move applied; dropping it restores
/// the prior state.
pub struct UndoGuard<'a> {
    position: &'a mut Position,
    mv: Move,
    undo: Undo,
}

impl Deref for UndoGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for UndoGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for UndoGuard<'_> {
    fn drop(&mut self) {
        self.position.unapply(self.mv, self.undo);
    }
}
