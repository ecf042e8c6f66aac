//! Zobrist keys for the incremental position hash.
//!
//! Every feature key is masked to the low 63 bits; the side-to-move key is
//! exactly the sign bit. Read as an `i64`, a hash is therefore negative if
//! and only if Black is to move, so parity checks cost one comparison.

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::file::File;
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;

/// XORed into the hash when Black is to move. Exactly the `i64` sign bit.
pub(crate) const SIDE_TO_MOVE: u64 = 1 << 63;

const FEATURE_MASK: u64 = !SIDE_TO_MOVE;

const SEED: u64 = 0x4d4f_5252_4121_9e37; // "MORRA!"

const fn xorshift64(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

struct Keys {
    piece_square: [[u64; Square::COUNT]; Piece::COUNT],
    castling: [u64; CastleRights::CONFIGS],
    en_passant_file: [u64; File::COUNT],
}

/// Build every feature key from one xorshift stream, sign bit cleared.
const fn build_keys() -> Keys {
    let mut keys = Keys {
        piece_square: [[0; Square::COUNT]; Piece::COUNT],
        castling: [0; CastleRights::CONFIGS],
        en_passant_file: [0; File::COUNT],
    };
    let mut state = SEED;

    let mut piece = 0;
    while piece < Piece::COUNT {
        let mut sq = 0;
        while sq < Square::COUNT {
            state = xorshift64(state);
            keys.piece_square[piece][sq] = state & FEATURE_MASK;
            sq += 1;
        }
        piece += 1;
    }

    let mut config = 0;
    while config < CastleRights::CONFIGS {
        state = xorshift64(state);
        keys.castling[config] = state & FEATURE_MASK;
        config += 1;
    }

    let mut file = 0;
    while file < File::COUNT {
        state = xorshift64(state);
        keys.en_passant_file[file] = state & FEATURE_MASK;
        file += 1;
    }

    keys
}

static KEYS: Keys = build_keys();

/// Key for a colored figure standing on a square.
#[inline]
pub(crate) fn piece_square(piece: Piece, sq: Square) -> u64 {
    KEYS.piece_square[piece.index()][sq.index()]
}

/// Key for a castling-rights configuration.
#[inline]
pub(crate) fn castling(rights: CastleRights) -> u64 {
    KEYS.castling[rights.bits() as usize]
}

/// Key for an en-passant target file.
#[inline]
pub(crate) fn en_passant_file(file: File) -> u64 {
    KEYS.en_passant_file[file.index()]
}

/// Recompute the hash of a position from scratch.
///
/// The incrementally maintained hash must always equal this value.
pub fn hash_from_scratch(position: &Position) -> u64 {
    let mut hash = 0u64;

    for color in Color::ALL {
        for kind in crate::piece_kind::PieceKind::ALL {
            for sq in position.pieces(color, kind) {
                hash ^= piece_square(Piece::new(kind, color), sq);
            }
        }
    }

    if position.side_to_move() == Color::Black {
        hash ^= SIDE_TO_MOVE;
    }

    hash ^= castling(position.castling());

    if let Some(file) = position.en_passant_file() {
        hash ^= en_passant_file(file);
    }

    hash
}
