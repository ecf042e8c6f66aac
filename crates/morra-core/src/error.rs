//! Error types for FEN parsing and position validation.

/// Errors from parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// The string does not have exactly 6 space-separated fields.
    #[error("expected 6 FEN fields, found {found}")]
    WrongFieldCount { found: usize },
    /// The placement section does not have exactly 8 ranks.
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },
    /// A rank describes more or fewer than 8 squares.
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength { rank_index: usize, length: usize },
    /// An unrecognized character in the piece placement.
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar { character: char },
    /// The active-color field is not "w" or "b".
    #[error("invalid active color: \"{found}\"")]
    InvalidColor { found: String },
    /// An unrecognized character in the castling field.
    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar { character: char },
    /// The en-passant field is not "-" or a valid square.
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant { found: String },
    /// A move counter is not a valid number.
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter {
        field: &'static str,
        found: String,
    },
    /// The parsed position fails structural validation.
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError),
}

/// Errors from structural validation of a [`Position`](crate::Position).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// A side does not have exactly one king.
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount { color: &'static str, count: u32 },
    /// Pawns occupy the first or eighth rank.
    #[error("pawns found on a back rank")]
    PawnsOnBackRank,
    /// Two figure bitboards claim the same square.
    #[error("overlapping piece bitboards")]
    OverlappingPieces,
    /// A colour aggregate does not equal the union of that colour's boards.
    #[error("side aggregate inconsistent with per-figure bitboards")]
    InconsistentAggregate,
}

#[cfg(test)]
mod tests {
    use super::{FenError, PositionError};

    #[test]
    fn fen_error_display() {
        let err = FenError::WrongFieldCount { found: 4 };
        assert_eq!(format!("{err}"), "expected 6 FEN fields, found 4");
    }

    #[test]
    fn position_error_display() {
        let err = PositionError::PawnsOnBackRank;
        assert_eq!(format!("{err}"), "pawns found on a back rank");
    }

    #[test]
    fn fen_error_wraps_position_error() {
        let err: FenError = PositionError::OverlappingPieces.into();
        assert!(matches!(err, FenError::InvalidPosition(_)));
    }
}
