//! Core chess model: bitboard position, move codec, and legal move
//! generation for the search engine built on top.

mod attacks;
mod bitboard;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod file;
mod movegen;
mod perft;
mod piece;
mod piece_kind;
mod position;
mod rank;
mod square;
mod zobrist;

pub use bitboard::Bitboard;
pub use castle_rights::{CastleRights, CastleSide};
pub use chess_move::{Move, MoveKind};
pub use color::Color;
pub use error::{FenError, PositionError};
pub use fen::STARTING_FEN;
pub use file::File;
pub use movegen::MoveList;
pub use perft::perft;
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use position::{Position, Undo, UndoGuard};
pub use rank::Rank;
pub use square::Square;
pub use zobrist::hash_from_scratch;
