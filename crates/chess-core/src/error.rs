//! Error types for notation import and move resolution

use thiserror::Error;

/// Malformed FEN/PGN input. Never recovered by substituting a default study.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Input is neither FEN nor PGN")]
    NotChessData,

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Illegal move '{san}' at ply {ply}: {reason}")]
    IllegalMove {
        ply: usize,
        san: String,
        reason: String,
    },

    #[error("PGN read error: {0}")]
    Pgn(#[from] std::io::Error),

    #[error("No game found in PGN input")]
    EmptyGame,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid SAN: {0}")]
    InvalidSan(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),
}
