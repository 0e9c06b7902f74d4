//! Cheap detection of whether pasted text is a FEN or a PGN.

use std::sync::LazyLock;

use regex::Regex;

static PLACEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([rnbqkpRNBQKP1-8]+/){7}[rnbqkpRNBQKP1-8]+$").expect("valid placement regex")
});
static CASTLING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(K?Q?k?q?|-)$").expect("valid castling regex"));
static EN_PASSANT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-h][1-8]|-)$").expect("valid en passant regex"));
static MOVE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s*\S+").expect("valid move number regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChessDataFormat {
    Fen,
    Pgn,
}

/// Six space-separated fields with plausible content. Legality is not checked.
pub fn is_fen(input: &str) -> bool {
    let fields: Vec<&str> = input.trim().split(' ').collect();
    let [placement, side, castling, en_passant, halfmove, fullmove] = fields[..] else {
        return false;
    };
    let is_counter = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    PLACEMENT_RE.is_match(placement)
        && matches!(side, "w" | "b")
        && CASTLING_RE.is_match(castling)
        && EN_PASSANT_RE.is_match(en_passant)
        && is_counter(halfmove)
        && is_counter(fullmove)
}

/// Starts with a tag pair, or contains a numbered move.
pub fn is_pgn(input: &str) -> bool {
    let trimmed = input.trim();
    (trimmed.starts_with('[') && trimmed.contains(']')) || MOVE_NUMBER_RE.is_match(trimmed)
}

/// FEN is tried first.
pub fn detect_format(input: &str) -> Option<ChessDataFormat> {
    if is_fen(input) {
        Some(ChessDataFormat::Fen)
    } else if is_pgn(input) {
        Some(ChessDataFormat::Pgn)
    } else {
        None
    }
}
