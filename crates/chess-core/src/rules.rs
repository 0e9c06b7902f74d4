//! Move legality and position evaluation backed by shakmaty.
//!
//! Everything else in the workspace talks to chess rules through
//! [`RulesEvaluator`], so the rules library never leaks into the study model.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, File, Move, Position, Role, Square};

use crate::error::RulesError;
use crate::game_data::Side;

/// A from/to move request coming from a board UI or a UCI string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub from: String,
    pub to: String,
    pub promotion: Option<char>,
}

impl Candidate {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            promotion: None,
        }
    }

    /// Parses long algebraic notation such as `e2e4` or `e7e8q`.
    pub fn from_uci(uci: &str) -> Option<Self> {
        let uci = uci.trim();
        if !(uci.len() == 4 || uci.len() == 5) || !uci.is_ascii() {
            return None;
        }
        let promotion = uci[4..].chars().next().map(|c| c.to_ascii_lowercase());
        Some(Self {
            from: uci[0..2].to_string(),
            to: uci[2..4].to_string(),
            promotion,
        })
    }
}

/// A legal move as resolved against a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    pub color: Side,
    /// SAN including check (`+`) or mate (`#`) suffix.
    pub san: String,
    pub from: String,
    pub to: String,
    pub promotion: Option<char>,
    /// FEN after the move.
    pub after: String,
}

pub trait RulesEvaluator {
    /// Resolves a from/to candidate. Promotions default to a queen.
    fn play(&self, fen: &str, candidate: &Candidate) -> Result<PlayedMove, RulesError>;

    /// Resolves a SAN token, with or without its check suffix.
    fn play_san(&self, fen: &str, san: &str) -> Result<PlayedMove, RulesError>;

    fn validate_fen(&self, fen: &str) -> Result<(), RulesError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ShakmatyRules;

impl RulesEvaluator for ShakmatyRules {
    fn play(&self, fen: &str, candidate: &Candidate) -> Result<PlayedMove, RulesError> {
        let pos = position_from_fen(fen)?;
        let from = parse_square(&candidate.from)?;
        let to = parse_square(&candidate.to)?;
        let wanted = candidate.promotion.unwrap_or('q');

        let mv = pos
            .legal_moves()
            .into_iter()
            .find(|m| {
                move_squares(m) == (from, to)
                    && m.promotion().map_or(true, |role| role.char() == wanted)
            })
            .ok_or_else(|| {
                RulesError::IllegalMove(format!("{}{}", candidate.from, candidate.to))
            })?;

        finish(&pos, mv)
    }

    fn play_san(&self, fen: &str, san: &str) -> Result<PlayedMove, RulesError> {
        let pos = position_from_fen(fen)?;
        let bare = san.trim().trim_end_matches(['+', '#', '!', '?']);
        let parsed: San = bare
            .parse()
            .map_err(|_| RulesError::InvalidSan(san.to_string()))?;
        let mv = parsed
            .to_move(&pos)
            .map_err(|_| RulesError::IllegalMove(san.to_string()))?;

        finish(&pos, mv)
    }

    fn validate_fen(&self, fen: &str) -> Result<(), RulesError> {
        position_from_fen(fen).map(|_| ())
    }
}

fn position_from_fen(fen: &str) -> Result<Chess, RulesError> {
    let parsed: Fen = fen
        .trim()
        .parse()
        .map_err(|e| RulesError::InvalidFen(format!("{}: {}", fen, e)))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| RulesError::InvalidFen(format!("{}: {}", fen, e)))
}

fn parse_square(s: &str) -> Result<Square, RulesError> {
    s.parse::<Square>()
        .map_err(|_| RulesError::InvalidSquare(s.to_string()))
}

/// Origin and destination as a board UI sees them. Castling is reported as
/// the king's two-square step.
fn move_squares(mv: &Move) -> (Square, Square) {
    match *mv {
        Move::Normal { from, to, .. } => (from, to),
        Move::EnPassant { from, to } => (from, to),
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() {
                File::G
            } else {
                File::C
            };
            (king, Square::from_coords(file, king.rank()))
        }
        ref other => (other.to(), other.to()),
    }
}

fn side_of(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

fn finish(pos: &Chess, mv: Move) -> Result<PlayedMove, RulesError> {
    let color = side_of(pos.turn());
    let (from, to) = move_squares(&mv);
    let promotion = mv.promotion().map(Role::char);
    let san = San::from_move(pos, mv.clone()).to_string();

    let after = pos
        .clone()
        .play(mv)
        .map_err(|_| RulesError::IllegalMove(san.clone()))?;

    let suffix = if after.is_checkmate() {
        "#"
    } else if after.is_check() {
        "+"
    } else {
        ""
    };

    Ok(PlayedMove {
        color,
        san: format!("{}{}", san, suffix),
        from: from.to_string(),
        to: to.to_string(),
        promotion,
        after: Fen::from_position(&after, EnPassantMode::Legal).to_string(),
    })
}

/// Side to move and fullmove number of a FEN, read straight from its fields.
pub fn turn_and_fullmove(fen: &str) -> (Side, u32) {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let side = match fields.get(1) {
        Some(&"b") => Side::Black,
        _ => Side::White,
    };
    let fullmove = fields
        .get(5)
        .and_then(|n| n.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1);
    (side, fullmove)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_data::STANDARD_START_FEN;

    #[test]
    fn test_play_candidate_from_start() {
        let played = ShakmatyRules
            .play(STANDARD_START_FEN, &Candidate::new("e2", "e4"))
            .unwrap();
        assert_eq!(played.san, "e4");
        assert_eq!(played.color, Side::White);
        assert_eq!(
            played.after,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn test_illegal_candidate_is_rejected() {
        let err = ShakmatyRules
            .play(STANDARD_START_FEN, &Candidate::new("e2", "e5"))
            .unwrap_err();
        assert!(matches!(err, RulesError::IllegalMove(_)));
    }

    #[test]
    fn test_castling_uses_king_destination() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let played = ShakmatyRules.play(fen, &Candidate::new("e1", "g1")).unwrap();
        assert_eq!(played.san, "O-O");
        assert_eq!(played.to, "g1");

        let long = ShakmatyRules.play_san(fen, "O-O-O").unwrap();
        assert_eq!(long.from, "e1");
        assert_eq!(long.to, "c1");
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let fen = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";
        let queen = ShakmatyRules.play(fen, &Candidate::new("e7", "e8")).unwrap();
        assert_eq!(queen.promotion, Some('q'));
        assert!(queen.san.starts_with("e8=Q"));

        let knight = ShakmatyRules
            .play(fen, &Candidate::from_uci("e7e8n").unwrap())
            .unwrap();
        assert_eq!(knight.promotion, Some('n'));
    }

    #[test]
    fn test_check_and_mate_suffixes() {
        // Fool's mate
        let mut fen = STANDARD_START_FEN.to_string();
        for san in ["f3", "e5", "g4"] {
            fen = ShakmatyRules.play_san(&fen, san).unwrap().after;
        }
        let mate = ShakmatyRules.play_san(&fen, "Qh4#").unwrap();
        assert_eq!(mate.san, "Qh4#");
    }

    #[test]
    fn test_invalid_fen() {
        assert!(ShakmatyRules.validate_fen("not a fen").is_err());
        assert!(ShakmatyRules.validate_fen(STANDARD_START_FEN).is_ok());
    }

    #[test]
    fn test_turn_and_fullmove() {
        assert_eq!(turn_and_fullmove(STANDARD_START_FEN), (Side::White, 1));
        assert_eq!(
            turn_and_fullmove("8/R3P3/2Rk1K2/N7/2P5/8/8/8 b - - 3 2"),
            (Side::Black, 2)
        );
    }

    #[test]
    fn test_uci_parsing() {
        assert_eq!(Candidate::from_uci("e2e4"), Some(Candidate::new("e2", "e4")));
        assert_eq!(Candidate::from_uci("e2"), None);
    }
}
