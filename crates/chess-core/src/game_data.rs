//! Wire schema shared by persistence and text export.
//!
//! Field names are part of the stored format and must not change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::rules::PlayedMove;

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Written by every producer of wire data.
pub const CURRENT_STORAGE_VERSION: &str = "0.0.2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

/// A board-annotation arrow or circle drawn by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub orig: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brush: Option<String>,
}

/// Content of one ply. Identical in the tree and the wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ply {
    #[serde(rename = "moveId")]
    pub id: String,
    pub color: Side,
    pub san: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<char>,
    /// Position after the move, as FEN.
    pub after: String,
    /// Rich-comment document, opaque outside of export.
    #[serde(default)]
    pub comment: Option<JsonValue>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    /// Numeric Annotation Glyphs, kept sorted.
    #[serde(default)]
    pub nags: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<f64>,
}

impl Ply {
    /// A fresh, unannotated ply for a move resolved by the rules evaluator.
    pub fn from_played(id: String, played: &PlayedMove) -> Self {
        Self {
            id,
            color: played.color,
            san: played.san.clone(),
            from: played.from.clone(),
            to: played.to.clone(),
            promotion: played.promotion,
            after: played.after.clone(),
            comment: None,
            shapes: Vec::new(),
            nags: Vec::new(),
            clock: None,
            evaluation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMove {
    #[serde(flatten)]
    pub ply: Ply,
    #[serde(default)]
    pub variants: Vec<WireVariation>,
}

impl WireMove {
    pub fn new(ply: Ply) -> Self {
        Self {
            ply,
            variants: Vec::new(),
        }
    }
}

/// An alternative sequence replacing the move identified by `parent_move_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireVariation {
    /// Id of the variation's first move.
    #[serde(default)]
    pub variant_id: String,
    /// Id of the move this variation replaces (its owner, not the prior move).
    #[serde(default)]
    pub parent_move_id: String,
    pub moves: Vec<WireMove>,
}

impl WireVariation {
    /// Builds a variation with the canonical bookkeeping ids.
    pub fn owned_by(owner_id: &str, moves: Vec<WireMove>) -> Self {
        let variant_id = moves
            .first()
            .map(|m| m.ply.id.clone())
            .unwrap_or_default();
        Self {
            variant_id,
            parent_move_id: owner_id.to_string(),
            moves,
        }
    }
}

fn default_root_fen() -> String {
    STANDARD_START_FEN.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireStudy {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub comment: Option<JsonValue>,
    #[serde(default)]
    pub moves: Vec<WireMove>,
    #[serde(rename = "rootFEN", default = "default_root_fen")]
    pub root_fen: String,
}

impl WireStudy {
    /// A study with no moves starting from `root_fen`.
    pub fn empty(root_fen: &str) -> Self {
        Self {
            version: CURRENT_STORAGE_VERSION.to_string(),
            headers: BTreeMap::new(),
            comment: None,
            moves: Vec::new(),
            root_fen: root_fen.to_string(),
        }
    }
}
