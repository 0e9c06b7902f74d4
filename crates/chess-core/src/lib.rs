//! Core data model and notation handling for annotated chess studies.
//!
//! A study is a branching move history: a main line plus alternative lines,
//! every ply carrying comments, board shapes and annotation glyphs. In memory
//! the history is a binary tree ([`tree::MoveNode`]); at the persistence and
//! text boundaries it is the flat "moves + variations" wire form
//! ([`game_data::WireStudy`]).

pub mod codec;
pub mod comment;
pub mod error;
pub mod export;
pub mod format;
pub mod game_data;
pub mod ids;
pub mod nag;
pub mod pgn;
pub mod rules;
pub mod tree;

pub use codec::{tree_to_wire, wire_to_tree};
pub use error::{FormatError, RulesError};
pub use export::{study_to_pgn, wire_to_pgn};
pub use game_data::{Ply, Shape, Side, WireMove, WireStudy, WireVariation};
pub use pgn::compile_pgn_or_fen;
pub use tree::{MoveNode, Step, Study};
