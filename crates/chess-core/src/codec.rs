//! Conversion between the wire form and the in-memory tree.
//!
//! Wire variations are converted into `alt` chains and back. A variation's
//! first move never carries nested variations in the wire form: its siblings
//! sit on the owner instead, and anything stored there is ignored on load.

use std::sync::Arc;

use crate::game_data::{WireMove, WireStudy, WireVariation, CURRENT_STORAGE_VERSION};
use crate::tree::{MoveNode, Study};

pub fn wire_to_tree(wire: &WireStudy) -> Study {
    Study {
        headers: wire.headers.clone(),
        comment: wire.comment.clone(),
        root: node_from_moves(&wire.moves),
        root_fen: wire.root_fen.clone(),
    }
}

pub fn tree_to_wire(study: &Study) -> WireStudy {
    WireStudy {
        version: CURRENT_STORAGE_VERSION.to_string(),
        headers: study.headers.clone(),
        comment: study.comment.clone(),
        moves: moves_from_node(study.root.as_deref()),
        root_fen: study.root_fen.clone(),
    }
}

fn node_from_moves(moves: &[WireMove]) -> Option<Arc<MoveNode>> {
    moves.iter().rev().fold(None, |next, m| {
        Some(Arc::new(MoveNode {
            ply: m.ply.clone(),
            next,
            alt: node_from_variations(&m.variants),
        }))
    })
}

fn node_from_variations(variations: &[WireVariation]) -> Option<Arc<MoveNode>> {
    variations.iter().rev().fold(None, |alt, variation| {
        // empty variations have nothing to hang the chain on
        let Some((head, rest)) = variation.moves.split_first() else {
            return alt;
        };
        Some(Arc::new(MoveNode {
            ply: head.ply.clone(),
            next: node_from_moves(rest),
            alt,
        }))
    })
}

fn moves_from_node(node: Option<&MoveNode>) -> Vec<WireMove> {
    node.into_iter()
        .flat_map(MoveNode::line)
        .map(|n| WireMove {
            ply: n.ply.clone(),
            variants: variations_from_node(n),
        })
        .collect()
}

fn variations_from_node(owner: &MoveNode) -> Vec<WireVariation> {
    owner
        .alternatives()
        .map(|head| {
            let mut moves = vec![WireMove::new(head.ply.clone())];
            moves.extend(moves_from_node(head.next.as_deref()));
            WireVariation::owned_by(owner.id(), moves)
        })
        .collect()
}
