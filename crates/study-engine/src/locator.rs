//! Resolves move ids to their place in the tree.
//!
//! Only the main line and its direct variations are addressable. That is
//! the nesting depth every producer in the workspace writes.

use chess_core::tree::{MoveNode, Step, Study};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariationRef {
    /// Main-line move the variation replaces.
    pub owner: usize,
    /// Position among the owner's alternatives.
    pub variation: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIndex {
    pub variation: Option<VariationRef>,
    pub index: usize,
}

impl MoveIndex {
    pub fn main(index: usize) -> Self {
        Self {
            variation: None,
            index,
        }
    }

    pub fn in_variation(owner: usize, variation: usize, index: usize) -> Self {
        Self {
            variation: Some(VariationRef { owner, variation }),
            index,
        }
    }

    pub fn with_index(self, index: usize) -> Self {
        Self { index, ..self }
    }

    /// Links to follow from the root to reach this move.
    pub fn path(&self) -> Vec<Step> {
        let mut path = Vec::new();
        if let Some(v) = self.variation {
            path.extend(std::iter::repeat(Step::Next).take(v.owner));
            path.extend(std::iter::repeat(Step::Alt).take(v.variation + 1));
        }
        path.extend(std::iter::repeat(Step::Next).take(self.index));
        path
    }
}

pub fn locate(study: &Study, id: &str) -> Option<MoveIndex> {
    for (i, node) in study.main_line().enumerate() {
        if node.id() == id {
            return Some(MoveIndex::main(i));
        }
        for (j, head) in node.alternatives().enumerate() {
            if let Some(k) = head.line().position(|n| n.id() == id) {
                return Some(MoveIndex::in_variation(i, j, k));
            }
        }
    }
    None
}

pub fn node_at(study: &Study, index: MoveIndex) -> Option<&MoveNode> {
    study.node_at(&index.path())
}

/// Every move of the line `index` lies on, from its first move.
pub fn line_of(study: &Study, index: MoveIndex) -> Vec<&MoveNode> {
    let head = match index.variation {
        None => study.root.as_deref(),
        Some(_) => node_at(study, index.with_index(0)),
    };
    head.into_iter().flat_map(MoveNode::line).collect()
}

/// The move `offset` plies away on the same line. Stepping back from the
/// first move of a variation continues from the move before its owner.
pub fn relative(study: &Study, id: &str, offset: isize) -> Option<MoveIndex> {
    let index = locate(study, id)?;
    let target = index.index as isize + offset;

    if target < 0 {
        let v = index.variation?;
        let owner = node_at(study, MoveIndex::main(v.owner))?;
        return relative(study, owner.id(), target);
    }

    let target = target as usize;
    (target < line_of(study, index).len()).then(|| index.with_index(target))
}
