//! In-memory study tree.
//!
//! Each node owns a ply plus two links: `next` continues the same line and
//! `alt` points at the head of the next alternative to *this* move. The main
//! line is the chain of `next` links from the root. The variations replacing
//! main-line move `i` are the `alt` chain hanging off that move.
//!
//! Nodes are shared through [`Arc`], so cloning a [`Study`] is cheap and
//! mutation copies only the nodes along the edited path.

use std::collections::BTreeMap;
use std::iter;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::game_data::{Ply, STANDARD_START_FEN};

#[derive(Debug, Clone, PartialEq)]
pub struct MoveNode {
    pub ply: Ply,
    pub next: Option<Arc<MoveNode>>,
    pub alt: Option<Arc<MoveNode>>,
}

impl MoveNode {
    pub fn leaf(ply: Ply) -> Self {
        Self {
            ply,
            next: None,
            alt: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.ply.id
    }

    /// This node followed by its `next` successors.
    pub fn line(&self) -> impl Iterator<Item = &MoveNode> {
        iter::successors(Some(self), |n| n.next.as_deref())
    }

    /// Heads of the alternatives to this node, excluding itself.
    pub fn alternatives(&self) -> impl Iterator<Item = &MoveNode> {
        iter::successors(self.alt.as_deref(), |n| n.alt.as_deref())
    }
}

/// One link followed when walking from the root slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Alt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Study {
    pub headers: BTreeMap<String, String>,
    pub comment: Option<JsonValue>,
    pub root: Option<Arc<MoveNode>>,
    pub root_fen: String,
}

impl Default for Study {
    fn default() -> Self {
        Self::new(STANDARD_START_FEN)
    }
}

impl Study {
    pub fn new(root_fen: &str) -> Self {
        Self {
            headers: BTreeMap::new(),
            comment: None,
            root: None,
            root_fen: root_fen.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn main_line(&self) -> impl Iterator<Item = &MoveNode> {
        self.root.as_deref().into_iter().flat_map(MoveNode::line)
    }

    /// The node reached by following `path` from the root. An empty path
    /// addresses the root itself.
    pub fn node_at(&self, path: &[Step]) -> Option<&MoveNode> {
        let mut node = self.root.as_deref()?;
        for step in path {
            node = match step {
                Step::Next => node.next.as_deref()?,
                Step::Alt => node.alt.as_deref()?,
            };
        }
        Some(node)
    }

    /// The link slot at the end of `path`, copying shared nodes on the way.
    /// The slot itself may be empty, which is how callers append.
    pub fn slot_mut(&mut self, path: &[Step]) -> Option<&mut Option<Arc<MoveNode>>> {
        let mut slot = &mut self.root;
        for step in path {
            let node = Arc::make_mut(slot.as_mut()?);
            slot = match step {
                Step::Next => &mut node.next,
                Step::Alt => &mut node.alt,
            };
        }
        Some(slot)
    }

    pub fn node_mut(&mut self, path: &[Step]) -> Option<&mut MoveNode> {
        self.slot_mut(path)?.as_mut().map(Arc::make_mut)
    }

    /// Links `ply` as the continuation of the node at `path`. Any existing
    /// continuation is replaced.
    pub fn set_next(&mut self, path: &[Step], ply: Ply) -> bool {
        let Some(node) = self.node_mut(path) else {
            return false;
        };
        node.next = Some(Arc::new(MoveNode::leaf(ply)));
        true
    }

    /// Appends `ply` as the last alternative to the node at `path`.
    pub fn push_alternative(&mut self, path: &[Step], ply: Ply) -> bool {
        let Some(owner) = self.node_at(path) else {
            return false;
        };
        let depth = owner.alternatives().count();
        let mut alt_path = path.to_vec();
        alt_path.extend(iter::repeat(Step::Alt).take(depth + 1));
        match self.slot_mut(&alt_path) {
            Some(slot) => {
                *slot = Some(Arc::new(MoveNode::leaf(ply)));
                true
            }
            None => false,
        }
    }

    /// Depth-first search over every node of every line.
    pub fn find(&self, id: &str) -> Option<&MoveNode> {
        let mut stack: Vec<&MoveNode> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            if node.id() == id {
                return Some(node);
            }
            stack.extend(node.next.as_deref());
            stack.extend(node.alt.as_deref());
        }
        None
    }

    pub fn move_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&MoveNode> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.next.as_deref());
            stack.extend(node.alt.as_deref());
        }
        count
    }
}
