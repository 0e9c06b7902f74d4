use chess_core::game_data::Shape;
use chess_core::tree::{MoveNode, Study};
use serde_json::Value as JsonValue;

/// What the board shows: a study plus the move currently displayed.
/// `current == None` is the position before the first move.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyState {
    pub study: Study,
    pub current: Option<String>,
    pub notation_hidden: bool,
}

impl StudyState {
    pub fn new(study: Study, current: Option<String>) -> Self {
        Self {
            study,
            current,
            notation_hidden: false,
        }
    }

    pub fn current_node(&self) -> Option<&MoveNode> {
        self.current.as_deref().and_then(|id| self.study.find(id))
    }

    /// FEN of the displayed position.
    pub fn display_fen(&self) -> &str {
        self.current_node()
            .map_or(&self.study.root_fen, |node| &node.ply.after)
    }

    pub fn current_shapes(&self) -> &[Shape] {
        self.current_node()
            .map_or(&[][..], |node| node.ply.shapes.as_slice())
    }

    /// The current move's comment, or the study comment before the first move.
    pub fn current_comment(&self) -> Option<&JsonValue> {
        match self.current.as_deref() {
            Some(_) => self.current_node().and_then(|node| node.ply.comment.as_ref()),
            None => self.study.comment.as_ref(),
        }
    }

    pub fn with_current(&self, current: Option<String>) -> Self {
        Self {
            current,
            ..self.clone()
        }
    }
}
