//! Puzzle studies: the main line is the solution to be found.
//!
//! The solver plays one side; each correct move is answered automatically
//! with the recorded reply. Wrong moves, navigation and branching are all
//! ignored, and the notation stays hidden until the line is solved.

use chess_core::ids::IdGenerator;
use chess_core::rules::PlayedMove;
use chess_core::tree::MoveNode;
use tracing::debug;

use crate::engine::StudyEngine;
use crate::kind::StudyKind;
use crate::locator;
use crate::state::StudyState;

#[derive(Debug, Default, Clone, Copy)]
pub struct PuzzleEngine;

impl PuzzleEngine {
    /// Index of the main-line move the solver is expected to play next.
    fn expected_index(state: &StudyState) -> Option<usize> {
        match state.current.as_deref() {
            None => Some(0),
            Some(id) => {
                let index = locator::locate(&state.study, id)?;
                // solving never leaves the main line
                index.variation.is_none().then_some(index.index + 1)
            }
        }
    }
}

impl StudyEngine for PuzzleEngine {
    fn kind(&self) -> StudyKind {
        StudyKind::Puzzle
    }

    fn initial_state(&self, state: StudyState) -> StudyState {
        StudyState {
            notation_hidden: true,
            ..state
        }
    }

    fn play(
        &self,
        state: &StudyState,
        played: &PlayedMove,
        _ids: &mut dyn IdGenerator,
    ) -> StudyState {
        let main: Vec<&MoveNode> = state.study.main_line().collect();
        let Some(expected) = Self::expected_index(state).and_then(|i| main.get(i).map(|n| (i, *n)))
        else {
            return state.clone();
        };

        let (i, node) = expected;
        if node.ply.san != played.san {
            debug!("Puzzle move {} is not {}", played.san, node.ply.san);
            return state.clone();
        }

        // answer with the recorded reply when there is one
        let shown = main.get(i + 1).copied().unwrap_or(node);
        let mut next = state.with_current(Some(shown.id().to_string()));
        if main.last().map(|n| n.id()) == Some(shown.id()) {
            debug!("Puzzle solved");
            next.notation_hidden = false;
        }
        next
    }

    fn goto_next(&self, state: &StudyState) -> StudyState {
        state.clone()
    }

    fn goto_prev(&self, state: &StudyState) -> StudyState {
        state.clone()
    }

    fn goto_move(&self, state: &StudyState, _id: &str) -> StudyState {
        state.clone()
    }

    fn goto_begin(&self, state: &StudyState) -> StudyState {
        state.clone()
    }

    fn goto_end(&self, state: &StudyState) -> StudyState {
        state.clone()
    }
}
