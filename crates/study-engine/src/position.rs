//! Static positions: nothing can be played, navigated or edited.

use chess_core::game_data::Shape;
use chess_core::ids::IdGenerator;
use chess_core::nag::{Direction, MoveQuality};
use chess_core::rules::PlayedMove;
use serde_json::Value as JsonValue;

use crate::engine::StudyEngine;
use crate::kind::StudyKind;
use crate::state::StudyState;

#[derive(Debug, Default, Clone, Copy)]
pub struct PositionEngine;

impl StudyEngine for PositionEngine {
    fn kind(&self) -> StudyKind {
        StudyKind::Position
    }

    fn play(&self, state: &StudyState, _: &PlayedMove, _: &mut dyn IdGenerator) -> StudyState {
        state.clone()
    }

    fn goto_next(&self, state: &StudyState) -> StudyState {
        state.clone()
    }

    fn goto_prev(&self, state: &StudyState) -> StudyState {
        state.clone()
    }

    fn goto_move(&self, state: &StudyState, _: &str) -> StudyState {
        state.clone()
    }

    fn goto_begin(&self, state: &StudyState) -> StudyState {
        state.clone()
    }

    fn goto_end(&self, state: &StudyState) -> StudyState {
        state.clone()
    }

    fn remove_last(&self, state: &StudyState) -> StudyState {
        state.clone()
    }

    fn sync_shapes(&self, state: &StudyState, _: Vec<Shape>) -> StudyState {
        state.clone()
    }

    fn sync_comment(&self, state: &StudyState, _: Option<JsonValue>) -> StudyState {
        state.clone()
    }

    fn annotate(&self, state: &StudyState, _: MoveQuality) -> StudyState {
        state.clone()
    }

    fn evaluate_move(&self, state: &StudyState, _: Direction) -> StudyState {
        state.clone()
    }

    fn evaluate_position(&self, state: &StudyState, _: Direction) -> StudyState {
        state.clone()
    }
}
