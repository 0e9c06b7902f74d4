//! Event dispatch for one open study.

use chess_core::codec::{tree_to_wire, wire_to_tree};
use chess_core::game_data::{Shape, WireStudy};
use chess_core::ids::{IdGenerator, RandomIds};
use chess_core::nag::{Direction, MoveQuality};
use chess_core::rules::{Candidate, RulesEvaluator, ShakmatyRules};
use chess_core::tree::Study;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::engine::StudyEngine;
use crate::initial::InitialPosition;
use crate::kind::{engine_for, StudyKind};
use crate::state::StudyState;

#[derive(Debug, Clone, PartialEq)]
pub enum StudyEvent {
    Play(Candidate),
    RemoveLastMove,
    GotoBegin,
    GotoNext,
    GotoPrev,
    GotoEnd,
    GotoMove(String),
    AnnotateMove(MoveQuality),
    EvaluateMove(Direction),
    EvaluatePosition(Direction),
    SyncShapes(Vec<Shape>),
    SyncComment(Option<JsonValue>),
}

/// Processes events one at a time against the engine chosen for the kind.
pub struct Session<R = ShakmatyRules, G = RandomIds> {
    engine: Box<dyn StudyEngine>,
    rules: R,
    ids: G,
    state: StudyState,
}

impl Session {
    pub fn new(kind: StudyKind, study: Study, initial: &InitialPosition) -> Self {
        Self::with_collaborators(kind, study, initial, ShakmatyRules, RandomIds)
    }

    pub fn from_wire(kind: StudyKind, wire: &WireStudy, initial: &InitialPosition) -> Self {
        Self::new(kind, wire_to_tree(wire), initial)
    }
}

impl<R: RulesEvaluator, G: IdGenerator> Session<R, G> {
    pub fn with_collaborators(
        kind: StudyKind,
        study: Study,
        initial: &InitialPosition,
        rules: R,
        ids: G,
    ) -> Self {
        let engine = engine_for(kind);
        let current = initial.resolve(&study);
        let state = engine.initial_state(StudyState::new(study, current));
        debug!("Opened {} study at {:?}", kind, state.current);
        Self {
            engine,
            rules,
            ids,
            state,
        }
    }

    pub fn kind(&self) -> StudyKind {
        self.engine.kind()
    }

    pub fn state(&self) -> &StudyState {
        &self.state
    }

    pub fn study(&self) -> &Study {
        &self.state.study
    }

    pub fn to_wire(&self) -> WireStudy {
        tree_to_wire(&self.state.study)
    }

    pub fn dispatch(&mut self, event: StudyEvent) -> &StudyState {
        debug!("Dispatching {:?}", event);
        let engine = self.engine.as_ref();
        let state = &self.state;

        let next = match event {
            StudyEvent::Play(candidate) => match self.rules.play(state.display_fen(), &candidate) {
                Ok(played) => engine.play(state, &played, &mut self.ids),
                Err(e) => {
                    warn!("Rejected move {}{}: {}", candidate.from, candidate.to, e);
                    state.clone()
                }
            },
            StudyEvent::RemoveLastMove => engine.remove_last(state),
            StudyEvent::GotoBegin => engine.goto_begin(state),
            StudyEvent::GotoNext => engine.goto_next(state),
            StudyEvent::GotoPrev => engine.goto_prev(state),
            StudyEvent::GotoEnd => engine.goto_end(state),
            StudyEvent::GotoMove(id) => engine.goto_move(state, &id),
            StudyEvent::AnnotateMove(quality) => engine.annotate(state, quality),
            StudyEvent::EvaluateMove(direction) => engine.evaluate_move(state, direction),
            StudyEvent::EvaluatePosition(direction) => engine.evaluate_position(state, direction),
            StudyEvent::SyncShapes(shapes) => engine.sync_shapes(state, shapes),
            StudyEvent::SyncComment(comment) => engine.sync_comment(state, comment),
        };

        debug!("Current move now {:?}", next.current);
        self.state = next;
        &self.state
    }
}
