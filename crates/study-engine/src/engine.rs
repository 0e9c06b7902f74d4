//! The operations every study kind supports.
//!
//! Annotation and comment edits behave the same for every kind that allows
//! editing, so they are provided methods; kinds override what differs.

use chess_core::game_data::{Ply, Shape};
use chess_core::ids::IdGenerator;
use chess_core::nag::{self, Direction, MoveQuality};
use chess_core::rules::PlayedMove;
use chess_core::tree::MoveNode;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::kind::StudyKind;
use crate::locator::{self, MoveIndex};
use crate::state::StudyState;

pub trait StudyEngine: Send + Sync {
    fn kind(&self) -> StudyKind;

    fn initial_state(&self, state: StudyState) -> StudyState {
        state
    }

    /// Applies a move already resolved by the rules evaluator.
    fn play(
        &self,
        state: &StudyState,
        played: &PlayedMove,
        ids: &mut dyn IdGenerator,
    ) -> StudyState;

    fn goto_next(&self, state: &StudyState) -> StudyState;

    fn goto_prev(&self, state: &StudyState) -> StudyState;

    fn goto_move(&self, state: &StudyState, id: &str) -> StudyState;

    fn goto_begin(&self, state: &StudyState) -> StudyState;

    fn goto_end(&self, state: &StudyState) -> StudyState;

    fn remove_last(&self, state: &StudyState) -> StudyState {
        remove_last_move(state)
    }

    fn sync_shapes(&self, state: &StudyState, shapes: Vec<Shape>) -> StudyState {
        edit_current(state, |node| node.ply.shapes = shapes)
    }

    fn sync_comment(&self, state: &StudyState, comment: Option<JsonValue>) -> StudyState {
        if state.current.is_none() {
            let mut next = state.clone();
            next.study.comment = comment;
            return next;
        }
        edit_current(state, |node| node.ply.comment = comment)
    }

    fn annotate(&self, state: &StudyState, quality: MoveQuality) -> StudyState {
        edit_current(state, |node| {
            node.ply.nags = nag::annotate_move(&node.ply.nags, quality)
        })
    }

    fn evaluate_move(&self, state: &StudyState, direction: Direction) -> StudyState {
        edit_current(state, |node| {
            node.ply.nags = nag::step_move_quality(&node.ply.nags, direction)
        })
    }

    fn evaluate_position(&self, state: &StudyState, direction: Direction) -> StudyState {
        edit_current(state, |node| {
            node.ply.nags = nag::step_position(&node.ply.nags, direction)
        })
    }
}

/// Applies `edit` to a copy of the current move. No-op without one.
pub fn edit_current(state: &StudyState, edit: impl FnOnce(&mut MoveNode)) -> StudyState {
    let Some(index) = state
        .current
        .as_deref()
        .and_then(|id| locator::locate(&state.study, id))
    else {
        debug!("No current move to edit");
        return state.clone();
    };

    let mut next = state.clone();
    match next.study.node_mut(&index.path()) {
        Some(node) => edit(node),
        None => return state.clone(),
    }
    next
}

/// Detaches the last move of the line holding the current move.
///
/// When the current move is that last move, the display steps back to the
/// new end of the line, or to the owner when a variation empties and is
/// removed altogether.
pub fn remove_last_move(state: &StudyState) -> StudyState {
    let Some(current) = state.current.as_deref() else {
        debug!("Nothing to undo before the first move");
        return state.clone();
    };
    let Some(index) = locator::locate(&state.study, current) else {
        debug!("Current move {} is not addressable", current);
        return state.clone();
    };

    let line: Vec<String> = locator::line_of(&state.study, index)
        .into_iter()
        .map(|n| n.id().to_string())
        .collect();
    let Some(last) = line.len().checked_sub(1) else {
        return state.clone();
    };
    let removing_current = index.index == last;
    let mut next = state.clone();

    match index.variation {
        Some(v) if last == 0 => {
            // the variation empties: splice its head out of the alt chain
            let head = MoveIndex::in_variation(v.owner, v.variation, 0);
            let Some(slot) = next.study.slot_mut(&head.path()) else {
                return state.clone();
            };
            let sibling = slot.as_ref().and_then(|h| h.alt.clone());
            *slot = sibling;
            if removing_current {
                next.current = locator::node_at(&next.study, MoveIndex::main(v.owner))
                    .map(|n| n.id().to_string());
            }
        }
        _ => {
            let Some(slot) = next.study.slot_mut(&index.with_index(last).path()) else {
                return state.clone();
            };
            *slot = None;
            if removing_current {
                next.current = last.checked_sub(1).map(|i| line[i].clone());
            }
        }
    }

    debug!("Removed move {} (current now {:?})", line[last], next.current);
    next
}

/// Enters `played` as the owner move itself, an existing alternative to it,
/// or a new alternative appended after the existing ones.
pub fn enter_or_branch(
    state: &StudyState,
    owner: MoveIndex,
    played: &PlayedMove,
    ids: &mut dyn IdGenerator,
) -> StudyState {
    let path = owner.path();
    let Some(node) = state.study.node_at(&path) else {
        return state.clone();
    };

    if node.ply.san == played.san {
        return state.with_current(Some(node.id().to_string()));
    }
    if let Some(head) = node.alternatives().find(|h| h.ply.san == played.san) {
        return state.with_current(Some(head.id().to_string()));
    }

    let ply = Ply::from_played(ids.next_id(), played);
    let id = ply.id.clone();
    let mut next = state.clone();
    if !next.study.push_alternative(&path, ply) {
        return state.clone();
    }
    debug!("Opened variation {} against {}", id, node.id());
    next.current = Some(id);
    next
}

/// Appends `played` after the move at `index`, which must end its line.
pub fn append_after(
    state: &StudyState,
    index: MoveIndex,
    played: &PlayedMove,
    ids: &mut dyn IdGenerator,
) -> StudyState {
    let ply = Ply::from_played(ids.next_id(), played);
    let id = ply.id.clone();
    let mut next = state.clone();
    if !next.study.set_next(&index.path(), ply) {
        return state.clone();
    }
    next.current = Some(id);
    next
}
