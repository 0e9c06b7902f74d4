//! Free editing and navigation, used for game and legacy studies.

use std::sync::Arc;

use chess_core::game_data::Ply;
use chess_core::ids::IdGenerator;
use chess_core::rules::PlayedMove;
use chess_core::tree::MoveNode;
use tracing::{debug, warn};

use crate::engine::{append_after, enter_or_branch, StudyEngine};
use crate::kind::StudyKind;
use crate::locator::{self, MoveIndex};
use crate::state::StudyState;

#[derive(Debug, Clone, Copy)]
pub struct GameEngine {
    kind: StudyKind,
}

impl GameEngine {
    pub fn new(kind: StudyKind) -> Self {
        Self { kind }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(StudyKind::Game)
    }
}

impl GameEngine {
    fn step(&self, state: &StudyState, offset: isize) -> StudyState {
        let target = match state.current.as_deref() {
            Some(id) => locator::relative(&state.study, id, offset)
                .and_then(|index| locator::node_at(&state.study, index)),
            None if offset > 0 => state.study.root.as_deref(),
            None => state.study.main_line().last(),
        };
        state.with_current(target.map(|n| n.id().to_string()))
    }
}

impl StudyEngine for GameEngine {
    fn kind(&self) -> StudyKind {
        self.kind
    }

    fn play(
        &self,
        state: &StudyState,
        played: &PlayedMove,
        ids: &mut dyn IdGenerator,
    ) -> StudyState {
        let Some(current) = state.current.as_deref() else {
            if state.study.is_empty() {
                let ply = Ply::from_played(ids.next_id(), played);
                let mut next = state.with_current(Some(ply.id.clone()));
                next.study.root = Some(Arc::new(MoveNode::leaf(ply)));
                debug!("Started study with {}", played.san);
                return next;
            }
            return enter_or_branch(state, MoveIndex::main(0), played, ids);
        };

        let Some(index) = locator::locate(&state.study, current) else {
            warn!("Current move {} not found, ignoring {}", current, played.san);
            return state.clone();
        };
        let line = locator::line_of(&state.study, index);

        if index.index + 1 == line.len() {
            return append_after(state, index, played, ids);
        }

        match index.variation {
            None => enter_or_branch(state, MoveIndex::main(index.index + 1), played, ids),
            Some(_) => {
                let next = line[index.index + 1];
                if next.ply.san == played.san {
                    state.with_current(Some(next.id().to_string()))
                } else {
                    warn!(
                        "Rejected {}: branching inside a variation is not supported",
                        played.san
                    );
                    state.clone()
                }
            }
        }
    }

    fn goto_next(&self, state: &StudyState) -> StudyState {
        self.step(state, 1)
    }

    fn goto_prev(&self, state: &StudyState) -> StudyState {
        self.step(state, -1)
    }

    fn goto_move(&self, state: &StudyState, id: &str) -> StudyState {
        // only moves the locator can address can become current
        if locator::locate(&state.study, id).is_none() {
            warn!("Cannot go to unknown move {}", id);
            return state.clone();
        }
        state.with_current(Some(id.to_string()))
    }

    fn goto_begin(&self, state: &StudyState) -> StudyState {
        state.with_current(None)
    }

    fn goto_end(&self, state: &StudyState) -> StudyState {
        state.with_current(state.study.main_line().last().map(|n| n.id().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::ids::SequentialIds;
    use chess_core::rules::{Candidate, RulesEvaluator, ShakmatyRules};
    use chess_core::tree::Study;

    fn play(state: &StudyState, from: &str, to: &str, ids: &mut SequentialIds) -> StudyState {
        let played = ShakmatyRules
            .play(state.display_fen(), &Candidate::new(from, to))
            .unwrap();
        GameEngine::default().play(state, &played, ids)
    }

    fn sans(state: &StudyState) -> Vec<String> {
        state.study.main_line().map(|n| n.ply.san.clone()).collect()
    }

    #[test]
    fn test_play_appends_to_main_line() {
        let mut ids = SequentialIds::default();
        let mut state = StudyState::new(Study::default(), None);
        state = play(&state, "e2", "e4", &mut ids);
        state = play(&state, "e7", "e5", &mut ids);
        assert_eq!(sans(&state), vec!["e4", "e5"]);
        assert_eq!(state.current.as_deref(), Some("m2"));
    }

    #[test]
    fn test_replaying_existing_move_advances() {
        let mut ids = SequentialIds::default();
        let mut state = StudyState::new(Study::default(), None);
        state = play(&state, "e2", "e4", &mut ids);
        state = play(&state, "e7", "e5", &mut ids);
        state = GameEngine::default().goto_begin(&state);

        state = play(&state, "e2", "e4", &mut ids);
        assert_eq!(state.current.as_deref(), Some("m1"));
        state = play(&state, "e7", "e5", &mut ids);
        assert_eq!(state.current.as_deref(), Some("m2"));
        assert_eq!(state.study.move_count(), 2);
    }

    #[test]
    fn test_divergence_opens_and_reenters_variation() {
        let engine = GameEngine::default();
        let mut ids = SequentialIds::default();
        let mut state = StudyState::new(Study::default(), None);
        state = play(&state, "e2", "e4", &mut ids);
        state = play(&state, "e7", "e5", &mut ids);
        state = engine.goto_move(&state, "m1");

        state = play(&state, "c7", "c5", &mut ids);
        assert_eq!(state.current.as_deref(), Some("m3"));
        let e5 = state.study.find("m2").unwrap();
        assert_eq!(e5.alt.as_ref().unwrap().ply.san, "c5");

        // extend the variation from its last move
        state = play(&state, "g1", "f3", &mut ids);
        assert_eq!(
            locator::locate(&state.study, "m4"),
            Some(MoveIndex::in_variation(1, 0, 1))
        );

        // playing the same divergence again enters the existing variation
        state = engine.goto_move(&state, "m1");
        state = play(&state, "c7", "c5", &mut ids);
        assert_eq!(state.current.as_deref(), Some("m3"));
        assert_eq!(state.study.move_count(), 4);
    }

    #[test]
    fn test_mid_variation_divergence_is_rejected() {
        let engine = GameEngine::default();
        let mut ids = SequentialIds::default();
        let mut state = StudyState::new(Study::default(), None);
        state = play(&state, "e2", "e4", &mut ids);
        state = play(&state, "e7", "e5", &mut ids);
        state = engine.goto_move(&state, "m1");
        state = play(&state, "c7", "c5", &mut ids);
        state = play(&state, "g1", "f3", &mut ids);
        state = engine.goto_move(&state, "m3");

        let before = state.clone();
        state = play(&state, "d2", "d4", &mut ids);
        assert_eq!(state, before);

        // matching the continuation still advances
        state = play(&state, "g1", "f3", &mut ids);
        assert_eq!(state.current.as_deref(), Some("m4"));
    }

    #[test]
    fn test_navigation() {
        let engine = GameEngine::default();
        let mut ids = SequentialIds::default();
        let mut state = StudyState::new(Study::default(), None);
        state = play(&state, "e2", "e4", &mut ids);
        state = play(&state, "e7", "e5", &mut ids);

        state = engine.goto_begin(&state);
        assert_eq!(state.current, None);
        state = engine.goto_next(&state);
        assert_eq!(state.current.as_deref(), Some("m1"));
        state = engine.goto_next(&state);
        assert_eq!(state.current.as_deref(), Some("m2"));
        state = engine.goto_next(&state);
        assert_eq!(state.current, None);
        state = engine.goto_prev(&state);
        assert_eq!(state.current.as_deref(), Some("m2"));
        state = engine.goto_end(&state);
        assert_eq!(state.current.as_deref(), Some("m2"));

        let unknown = engine.goto_move(&state, "zz");
        assert_eq!(unknown, state);
    }

    #[test]
    fn test_previous_states_are_untouched() {
        let mut ids = SequentialIds::default();
        let empty = StudyState::new(Study::default(), None);
        let one = play(&empty, "e2", "e4", &mut ids);
        let two = play(&one, "e7", "e5", &mut ids);
        assert!(empty.study.is_empty());
        assert_eq!(sans(&one), vec!["e4"]);
        assert_eq!(sans(&two), vec!["e4", "e5"]);
    }
}
