#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chess_core::codec::wire_to_tree;
use chess_core::ids::SequentialIds;
use chess_core::rules::{Candidate, ShakmatyRules};
use chess_core::tree::Study;
use chess_core::{compile_pgn_or_fen, WireStudy};
use study_engine::{InitialPosition, Session, StudyEvent, StudyKind};

pub const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

pub type TestSession = Session<ShakmatyRules, SequentialIds>;

/// Compile with deterministic ids (`m1`, `m2`, ...).
pub fn compile(text: &str) -> WireStudy {
    compile_pgn_or_fen(text, &mut SequentialIds::default())
        .unwrap_or_else(|e| panic!("failed to compile {:?}: {}", text, e))
}

pub fn study(text: &str) -> Study {
    wire_to_tree(&compile(text))
}

/// A session whose new moves get ids `n1`, `n2`, ...
pub fn session(kind: StudyKind, study: Study, initial: InitialPosition) -> TestSession {
    Session::with_collaborators(
        kind,
        study,
        &initial,
        ShakmatyRules,
        SequentialIds::new("n"),
    )
}

pub fn play(session: &mut TestSession, uci: &str) {
    let candidate =
        Candidate::from_uci(uci).unwrap_or_else(|| panic!("invalid UCI move: {}", uci));
    session.dispatch(StudyEvent::Play(candidate));
}

pub fn current(session: &TestSession) -> Option<&str> {
    session.state().current.as_deref()
}

pub fn main_line(study: &Study) -> Vec<String> {
    study.main_line().map(|n| n.ply.san.clone()).collect()
}

/// A fresh directory under the system temp dir.
pub fn temp_dir(label: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("chess-study-{}-{}", label, ts))
}
