use std::fmt;
use std::str::FromStr;

use crate::engine::StudyEngine;
use crate::game::GameEngine;
use crate::position::PositionEngine;
use crate::puzzle::PuzzleEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudyKind {
    Game,
    Puzzle,
    Position,
    /// Studies saved before kinds existed. Behaves like a game.
    Legacy,
}

impl StudyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyKind::Game => "game",
            StudyKind::Puzzle => "puzzle",
            StudyKind::Position => "position",
            StudyKind::Legacy => "legacy",
        }
    }
}

impl fmt::Display for StudyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyKind {
    type Err = std::convert::Infallible;

    /// Unknown kinds open as a static position.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "game" => StudyKind::Game,
            "puzzle" => StudyKind::Puzzle,
            "legacy" => StudyKind::Legacy,
            _ => StudyKind::Position,
        })
    }
}

/// Selects the engine once per session.
pub fn engine_for(kind: StudyKind) -> Box<dyn StudyEngine> {
    match kind {
        StudyKind::Game | StudyKind::Legacy => Box::new(GameEngine::new(kind)),
        StudyKind::Puzzle => Box::new(PuzzleEngine),
        StudyKind::Position => Box::new(PositionEngine),
    }
}
