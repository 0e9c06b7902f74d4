//! Which move a freshly opened study displays.

use std::convert::Infallible;
use std::str::FromStr;
use std::sync::LazyLock;

use chess_core::tree::Study;
use regex::Regex;

static NOTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*(\.\.\.|\.)").expect("valid move notation regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InitialPosition {
    #[default]
    Begin,
    First,
    End,
    /// Move notation such as `3. Nf3` or `3... Nc6`.
    Move(String),
}

impl FromStr for InitialPosition {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "begin" => InitialPosition::Begin,
            "first" => InitialPosition::First,
            "end" => InitialPosition::End,
            other => InitialPosition::Move(other.to_string()),
        })
    }
}

impl InitialPosition {
    /// Id of the main-line move to display, `None` for the starting position.
    pub fn resolve(&self, study: &Study) -> Option<String> {
        let main: Vec<&str> = study.main_line().map(|n| n.id()).collect();
        let picked = match self {
            InitialPosition::Begin => None,
            InitialPosition::First => main.first().copied(),
            InitialPosition::End => main.last().copied(),
            InitialPosition::Move(notation) => ply_index(notation)
                .and_then(|i| main.get(i).copied())
                .or_else(|| main.last().copied()),
        };
        picked.map(str::to_string)
    }
}

/// `N.` is White's Nth move, `N...` is Black's.
fn ply_index(notation: &str) -> Option<usize> {
    let cap = NOTATION_RE.captures(notation)?;
    let number: usize = cap.get(1)?.as_str().parse().ok()?;
    let white_offset = number.checked_sub(1)? * 2;
    match cap.get(2)?.as_str() {
        "..." => Some(white_offset + 1),
        _ => Some(white_offset),
    }
}
