//! Notation compiler: FEN or PGN text into a wire study.
//!
//! PGN tokenisation is done by `pgn-reader`; every SAN is resolved through a
//! [`RulesEvaluator`] seeded with the running position of its line.

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::LazyLock;

use pgn_reader::{Nag, Outcome, RawComment, RawTag, Reader, SanPlus, Skip, Visitor};
use regex::Regex;
use tracing::{debug, info};

use crate::comment::{CommentCodec, DocComments};
use crate::error::FormatError;
use crate::format::{detect_format, ChessDataFormat};
use crate::game_data::{
    Ply, WireMove, WireStudy, WireVariation, CURRENT_STORAGE_VERSION, STANDARD_START_FEN,
};
use crate::ids::IdGenerator;
use crate::rules::{RulesEvaluator, ShakmatyRules};

/// Tag names and defaults, in canonical order.
pub const SEVEN_TAG_ROSTER: [(&str, &str); 7] = [
    ("Event", "?"),
    ("Site", "?"),
    ("Date", "????.??.??"),
    ("Round", "?"),
    ("White", "?"),
    ("Black", "?"),
    ("Result", "*"),
];

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}|\?{4})\.(\d{2}|\?{2})\.(\d{2}|\?{2})$").expect("valid date regex")
});
static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[%(\w+)\s+([^\]]*)\]").expect("valid command regex"));

/// Compiles FEN or PGN text with the default rules and comment collaborators.
pub fn compile_pgn_or_fen(
    input: &str,
    ids: &mut dyn IdGenerator,
) -> Result<WireStudy, FormatError> {
    compile_with(input, &ShakmatyRules, &DocComments, ids)
}

pub fn compile_with(
    input: &str,
    rules: &dyn RulesEvaluator,
    comments: &dyn CommentCodec,
    ids: &mut dyn IdGenerator,
) -> Result<WireStudy, FormatError> {
    match detect_format(input) {
        Some(ChessDataFormat::Fen) => {
            let fen = input.trim();
            rules
                .validate_fen(fen)
                .map_err(|e| FormatError::InvalidFen(e.to_string()))?;
            debug!("Compiled FEN study from {}", fen);
            Ok(WireStudy::empty(fen))
        }
        Some(ChessDataFormat::Pgn) => {
            let mut compiler = StudyCompiler {
                rules,
                comments,
                ids,
            };
            let mut reader = Reader::new(input.as_bytes());
            let study = reader
                .read_game(&mut compiler)?
                .ok_or(FormatError::EmptyGame)??;
            info!(
                "Compiled PGN study with {} main-line moves",
                study.moves.len()
            );
            Ok(study)
        }
        None => Err(FormatError::NotChessData),
    }
}

/// Canonical form of a tag value. Unknown tags are only trimmed.
pub fn normalize_header(name: &str, value: &str) -> String {
    let value = value.trim();
    match name {
        "Date" => {
            let date = value.replace(['-', '/'], ".");
            if DATE_RE.is_match(&date) {
                date
            } else {
                "????.??.??".to_string()
            }
        }
        "Result" if !RESULTS.contains(&value) => "*".to_string(),
        _ if value.is_empty() => "?".to_string(),
        _ => value.to_string(),
    }
}

/// Comment text split into clock, evaluation and the remaining prose.
#[derive(Debug, Default, PartialEq)]
struct CommentParts {
    clock: Option<String>,
    evaluation: Option<f64>,
    text: String,
}

fn split_commands(raw: &str) -> CommentParts {
    let mut parts = CommentParts::default();
    let mut text = String::new();
    let mut last = 0;

    for cap in COMMAND_RE.captures_iter(raw) {
        let (Some(whole), Some(name), Some(arg)) = (cap.get(0), cap.get(1), cap.get(2)) else {
            continue;
        };
        let arg = arg.as_str().trim();
        let consumed = match name.as_str() {
            "clk" => {
                parts.clock = Some(arg.to_string());
                true
            }
            "eval" => match arg.parse::<f64>() {
                Ok(eval) => {
                    parts.evaluation = Some(eval);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        };
        if consumed {
            text.push_str(&raw[last..whole.start()]);
            last = whole.end();
        }
    }
    text.push_str(&raw[last..]);
    parts.text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    parts
}

struct StudyCompiler<'a> {
    rules: &'a dyn RulesEvaluator,
    comments: &'a dyn CommentCodec,
    ids: &'a mut dyn IdGenerator,
}

#[derive(Default)]
struct GameTags {
    headers: BTreeMap<String, String>,
    fen: Option<String>,
}

/// A line being read: the main line or one open variation.
struct Line {
    start: String,
    /// Plies between the root position and `start`.
    start_ply: usize,
    moves: Vec<WireMove>,
    /// Closed alternatives to this line's first move, in source order.
    siblings: Vec<Vec<WireMove>>,
    /// Comment text seen before the line's first move.
    pending: Vec<String>,
}

impl Line {
    fn new(start: &str, start_ply: usize) -> Self {
        Self {
            start: start.to_string(),
            start_ply,
            moves: Vec::new(),
            siblings: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn position(&self) -> &str {
        self.moves.last().map_or(&self.start, |m| &m.ply.after)
    }

    /// Where an alternative to the last move starts from.
    fn position_before_last(&self) -> &str {
        match self.moves.len() {
            0 | 1 => &self.start,
            n => &self.moves[n - 2].ply.after,
        }
    }

    /// Ply number, counted from the root position, of the next move.
    fn next_ply(&self) -> usize {
        self.start_ply + self.moves.len() + 1
    }
}

struct GameState {
    headers: BTreeMap<String, String>,
    root_fen: String,
    game_comment: Vec<String>,
    lines: Vec<Line>,
}

impl GameState {
    fn line(&mut self) -> &mut Line {
        // the main line is pushed in begin_movetext and never popped
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }
}

impl StudyCompiler<'_> {
    fn attach_comment(&self, ply: &mut Ply, parts: CommentParts) {
        if parts.clock.is_some() {
            ply.clock = parts.clock;
        }
        if parts.evaluation.is_some() {
            ply.evaluation = parts.evaluation;
        }
        if parts.text.is_empty() {
            return;
        }
        let text = match ply.comment.as_ref().map(|doc| self.comments.to_text(doc)) {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, parts.text),
            _ => parts.text,
        };
        ply.comment = self.comments.from_text(&text);
    }
}

impl Visitor for StudyCompiler<'_> {
    type Tags = GameTags;
    type Movetext = GameState;
    type Output = Result<WireStudy, FormatError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, GameTags> {
        ControlFlow::Continue(GameTags::default())
    }

    fn tag(
        &mut self,
        tags: &mut GameTags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let name = String::from_utf8_lossy(name).to_string();
        let value = value.decode_utf8_lossy().to_string();
        match name.as_str() {
            "FEN" => tags.fen = Some(value.trim().to_string()),
            "SetUp" => {}
            _ => {
                let normalized = normalize_header(&name, &value);
                tags.headers.insert(name, normalized);
            }
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: GameTags) -> ControlFlow<Self::Output, GameState> {
        let root_fen = tags.fen.unwrap_or_else(|| STANDARD_START_FEN.to_string());
        if let Err(e) = self.rules.validate_fen(&root_fen) {
            return ControlFlow::Break(Err(FormatError::InvalidFen(e.to_string())));
        }

        let mut headers = tags.headers;
        for (name, default) in SEVEN_TAG_ROSTER {
            headers
                .entry(name.to_string())
                .or_insert_with(|| default.to_string());
        }

        ControlFlow::Continue(GameState {
            headers,
            lines: vec![Line::new(&root_fen, 0)],
            root_fen,
            game_comment: Vec::new(),
        })
    }

    fn san(&mut self, state: &mut GameState, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        let san = san_plus.san.to_string();

        let line = state.line();
        let ply_number = line.next_ply();
        let played = match self.rules.play_san(line.position(), &san) {
            Ok(played) => played,
            Err(e) => {
                return ControlFlow::Break(Err(FormatError::IllegalMove {
                    ply: ply_number,
                    san,
                    reason: e.to_string(),
                }));
            }
        };

        let mut ply = Ply::from_played(self.ids.next_id(), &played);
        let pending: Vec<String> = line.pending.drain(..).collect();
        if !pending.is_empty() {
            ply.comment = self.comments.from_text(&pending.join(" "));
        }
        state.line().moves.push(WireMove::new(ply));
        ControlFlow::Continue(())
    }

    fn nag(&mut self, state: &mut GameState, nag: Nag) -> ControlFlow<Self::Output> {
        if let Some(last) = state.line().moves.last_mut() {
            let nags = &mut last.ply.nags;
            if !nags.contains(&nag.0) {
                nags.push(nag.0);
                nags.sort_unstable();
            }
        }
        ControlFlow::Continue(())
    }

    fn comment(
        &mut self,
        state: &mut GameState,
        comment: RawComment<'_>,
    ) -> ControlFlow<Self::Output> {
        let raw = String::from_utf8_lossy(comment.as_bytes()).to_string();
        let parts = split_commands(&raw);
        let depth = state.lines.len();

        if let Some(last) = state.line().moves.last_mut() {
            self.attach_comment(&mut last.ply, parts);
        } else if parts.text.is_empty() {
            // bare commands before any move have nothing to attach to
        } else if depth == 1 {
            state.game_comment.push(parts.text);
        } else {
            state.line().pending.push(parts.text);
        }
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, state: &mut GameState) -> ControlFlow<Self::Output, Skip> {
        let line = state.line();
        let start = line.position_before_last().to_string();
        let start_ply = line.start_ply + line.moves.len().saturating_sub(1);
        state.lines.push(Line::new(&start, start_ply));
        ControlFlow::Continue(Skip(false))
    }

    fn end_variation(&mut self, state: &mut GameState) -> ControlFlow<Self::Output> {
        if state.lines.len() < 2 {
            return ControlFlow::Continue(());
        }
        let Some(variation) = state.lines.pop() else {
            return ControlFlow::Continue(());
        };
        if variation.moves.is_empty() {
            return ControlFlow::Continue(());
        }
        let mut closed = vec![variation.moves];
        closed.extend(variation.siblings);

        // an alternative to a variation's only move is a sibling of that
        // variation and waits for it to close
        if state.lines.len() >= 2 && state.line().moves.len() == 1 {
            state.line().siblings.extend(closed);
            return ControlFlow::Continue(());
        }

        // a variation replaces the last move of the enclosing line
        if let Some(owner) = state.line().moves.last_mut() {
            let owner_id = owner.ply.id.clone();
            owner.variants.extend(
                closed
                    .into_iter()
                    .map(|moves| WireVariation::owned_by(&owner_id, moves)),
            );
        }
        ControlFlow::Continue(())
    }

    /// The termination token fills in a missing or unknown `Result` tag.
    fn outcome(&mut self, state: &mut GameState, outcome: Outcome) -> ControlFlow<Self::Output> {
        let recorded = state
            .headers
            .entry("Result".to_string())
            .or_insert_with(|| "*".to_string());
        if *recorded == "*" {
            *recorded = outcome.as_str().to_string();
        }
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, state: GameState) -> Self::Output {
        let comment = if state.game_comment.is_empty() {
            None
        } else {
            self.comments.from_text(&state.game_comment.join(" "))
        };
        let moves = state
            .lines
            .into_iter()
            .next()
            .map(|main| main.moves)
            .unwrap_or_default();

        Ok(WireStudy {
            version: CURRENT_STORAGE_VERSION.to_string(),
            headers: state.headers,
            comment,
            moves,
            root_fen: state.root_fen,
        })
    }
}
