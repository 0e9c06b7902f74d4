//! Notation exporter: study tree to canonical PGN text.

use crate::codec::wire_to_tree;
use crate::comment::{CommentCodec, DocComments};
use crate::game_data::{Side, WireStudy, STANDARD_START_FEN};
use crate::pgn::SEVEN_TAG_ROSTER;
use crate::rules::turn_and_fullmove;
use crate::tree::{MoveNode, Study};

pub fn study_to_pgn(study: &Study) -> String {
    export_with(study, &DocComments)
}

pub fn wire_to_pgn(wire: &WireStudy) -> String {
    study_to_pgn(&wire_to_tree(wire))
}

pub fn export_with(study: &Study, comments: &dyn CommentCodec) -> String {
    let mut out = String::new();

    for (name, default) in SEVEN_TAG_ROSTER {
        let value = study.headers.get(name).map_or(default, String::as_str);
        write_tag(&mut out, name, value);
    }
    if study.root_fen != STANDARD_START_FEN {
        write_tag(&mut out, "SetUp", "1");
        write_tag(&mut out, "FEN", &study.root_fen);
    }
    for (name, value) in &study.headers {
        let reserved = SEVEN_TAG_ROSTER.iter().any(|(n, _)| n == name)
            || name == "SetUp"
            || name == "FEN";
        if !reserved {
            write_tag(&mut out, name, value);
        }
    }
    out.push('\n');

    if let Some(text) = study
        .comment
        .as_ref()
        .map(|doc| comments.to_text(doc))
        .filter(|t| !t.is_empty())
    {
        out.push_str(&format!("{{ {} }}\n", sanitize(&text)));
    }

    let mut movetext = MoveText::new(&study.root_fen, comments);
    if let Some(root) = study.root.as_deref() {
        movetext.write_line(root, 0, 0);
    }

    let result = study
        .headers
        .get("Result")
        .map_or("*", String::as_str);
    if movetext.tokens.is_empty() {
        out.push_str(result);
    } else {
        out.push_str(&movetext.tokens.join(" "));
        out.push(' ');
        out.push_str(result);
    }
    out
}

fn write_tag(out: &mut String, name: &str, value: &str) {
    let value = value.replace('\\', "\\\\").replace('"', "\\\"");
    out.push_str(&format!("[{} \"{}\"]\n", name, value));
}

/// Comment text cannot contain the closing brace.
fn sanitize(text: &str) -> String {
    text.replace('}', ")")
}

struct MoveText<'a> {
    tokens: Vec<String>,
    first_fullmove: u32,
    black_first: bool,
    comments: &'a dyn CommentCodec,
    /// A black move must carry its number (start of output or after a break).
    needs_number: bool,
    /// Prefix for the next move token, used to open a variation.
    open: bool,
}

impl<'a> MoveText<'a> {
    fn new(root_fen: &str, comments: &'a dyn CommentCodec) -> Self {
        let (side, fullmove) = turn_and_fullmove(root_fen);
        Self {
            tokens: Vec::new(),
            first_fullmove: fullmove,
            black_first: side == Side::Black,
            comments,
            needs_number: true,
            open: false,
        }
    }

    /// Writes the line starting at `head`, which is `ply` half-moves after
    /// the root position.
    fn write_line(&mut self, head: &MoveNode, ply: usize, depth: usize) {
        for (offset, node) in head.line().enumerate() {
            let ply = ply + offset;
            self.write_move(node, ply);

            // only main-line moves carry variations in the output
            if depth == 0 {
                for alternative in node.alternatives() {
                    self.open = true;
                    self.needs_number = true;
                    self.write_line(alternative, ply, depth + 1);
                    if let Some(last) = self.tokens.last_mut() {
                        last.push(')');
                    }
                    self.needs_number = true;
                }
            }
        }
    }

    fn write_move(&mut self, node: &MoveNode, ply: usize) {
        let half = ply as u32 + u32::from(self.black_first);
        let number = self.first_fullmove + half / 2;

        let mut token = String::new();
        if self.open {
            token.push('(');
            self.open = false;
        }
        match node.ply.color {
            Side::White => token.push_str(&format!("{}. ", number)),
            Side::Black if self.needs_number => token.push_str(&format!("{}... ", number)),
            Side::Black => {}
        }
        token.push_str(&node.ply.san);
        for nag in &node.ply.nags {
            token.push_str(&format!(" ${}", nag));
        }
        self.tokens.push(token);
        self.needs_number = false;

        if let Some(text) = node
            .ply
            .comment
            .as_ref()
            .map(|doc| self.comments.to_text(doc))
            .filter(|t| !t.is_empty())
        {
            self.tokens.push(format!("{{ {} }}", sanitize(&text)));
            self.needs_number = true;
        }

        let mut commands = Vec::new();
        if let Some(clock) = &node.ply.clock {
            commands.push(format!("[%clk {}]", clock));
        }
        if let Some(eval) = node.ply.evaluation {
            commands.push(format!("[%eval {}]", eval));
        }
        if !commands.is_empty() {
            self.tokens.push(format!("{{ {} }}", commands.join(" ")));
            self.needs_number = true;
        }
    }
}
