//! Integration tests: PGN/FEN import, wire codec and PGN export together.

mod common;

use chess_core::codec::{tree_to_wire, wire_to_tree};
use chess_core::comment::{CommentCodec, DocComments};
use chess_core::game_data::{Side, STANDARD_START_FEN};
use chess_core::{study_to_pgn, wire_to_pgn, FormatError};
use common::{compile, study, AFTER_E4};

const ROSTER: &str = "[Event \"?\"]\n[Site \"?\"]\n[Date \"????.??.??\"]\n[Round \"?\"]\n\
                      [White \"?\"]\n[Black \"?\"]\n[Result \"*\"]\n";

#[test]
fn test_minimal_game_import_and_export() {
    let wire = compile("1. e4");
    assert_eq!(wire.moves.len(), 1);

    let e4 = &wire.moves[0].ply;
    assert_eq!(e4.color, Side::White);
    assert_eq!(e4.san, "e4");
    assert_eq!(e4.from, "e2");
    assert_eq!(e4.to, "e4");
    assert_eq!(e4.after, AFTER_E4);
    assert_eq!(wire.headers["Date"], "????.??.??");
    assert_eq!(wire.headers["Result"], "*");

    assert_eq!(wire_to_pgn(&wire), format!("{}\n1. e4 *", ROSTER));
}

#[test]
fn test_fen_import_and_export() {
    let fen = "8/R3P3/2Rk1K2/N7/2P5/8/8/8 b - - 3 2";
    let wire = compile(fen);
    assert!(wire.moves.is_empty());
    assert_eq!(wire.root_fen, fen);
    assert!(wire.headers.is_empty());
    assert!(wire.comment.is_none());

    assert_eq!(
        wire_to_pgn(&wire),
        format!(
            "{}[SetUp \"1\"]\n[FEN \"8/R3P3/2Rk1K2/N7/2P5/8/8/8 b - - 3 2\"]\n\n*",
            ROSTER
        )
    );
}

#[test]
fn test_codec_round_trip_on_compiled_study() {
    let wire = compile(
        "[Event \"Casebook\"]\n{ Intro } 1. e4 $1 { Main } (1. d4 d5 2. c4) (1. c4) \
         1... c5 $6 (1... e5 2. Nf3) 2. Nf3 { [%clk 0:09:58] } *",
    );
    assert_eq!(tree_to_wire(&wire_to_tree(&wire)), wire);

    let tree = wire_to_tree(&wire);
    assert_eq!(wire_to_tree(&tree_to_wire(&tree)), tree);
}

#[test]
fn test_nested_alternative_to_variation_head_round_trips() {
    let wire = compile("1. e4 (1. d4 (1. c4)) 1... e5 *");
    let e4 = &wire.moves[0];
    assert_eq!(e4.variants.len(), 2);
    assert_eq!(e4.variants[1].moves[0].ply.san, "c4");
    assert_eq!(tree_to_wire(&wire_to_tree(&wire)), wire);

    let tree = wire_to_tree(&wire);
    assert_eq!(tree.move_count(), 4);
    assert!(study_to_pgn(&tree).ends_with("1. e4 (1. d4) (1. c4) 1... e5 *"));
}

#[test]
fn test_export_reimport_is_idempotent() {
    let sources = [
        "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *",
        "[White \"Kasparov\"]\n[Black \"Topalov\"]\n[Result \"1-0\"]\n\n\
         1. e4 d6 2. d4 Nf6 3. Nc3 g6 $6 { Pirc } 4. Be3 (4. f4 Bg7) 4... Bg7 $14 1-0",
        "{ A study } 1. d4 (1. e4 e5 2. Nf3) (1. c4 { English }) 1... d5 \
         { [%clk 0:10:00] [%eval -0.2] } 2. c4 $5 *",
    ];
    for source in sources {
        let once = wire_to_pgn(&compile(source));
        let twice = wire_to_pgn(&compile(&once));
        assert_eq!(twice, once, "source: {}", source);
    }
}

#[test]
fn test_comments_survive_export() {
    let tree = study("{ Game notes } 1. e4 { Best by test } *");
    assert_eq!(
        DocComments.to_text(tree.comment.as_ref().unwrap()),
        "Game notes"
    );
    let pgn = study_to_pgn(&tree);
    assert!(pgn.ends_with("\n\n{ Game notes }\n1. e4 { Best by test } *"));
}

#[test]
fn test_variation_ids_are_canonical() {
    let wire = compile("1. e4 e5 (1... c5 2. Nf3) 2. Nf3 *");
    let e5 = &wire.moves[1];
    let variation = &e5.variants[0];
    assert_eq!(variation.parent_move_id, e5.ply.id);
    assert_eq!(variation.variant_id, variation.moves[0].ply.id);
    assert!(variation.moves[0].variants.is_empty());
}

#[test]
fn test_malformed_input_is_an_error() {
    assert!(matches!(
        chess_core::compile_pgn_or_fen("hello", &mut chess_core::ids::SequentialIds::default()),
        Err(FormatError::NotChessData)
    ));
    assert!(matches!(
        chess_core::compile_pgn_or_fen(
            "1. e4 e5 2. Qxf7",
            &mut chess_core::ids::SequentialIds::default()
        ),
        Err(FormatError::IllegalMove { .. })
    ));
    assert!(chess_core::compile_pgn_or_fen(
        "[FEN \"8/8/8/8/8/8/8/8 w - - 0 1\"]\n\n*",
        &mut chess_core::ids::SequentialIds::default()
    )
    .is_err());
}

#[test]
fn test_standard_start_has_no_setup_tags() {
    let pgn = wire_to_pgn(&compile(&format!(
        "[SetUp \"1\"]\n[FEN \"{}\"]\n\n1. d4 *",
        STANDARD_START_FEN
    )));
    assert!(!pgn.contains("SetUp"));
    assert!(pgn.ends_with("\n\n1. d4 *"));
}
