//! Command-line host for chess studies stored as JSON files.

mod config;

use std::env;

use anyhow::{bail, Context};
use chess_core::comment::{CommentCodec, DocComments};
use chess_core::ids::RandomIds;
use chess_core::nag::nag_symbol;
use chess_core::rules::Candidate;
use chess_core::tree::MoveNode;
use chess_core::{compile_pgn_or_fen, study_to_pgn};
use study_engine::{FileStore, Session, StudyEvent, StudyStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

const USAGE: &str = "\
Usage: chess-study <command> [args]

Commands:
  import <file|text> [--id ID]   Compile FEN/PGN and save it as a study
  export <id>                    Print a study as PGN
  play <id> <uci>...             Play moves (e.g. e2e4) from the initial position
  undo <id>                      Remove the last main-line move
  show <id>                      Print the move tree";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_env();
    let store = FileStore::new(&config.studies_path);

    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1) else {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    };

    match command.as_str() {
        "import" => {
            let source = args.get(2).context("import needs a file or FEN/PGN text")?;
            let id = flag_value(&args, "--id");
            let text = match tokio::fs::read_to_string(source).await {
                Ok(text) => text,
                Err(_) => source.clone(),
            };
            let study = compile_pgn_or_fen(&text, &mut RandomIds)?;
            let id = store.save(&study, id.as_deref()).await?;
            println!("{}", id);
        }
        "export" => {
            let id = args.get(2).context("export needs a study id")?;
            let session = open(&store, &config, id).await?;
            println!("{}", study_to_pgn(session.study()));
        }
        "play" => {
            let id = args.get(2).context("play needs a study id")?;
            let mut session = open(&store, &config, id).await?;
            for uci in &args[3..] {
                let Some(candidate) = Candidate::from_uci(uci) else {
                    bail!("not a UCI move: {}", uci);
                };
                let before = session.state().current.clone();
                let state = session.dispatch(StudyEvent::Play(candidate));
                if state.current == before {
                    warn!("Move {} changed nothing", uci);
                }
            }
            store.save(&session.to_wire(), Some(id)).await?;
            println!("{}", session.state().display_fen());
        }
        "undo" => {
            let id = args.get(2).context("undo needs a study id")?;
            let mut session = open(&store, &config, id).await?;
            session.dispatch(StudyEvent::GotoEnd);
            session.dispatch(StudyEvent::RemoveLastMove);
            store.save(&session.to_wire(), Some(id)).await?;
            println!("{}", session.state().display_fen());
        }
        "show" => {
            let id = args.get(2).context("show needs a study id")?;
            let session = open(&store, &config, id).await?;
            print_tree(session.study().root.as_deref());
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn open(store: &FileStore, config: &CliConfig, id: &str) -> anyhow::Result<Session> {
    let wire = store
        .load(id)
        .await
        .with_context(|| format!("loading study {}", id))?;
    info!("Opening {} as a {} study", id, config.study_kind);
    Ok(Session::from_wire(
        config.study_kind,
        &wire,
        &config.initial_position,
    ))
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn describe(node: &MoveNode) -> String {
    let mut out = node.ply.san.clone();
    for nag in &node.ply.nags {
        match nag_symbol(*nag) {
            Some(symbol) => out.push_str(symbol),
            None => out.push_str(&format!(" ${}", nag)),
        }
    }
    if let Some(doc) = &node.ply.comment {
        let text = DocComments.to_text(doc);
        if !text.is_empty() {
            out.push_str(&format!(" {{{}}}", text));
        }
    }
    out
}

fn print_tree(root: Option<&MoveNode>) {
    let Some(root) = root else {
        println!("(no moves)");
        return;
    };
    for (ply, node) in root.line().enumerate() {
        println!("{:>3}  {}", ply + 1, describe(node));
        for alternative in node.alternatives() {
            let line: Vec<String> = alternative.line().map(describe).collect();
            println!("       ( {} )", line.join(" "));
        }
    }
}
