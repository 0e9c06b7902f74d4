//! Navigation and mutation of a study while it is being played through.
//!
//! A [`session::Session`] owns the current [`state::StudyState`] and feeds
//! every [`session::StudyEvent`] to the engine selected by the study kind.
//! Engines never mutate in place: each event yields a new state that shares
//! every untouched node with the previous one.

pub mod engine;
pub mod error;
pub mod game;
pub mod initial;
pub mod kind;
pub mod locator;
pub mod position;
pub mod puzzle;
pub mod session;
pub mod state;
pub mod storage;

pub use engine::StudyEngine;
pub use error::StoreError;
pub use initial::InitialPosition;
pub use kind::{engine_for, StudyKind};
pub use session::{Session, StudyEvent};
pub use state::StudyState;
pub use storage::{FileStore, StudyStore};
