use std::env;
use std::path::PathBuf;

use study_engine::{InitialPosition, StudyKind};

#[derive(Clone, Debug)]
pub struct CliConfig {
    pub studies_path: PathBuf,
    pub study_kind: StudyKind,
    pub initial_position: InitialPosition,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self {
            studies_path: env::var("STUDIES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("studies")),
            study_kind: env::var("STUDY_KIND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(StudyKind::Game),
            initial_position: env::var("INITIAL_POSITION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }
}
