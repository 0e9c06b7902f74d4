//! Persistence of wire studies as JSON files.

use std::future::Future;
use std::path::{Path, PathBuf};

use chess_core::game_data::{WireStudy, STANDARD_START_FEN};
use chess_core::ids::{IdGenerator, RandomIds};
use serde_json::Value as JsonValue;
use tracing::info;

use crate::error::StoreError;

/// Fields once written by the rules library that are never persisted.
const STALE_MOVE_FIELDS: [&str; 5] = ["before", "captured", "flags", "lan", "piece"];

pub trait StudyStore {
    /// Saves under `id`, or under a new id when none is given. Returns the id.
    fn save(
        &self,
        study: &WireStudy,
        id: Option<&str>,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    fn load(&self, id: &str) -> impl Future<Output = Result<WireStudy, StoreError>> + Send;
}

/// One pretty-printed `<id>.json` per study.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl StudyStore for FileStore {
    async fn save(&self, study: &WireStudy, id: Option<&str>) -> Result<String, StoreError> {
        let id = match id {
            Some(id) => id.to_string(),
            None => RandomIds.next_id(),
        };
        tokio::fs::create_dir_all(&self.dir).await?;

        let json = serde_json::to_string_pretty(study)?;
        let path = self.path_for(&id);
        tokio::fs::write(&path, json).await?;

        info!("Saved study {} to {}", id, path.display());
        Ok(id)
    }

    async fn load(&self, id: &str) -> Result<WireStudy, StoreError> {
        let path = self.path_for(id);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut payload: JsonValue = serde_json::from_str(&raw)?;
        upgrade_payload(&mut payload);
        let study: WireStudy = serde_json::from_value(payload)?;

        info!("Loaded study {} ({} main-line moves)", id, study.moves.len());
        Ok(study)
    }
}

/// Brings a payload written by an older version up to the current schema.
pub fn upgrade_payload(payload: &mut JsonValue) {
    let Some(study) = payload.as_object_mut() else {
        return;
    };

    let has_root = study
        .get("rootFEN")
        .and_then(JsonValue::as_str)
        .is_some_and(|fen| !fen.trim().is_empty());
    if !has_root {
        study.insert("rootFEN".into(), STANDARD_START_FEN.into());
    }
    if let Some(moves) = study.get_mut("moves").and_then(JsonValue::as_array_mut) {
        moves.iter_mut().for_each(upgrade_move);
    }
}

fn upgrade_move(mv: &mut JsonValue) {
    let Some(fields) = mv.as_object_mut() else {
        return;
    };

    if !fields.get("nags").is_some_and(JsonValue::is_array) {
        fields.insert("nags".into(), JsonValue::Array(Vec::new()));
    }
    for stale in STALE_MOVE_FIELDS {
        fields.remove(stale);
    }

    let Some(variants) = fields.get_mut("variants").and_then(JsonValue::as_array_mut) else {
        return;
    };
    for variation in variants {
        if let Some(moves) = variation.get_mut("moves").and_then(JsonValue::as_array_mut) {
            moves.iter_mut().for_each(upgrade_move);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upgrade_fills_defaults_and_strips_fields() {
        let mut payload = json!({
            "version": "0.0.1",
            "headers": {},
            "comment": null,
            "moves": [{
                "moveId": "a", "color": "w", "san": "e4", "from": "e2", "to": "e4",
                "after": "x", "comment": null, "shapes": [], "nags": "bad",
                "piece": "p", "flags": "b", "lan": "e2e4", "before": "y",
                "variants": [{
                    "variantId": "b", "parentMoveId": "a",
                    "moves": [{
                        "moveId": "b", "color": "w", "san": "d4", "from": "d2", "to": "d4",
                        "after": "z", "comment": null, "shapes": [], "captured": "p",
                        "variants": []
                    }]
                }]
            }]
        });

        upgrade_payload(&mut payload);

        assert_eq!(payload["rootFEN"], STANDARD_START_FEN);
        let e4 = &payload["moves"][0];
        assert_eq!(e4["nags"], json!([]));
        for stale in STALE_MOVE_FIELDS {
            assert!(e4.get(stale).is_none());
        }
        let d4 = &e4["variants"][0]["moves"][0];
        assert_eq!(d4["nags"], json!([]));
        assert!(d4.get("captured").is_none());

        let study: WireStudy = serde_json::from_value(payload).unwrap();
        assert_eq!(study.moves[0].variants[0].moves[0].ply.san, "d4");
    }

    #[test]
    fn test_upgrade_keeps_existing_root() {
        let mut payload = json!({ "rootFEN": "8/8/8/8/8/8/8/K6k w - - 0 1", "moves": [] });
        upgrade_payload(&mut payload);
        assert_eq!(payload["rootFEN"], "8/8/8/8/8/8/8/K6k w - - 0 1");
    }
}
