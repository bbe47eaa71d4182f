/// Progress file: the engine snapshot plus what is needed to rebuild the
/// same pool on resume.
use serde::{Deserialize, Serialize};
use std::path::Path;

use valuerank_core::{Item, ProgressSnapshot, Strategy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    pub strategy: Strategy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_values: Vec<Item>,
    pub progress: ProgressSnapshot,
}

impl SavedSession {
    pub fn is_complete(&self) -> bool {
        self.progress.phase == valuerank_core::SessionPhase::Complete
    }
}

/// `Ok(None)` when there is nothing to resume.
pub fn load(path: &Path) -> Result<Option<SavedSession>, String> {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| format!("Failed to parse progress file {}: {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(format!("Failed to read progress file {}: {e}", path.display())),
    }
}

/// Write through a temp file so an interrupted save never truncates progress.
pub fn save(path: &Path, session: &SavedSession) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {e}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(session)
        .map_err(|e| format!("Failed to serialize progress: {e}"))?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| format!("Failed to write {}: {e}", tmp.display()))?;
    std::fs::rename(&tmp, path).map_err(|e| format!("Failed to replace {}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), completed = session.progress.completed_sets, "progress saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use valuerank_core::{ComparisonKey, ScoreEntry, SessionPhase};

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("valuerank-test-{}-{name}", std::process::id()))
    }

    fn session() -> SavedSession {
        SavedSession {
            strategy: Strategy::Pairwise,
            custom_values: vec![Item::custom(94, "CRAFT", "to make things well")],
            progress: ProgressSnapshot {
                phase: SessionPhase::Active,
                completed_sets: 3,
                total_sets: 45,
                scores: vec![ScoreEntry { id: 1, score: 1.0 }, ScoreEntry { id: 94, score: -1.0 }],
                compared_pairs: vec![ComparisonKey::new(1, 94)],
            },
        }
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch("roundtrip").join("progress.json");
        save(&path, &session()).unwrap();
        assert_eq!(load(&path).unwrap(), Some(session()));
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        assert_eq!(load(&scratch("missing.json")).unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_reports_path() {
        let path = scratch("corrupt.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.contains("corrupt.json"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_layout() {
        let json = serde_json::to_value(session()).unwrap();
        assert_eq!(json["strategy"], "pairwise");
        assert_eq!(json["customValues"][0]["name"], "CRAFT");
        assert_eq!(json["progress"]["phase"], "active");
        assert_eq!(json["progress"]["completedSets"], 3);
        assert_eq!(json["progress"]["comparedPairs"][0][1], 94);
    }
}
