//! Export and import of the whole document as a user-visible file.

use std::path::Path;

use chrono::NaiveDate;

use super::StoreError;
use super::local::write_replacing;
use crate::core::normalize::normalize;
use crate::core::state::AppState;

/// Write the state as pretty-printed JSON.
pub fn export(state: &AppState, path: &Path) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(state)?;
    write_replacing(path, json.as_bytes())?;
    log::info!("Exported {} tasks to {}", state.tasks.len(), path.display());
    Ok(())
}

/// Read an exported (or legacy) file and normalize it into a replacement state.
pub fn import(path: &Path, today: NaiveDate) -> Result<AppState, StoreError> {
    let fail = |reason: String| StoreError::Import {
        path: path.to_path_buf(),
        reason,
    };
    let content = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| fail(e.to_string()))?;
    if !value.is_object() {
        return Err(fail("expected a JSON object".to_string()));
    }
    let state = normalize(Some(value), today);
    log::info!("Imported {} tasks from {}", state.tasks.len(), path.display());
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::Board;
    use crate::core::task::{Column, TaskDraft};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    #[test]
    fn export_is_pretty_and_importable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let mut board = Board::default();
        board.save_task(TaskDraft::new("Raise the banners").column(Column::Done), None, today()).unwrap();

        export(board.state(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"tasks\""));

        assert_eq!(&import(&path, today()).unwrap(), board.state());
    }

    #[test]
    fn import_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");

        std::fs::write(&path, "not json at all").unwrap();
        assert!(matches!(import(&path, today()), Err(StoreError::Import { .. })));

        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(import(&path, today()), Err(StoreError::Import { .. })));

        let missing = dir.path().join("missing.json");
        assert!(matches!(import(&missing, today()), Err(StoreError::Import { .. })));
    }

    #[test]
    fn import_normalizes_legacy_exports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        std::fs::write(&path, r#"{"tasks":[{"id":3,"title":"Joust","date":"2025-06-01","column":"today"}]}"#).unwrap();

        let state = import(&path, today()).unwrap();
        assert_eq!(state.counter, 4);
        assert_eq!(state.tasks[0].column, Column::Archive);
        assert_eq!(state.realms.len(), 3);
    }
}
