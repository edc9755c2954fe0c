use std::path::Path;

use crate::error::SnapshotError;
use crate::model::TimelineSnapshot;

/// Save a snapshot to a JSON file.
pub fn save_snapshot(snapshot: &TimelineSnapshot, path: &Path) -> Result<(), SnapshotError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json).map_err(|source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "saved snapshot");
    Ok(())
}

/// Load a snapshot from a JSON file.
///
/// Only the envelope is checked here. Individual task and subtask records
/// are kept as-is and vetted later by the normalizers.
pub fn load_snapshot(path: &Path) -> Result<TimelineSnapshot, SnapshotError> {
    let json = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: TimelineSnapshot = serde_json::from_str(&json)?;
    tracing::info!(
        path = %path.display(),
        tasks = snapshot.tasks.len(),
        subtasks = snapshot.subtasks.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}
