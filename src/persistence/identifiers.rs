//! Identifier hand-off files (`series_id.txt`, `set_id.txt`).

use std::fs;
use std::path::Path;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Overwrite `path` with `id`.
pub fn write_identifier(path: &Path, id: &str) -> BlockchainResult<()> {
    fs::write(path, id)?;
    tracing::info!(path = ?path, id = %id, "Identifier saved");
    Ok(())
}

/// Read an id written by an earlier script. A missing or empty file is a
/// configuration error: the upstream script has not run yet.
pub fn read_identifier(path: &Path) -> BlockchainResult<String> {
    let content = fs::read_to_string(path).map_err(|e| {
        BlockchainError::Config(format!(
            "Failed to read {}: {}. Run the script that creates it first.",
            path.display(),
            e
        ))
    })?;

    let id = content.trim();
    if id.is_empty() {
        return Err(BlockchainError::Config(format!(
            "{} is empty. Run the script that creates it first.",
            path.display()
        )));
    }
    Ok(id.to_string())
}
