use crate::types::{NormalizedRecord, Result};
use std::path::Path;
use tracing::debug;

/// Write `records` to `path` as a pretty-printed JSON array, creating the
/// parent directory if needed. Returns the number of records written.
pub async fn write_records(path: &Path, records: &[NormalizedRecord]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_vec_pretty(records)?;
    tokio::fs::write(path, &json).await?;

    debug!(path = %path.display(), records = records.len(), bytes = json.len(), "wrote output");
    Ok(records.len())
}
