use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

/// Writes `contents` to a uniquely named temp file next to `path` and renames
/// it into place, so readers never observe a partial page. The temp file is
/// removed on every failure path.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = Builder::new()
        .prefix(".kira-runindex")
        .suffix(".tmp")
        .tempfile_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;

    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to flush {}", tmp.path().display()))?;

    // A failed persist hands the temp file back; dropping it deletes it.
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to move page to {}", path.display()))?;
    Ok(())
}
