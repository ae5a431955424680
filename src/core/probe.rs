use crate::core::error::IndexError;
use crate::core::model::{Presence, RunId};
use std::fs;
use std::io;
use std::path::Path;

/// Checks that `base_dir` is an existing, listable directory.
pub fn check_base_dir(base_dir: &Path) -> Result<(), IndexError> {
    let meta = fs::metadata(base_dir).map_err(|e| IndexError::unavailable(base_dir, e))?;
    if !meta.is_dir() {
        return Err(IndexError::unavailable(
            base_dir,
            io::Error::new(io::ErrorKind::NotADirectory, "base dir is not a directory"),
        ));
    }
    fs::read_dir(base_dir).map_err(|e| IndexError::unavailable(base_dir, e))?;
    Ok(())
}

pub fn exists(path: &Path) -> Result<bool, IndexError> {
    path.try_exists().map_err(|e| IndexError::unavailable(path, e))
}

pub fn probe(base_dir: &Path, run_id: &RunId) -> Result<Presence, IndexError> {
    check_base_dir(base_dir)?;

    let report = base_dir.join(run_id.report_dir());
    let hiseq = exists(&report)?;
    let hiseq_detailed = hiseq && exists(&report.join("reports"))?;
    let demux = exists(&base_dir.join(run_id.basecall_stats_dir()))?;
    let qc = exists(&base_dir.join(run_id.qc_dir()))?;

    Ok(Presence {
        hiseq,
        hiseq_detailed,
        demux,
        qc,
    })
}
