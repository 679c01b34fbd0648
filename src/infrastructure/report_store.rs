//! File system report store
//!
//! Reports are written to a temp file in the target directory and then
//! moved into place, so a reader never sees a half-written document.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::domain::entities::ValidationReport;
use crate::domain::ports::ReportStore;
use crate::error::WallResult;

/// Attempts at `-1`, `-2`, ... suffixes when a same-second report exists.
const MAX_SUFFIX: u32 = 100;

pub struct FsReportStore {
    dir: PathBuf,
}

impl FsReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn candidate(&self, file_name: &str, attempt: u32) -> PathBuf {
        if attempt == 0 {
            return self.dir.join(file_name);
        }
        let stem = file_name.trim_end_matches(".json");
        self.dir.join(format!("{}-{}.json", stem, attempt))
    }
}

impl ReportStore for FsReportStore {
    fn save(&self, report: &ValidationReport) -> WallResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(report)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;

        let file_name = report.file_name();
        let mut attempt = 0;
        loop {
            let target = self.candidate(&file_name, attempt);
            match tmp.persist_noclobber(&target) {
                Ok(_) => {
                    info!(path = %target.display(), "report written");
                    return Ok(target);
                }
                Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists
                    && attempt < MAX_SUFFIX =>
                {
                    tmp = e.file;
                    attempt += 1;
                }
                Err(e) => return Err(e.error.into()),
            }
        }
    }

    fn load(&self, path: &Path) -> WallResult<ValidationReport> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
