//! Report persistence port.

use std::path::{Path, PathBuf};

use crate::domain::entities::ValidationReport;
use crate::error::WallResult;

pub trait ReportStore {
    /// Persist the report and return where it landed.
    fn save(&self, report: &ValidationReport) -> WallResult<PathBuf>;

    fn load(&self, path: &Path) -> WallResult<ValidationReport>;
}
