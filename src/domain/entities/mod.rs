//! Domain Entities
//!
//! - `CheckResult` - outcome of one validation check
//! - `ResultSet` - append-only results of one run
//! - `SuiteResult` - pass/fail/skip of one suite
//! - `ValidationReport` - persisted outcome of a run

mod check_result;
mod result_set;
mod suite_result;
mod validation_report;

pub use check_result::CheckResult;
pub use result_set::ResultSet;
pub use suite_result::{SuiteResult, SuiteStatus};
pub use validation_report::ValidationReport;
