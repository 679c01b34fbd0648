//! fabric-wall - provisioning and validation for Chinese Wall segregation
//!
//! A provider workspace owns the data; a consumer workspace may read only
//! the paths explicitly shared with it. This crate provisions that layout
//! through the Fabric REST API and validates it with five check suites
//! (Identity, Isolation, Data Access, SQL Security, Power BI), producing a
//! console summary, an optional NDJSON stream and a JSON report file.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
pub mod templates;

// Re-exports for convenience
pub use application::{SuiteSelection, ValidateUseCase, ValidationRun};
pub use config::Config;
pub use domain::entities::{CheckResult, ResultSet, SuiteResult, SuiteStatus, ValidationReport};
pub use domain::services::RunSummary;
pub use error::{ApiError, WallError, WallResult};
