//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT perform I/O itself (ports are injected)
//! - Reports progress through callbacks so any UI can render it
//!
//! ## Use Cases
//!
//! - `ValidateUseCase` - Runs the validation suites and collects results
//! - `ProvisionUseCase` - Creates workspaces, roles, data access roles and shortcuts
//!
//! ## Support
//!
//! - `CheckRecorder` - Appends results and turns API errors into failed checks
//! - `checks` - One module per suite

pub mod checks;
pub mod provision;
pub mod recorder;
pub mod validate;

pub use checks::{RunState, SuiteContext, WallIds};
pub use provision::{
    load_roles_file, ActionStatus, ProvisionAction, ProvisionOptions, ProvisionOutcome,
    ProvisionStep, ProvisionUseCase,
};
pub use recorder::{CheckRecorder, Verdict};
pub use validate::{wall_ids, RunEvent, SuiteSelection, ValidateUseCase, ValidationRun};
