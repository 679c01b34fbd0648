//! Domain Value Objects
//!
//! Immutable value types shared by checks, suites and provisioning.

mod category;
mod principal;
mod suite_id;
mod workspace_role;

pub use category::Category;
pub use principal::{Principal, PrincipalKind, UserDetails};
pub use suite_id::SuiteId;
pub use workspace_role::WorkspaceRole;
