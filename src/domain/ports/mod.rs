//! Domain Ports (Interfaces)
//!
//! Every external system the toolkit talks to sits behind one of these
//! traits. Infrastructure provides the REST/TDS implementations; tests use
//! in-memory fakes.

pub mod fabric_api;
pub mod powerbi_api;
pub mod report_store;
pub mod sql_endpoint;

pub use fabric_api::{
    CreateWorkspace, DataAccessRole, DecisionRule, EntraMember, FabricApi, FabricItemMember,
    OneLakeTarget, PermissionScope, RoleAssignment, RoleMembers, Shortcut,
    ShortcutTarget, Workspace,
};
pub use powerbi_api::{Dataset, DatasetUser, PowerBiApi};
pub use report_store::ReportStore;
pub use sql_endpoint::SqlEndpoint;
