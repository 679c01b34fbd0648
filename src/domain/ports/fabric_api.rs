//! Fabric REST port - workspaces, roles, OneLake security and shortcuts.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Principal, WorkspaceRole};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_id: Option<String>,
}

/// Request body for workspace creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspace {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    #[serde(default)]
    pub id: String,
    pub principal: Principal,
    pub role: WorkspaceRole,
}

/// OneLake data access role (folder/table-scoped read grant)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAccessRole {
    pub name: String,
    #[serde(default)]
    pub decision_rules: Vec<DecisionRule>,
    #[serde(default)]
    pub members: RoleMembers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRule {
    #[serde(default = "default_effect")]
    pub effect: String,
    #[serde(default)]
    pub permission: Vec<PermissionScope>,
}

fn default_effect() -> String {
    "Permit".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionScope {
    pub attribute_name: String,
    #[serde(default)]
    pub attribute_value_included_in: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMembers {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub microsoft_entra_members: Vec<EntraMember>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fabric_item_members: Vec<FabricItemMember>,
}

impl RoleMembers {
    pub fn is_empty(&self) -> bool {
        self.microsoft_entra_members.is_empty() && self.fabric_item_members.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntraMember {
    pub tenant_id: String,
    pub object_id: String,
}

/// Members derived from item permissions (e.g. "everyone with ReadAll on this lakehouse")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricItemMember {
    #[serde(default)]
    pub item_access: Vec<String>,
    pub source_path: String,
}

impl DataAccessRole {
    /// Paths this role permits, from its `Path` attribute scopes
    pub fn paths(&self) -> Vec<&str> {
        self.decision_rules
            .iter()
            .filter(|r| r.effect.eq_ignore_ascii_case("permit"))
            .flat_map(|r| r.permission.iter())
            .filter(|p| p.attribute_name.eq_ignore_ascii_case("path"))
            .flat_map(|p| p.attribute_value_included_in.iter().map(String::as_str))
            .collect()
    }

    /// True when the role permits every path in the item
    pub fn grants_everything(&self) -> bool {
        self.paths().iter().any(|p| *p == "*")
    }

    pub fn is_default_reader(&self) -> bool {
        self.name.eq_ignore_ascii_case("DefaultReader")
    }
}

/// OneLake shortcut definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub name: String,
    /// Folder inside the item the shortcut lives in, e.g. "Tables"
    pub path: String,
    pub target: ShortcutTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_lake: Option<OneLakeTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneLakeTarget {
    pub workspace_id: String,
    pub item_id: String,
    pub path: String,
}

impl Shortcut {
    /// OneLake target when it points into `workspace_id`
    pub fn targets_workspace(&self, workspace_id: &str) -> Option<&OneLakeTarget> {
        self.target
            .one_lake
            .as_ref()
            .filter(|t| t.workspace_id.eq_ignore_ascii_case(workspace_id))
    }

    /// `path/name` as shown in the lakehouse explorer
    pub fn location(&self) -> String {
        format!("{}/{}", self.path.trim_end_matches('/'), self.name)
    }
}

/// Port for the Fabric control-plane and OneLake security APIs.
///
/// Every method is a single request (list methods follow pagination).
pub trait FabricApi {
    /// Cheap authenticated call used to prove the API is reachable.
    fn ping(&self) -> Result<(), ApiError>;

    fn list_workspaces(&self) -> Result<Vec<Workspace>, ApiError>;

    fn get_workspace(&self, workspace_id: &str) -> Result<Workspace, ApiError>;

    fn create_workspace(&self, request: &CreateWorkspace) -> Result<Workspace, ApiError>;

    fn list_role_assignments(&self, workspace_id: &str) -> Result<Vec<RoleAssignment>, ApiError>;

    fn add_role_assignment(
        &self,
        workspace_id: &str,
        principal: &Principal,
        role: WorkspaceRole,
    ) -> Result<(), ApiError>;

    fn list_data_access_roles(
        &self,
        workspace_id: &str,
        item_id: &str,
    ) -> Result<Vec<DataAccessRole>, ApiError>;

    /// Replaces the item's full set of data access roles.
    fn put_data_access_roles(
        &self,
        workspace_id: &str,
        item_id: &str,
        roles: &[DataAccessRole],
    ) -> Result<(), ApiError>;

    fn list_shortcuts(&self, workspace_id: &str, item_id: &str)
        -> Result<Vec<Shortcut>, ApiError>;

    fn create_shortcut(
        &self,
        workspace_id: &str,
        item_id: &str,
        shortcut: &Shortcut,
    ) -> Result<(), ApiError>;
}
