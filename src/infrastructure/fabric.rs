//! Fabric REST adapter

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use tracing::info;

use crate::domain::ports::{
    CreateWorkspace, DataAccessRole, FabricApi, RoleAssignment, Shortcut, Workspace,
};
use crate::domain::value_objects::{Principal, WorkspaceRole};
use crate::error::ApiError;
use crate::infrastructure::http::{join_url, HttpClient};

pub struct RestFabricApi<'c> {
    http: &'c HttpClient,
    base_url: String,
    ping_timeout: Duration,
}

#[derive(Serialize)]
struct AddRoleAssignment<'a> {
    principal: &'a Principal,
    role: WorkspaceRole,
}

#[derive(Serialize)]
struct DataAccessRolesBody<'a> {
    value: &'a [DataAccessRole],
}

impl<'c> RestFabricApi<'c> {
    pub fn new(http: &'c HttpClient, base_url: impl Into<String>, ping_timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            ping_timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn item_url(&self, workspace_id: &str, item_id: &str, tail: &str) -> String {
        self.url(&format!(
            "workspaces/{}/items/{}/{}",
            workspace_id, item_id, tail
        ))
    }
}

impl FabricApi for RestFabricApi<'_> {
    fn ping(&self) -> Result<(), ApiError> {
        self.http.probe(&self.url("workspaces"), self.ping_timeout)
    }

    fn list_workspaces(&self) -> Result<Vec<Workspace>, ApiError> {
        self.http.get_all(&self.url("workspaces"))
    }

    fn get_workspace(&self, workspace_id: &str) -> Result<Workspace, ApiError> {
        self.http
            .get_json(&self.url(&format!("workspaces/{}", workspace_id)))
    }

    fn create_workspace(&self, request: &CreateWorkspace) -> Result<Workspace, ApiError> {
        info!(name = %request.display_name, "creating workspace");
        self.http
            .send_json(Method::POST, &self.url("workspaces"), request)
    }

    fn list_role_assignments(&self, workspace_id: &str) -> Result<Vec<RoleAssignment>, ApiError> {
        self.http.get_all(&self.url(&format!(
            "workspaces/{}/roleAssignments",
            workspace_id
        )))
    }

    fn add_role_assignment(
        &self,
        workspace_id: &str,
        principal: &Principal,
        role: WorkspaceRole,
    ) -> Result<(), ApiError> {
        info!(workspace = workspace_id, principal = %principal.id, role = %role, "adding role assignment");
        self.http.send_json_unit(
            Method::POST,
            &self.url(&format!("workspaces/{}/roleAssignments", workspace_id)),
            &AddRoleAssignment { principal, role },
        )
    }

    fn list_data_access_roles(
        &self,
        workspace_id: &str,
        item_id: &str,
    ) -> Result<Vec<DataAccessRole>, ApiError> {
        self.http
            .get_all(&self.item_url(workspace_id, item_id, "dataAccessRoles"))
    }

    fn put_data_access_roles(
        &self,
        workspace_id: &str,
        item_id: &str,
        roles: &[DataAccessRole],
    ) -> Result<(), ApiError> {
        info!(item = item_id, count = roles.len(), "replacing data access roles");
        self.http.send_json_unit(
            Method::PUT,
            &self.item_url(workspace_id, item_id, "dataAccessRoles"),
            &DataAccessRolesBody { value: roles },
        )
    }

    fn list_shortcuts(&self, workspace_id: &str, item_id: &str) -> Result<Vec<Shortcut>, ApiError> {
        self.http
            .get_all(&self.item_url(workspace_id, item_id, "shortcuts"))
    }

    fn create_shortcut(
        &self,
        workspace_id: &str,
        item_id: &str,
        shortcut: &Shortcut,
    ) -> Result<(), ApiError> {
        info!(item = item_id, shortcut = %shortcut.location(), "creating shortcut");
        self.http.send_json_unit(
            Method::POST,
            &self.item_url(workspace_id, item_id, "shortcuts"),
            shortcut,
        )
    }
}
