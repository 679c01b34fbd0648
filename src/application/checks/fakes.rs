//! In-memory port implementations for check, suite and provisioning tests

use std::cell::RefCell;
use std::collections::HashMap;

use crate::domain::ports::{
    CreateWorkspace, DataAccessRole, Dataset, DatasetUser, DecisionRule, FabricApi,
    OneLakeTarget, PermissionScope, PowerBiApi, RoleAssignment, RoleMembers, Shortcut,
    ShortcutTarget, SqlEndpoint, Workspace,
};
use crate::domain::value_objects::{Principal, PrincipalKind, WorkspaceRole};
use crate::error::ApiError;

pub const PROVIDER_WS: &str = "prov-ws";
pub const CONSUMER_WS: &str = "cons-ws";
pub const PROVIDER_LH: &str = "prov-lh";
pub const CONSUMER_LH: &str = "cons-lh";

pub fn assignment(principal_id: &str, role: WorkspaceRole) -> RoleAssignment {
    RoleAssignment {
        id: format!("ra-{}", principal_id),
        principal: Principal::new(principal_id, PrincipalKind::Group),
        role,
    }
}

pub fn access_role(name: &str, paths: &[&str], members: bool) -> DataAccessRole {
    let mut role_members = RoleMembers::default();
    if members {
        role_members.microsoft_entra_members.push(crate::domain::ports::EntraMember {
            tenant_id: "tenant".to_string(),
            object_id: "someone".to_string(),
        });
    }
    DataAccessRole {
        name: name.to_string(),
        decision_rules: vec![DecisionRule {
            effect: "Permit".to_string(),
            permission: vec![PermissionScope {
                attribute_name: "Path".to_string(),
                attribute_value_included_in: paths.iter().map(|p| p.to_string()).collect(),
            }],
        }],
        members: role_members,
    }
}

pub fn shortcut(name: &str, target_ws: &str, target_path: &str) -> Shortcut {
    Shortcut {
        name: name.to_string(),
        path: "Tables".to_string(),
        target: ShortcutTarget {
            one_lake: Some(OneLakeTarget {
                workspace_id: target_ws.to_string(),
                item_id: PROVIDER_LH.to_string(),
                path: target_path.to_string(),
            }),
        },
    }
}

/// Fabric fake. Unknown workspaces answer 404 like the real service.
#[derive(Default)]
pub struct FakeFabric {
    pub ping_error: Option<ApiError>,
    pub workspaces: RefCell<Vec<Workspace>>,
    pub roles: RefCell<HashMap<String, Vec<RoleAssignment>>>,
    pub data_access_roles: RefCell<HashMap<String, Vec<DataAccessRole>>>,
    pub shortcuts: RefCell<HashMap<String, Vec<Shortcut>>>,
    /// Operation name -> error returned instead of data
    pub failures: HashMap<&'static str, ApiError>,
    /// Mutating calls in order, e.g. "create_workspace:Provider"
    pub calls: RefCell<Vec<String>>,
}

impl FakeFabric {
    /// Both workspaces exist with disjoint role holders
    pub fn wall() -> Self {
        let fake = Self::default();
        fake.add_workspace(PROVIDER_WS, "Provider");
        fake.add_workspace(CONSUMER_WS, "Consumer");
        fake.roles.borrow_mut().insert(
            PROVIDER_WS.to_string(),
            vec![assignment("prov-admins", WorkspaceRole::Admin)],
        );
        fake.roles.borrow_mut().insert(
            CONSUMER_WS.to_string(),
            vec![assignment("cons-readers", WorkspaceRole::Viewer)],
        );
        fake
    }

    pub fn add_workspace(&self, id: &str, name: &str) {
        self.workspaces.borrow_mut().push(Workspace {
            id: id.to_string(),
            display_name: name.to_string(),
            description: None,
            capacity_id: None,
        });
    }

    pub fn fail(mut self, op: &'static str, error: ApiError) -> Self {
        self.failures.insert(op, error);
        self
    }

    fn check(&self, op: &'static str) -> Result<(), ApiError> {
        match self.failures.get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found(id: &str) -> ApiError {
        ApiError::NotFound {
            body: format!("WorkspaceNotFound: {}", id),
        }
    }
}

impl FabricApi for FakeFabric {
    fn ping(&self) -> Result<(), ApiError> {
        match &self.ping_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn list_workspaces(&self) -> Result<Vec<Workspace>, ApiError> {
        self.check("list_workspaces")?;
        Ok(self.workspaces.borrow().clone())
    }

    fn get_workspace(&self, workspace_id: &str) -> Result<Workspace, ApiError> {
        self.check("get_workspace")?;
        self.workspaces
            .borrow()
            .iter()
            .find(|w| w.id == workspace_id)
            .cloned()
            .ok_or_else(|| Self::not_found(workspace_id))
    }

    fn create_workspace(&self, request: &CreateWorkspace) -> Result<Workspace, ApiError> {
        self.check("create_workspace")?;
        self.calls
            .borrow_mut()
            .push(format!("create_workspace:{}", request.display_name));
        let id = format!("new-{}", request.display_name.to_lowercase());
        self.add_workspace(&id, &request.display_name);
        self.roles.borrow_mut().entry(id.clone()).or_default();
        Ok(Workspace {
            id,
            display_name: request.display_name.clone(),
            description: request.description.clone(),
            capacity_id: request.capacity_id.clone(),
        })
    }

    fn list_role_assignments(&self, workspace_id: &str) -> Result<Vec<RoleAssignment>, ApiError> {
        self.check("list_role_assignments")?;
        self.roles
            .borrow()
            .get(workspace_id)
            .cloned()
            .ok_or_else(|| Self::not_found(workspace_id))
    }

    fn add_role_assignment(
        &self,
        workspace_id: &str,
        principal: &Principal,
        role: WorkspaceRole,
    ) -> Result<(), ApiError> {
        self.check("add_role_assignment")?;
        self.calls
            .borrow_mut()
            .push(format!("add_role_assignment:{}:{}:{}", workspace_id, principal.id, role));
        self.roles
            .borrow_mut()
            .entry(workspace_id.to_string())
            .or_default()
            .push(RoleAssignment {
                id: String::new(),
                principal: principal.clone(),
                role,
            });
        Ok(())
    }

    fn list_data_access_roles(
        &self,
        _workspace_id: &str,
        item_id: &str,
    ) -> Result<Vec<DataAccessRole>, ApiError> {
        self.check("list_data_access_roles")?;
        Ok(self
            .data_access_roles
            .borrow()
            .get(item_id)
            .cloned()
            .unwrap_or_default())
    }

    fn put_data_access_roles(
        &self,
        _workspace_id: &str,
        item_id: &str,
        roles: &[DataAccessRole],
    ) -> Result<(), ApiError> {
        self.check("put_data_access_roles")?;
        self.calls
            .borrow_mut()
            .push(format!("put_data_access_roles:{}:{}", item_id, roles.len()));
        self.data_access_roles
            .borrow_mut()
            .insert(item_id.to_string(), roles.to_vec());
        Ok(())
    }

    fn list_shortcuts(&self, _workspace_id: &str, item_id: &str) -> Result<Vec<Shortcut>, ApiError> {
        self.check("list_shortcuts")?;
        Ok(self
            .shortcuts
            .borrow()
            .get(item_id)
            .cloned()
            .unwrap_or_default())
    }

    fn create_shortcut(
        &self,
        _workspace_id: &str,
        item_id: &str,
        shortcut: &Shortcut,
    ) -> Result<(), ApiError> {
        self.check("create_shortcut")?;
        self.calls
            .borrow_mut()
            .push(format!("create_shortcut:{}", shortcut.name));
        self.shortcuts
            .borrow_mut()
            .entry(item_id.to_string())
            .or_default()
            .push(shortcut.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePowerBi {
    pub datasets: Vec<Dataset>,
    pub users: HashMap<String, Vec<DatasetUser>>,
    pub failure: Option<ApiError>,
}

impl FakePowerBi {
    pub fn with_dataset(mut self, id: &str, users: Vec<DatasetUser>) -> Self {
        self.datasets.push(Dataset {
            id: id.to_string(),
            name: format!("Model {}", id),
        });
        self.users.insert(id.to_string(), users);
        self
    }
}

pub fn dataset_user(identifier: &str, right: &str) -> DatasetUser {
    DatasetUser {
        identifier: identifier.to_string(),
        principal_type: "Group".to_string(),
        dataset_user_access_right: right.to_string(),
        display_name: None,
    }
}

impl PowerBiApi for FakePowerBi {
    fn list_datasets(&self, _workspace_id: &str) -> Result<Vec<Dataset>, ApiError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.datasets.clone()),
        }
    }

    fn list_dataset_users(
        &self,
        _workspace_id: &str,
        dataset_id: &str,
    ) -> Result<Vec<DatasetUser>, ApiError> {
        Ok(self.users.get(dataset_id).cloned().unwrap_or_default())
    }
}

/// Answers by substring match on the query text
#[derive(Default)]
pub struct FakeSql {
    pub answers: Vec<(&'static str, Result<i64, ApiError>)>,
    pub queries: RefCell<Vec<String>>,
}

impl FakeSql {
    pub fn answer(mut self, needle: &'static str, value: Result<i64, ApiError>) -> Self {
        self.answers.push((needle, value));
        self
    }
}

impl SqlEndpoint for FakeSql {
    fn query_scalar(&self, sql: &str) -> Result<i64, ApiError> {
        self.queries.borrow_mut().push(sql.to_string());
        self.answers
            .iter()
            .find(|(needle, _)| sql.contains(needle))
            .map(|(_, value)| value.clone())
            .unwrap_or(Ok(0))
    }
}
