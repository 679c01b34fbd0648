//! Provision Use Case
//!
//! Creates the two workspaces, assigns roles, applies the provider
//! lakehouse data access roles and creates the consumer shortcuts. Every
//! step reads current state first and only writes what is missing, so a
//! second run reports everything as existing.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::config::{Config, WorkspaceSide};
use crate::domain::ports::{
    CreateWorkspace, DataAccessRole, DecisionRule, EntraMember, FabricApi, OneLakeTarget,
    PermissionScope, RoleMembers, Shortcut, ShortcutTarget,
};
use crate::domain::value_objects::{Principal, PrincipalKind, WorkspaceRole};
use crate::error::{ApiError, WallError, WallResult};
use crate::templates;

/// Name of the role built from `validation.shared_paths` when no payload file is given
pub const SHARED_READER_ROLE: &str = "ConsumerSharedRead";

/// Stand-in ID for a workspace a dry run would create
fn planned_id(name: &str) -> String {
    format!("<planned:{}>", name)
}

fn is_planned(id: &str) -> bool {
    id.starts_with("<planned:")
}

/// Provisioning steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum ProvisionStep {
    Workspaces,
    Roles,
    DataAccess,
    Shortcuts,
    All,
}

impl ProvisionStep {
    /// Concrete steps this selection expands to
    pub fn expand(self) -> Vec<ProvisionStep> {
        match self {
            ProvisionStep::All => vec![
                ProvisionStep::Workspaces,
                ProvisionStep::Roles,
                ProvisionStep::DataAccess,
                ProvisionStep::Shortcuts,
            ],
            step => vec![step],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProvisionStep::Workspaces => "workspaces",
            ProvisionStep::Roles => "roles",
            ProvisionStep::DataAccess => "data-access",
            ProvisionStep::Shortcuts => "shortcuts",
            ProvisionStep::All => "all",
        }
    }
}

impl std::fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Created,
    Updated,
    Exists,
    /// Dry run: would be created or updated
    Planned,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Created => "created",
            ActionStatus::Updated => "updated",
            ActionStatus::Exists => "exists",
            ActionStatus::Planned => "planned",
        }
    }
}

/// One line of provisioning output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionAction {
    pub step: ProvisionStep,
    pub target: String,
    pub status: ActionStatus,
}

#[derive(Debug, Clone, Default)]
pub struct ProvisionOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProvisionOutcome {
    pub actions: Vec<ProvisionAction>,
    /// Workspace IDs found or created, for writing back into configuration.
    /// A dry run records `<planned:NAME>` for workspaces it would create.
    pub workspace_ids: BTreeMap<&'static str, String>,
}

impl ProvisionOutcome {
    /// IDs of workspaces that exist on the service
    pub fn real_workspace_ids(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.workspace_ids
            .iter()
            .filter(|(_, id)| !is_planned(id))
            .map(|(side, id)| (*side, id.as_str()))
    }
}

/// Provision Use Case
pub struct ProvisionUseCase<'a> {
    fabric: &'a dyn FabricApi,
    config: &'a Config,
}

impl<'a> ProvisionUseCase<'a> {
    pub fn new(fabric: &'a dyn FabricApi, config: &'a Config) -> Self {
        Self { fabric, config }
    }

    /// Run the selected steps, stopping at the first failed request.
    pub fn execute_with_callback<F>(
        &self,
        step: ProvisionStep,
        options: &ProvisionOptions,
        mut on_action: F,
    ) -> WallResult<ProvisionOutcome>
    where
        F: FnMut(&ProvisionAction),
    {
        let mut run = Run {
            fabric: self.fabric,
            config: self.config,
            dry_run: options.dry_run,
            outcome: ProvisionOutcome::default(),
            on_action: &mut on_action,
        };
        for (side, id) in [
            (WorkspaceSide::Provider, &self.config.provider_workspace_id),
            (WorkspaceSide::Consumer, &self.config.consumer_workspace_id),
        ] {
            if let Some(id) = id {
                run.outcome.workspace_ids.insert(side_key(side), id.clone());
            }
        }

        for step in step.expand() {
            info!(step = %step, dry_run = options.dry_run, "provisioning");
            match step {
                ProvisionStep::Workspaces => run.workspaces()?,
                ProvisionStep::Roles => run.roles()?,
                ProvisionStep::DataAccess => run.data_access()?,
                ProvisionStep::Shortcuts => run.shortcuts()?,
                ProvisionStep::All => {}
            }
        }
        Ok(run.outcome)
    }

    pub fn execute(
        &self,
        step: ProvisionStep,
        options: &ProvisionOptions,
    ) -> WallResult<ProvisionOutcome> {
        self.execute_with_callback(step, options, |_| {})
    }
}

fn side_key(side: WorkspaceSide) -> &'static str {
    match side {
        WorkspaceSide::Provider => "provider",
        WorkspaceSide::Consumer => "consumer",
    }
}

fn api_error(context: impl Into<String>) -> impl FnOnce(ApiError) -> WallError {
    let context = context.into();
    move |source| WallError::Api { context, source }
}

struct Run<'r> {
    fabric: &'r dyn FabricApi,
    config: &'r Config,
    dry_run: bool,
    outcome: ProvisionOutcome,
    on_action: &'r mut dyn FnMut(&ProvisionAction),
}

impl Run<'_> {
    fn emit(&mut self, step: ProvisionStep, target: impl Into<String>, status: ActionStatus) {
        let action = ProvisionAction {
            step,
            target: target.into(),
            status,
        };
        debug!(step = %action.step, target = %action.target, status = action.status.as_str(), "provision action");
        (self.on_action)(&action);
        self.outcome.actions.push(action);
    }

    fn write_status(&self, created: ActionStatus) -> ActionStatus {
        if self.dry_run {
            ActionStatus::Planned
        } else {
            created
        }
    }

    fn workspace_id(&self, side: WorkspaceSide) -> WallResult<String> {
        self.outcome
            .workspace_ids
            .get(side_key(side))
            .cloned()
            .ok_or_else(|| WallError::MissingParameter {
                name: format!("{}_workspace_id", side_key(side)),
                flag: format!("{}-workspace", side_key(side)),
            })
    }

    fn lakehouse_id(&self, side: WorkspaceSide) -> WallResult<String> {
        let value = match side {
            WorkspaceSide::Provider => &self.config.provider_lakehouse_id,
            WorkspaceSide::Consumer => &self.config.consumer_lakehouse_id,
        };
        value.clone().ok_or_else(|| WallError::MissingParameter {
            name: format!("{}_lakehouse_id", side_key(side)),
            flag: format!("{}-lakehouse", side_key(side)),
        })
    }

    /// Match by display name, create when absent
    fn workspaces(&mut self) -> WallResult<()> {
        let config = self.config;
        let provision = &config.provision;
        let wanted: Vec<(WorkspaceSide, &String)> = [
            (WorkspaceSide::Provider, provision.provider_workspace_name.as_ref()),
            (WorkspaceSide::Consumer, provision.consumer_workspace_name.as_ref()),
        ]
        .into_iter()
        .filter_map(|(side, name)| name.map(|n| (side, n)))
        .collect();

        if wanted.is_empty() {
            return Err(WallError::MissingParameter {
                name: "provision.provider_workspace_name".to_string(),
                flag: "provider-workspace-name".to_string(),
            });
        }

        let existing = self
            .fabric
            .list_workspaces()
            .map_err(api_error("listing workspaces"))?;

        for (side, name) in wanted {
            if let Some(ws) = existing.iter().find(|w| w.display_name == *name) {
                self.outcome.workspace_ids.insert(side_key(side), ws.id.clone());
                self.emit(ProvisionStep::Workspaces, format!("{} ({})", name, ws.id), ActionStatus::Exists);
                continue;
            }

            if self.dry_run {
                self.outcome
                    .workspace_ids
                    .insert(side_key(side), planned_id(name));
                self.emit(ProvisionStep::Workspaces, name.clone(), ActionStatus::Planned);
                continue;
            }

            let request = CreateWorkspace {
                display_name: name.clone(),
                description: Some(format!("fabric-wall {} workspace", side_key(side))),
                capacity_id: provision.capacity_id.clone(),
            };
            let created = self
                .fabric
                .create_workspace(&request)
                .map_err(api_error(format!("creating workspace '{}'", name)))?;
            self.outcome
                .workspace_ids
                .insert(side_key(side), created.id.clone());
            self.emit(
                ProvisionStep::Workspaces,
                format!("{} ({})", name, created.id),
                ActionStatus::Created,
            );
        }
        Ok(())
    }

    /// Skip principals that already hold the role
    fn roles(&mut self) -> WallResult<()> {
        let config = self.config;
        let mut current: BTreeMap<&'static str, Vec<(String, WorkspaceRole)>> = BTreeMap::new();

        for entry in &config.provision.role_assignments {
            let role = WorkspaceRole::parse(&entry.role).ok_or_else(|| WallError::InvalidSetting {
                key: "provision.role_assignments.role".to_string(),
                value: entry.role.clone(),
                expected: "Admin, Member, Contributor or Viewer".to_string(),
            })?;
            let kind =
                PrincipalKind::parse(&entry.principal_type).ok_or_else(|| WallError::InvalidSetting {
                    key: "provision.role_assignments.principal_type".to_string(),
                    value: entry.principal_type.clone(),
                    expected: "User, Group or ServicePrincipal".to_string(),
                })?;
            let workspace_id = self.workspace_id(entry.workspace)?;
            let key = side_key(entry.workspace);

            if !current.contains_key(key) {
                let listed = if is_planned(&workspace_id) {
                    Vec::new()
                } else {
                    self.fabric
                        .list_role_assignments(&workspace_id)
                        .map_err(api_error(format!("listing roles of {}", workspace_id)))?
                };
                current.insert(
                    key,
                    listed
                        .into_iter()
                        .map(|a| (a.principal.id.to_ascii_lowercase(), a.role))
                        .collect(),
                );
            }

            let target = format!("{} {} on {}", entry.principal_id, role, entry.workspace);
            let held = current.get(key).is_some_and(|assignments| {
                assignments
                    .iter()
                    .any(|(id, r)| id.eq_ignore_ascii_case(&entry.principal_id) && *r == role)
            });
            if held {
                self.emit(ProvisionStep::Roles, target, ActionStatus::Exists);
                continue;
            }

            if !self.dry_run {
                let principal = Principal::new(entry.principal_id.clone(), kind);
                self.fabric
                    .add_role_assignment(&workspace_id, &principal, role)
                    .map_err(api_error(format!("assigning {}", target)))?;
            }
            let status = self.write_status(ActionStatus::Created);
            self.emit(ProvisionStep::Roles, target, status);
        }
        Ok(())
    }

    /// PUT the desired role set when it differs from what is there
    fn data_access(&mut self) -> WallResult<()> {
        let workspace_id = self.workspace_id(WorkspaceSide::Provider)?;
        let lakehouse_id = self.lakehouse_id(WorkspaceSide::Provider)?;
        let desired = match &self.config.provision.data_access_roles_file {
            Some(path) => load_roles_file(path, self.config)?,
            None => shared_reader_roles(self.config)?,
        };

        let existing = if is_planned(&workspace_id) {
            Vec::new()
        } else {
            self.fabric
                .list_data_access_roles(&workspace_id, &lakehouse_id)
                .map_err(api_error("listing data access roles"))?
        };
        let names = desired
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        if same_roles(&existing, &desired) {
            self.emit(ProvisionStep::DataAccess, names, ActionStatus::Exists);
            return Ok(());
        }

        if !self.dry_run {
            self.fabric
                .put_data_access_roles(&workspace_id, &lakehouse_id, &desired)
                .map_err(api_error("applying data access roles"))?;
        }
        let status = self.write_status(ActionStatus::Updated);
        self.emit(ProvisionStep::DataAccess, names, status);
        Ok(())
    }

    /// Skip shortcuts already at the same `path/name`; a 409 from the
    /// service also means "exists"
    fn shortcuts(&mut self) -> WallResult<()> {
        let provider_ws = self.workspace_id(WorkspaceSide::Provider)?;
        let provider_lh = self.lakehouse_id(WorkspaceSide::Provider)?;
        let consumer_ws = self.workspace_id(WorkspaceSide::Consumer)?;
        let consumer_lh = self.lakehouse_id(WorkspaceSide::Consumer)?;

        let config = self.config;
        let existing = if is_planned(&consumer_ws) {
            Vec::new()
        } else {
            self.fabric
                .list_shortcuts(&consumer_ws, &consumer_lh)
                .map_err(api_error("listing shortcuts"))?
        };

        for wanted in &config.provision.shortcuts {
            let shortcut = Shortcut {
                name: wanted.name.clone(),
                path: wanted.path.clone(),
                target: ShortcutTarget {
                    one_lake: Some(OneLakeTarget {
                        workspace_id: provider_ws.clone(),
                        item_id: provider_lh.clone(),
                        path: wanted.target_path.clone(),
                    }),
                },
            };
            let location = shortcut.location();
            let target = format!("{} -> {}", location, wanted.target_path);

            if existing
                .iter()
                .any(|s| s.location().eq_ignore_ascii_case(&location))
            {
                self.emit(ProvisionStep::Shortcuts, target, ActionStatus::Exists);
                continue;
            }
            if self.dry_run {
                self.emit(ProvisionStep::Shortcuts, target, ActionStatus::Planned);
                continue;
            }

            match self.fabric.create_shortcut(&consumer_ws, &consumer_lh, &shortcut) {
                Ok(()) => self.emit(ProvisionStep::Shortcuts, target, ActionStatus::Created),
                Err(e) if e.is_conflict() => {
                    self.emit(ProvisionStep::Shortcuts, target, ActionStatus::Exists)
                }
                Err(e) => return Err(api_error(format!("creating shortcut {}", target))(e)),
            }
        }
        Ok(())
    }
}

#[derive(serde::Deserialize)]
struct RolesPayload {
    value: Vec<DataAccessRole>,
}

/// Read a `{"value": [...]}` payload, substituting `{{PLACEHOLDERS}}` first
pub fn load_roles_file(path: &Path, config: &Config) -> WallResult<Vec<DataAccessRole>> {
    let raw = std::fs::read_to_string(path)?;
    let rendered = templates::render_with_config(&path.display().to_string(), &raw, config)?;
    let payload: RolesPayload = serde_json::from_str(&rendered)?;
    Ok(payload.value)
}

/// One read role over the shared paths for every consumer-side principal
fn shared_reader_roles(config: &Config) -> WallResult<Vec<DataAccessRole>> {
    let paths = &config.validation.shared_paths;
    if paths.is_empty() {
        return Err(WallError::MissingParameter {
            name: "validation.shared_paths".to_string(),
            flag: "shared-path".to_string(),
        });
    }
    let tenant_id = config.tenant_id.clone().ok_or_else(|| WallError::MissingParameter {
        name: "tenant_id".to_string(),
        flag: "tenant-id".to_string(),
    })?;

    let members = config
        .provision
        .role_assignments
        .iter()
        .filter(|a| a.workspace == WorkspaceSide::Consumer)
        .map(|a| EntraMember {
            tenant_id: tenant_id.clone(),
            object_id: a.principal_id.clone(),
        })
        .collect();

    Ok(vec![DataAccessRole {
        name: SHARED_READER_ROLE.to_string(),
        decision_rules: vec![DecisionRule {
            effect: "Permit".to_string(),
            permission: vec![
                PermissionScope {
                    attribute_name: "Path".to_string(),
                    attribute_value_included_in: paths.clone(),
                },
                PermissionScope {
                    attribute_name: "Action".to_string(),
                    attribute_value_included_in: vec!["Read".to_string()],
                },
            ],
        }],
        members: RoleMembers {
            microsoft_entra_members: members,
            fabric_item_members: Vec::new(),
        },
    }])
}

/// Name, permitted paths and members of one role, order-insensitive
type RoleKey = (String, Vec<String>, Vec<String>, Vec<String>);

fn role_key(role: &DataAccessRole) -> RoleKey {
    let sorted = |mut v: Vec<String>| {
        v.sort();
        v
    };
    let paths = sorted(role.paths().into_iter().map(str::to_string).collect());
    let entra = sorted(
        role.members
            .microsoft_entra_members
            .iter()
            .map(|m| m.object_id.to_ascii_lowercase())
            .collect(),
    );
    let items = sorted(
        role.members
            .fabric_item_members
            .iter()
            .map(|m| {
                let mut access = m.item_access.clone();
                access.sort();
                format!("{}:{}", m.source_path.to_ascii_lowercase(), access.join(","))
            })
            .collect(),
    );
    (role.name.to_ascii_lowercase(), paths, entra, items)
}

/// Same roles with the same paths and members, ignoring order
fn same_roles(existing: &[DataAccessRole], desired: &[DataAccessRole]) -> bool {
    let keys = |roles: &[DataAccessRole]| {
        let mut keyed: Vec<RoleKey> = roles.iter().map(role_key).collect();
        keyed.sort();
        keyed
    };
    keys(existing) == keys(desired)
}
