//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WallResult;

use super::loader::{self, ConfigWarning};

pub const DEFAULT_FABRIC_BASE_URL: &str = "https://api.fabric.microsoft.com/v1";
pub const DEFAULT_POWERBI_BASE_URL: &str = "https://api.powerbi.com/v1.0/myorg";

/// Flat identifiers at the top level, everything optional so that a
/// partially filled file still loads; the command decides what it needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_workspace_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_workspace_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_lakehouse_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_lakehouse_id: Option<String>,

    /// ADO-style connection string for the SQL analytics endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_connection_string: Option<String>,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub provision: ProvisionConfig,
}

/// Endpoints and timeouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_fabric_base_url")]
    pub fabric_base_url: String,

    #[serde(default = "default_powerbi_base_url")]
    pub powerbi_base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Only the reachability probe uses this
    #[serde(default = "default_reachability_timeout_secs")]
    pub reachability_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            fabric_base_url: default_fabric_base_url(),
            powerbi_base_url: default_powerbi_base_url(),
            timeout_secs: default_timeout_secs(),
            reachability_timeout_secs: default_reachability_timeout_secs(),
        }
    }
}

fn default_fabric_base_url() -> String {
    DEFAULT_FABRIC_BASE_URL.to_string()
}

fn default_powerbi_base_url() -> String {
    DEFAULT_POWERBI_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_reachability_timeout_secs() -> u64 {
    10
}

/// Validation run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub skip_sql: bool,

    #[serde(default)]
    pub skip_powerbi: bool,

    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Principal object IDs allowed on both sides (break-glass admins)
    #[serde(default)]
    pub overlap_allowlist: Vec<String>,

    /// Provider paths consumers may reach through shortcuts, e.g. "Tables/orders"
    #[serde(default)]
    pub shared_paths: Vec<String>,

    /// Table whose visible row count is probed, e.g. "dbo.orders"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count_table: Option<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            skip_sql: false,
            skip_powerbi: false,
            report_dir: default_report_dir(),
            overlap_allowlist: Vec::new(),
            shared_paths: Vec::new(),
            row_count_table: None,
        }
    }
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Color mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,

    #[serde(default = "default_true")]
    pub unicode: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            unicode: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Which side of the wall a provisioning entry applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceSide {
    Provider,
    Consumer,
}

impl std::fmt::Display for WorkspaceSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkspaceSide::Provider => write!(f, "provider"),
            WorkspaceSide::Consumer => write!(f, "consumer"),
        }
    }
}

/// Provisioning inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_workspace_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_workspace_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_assignments: Vec<RoleAssignmentConfig>,

    /// JSON payload (`{"value": [...]}`) for the provider lakehouse data access roles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_access_roles_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shortcuts: Vec<ShortcutConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignmentConfig {
    pub workspace: WorkspaceSide,
    pub principal_id: String,
    #[serde(default = "default_principal_type")]
    pub principal_type: String,
    pub role: String,
}

fn default_principal_type() -> String {
    "Group".to_string()
}

/// Consumer shortcut into the provider lakehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutConfig {
    pub name: String,
    #[serde(default = "default_shortcut_path")]
    pub path: String,
    /// Path inside the provider lakehouse, e.g. "Tables/orders"
    pub target_path: String,
}

fn default_shortcut_path() -> String {
    "Tables".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> WallResult<Self> {
        loader::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Load configuration and collect unknown-key warnings
    pub fn load_with_warnings(path: &Path) -> WallResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Write as TOML, creating parent directories as needed
    pub fn save(&self, path: &Path) -> WallResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Key/value view used for template placeholders (`{{PROVIDER_WORKSPACE_ID}}`)
    pub fn placeholders(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();
        let mut push = |key: &'static str, value: &Option<String>| {
            if let Some(v) = value {
                vars.push((key, v.clone()));
            }
        };
        push("TENANT_ID", &self.tenant_id);
        push("PROVIDER_WORKSPACE_ID", &self.provider_workspace_id);
        push("CONSUMER_WORKSPACE_ID", &self.consumer_workspace_id);
        push("PROVIDER_LAKEHOUSE_ID", &self.provider_lakehouse_id);
        push("CONSUMER_LAKEHOUSE_ID", &self.consumer_lakehouse_id);
        push("CAPACITY_ID", &self.provision.capacity_id);
        push("PROVIDER_WORKSPACE_NAME", &self.provision.provider_workspace_name);
        push("CONSUMER_WORKSPACE_NAME", &self.provision.consumer_workspace_name);
        vars
    }

    pub fn workspace_id(&self, side: WorkspaceSide) -> Option<&str> {
        match side {
            WorkspaceSide::Provider => self.provider_workspace_id.as_deref(),
            WorkspaceSide::Consumer => self.consumer_workspace_id.as_deref(),
        }
    }
}
