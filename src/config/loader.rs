//! Configuration lookup, loading and environment overrides

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{WallError, WallResult};

use super::env_validator::{closest_match, EnvVarValidator};
use super::types::{ColorMode, Config};

/// File name looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "fabric-wall.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Result of config resolution: the merged config and where it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when only defaults (plus env) apply
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> WallResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| WallError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve the configuration for a run.
///
/// An explicit path must exist. Otherwise `./fabric-wall.toml` in `cwd`,
/// then the user config, then defaults. Environment overrides are applied
/// on top in every case.
pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> WallResult<LoadedConfig> {
    let candidate = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(WallError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            Some(path.to_path_buf())
        }
        None => {
            let project = cwd.join(PROJECT_CONFIG_FILE);
            if project.is_file() {
                Some(project)
            } else {
                user_config_path().filter(|p| p.is_file())
            }
        }
    };

    let loaded = match candidate {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            let (config, warnings) = load_with_warnings(&path)?;
            LoadedConfig {
                config,
                source: Some(path),
                warnings,
            }
        }
        None => {
            debug!("no config file found, using defaults");
            LoadedConfig::default()
        }
    };

    Ok(LoadedConfig {
        config: with_env_overrides(loaded.config),
        ..loaded
    })
}

/// `~/.config/fabric-wall/config.toml` (platform equivalent)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fabric-wall").join("config.toml"))
}

/// Apply environment variable overrides (FABRIC_WALL_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

pub(crate) fn apply_env_overrides<F>(mut config: Config, env: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let string_overrides: [(&str, &mut Option<String>); 6] = [
        ("FABRIC_WALL_TENANT_ID", &mut config.tenant_id),
        (
            "FABRIC_WALL_PROVIDER_WORKSPACE_ID",
            &mut config.provider_workspace_id,
        ),
        (
            "FABRIC_WALL_CONSUMER_WORKSPACE_ID",
            &mut config.consumer_workspace_id,
        ),
        (
            "FABRIC_WALL_PROVIDER_LAKEHOUSE_ID",
            &mut config.provider_lakehouse_id,
        ),
        (
            "FABRIC_WALL_CONSUMER_LAKEHOUSE_ID",
            &mut config.consumer_lakehouse_id,
        ),
        (
            "FABRIC_WALL_SQL_CONNECTION_STRING",
            &mut config.sql_connection_string,
        ),
    ];
    for (key, slot) in string_overrides {
        if let Some(value) = env(key).filter(|v| !v.trim().is_empty()) {
            *slot = Some(value);
        }
    }

    if let Some(url) = env("FABRIC_WALL_FABRIC_BASE_URL") {
        config.api.fabric_base_url = url;
    }
    if let Some(url) = env("FABRIC_WALL_POWERBI_BASE_URL") {
        config.api.powerbi_base_url = url;
    }
    if let Some(secs) = env("FABRIC_WALL_TIMEOUT_SECS") {
        match secs.trim().parse() {
            Ok(value) => config.api.timeout_secs = value,
            Err(_) => warn!(value = %secs, "ignoring invalid FABRIC_WALL_TIMEOUT_SECS"),
        }
    }
    if let Some(dir) = env("FABRIC_WALL_REPORT_DIR") {
        config.validation.report_dir = PathBuf::from(dir);
    }

    if let Some(val) = env("FABRIC_WALL_SKIP_SQL") {
        config.validation.skip_sql = parse_bool("FABRIC_WALL_SKIP_SQL", &val);
    }
    if let Some(val) = env("FABRIC_WALL_SKIP_POWERBI") {
        config.validation.skip_powerbi = parse_bool("FABRIC_WALL_SKIP_POWERBI", &val);
    }

    if let Some(color) = env("FABRIC_WALL_COLOR") {
        config.output.color = EnvVarValidator::new(
            "FABRIC_WALL_COLOR",
            &["auto", "always", "never"],
        )
        .parse(&color, parse_color_mode, ColorMode::Auto);
    }

    config
}

fn parse_bool(var: &str, value: &str) -> bool {
    EnvVarValidator::new(var, &["true", "false", "1", "0"]).parse(
        value,
        |s| match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        false,
    )
}

fn parse_color_mode(value: &str) -> Option<ColorMode> {
    match value.trim().to_lowercase().as_str() {
        "auto" => Some(ColorMode::Auto),
        "always" => Some(ColorMode::Always),
        "never" => Some(ColorMode::Never),
        _ => None,
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "tenant_id",
        "provider_workspace_id",
        "consumer_workspace_id",
        "provider_lakehouse_id",
        "consumer_lakehouse_id",
        "sql_connection_string",
        "api",
        "fabric_base_url",
        "powerbi_base_url",
        "timeout_secs",
        "reachability_timeout_secs",
        "validation",
        "skip_sql",
        "skip_powerbi",
        "report_dir",
        "overlap_allowlist",
        "shared_paths",
        "row_count_table",
        "output",
        "color",
        "unicode",
        "provision",
        "capacity_id",
        "provider_workspace_name",
        "consumer_workspace_name",
        "role_assignments",
        "data_access_roles_file",
        "shortcuts",
        "workspace",
        "principal_id",
        "principal_type",
        "role",
        "name",
        "path",
        "target_path",
    ];

    closest_match(unknown, CANDIDATES).map(str::to_string)
}
