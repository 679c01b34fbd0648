//! Configuration module for fabric-wall
//!
//! Resolution order:
//! 1. CLI flags (highest priority, applied by the command layer)
//! 2. Environment variables (FABRIC_WALL_*)
//! 3. Explicit `--config` file, else `./fabric-wall.toml`
//! 4. User config (~/.config/fabric-wall/config.toml)
//! 5. Built-in defaults (lowest priority)

pub mod env_validator;
mod loader;
mod types;

pub use loader::{
    load_with_warnings, resolve, user_config_path, with_env_overrides, ConfigWarning, LoadedConfig,
    PROJECT_CONFIG_FILE,
};
pub use types::{
    ApiConfig, ColorMode, Config, OutputConfig, ProvisionConfig, RoleAssignmentConfig,
    ShortcutConfig, ValidationConfig, WorkspaceSide,
};
