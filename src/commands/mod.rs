//! Command handlers for the binary.
//!
//! Each handler loads configuration, builds the UI context and drives one
//! application use case.

pub mod provision;
pub mod setup;
pub mod sql_policy;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use fabric_wall::config::{self, LoadedConfig};
use fabric_wall::presentation::{ColorWhen, TargetArgs};

use crate::ui::context::UiContext;

/// Global flags shared by every command
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub json: bool,
    pub color: Option<ColorWhen>,
    pub verbose: u8,
}

impl GlobalArgs {
    /// Resolve configuration, overlay `targets` and print any warnings.
    pub fn load(&self, targets: &TargetArgs) -> Result<(LoadedConfig, UiContext)> {
        let cwd = std::env::current_dir()?;
        self.load_from(&cwd, targets)
    }

    pub(crate) fn load_from(&self, cwd: &Path, targets: &TargetArgs) -> Result<(LoadedConfig, UiContext)> {
        let mut loaded = config::resolve(self.config.as_deref(), cwd)?;
        targets.apply(&mut loaded.config);

        let ui = UiContext::new(self.json, self.verbose, self.color, &loaded.config);
        print_config_warnings(&loaded, &ui);
        Ok((loaded, ui))
    }
}

pub(crate) fn print_config_warnings(loaded: &LoadedConfig, ui: &UiContext) {
    if loaded.warnings.is_empty() {
        return;
    }
    if ui.json {
        for warning in &loaded.warnings {
            let _ = crate::ui::json::emit(serde_json::json!({
                "event": "warning",
                "message": warning.to_string(),
            }));
        }
        return;
    }
    eprint!(
        "{}",
        crate::ui::blocks::warning::render_config_warnings(&loaded.warnings, ui.color, ui.unicode)
    );
}
