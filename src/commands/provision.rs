//! Provision command

use std::path::PathBuf;

use anyhow::Result;

use fabric_wall::application::{ProvisionOptions, ProvisionOutcome, ProvisionStep, ProvisionUseCase};
use fabric_wall::config::Config;
use fabric_wall::presentation::{Services, TargetArgs};

use super::GlobalArgs;
use crate::ui::context::UiContext;
use crate::ui::json::events::{ActionEvent, CompleteEvent, StartEvent};
use crate::ui::views::provision as view;

#[derive(Debug, Clone)]
pub struct ProvisionArgs {
    pub step: ProvisionStep,
    pub dry_run: bool,
    pub roles_file: Option<PathBuf>,
    pub shared_paths: Vec<String>,
    pub provider_workspace_name: Option<String>,
    pub consumer_workspace_name: Option<String>,
    pub targets: TargetArgs,
}

impl ProvisionArgs {
    /// Overlay provisioning flags onto configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.roles_file {
            config.provision.data_access_roles_file = Some(path.clone());
        }
        if !self.shared_paths.is_empty() {
            config.validation.shared_paths = self.shared_paths.clone();
        }
        if let Some(name) = &self.provider_workspace_name {
            config.provision.provider_workspace_name = Some(name.clone());
        }
        if let Some(name) = &self.consumer_workspace_name {
            config.provision.consumer_workspace_name = Some(name.clone());
        }
    }
}

pub fn cmd_provision(globals: &GlobalArgs, args: ProvisionArgs) -> Result<()> {
    let (loaded, ui) = globals.load(&args.targets)?;
    let mut config = loaded.config;
    args.apply(&mut config);

    run_provision(&config, args.step, args.dry_run, &ui)?;
    Ok(())
}

/// Run the selected steps; the first failed request aborts with an error.
pub(crate) fn run_provision(
    config: &Config,
    step: ProvisionStep,
    dry_run: bool,
    ui: &UiContext,
) -> Result<ProvisionOutcome> {
    let services = Services::from_env(config)?;
    let fabric = services.fabric();

    if ui.json {
        let _ = crate::ui::json::emit_event(&StartEvent::new("provision").with_label(step.as_str()));
    } else {
        print!(
            "{}",
            view::render_provision_header(step, dry_run, ui.color, ui.unicode)
        );
    }

    let use_case = ProvisionUseCase::new(&fabric, config);
    let options = ProvisionOptions { dry_run };
    let outcome = use_case.execute_with_callback(step, &options, |action| {
        if ui.json {
            let _ = crate::ui::json::emit_event(&ActionEvent::new(action));
        } else {
            print!("{}", view::render_action(action, ui.color, ui.unicode));
        }
    })?;

    if ui.json {
        let _ = crate::ui::json::emit_event(&CompleteEvent::new("provision", true));
    } else {
        print!(
            "{}",
            view::render_provision_summary(&outcome, dry_run, ui.color, ui.unicode)
        );
    }
    Ok(outcome)
}
