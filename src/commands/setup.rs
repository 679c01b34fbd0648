//! Setup command: prompt for identifiers, write the config file, then
//! optionally provision and validate.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dialoguer::theme::Theme;
use dialoguer::{Confirm, Input, MultiSelect};
use is_terminal::IsTerminal;

use fabric_wall::application::{ProvisionOutcome, ProvisionStep, SuiteSelection};
use fabric_wall::config::{self, Config, LoadedConfig, PROJECT_CONFIG_FILE};
use fabric_wall::presentation::TargetArgs;
use fabric_wall::templates;

use super::{provision, validate, GlobalArgs};
use crate::ui::context::UiContext;
use crate::ui::theme::prompt_theme;
use crate::ui::views::setup as view;

#[derive(Debug, Clone, Default)]
pub struct SetupArgs {
    pub output: Option<PathBuf>,
    pub render: Option<PathBuf>,
    pub provision: bool,
    pub validate: bool,
    pub skip_sql: bool,
    pub skip_powerbi: bool,
    pub no_input: bool,
    pub targets: TargetArgs,
}

pub fn cmd_setup(globals: &GlobalArgs, args: SetupArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let target = args
        .output
        .clone()
        .unwrap_or_else(|| cwd.join(PROJECT_CONFIG_FILE));

    // The file is written without environment overrides; those only
    // apply to the provisioning and validation that follow.
    let mut loaded = LoadedConfig::default();
    if target.is_file() {
        let (config, warnings) = config::load_with_warnings(&target)?;
        loaded = LoadedConfig {
            config,
            source: Some(target.clone()),
            warnings,
        };
    }
    let mut file_config = loaded.config.clone();
    args.targets.apply(&mut file_config);

    let ui = UiContext::new(globals.json, globals.verbose, globals.color, &file_config);
    super::print_config_warnings(&loaded, &ui);

    let interactive = !args.no_input;
    if interactive {
        if ui.json {
            bail!("interactive setup cannot emit --json; pass --no-input to accept existing values");
        }
        if !std::io::stdin().is_terminal() {
            bail!("setup needs an interactive terminal; pass --no-input to accept existing values");
        }
        print!("{}", view::render_setup_intro(&target, ui.color, ui.unicode));
        prompt_config(&mut file_config, &ui)?;
    }

    file_config
        .save(&target)
        .with_context(|| format!("failed to write {}", target.display()))?;
    if ui.json {
        let _ = crate::ui::json::emit(serde_json::json!({
            "event": "config_saved",
            "path": target.display().to_string(),
        }));
    } else {
        print!(
            "{}",
            view::render_config_saved(&target, &file_config, ui.color, ui.unicode)
        );
    }

    if let Some(template) = &args.render {
        let written = render_template_file(template, &file_config)?;
        if ui.json {
            let _ = crate::ui::json::emit(serde_json::json!({
                "event": "rendered",
                "path": written.display().to_string(),
            }));
        } else {
            print!("{}", view::render_template_written(&written, ui.color, ui.unicode));
        }
    }

    let theme = prompt_theme(ui.color);
    let do_provision = args.provision
        || (interactive
            && Confirm::with_theme(theme.as_ref())
                .with_prompt("Provision workspaces, roles and shortcuts now?")
                .default(false)
                .interact()?);
    if do_provision {
        let effective = config::with_env_overrides(file_config.clone());
        let outcome = provision::run_provision(&effective, ProvisionStep::All, false, &ui)?;
        if record_workspace_ids(&mut file_config, &outcome) {
            file_config.save(&target)?;
        }
    }

    let do_validate = args.validate
        || (interactive
            && Confirm::with_theme(theme.as_ref())
                .with_prompt("Run validation now?")
                .default(true)
                .interact()?);
    if do_validate {
        let effective = config::with_env_overrides(file_config);
        let selection = SuiteSelection::resolve(&effective, None, args.skip_sql, args.skip_powerbi);
        if !validate::run_validation(&effective, selection, Some(&target), &ui, true)? {
            std::process::exit(1);
        }
    }
    Ok(())
}

fn prompt_config(config: &mut Config, ui: &UiContext) -> Result<()> {
    let boxed = prompt_theme(ui.color);
    let theme = boxed.as_ref();

    config.tenant_id = prompt_value(theme, "Tenant ID", config.tenant_id.take())?;
    config.provider_workspace_id = prompt_value(
        theme,
        "Provider workspace ID (empty to create one)",
        config.provider_workspace_id.take(),
    )?;
    config.consumer_workspace_id = prompt_value(
        theme,
        "Consumer workspace ID (empty to create one)",
        config.consumer_workspace_id.take(),
    )?;
    if config.provider_workspace_id.is_none() {
        config.provision.provider_workspace_name = prompt_value(
            theme,
            "Provider workspace name",
            config.provision.provider_workspace_name.take(),
        )?;
    }
    if config.consumer_workspace_id.is_none() {
        config.provision.consumer_workspace_name = prompt_value(
            theme,
            "Consumer workspace name",
            config.provision.consumer_workspace_name.take(),
        )?;
    }
    config.provider_lakehouse_id = prompt_value(
        theme,
        "Provider lakehouse ID",
        config.provider_lakehouse_id.take(),
    )?;
    config.consumer_lakehouse_id = prompt_value(
        theme,
        "Consumer lakehouse ID",
        config.consumer_lakehouse_id.take(),
    )?;
    config.sql_connection_string = prompt_value(
        theme,
        "SQL endpoint connection string",
        config.sql_connection_string.take(),
    )?;

    let items = vec!["SQL Security", "Power BI"];
    let defaults = [!config.validation.skip_sql, !config.validation.skip_powerbi];
    let selection = MultiSelect::with_theme(theme)
        .with_prompt("Optional suites to run")
        .items(&items)
        .defaults(&defaults)
        .interact()?;
    config.validation.skip_sql = !selection.contains(&0);
    config.validation.skip_powerbi = !selection.contains(&1);
    Ok(())
}

/// Empty input clears the value; the current value is offered as default.
fn prompt_value(theme: &dyn Theme, prompt: &str, current: Option<String>) -> Result<Option<String>> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true);
    if let Some(current) = current {
        input = input.default(current);
    }
    let value = input.interact_text()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Copy workspace IDs found or created by provisioning into the config.
/// Returns whether anything changed.
fn record_workspace_ids(config: &mut Config, outcome: &ProvisionOutcome) -> bool {
    let mut changed = false;
    for (key, id) in outcome.real_workspace_ids() {
        let slot = match key {
            "provider" => &mut config.provider_workspace_id,
            _ => &mut config.consumer_workspace_id,
        };
        if slot.as_deref() != Some(id) {
            *slot = Some(id.to_string());
            changed = true;
        }
    }
    changed
}

/// Render `{{PLACEHOLDERS}}` in a template file with the configured
/// identifiers and write the result next to it.
fn render_template_file(template: &Path, config: &Config) -> Result<PathBuf> {
    let content = std::fs::read_to_string(template)
        .with_context(|| format!("failed to read template {}", template.display()))?;
    let name = template.display().to_string();
    let rendered = templates::render_with_config(&name, &content, config)?;

    let out = rendered_path(template);
    std::fs::write(&out, rendered).with_context(|| format!("failed to write {}", out.display()))?;
    Ok(out)
}

/// `roles.json.template` -> `roles.json`, `roles.json` -> `roles.rendered.json`
fn rendered_path(template: &Path) -> PathBuf {
    let file_name = template
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(stripped) = file_name
        .strip_suffix(".template")
        .or_else(|| file_name.strip_suffix(".tmpl"))
    {
        return template.with_file_name(stripped);
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            template.with_file_name(format!("{}.rendered.{}", stem, ext))
        }
        _ => template.with_file_name(format!("{}.rendered", file_name)),
    }
}
