use std::path::Path;

use fabric_wall::config::Config;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_setup_intro(target: &Path, supports_color: bool, supports_unicode: bool) -> String {
    let mut header = CommandHeader::new(Icon::Setup, "Fabric Wall setup");
    header.add("Writes", target.display().to_string());
    let mut out = header.render(supports_color, supports_unicode);
    out.push_str(
        &ColoredText::dim("Press Enter to keep the value shown in brackets.\n")
            .render(supports_color),
    );
    out
}

pub fn render_config_saved(
    path: &Path,
    config: &Config,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut out = format!(
        "\n{} Configuration written to {}\n",
        Icon::Success.colored(supports_color, supports_unicode),
        ColoredText::info(path.display().to_string()).render(supports_color)
    );
    let missing: Vec<&str> = [
        ("provider_workspace_id", &config.provider_workspace_id),
        ("consumer_workspace_id", &config.consumer_workspace_id),
    ]
    .into_iter()
    .filter(|(_, value)| !value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    .map(|(name, _)| name)
    .collect();
    if !missing.is_empty() {
        out.push_str(&format!(
            "  {} {} not set; run `fabric-wall provision workspaces` to create them\n",
            Icon::Warning.colored(supports_color, supports_unicode),
            missing.join(", ")
        ));
    }
    out
}

pub fn render_template_written(
    path: &Path,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    format!(
        "{} Rendered template written to {}\n",
        Icon::Success.colored(supports_color, supports_unicode),
        ColoredText::info(path.display().to_string()).render(supports_color)
    )
}
