use fabric_wall::application::{SuiteSelection, WallIds};
use fabric_wall::domain::entities::{SuiteResult, SuiteStatus};
use fabric_wall::domain::value_objects::SuiteId;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_validate_header(
    ids: &WallIds,
    selection: &SuiteSelection,
    source: Option<&str>,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Validate, "Fabric Wall validation");
    header.add_opt("Config", source);
    header.add("Provider", ids.provider_workspace_id.as_str());
    header.add("Consumer", ids.consumer_workspace_id.as_str());
    header.add_opt("Provider LH", ids.provider_lakehouse_id.as_deref());
    header.add_opt("Consumer LH", ids.consumer_lakehouse_id.as_deref());
    header.add(
        "Suites",
        match selection.only {
            Some(suite) => suite.display_name().to_string(),
            None => "all".to_string(),
        },
    );
    header.render(supports_color, supports_unicode)
}

pub fn render_suite_heading(suite: SuiteId, supports_color: bool) -> String {
    format!(
        "\n{}\n",
        ColoredText::plain(suite.display_name()).bold().render(supports_color)
    )
}

/// Only skipped suites get a line of their own; completed suites already
/// printed their checks.
pub fn render_suite_skipped(suite: &SuiteResult, supports_color: bool, supports_unicode: bool) -> Option<String> {
    if suite.status != SuiteStatus::Skipped {
        return None;
    }
    let reason = suite.reason.as_deref().unwrap_or("skipped");
    Some(format!(
        "\n{} {} {}\n",
        Icon::Skipped.colored(supports_color, supports_unicode),
        ColoredText::plain(suite.name.as_str()).bold().render(supports_color),
        ColoredText::dim(format!("({})", reason)).render(supports_color)
    ))
}

pub fn render_report_saved(path: &str, supports_color: bool, supports_unicode: bool) -> String {
    format!(
        "{} Report saved to {}\n",
        Icon::Arrow.colored(supports_color, supports_unicode),
        ColoredText::info(path).render(supports_color)
    )
}
