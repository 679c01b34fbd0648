use fabric_wall::application::{ActionStatus, ProvisionAction, ProvisionOutcome, ProvisionStep};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_provision_header(
    step: ProvisionStep,
    dry_run: bool,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Provision, "Fabric Wall provisioning");
    header.add("Step", step.as_str());
    if dry_run {
        header.add("Mode", "dry run (no changes)");
    }
    header.render(supports_color, supports_unicode)
}

/// `  ✓ [roles] analysts Viewer on consumer (created)`
pub fn render_action(action: &ProvisionAction, supports_color: bool, supports_unicode: bool) -> String {
    let (icon, status) = match action.status {
        ActionStatus::Created => (Icon::Success, ColoredText::success("created")),
        ActionStatus::Updated => (Icon::Success, ColoredText::success("updated")),
        ActionStatus::Exists => (Icon::Skipped, ColoredText::dim("exists")),
        ActionStatus::Planned => (Icon::Planned, ColoredText::warning("planned")),
    };
    format!(
        "  {} {} {} ({})\n",
        icon.colored(supports_color, supports_unicode),
        ColoredText::dim(format!("[{}]", action.step)).render(supports_color),
        action.target,
        status.render(supports_color)
    )
}

pub fn render_provision_summary(
    outcome: &ProvisionOutcome,
    dry_run: bool,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let count = |status: ActionStatus| {
        outcome
            .actions
            .iter()
            .filter(|a| a.status == status)
            .count()
    };
    let line = if dry_run {
        format!(
            "{} change(s) planned, {} already in place",
            count(ActionStatus::Planned),
            count(ActionStatus::Exists)
        )
    } else {
        format!(
            "{} created, {} updated, {} already in place",
            count(ActionStatus::Created),
            count(ActionStatus::Updated),
            count(ActionStatus::Exists)
        )
    };
    let mut out = format!(
        "\n{} {}\n",
        Icon::Success.colored(supports_color, supports_unicode),
        line
    );
    for (side, id) in &outcome.workspace_ids {
        out.push_str(&format!(
            "  {} {} workspace: {}\n",
            Icon::Arrow.colored(supports_color, supports_unicode),
            side,
            id
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(status: ActionStatus) -> ProvisionAction {
        ProvisionAction {
            step: ProvisionStep::Shortcuts,
            target: "shared_sales".to_string(),
            status,
        }
    }

    #[test]
    fn action_line_shows_step_and_status() {
        let rendered = render_action(&action(ActionStatus::Exists), false, false);
        assert_eq!(rendered, "  [SKIP] [shortcuts] shared_sales (exists)\n");
    }

    #[test]
    fn dry_run_summary_counts_planned() {
        let outcome = ProvisionOutcome {
            actions: vec![action(ActionStatus::Planned), action(ActionStatus::Exists)],
            workspace_ids: [("provider", "prov-ws".to_string())].into_iter().collect(),
        };
        let rendered = render_provision_summary(&outcome, true, false, false);
        assert!(rendered.contains("1 change(s) planned, 1 already in place"));
        assert!(rendered.contains("provider workspace: prov-ws"));
    }
}
