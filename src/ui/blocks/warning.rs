use fabric_wall::config::ConfigWarning;

use crate::ui::primitives::icon::Icon;
use crate::ui::widgets::panel::{Panel, PanelStyle};

/// Unknown configuration keys, shown before a command runs
pub fn render_config_warnings(
    warnings: &[ConfigWarning],
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let title = format!(
        "{} Configuration warnings",
        Icon::Warning.colored(supports_color, supports_unicode)
    );
    let mut panel = Panel::titled(title).style(PanelStyle::Warning);
    for warning in warnings {
        panel.line(warning.to_string());
    }
    panel.render(supports_color, supports_unicode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn lists_each_unknown_key_with_suggestion() {
        let warnings = [ConfigWarning {
            key: "skip_sqll".to_string(),
            file: PathBuf::from("fabric-wall.toml"),
            line: Some(4),
            suggestion: Some("skip_sql".to_string()),
        }];
        let rendered = render_config_warnings(&warnings, false, false);
        assert!(rendered.contains("[WARN] Configuration warnings"));
        assert!(rendered.contains("fabric-wall.toml:4 (did you mean 'skip_sql'?)"));
    }

    #[test]
    fn nothing_to_render_without_warnings() {
        assert_eq!(render_config_warnings(&[], true, true), "");
    }
}
