use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;
use crate::ui::widgets::panel::{Panel, PanelStyle};

/// Fatal error box with an optional fix hint
#[derive(Debug, Clone)]
pub struct ErrorBlock {
    message: String,
    source: Option<String>,
    fix: Option<String>,
}

impl ErrorBlock {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
            fix: None,
        }
    }

    /// Where the error came from, e.g. a config file path
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let title = format!(
            "{} {}",
            Icon::Error.colored(supports_color, supports_unicode),
            ColoredText::error("ERROR").bold().render(supports_color)
        );
        let mut panel = Panel::titled(title).style(PanelStyle::Error);
        if let Some(source) = &self.source {
            panel.line(ColoredText::dim(source.as_str()).render(supports_color));
        }
        panel.blank();
        panel.line(self.message.as_str());

        if let Some(fix) = &self.fix {
            panel.blank();
            panel.line(format!(
                "{} {}",
                Icon::Arrow.colored(supports_color, supports_unicode),
                fix
            ));
        }
        panel.render(supports_color, supports_unicode)
    }
}
