use crate::ui::terminal::{detect_capabilities, TerminalCapabilities};
use fabric_wall::config::{ColorMode, Config};
use fabric_wall::presentation::ColorWhen;

/// Resolved output settings for one command invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    pub json: bool,
    pub verbose: u8,
    pub caps: TerminalCapabilities,
    pub color: bool,
    pub unicode: bool,
}

impl UiContext {
    pub fn new(json: bool, verbose: u8, cli_color: Option<ColorWhen>, config: &Config) -> Self {
        Self::from_caps(json, verbose, cli_color, config, detect_capabilities())
    }

    pub(crate) fn from_caps(
        json: bool,
        verbose: u8,
        cli_color: Option<ColorWhen>,
        config: &Config,
        caps: TerminalCapabilities,
    ) -> Self {
        let unicode = config.output.unicode && caps.supports_unicode;

        let color = match cli_color {
            Some(ColorWhen::Never) => false,
            Some(ColorWhen::Always) => true,
            Some(ColorWhen::Auto) | None => match config.output.color {
                ColorMode::Never => false,
                ColorMode::Always => true,
                ColorMode::Auto => caps.supports_color && !caps.is_ci,
            },
        };

        Self {
            json,
            verbose,
            caps,
            color: color && !json,
            unicode,
        }
    }

    /// Risk lines for passed checks are shown from `-v` up
    pub fn verbose(&self) -> bool {
        self.verbose > 0
    }

    /// Workflow annotations are emitted alongside human output only
    pub fn annotate(&self) -> bool {
        !self.json && self.caps.is_github_actions
    }
}
