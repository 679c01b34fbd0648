use crossterm::style::Stylize;

use crate::ui::theme::{colors, glyphs, Glyph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Skipped,
    Planned,
    Arrow,
    Validate,
    Provision,
    Setup,
}

impl Icon {
    fn glyph(&self) -> Glyph {
        match self {
            Icon::Success => glyphs::SUCCESS,
            Icon::Error => glyphs::ERROR,
            Icon::Warning => glyphs::WARNING,
            Icon::Skipped => glyphs::SKIPPED,
            Icon::Planned => glyphs::PLANNED,
            Icon::Arrow => glyphs::ARROW,
            Icon::Validate => glyphs::VALIDATE,
            Icon::Provision => glyphs::PROVISION,
            Icon::Setup => glyphs::SETUP,
        }
    }

    pub fn render(&self, supports_unicode: bool) -> &'static str {
        self.glyph().pick(supports_unicode)
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let s = self.render(supports_unicode);
        if !supports_color {
            return s.to_string();
        }
        let color = match self {
            Icon::Success => colors::SUCCESS,
            Icon::Error => colors::ERROR,
            Icon::Warning | Icon::Planned => colors::WARNING,
            Icon::Skipped | Icon::Arrow => colors::DIM,
            Icon::Validate | Icon::Provision | Icon::Setup => colors::INFO,
        };
        format!("{}", s.with(color))
    }

    /// Pass/fail icon for a check outcome
    pub fn for_outcome(passed: bool) -> Self {
        if passed {
            Icon::Success
        } else {
            Icon::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_renders_ascii_when_unicode_unsupported() {
        assert_eq!(Icon::Success.render(false), "[OK]");
        assert_eq!(Icon::Skipped.render(false), "[SKIP]");
    }

    #[test]
    fn icon_renders_unicode_when_supported() {
        assert_eq!(Icon::Error.render(true), "✗");
    }

    #[test]
    fn uncolored_icon_has_no_escape() {
        assert_eq!(Icon::for_outcome(false).colored(false, false), "[FAIL]");
    }
}
