//! Design tokens: the five semantic colors, glyphs with their ASCII
//! fallbacks, and panel borders. Nothing else in `ui` hardcodes a color or
//! a symbol.

use crossterm::style::Color;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};

pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

/// A symbol and what to print instead on terminals without unicode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub unicode: &'static str,
    pub ascii: &'static str,
}

impl Glyph {
    const fn new(unicode: &'static str, ascii: &'static str) -> Self {
        Self { unicode, ascii }
    }

    pub fn pick(&self, supports_unicode: bool) -> &'static str {
        if supports_unicode {
            self.unicode
        } else {
            self.ascii
        }
    }
}

pub mod glyphs {
    use super::Glyph;

    pub const SUCCESS: Glyph = Glyph::new("✓", "[OK]");
    pub const ERROR: Glyph = Glyph::new("✗", "[FAIL]");
    pub const WARNING: Glyph = Glyph::new("⚠", "[WARN]");
    pub const SKIPPED: Glyph = Glyph::new("○", "[SKIP]");
    pub const PLANNED: Glyph = Glyph::new("●", "[PLAN]");
    pub const ARROW: Glyph = Glyph::new("↳", "[>]");

    // Command headers
    pub const VALIDATE: Glyph = Glyph::new("🛡", "[VALIDATE]");
    pub const PROVISION: Glyph = Glyph::new("📦", "[PROVISION]");
    pub const SETUP: Glyph = Glyph::new("⚙", "[SETUP]");
}

/// Corner and edge pieces of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSet {
    pub top_left: &'static str,
    pub top_right: &'static str,
    pub bottom_left: &'static str,
    pub bottom_right: &'static str,
    pub horizontal: &'static str,
    pub vertical: &'static str,
}

impl BorderSet {
    pub const ROUNDED: BorderSet = BorderSet {
        top_left: "╭",
        top_right: "╮",
        bottom_left: "╰",
        bottom_right: "╯",
        horizontal: "─",
        vertical: "│",
    };

    pub const ASCII: BorderSet = BorderSet {
        top_left: "+",
        top_right: "+",
        bottom_left: "+",
        bottom_right: "+",
        horizontal: "-",
        vertical: "|",
    };

    pub fn for_terminal(supports_unicode: bool) -> &'static BorderSet {
        if supports_unicode {
            &Self::ROUNDED
        } else {
            &Self::ASCII
        }
    }
}

/// Prompt theme for `setup`: colorful on color terminals, plain otherwise.
pub fn prompt_theme(supports_color: bool) -> Box<dyn Theme> {
    if supports_color {
        Box::new(ColorfulTheme::default())
    } else {
        Box::new(SimpleTheme)
    }
}
