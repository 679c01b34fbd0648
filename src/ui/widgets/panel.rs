use std::borrow::Cow;

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::{colors, BorderSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelStyle {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Bordered block of lines, sized to its widest line.
#[derive(Debug, Default, Clone)]
pub struct Panel {
    title: Option<String>,
    lines: Vec<String>,
    style: PanelStyle,
}

impl Panel {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn style(mut self, style: PanelStyle) -> Self {
        self.style = style;
        self
    }

    /// Multi-line strings become one row per line.
    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.extend(line.into().lines().map(str::to_string));
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let rows: Vec<&str> = self
            .title
            .iter()
            .chain(self.lines.iter())
            .map(String::as_str)
            .collect();
        let inner = rows.iter().map(|r| visible_width(r)).max().unwrap_or(0) + 2;

        let b = BorderSet::for_terminal(supports_unicode);
        let paint = |s: &str| self.paint(s, supports_color);

        let mut out = String::new();
        out.push_str(&paint(&format!(
            "{}{}{}",
            b.top_left,
            b.horizontal.repeat(inner),
            b.top_right
        )));
        out.push('\n');
        for row in rows {
            let pad = inner.saturating_sub(1 + visible_width(row));
            let edge = paint(b.vertical);
            out.push_str(&format!("{} {}{}{}\n", edge, row, " ".repeat(pad), edge));
        }
        out.push_str(&paint(&format!(
            "{}{}{}",
            b.bottom_left,
            b.horizontal.repeat(inner),
            b.bottom_right
        )));
        out.push('\n');
        out
    }

    fn paint(&self, s: &str, supports_color: bool) -> String {
        if !supports_color {
            return s.to_string();
        }
        let color = match self.style {
            PanelStyle::Info => colors::INFO,
            PanelStyle::Success => colors::SUCCESS,
            PanelStyle::Warning => colors::WARNING,
            PanelStyle::Error => colors::ERROR,
        };
        format!("{}", s.with(color))
    }
}

fn visible_width(s: &str) -> usize {
    strip_ansi(s).width()
}

/// Drop CSI escape sequences (`ESC [ ... <letter>`)
fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\u{1b}') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_the_same_width() {
        let mut panel = Panel::titled("Summary");
        panel.line("3 passed\n1 failed, see below");
        let rendered = panel.render(false, false);
        let widths: Vec<usize> = rendered.lines().map(|l| l.width()).collect();
        assert_eq!(widths.len(), 5);
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn colored_content_does_not_widen_the_panel() {
        let mut plain = Panel::default();
        plain.line("ok");
        let mut colored = Panel::default();
        colored.line(format!("{}", "ok".green()));
        assert_eq!(
            plain.render(false, true).lines().next(),
            colored.render(false, true).lines().next()
        );
    }
}
