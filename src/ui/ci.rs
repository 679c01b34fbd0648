use fabric_wall::domain::entities::CheckResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Warning,
    Error,
}

/// `::error title=...::message` workflow command
pub fn github_actions_annotation(level: AnnotationLevel, message: &str, title: Option<&str>) -> String {
    let level_str = match level {
        AnnotationLevel::Warning => "warning",
        AnnotationLevel::Error => "error",
    };

    let props = match title {
        Some(title) => format!(" title={}", escape_property(title)),
        None => String::new(),
    };

    format!("::{}{}::{}", level_str, props, escape_data(message))
}

/// One annotation per failed check, titled `<category>: <name>`
pub fn check_annotation(result: &CheckResult) -> String {
    let mut message = result.details.clone().unwrap_or_default();
    if let Some(rec) = &result.recommendation {
        if !message.is_empty() {
            message.push('\n');
        }
        message.push_str(rec);
    }
    let title = format!("{}: {}", result.category, result.name);
    github_actions_annotation(AnnotationLevel::Error, &message, Some(&title))
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
