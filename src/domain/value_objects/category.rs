//! Check categories

/// Grouping tag attached to every check result.
///
/// Results store the category as a plain string so reports stay readable
/// and foreign categories survive a round trip; this enum is the set the
/// built-in checks use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Identity,
    Isolation,
    DataAccess,
    SqlSecurity,
    PowerBi,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Identity => "Identity",
            Category::Isolation => "Isolation",
            Category::DataAccess => "Data Access",
            Category::SqlSecurity => "SQL Security",
            Category::PowerBi => "Power BI",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}
