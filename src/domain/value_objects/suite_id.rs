//! Suite identifiers

use serde::{Deserialize, Serialize};

use super::Category;

/// The validation suites, in the order the orchestrator runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SuiteId {
    /// Token presence and API reachability
    Identity,
    /// Workspace access, roles and principal overlap
    Isolation,
    /// OneLake data access roles and shortcuts
    DataAccess,
    /// Row/column security on the SQL endpoint
    Sql,
    /// Dataset sharing in the BI service
    PowerBi,
}

impl SuiteId {
    pub const ORDERED: [SuiteId; 5] = [
        SuiteId::Identity,
        SuiteId::Isolation,
        SuiteId::DataAccess,
        SuiteId::Sql,
        SuiteId::PowerBi,
    ];

    pub fn display_name(&self) -> &'static str {
        self.category().as_str()
    }

    /// Used in report file names
    pub fn slug(&self) -> &'static str {
        match self {
            SuiteId::Identity => "identity",
            SuiteId::Isolation => "isolation",
            SuiteId::DataAccess => "data-access",
            SuiteId::Sql => "sql",
            SuiteId::PowerBi => "power-bi",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            SuiteId::Identity => Category::Identity,
            SuiteId::Isolation => Category::Isolation,
            SuiteId::DataAccess => Category::DataAccess,
            SuiteId::Sql => Category::SqlSecurity,
            SuiteId::PowerBi => Category::PowerBi,
        }
    }
}

impl std::fmt::Display for SuiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
