//! Validation checks, one module per suite
//!
//! Each suite function probes the platform through the ports in
//! [`SuiteContext`] and records every outcome through the
//! [`CheckRecorder`](super::recorder::CheckRecorder). Facts later suites
//! depend on (which workspaces answered, who holds provider roles) are kept
//! in [`RunState`].

pub mod data_access;
pub mod identity;
pub mod isolation;
pub mod powerbi;
pub mod sql_security;

use crate::config::WorkspaceSide;
use crate::domain::ports::{FabricApi, PowerBiApi, RoleAssignment, SqlEndpoint};

/// Identifiers a validation run cannot start without, plus optional lakehouses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallIds {
    pub provider_workspace_id: String,
    pub consumer_workspace_id: String,
    pub provider_lakehouse_id: Option<String>,
    pub consumer_lakehouse_id: Option<String>,
}

impl WallIds {
    pub fn workspace(&self, side: WorkspaceSide) -> &str {
        match side {
            WorkspaceSide::Provider => &self.provider_workspace_id,
            WorkspaceSide::Consumer => &self.consumer_workspace_id,
        }
    }
}

/// Everything a check may consult. Borrowed for the length of one run.
pub struct SuiteContext<'a> {
    pub ids: &'a WallIds,
    /// Whether a bearer token was found; the token itself stays in the HTTP client
    pub token_present: bool,
    pub fabric: &'a dyn FabricApi,
    pub powerbi: &'a dyn PowerBiApi,
    pub sql: Option<&'a dyn SqlEndpoint>,
    pub overlap_allowlist: &'a [String],
    pub shared_paths: &'a [String],
    pub row_count_table: Option<&'a str>,
}

/// Facts learned by earlier checks in the same run
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// `None` until the workspace access check ran
    pub provider_accessible: Option<bool>,
    pub consumer_accessible: Option<bool>,
    pub provider_roles: Option<Vec<RoleAssignment>>,
    pub consumer_roles: Option<Vec<RoleAssignment>>,
}

impl RunState {
    pub fn set_accessible(&mut self, side: WorkspaceSide, accessible: bool) {
        match side {
            WorkspaceSide::Provider => self.provider_accessible = Some(accessible),
            WorkspaceSide::Consumer => self.consumer_accessible = Some(accessible),
        }
    }

    /// False only when an access check ran and failed. A workspace nobody
    /// probed yet (suite not selected) is assumed reachable.
    pub fn may_probe(&self, side: WorkspaceSide) -> bool {
        let accessible = match side {
            WorkspaceSide::Provider => self.provider_accessible,
            WorkspaceSide::Consumer => self.consumer_accessible,
        };
        accessible != Some(false)
    }

    pub fn set_roles(&mut self, side: WorkspaceSide, roles: Vec<RoleAssignment>) {
        match side {
            WorkspaceSide::Provider => self.provider_roles = Some(roles),
            WorkspaceSide::Consumer => self.consumer_roles = Some(roles),
        }
    }
}

/// Title-case label used in check names ("Provider", "Consumer")
pub(crate) fn side_label(side: WorkspaceSide) -> &'static str {
    match side {
        WorkspaceSide::Provider => "Provider",
        WorkspaceSide::Consumer => "Consumer",
    }
}

/// Comma-separated list, truncated after `limit` entries
pub(crate) fn join_limited<I, S>(items: I, limit: usize) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<S> = items.into_iter().collect();
    let mut out = items
        .iter()
        .take(limit)
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > limit {
        out.push_str(&format!(" (+{} more)", items.len() - limit));
    }
    out
}

#[cfg(test)]
pub(crate) mod fakes;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unprobed_workspace_may_be_probed() {
        let mut state = RunState::default();
        assert!(state.may_probe(WorkspaceSide::Provider));
        state.set_accessible(WorkspaceSide::Provider, false);
        assert!(!state.may_probe(WorkspaceSide::Provider));
        assert!(state.may_probe(WorkspaceSide::Consumer));
    }

    #[test]
    fn join_limited_truncates() {
        assert_eq!(join_limited(["a", "b", "c"], 2), "a, b (+1 more)");
        assert_eq!(join_limited(Vec::<String>::new(), 2), "");
    }
}
