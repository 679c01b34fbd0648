//! Isolation suite: workspace access, role listings and principal overlap

use std::collections::BTreeMap;

use super::{join_limited, side_label, RunState, SuiteContext};
use crate::application::recorder::{CheckRecorder, Verdict};
use crate::config::WorkspaceSide;
use crate::domain::ports::RoleAssignment;
use crate::domain::services::principal_overlap;
use crate::domain::value_objects::Category;

pub const PRINCIPAL_OVERLAP: &str = "Cross-Workspace Principal Overlap";

pub fn access_check_name(side: WorkspaceSide) -> String {
    format!("Workspace Access: {}", side_label(side))
}

pub fn roles_check_name(side: WorkspaceSide) -> String {
    format!("Workspace Roles: {}", side_label(side))
}

pub fn run(ctx: &SuiteContext<'_>, state: &mut RunState, rec: &mut CheckRecorder<'_>) {
    for side in [WorkspaceSide::Provider, WorkspaceSide::Consumer] {
        check_workspace(ctx, side, state, rec);
    }

    if let (Some(provider), Some(consumer)) = (&state.provider_roles, &state.consumer_roles) {
        let verdict = overlap_verdict(provider, consumer, ctx.overlap_allowlist);
        rec.record_verdict(PRINCIPAL_OVERLAP, Category::Isolation, verdict);
    }
}

fn check_workspace(
    ctx: &SuiteContext<'_>,
    side: WorkspaceSide,
    state: &mut RunState,
    rec: &mut CheckRecorder<'_>,
) {
    let workspace_id = ctx.ids.workspace(side);

    let workspace = rec.run(
        &access_check_name(side),
        Category::Isolation,
        || ctx.fabric.get_workspace(workspace_id),
        |ws| Verdict::pass(format!("'{}' ({}) is reachable", ws.display_name, ws.id)),
    );
    state.set_accessible(side, workspace.is_some());
    if workspace.is_none() {
        return;
    }

    let roles = rec.run(
        &roles_check_name(side),
        Category::Isolation,
        || ctx.fabric.list_role_assignments(workspace_id),
        |roles| Verdict::pass(describe_roles(roles)),
    );
    if let Some(roles) = roles {
        state.set_roles(side, roles);
    }
}

fn describe_roles(roles: &[RoleAssignment]) -> String {
    if roles.is_empty() {
        return "No role assignments".to_string();
    }
    let mut by_role: BTreeMap<&str, usize> = BTreeMap::new();
    for assignment in roles {
        *by_role.entry(assignment.role.as_str()).or_default() += 1;
    }
    let breakdown = by_role
        .iter()
        .map(|(role, n)| format!("{}: {}", role, n))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} role assignments ({})", roles.len(), breakdown)
}

fn overlap_verdict(
    provider: &[RoleAssignment],
    consumer: &[RoleAssignment],
    allowlist: &[String],
) -> Verdict {
    let overlap = principal_overlap(
        provider.iter().map(|r| r.principal.id.as_str()),
        consumer.iter().map(|r| r.principal.id.as_str()),
        allowlist.iter().map(String::as_str),
    );

    let allowed_note = if overlap.allowed.is_empty() {
        String::new()
    } else {
        format!("; allow-listed: {}", join_limited(&overlap.allowed, 10))
    };

    if overlap.is_clean() {
        Verdict::pass(format!(
            "No principal holds roles in both workspaces{}",
            allowed_note
        ))
    } else {
        Verdict::fail(format!(
            "{} principal(s) hold roles in both workspaces: {}{}",
            overlap.shared.len(),
            join_limited(&overlap.shared, 10),
            allowed_note
        ))
        .with_risk("Shared principals can read provider data directly, bypassing the shortcut boundary")
        .with_recommendation(
            "Remove the shared principals from one workspace, or list break-glass IDs in validation.overlap_allowlist",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::checks::fakes::*;
    use crate::application::checks::WallIds;
    use crate::domain::entities::ResultSet;
    use crate::domain::value_objects::WorkspaceRole;

    fn ids(consumer: &str) -> WallIds {
        WallIds {
            provider_workspace_id: PROVIDER_WS.to_string(),
            consumer_workspace_id: consumer.to_string(),
            provider_lakehouse_id: None,
            consumer_lakehouse_id: None,
        }
    }

    fn run_with(fabric: &FakeFabric, ids: &WallIds, allowlist: &[String]) -> (ResultSet, RunState) {
        let powerbi = FakePowerBi::default();
        let ctx = SuiteContext {
            ids,
            token_present: true,
            fabric,
            powerbi: &powerbi,
            sql: None,
            overlap_allowlist: allowlist,
            shared_paths: &[],
            row_count_table: None,
        };
        let mut results = ResultSet::new();
        let mut state = RunState::default();
        run(&ctx, &mut state, &mut CheckRecorder::silent(&mut results));
        (results, state)
    }

    #[test]
    fn disjoint_workspaces_pass_all_five_checks() {
        let (results, state) = run_with(&FakeFabric::wall(), &ids(CONSUMER_WS), &[]);
        assert_eq!(results.len(), 5);
        assert_eq!(results.failed(), 0);
        assert_eq!(state.provider_accessible, Some(true));
        assert_eq!(results.as_slice()[4].name, PRINCIPAL_OVERLAP);
    }

    #[test]
    fn missing_workspace_fails_access_and_skips_dependents() {
        let (results, state) = run_with(&FakeFabric::wall(), &ids("does-not-exist"), &[]);

        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Workspace Access: Provider",
                "Workspace Roles: Provider",
                "Workspace Access: Consumer",
            ]
        );
        let failure = &results.as_slice()[2];
        assert!(!failure.passed);
        assert!(failure
            .details
            .as_deref()
            .unwrap_or_default()
            .contains("WorkspaceNotFound"));
        assert_eq!(state.consumer_accessible, Some(false));
    }

    #[test]
    fn shared_principal_fails_overlap() {
        let fabric = FakeFabric::wall();
        fabric
            .roles
            .borrow_mut()
            .get_mut(CONSUMER_WS)
            .unwrap()
            .push(assignment("PROV-ADMINS", WorkspaceRole::Viewer));

        let (results, _) = run_with(&fabric, &ids(CONSUMER_WS), &[]);
        let overlap = results.iter().find(|r| r.name == PRINCIPAL_OVERLAP).unwrap();
        assert!(!overlap.passed);
        assert!(overlap.details.as_deref().unwrap().contains("prov-admins"));
        assert!(overlap.is_risky_failure());
    }

    #[test]
    fn allowlisted_principal_is_tolerated() {
        let fabric = FakeFabric::wall();
        fabric
            .roles
            .borrow_mut()
            .get_mut(CONSUMER_WS)
            .unwrap()
            .push(assignment("prov-admins", WorkspaceRole::Viewer));

        let allow = vec!["prov-admins".to_string()];
        let (results, _) = run_with(&fabric, &ids(CONSUMER_WS), &allow);
        let overlap = results.iter().find(|r| r.name == PRINCIPAL_OVERLAP).unwrap();
        assert!(overlap.passed);
        assert!(overlap.details.as_deref().unwrap().contains("allow-listed"));
    }
}
