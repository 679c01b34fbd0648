//! Data Access suite: OneLake data access roles and consumer shortcuts

use super::{join_limited, RunState, SuiteContext};
use crate::application::recorder::{CheckRecorder, Verdict};
use crate::config::WorkspaceSide;
use crate::domain::ports::{DataAccessRole, Shortcut};
use crate::domain::value_objects::Category;

pub const DATA_ACCESS_ROLES: &str = "OneLake Data Access Roles";
pub const DEFAULT_READER_SCOPE: &str = "Default Reader Scope";
pub const CONSUMER_SHORTCUTS: &str = "Consumer Shortcuts";
pub const SHORTCUT_TARGET_PATHS: &str = "Shortcut Target Paths";

/// Runs the provider-side role checks and the consumer-side shortcut
/// checks. A side whose workspace failed its access check is left out.
pub fn run(ctx: &SuiteContext<'_>, state: &RunState, rec: &mut CheckRecorder<'_>) {
    let ids = ctx.ids;

    if let Some(lakehouse) = ids.provider_lakehouse_id.as_deref() {
        if state.may_probe(WorkspaceSide::Provider) {
            let roles = rec.run(
                DATA_ACCESS_ROLES,
                Category::DataAccess,
                || {
                    ctx.fabric
                        .list_data_access_roles(&ids.provider_workspace_id, lakehouse)
                },
                |roles| custom_roles_verdict(roles),
            );
            if let Some(roles) = roles {
                rec.record_verdict(
                    DEFAULT_READER_SCOPE,
                    Category::DataAccess,
                    default_reader_verdict(&roles),
                );
            }
        }
    }

    if let Some(lakehouse) = ids.consumer_lakehouse_id.as_deref() {
        if state.may_probe(WorkspaceSide::Consumer) {
            let provider_ws = ids.provider_workspace_id.as_str();
            let shortcuts = rec.run(
                CONSUMER_SHORTCUTS,
                Category::DataAccess,
                || ctx.fabric.list_shortcuts(&ids.consumer_workspace_id, lakehouse),
                |shortcuts| shortcuts_verdict(shortcuts, provider_ws),
            );
            if let Some(shortcuts) = shortcuts {
                rec.record_verdict(
                    SHORTCUT_TARGET_PATHS,
                    Category::DataAccess,
                    target_paths_verdict(&shortcuts, provider_ws, ctx.shared_paths),
                );
            }
        }
    }
}

fn custom_roles_verdict(roles: &[DataAccessRole]) -> Verdict {
    let custom: Vec<&str> = roles
        .iter()
        .filter(|r| !r.is_default_reader())
        .map(|r| r.name.as_str())
        .collect();

    if custom.is_empty() {
        Verdict::fail("Provider lakehouse has no custom data access roles")
            .with_risk("Access is governed only by the default roles, which cover every folder")
            .with_recommendation("Run `fabric-wall provision data-access` to scope reads to the shared paths")
    } else {
        Verdict::pass(format!(
            "{} custom role(s): {}",
            custom.len(),
            join_limited(&custom, 10)
        ))
    }
}

fn default_reader_verdict(roles: &[DataAccessRole]) -> Verdict {
    match roles.iter().find(|r| r.is_default_reader()) {
        None => Verdict::pass("DefaultReader role has been removed"),
        Some(role) if role.members.is_empty() => {
            Verdict::pass("DefaultReader exists but has no members")
        }
        Some(role) if role.grants_everything() => {
            Verdict::fail("DefaultReader grants read on all paths and still has members")
                .with_risk("Anyone with item read access can read every provider table")
                .with_recommendation(
                    "Remove DefaultReader or strip its members once custom roles are in place",
                )
        }
        Some(role) => Verdict::pass(format!(
            "DefaultReader limited to: {}",
            join_limited(role.paths(), 10)
        )),
    }
}

fn shortcuts_verdict(shortcuts: &[Shortcut], provider_ws: &str) -> Verdict {
    let into_provider: Vec<String> = shortcuts
        .iter()
        .filter(|s| s.targets_workspace(provider_ws).is_some())
        .map(Shortcut::location)
        .collect();

    if into_provider.is_empty() {
        Verdict::fail(format!(
            "None of {} shortcut(s) in the consumer lakehouse point at the provider workspace",
            shortcuts.len()
        ))
        .with_risk("Consumers have no governed path to the shared data and may be granted direct access instead")
        .with_recommendation("Run `fabric-wall provision shortcuts`")
    } else {
        Verdict::pass(format!(
            "{} shortcut(s) into the provider: {}",
            into_provider.len(),
            join_limited(&into_provider, 10)
        ))
    }
}

fn target_paths_verdict(shortcuts: &[Shortcut], provider_ws: &str, shared: &[String]) -> Verdict {
    let outside: Vec<String> = shortcuts
        .iter()
        .filter_map(|s| s.targets_workspace(provider_ws).map(|t| (s, t)))
        .filter(|(_, target)| !is_shared(&target.path, shared))
        .map(|(s, target)| format!("{} -> {}", s.location(), target.path))
        .collect();

    if outside.is_empty() {
        Verdict::pass("Every provider shortcut targets a shared path")
    } else if shared.is_empty() {
        Verdict::fail(format!(
            "validation.shared_paths is empty, so {} provider shortcut(s) cannot be verified: {}",
            outside.len(),
            join_limited(&outside, 10)
        ))
        .with_risk("Shortcut targets are unreviewed")
        .with_recommendation("List the provider paths consumers may read in validation.shared_paths")
    } else {
        Verdict::fail(format!(
            "{} shortcut(s) target unshared provider paths: {}",
            outside.len(),
            join_limited(&outside, 10)
        ))
        .with_risk("Consumers can read provider data that was never meant to be shared")
        .with_recommendation("Delete these shortcuts or add their targets to validation.shared_paths")
    }
}

/// `path` equals a shared path or lies beneath one
fn is_shared(path: &str, shared: &[String]) -> bool {
    let path = path.trim_matches('/');
    shared.iter().any(|s| {
        let s = s.trim_matches('/');
        !s.is_empty()
            && (path.eq_ignore_ascii_case(s)
                || (path.get(..s.len()).is_some_and(|head| head.eq_ignore_ascii_case(s))
                    && path.as_bytes().get(s.len()) == Some(&b'/')))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::checks::fakes::*;
    use crate::application::checks::WallIds;
    use crate::domain::entities::ResultSet;

    fn ids() -> WallIds {
        WallIds {
            provider_workspace_id: PROVIDER_WS.to_string(),
            consumer_workspace_id: CONSUMER_WS.to_string(),
            provider_lakehouse_id: Some(PROVIDER_LH.to_string()),
            consumer_lakehouse_id: Some(CONSUMER_LH.to_string()),
        }
    }

    fn run_with(fabric: &FakeFabric, state: &RunState, shared: &[String]) -> ResultSet {
        let ids = ids();
        let powerbi = FakePowerBi::default();
        let ctx = SuiteContext {
            ids: &ids,
            token_present: true,
            fabric,
            powerbi: &powerbi,
            sql: None,
            overlap_allowlist: &[],
            shared_paths: shared,
            row_count_table: None,
        };
        let mut results = ResultSet::new();
        run(&ctx, state, &mut CheckRecorder::silent(&mut results));
        results
    }

    fn secured_fabric() -> FakeFabric {
        let fabric = FakeFabric::wall();
        fabric.data_access_roles.borrow_mut().insert(
            PROVIDER_LH.to_string(),
            vec![
                access_role("DefaultReader", &["*"], false),
                access_role("SharedOrders", &["Tables/orders"], true),
            ],
        );
        fabric.shortcuts.borrow_mut().insert(
            CONSUMER_LH.to_string(),
            vec![shortcut("orders", PROVIDER_WS, "Tables/orders")],
        );
        fabric
    }

    #[test]
    fn secured_lakehouses_pass() {
        let shared = vec!["Tables/orders".to_string()];
        let results = run_with(&secured_fabric(), &RunState::default(), &shared);
        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                DATA_ACCESS_ROLES,
                DEFAULT_READER_SCOPE,
                CONSUMER_SHORTCUTS,
                SHORTCUT_TARGET_PATHS
            ]
        );
        assert_eq!(results.failed(), 0, "{:?}", results);
    }

    #[test]
    fn default_reader_with_members_fails() {
        let fabric = secured_fabric();
        fabric.data_access_roles.borrow_mut().insert(
            PROVIDER_LH.to_string(),
            vec![access_role("DefaultReader", &["*"], true)],
        );
        let results = run_with(&fabric, &RunState::default(), &[]);
        let failed: Vec<_> = results.failures().map(|r| r.name.as_str()).collect();
        assert!(failed.contains(&DATA_ACCESS_ROLES));
        assert!(failed.contains(&DEFAULT_READER_SCOPE));
    }

    #[test]
    fn shortcut_outside_shared_paths_fails() {
        let shared = vec!["Tables/orders".to_string()];
        let fabric = secured_fabric();
        fabric
            .shortcuts
            .borrow_mut()
            .get_mut(CONSUMER_LH)
            .unwrap()
            .push(shortcut("salaries", PROVIDER_WS, "Tables/salaries"));

        let results = run_with(&fabric, &RunState::default(), &shared);
        let paths = results.iter().find(|r| r.name == SHORTCUT_TARGET_PATHS).unwrap();
        assert!(!paths.passed);
        assert!(paths.details.as_deref().unwrap().contains("Tables/salaries"));
    }

    #[test]
    fn inaccessible_consumer_skips_shortcut_checks() {
        let mut state = RunState::default();
        state.set_accessible(WorkspaceSide::Consumer, false);
        let results = run_with(&secured_fabric(), &state, &[]);
        assert!(results.iter().all(|r| r.name != CONSUMER_SHORTCUTS));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn shared_path_prefix_matches_on_segment_boundary() {
        let shared = vec!["Tables/orders".to_string()];
        assert!(is_shared("Tables/orders", &shared));
        assert!(is_shared("/Tables/orders/2024/", &shared));
        assert!(!is_shared("Tables/orders_archive", &shared));
        assert!(!is_shared("Tables", &shared));
    }
}
