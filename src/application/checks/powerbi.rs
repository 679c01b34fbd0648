//! Power BI suite: sharing of consumer-side semantic models

use super::{join_limited, RunState, SuiteContext};
use crate::application::recorder::{CheckRecorder, Verdict};
use crate::config::WorkspaceSide;
use crate::domain::ports::{Dataset, DatasetUser};
use crate::domain::services::principal_overlap;
use crate::domain::value_objects::Category;
use crate::error::ApiError;

pub const CONSUMER_DATASETS: &str = "Consumer Datasets";
pub const DATASET_RESHARE: &str = "Dataset Reshare Permission";
pub const DATASET_BUILD: &str = "Dataset Build Permission";

/// A dataset with its permission entries
type Grants = Vec<(Dataset, Vec<DatasetUser>)>;

pub fn run(ctx: &SuiteContext<'_>, state: &RunState, rec: &mut CheckRecorder<'_>) {
    if !state.may_probe(WorkspaceSide::Consumer) {
        return;
    }
    let workspace = ctx.ids.consumer_workspace_id.as_str();

    let Some(datasets) = rec.run(
        CONSUMER_DATASETS,
        Category::PowerBi,
        || ctx.powerbi.list_datasets(workspace),
        |datasets| {
            Verdict::pass(format!(
                "{} dataset(s) in the consumer workspace",
                datasets.len()
            ))
        },
    ) else {
        return;
    };

    let Some(grants) = rec.run(
        DATASET_RESHARE,
        Category::PowerBi,
        || collect_grants(ctx, workspace, datasets),
        |grants| reshare_verdict(grants),
    ) else {
        return;
    };

    rec.run(
        DATASET_BUILD,
        Category::PowerBi,
        || provider_principals(ctx, state),
        |provider| build_verdict(&grants, provider, ctx.overlap_allowlist),
    );
}

fn collect_grants(
    ctx: &SuiteContext<'_>,
    workspace: &str,
    datasets: Vec<Dataset>,
) -> Result<Grants, ApiError> {
    datasets
        .into_iter()
        .map(|dataset| {
            let users = ctx.powerbi.list_dataset_users(workspace, &dataset.id)?;
            Ok((dataset, users))
        })
        .collect()
}

/// Object IDs and UPNs of provider role holders, from the isolation
/// suite when it ran
fn provider_principals(ctx: &SuiteContext<'_>, state: &RunState) -> Result<Vec<String>, ApiError> {
    let roles = match &state.provider_roles {
        Some(roles) => roles.clone(),
        None => ctx
            .fabric
            .list_role_assignments(&ctx.ids.provider_workspace_id)?,
    };
    Ok(roles
        .iter()
        .flat_map(|r| r.principal.identifiers())
        .map(str::to_string)
        .collect())
}

fn reshare_verdict(grants: &Grants) -> Verdict {
    let resharers: Vec<String> = grants
        .iter()
        .flat_map(|(dataset, users)| {
            users
                .iter()
                .filter(|u| u.can_reshare())
                .map(move |u| format!("{} on '{}'", u.label(), dataset.name))
        })
        .collect();

    if grants.is_empty() {
        Verdict::pass("No datasets to inspect")
    } else if resharers.is_empty() {
        Verdict::pass(format!("No reshare grants on {} dataset(s)", grants.len()))
    } else {
        Verdict::fail(format!(
            "{} reshare grant(s): {}",
            resharers.len(),
            join_limited(&resharers, 10)
        ))
        .with_risk("Holders can pass shared data on to people outside the consumer boundary")
        .with_recommendation("Remove Reshare from dataset permissions; grant Read only")
    }
}

fn build_verdict(grants: &Grants, provider: &[String], allowlist: &[String]) -> Verdict {
    let builders: Vec<&str> = grants
        .iter()
        .flat_map(|(_, users)| users.iter())
        .filter(|u| u.can_build())
        .map(|u| u.identifier.as_str())
        .collect();

    let overlap = principal_overlap(
        provider.iter().map(String::as_str),
        builders.iter().copied(),
        allowlist.iter().map(String::as_str),
    );

    if overlap.is_clean() {
        Verdict::pass(format!(
            "{} build grant(s), none held by provider principals",
            builders.len()
        ))
    } else {
        Verdict::fail(format!(
            "Provider principals with Build on consumer datasets: {}",
            join_limited(&overlap.shared, 10)
        ))
        .with_risk("Provider identities can author reports that join shared and unshared data")
        .with_recommendation("Revoke Build from provider principals on consumer datasets")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::checks::fakes::*;
    use crate::application::checks::WallIds;
    use crate::domain::entities::ResultSet;
    use crate::domain::ports::RoleAssignment;
    use crate::domain::value_objects::WorkspaceRole;

    fn run_with(powerbi: &FakePowerBi, state: &RunState) -> ResultSet {
        let ids = WallIds {
            provider_workspace_id: PROVIDER_WS.to_string(),
            consumer_workspace_id: CONSUMER_WS.to_string(),
            provider_lakehouse_id: None,
            consumer_lakehouse_id: None,
        };
        let fabric = FakeFabric::wall();
        let ctx = SuiteContext {
            ids: &ids,
            token_present: true,
            fabric: &fabric,
            powerbi,
            sql: None,
            overlap_allowlist: &[],
            shared_paths: &[],
            row_count_table: None,
        };
        let mut results = ResultSet::new();
        run(&ctx, state, &mut CheckRecorder::silent(&mut results));
        results
    }

    #[test]
    fn read_only_grants_pass() {
        let powerbi = FakePowerBi::default()
            .with_dataset("d1", vec![dataset_user("cons-readers", "Read")]);
        let results = run_with(&powerbi, &RunState::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results.failed(), 0);
    }

    #[test]
    fn reshare_grant_fails() {
        let powerbi = FakePowerBi::default()
            .with_dataset("d1", vec![dataset_user("cons-readers", "ReadReshare")]);
        let results = run_with(&powerbi, &RunState::default());
        let reshare = results.iter().find(|r| r.name == DATASET_RESHARE).unwrap();
        assert!(!reshare.passed);
    }

    #[test]
    fn build_grant_to_provider_principal_fails() {
        let powerbi = FakePowerBi::default()
            .with_dataset("d1", vec![dataset_user("prov-admins", "ReadExplore")]);
        let results = run_with(&powerbi, &RunState::default());
        let build = results.iter().find(|r| r.name == DATASET_BUILD).unwrap();
        assert!(!build.passed);
        assert!(build.details.as_deref().unwrap().contains("prov-admins"));
    }

    #[test]
    fn dataset_listing_error_is_recorded_once() {
        let powerbi = FakePowerBi {
            failure: Some(ApiError::Forbidden {
                body: "PowerBINotAuthorized".to_string(),
            }),
            ..FakePowerBi::default()
        };
        let results = run_with(&powerbi, &RunState::default());
        assert_eq!(results.len(), 1);
        assert!(results.as_slice()[0]
            .details
            .as_deref()
            .unwrap()
            .starts_with("Access denied"));
    }

    #[test]
    fn build_grant_to_provider_user_by_upn_fails() {
        let admin: RoleAssignment = serde_json::from_value(serde_json::json!({
            "id": "ra-9",
            "principal": {
                "id": "6a1b0000-0000-0000-0000-000000000001",
                "type": "User",
                "userDetails": { "userPrincipalName": "alice@contoso.com" }
            },
            "role": "Admin"
        }))
        .unwrap();
        assert_eq!(admin.role, WorkspaceRole::Admin);
        let state = RunState {
            provider_roles: Some(vec![admin]),
            ..RunState::default()
        };
        let mut alice = dataset_user("Alice@Contoso.com", "ReadExplore");
        alice.principal_type = "User".to_string();
        let powerbi = FakePowerBi::default().with_dataset("d1", vec![alice]);

        let results = run_with(&powerbi, &state);
        let build = results.iter().find(|r| r.name == DATASET_BUILD).unwrap();
        assert!(!build.passed, "{:?}", build);
        assert!(build
            .details
            .as_deref()
            .unwrap()
            .to_lowercase()
            .contains("alice@contoso.com"));
    }
}
