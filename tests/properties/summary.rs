//! Property tests for run summaries and the exit-code contract.

use proptest::prelude::*;

use fabric_wall::domain::entities::{CheckResult, ResultSet};
use fabric_wall::domain::services::RunSummary;

fn check_result() -> impl Strategy<Value = CheckResult> {
    let category = prop_oneof![
        Just("Identity"),
        Just("Isolation"),
        Just("Data Access"),
        Just("SQL Security"),
        Just("Power BI"),
    ];
    ("[A-Za-z ]{1,24}", category, any::<bool>()).prop_map(|(name, category, passed)| {
        if passed {
            CheckResult::pass(name, category, "ok")
        } else {
            CheckResult::fail(name, category, "not ok")
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: every recorded check is counted exactly once.
    #[test]
    fn property_totals_add_up(results in proptest::collection::vec(check_result(), 0..40)) {
        let summary = RunSummary::from_results(&results);

        prop_assert_eq!(summary.total, results.len());
        prop_assert_eq!(summary.passed + summary.failed, summary.total);
        prop_assert_eq!(summary.failed, results.iter().filter(|r| !r.passed).count());

        let per_category: usize = summary
            .by_category
            .values()
            .map(|c| c.passed + c.failed)
            .sum();
        prop_assert_eq!(per_category, summary.total);
    }

    /// PROPERTY: exit code is 0 exactly when nothing failed.
    #[test]
    fn property_exit_code_tracks_failures(results in proptest::collection::vec(check_result(), 0..40)) {
        let summary = RunSummary::from_results(&results);
        let any_failed = results.iter().any(|r| !r.passed);

        prop_assert_eq!(summary.exit_code() == 0, !any_failed);
        prop_assert_eq!(summary.is_success(), !any_failed);
    }

    /// PROPERTY: the result set preserves recording order and agrees with the summary.
    #[test]
    fn property_result_set_matches_summary(results in proptest::collection::vec(check_result(), 0..40)) {
        let mut set = ResultSet::new();
        for result in &results {
            set.push(result.clone());
        }
        let summary = RunSummary::from_results(set.iter());

        prop_assert_eq!(set.passed(), summary.passed);
        prop_assert_eq!(set.failed(), summary.failed);
        let names: Vec<&str> = set.iter().map(|r| r.name.as_str()).collect();
        let expected: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        prop_assert_eq!(names, expected);
    }
}
