//! Identity suite: credential presence and API reachability

use super::SuiteContext;
use crate::application::recorder::{CheckRecorder, Verdict};
use crate::domain::value_objects::Category;

pub const ACCESS_TOKEN: &str = "Access Token";
pub const API_REACHABILITY: &str = "API Reachability";

pub fn run(ctx: &SuiteContext<'_>, rec: &mut CheckRecorder<'_>) {
    if ctx.token_present {
        rec.record_verdict(
            ACCESS_TOKEN,
            Category::Identity,
            Verdict::pass("ACCESS_TOKEN is set"),
        );
    } else {
        rec.record_verdict(
            ACCESS_TOKEN,
            Category::Identity,
            Verdict::fail("ACCESS_TOKEN is not set")
                .with_risk("No check below can observe the platform")
                .with_recommendation(
                    "Export ACCESS_TOKEN, e.g. `az account get-access-token --resource https://api.fabric.microsoft.com`",
                ),
        );
    }

    rec.run(
        API_REACHABILITY,
        Category::Identity,
        || ctx.fabric.ping(),
        |_| Verdict::pass("Fabric API answered an authenticated request"),
    );
}
