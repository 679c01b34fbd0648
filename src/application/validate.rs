//! Validate Use Case
//!
//! Runs the suites in their fixed order, records every check into one
//! [`ResultSet`] and produces the per-suite outcomes and the summary.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::checks::{
    data_access, identity, isolation, powerbi, sql_security, RunState, SuiteContext, WallIds,
};
use super::recorder::CheckRecorder;
use crate::config::Config;
use crate::domain::entities::{CheckResult, ResultSet, SuiteResult, ValidationReport};
use crate::domain::services::RunSummary;
use crate::domain::value_objects::SuiteId;
use crate::error::{WallError, WallResult};

/// Which suites run and why the others do not.
///
/// Resolved once from configuration and command-line flags, then handed to
/// every entry point that validates (`validate`, `setup --validate`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteSelection {
    pub only: Option<SuiteId>,
    pub skip_sql: bool,
    pub skip_powerbi: bool,
    pub has_sql_connection: bool,
    pub has_lakehouses: bool,
}

impl SuiteSelection {
    /// Flags can only add skips; a `skip_*` set in config stays set.
    pub fn resolve(
        config: &Config,
        only: Option<SuiteId>,
        skip_sql: bool,
        skip_powerbi: bool,
    ) -> Self {
        Self {
            only,
            skip_sql: skip_sql || config.validation.skip_sql,
            skip_powerbi: skip_powerbi || config.validation.skip_powerbi,
            has_sql_connection: config
                .sql_connection_string
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty()),
            has_lakehouses: config.provider_lakehouse_id.is_some()
                && config.consumer_lakehouse_id.is_some(),
        }
    }

    /// `Some(reason)` when `suite` must not run
    pub fn skip_reason(&self, suite: SuiteId) -> Option<&'static str> {
        if self.only.is_some_and(|only| only != suite) {
            return Some("not selected");
        }
        match suite {
            SuiteId::Sql if self.skip_sql => Some("skipped by --skip-sql"),
            SuiteId::Sql if !self.has_sql_connection => Some("no SQL connection string configured"),
            SuiteId::PowerBi if self.skip_powerbi => Some("skipped by --skip-powerbi"),
            SuiteId::DataAccess if !self.has_lakehouses => {
                Some("provider_lakehouse_id and consumer_lakehouse_id are not both configured")
            }
            _ => None,
        }
    }

    /// Report label: `validation` for a full run, else the suite slug
    pub fn label(&self) -> &'static str {
        match self.only {
            Some(suite) => suite.slug(),
            None => "validation",
        }
    }
}

/// Streamed to the caller while the run progresses
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'e> {
    SuiteStarted(SuiteId),
    Check(&'e CheckResult),
    SuiteFinished(&'e SuiteResult),
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct ValidationRun {
    pub label: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: ResultSet,
    pub suites: Vec<SuiteResult>,
    pub summary: RunSummary,
}

impl ValidationRun {
    pub fn into_report(self) -> ValidationReport {
        ValidationReport {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            label: self.label,
            started_at: self.started_at,
            finished_at: self.finished_at,
            summary: self.summary,
            suites: self.suites,
            results: self.results.into_vec(),
        }
    }
}

/// Pull the mandatory workspace IDs out of configuration
pub fn wall_ids(config: &Config) -> WallResult<WallIds> {
    let required = |value: &Option<String>, name: &str, flag: &str| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| WallError::MissingParameter {
                name: name.to_string(),
                flag: flag.to_string(),
            })
    };
    Ok(WallIds {
        provider_workspace_id: required(
            &config.provider_workspace_id,
            "provider_workspace_id",
            "provider-workspace",
        )?,
        consumer_workspace_id: required(
            &config.consumer_workspace_id,
            "consumer_workspace_id",
            "consumer-workspace",
        )?,
        provider_lakehouse_id: config.provider_lakehouse_id.clone(),
        consumer_lakehouse_id: config.consumer_lakehouse_id.clone(),
    })
}

/// Validate Use Case
pub struct ValidateUseCase<'a> {
    ctx: SuiteContext<'a>,
    selection: SuiteSelection,
}

impl<'a> ValidateUseCase<'a> {
    pub fn new(ctx: SuiteContext<'a>, selection: SuiteSelection) -> Self {
        Self { ctx, selection }
    }

    pub fn execute(&self) -> ValidationRun {
        self.execute_with_callback(|_| {})
    }

    /// Execute, streaming each suite start, check and suite outcome
    pub fn execute_with_callback<F>(&self, mut on_event: F) -> ValidationRun
    where
        F: FnMut(RunEvent<'_>),
    {
        let started_at = Utc::now();
        let mut results = ResultSet::new();
        let mut suites = Vec::with_capacity(SuiteId::ORDERED.len());
        let mut state = RunState::default();

        for suite in SuiteId::ORDERED {
            if let Some(reason) = self.skip_reason(suite) {
                debug!(suite = %suite, reason, "suite skipped");
                let skipped = SuiteResult::skipped(suite.display_name(), reason);
                on_event(RunEvent::SuiteFinished(&skipped));
                suites.push(skipped);
                continue;
            }

            on_event(RunEvent::SuiteStarted(suite));
            let start = results.len();
            {
                let mut observer = |r: &CheckResult| on_event(RunEvent::Check(r));
                let mut recorder = CheckRecorder::new(&mut results, &mut observer);
                self.run_suite(suite, &mut state, &mut recorder);
            }

            let recorded = results.since(start);
            let outcome = if recorded.is_empty() {
                SuiteResult::skipped(suite.display_name(), "prerequisite checks failed")
            } else {
                SuiteResult::completed(suite.display_name(), recorded)
            };
            info!(suite = %suite, status = %outcome.status, "suite finished");
            on_event(RunEvent::SuiteFinished(&outcome));
            suites.push(outcome);
        }

        let summary = RunSummary::from_results(&results).with_suites(&suites);
        ValidationRun {
            label: self.selection.label().to_string(),
            started_at,
            finished_at: Utc::now(),
            results,
            suites,
            summary,
        }
    }

    fn skip_reason(&self, suite: SuiteId) -> Option<&'static str> {
        self.selection.skip_reason(suite).or_else(|| {
            (suite == SuiteId::Sql && self.ctx.sql.is_none()).then_some("no SQL endpoint available")
        })
    }

    fn run_suite(&self, suite: SuiteId, state: &mut RunState, rec: &mut CheckRecorder<'_>) {
        let ctx = &self.ctx;
        match suite {
            SuiteId::Identity => identity::run(ctx, rec),
            SuiteId::Isolation => isolation::run(ctx, state, rec),
            SuiteId::DataAccess => data_access::run(ctx, state, rec),
            SuiteId::Sql => {
                if let Some(sql) = ctx.sql {
                    sql_security::run(ctx, sql, rec);
                }
            }
            SuiteId::PowerBi => powerbi::run(ctx, state, rec),
        }
    }
}
