//! Validate command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use fabric_wall::application::{wall_ids, RunEvent, SuiteContext, SuiteSelection, ValidateUseCase};
use fabric_wall::config::Config;
use fabric_wall::domain::ports::ReportStore;
use fabric_wall::domain::value_objects::SuiteId;
use fabric_wall::presentation::{create_report_store, Services, TargetArgs};

use super::GlobalArgs;
use crate::ui::blocks::check_item::CheckLine;
use crate::ui::blocks::summary::RunSummaryBlock;
use crate::ui::context::UiContext;
use crate::ui::json::events::{CheckEvent, CompleteEvent, StartEvent, SuiteEvent};
use crate::ui::views::validate as view;

#[derive(Debug, Clone, Default)]
pub struct ValidateArgs {
    pub suite: Option<SuiteId>,
    pub skip_sql: bool,
    pub skip_powerbi: bool,
    pub report_dir: Option<PathBuf>,
    pub no_report: bool,
    pub targets: TargetArgs,
}

pub fn cmd_validate(globals: &GlobalArgs, args: ValidateArgs) -> Result<()> {
    let (loaded, ui) = globals.load(&args.targets)?;
    let mut config = loaded.config;
    if let Some(dir) = args.report_dir {
        config.validation.report_dir = dir;
    }

    let selection = SuiteSelection::resolve(&config, args.suite, args.skip_sql, args.skip_powerbi);
    let source = loaded.source.as_deref();
    if !run_validation(&config, selection, source, &ui, !args.no_report)? {
        std::process::exit(1);
    }
    Ok(())
}

/// Run the suites and print or stream the outcome. Returns whether every
/// check passed.
pub(crate) fn run_validation(
    config: &Config,
    selection: SuiteSelection,
    source: Option<&Path>,
    ui: &UiContext,
    write_report: bool,
) -> Result<bool> {
    let ids = wall_ids(config)?;
    let services = Services::from_env(config)?;
    let fabric = services.fabric();
    let powerbi = services.powerbi();

    let ctx = SuiteContext {
        ids: &ids,
        token_present: services.has_token(),
        fabric: &fabric,
        powerbi: &powerbi,
        sql: services.sql(),
        overlap_allowlist: &config.validation.overlap_allowlist,
        shared_paths: &config.validation.shared_paths,
        row_count_table: config.validation.row_count_table.as_deref(),
    };

    if ui.json {
        let _ = crate::ui::json::emit_event(
            &StartEvent::new("validate").with_label(selection.label()),
        );
    } else {
        let source = source.map(|p| p.display().to_string());
        print!(
            "{}",
            view::render_validate_header(&ids, &selection, source.as_deref(), ui.color, ui.unicode)
        );
    }

    let use_case = ValidateUseCase::new(ctx, selection);
    let run = use_case.execute_with_callback(|event| on_event(event, ui));

    let report = run.into_report();
    let saved = if write_report {
        let store = create_report_store(config);
        let path = store
            .save(&report)
            .with_context(|| format!("failed to write report to {}", config.validation.report_dir.display()))?;
        Some(path)
    } else {
        None
    };
    let saved_display = saved.as_ref().map(|p| p.display().to_string());

    if ui.json {
        let _ = crate::ui::json::emit_event(
            &CompleteEvent::new("validate", report.is_success())
                .with_summary(&report.summary)
                .with_report(saved_display),
        );
        return Ok(report.is_success());
    }

    let block = RunSummaryBlock {
        summary: &report.summary,
        suites: &report.suites,
        failures: report.results.iter().filter(|r| !r.passed).collect(),
    };
    println!();
    print!("{}", block.render(ui.color, ui.unicode));
    if let Some(path) = &saved_display {
        print!("{}", view::render_report_saved(path, ui.color, ui.unicode));
    }

    if ui.annotate() {
        for failure in report.results.iter().filter(|r| !r.passed) {
            println!("{}", crate::ui::ci::check_annotation(failure));
        }
    }

    Ok(report.is_success())
}

fn on_event(event: RunEvent<'_>, ui: &UiContext) {
    if ui.json {
        let _ = match event {
            RunEvent::SuiteStarted(_) => Ok(()),
            RunEvent::Check(result) => crate::ui::json::emit_event(&CheckEvent::new(result)),
            RunEvent::SuiteFinished(suite) => crate::ui::json::emit_event(&SuiteEvent::new(suite)),
        };
        return;
    }

    match event {
        RunEvent::SuiteStarted(suite) => {
            print!("{}", view::render_suite_heading(suite, ui.color));
        }
        RunEvent::Check(result) => {
            print!(
                "{}",
                CheckLine::new(result).render(ui.verbose(), ui.color, ui.unicode)
            );
        }
        RunEvent::SuiteFinished(suite) => {
            if let Some(line) = view::render_suite_skipped(suite, ui.color, ui.unicode) {
                print!("{}", line);
            }
        }
    }
}
