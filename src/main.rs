//! fabric-wall CLI - provision and validate segregated Fabric workspaces
//!
//! Usage: fabric-wall <COMMAND>
//!
//! Commands:
//!   validate    Run the validation suites and write a JSON report
//!   provision   Create workspaces, role assignments, data access roles and shortcuts
//!   setup       Interactive configuration, then optional provisioning and validation
//!   sql-policy  Render a bundled SQL security policy script

mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fabric_wall::presentation::{Cli, Commands};
use fabric_wall::templates::PolicyParams;

use commands::provision::ProvisionArgs;
use commands::setup::SetupArgs;
use commands::sql_policy::SqlPolicyArgs;
use commands::validate::ValidateArgs;
use commands::GlobalArgs;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    if let Err(err) = run(cli) {
        ui::error::print_error(&err, json);
        std::process::exit(1);
    }
}

/// Logs go to stderr so `--json` stdout stays NDJSON. `RUST_LOG` wins
/// over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "fabric_wall=debug,warn",
        _ => "fabric_wall=trace,debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let globals = GlobalArgs {
        config: cli.config,
        json: cli.json,
        color: cli.color,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Validate {
            suite,
            skip_sql,
            skip_powerbi,
            report_dir,
            no_report,
            targets,
        } => commands::validate::cmd_validate(
            &globals,
            ValidateArgs {
                suite,
                skip_sql,
                skip_powerbi,
                report_dir,
                no_report,
                targets,
            },
        ),
        Commands::Provision {
            step,
            dry_run,
            roles_file,
            shared_paths,
            provider_workspace_name,
            consumer_workspace_name,
            targets,
        } => commands::provision::cmd_provision(
            &globals,
            ProvisionArgs {
                step,
                dry_run,
                roles_file,
                shared_paths,
                provider_workspace_name,
                consumer_workspace_name,
                targets,
            },
        ),
        Commands::Setup {
            output,
            render,
            provision,
            validate,
            skip_sql,
            skip_powerbi,
            no_input,
            targets,
        } => commands::setup::cmd_setup(
            &globals,
            SetupArgs {
                output,
                render,
                provision,
                validate,
                skip_sql,
                skip_powerbi,
                no_input,
                targets,
            },
        ),
        Commands::SqlPolicy {
            policy,
            schema,
            table,
            columns,
            principal,
            security_schema,
            output,
        } => commands::sql_policy::cmd_sql_policy(
            &globals,
            SqlPolicyArgs {
                policy,
                params: PolicyParams {
                    schema,
                    table,
                    columns,
                    principal,
                    security_schema,
                },
                output,
            },
        ),
    }
}
