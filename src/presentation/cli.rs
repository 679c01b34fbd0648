//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--config, --json, --color, --verbose) are inherited by all subcommands
//! - Identifier flags override values from the config file and environment

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::application::ProvisionStep;
use crate::config::Config;
use crate::domain::value_objects::SuiteId;
use crate::templates::SqlPolicy;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// fabric-wall - provision and validate segregated Fabric workspaces
#[derive(Parser, Debug)]
#[command(name = "fabric-wall")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Credentials: ACCESS_TOKEN (REST) and SQL_ACCESS_TOKEN (SQL endpoint).")]
pub struct Cli {
    /// Config file (default: ./fabric-wall.toml, then the user config)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit NDJSON events instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Workspace and lakehouse identifiers, overriding configuration
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetArgs {
    /// Entra tenant ID
    #[arg(long, value_name = "ID")]
    pub tenant_id: Option<String>,

    /// Provider (data owner) workspace ID
    #[arg(long, value_name = "ID")]
    pub provider_workspace: Option<String>,

    /// Consumer workspace ID
    #[arg(long, value_name = "ID")]
    pub consumer_workspace: Option<String>,

    /// Provider lakehouse item ID
    #[arg(long, value_name = "ID")]
    pub provider_lakehouse: Option<String>,

    /// Consumer lakehouse item ID
    #[arg(long, value_name = "ID")]
    pub consumer_lakehouse: Option<String>,
}

impl TargetArgs {
    /// Overlay flags onto a loaded configuration
    pub fn apply(&self, config: &mut Config) {
        let overrides = [
            (&self.tenant_id, &mut config.tenant_id),
            (&self.provider_workspace, &mut config.provider_workspace_id),
            (&self.consumer_workspace, &mut config.consumer_workspace_id),
            (&self.provider_lakehouse, &mut config.provider_lakehouse_id),
            (&self.consumer_lakehouse, &mut config.consumer_lakehouse_id),
        ];
        for (flag, slot) in overrides {
            if let Some(value) = flag {
                *slot = Some(value.clone());
            }
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the validation suites and write a JSON report
    Validate {
        /// Run only this suite
        #[arg(long, value_enum)]
        suite: Option<SuiteId>,

        /// Skip the SQL Security suite
        #[arg(long)]
        skip_sql: bool,

        /// Skip the Power BI suite
        #[arg(long)]
        skip_powerbi: bool,

        /// Directory for the results file
        #[arg(long, value_name = "DIR")]
        report_dir: Option<PathBuf>,

        /// Do not write a results file
        #[arg(long)]
        no_report: bool,

        #[command(flatten)]
        targets: TargetArgs,
    },

    /// Create workspaces, role assignments, data access roles and shortcuts
    Provision {
        /// Step to run
        #[arg(value_enum, default_value = "all")]
        step: ProvisionStep,

        /// Show what would change without calling any write API
        #[arg(long)]
        dry_run: bool,

        /// JSON payload for the provider lakehouse data access roles
        #[arg(long, value_name = "PATH")]
        roles_file: Option<PathBuf>,

        /// Provider path consumers may read (repeatable)
        #[arg(long = "shared-path", value_name = "PATH")]
        shared_paths: Vec<String>,

        /// Display name for the provider workspace
        #[arg(long, value_name = "NAME")]
        provider_workspace_name: Option<String>,

        /// Display name for the consumer workspace
        #[arg(long, value_name = "NAME")]
        consumer_workspace_name: Option<String>,

        #[command(flatten)]
        targets: TargetArgs,
    },

    /// Interactive configuration, then optional provisioning and validation
    Setup {
        /// Where to write the configuration (default: ./fabric-wall.toml)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Render a template file with the configured {{PLACEHOLDERS}}
        #[arg(long, value_name = "TEMPLATE")]
        render: Option<PathBuf>,

        /// Run `provision all` after writing the configuration
        #[arg(long)]
        provision: bool,

        /// Run `validate` after writing the configuration
        #[arg(long)]
        validate: bool,

        /// Skip the SQL Security suite when validating
        #[arg(long)]
        skip_sql: bool,

        /// Skip the Power BI suite when validating
        #[arg(long)]
        skip_powerbi: bool,

        /// Accept existing values without prompting
        #[arg(long)]
        no_input: bool,

        #[command(flatten)]
        targets: TargetArgs,
    },

    /// Render a bundled SQL security policy script
    SqlPolicy {
        #[arg(value_enum)]
        policy: SqlPolicy,

        /// Schema of the protected table
        #[arg(long, default_value = "dbo")]
        schema: String,

        /// Protected table
        #[arg(long)]
        table: String,

        /// Column(s) to filter on, expose, or mask (comma separated or repeated)
        #[arg(long = "column", value_delimiter = ',', value_name = "NAME")]
        columns: Vec<String>,

        /// User or group the policy applies to
        #[arg(long)]
        principal: String,

        /// Schema holding the RLS predicate function
        #[arg(long, default_value = "security")]
        security_schema: String,

        /// Write the script here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
