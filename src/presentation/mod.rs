//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating adapters and use cases from configuration
//!
//! ## Structure
//!
//! - `cli` - Command line definition
//! - `factory` - Builds the REST/SQL clients and the report store

pub mod cli;
pub mod factory;

pub use cli::{Cli, ColorWhen, Commands, TargetArgs};
pub use factory::{create_report_store, Services};
