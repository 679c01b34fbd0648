//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `http` - Blocking REST client, bearer auth and pagination
//! - `fabric` / `powerbi` - REST implementations of the API ports
//! - `sql` - TDS implementation of the SQL endpoint port
//! - `report_store` - Atomic JSON report files

pub mod fabric;
pub mod http;
pub mod powerbi;
pub mod report_store;
pub mod sql;

pub use fabric::RestFabricApi;
pub use http::{token_from_env, HttpClient, ACCESS_TOKEN_ENV};
pub use powerbi::RestPowerBiApi;
pub use report_store::FsReportStore;
pub use sql::{sql_token_from_env, TdsSqlEndpoint, SQL_ACCESS_TOKEN_ENV};
