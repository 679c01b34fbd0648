//! Service Factory
//!
//! Creates the infrastructure behind the ports from configuration.
//! This is the dependency injection point for the application.

use std::time::Duration;

use crate::config::Config;
use crate::domain::ports::SqlEndpoint;
use crate::error::{ApiError, WallError, WallResult};
use crate::infrastructure::{
    sql_token_from_env, token_from_env, FsReportStore, HttpClient, RestFabricApi,
    RestPowerBiApi, TdsSqlEndpoint,
};

/// Stands in for the SQL endpoint when it could not be set up, so the
/// failure shows up as a failed connectivity check.
struct UnavailableSql(ApiError);

impl SqlEndpoint for UnavailableSql {
    fn query_scalar(&self, _sql: &str) -> Result<i64, ApiError> {
        Err(self.0.clone())
    }
}

/// Owns the clients; the API adapters borrow from it.
pub struct Services {
    http: HttpClient,
    sql: Option<Box<dyn SqlEndpoint>>,
    fabric_base_url: String,
    powerbi_base_url: String,
    ping_timeout: Duration,
}

impl Services {
    /// Credentials from `ACCESS_TOKEN` / `SQL_ACCESS_TOKEN`
    pub fn from_env(config: &Config) -> WallResult<Self> {
        Self::new(config, token_from_env(), sql_token_from_env())
    }

    pub fn new(
        config: &Config,
        token: Option<String>,
        sql_token: Option<String>,
    ) -> WallResult<Self> {
        let timeout = Duration::from_secs(config.api.timeout_secs.max(1));
        let http = HttpClient::new(token, timeout).map_err(|source| WallError::Api {
            context: "building HTTP client".to_string(),
            source,
        })?;

        let sql = config.sql_connection_string.as_deref().map(|conn| {
            match TdsSqlEndpoint::new(conn, sql_token, timeout) {
                Ok(endpoint) => Box::new(endpoint) as Box<dyn SqlEndpoint>,
                Err(e) => Box::new(UnavailableSql(e)),
            }
        });

        Ok(Self {
            http,
            sql,
            fabric_base_url: config.api.fabric_base_url.clone(),
            powerbi_base_url: config.api.powerbi_base_url.clone(),
            ping_timeout: Duration::from_secs(config.api.reachability_timeout_secs.max(1)),
        })
    }

    pub fn has_token(&self) -> bool {
        self.http.has_token()
    }

    pub fn fabric(&self) -> RestFabricApi<'_> {
        RestFabricApi::new(&self.http, self.fabric_base_url.clone(), self.ping_timeout)
    }

    pub fn powerbi(&self) -> RestPowerBiApi<'_> {
        RestPowerBiApi::new(&self.http, self.powerbi_base_url.clone())
    }

    pub fn sql(&self) -> Option<&dyn SqlEndpoint> {
        self.sql.as_deref()
    }
}

/// Report store rooted at `validation.report_dir`
pub fn create_report_store(config: &Config) -> FsReportStore {
    FsReportStore::new(&config.validation.report_dir)
}
