//! SQL analytics endpoint adapter (TDS via tiberius)
//!
//! The port is synchronous; a current-thread tokio runtime drives the
//! async driver. The connection is opened on first query and reused.

use std::cell::RefCell;
use std::time::Duration;

use tiberius::{AuthMethod, Client, ColumnData, Config};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};

use crate::domain::ports::SqlEndpoint;
use crate::error::ApiError;

pub const SQL_ACCESS_TOKEN_ENV: &str = "SQL_ACCESS_TOKEN";

type TdsClient = Client<Compat<TcpStream>>;

/// Keys the ADO parser reads a SQL login from. Other authentication
/// keywords (`Authentication=`, integrated security) give no usable
/// credentials to the driver and fall through to the AAD token.
const USER_KEYS: &[&str] = &["user id", "uid", "user", "username"];
const PASSWORD_KEYS: &[&str] = &["password", "pwd"];

/// SQL token from `SQL_ACCESS_TOKEN`, falling back to `ACCESS_TOKEN`
pub fn sql_token_from_env() -> Option<String> {
    [SQL_ACCESS_TOKEN_ENV, crate::infrastructure::http::ACCESS_TOKEN_ENV]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

/// True when the ADO string carries both a user ID and a password
pub fn has_credentials(connection_string: &str) -> bool {
    let has_value = |keys: &[&str]| {
        connection_string
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| {
                let key = key.trim().to_ascii_lowercase();
                keys.contains(&key.as_str()) && !value.trim().is_empty()
            })
    };
    has_value(USER_KEYS) && has_value(PASSWORD_KEYS)
}

fn sql_error(e: impl std::fmt::Display) -> ApiError {
    ApiError::Sql(e.to_string())
}

pub struct TdsSqlEndpoint {
    runtime: Runtime,
    config: Config,
    timeout: Duration,
    client: RefCell<Option<TdsClient>>,
}

impl TdsSqlEndpoint {
    /// Build from an ADO-style connection string. Without credentials in
    /// the string, `token` is used as an AAD access token.
    pub fn new(
        connection_string: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let mut config = Config::from_ado_string(connection_string).map_err(sql_error)?;
        if !has_credentials(connection_string) {
            let token = token.ok_or_else(|| {
                ApiError::Sql(format!(
                    "connection string has no credentials and neither {} nor ACCESS_TOKEN is set",
                    SQL_ACCESS_TOKEN_ENV
                ))
            })?;
            config.authentication(AuthMethod::AADToken(token));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(sql_error)?;

        Ok(Self {
            runtime,
            config,
            timeout,
            client: RefCell::new(None),
        })
    }

    async fn connect(config: Config) -> Result<TdsClient, ApiError> {
        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(sql_error)?;
        tcp.set_nodelay(true).map_err(sql_error)?;

        match Client::connect(config.clone(), tcp.compat_write()).await {
            Ok(client) => Ok(client),
            // Gateway redirect to the node that owns the database
            Err(tiberius::error::Error::Routing { host, port }) => {
                debug!(%host, port, "following SQL routing redirect");
                let mut routed = config;
                routed.host(&host);
                routed.port(port);
                let tcp = TcpStream::connect(routed.get_addr())
                    .await
                    .map_err(sql_error)?;
                tcp.set_nodelay(true).map_err(sql_error)?;
                Client::connect(routed, tcp.compat_write())
                    .await
                    .map_err(sql_error)
            }
            Err(e) => Err(sql_error(e)),
        }
    }
}

impl SqlEndpoint for TdsSqlEndpoint {
    fn query_scalar(&self, sql: &str) -> Result<i64, ApiError> {
        debug!(query = sql, "running SQL query");
        let mut slot = self.client.borrow_mut();
        let timeout = self.timeout;

        self.runtime.block_on(async {
            if slot.is_none() {
                info!(addr = %self.config.get_addr(), "connecting to SQL endpoint");
                let client = tokio::time::timeout(timeout, Self::connect(self.config.clone()))
                    .await
                    .map_err(|_| ApiError::Sql(format!("connection timed out after {}s", timeout.as_secs())))??;
                *slot = Some(client);
            }
            let client = slot
                .as_mut()
                .ok_or_else(|| ApiError::Sql("no connection".to_string()))?;

            let row = tokio::time::timeout(timeout, async {
                client.query(sql, &[]).await?.into_row().await
            })
            .await
            .map_err(|_| ApiError::Sql(format!("query timed out after {}s", timeout.as_secs())))?
            .map_err(sql_error)?
            .ok_or_else(|| ApiError::Sql("query returned no rows".to_string()))?;

            scalar(row.into_iter().next())
        })
    }
}

fn scalar(value: Option<ColumnData<'static>>) -> Result<i64, ApiError> {
    match value {
        Some(ColumnData::I64(Some(v))) => Ok(v),
        Some(ColumnData::I32(Some(v))) => Ok(v.into()),
        Some(ColumnData::I16(Some(v))) => Ok(v.into()),
        Some(ColumnData::U8(Some(v))) => Ok(v.into()),
        other => Err(ApiError::Sql(format!(
            "expected an integer result, got {:?}",
            other
        ))),
    }
}
