//! Blocking REST client shared by the Fabric and Power BI adapters.
//!
//! Every request carries the bearer token from `ACCESS_TOKEN`. A missing
//! token is reported per call as `ApiError::MissingToken` so validation
//! can keep going and record it as a failed check.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ApiError;

pub const ACCESS_TOKEN_ENV: &str = "ACCESS_TOKEN";

/// Upper bound on list pages followed for a single call.
const MAX_PAGES: usize = 500;

/// Error bodies longer than this are cut in messages.
const MAX_ERROR_BODY: usize = 500;

/// Read the REST bearer token from the environment. Blank counts as absent.
pub fn token_from_env() -> Option<String> {
    std::env::var(ACCESS_TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// One page of a list endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(default)]
    continuation_uri: Option<String>,
}

/// Platform error envelopes, Fabric first then Power BI
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FabricErrorBody {
    error_code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct PowerBiErrorBody {
    error: PowerBiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct PowerBiErrorDetail {
    code: String,
    #[serde(default)]
    message: String,
}

/// `code: message` from a platform error body, or the trimmed raw body.
pub fn error_text(body: &str) -> String {
    let (code, message) = if let Ok(e) = serde_json::from_str::<FabricErrorBody>(body) {
        (e.error_code, e.message)
    } else if let Ok(e) = serde_json::from_str::<PowerBiErrorBody>(body) {
        (e.error.code, e.error.message)
    } else {
        let raw = body.trim();
        return match raw.char_indices().nth(MAX_ERROR_BODY) {
            Some((cut, _)) => format!("{}...", &raw[..cut]),
            None => raw.to_string(),
        };
    };

    if message.is_empty() {
        code
    } else {
        format!("{}: {}", code, message)
    }
}

/// Blocking HTTP client with bearer authentication.
pub struct HttpClient {
    client: Client,
    token: Option<String>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub fn new(token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10).min(timeout))
            .timeout(timeout)
            .user_agent(concat!("fabric-wall/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, token })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Send and turn any non-2xx status into a classified error.
    fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, ApiError> {
        let response = builder.send().map_err(|e| {
            if e.is_timeout() {
                ApiError::Transport(format!("{} timed out", what))
            } else {
                ApiError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), request = %what, "response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), error_text(&body)))
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response
            .text()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        trace!(body = %text, "response body");
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, url)?;
        Self::decode(self.send(builder, &format!("GET {}", url))?)
    }

    /// GET with a per-request timeout, discarding the body.
    pub fn probe(&self, url: &str, timeout: Duration) -> Result<(), ApiError> {
        let builder = self.request(Method::GET, url)?.timeout(timeout);
        self.send(builder, &format!("GET {}", url)).map(|_| ())
    }

    /// GET every page of a `{"value": [...], "continuationUri": ...}` listing.
    pub fn get_all<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());
        let mut pages = 0;

        while let Some(current) = next.take() {
            let page: Page<T> = self.get_json(&current)?;
            items.extend(page.value);
            pages += 1;

            next = page
                .continuation_uri
                .filter(|uri| !uri.is_empty() && *uri != current);
            if pages >= MAX_PAGES && next.is_some() {
                return Err(ApiError::Decode(format!(
                    "{} returned more than {} pages",
                    url, MAX_PAGES
                )));
            }
        }
        Ok(items)
    }

    /// POST/PUT a JSON body and decode the JSON response.
    pub fn send_json<B, T>(&self, method: Method, url: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let what = format!("{} {}", method, url);
        let builder = self.request(method, url)?.json(body);
        Self::decode(self.send(builder, &what)?)
    }

    /// POST/PUT a JSON body and ignore whatever comes back.
    pub fn send_json_unit<B>(&self, method: Method, url: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let what = format!("{} {}", method, url);
        let builder = self.request(method, url)?.json(body);
        self.send(builder, &what).map(|_| ())
    }
}

/// Join a base URL and a path without doubling slashes.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fabric_error_body_is_condensed() {
        let body = r#"{"requestId":"r1","errorCode":"WorkspaceNotFound","message":"The requested workspace was not found"}"#;
        assert_eq!(
            error_text(body),
            "WorkspaceNotFound: The requested workspace was not found"
        );
    }

    #[test]
    fn powerbi_error_body_is_condensed() {
        let body = r#"{"error":{"code":"PowerBINotAuthorizedException","message":""}}"#;
        assert_eq!(error_text(body), "PowerBINotAuthorizedException");
    }

    #[test]
    fn unknown_body_is_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY + 50);
        let text = error_text(&body);
        assert!(text.ends_with("..."));
        assert_eq!(text.len(), MAX_ERROR_BODY + 3);
        assert_eq!(error_text("  plain  "), "plain");
    }

    #[test]
    fn missing_token_fails_before_sending() {
        let client = HttpClient::new(None, Duration::from_secs(1)).unwrap();
        let err = client
            .get_json::<serde_json::Value>("http://127.0.0.1:9/never")
            .unwrap_err();
        assert_eq!(err, ApiError::MissingToken);
        assert!(!client.has_token());
    }

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(join_url("https://a/v1/", "/workspaces"), "https://a/v1/workspaces");
        assert_eq!(join_url("https://a/v1", "workspaces"), "https://a/v1/workspaces");
    }

    #[test]
    fn page_without_continuation_parses() {
        let page: Page<u32> = serde_json::from_str(r#"{"value":[1,2]}"#).unwrap();
        assert_eq!(page.value, vec![1, 2]);
        assert!(page.continuation_uri.is_none());
    }
}
