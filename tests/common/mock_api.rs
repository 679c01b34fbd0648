//! Fabric and Power BI REST APIs served by a wiremock `MockServer`.
//!
//! The CLI under test is a separate blocking process, so the server is
//! started and configured through a current-thread runtime owned by the
//! helper. Routes match on method and path (query string ignored). Any
//! other request answers 404 with a platform-shaped error body.

use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

pub struct MockApi {
    base_url: String,
    server: MockServer,
    runtime: Runtime,
}

impl MockApi {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build test runtime");
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(any())
                .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                    "errorCode": "EntityNotFound",
                    "message": "No route in mock server",
                })))
                .with_priority(u8::MAX)
                .mount(&server)
                .await;
            server
        });
        Self {
            base_url: server.uri(),
            server,
            runtime,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Answer `verb route` with `status` and a JSON body
    pub fn route(&self, verb: &str, route: &str, status: u16, body: serde_json::Value) -> &Self {
        self.runtime.block_on(
            Mock::given(method(verb))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status).set_body_json(body))
                .mount(&self.server),
        );
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .into_iter()
            .map(|r| RecordedRequest {
                method: r.method.to_string(),
                path: r.url.path().to_string(),
                authorization: r
                    .headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string),
                body: String::from_utf8_lossy(&r.body).to_string(),
            })
            .collect()
    }

    /// Requests other than GET
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != "GET")
            .collect()
    }
}
