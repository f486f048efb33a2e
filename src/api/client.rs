//! api::client
//!
//! HTTP implementation of [`GovernanceApi`].
//!
//! # Design
//!
//! All calls go through the backend's proxy under `{backend}/api/internal`.
//! The proxy injects the real API key server-side; this client only sends
//! the optional `X-Internal-UI` token, and only when one was configured at
//! runtime. Nothing secret is compiled in.
//!
//! # Example
//!
//! ```no_run
//! use vidar::api::{GovernanceApi, HttpApi};
//!
//! # tokio_test::block_on(async {
//! let api = HttpApi::builder("https://gov.example")
//!     .token("runtime-token")
//!     .build()
//!     .unwrap();
//! let health = api.estate_health().await.unwrap();
//! println!("{} systems", health.total_systems);
//! # });
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::traits::{
    AmendmentQuery, ApiError, GovernanceApi, PageRequest, TransitionRequest,
};
use super::types::{
    AmendmentDetail, AmendmentSummary, DependencyMap, EstateHealth, EvaluationEvent, Page,
    RiskSummary, SimulationResult, SystemSummary, TraceEvent,
};

/// Path prefix of the internal API on the backend.
pub const API_PREFIX: &str = "/api/internal";

/// Header carrying the runtime UI token.
pub const INTERNAL_UI_HEADER: &str = "X-Internal-UI";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("vidar/", env!("CARGO_PKG_VERSION"));

/// Message used when the error body carries none.
const FALLBACK_MESSAGE: &str = "Request failed";

/// Builder for [`HttpApi`].
#[derive(Debug, Clone)]
pub struct HttpApiBuilder {
    backend_url: String,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl HttpApiBuilder {
    /// Send `token` as `X-Internal-UI` on every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Optional token; `None` leaves the header off.
    pub fn maybe_token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if the token is not a legal header
    /// value or the HTTP client cannot be created.
    pub fn build(self) -> Result<HttpApi, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(token).map_err(|_| {
                ApiError::InvalidRequest("internal UI token is not a valid header value".into())
            })?;
            value.set_sensitive(true);
            headers.insert(INTERNAL_UI_HEADER, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        Ok(HttpApi {
            client,
            base: format!("{}{}", self.backend_url.trim_end_matches('/'), API_PREFIX),
            has_token: self.token.is_some(),
        })
    }
}

/// Governance API client over HTTP.
pub struct HttpApi {
    client: Client,
    /// `{backend}/api/internal`, no trailing slash
    base: String,
    has_token: bool,
}

// Custom Debug to keep the client internals out of logs
impl std::fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApi")
            .field("base", &self.base)
            .field("has_token", &self.has_token)
            .finish()
    }
}

impl HttpApi {
    /// Start building a client for the backend at `backend_url`.
    pub fn builder(backend_url: impl Into<String>) -> HttpApiBuilder {
        HttpApiBuilder {
            backend_url: backend_url.into(),
            token: None,
            timeout: None,
        }
    }

    /// Base URL every path is joined onto.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Whether requests carry the `X-Internal-UI` header.
    pub fn has_token(&self) -> bool {
        self.has_token
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send a request and return the successful response.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "api response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response, status, what).await)
        }
    }

    /// Send a request and decode the JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, what).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("{}: {}", what, e)))
    }

    /// Map an error response onto [`ApiError`].
    async fn error_from_response(response: Response, status: StatusCode, what: &str) -> ApiError {
        let body = response.json::<Value>().await.ok();
        let message = body
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(format!("{}: {}", what, message)),
            _ if status.is_server_error() => ApiError::Server {
                status: status.as_u16(),
                message,
            },
            _ => ApiError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Extract a human-readable message from an error body.
///
/// Looks at `detail.message`, then `detail` as a string, then `message`.
pub fn error_message(body: &Value) -> Option<String> {
    let detail = body.get("detail");
    detail
        .and_then(|d| d.get("message"))
        .and_then(Value::as_str)
        .or_else(|| detail.and_then(Value::as_str))
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(str::to_string)
}

/// Percent-encode an id for use as one path segment.
///
/// Empty ids and the dot segments `.` and `..` are rejected; URL parsing
/// would otherwise resolve them against the parent path.
fn segment(id: &str) -> Result<String, ApiError> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(ApiError::InvalidRequest(format!(
            "'{}' is not a valid resource id",
            id
        )));
    }

    let mut out = String::with_capacity(id.len());
    for b in id.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    Ok(out)
}

#[async_trait]
impl GovernanceApi for HttpApi {
    async fn estate_health(&self) -> Result<EstateHealth, ApiError> {
        self.send_json(
            self.request(Method::GET, "/governance/estate-health"),
            "estate health",
        )
        .await
    }

    async fn list_systems(&self) -> Result<Vec<SystemSummary>, ApiError> {
        self.send_json(self.request(Method::GET, "/systems"), "systems")
            .await
    }

    async fn risk_summary(&self, system_id: &str) -> Result<RiskSummary, ApiError> {
        let path = format!("/systems/{}/risk-summary", segment(system_id)?);
        self.send_json(self.request(Method::GET, &path), &format!("system {}", system_id))
            .await
    }

    async fn dependency_map(&self, system_id: &str) -> Result<DependencyMap, ApiError> {
        let path = format!("/systems/{}/dependency-map", segment(system_id)?);
        self.send_json(self.request(Method::GET, &path), &format!("system {}", system_id))
            .await
    }

    async fn evaluation_history(
        &self,
        system_id: &str,
        page: PageRequest,
    ) -> Result<Page<EvaluationEvent>, ApiError> {
        let path = format!("/systems/{}/evaluation-history", segment(system_id)?);
        let request = self.request(Method::GET, &path).query(&page.query());
        self.send_json(request, &format!("system {}", system_id))
            .await
    }

    async fn list_amendments(
        &self,
        query: AmendmentQuery,
    ) -> Result<Page<AmendmentSummary>, ApiError> {
        let request = self.request(Method::GET, "/amendments").query(&query.query());
        self.send_json(request, "amendments").await
    }

    async fn get_amendment(&self, amendment_id: &str) -> Result<AmendmentDetail, ApiError> {
        let path = format!("/amendments/{}", segment(amendment_id)?);
        self.send_json(
            self.request(Method::GET, &path),
            &format!("amendment {}", amendment_id),
        )
        .await
    }

    async fn simulate_amendment(
        &self,
        amendment_id: &str,
    ) -> Result<SimulationResult, ApiError> {
        let path = format!("/amendments/{}/simulate", segment(amendment_id)?);
        self.send_json(
            self.request(Method::POST, &path),
            &format!("amendment {}", amendment_id),
        )
        .await
    }

    async fn transition_amendment(
        &self,
        amendment_id: &str,
        request: &TransitionRequest,
    ) -> Result<(), ApiError> {
        let path = format!(
            "/amendments/{}/{}",
            segment(amendment_id)?,
            request.action.path_segment()
        );
        tracing::debug!(amendment = amendment_id, action = %request.action, "transition");
        self.send(
            self.request(Method::POST, &path).json(&request.body()),
            &format!("amendment {}", amendment_id),
        )
        .await?;
        Ok(())
    }

    async fn governance_trace(&self) -> Result<Vec<TraceEvent>, ApiError> {
        let body: Value = self
            .send_json(self.request(Method::GET, "/governance/trace"), "trace")
            .await?;
        Ok(TraceEvent::list_from_body(&body))
    }
}
