//! HTTP client for the kccd daemon.

use kcc_core::types::{
    ControllerTypeInfo, FieldSpec, MigrationPlan, MigrationStatus, ResourceLocation,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running at {addr}\n  → start with: kccd\n  → or set KCCD_ADDR if using a different address")]
    ConnectionFailed { addr: String },

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("unauthorized: check KCCD_TOKEN env var or --token flag")]
    Unauthorized,

    #[error(
        "daemon not ready after {timeout_ms}ms at {addr}\n  → ensure kccd is running\n  → check KCCD_TOKEN if auth is enabled"
    )]
    DaemonNotReady { addr: String, timeout_ms: u64 },
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            let addr = e
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            ClientError::ConnectionFailed { addr }
        } else {
            ClientError::HttpError {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                message: e.to_string(),
            }
        }
    }
}

/// Request payload for POST /fields.
#[derive(Debug, Serialize)]
pub struct AddFieldRequest {
    pub types_file: String,
    pub spec: FieldSpec,
}

/// Response from POST /fields.
#[derive(Debug, Deserialize)]
pub struct AddFieldResponse {
    pub types_file: String,
    pub rendered: String,
}

/// Request payload for POST /scaffold/types.
#[derive(Debug, Serialize)]
pub struct ScaffoldTypesRequest {
    pub resource: String,
    pub service: String,
    pub version: String,
    pub proto_package: String,
    pub proto_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request payload for POST /scaffold/identity.
#[derive(Debug, Serialize)]
pub struct ScaffoldIdentityRequest {
    pub resource: String,
    pub service: String,
    pub version: String,
    pub resource_name_format: String,
}

/// Request payload for POST /scaffold/controller.
#[derive(Debug, Serialize)]
pub struct ScaffoldControllerRequest {
    pub resource: String,
    pub service: String,
    pub version: String,
    pub proto_package: String,
    pub proto_message: String,
}

/// Request payload for POST /scaffold/mockgcp.
#[derive(Debug, Serialize)]
pub struct ScaffoldMockGcpRequest {
    pub resource: String,
    pub service: String,
    pub proto_package: String,
    pub proto_message: String,
    pub resource_name_format: String,
}

/// Response from the scaffold endpoints.
#[derive(Debug, Deserialize)]
pub struct ScaffoldResponse {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct GenerateMapperRequest<'a> {
    resource: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateMapperResponse {
    output: String,
}

#[derive(Debug, Deserialize)]
struct GitStatusResponse {
    status: String,
}

#[derive(Debug, Serialize)]
struct CommitRequest<'a> {
    message: &'a str,
    files: &'a [String],
}

/// Error response from the API.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Default total timeout for the daemon readiness probe.
const DEFAULT_READY_TIMEOUT_MS: u64 = 5000;

/// Initial backoff delay for the readiness probe.
const INITIAL_BACKOFF_MS: u64 = 200;

/// HTTP client for kccd.
#[derive(Debug)]
pub struct Client {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
            http: reqwest::Client::new(),
        }
    }

    /// Returns the daemon address (for error messages).
    pub fn addr(&self) -> &str {
        &self.base_url
    }

    /// Check if the daemon is healthy by probing /health.
    pub async fn check_health(&self) -> Result<bool, ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.http.get(&url).headers(self.headers()).send().await?;
        Ok(response.status().is_success())
    }

    /// Wait for the daemon to become ready with exponential backoff.
    ///
    /// Probes /health with retries: 5s total window, backoff starting at
    /// 200ms and doubling each attempt.
    pub async fn wait_for_ready(&self) -> Result<(), ClientError> {
        self.wait_for_ready_with_timeout(DEFAULT_READY_TIMEOUT_MS)
            .await
    }

    /// Wait for the daemon to become ready with a custom timeout.
    pub async fn wait_for_ready_with_timeout(&self, timeout_ms: u64) -> Result<(), ClientError> {
        let start = std::time::Instant::now();
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            match self.check_health().await {
                Ok(true) => return Ok(()),
                Ok(false) | Err(_) => {
                    let elapsed = start.elapsed().as_millis() as u64;
                    if elapsed >= timeout_ms {
                        return Err(ClientError::DaemonNotReady {
                            addr: self.base_url.clone(),
                            timeout_ms,
                        });
                    }

                    eprintln!(
                        "waiting for daemon at {} (retrying in {}ms)",
                        self.base_url, backoff_ms
                    );

                    let remaining = timeout_ms.saturating_sub(elapsed);
                    let sleep_ms = backoff_ms.min(remaining);
                    tokio::time::sleep(std::time::Duration::from_millis(sleep_ms)).await;

                    backoff_ms = backoff_ms.saturating_mul(2);
                }
            }
        }
    }

    /// Build headers with the optional auth token.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    /// Map a non-2xx response onto the client error taxonomy.
    async fn handle_error(&self, response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();

        if status == 401 {
            return ClientError::Unauthorized;
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        if status == 404 {
            return ClientError::NotFound(message);
        }

        ClientError::HttpError { status, message }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).headers(self.headers()).send().await?;

        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .headers(self.headers())
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// GET /resources/{resource}
    pub async fn find_resource(&self, resource: &str) -> Result<ResourceLocation, ClientError> {
        self.get_json(&format!("/resources/{}", urlencoding::encode(resource)))
            .await
    }

    /// GET /resources/{resource}/controller-type
    pub async fn controller_type(
        &self,
        resource: &str,
    ) -> Result<ControllerTypeInfo, ClientError> {
        self.get_json(&format!(
            "/resources/{}/controller-type",
            urlencoding::encode(resource)
        ))
        .await
    }

    /// GET /resources/{resource}/migration/status
    pub async fn migration_status(&self, resource: &str) -> Result<MigrationStatus, ClientError> {
        self.get_json(&format!(
            "/resources/{}/migration/status",
            urlencoding::encode(resource)
        ))
        .await
    }

    /// GET /resources/{resource}/migration/plan
    pub async fn migration_plan(&self, resource: &str) -> Result<MigrationPlan, ClientError> {
        self.get_json(&format!(
            "/resources/{}/migration/plan",
            urlencoding::encode(resource)
        ))
        .await
    }

    /// POST /fields
    pub async fn add_field(&self, req: &AddFieldRequest) -> Result<AddFieldResponse, ClientError> {
        self.post_json("/fields", req).await
    }

    /// POST /scaffold/types
    pub async fn scaffold_types(
        &self,
        req: &ScaffoldTypesRequest,
    ) -> Result<ScaffoldResponse, ClientError> {
        self.post_json("/scaffold/types", req).await
    }

    /// POST /scaffold/identity
    pub async fn scaffold_identity(
        &self,
        req: &ScaffoldIdentityRequest,
    ) -> Result<ScaffoldResponse, ClientError> {
        self.post_json("/scaffold/identity", req).await
    }

    /// POST /scaffold/controller
    pub async fn scaffold_controller(
        &self,
        req: &ScaffoldControllerRequest,
    ) -> Result<ScaffoldResponse, ClientError> {
        self.post_json("/scaffold/controller", req).await
    }

    /// POST /scaffold/mockgcp
    pub async fn scaffold_mockgcp(
        &self,
        req: &ScaffoldMockGcpRequest,
    ) -> Result<ScaffoldResponse, ClientError> {
        self.post_json("/scaffold/mockgcp", req).await
    }

    /// POST /mapper/generate
    pub async fn generate_mapper(&self, resource: &str) -> Result<String, ClientError> {
        let response: GenerateMapperResponse = self
            .post_json("/mapper/generate", &GenerateMapperRequest { resource })
            .await?;
        Ok(response.output)
    }

    /// GET /git/status
    pub async fn git_status(&self) -> Result<String, ClientError> {
        let response: GitStatusResponse = self.get_json("/git/status").await?;
        Ok(response.status)
    }

    /// POST /git/commit
    ///
    /// Success is 204 with no body.
    pub async fn commit(&self, message: &str, files: &[String]) -> Result<(), ClientError> {
        let url = format!("{}/git/commit", self.base_url);
        let response = self
            .http
            .post(&url)
            .headers(self.headers())
            .json(&CommitRequest { message, files })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.handle_error(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = Client::new("http://localhost:7800/", None);
        assert_eq!(client.base_url, "http://localhost:7800");
    }

    #[test]
    fn client_preserves_url_without_trailing_slash() {
        let client = Client::new("http://localhost:7800", None);
        assert_eq!(client.base_url, "http://localhost:7800");
    }

    #[test]
    fn client_headers_include_content_type() {
        let client = Client::new("http://localhost:7800", None);
        let headers = client.headers();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn client_headers_include_auth_when_token_set() {
        let client = Client::new("http://localhost:7800", Some("test-token"));
        let headers = client.headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer test-token");
    }

    #[test]
    fn client_headers_omit_auth_when_no_token() {
        let client = Client::new("http://localhost:7800", None);
        let headers = client.headers();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn client_addr_returns_base_url() {
        let client = Client::new("http://localhost:7800", None);
        assert_eq!(client.addr(), "http://localhost:7800");
    }

    #[tokio::test]
    async fn check_health_fails_when_daemon_not_running() {
        let client = Client::new("http://127.0.0.1:19999", None);
        let result = client.check_health().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn wait_for_ready_times_out_when_daemon_not_running() {
        let client = Client::new("http://127.0.0.1:19999", None);
        let result = client.wait_for_ready_with_timeout(100).await;

        match result {
            Err(ClientError::DaemonNotReady { addr, timeout_ms }) => {
                assert_eq!(addr, "http://127.0.0.1:19999");
                assert_eq!(timeout_ms, 100);
            }
            _ => panic!("expected DaemonNotReady error"),
        }
    }

    #[test]
    fn daemon_not_ready_error_message_includes_hint() {
        let err = ClientError::DaemonNotReady {
            addr: "http://127.0.0.1:7800".to_string(),
            timeout_ms: 5000,
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:7800"));
        assert!(msg.contains("5000ms"));
        assert!(msg.contains("KCCD_TOKEN"));
    }

    #[test]
    fn connection_failed_error_suggests_start_command() {
        let err = ClientError::ConnectionFailed {
            addr: "http://127.0.0.1:7800".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("kccd"), "should suggest starting kccd");
        assert!(msg.contains("KCCD_ADDR"), "should mention KCCD_ADDR env var");
    }

    #[test]
    fn unauthorized_error_suggests_token_options() {
        let err = ClientError::Unauthorized;
        let msg = err.to_string();
        assert!(msg.contains("KCCD_TOKEN"), "should mention KCCD_TOKEN env var");
        assert!(msg.contains("--token"), "should mention --token flag");
    }
}
