//! The HTTP client and its request type.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use logwatch_types::ApiResponse;

use crate::{ApiError, CancelToken};

/// Backend origin used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";

/// Environment variable that overrides the backend origin.
pub const BASE_URL_ENV: &str = "LOGWATCH_API_BASE_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A request to one backend endpoint.
///
/// Built with [`ApiRequest::get`] or [`ApiRequest::post`] and sent with
/// [`ApiClient::send`] or [`ApiClient::send_raw`].
///
/// ```rust
/// use logwatch_client::ApiRequest;
///
/// let request = ApiRequest::post("/api/errors/recent")
///     .query("page", 0)
///     .query("size", 10);
/// assert_eq!(request.query_pairs(), &[
///     ("page".to_string(), "0".to_string()),
///     ("size".to_string(), "10".to_string()),
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append a query-string parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

/// Client for the log-monitoring backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Build a client for the origin named by [`BASE_URL_ENV`], or
    /// [`DEFAULT_BASE_URL`] when unset.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::builder().base_url(base_url).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a request to an enveloped endpoint and return its `data`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cancel: &CancelToken,
    ) -> Result<T, ApiError> {
        let (status, body) = self.execute(request, cancel).await?;
        decode_envelope(status, &body)
    }

    /// Send a request to an endpoint that returns a bare JSON body.
    pub async fn send_raw<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cancel: &CancelToken,
    ) -> Result<T, ApiError> {
        let (status, body) = self.execute(request, cancel).await?;
        decode_raw(status, &body)
    }

    /// Send a request and return the body as text.
    pub async fn send_text(
        &self,
        request: ApiRequest,
        cancel: &CancelToken,
    ) -> Result<String, ApiError> {
        let (status, body) = self.execute(request, cancel).await?;
        if !status.is_success() {
            return Err(failure(status, &body));
        }
        String::from_utf8(body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute(
        &self,
        request: ApiRequest,
        cancel: &CancelToken,
    ) -> Result<(StatusCode, Vec<u8>), ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let url = self.url_for(&request.path);
        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, url = %url, "sending request");

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, ApiError>((status, body.to_vec()))
        };

        // Dropping `exchange` aborts the underlying connection.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %url, "request cancelled");
                Err(ApiError::Cancelled)
            }
            result = exchange => result,
        }
    }
}

/// Builder for ApiClient.
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    /// Set the backend origin (e.g., "http://localhost:8081").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidRequest(format!(
                "base URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        Ok(ApiClient {
            client,
            base_url,
            timeout,
        })
    }
}

/// Decode an enveloped response body.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(failure(status, body));
    }

    let envelope: ApiResponse<T> = serde_json::from_slice(body)?;
    if !envelope.success {
        return Err(ApiError::server(status.as_u16(), envelope.message()));
    }

    envelope
        .data
        .ok_or_else(|| ApiError::Parse("response envelope carried no data".to_string()))
}

/// Decode a bare JSON response body.
pub(crate) fn decode_raw<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(failure(status, body));
    }
    Ok(serde_json::from_slice(body)?)
}

/// Turn a non-2xx response into an error, preferring the envelope message.
fn failure(status: StatusCode, body: &[u8]) -> ApiError {
    let envelope = serde_json::from_slice::<ApiResponse<serde_json::Value>>(body).ok();
    match envelope.as_ref().and_then(|e| e.message()) {
        Some(message) => ApiError::server(status.as_u16(), Some(message)),
        None => ApiError::Status(status.as_u16()),
    }
}
