use std::num::FpCategory;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::domain::HttpMethod;
use crate::error::HttpError;

use super::builder::PreparedRequest;

const DEFAULT_USER_AGENT: &str = concat!("massrun/", env!("CARGO_PKG_VERSION"));
/// Message used when a failed response carries nothing better.
const GENERIC_FAILURE: &str = "Request failed";

/// Why a single request did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    /// The request never produced a response (connect, DNS, timeout, I/O).
    #[error("{message}")]
    Transport { message: String },
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },
}

/// Capability that performs one request against the target API.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Performs `request`; any 2xx response, with or without a body, is a
    /// success.
    async fn execute(&self, request: &PreparedRequest) -> Result<(), RequestFailure>;

    /// API base address, used for reporting only.
    fn base_address(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

/// [`RequestExecutor`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
    base: String,
}

impl ReqwestExecutor {
    /// Builds the client and checks the API base.
    ///
    /// # Errors
    ///
    /// Returns an error when the base is not an http(s) URL or the client
    /// cannot be built.
    pub fn new(settings: &ExecutorSettings) -> Result<Self, HttpError> {
        let parsed = Url::parse(&settings.base_url).map_err(|err| HttpError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            source: err,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HttpError::UnsupportedScheme {
                url: settings.base_url.clone(),
            });
        }

        let client = Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|err| HttpError::ClientBuild { source: err })?;

        Ok(Self {
            client,
            base: settings.base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(&self, request: &PreparedRequest) -> Result<(), RequestFailure> {
        let url = format!("{}{}", self.base, request.path);
        let headers = build_header_map(&request.headers)?;
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), url)
            .headers(headers);
        if let Some(body) = request.body.as_ref() {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(transport_failure)?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_failure(response).await);
        }

        drain_response_body(response)
            .await
            .map_err(transport_failure)?;
        Ok(())
    }

    fn base_address(&self) -> String {
        self.base.clone()
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn build_header_map(headers: &[(String, String)]) -> Result<HeaderMap, RequestFailure> {
    let mut map = HeaderMap::with_capacity(headers.len().saturating_add(1));
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
            RequestFailure::Transport {
                message: format!("Invalid header name '{}': {}", key, err),
            }
        })?;
        let val = HeaderValue::from_str(value).map_err(|err| RequestFailure::Transport {
            message: format!("Invalid header value for '{}': {}", key, err),
        })?;
        map.insert(name, val);
    }
    Ok(map)
}

fn transport_failure(err: reqwest::Error) -> RequestFailure {
    let message = if err.is_timeout() {
        format!("Request timed out: {}", err)
    } else {
        err.to_string()
    };
    RequestFailure::Transport { message }
}

async fn status_failure(response: Response) -> RequestFailure {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    // An unreadable JSON error body is reported as such rather than hidden
    // behind the reason phrase.
    let body_message = if is_json {
        match response.json::<Value>().await {
            Ok(body) => body.get("message").and_then(message_text),
            Err(err) => Some(format!("Invalid JSON error body: {}", err)),
        }
    } else {
        None
    };

    let message = body_message
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| GENERIC_FAILURE.to_owned());
    RequestFailure::Status {
        status: status.as_u16(),
        message,
    }
}

/// Text of a `message` field; empty, `null`, `false` and `0` carry nothing.
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Null | Value::Bool(false) | Value::String(_) => None,
        Value::Number(number)
            if number.as_f64().map(f64::classify) == Some(FpCategory::Zero) =>
        {
            None
        }
        Value::Bool(true) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            Some(value.to_string())
        }
    }
}

async fn drain_response_body(response: Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
