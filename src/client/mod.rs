use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::Credentials;
use crate::error::ShellError;

mod artifacts;
mod topologies;
mod users;

pub use artifacts::{ArtifactClient, NewArtifact};
pub use topologies::TopologyClient;
pub use users::{UserClient, UserSettings};

pub const HEADER_API_KEY: &str = "x-api-key";

/// Status and decoded body of one API call, uninterpreted.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body of a 2xx response, or the server's error payload as [`ShellError::Http`].
    pub fn into_success(self) -> Result<Value, ShellError> {
        if self.is_success() {
            return Ok(self.body);
        }
        let body = match self.body {
            Value::String(text) => text,
            Value::Null => "Unknown error".to_string(),
            other => other.to_string(),
        };
        Err(ShellError::Http {
            status: self.status,
            body,
        })
    }
}

/// Authenticated session shared by the per-resource wrappers.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &Url, api_key: &str) -> Result<Self, ShellError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| ShellError::input("api key contains invalid header characters"))?;
        key.set_sensitive(true);
        headers.insert(HEADER_API_KEY, key);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| ShellError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.clone(),
        })
    }

    pub fn from_credentials(credentials: &Credentials) -> Result<Self, ShellError> {
        Self::new(&credentials.base_url, &credentials.api_key)
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    ///
    /// Empty, `.` and `..` segments are rejected so an ID can never address another resource.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ShellError> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(segment.trim(), "" | "." | ".."))
        {
            return Err(ShellError::input(format!("invalid path segment '{bad}'")));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ShellError::input(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Performs exactly one request against the base URL joined with `segments`.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<ApiResponse, ShellError> {
        let url = self.url(segments)?;
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| ShellError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| ShellError::Transport {
                url: url.to_string(),
                source,
            })?;
        tracing::debug!(%status, %url, "received response");

        Ok(ApiResponse {
            status,
            body: parse_body(&text),
        })
    }

    pub async fn get(&self, segments: &[&str]) -> Result<ApiResponse, ShellError> {
        self.send::<Value>(Method::GET, segments, None).await
    }

    pub async fn delete(&self, segments: &[&str]) -> Result<ApiResponse, ShellError> {
        self.send::<Value>(Method::DELETE, segments, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<ApiResponse, ShellError> {
        self.send(Method::POST, segments, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<ApiResponse, ShellError> {
        self.send(Method::PUT, segments, Some(body)).await
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
