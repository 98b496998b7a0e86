//! HTTP client wrapper - talks to the vibra API

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{CastRequest, CastResponse, PresentResponse, Session};

/// Why an API call did not produce a usable body
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_connect() {
            ApiError::Transport(format!("Connection failed: {}", e))
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// The calls this client makes against the vibra API
#[async_trait]
pub trait LivestreamApi: Send + Sync {
    /// `POST /api/auth/login` - start a signer request
    async fn login(&self) -> Result<Session, ApiError>;

    /// `GET /api/auth/signer-status?signer_uuid=..`
    async fn signer_status(&self, signer_uuid: &str) -> Result<Session, ApiError>;

    /// `GET /api/present` - the live cast and its replies
    async fn fetch_present(&self) -> Result<PresentResponse, ApiError>;

    /// `POST /api/cast` - reply to the livestream
    async fn submit_cast(&self, text: &str) -> Result<CastResponse, ApiError>;
}

/// reqwest-backed implementation of [`LivestreamApi`]
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        ApiClient {
            http: create_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl LivestreamApi for ApiClient {
    async fn login(&self) -> Result<Session, ApiError> {
        let resp = self.http.post(self.url("/api/auth/login")).send().await?;
        read_json(resp).await
    }

    async fn signer_status(&self, signer_uuid: &str) -> Result<Session, ApiError> {
        let resp = self
            .http
            .get(self.url("/api/auth/signer-status"))
            .query(&[("signer_uuid", signer_uuid)])
            .send()
            .await?;
        read_json(resp).await
    }

    async fn fetch_present(&self) -> Result<PresentResponse, ApiError> {
        let resp = self.http.get(self.url("/api/present")).send().await?;
        read_json(resp).await
    }

    async fn submit_cast(&self, text: &str) -> Result<CastResponse, ApiError> {
        // .json() sets the application/json content type
        let resp = self
            .http
            .post(self.url("/api/cast"))
            .json(&CastRequest { text })
            .send()
            .await?;
        read_json(resp).await
    }
}

/// Turn a response into `T`, treating any non-2xx status as a failure
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    decode(&body)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Create an HTTP client; without a timeout a hung call stays pending
pub fn create_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}
