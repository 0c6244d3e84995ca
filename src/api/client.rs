// src/api/client.rs
//! HTTP client for the wall API.
//!
//! A thin wrapper around reqwest. Every call goes through the client's
//! [`FetchSession`], which owns the rate limiter, so requests issued by one
//! client are spaced out and never overlap.

use super::parser;
use super::rate_limiter::RateLimiter;
use super::{ListingTransport, QueryParams};
use crate::config::WallApiConfig;
use crate::error::AppError;
use crate::types::{AccessToken, BaseUrl};
use reqwest::{Client, Response};
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

/// Mutable per-client state: who we talk to and when we last did.
#[derive(Debug)]
pub struct FetchSession {
    endpoint: String,
    limiter: RateLimiter,
    calls: u64,
}

impl FetchSession {
    pub fn new(endpoint: impl Into<String>, limiter: RateLimiter) -> Self {
        Self {
            endpoint: endpoint.into(),
            limiter,
            calls: 0,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of requests issued so far in this session.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Waits for the rate limiter and counts the call that follows.
    async fn admit(&mut self) {
        self.limiter.wait().await;
        self.calls += 1;
    }
}

/// Wall API client bound to one access token and API version.
pub struct WallHttpClient {
    client: Client,
    base_url: BaseUrl,
    access_token: AccessToken,
    api_version: String,
    session: Mutex<FetchSession>,
}

impl WallHttpClient {
    /// Creates a new client from validated configuration.
    pub fn new(config: &WallApiConfig) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        let session = FetchSession::new(
            config.base_url.as_str(),
            RateLimiter::new(config.rate),
        );

        log::debug!(
            "Wall client for {} (v{}, {}, token {})",
            config.base_url,
            config.api_version,
            config.rate,
            config.access_token
        );

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
            api_version: config.api_version.clone(),
            session: Mutex::new(session),
        })
    }

    /// Builds the full request URL: credentials first, then call parameters.
    fn build_url(&self, method: &str, params: &QueryParams) -> Url {
        let mut url = self.base_url.join_path(&[method]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("access_token", self.access_token.as_str());
            query.append_pair("v", &self.api_version);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        url
    }

    /// Makes a rate-limited GET request for one API method.
    ///
    /// The session lock is held until the response headers arrive, so two
    /// callers sharing this client still issue requests one at a time.
    pub async fn get(&self, method: &str, params: &QueryParams) -> Result<Response, AppError> {
        let url = self.build_url(method, params);

        let mut session = self.session.lock().await;
        session.admit().await;
        log::debug!(
            "GET {} {:?} (call #{} to {})",
            method,
            params,
            session.calls(),
            session.endpoint()
        );

        let response = self.client.get(url).send().await?;
        log::trace!("{} responded with {}", method, response.status());

        Ok(response)
    }

    /// Number of requests this client has issued.
    pub async fn calls_made(&self) -> u64 {
        self.session.lock().await.calls()
    }
}

#[async_trait::async_trait]
impl ListingTransport for WallHttpClient {
    async fn call(&self, method: &str, params: &QueryParams) -> Result<Value, AppError> {
        let response = self.get(method, params).await?;
        let result = extract_response_text(response).await?;
        parser::parse_api_response(method, result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
