// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Access token for the wall API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token with validation
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        let token = token.trim().to_string();

        if token.is_empty() {
            return Err(ValidationError::InvalidAccessToken {
                reason: "access token cannot be empty".to_string(),
            });
        }

        if token.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidAccessToken {
                reason: "access token must not contain whitespace".to_string(),
            });
        }

        Ok(Self(token))
    }

    /// Get the token as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the secret part
        let visible: String = self.0.chars().take(6).collect();
        write!(f, "{}...", visible)
    }
}

/// Maximum number of requests per second against one endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestRate(f64);

impl RequestRate {
    /// Validates that the rate is a positive, finite number.
    pub fn new(per_second: f64) -> Result<Self, ValidationError> {
        if !per_second.is_finite() {
            return Err(ValidationError::InvalidRate {
                rate: per_second,
                reason: "rate must be finite".to_string(),
            });
        }
        if per_second <= 0.0 {
            return Err(ValidationError::InvalidRate {
                rate: per_second,
                reason: "rate must be greater than zero".to_string(),
            });
        }
        Ok(Self(per_second))
    }

    pub fn per_second(&self) -> f64 {
        self.0
    }

    /// The minimum spacing between two consecutive calls.
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.0)
    }
}

impl fmt::Display for RequestRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} req/s", self.0)
    }
}

/// Base URL of an HTTP endpoint, restricted to http(s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    pub fn parse(url: &str) -> Result<Self, ValidationError> {
        match Url::parse(url) {
            Ok(parsed_url) => {
                if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
                    return Err(ValidationError::InvalidUrl {
                        url: url.to_string(),
                        reason: "Only HTTP and HTTPS URLs are supported".to_string(),
                    });
                }
                Ok(Self(parsed_url))
            }
            Err(e) => Err(ValidationError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Joins path segments onto the base, ignoring a trailing slash on the base.
    pub fn join_path(&self, segments: &[&str]) -> Url {
        let mut url = self.0.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
