//! Error types for the registry load test.
//!
//! Errors are split by layer:
//!
//! - [`ConfigError`]: invalid command line / environment configuration, fatal at startup
//! - [`TransportError`]: the HTTP request never produced a status code
//! - [`JourneyError`]: an iteration failed; recorded and rescheduled, never fatal
//! - [`EncodingError`]: an encoded identifier could not be decoded

use thiserror::Error;

use crate::journey::Step;

/// Configuration errors detected while building a [`crate::config::TargetConfig`] or [`crate::config::SwarmConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid host url '{url}': {source}")]
    InvalidHost {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("host url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("number of users must be at least 1")]
    NoUsers,

    #[error("throughput rate must be a positive number, got {0}")]
    InvalidRate(f64),

    #[error("hatch rate must be a positive number, got {0}")]
    InvalidHatchRate(f64),

    #[error("duration must be at least one second")]
    ZeroDuration,

    #[error("report interval must be at least one second")]
    ZeroReportInterval,

    #[error("business partner number must not be empty")]
    EmptyBpn,

    #[error("path prefix '{0}' must start with '/' and must not end with '/'")]
    InvalidPathPrefix(String),

    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failures below the HTTP status level
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("invalid request url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Reasons an iteration of the user journey was abandoned.
///
/// Every variant is recorded as a named failure and the iteration is
/// rescheduled with a fresh payload.
#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("Expected {expected} but status code was {actual}")]
    UnexpectedStatus {
        step: Step,
        endpoint: String,
        expected: u16,
        actual: u16,
    },

    #[error("{source}")]
    Transport {
        step: Step,
        endpoint: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to serialize shell descriptor: {source}")]
    Payload {
        step: Step,
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl JourneyError {
    /// The step that failed
    pub fn step(&self) -> Step {
        match self {
            JourneyError::UnexpectedStatus { step, .. }
            | JourneyError::Transport { step, .. }
            | JourneyError::Payload { step, .. } => *step,
        }
    }

    /// Statistics name of the endpoint the failure is recorded under
    pub fn endpoint(&self) -> &str {
        match self {
            JourneyError::UnexpectedStatus { endpoint, .. }
            | JourneyError::Transport { endpoint, .. }
            | JourneyError::Payload { endpoint, .. } => endpoint,
        }
    }
}

/// Identifier decoding errors
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded id is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
