//! Error taxonomy shared by every collaborator.
//!
//! Upstream clients translate transport and status failures into
//! [`AppError`] at the boundary. Only [`AppError::PartialDataUnavailable`] is
//! absorbed locally (by the aggregation layer); every other variant travels to
//! the presentation layer, which shows [`AppError::user_message`] instead of
//! the internal detail.

use std::fmt;

use reqwest::{StatusCode, header::HeaderMap};
use serde::Serialize;
use thiserror::Error;

/// The external collaborators an error can originate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Spotify,
    Lastfm,
    DeepSeek,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Spotify => "Spotify",
            Service::Lastfm => "Last.fm",
            Service::DeepSeek => "DeepSeek",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A request parameter other than an identifier could not be parsed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{service} unavailable (status {status:?}): {message}")]
    UpstreamUnavailable {
        service: Service,
        status: Option<u16>,
        message: String,
    },

    #[error("{service} rejected the credentials: {message}")]
    UpstreamAuthFailed { service: Service, message: String },

    #[error("{service} rate limited the request (retry after {retry_after:?}s)")]
    UpstreamRateLimited {
        service: Service,
        retry_after: Option<u64>,
    },

    #[error("AI request failed: {0}")]
    AiRequestFailed(String),

    #[error("{service} data not available: {detail}")]
    PartialDataUnavailable { service: Service, detail: String },

    #[error("missing configuration: {0} is not set")]
    MissingCredential(&'static str),

    #[error("token storage error: {0}")]
    Storage(String),

    #[error("server error: {0}")]
    Server(String),
}

impl AppError {
    pub fn unavailable(service: Service, message: impl ToString) -> Self {
        AppError::UpstreamUnavailable {
            service,
            status: None,
            message: message.to_string(),
        }
    }

    /// Maps a reqwest transport or decode error.
    pub fn transport(service: Service, err: reqwest::Error) -> Self {
        AppError::UpstreamUnavailable {
            service,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    /// Maps a non-success HTTP status.
    pub fn from_status(service: Service, status: StatusCode, headers: &HeaderMap) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::UpstreamAuthFailed {
                service,
                message: format!("status {}", status.as_u16()),
            },
            StatusCode::TOO_MANY_REQUESTS => AppError::UpstreamRateLimited {
                service,
                retry_after: headers
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok()),
            },
            _ => AppError::UpstreamUnavailable {
                service,
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            },
        }
    }

    /// Upstream status code for `UpstreamUnavailable`, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::UpstreamUnavailable { status, .. } => *status,
            _ => None,
        }
    }

    /// End-user text. Never includes transport detail.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidIdentifier(_) => {
                "Invalid artist URL or ID. Please check the input and try again.".to_string()
            }
            AppError::InvalidParameter(detail) => format!("Invalid request: {}.", detail),
            AppError::UpstreamUnavailable { service, .. } => format!(
                "Unable to fetch data from {}. Please try again later.",
                service
            ),
            AppError::UpstreamAuthFailed { service, .. } => match service {
                Service::Spotify => {
                    "Spotify rejected the request. Sign in again or check the Spotify credentials."
                        .to_string()
                }
                other => format!("{} rejected the credentials.", other),
            },
            AppError::UpstreamRateLimited { service, .. } => format!(
                "{} is rate limiting requests. Please wait a moment and retry.",
                service
            ),
            AppError::AiRequestFailed(_) => {
                "Error generating the AI report. Please try again.".to_string()
            }
            AppError::PartialDataUnavailable { service, .. } => {
                format!("{} data not available.", service)
            }
            AppError::MissingCredential(name) => {
                format!("The application is not configured: {} is missing.", name)
            }
            AppError::Storage(_) => {
                "No stored Spotify sign-in was found. Please sign in first.".to_string()
            }
            AppError::Server(_) => "The local web server could not be started.".to_string(),
        }
    }
}
