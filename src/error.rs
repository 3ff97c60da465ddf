//! Error types for the ETA client and fleet service.
//!
//! Every failure the dashboards can hit while talking to ETA is one of the
//! four [`EtaError`] variants. None of them are fatal to the process; the
//! dashboard aggregator turns them into a degraded page.

use thiserror::Error;

/// Errors raised while resolving credentials, calling ETA, or parsing its reply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EtaError {
    /// One or more required credentials are empty or unset.
    #[error("missing ETA credentials: {}", .missing.join(", "))]
    Configuration {
        /// The credential keys that were missing, in canonical order.
        missing: Vec<&'static str>,
    },

    /// The request never produced a response (timeout, connect, DNS, body read).
    #[error("ETA request failed: {0}")]
    Network(String),

    /// ETA answered with a non-success HTTP status.
    #[error("ETA returned HTTP {status}: {message}")]
    Transport {
        /// The HTTP status code.
        status: u16,
        /// Reason phrase or error text.
        message: String,
    },

    /// The response body was not well-formed XML.
    #[error("malformed ETA response: {0}")]
    Parse(String),
}

impl EtaError {
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Names the missing credential keys, if this is a configuration error.
    #[must_use]
    pub fn missing_credentials(&self) -> Option<&[&'static str]> {
        match self {
            Self::Configuration { missing } => Some(missing),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for EtaError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Transport {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            },
            None => Self::Network(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for EtaError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
