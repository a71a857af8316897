//! Error taxonomy for the digest pipeline.
//!
//! Each stage fails with its own small enum so callers and tests can tell
//! failure causes apart without matching on message text. Nothing here is
//! retried; a failed run ends the process and the next scheduled run is the
//! de facto retry.

use thiserror::Error;

/// Failures while fetching a page of records from the upstream API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a usable response (connect, TLS, timeout).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body could not be decoded as a page of records.
    #[error("could not decode page from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while rendering the report body from the digest.
#[derive(Debug, Error)]
#[error("failed to render report: {0}")]
pub struct RenderError(#[from] minijinja::Error);

/// Failures while assembling or delivering the digest email.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A sender or recipient address did not parse.
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message itself could not be assembled.
    #[error("could not assemble message: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP connect, auth, or send failed.
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
