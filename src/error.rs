use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read};

/// Error body returned by the CA admin API.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "status={}", self.status)
        } else {
            f.write_str(&self.message)
        }
    }
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local input fault; nothing was sent.
    RequestBuild,
    /// Signing key or certificate problem; nothing was sent.
    Credential,
    /// Network-level failure before a complete response was read.
    Transport,
    /// Structured rejection from the CA.
    Server,
    /// Successful response with a body of the wrong shape.
    Decode,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("request build error: {0}")]
    RequestBuild(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("credential error: {0}")]
    Credential(String),
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlg(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("error reading {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Api(ResourceError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidBaseUrl(_)
            | Error::Url(_)
            | Error::RequestBuild(_)
            | Error::Json(_) => ErrorKind::RequestBuild,
            Error::Credential(_) | Error::UnsupportedAlg(_) => ErrorKind::Credential,
            Error::Transport(_) | Error::Io(_) => ErrorKind::Transport,
            Error::Api(_) => ErrorKind::Server,
            Error::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// HTTP status of a server rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            _ => None,
        }
    }
}

/// Reads at most `limit` bytes and discards whatever is left, so the
/// connection is never handed back with unread data.
pub(crate) fn read_body_with_limit<R: Read>(body: &mut R, limit: usize) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    body.by_ref().take(limit as u64).read_to_end(&mut buf)?;
    drain_body(body)?;
    Ok(buf)
}

pub(crate) fn read_body<R: Read>(body: &mut R) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    body.read_to_end(&mut buf)?;
    Ok(buf)
}

pub(crate) fn drain_body<R: Read>(body: &mut R) -> Result<(), Error> {
    io::copy(body, &mut io::sink())?;
    Ok(())
}

pub(crate) fn fallback_message(status: StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        reason_phrase(status)
    } else {
        text.to_string()
    }
}

fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("status {}", status.as_u16()))
}

pub(crate) fn parse_error_from_body(status: StatusCode, body: &[u8]) -> Error {
    let err = match serde_json::from_slice::<ResourceError>(body) {
        Ok(mut err) => {
            if err.status == 0 {
                err.status = status.as_u16();
            }
            if err.message.trim().is_empty() {
                err.message = reason_phrase(status);
            }
            err
        }
        Err(_) => ResourceError {
            status: status.as_u16(),
            message: fallback_message(status, body),
            detail: None,
            error_type: None,
        },
    };
    Error::Api(err)
}
