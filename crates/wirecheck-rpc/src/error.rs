use std::fmt;

use serde::{Deserialize, Serialize};

/// The caller sent something the far side must not accept.
pub const BAD_REQUEST: u16 = 400;
/// No handler or subscriber for the addressed endpoint.
pub const NOT_FOUND: u16 = 404;
/// The call did not complete in time.
pub const TIMEOUT: u16 = 408;
/// The far side failed while handling an otherwise acceptable call.
pub const INTERNAL_SERVER_ERROR: u16 = 500;
/// The far side completed the call but produced an unacceptable response.
pub const BAD_GATEWAY: u16 = 502;

/// Framework-standard error carried back to callers.
///
/// Serializes to the `{"id","code","detail","status"}` record peers exchange
/// on the wire. `id` names the service or topic the error is attributed to.
///
/// A record without a `code` decodes as [`INTERNAL_SERVER_ERROR`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{status}{}: {detail}", attribution(.id))]
pub struct Error {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default = "internal_code")]
    pub code: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

fn internal_code() -> u16 {
    INTERNAL_SERVER_ERROR
}

fn attribution(id: &str) -> String {
    if id.is_empty() {
        String::new()
    } else {
        format!(" from {id}")
    }
}

/// Coarse classification of an [`Error`] by status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid input, see [`BAD_REQUEST`].
    BadRequest,
    /// Invalid output from an otherwise successful call, see [`BAD_GATEWAY`].
    BadGateway,
    /// Anything else.
    Other,
}

impl Error {
    /// Build an error with an explicit status code.
    pub fn new(id: impl Into<String>, code: u16, detail: impl fmt::Display) -> Self {
        Self {
            id: id.into(),
            code,
            detail: detail.to_string(),
            status: status_text(code).to_string(),
        }
    }

    pub fn bad_request(id: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self::new(id, BAD_REQUEST, detail)
    }

    pub fn bad_gateway(id: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self::new(id, BAD_GATEWAY, detail)
    }

    pub fn not_found(id: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self::new(id, NOT_FOUND, detail)
    }

    pub fn timeout(id: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self::new(id, TIMEOUT, detail)
    }

    pub fn internal_server_error(id: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self::new(id, INTERNAL_SERVER_ERROR, detail)
    }

    /// Classify by status code.
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            BAD_REQUEST => ErrorKind::BadRequest,
            BAD_GATEWAY => ErrorKind::BadGateway,
            _ => ErrorKind::Other,
        }
    }

    pub fn is_bad_request(&self) -> bool {
        self.kind() == ErrorKind::BadRequest
    }

    pub fn is_bad_gateway(&self) -> bool {
        self.kind() == ErrorKind::BadGateway
    }

    /// Encode as the wire JSON record.
    pub fn to_json(&self) -> String {
        // Plain string/integer fields cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a wire JSON record.
    ///
    /// Text that is not an error record becomes an internal error whose
    /// detail is the raw text, so peers speaking plain strings still
    /// surface something readable.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Self>(text) {
            Ok(err) => err,
            Err(_) => Self::internal_server_error("", text),
        }
    }
}

/// Canonical reason phrase for a status code.
pub fn status_text(code: u16) -> &'static str {
    match code {
        BAD_REQUEST => "Bad Request",
        NOT_FOUND => "Not Found",
        TIMEOUT => "Request Timeout",
        INTERNAL_SERVER_ERROR => "Internal Server Error",
        BAD_GATEWAY => "Bad Gateway",
        _ => "Unknown",
    }
}

pub type Result<T> = std::result::Result<T, Error>;
