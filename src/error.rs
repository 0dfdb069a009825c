use serde::Serialize;
use thiserror::Error;

/// Classification of a failed remote call, carried structurally from the
/// client outward so callers never have to parse message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// 401 — invalid or missing API credential.
    Auth,
    /// 404 — phone number or group unknown to the remote.
    NotFound,
    /// 403, or 422 on a message fetch — caller lacks access or the UUID is
    /// invalid for their credentials.
    AccessDenied,
    /// 422 — malformed call.
    InvalidRequest,
    /// Remote answered 2xx but flagged the payload as unsuccessful.
    Protocol,
    /// Unclassified transport failure.
    Unknown,
}

impl ErrorKind {
    /// Map a remote status code to a kind. Message-page fetches override the
    /// 422 case separately since there it signals an inaccessible group.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Auth,
            403 => Self::AccessDenied,
            404 => Self::NotFound,
            422 => Self::InvalidRequest,
            _ => Self::Unknown,
        }
    }

    /// Status code to answer with when surfacing this kind over our own API.
    pub fn http_status(self) -> u16 {
        match self {
            Self::Auth => 401,
            Self::NotFound => 404,
            Self::AccessDenied => 403,
            Self::InvalidRequest => 422,
            Self::Protocol | Self::Unknown => 502,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auth => "AUTH",
            Self::NotFound => "NOT_FOUND",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::Protocol => "PROTOCOL",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// A failed call against the 2Chat API.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: ErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self { kind, status, message: message.into() }
    }

    /// Remote answered 2xx but the envelope carried `success: false`.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, None, message)
    }

    pub fn transport(err: reqwest::Error) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
