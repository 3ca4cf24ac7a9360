use std::fmt;
use thiserror::Error;

/// What went wrong while fetching or interpreting a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Could not reach the API.
    Connection,
    /// The request exceeded the client timeout.
    Timeout,
    /// The response body could not be read.
    MalformedResponse,
    /// The API answered with a 4xx/5xx status.
    HttpError(u16),
    /// The `Content-Type` was not JSON.
    NonJsonResponse,
    /// The body was not valid JSON.
    MalformedJson,
    /// The API reported an error message of its own.
    ApiError,
    /// Valid JSON, but not the `[meta, data]` layout.
    UnexpectedShape,
}

impl ErrorKind {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ErrorKind::Connection | ErrorKind::Timeout | ErrorKind::MalformedResponse
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Connection => f.write_str("connection error"),
            ErrorKind::Timeout => f.write_str("timeout"),
            ErrorKind::MalformedResponse => f.write_str("malformed response"),
            ErrorKind::HttpError(status) => write!(f, "HTTP error {}", status),
            ErrorKind::NonJsonResponse => f.write_str("non-JSON response"),
            ErrorKind::MalformedJson => f.write_str("malformed JSON"),
            ErrorKind::ApiError => f.write_str("World Bank API error"),
            ErrorKind::UnexpectedShape => f.write_str("unexpected response shape"),
        }
    }
}

/// A classified failure, carried as data inside [`crate::FetchOutcome::Failure`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct FetchError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl FetchError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Failure of the network collaborator before any response could be interpreted.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not connect to the World Bank API: {0}")]
    Connection(String),
    #[error("the request to the World Bank API timed out")]
    Timeout,
    #[error("could not read the response body: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        // Checked first: a timeout while reading the body is also a decode error.
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_body() || e.is_decode() {
            TransportError::MalformedResponse(e.to_string())
        } else {
            TransportError::Connection(e.to_string())
        }
    }
}

impl From<TransportError> for FetchError {
    fn from(e: TransportError) -> Self {
        let kind = match &e {
            TransportError::Connection(_) => ErrorKind::Connection,
            TransportError::Timeout => ErrorKind::Timeout,
            TransportError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        };
        FetchError::new(kind, e.to_string())
    }
}

/// Rejected country code input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid country code format '{0}', expected a 3-letter ISO code (e.g. ARG, USA, BRA)")]
pub struct InvalidCountryCode(pub String);
