use http::Method;
use micro_api_http::protocol::TransportError;
use thiserror::Error;

use crate::field::Encoding;

/// The single terminal error of a failed call.
///
/// Each variant matches the pipeline stage that failed, so exactly one kind
/// reaches the caller. [`RequestError::Parameter`] and
/// [`RequestError::Validation`] are raised while building and guarantee that
/// nothing was sent.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("parameter error: {source}")]
    Parameter {
        #[from]
        source: ParameterError,
    },

    #[error("request validation error: {source}")]
    Validation {
        #[from]
        source: ValidationError,
    },

    #[error("transport error: {source}")]
    Transport {
        #[from]
        source: TransportError,
    },

    #[error("response error: {source}")]
    Response {
        #[from]
        source: ResponseError,
    },

    #[error("parsing error: {source}")]
    Parsing {
        #[from]
        source: DecodeError,
    },

    #[error("request cancelled")]
    Cancelled,

    /// The transport broke its contract. Never produced by a conforming transport.
    #[error("unknown error")]
    Unknown,
}

impl RequestError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The status code when the call failed on status validation.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { source: ResponseError::UnacceptableStatusCode(code) } => Some(*code),
            _ => None,
        }
    }
}

/// Errors found while turning tagged fields into url, headers and body.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("invalid url: {reason}")]
    InvalidUrl { reason: String },

    #[error("failed to encode parameter: {reason}")]
    Encode { reason: String },

    #[error("duplicate key: {key}")]
    DuplicateKey { key: String },

    #[error("empty key")]
    EmptyKey,

    #[error("mismatched encoding, expected {expected} but found {found}")]
    MismatchedEncoding { expected: Encoding, found: Encoding },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },
}

impl ParameterError {
    pub fn invalid_url<S: ToString>(str: S) -> Self {
        Self::InvalidUrl { reason: str.to_string() }
    }

    pub fn encode<S: ToString>(str: S) -> Self {
        Self::Encode { reason: str.to_string() }
    }

    pub fn duplicate_key<S: ToString>(key: S) -> Self {
        Self::DuplicateKey { key: key.to_string() }
    }

    pub fn mismatched_encoding(expected: Encoding, found: Encoding) -> Self {
        Self::MismatchedEncoding { expected, found }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{method} request can not carry a body")]
    BodyInBodylessRequest { method: Method },
}

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("unacceptable status code: {0}")]
    UnacceptableStatusCode(u16),
}

/// Failure of a response parser, the payload itself is not retained.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid json: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("invalid form: {source}")]
    Form {
        #[from]
        source: serde_urlencoded::de::Error,
    },

    #[error("invalid utf-8: {source}")]
    Utf8 {
        #[from]
        source: std::str::Utf8Error,
    },
}
