//! HTTP response types seen by the transport boundary.
//!
//! The decoder first yields a [`ResponseHead`]; once the payload has been
//! collected the transport hands a [`RawResponse`] back to the caller.

use bytes::Bytes;
use http::Response;

/// Status line and headers of a response, without the payload.
pub type ResponseHead = Response<()>;

/// A complete response as returned by a transport: status, headers and the
/// whole payload.
pub type RawResponse = Response<Bytes>;
