//! The HTTP/1.1 wire layer of micro-api
//!
//! This crate knows nothing about typed endpoints. It defines the immutable
//! [`protocol::BuiltRequest`] a client hands over, the raw response it gets
//! back, and the [`transport::Transport`] boundary in between.
//!
//! # Architecture
//!
//! - [`protocol`]: request and response types, payload framing and errors
//! - [`codec`]: `tokio_util` encoder for requests and decoder for responses
//! - [`transport`]: the `Transport` trait and a plain TCP implementation
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::Request;
//! use micro_api_http::protocol::BuiltRequest;
//! use micro_api_http::transport::{TcpTransport, Transport};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let request: BuiltRequest = Request::get("http://127.0.0.1:8080/users?page=2")
//!     .body(None::<Bytes>)?
//!     .into();
//!
//! let response = TcpTransport::new().send(request).await?;
//! println!("{} {} bytes", response.status(), response.body().len());
//! # Ok(())
//! # }
//! ```
//!
//! # Limitations
//!
//! - HTTP/1.1 only, one connection per request
//! - No TLS support, `https` urls are rejected by [`transport::TcpTransport`]
//! - Maximum response head size: 8KB
//! - Maximum number of response headers: 64

pub mod codec;
pub mod protocol;
pub mod transport;

mod utils;
pub(crate) use utils::ensure;
