//! Declarative, typed http api requests
//!
//! An api call is described once, as a value whose fields are tagged with the
//! role they play in the request. The crate discovers those fields, validates
//! them and builds the outbound request; on the way back it checks the status
//! code and parses the payload into a typed value.
//!
//! # Example
//!
//! ```no_run
//! use http::Method;
//! use micro_api::field::{Header, Json};
//! use micro_api::parser::JsonParser;
//! use micro_api::{Client, Request, request_configuration};
//! use micro_api_http::transport::TcpTransport;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! struct CreateUser {
//!     name: Json<String>,
//!     token: Header,
//! }
//!
//! request_configuration!(CreateUser { name, token });
//!
//! impl Request for CreateUser {
//!     type Configuration = Self;
//!     type Parser = JsonParser<User>;
//!
//!     fn base(&self) -> &str {
//!         "http://127.0.0.1:8080/api"
//!     }
//!
//!     fn path(&self) -> &str {
//!         "users"
//!     }
//!
//!     fn method(&self) -> Method {
//!         Method::POST
//!     }
//!
//!     fn configuration(&self) -> &Self {
//!         self
//!     }
//!
//!     fn parser(&self) -> Self::Parser {
//!         JsonParser::new()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), micro_api::RequestError> {
//!     let client = Client::new(TcpTransport::new());
//!     let request = CreateUser {
//!         name: Json::new("name", Some("zava".to_string())),
//!         token: Header::new("x-token", Some("secret".to_string())),
//!     };
//!
//!     let user = client.send(&request).await?;
//!     println!("created {user:?}");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`field`]: the tags, `Query`, `Json`, `Header` ...
//! - [`configuration`]: discovery of the tagged fields of a value
//! - [`merge`]: duplicate-free parameter and header sets
//! - [`compose`]: query string or body placement and serialization
//! - [`request`]: the [`Request`] description and [`build_request`]
//! - [`parser`]: response payload parsers
//! - [`pipeline`]: the call state machine and the [`Client`]
//!
//! The wire side lives in `micro-api-http`, any
//! [`Transport`](micro_api_http::transport::Transport) can be injected.

pub mod compose;
pub mod configuration;
pub mod field;
pub mod merge;
pub mod parser;
pub mod pipeline;
pub mod request;

mod error;
mod utils;

pub(crate) use utils::ensure;

pub use error::DecodeError;
pub use error::ParameterError;
pub use error::RequestError;
pub use error::ResponseError;
pub use error::ValidationError;
pub use pipeline::Client;
pub use pipeline::TypedResponse;
pub use pipeline::perform;
pub use request::Request;
pub use request::build_request;
