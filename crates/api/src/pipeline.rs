//! The request pipeline
//!
//! Every call walks the same stages, strictly in order:
//!
//! ```text
//! Building -> Sent -> Validating -> Parsing -> Completed
//! ```
//!
//! A failure at any stage jumps straight to `Completed` with the error of
//! that stage. Building errors therefore never reach the transport.
//!
//! The transport round-trip is the only suspension point. Cancelling the
//! token before it short-circuits without sending; cancelling during it drops
//! the in-flight transport future. Either way the call resolves to
//! [`RequestError::Cancelled`] once and reaches no later stage.

use std::fmt;

use http::{HeaderMap, StatusCode};
use micro_api_http::transport::Transport;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::RequestError;
use crate::parser::Parser;
use crate::request::{Output, Request, build_request};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Building,
    Sent,
    Validating,
    Parsing,
    Completed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Building => "building",
            Self::Sent => "sent",
            Self::Validating => "validating",
            Self::Parsing => "parsing",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// A successfully parsed response.
#[derive(Debug, Clone)]
pub struct TypedResponse<T> {
    status: StatusCode,
    headers: HeaderMap,
    value: T,
}

impl<T> TypedResponse<T> {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, T) {
        (self.status, self.headers, self.value)
    }
}

/// Runs one call of `request` over `transport`.
pub async fn perform<R, T>(
    request: &R,
    transport: &T,
    cancel: &CancellationToken,
) -> Result<TypedResponse<Output<R>>, RequestError>
where
    R: Request + ?Sized,
    T: Transport + ?Sized,
{
    let result = run(request, transport, cancel).await;
    match &result {
        Ok(response) => debug!(stage = %Stage::Completed, status = response.status.as_u16(), "request succeeded"),
        Err(RequestError::Cancelled) => debug!(stage = %Stage::Completed, "request cancelled"),
        Err(e) => warn!(stage = %Stage::Completed, cause = %e, "request failed"),
    }
    result
}

async fn run<R, T>(request: &R, transport: &T, cancel: &CancellationToken) -> Result<TypedResponse<Output<R>>, RequestError>
where
    R: Request + ?Sized,
    T: Transport + ?Sized,
{
    trace!(stage = %Stage::Building, "building request");
    let built = request.intercept_request(build_request(request)?)?;

    if cancel.is_cancelled() {
        return Err(RequestError::Cancelled);
    }

    trace!(stage = %Stage::Sent, method = %built.method(), uri = %built.uri(), "sending request");
    let response = tokio::select! {
        biased;

        () = cancel.cancelled() => return Err(RequestError::Cancelled),
        response = transport.send(built) => response?,
    };

    trace!(stage = %Stage::Validating, status = response.status().as_u16(), "validating response");
    request.intercept_response(&response)?;

    trace!(stage = %Stage::Parsing, body_size = response.body().len(), "parsing response");
    let (parts, body) = response.into_parts();
    let value = request.parser().parse(body)?;

    Ok(TypedResponse { status: parts.status, headers: parts.headers, value })
}

/// Sends requests through an injected transport.
///
/// # Example
/// ```no_run
/// use micro_api::Client;
/// use micro_api_http::transport::TcpTransport;
/// # use micro_api::Request;
///
/// # async fn run<R: Request>(request: R) -> Result<(), micro_api::RequestError> {
/// let client = Client::new(TcpTransport::new());
/// let value = client.send(&request).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Performs `request` and returns only the parsed value.
    pub async fn send<R: Request + ?Sized>(&self, request: &R) -> Result<Output<R>, RequestError> {
        self.perform(request).await.map(TypedResponse::into_value)
    }

    pub async fn perform<R: Request + ?Sized>(&self, request: &R) -> Result<TypedResponse<Output<R>>, RequestError> {
        perform(request, &self.transport, &CancellationToken::new()).await
    }

    pub async fn perform_with_cancel<R: Request + ?Sized>(
        &self,
        request: &R,
        cancel: &CancellationToken,
    ) -> Result<TypedResponse<Output<R>>, RequestError> {
        perform(request, &self.transport, cancel).await
    }
}
