//! The transport boundary
//!
//! A [`Transport`] sends one fully built request and hands back the complete
//! response. Network level failures surface as
//! [`TransportError`](crate::protocol::TransportError), independent of the
//! http status code. Dropping the future returned by [`Transport::send`] must
//! abandon the round-trip; this is how callers cancel an in-flight request.

mod tcp;

pub use tcp::TcpTransport;
pub use tcp::TcpTransportBuilder;

use std::sync::Arc;

use async_trait::async_trait;

use crate::protocol::{BuiltRequest, RawResponse, TransportError};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: BuiltRequest) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: BuiltRequest) -> Result<RawResponse, TransportError> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, request: BuiltRequest) -> Result<RawResponse, TransportError> {
        (**self).send(request).await
    }
}
