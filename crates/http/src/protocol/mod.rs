//! Protocol types shared by the engine and the transports.
//!
//! - [`BuiltRequest`]: the immutable outbound request, consumed once by a transport
//! - [`RawResponse`] / [`ResponseHead`]: what comes back over the wire
//! - [`Message`], [`PayloadItem`], [`PayloadSize`]: items of the streaming response decoder
//! - [`TransportError`], [`ParseError`]: failures of the round-trip itself

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod request;
pub use request::BuiltRequest;
pub use request::carries_body;

mod response;
pub use response::RawResponse;
pub use response::ResponseHead;

mod error;
pub use error::ParseError;
pub use error::TransportError;
