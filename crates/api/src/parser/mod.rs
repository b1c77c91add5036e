//! Response parsers
//!
//! A [`Parser`] turns the raw response payload into the request's output
//! type. Its content type, when present, is sent as the `Accept` header.

mod bytes;
mod form;
mod json;
mod string;

pub use self::bytes::BytesParser;
pub use form::FormParser;
pub use json::JsonParser;
pub use string::StringParser;

use ::bytes::Bytes;
use mime::Mime;

use crate::DecodeError;

pub trait Parser: Send + Sync {
    type Output;

    fn content_type(&self) -> Option<Mime>;

    fn parse(&self, body: Bytes) -> Result<Self::Output, DecodeError>;
}
