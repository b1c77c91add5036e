use bytes::Bytes;
use mime::Mime;

use crate::DecodeError;
use crate::parser::Parser;

/// Hands back the raw payload untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesParser;

impl Parser for BytesParser {
    type Output = Bytes;

    fn content_type(&self) -> Option<Mime> {
        None
    }

    fn parse(&self, body: Bytes) -> Result<Bytes, DecodeError> {
        Ok(body)
    }
}
