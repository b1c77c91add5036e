use bytes::Bytes;
use mime::Mime;

use crate::DecodeError;
use crate::parser::Parser;

/// Reads the payload as utf-8 text. Sends no `Accept` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl Parser for StringParser {
    type Output = String;

    fn content_type(&self) -> Option<Mime> {
        None
    }

    fn parse(&self, body: Bytes) -> Result<String, DecodeError> {
        Ok(std::str::from_utf8(&body)?.to_owned())
    }
}
