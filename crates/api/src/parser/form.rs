use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use mime::Mime;
use serde::de::DeserializeOwned;

use crate::DecodeError;
use crate::parser::Parser;

/// Deserializes an `application/x-www-form-urlencoded` payload.
///
/// The default output keeps every pair in payload order.
pub struct FormParser<T = Vec<(String, String)>> {
    _output: PhantomData<fn() -> T>,
}

impl<T> FormParser<T> {
    pub fn new() -> Self {
        Self { _output: PhantomData }
    }
}

impl<T> Default for FormParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FormParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FormParser")
    }
}

impl<T: DeserializeOwned> Parser for FormParser<T> {
    type Output = T;

    fn content_type(&self) -> Option<Mime> {
        Some(mime::APPLICATION_WWW_FORM_URLENCODED)
    }

    fn parse(&self, body: Bytes) -> Result<T, DecodeError> {
        Ok(serde_urlencoded::from_bytes(&body)?)
    }
}
