use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use mime::Mime;
use serde::de::DeserializeOwned;

use crate::DecodeError;
use crate::parser::Parser;

/// Deserializes an `application/json` payload into `T`.
pub struct JsonParser<T> {
    _output: PhantomData<fn() -> T>,
}

impl<T> JsonParser<T> {
    pub fn new() -> Self {
        Self { _output: PhantomData }
    }
}

impl<T> Default for JsonParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonParser")
    }
}

impl<T: DeserializeOwned> Parser for JsonParser<T> {
    type Output = T;

    fn content_type(&self) -> Option<Mime> {
        Some(mime::APPLICATION_JSON)
    }

    fn parse(&self, body: Bytes) -> Result<T, DecodeError> {
        Ok(serde_json::from_slice(&body)?)
    }
}
