use std::ops::{Deref, DerefMut};

use serde::Serialize;
use serde_json::Value;

use crate::ParameterError;
use crate::ensure;
use crate::field::{Encoding, Parameter, Tagged, TaggedField};

keyed_parameter! {
    /// A parameter percent-encoded into the url query string.
    Query => Encoding::UrlQuery
}

keyed_parameter! {
    /// A url encoded parameter whose placement follows the http method.
    ///
    /// For methods that carry no body (GET, HEAD, DELETE ...) it lands in the
    /// query string, otherwise in a form url-encoded body.
    Param => Encoding::UrlMethodDependent
}

/// Several query parameters at once.
///
/// The value must serialize to a map, every entry becomes one query
/// parameter and is checked for empty and duplicate keys like any other field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDict<T> {
    value: Option<T>,
}

impl<T> QueryDict<T> {
    /// Tags a map-like `value`; `None` contributes no parameters.
    pub fn new(value: Option<T>) -> Self {
        Self { value }
    }

    /// Unwraps the tag, returning the value.
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T> Deref for QueryDict<T> {
    type Target = Option<T>;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> DerefMut for QueryDict<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<T: Serialize> Parameter for QueryDict<T> {
    fn encoding(&self) -> Encoding {
        Encoding::UrlQuery
    }

    fn parameters(&self) -> Result<Vec<(String, Value)>, ParameterError> {
        let Some(value) = &self.value else {
            return Ok(Vec::new());
        };

        let Value::Object(map) = serde_json::to_value(value).map_err(ParameterError::encode)? else {
            return Err(ParameterError::encode("query dict must serialize to a map"));
        };

        let mut parameters = Vec::with_capacity(map.len());
        for (key, value) in map {
            ensure!(!key.is_empty(), ParameterError::EmptyKey);
            parameters.push((key, value));
        }
        Ok(parameters)
    }
}

impl<T: Serialize> Tagged for QueryDict<T> {
    fn tagged(&self) -> TaggedField<'_> {
        TaggedField::Parameter(self)
    }
}

/// A query key without value, e.g. `?verbose`.
///
/// Present in the query string when set to `true`, absent otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyQuery {
    key: String,
    value: bool,
}

impl KeyQuery {
    /// Tags `key`, sent as a bare key while `value` is `true`.
    pub fn new<K: Into<String>>(key: K, value: bool) -> Self {
        Self { key: key.into(), value }
    }

    /// The key this field is sent under.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Deref for KeyQuery {
    type Target = bool;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl DerefMut for KeyQuery {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl Parameter for KeyQuery {
    fn encoding(&self) -> Encoding {
        Encoding::UrlQuery
    }

    fn parameters(&self) -> Result<Vec<(String, Value)>, ParameterError> {
        ensure!(!self.key.is_empty(), ParameterError::EmptyKey);

        if self.value { Ok(vec![(self.key.clone(), Value::Null)]) } else { Ok(Vec::new()) }
    }
}

impl Tagged for KeyQuery {
    fn tagged(&self) -> TaggedField<'_> {
        TaggedField::Parameter(self)
    }
}
