//! Field tags
//!
//! A configuration value marks its fields with a role by wrapping them in one
//! of the tag types below. Every tag owns its key and an optional value and
//! derefs to that value, so a tagged field reads and writes like the plain
//! value it wraps.
//!
//! | tag            | role                                        |
//! |----------------|---------------------------------------------|
//! | [`Query`]      | url query string                            |
//! | [`QueryDict`]  | url query string, one entry per map entry   |
//! | [`KeyQuery`]   | url query string, a bare key without value  |
//! | [`Param`]      | query string or form body, by http method   |
//! | [`Field`]      | form url-encoded body                       |
//! | [`Json`]       | json body                                   |
//! | [`Header`]     | a request header                            |
//! | [`HeaderDict`] | several request headers                     |
//!
//! # Example
//! ```
//! use micro_api::field::{Header, Query};
//!
//! let mut page = Query::new("page", Some(1_u32));
//! *page = Some(2);
//! assert_eq!(page.key(), "page");
//! assert_eq!(*page, Some(2));
//!
//! let token = Header::new("x-token", None);
//! assert!(token.is_none());
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::ParameterError;
use crate::ensure;

/// Generates a keyed tag wrapping an optional serializable value.
macro_rules! keyed_parameter {
    ($(#[$meta:meta])* $name:ident => $encoding:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name<T> {
            key: String,
            value: Option<T>,
        }

        impl<T> $name<T> {
            /// Tags `value` under `key`; `None` leaves the field out of the request.
            pub fn new<K: Into<String>>(key: K, value: Option<T>) -> Self {
                Self { key: key.into(), value }
            }

            /// The key this field is sent under.
            pub fn key(&self) -> &str {
                &self.key
            }

            /// Unwraps the tag, returning the value.
            pub fn into_inner(self) -> Option<T> {
                self.value
            }
        }

        impl<T> std::ops::Deref for $name<T> {
            type Target = Option<T>;

            fn deref(&self) -> &Self::Target {
                &self.value
            }
        }

        impl<T> std::ops::DerefMut for $name<T> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.value
            }
        }

        impl<T: serde::Serialize> crate::field::Parameter for $name<T> {
            fn encoding(&self) -> crate::field::Encoding {
                $encoding
            }

            fn parameters(&self) -> Result<Vec<(String, serde_json::Value)>, crate::ParameterError> {
                crate::field::keyed_parameters(&self.key, self.value.as_ref())
            }
        }

        impl<T: serde::Serialize> crate::field::Tagged for $name<T> {
            fn tagged(&self) -> crate::field::TaggedField<'_> {
                crate::field::TaggedField::Parameter(self)
            }
        }
    };
}

mod body;
mod header;
mod query;

pub use body::Field;
pub use body::Json;
pub use header::Header;
pub use header::HeaderDict;
pub use query::KeyQuery;
pub use query::Param;
pub use query::Query;
pub use query::QueryDict;

/// Where and how a parameter is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Percent-encoded into the url query string.
    UrlQuery,
    /// Form url-encoded into the request body.
    UrlBody,
    /// Url encoded, into the query string for bodyless methods and into the body otherwise.
    UrlMethodDependent,
    /// Encoded as one json object in the request body.
    JsonBody,
}

impl Encoding {
    /// Whether fields with this encoding insist on a request body.
    pub fn requires_body(self) -> bool {
        matches!(self, Self::UrlBody | Self::JsonBody)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UrlQuery => "url query",
            Self::UrlBody => "url body",
            Self::UrlMethodDependent => "url (method dependent)",
            Self::JsonBody => "json body",
        };
        f.write_str(name)
    }
}

/// A tagged field contributing query or body parameters.
pub trait Parameter {
    fn encoding(&self) -> Encoding;

    /// The key/value pairs this field contributes, empty when the value is unset.
    ///
    /// Fails with [`ParameterError::EmptyKey`] when the field is keyed by an
    /// empty string, and with [`ParameterError::Encode`] when the value can not
    /// be serialized.
    fn parameters(&self) -> Result<Vec<(String, Value)>, ParameterError>;
}

/// A tagged field contributing request headers.
pub trait HeaderField {
    fn header(&self) -> Result<Vec<(String, String)>, ParameterError>;
}

/// Implemented by every tag, gives access to the field's role.
pub trait Tagged {
    fn tagged(&self) -> TaggedField<'_>;
}

/// A borrowed tagged field as seen by discovery.
#[derive(Clone, Copy)]
pub enum TaggedField<'a> {
    Parameter(&'a dyn Parameter),
    Header(&'a dyn HeaderField),
}

impl fmt::Debug for TaggedField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter(parameter) => f.debug_tuple("Parameter").field(&parameter.encoding()).finish(),
            Self::Header(_) => f.write_str("Header"),
        }
    }
}

fn keyed_parameters<T: Serialize>(key: &str, value: Option<&T>) -> Result<Vec<(String, Value)>, ParameterError> {
    ensure!(!key.is_empty(), ParameterError::EmptyKey);

    let Some(value) = value else {
        return Ok(Vec::new());
    };

    let value = serde_json::to_value(value).map_err(ParameterError::encode)?;
    Ok(vec![(key.to_owned(), value)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_value_contributes_nothing() {
        let query: Query<u32> = Query::new("page", None);

        assert!(query.parameters().unwrap().is_empty());
    }

    #[test]
    fn set_value_contributes_one_pair() {
        let json = Json::new("user", Some(json!({"name": "a", "age": 3})));

        assert_eq!(json.encoding(), Encoding::JsonBody);
        assert_eq!(json.parameters().unwrap(), vec![("user".to_string(), json!({"name": "a", "age": 3}))]);
    }

    #[test]
    fn empty_key_is_rejected_when_read() {
        let field = Field::new("", Some("value"));

        assert!(matches!(field.parameters(), Err(ParameterError::EmptyKey)));
    }

    #[test]
    fn empty_key_is_rejected_even_without_value() {
        let param: Param<u8> = Param::new("", None);

        assert!(matches!(param.parameters(), Err(ParameterError::EmptyKey)));
    }

    #[test]
    fn deref_reads_and_writes_the_value() {
        let mut query = Query::new("page", Some(1));
        *query = Some(5);

        assert_eq!(*query, Some(5));
        assert_eq!(query.into_inner(), Some(5));
    }

    #[test]
    fn body_encodings_require_a_body() {
        assert!(Encoding::JsonBody.requires_body());
        assert!(Encoding::UrlBody.requires_body());
        assert!(!Encoding::UrlQuery.requires_body());
        assert!(!Encoding::UrlMethodDependent.requires_body());
    }
}
