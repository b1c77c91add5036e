use std::ops::{Deref, DerefMut};

use crate::ParameterError;
use crate::ensure;
use crate::field::{HeaderField, Tagged, TaggedField};

/// A single request header, omitted while unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    key: String,
    value: Option<String>,
}

impl Header {
    /// Tags a header named `key`; `None` leaves it out of the request.
    pub fn new<K: Into<String>>(key: K, value: Option<String>) -> Self {
        Self { key: key.into(), value }
    }

    /// The header name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Unwraps the tag, returning the header value.
    pub fn into_inner(self) -> Option<String> {
        self.value
    }
}

impl Deref for Header {
    type Target = Option<String>;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl DerefMut for Header {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl HeaderField for Header {
    fn header(&self) -> Result<Vec<(String, String)>, ParameterError> {
        ensure!(!self.key.is_empty(), ParameterError::EmptyKey);

        Ok(self.value.iter().map(|value| (self.key.clone(), value.clone())).collect())
    }
}

impl Tagged for Header {
    fn tagged(&self) -> TaggedField<'_> {
        TaggedField::Header(self)
    }
}

/// A bulk set of request headers, contributed entry by entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderDict {
    value: Option<Vec<(String, String)>>,
}

impl HeaderDict {
    /// Tags a list of `(name, value)` pairs, sent in order.
    pub fn new(value: Option<Vec<(String, String)>>) -> Self {
        Self { value }
    }

    /// Unwraps the tag, returning the pairs.
    pub fn into_inner(self) -> Option<Vec<(String, String)>> {
        self.value
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(Some(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect()))
    }
}

impl Deref for HeaderDict {
    type Target = Option<Vec<(String, String)>>;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl DerefMut for HeaderDict {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl HeaderField for HeaderDict {
    fn header(&self) -> Result<Vec<(String, String)>, ParameterError> {
        let entries = self.value.as_deref().unwrap_or_default();
        for (key, _) in entries {
            ensure!(!key.is_empty(), ParameterError::EmptyKey);
        }
        Ok(entries.to_vec())
    }
}

impl Tagged for HeaderDict {
    fn tagged(&self) -> TaggedField<'_> {
        TaggedField::Header(self)
    }
}
