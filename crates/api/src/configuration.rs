//! Field discovery
//!
//! Rust has no runtime reflection, so a configuration type describes its
//! tagged fields through [`RequestConfiguration::fields`]. The
//! [`request_configuration!`](crate::request_configuration) macro writes that
//! method from a list of field names; fields left out of the list are not
//! discovered.

use std::fmt;

use tracing::trace;

use crate::field::{HeaderField, Parameter, TaggedField};

/// A value holding the tagged fields of a request.
pub trait RequestConfiguration {
    /// The tagged fields in declaration order.
    fn fields(&self) -> Vec<TaggedField<'_>>;
}

impl RequestConfiguration for () {
    fn fields(&self) -> Vec<TaggedField<'_>> {
        Vec::new()
    }
}

/// Implements [`RequestConfiguration`] by listing the tagged fields of a struct.
///
/// # Example
/// ```
/// use micro_api::field::{Header, Query};
/// use micro_api::request_configuration;
///
/// struct ListUsers {
///     page: Query<u32>,
///     token: Header,
///     note: String,
/// }
///
/// request_configuration!(ListUsers { page, token });
/// ```
#[macro_export]
macro_rules! request_configuration {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::configuration::RequestConfiguration for $ty {
            fn fields(&self) -> ::std::vec::Vec<$crate::field::TaggedField<'_>> {
                ::std::vec![$($crate::field::Tagged::tagged(&self.$field)),*]
            }
        }
    };
}

/// The tagged fields of a configuration, split by role.
#[derive(Default)]
pub struct Discovered<'a> {
    parameters: Vec<&'a dyn Parameter>,
    headers: Vec<&'a dyn HeaderField>,
}

impl<'a> Discovered<'a> {
    /// Query and body parameters together, in declaration order.
    pub fn parameters(&self) -> &[&'a dyn Parameter] {
        &self.parameters
    }

    pub fn query(&self) -> impl Iterator<Item = &'a dyn Parameter> + '_ {
        self.parameters.iter().copied().filter(|parameter| !parameter.encoding().requires_body())
    }

    pub fn body(&self) -> impl Iterator<Item = &'a dyn Parameter> + '_ {
        self.parameters.iter().copied().filter(|parameter| parameter.encoding().requires_body())
    }

    pub fn headers(&self) -> &[&'a dyn HeaderField] {
        &self.headers
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.headers.is_empty()
    }
}

impl fmt::Debug for Discovered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discovered")
            .field("query", &self.query().count())
            .field("body", &self.body().count())
            .field("headers", &self.headers.len())
            .finish()
    }
}

/// Collects the tagged fields of `configuration`. Never fails.
pub fn discover<C: RequestConfiguration + ?Sized>(configuration: &C) -> Discovered<'_> {
    let mut discovered = Discovered::default();
    for field in configuration.fields() {
        match field {
            TaggedField::Parameter(parameter) => discovered.parameters.push(parameter),
            TaggedField::Header(header) => discovered.headers.push(header),
        }
    }

    trace!(?discovered, "discovered tagged fields");
    discovered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Encoding, Field, Header, Json, KeyQuery, Query};

    struct Search {
        term: Query<String>,
        token: Header,
        verbose: KeyQuery,
        name: Json<String>,
        extra: Field<u8>,
        #[allow(dead_code, reason = "untagged fields are not listed")]
        note: String,
    }

    request_configuration!(Search { term, token, verbose, name, extra });

    fn search() -> Search {
        Search {
            term: Query::new("term", Some("rust".to_string())),
            token: Header::new("x-token", None),
            verbose: KeyQuery::new("verbose", true),
            name: Json::new("name", None),
            extra: Field::new("extra", Some(1)),
            note: "ignored".to_string(),
        }
    }

    #[test]
    fn empty_configuration() {
        assert!(discover(&()).is_empty());
    }

    #[test]
    fn splits_fields_by_role_in_declaration_order() {
        let search = search();
        let discovered = discover(&search);

        let query: Vec<_> = discovered.query().map(|parameter| parameter.encoding()).collect();
        let body: Vec<_> = discovered.body().map(|parameter| parameter.encoding()).collect();

        assert_eq!(query, vec![Encoding::UrlQuery, Encoding::UrlQuery]);
        assert_eq!(body, vec![Encoding::JsonBody, Encoding::UrlBody]);
        assert_eq!(discovered.parameters().len(), 4);
        assert_eq!(discovered.headers().len(), 1);
    }

    #[test]
    fn unset_fields_are_still_discovered() {
        let search = search();
        let discovered = discover(&search);

        assert!(discovered.headers()[0].header().unwrap().is_empty());
    }
}
