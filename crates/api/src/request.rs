//! Request descriptions
//!
//! A type implementing [`Request`] describes one api call: where it goes,
//! which method it uses, which tagged fields it carries and how its response
//! is parsed. [`build_request`] turns it into a [`BuiltRequest`].

use std::ops::Range;

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::uri::PathAndQuery;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use micro_api_http::protocol::{BuiltRequest, RawResponse};
use tracing::debug;

use crate::compose::{BodyPlan, compose};
use crate::configuration::{RequestConfiguration, discover};
use crate::ensure;
use crate::merge::{HeaderSet, merge, merge_headers};
use crate::parser::Parser;
use crate::{ParameterError, RequestError, ResponseError};

/// The description of one api call.
///
/// # Example
/// ```
/// use http::Method;
/// use micro_api::field::{Header, Query};
/// use micro_api::parser::JsonParser;
/// use micro_api::{Request, request_configuration};
///
/// struct ListRepos {
///     page: Query<u32>,
///     token: Header,
/// }
///
/// request_configuration!(ListRepos { page, token });
///
/// impl Request for ListRepos {
///     type Configuration = Self;
///     type Parser = JsonParser<Vec<String>>;
///
///     fn base(&self) -> &str {
///         "http://api.example.com"
///     }
///
///     fn path(&self) -> &str {
///         "repos"
///     }
///
///     fn method(&self) -> Method {
///         Method::GET
///     }
///
///     fn configuration(&self) -> &Self {
///         self
///     }
///
///     fn parser(&self) -> Self::Parser {
///         JsonParser::new()
///     }
/// }
///
/// let request = ListRepos { page: Query::new("page", Some(2)), token: Header::new("x-token", None) };
/// let built = micro_api::build_request(&request).unwrap();
/// assert_eq!(built.uri(), "http://api.example.com/repos?page=2");
/// ```
pub trait Request: Send + Sync {
    type Configuration: RequestConfiguration;

    type Parser: Parser;

    /// The base url, scheme and authority included.
    fn base(&self) -> &str;

    /// Appended to the base as a path component. Empty means the base is used verbatim.
    fn path(&self) -> &str {
        ""
    }

    fn method(&self) -> Method;

    /// The value holding the tagged fields, often the request itself.
    fn configuration(&self) -> &Self::Configuration;

    fn parser(&self) -> Self::Parser;

    /// Last chance to adjust the request before it is sent.
    fn intercept_request(&self, request: BuiltRequest) -> Result<BuiltRequest, RequestError> {
        Ok(request)
    }

    fn acceptable_status(&self) -> Range<u16> {
        200..300
    }

    /// Validates the raw response before it is parsed.
    ///
    /// The default rejects any status outside [`Request::acceptable_status`].
    /// Overrides also see the raw payload, which parse errors never carry.
    fn intercept_response(&self, response: &RawResponse) -> Result<(), ResponseError> {
        let status = response.status().as_u16();
        ensure!(self.acceptable_status().contains(&status), ResponseError::UnacceptableStatusCode(status));
        Ok(())
    }
}

pub type Output<R> = <<R as Request>::Parser as Parser>::Output;

/// Assembles the request described by `request`.
///
/// Fails before anything is sent when a tagged field is invalid, when the
/// parameters do not agree on an encoding, or when the url can not be built.
pub fn build_request<R: Request + ?Sized>(request: &R) -> Result<BuiltRequest, RequestError> {
    let method = request.method();
    let base = join_path(request.base(), request.path())?;

    let discovered = discover(request.configuration());
    let parameters = merge(discovered.parameters().iter().copied())?;
    let caller_headers = merge_headers(discovered.headers().iter().copied())?;
    let plan = compose(&method, parameters)?;

    let uri = append_query(base, plan.query())?;

    let mut headers = header_map(caller_headers)?;
    if let Some(accept) = request.parser().content_type() {
        insert_default(&mut headers, ACCEPT, accept.as_ref())?;
    }
    if let Some(content_type) = plan.content_type() {
        insert_default(&mut headers, CONTENT_TYPE, content_type.as_ref())?;
    }

    let body = match plan {
        BodyPlan::Body { bytes, .. } => Some(bytes),
        BodyPlan::None | BodyPlan::Query(_) => None,
    };

    debug!(%method, %uri, headers = headers.len(), body_size = body.as_ref().map(Bytes::len), "built request");

    let mut built = http::Request::new(body);
    *built.method_mut() = method;
    *built.uri_mut() = uri;
    *built.headers_mut() = headers;
    Ok(BuiltRequest::from(built))
}

/// Joins `path` onto `base` as one path component.
fn join_path(base: &str, path: &str) -> Result<Uri, ParameterError> {
    let base: Uri = base.parse().map_err(ParameterError::invalid_url)?;
    let (Some(scheme), Some(authority)) = (base.scheme(), base.authority()) else {
        return Err(ParameterError::invalid_url(format!("{base} is not an absolute url")));
    };

    if path.is_empty() {
        return Ok(base);
    }
    ensure!(
        !path.contains(['?', '#']),
        ParameterError::invalid_url(format!("path {path:?} must not carry a query or a fragment"))
    );

    let mut joined = format!("{}/{}", base.path().trim_end_matches('/'), path.trim_start_matches('/'));
    if let Some(query) = base.query() {
        joined.push('?');
        joined.push_str(query);
    }

    Uri::builder()
        .scheme(scheme.clone())
        .authority(authority.clone())
        .path_and_query(joined)
        .build()
        .map_err(ParameterError::invalid_url)
}

/// Appends `query`, extending a query already present on `uri`.
fn append_query(uri: Uri, query: Option<&str>) -> Result<Uri, ParameterError> {
    let Some(query) = query else {
        return Ok(uri);
    };

    let mut parts = uri.into_parts();
    let path_and_query = match parts.path_and_query.as_ref() {
        Some(current) => match current.query() {
            Some(existing) if !existing.is_empty() => format!("{}?{existing}&{query}", current.path()),
            _ => format!("{}?{query}", current.path()),
        },
        None => format!("/?{query}"),
    };

    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).map_err(ParameterError::invalid_url)?);
    Uri::from_parts(parts).map_err(ParameterError::invalid_url)
}

fn header_map(headers: HeaderSet) -> Result<HeaderMap, ParameterError> {
    let mut map = HeaderMap::with_capacity(headers.len() + 2);
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(ParameterError::invalid_header)?;
        let value = HeaderValue::try_from(value).map_err(ParameterError::invalid_header)?;
        map.append(name, value);
    }
    Ok(map)
}

/// A caller header of the same name takes precedence over the default.
fn insert_default(headers: &mut HeaderMap, name: HeaderName, value: &str) -> Result<(), ParameterError> {
    if !headers.contains_key(&name) {
        headers.insert(name, HeaderValue::from_str(value).map_err(ParameterError::invalid_header)?);
    }
    Ok(())
}
