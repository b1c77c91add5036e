//! Body composition
//!
//! Decides whether merged parameters go to the url query string or to the
//! request body and serializes them accordingly.
//!
//! Url encoding flattens json values as follows:
//! - strings, numbers and booleans: `key=value`
//! - `null`: a bare `key`
//! - arrays: the key repeated once per element
//! - objects: one `key[sub]=value` pair per member

use bytes::Bytes;
use http::Method;
use micro_api_http::protocol::carries_body;
use mime::Mime;
use serde_json::{Map, Value};
use tracing::trace;

use crate::ensure;
use crate::field::Encoding;
use crate::merge::ParameterSet;
use crate::{ParameterError, RequestError, ValidationError};

/// Where the merged parameters end up.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyPlan {
    /// Nothing to add to the request.
    None,
    /// An encoded query string, without the leading `?`.
    Query(String),
    /// A request body and its content type.
    Body { content_type: Mime, bytes: Bytes },
}

impl BodyPlan {
    /// The query string, when the parameters go to the url.
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Query(query) => Some(query),
            _ => None,
        }
    }

    /// The body content type, when the parameters go to the body.
    pub fn content_type(&self) -> Option<&Mime> {
        match self {
            Self::Body { content_type, .. } => Some(content_type),
            _ => None,
        }
    }
}

/// Places `set` for a request with `method`.
///
/// A body-bound set on a method that carries no body is a
/// [`ValidationError::BodyInBodylessRequest`]; it is never moved to the query
/// string silently. An empty set contributes nothing.
pub fn compose(method: &Method, set: ParameterSet) -> Result<BodyPlan, RequestError> {
    let Some(encoding) = set.encoding() else {
        return Ok(BodyPlan::None);
    };
    if set.is_empty() {
        return Ok(BodyPlan::None);
    }

    let bodyless = !carries_body(method);
    let plan = match encoding {
        Encoding::UrlQuery => query_plan(set.entries())?,
        Encoding::UrlMethodDependent if bodyless => query_plan(set.entries())?,
        Encoding::UrlMethodDependent | Encoding::UrlBody => {
            ensure!(!bodyless, ValidationError::BodyInBodylessRequest { method: method.clone() }.into());
            BodyPlan::Body {
                content_type: mime::APPLICATION_WWW_FORM_URLENCODED,
                bytes: Bytes::from(url_encode(set.entries())?),
            }
        }
        Encoding::JsonBody => {
            ensure!(!bodyless, ValidationError::BodyInBodylessRequest { method: method.clone() }.into());
            let bytes = serde_json::to_vec(&set.into_entries()).map_err(ParameterError::encode)?;
            BodyPlan::Body { content_type: mime::APPLICATION_JSON, bytes: Bytes::from(bytes) }
        }
    };

    trace!(%method, %encoding, ?plan, "composed parameters");
    Ok(plan)
}

/// Values that flatten to no pairs, like an empty array, leave the url alone.
fn query_plan(entries: &Map<String, Value>) -> Result<BodyPlan, ParameterError> {
    let query = url_encode(entries)?;
    if query.is_empty() {
        return Ok(BodyPlan::None);
    }
    Ok(BodyPlan::Query(query))
}

/// Url encodes `entries` in insertion order, `&` separated.
pub fn url_encode(entries: &Map<String, Value>) -> Result<String, ParameterError> {
    let mut pairs = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        flatten(key.clone(), value, &mut pairs);
    }

    let mut encoded = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        let piece = match value {
            Some(value) => serde_urlencoded::to_string([(key, value)]).map_err(ParameterError::encode)?,
            None => {
                let piece = serde_urlencoded::to_string([(key, "")]).map_err(ParameterError::encode)?;
                piece.strip_suffix('=').map(str::to_owned).unwrap_or(piece)
            }
        };
        encoded.push(piece);
    }
    Ok(encoded.join("&"))
}

fn flatten(key: String, value: &Value, pairs: &mut Vec<(String, Option<String>)>) {
    match value {
        Value::Null => pairs.push((key, None)),
        Value::Bool(b) => pairs.push((key, Some(b.to_string()))),
        Value::Number(n) => pairs.push((key, Some(n.to_string()))),
        Value::String(s) => pairs.push((key, Some(s.clone()))),
        Value::Array(values) => {
            for value in values {
                flatten(key.clone(), value, pairs);
            }
        }
        Value::Object(members) => {
            for (sub, value) in members {
                flatten(format!("{key}[{sub}]"), value, pairs);
            }
        }
    }
}
