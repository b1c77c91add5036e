use serde_json::{Map, Value};
use tracing::trace;

use crate::ParameterError;
use crate::field::{Encoding, Parameter};

/// Merged parameters of one request, all sharing one encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    encoding: Option<Encoding>,
    entries: Map<String, Value>,
}

impl ParameterSet {
    /// The encoding fixed by the first merged field, `None` when nothing was merged.
    pub fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    /// The entries in insertion order.
    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn into_entries(self) -> Map<String, Value> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// An empty set contributes nothing to the request, whatever its encoding.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merges parameter fields in order.
///
/// The first field fixes the encoding and every later field must use the same
/// one, unset fields included. Keys must be unique across all fields.
pub fn merge<'a, I>(fields: I) -> Result<ParameterSet, ParameterError>
where
    I: IntoIterator<Item = &'a dyn Parameter>,
{
    let mut set = ParameterSet::default();

    for field in fields {
        let encoding = field.encoding();
        match set.encoding {
            Some(expected) if expected != encoding => {
                return Err(ParameterError::mismatched_encoding(expected, encoding));
            }
            Some(_) => {}
            None => set.encoding = Some(encoding),
        }

        for (key, value) in field.parameters()? {
            if set.entries.contains_key(&key) {
                return Err(ParameterError::duplicate_key(key));
            }
            set.entries.insert(key, value);
        }
    }

    trace!(encoding = ?set.encoding, size = set.len(), "merged parameters");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, Json, KeyQuery, Param, Query, QueryDict};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn empty_input() {
        let set = merge(Vec::<&dyn Parameter>::new()).unwrap();

        assert_eq!(set.encoding(), None);
        assert!(set.is_empty());
    }

    #[test]
    fn keeps_declaration_order_and_drops_unset() {
        let zebra = Query::new("zebra", Some(1));
        let unset: Query<u8> = Query::new("unset", None);
        let apple = Query::new("apple", Some("x"));
        let flag = KeyQuery::new("flag", true);

        let set = merge([&zebra as &dyn Parameter, &unset, &apple, &flag]).unwrap();

        assert_eq!(set.encoding(), Some(Encoding::UrlQuery));
        let keys: Vec<_> = set.entries().keys().cloned().collect();
        assert_eq!(keys, vec!["zebra", "apple", "flag"]);
        assert_eq!(set.entries()["zebra"], json!(1));
        assert_eq!(set.entries()["flag"], Value::Null);
    }

    #[test]
    fn duplicate_key_regardless_of_value() {
        let first = Json::new("name", Some("a"));
        let second = Json::new("name", Some(3));

        let result = merge([&first as &dyn Parameter, &second]);

        assert!(matches!(result, Err(ParameterError::DuplicateKey { key }) if key == "name"));
    }

    #[test]
    fn duplicate_key_inside_a_dict() {
        let page = Query::new("page", Some(1));
        let dict = QueryDict::new(Some(BTreeMap::from([("page", 2)])));

        let result = merge([&page as &dyn Parameter, &dict]);

        assert!(matches!(result, Err(ParameterError::DuplicateKey { key }) if key == "page"));
    }

    #[test]
    fn query_and_json_do_not_mix() {
        let page = Query::new("page", Some(1));
        let name = Json::new("name", Some("a"));

        let result = merge([&page as &dyn Parameter, &name]);

        assert!(matches!(
            result,
            Err(ParameterError::MismatchedEncoding { expected: Encoding::UrlQuery, found: Encoding::JsonBody })
        ));
    }

    #[test]
    fn json_and_form_do_not_mix() {
        let name = Json::new("name", Some("a"));
        let age = Field::new("age", Some(3));

        let result = merge([&name as &dyn Parameter, &age]);

        assert!(matches!(result, Err(ParameterError::MismatchedEncoding { .. })));
    }

    #[test]
    fn unset_field_still_has_to_agree_on_encoding() {
        let page = Query::new("page", Some(1));
        let unset: Param<u8> = Param::new("q", None);

        let result = merge([&page as &dyn Parameter, &unset]);

        assert!(matches!(result, Err(ParameterError::MismatchedEncoding { .. })));
    }

    #[test]
    fn empty_key_fails_the_merge() {
        let page = Query::new("", Some(1));

        assert!(matches!(merge([&page as &dyn Parameter]), Err(ParameterError::EmptyKey)));
    }
}
