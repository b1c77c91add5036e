use tracing::trace;

use crate::ParameterError;
use crate::field::HeaderField;

/// Merged caller headers in insertion order.
///
/// Keys are compared as opaque strings, how case is treated is left to the
/// transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for HeaderSet {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Merges header fields in order, a repeated key is an error rather than an override.
pub fn merge_headers<'a, I>(fields: I) -> Result<HeaderSet, ParameterError>
where
    I: IntoIterator<Item = &'a dyn HeaderField>,
{
    let mut set = HeaderSet::default();

    for field in fields {
        for (key, value) in field.header()? {
            if set.get(&key).is_some() {
                return Err(ParameterError::duplicate_key(key));
            }
            set.entries.push((key, value));
        }
    }

    trace!(size = set.len(), "merged headers");
    Ok(set)
}
