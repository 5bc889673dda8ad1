//! Keyed input sources.
//!
//! A source is whatever hands the validator raw field values by name:
//! decoded query parameters, a parsed form body, a JSON object. The
//! validator never reads ambient request state; callers pass the source in.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A flat name → string lookup.
///
/// ## Example
///
/// ```rust
/// use formguard::KeyedSource;
/// use std::collections::HashMap;
///
/// let mut params = HashMap::new();
/// params.insert("name".to_string(), "Alice".to_string());
///
/// assert!(params.has("name"));
/// assert_eq!(KeyedSource::get(&params, "name"), Some("Alice"));
/// ```
pub trait KeyedSource {
    /// Raw value for `key`, if present.
    fn get(&self, key: &str) -> Option<&str>;

    /// Whether `key` is present.
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<S: BuildHasher> KeyedSource for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl<S: BuildHasher> KeyedSource for HashMap<&str, &str, S> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).copied()
    }
}

impl KeyedSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

impl KeyedSource for BTreeMap<&str, &str> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).copied()
    }
}

/// Ordered pairs, as produced by most query-string decoders. The first
/// occurrence of a key wins.
impl<K: AsRef<str>, V: AsRef<str>> KeyedSource for [(K, V)] {
    fn get(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> KeyedSource for Vec<(K, V)> {
    fn get(&self, key: &str) -> Option<&str> {
        KeyedSource::get(self.as_slice(), key)
    }
}

/// JSON objects expose string members only; other member types read as
/// absent.
impl KeyedSource for serde_json::Map<String, serde_json::Value> {
    fn get(&self, key: &str) -> Option<&str> {
        serde_json::Map::get(self, key).and_then(serde_json::Value::as_str)
    }
}
