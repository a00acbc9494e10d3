//! Fixed in-memory context.

use super::NonceContext;
use crate::error::NonceError;
use std::collections::HashMap;

/// Immutable context backed by storage that can only be set at construction.
///
/// Keys keep the position of their first occurrence; a repeated key takes the
/// last value given for it.
///
/// # Example
///
/// ```rust
/// use nonce_core::{ArrayContext, NonceContext};
///
/// let context = ArrayContext::from(vec![("foo", "bar")]);
/// assert_eq!(context.get("foo"), Some("bar"));
/// assert_eq!(context.get("missing"), None);
/// assert!(context.set("foo", "baz").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrayContext {
    storage: Vec<(String, Option<String>)>,
    index: HashMap<String, usize>,
}

impl ArrayContext {
    /// Build a context from key/value pairs where values may be null.
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: Into<String>,
    {
        let mut storage: Vec<(String, Option<String>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for (key, value) in entries {
            let key = key.into();
            match index.get(&key) {
                Some(&position) => storage[position].1 = value,
                None => {
                    index.insert(key.clone(), storage.len());
                    storage.push((key, value));
                }
            }
        }
        Self { storage, index }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Keys in storage order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.storage.iter().map(|(key, _)| key.as_str())
    }

    /// Always fails: contexts are read only.
    pub fn set(&self, _key: &str, _value: &str) -> Result<(), NonceError> {
        Err(NonceError::read_only("ArrayContext::set", "ArrayContext"))
    }

    /// Always fails: contexts are read only.
    pub fn unset(&self, _key: &str) -> Result<(), NonceError> {
        Err(NonceError::read_only("ArrayContext::unset", "ArrayContext"))
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Option<String>)> {
        self.storage
    }
}

impl NonceContext for ArrayContext {
    fn exists(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .and_then(|&position| self.storage[position].1.as_deref())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ArrayContext {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k, Some(v.into()))))
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for ArrayContext {
    fn from(entries: Vec<(K, V)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for ArrayContext {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_stored_value() {
        let context = ArrayContext::from(vec![("foo", "bar")]);

        assert_eq!(context.get("foo"), Some("bar"));
        assert_eq!(context.get("bar"), None);
        assert!(context.exists("foo"));
        assert!(!context.exists("bar"));
    }

    #[test]
    fn test_null_value_exists_but_reads_as_none() {
        let context = ArrayContext::new(vec![("foo", None), ("bar", Some("baz".to_string()))]);

        assert!(context.exists("foo"));
        assert_eq!(context.get("foo"), None);
        assert_eq!(context.get("bar"), Some("baz"));
    }

    #[test]
    fn test_set_is_rejected() {
        let context = ArrayContext::from(vec![("foo", "bar")]);

        let err = context.set("bar", "baz").unwrap_err();
        assert!(matches!(err, NonceError::ReadOnlyContext { .. }));
        assert!(!context.exists("bar"));
        assert_eq!(context.get("foo"), Some("bar"));
    }

    #[test]
    fn test_unset_is_rejected() {
        let context = ArrayContext::from(vec![("foo", "bar")]);

        let err = context.unset("foo").unwrap_err();
        assert_eq!(
            err.to_string(),
            "can't call ArrayContext::unset, ArrayContext is read only"
        );
        assert_eq!(context.get("foo"), Some("bar"));
    }

    #[test]
    fn test_repeated_key_keeps_position_takes_last_value() {
        let context = ArrayContext::from(vec![("a", "1"), ("b", "2"), ("a", "3")]);

        assert_eq!(context.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(context.get("a"), Some("3"));
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn test_many_keys_build_and_lookup() {
        let count = 50_000;
        let context: ArrayContext = (0..count)
            .map(|i| (format!("k{i}"), i.to_string()))
            .chain((0..count).map(|i| (format!("k{i}"), format!("last{i}"))))
            .collect();

        assert_eq!(context.len(), count);
        assert_eq!(context.keys().next(), Some("k0"));
        assert_eq!(context.get("k0"), Some("last0"));
        assert_eq!(context.get("k49999"), Some("last49999"));
        assert!(!context.exists("k50000"));
    }

    #[test]
    fn test_from_hash_map() {
        let mut map = HashMap::new();
        map.insert("token".to_string(), "abc".to_string());

        let context = ArrayContext::from(map);
        assert_eq!(context.get("token"), Some("abc"));
    }
}
