//! Caller-supplied template data.

use std::collections::HashMap;

/// A substitution value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text for `${name}` placeholders
    Text(String),
    /// Image bytes for `${name:WxH}` placeholders
    Image(Vec<u8>),
}

impl Value {
    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Image(_) => None,
        }
    }

    /// Image bytes, if this is an image value.
    pub fn as_image(&self) -> Option<&[u8]> {
        match self {
            Value::Image(data) => Some(data),
            Value::Text(_) => None,
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self {
        Value::Image(data)
    }
}

/// Mapping from placeholder name to substitution value.
///
/// # Example
///
/// ```
/// use xlfill::TemplateData;
///
/// let data = TemplateData::new()
///     .text("CUSTOMER", "ACME Ltd")
///     .image("LOGO", vec![0xFF, 0xD8, 0xFF]);
/// assert_eq!(data.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateData {
    values: HashMap<String, Value>,
}

impl TemplateData {
    /// Create an empty data map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a text value.
    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), Value::Text(value.into()));
        self
    }

    /// Builder: add image bytes.
    pub fn image(mut self, key: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.values.insert(key.into(), Value::Image(data.into()));
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Text value for a key, if present and textual.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    /// Remove a value, returning it.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Remove an image value. Text values under the key are left in place.
    pub fn take_image(&mut self, key: &str) -> Option<Vec<u8>> {
        match self.values.get(key) {
            Some(Value::Image(_)) => match self.values.remove(key) {
                Some(Value::Image(data)) => Some(data),
                _ => None,
            },
            _ => None,
        }
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for TemplateData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for TemplateData {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.values.insert(k.into(), v.into());
        }
    }
}
