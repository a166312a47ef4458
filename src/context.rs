//! Template context and directory-level overrides.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered mapping of template variables.
///
/// Values are arbitrary structured data (strings, numbers, booleans, nested mappings,
/// sequences, null). Key order follows the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(IndexMap<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets `key`, keeping its position if it already exists.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Resolves a dotted path such as `project.authors.0.name`.
    ///
    /// Segments walk into mappings by key and into sequences by index. Scalars have no
    /// children, so any segment after one yields `None`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next().filter(|s| !s.is_empty())?;
        descend(self.0.get(first)?, segments)
    }

    /// Whether the first segment of a dotted path names a key of this context.
    pub fn contains_head(&self, path: &str) -> bool {
        path.split('.').next().is_some_and(|head| self.0.contains_key(head))
    }

    /// Shallow merge: every key of `overrides` replaces the whole value under the same key.
    pub fn merge(&self, overrides: &Context) -> Context {
        let mut merged = self.clone();
        for (key, value) in &overrides.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl FromIterator<(String, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<IndexMap<String, Value>> for Context {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}

/// Resolves a dotted path inside a single value, with the same rules as [`Context::lookup`].
pub fn lookup_in<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return None;
    }
    descend(value, path.split('.'))
}

fn descend<'v, 'p>(
    value: &'v Value,
    segments: impl Iterator<Item = &'p str>,
) -> Option<&'v Value> {
    segments.fold(Some(value), |value, segment| match value? {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Produces the effective context for a directory.
///
/// Without overrides the base is passed through untouched (no clone when it is borrowed).
/// Nested mappings are never deep-merged: an override of `b` replaces all of `b`.
pub fn resolve_context<'a>(
    base: Cow<'a, Context>,
    overrides: Option<&Context>,
) -> Cow<'a, Context> {
    match overrides {
        Some(overrides) => Cow::Owned(base.merge(overrides)),
        None => base,
    }
}
