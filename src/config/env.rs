//! Environment variable lookup.
//!
//! The loader only ever reads variables through [`EnvStore`], so the same
//! code runs against the process environment in production and against an
//! in-memory map in tests. Nothing here writes to the process environment:
//! settings-file values and required defaults are kept in their own
//! [`MapEnv`] layers and stacked under the real environment with [`Layered`].

use std::collections::HashMap;

/// Read access to a set of environment variables.
pub trait EnvStore: Send + Sync {
    /// Current value, or `None` when unset or not valid UTF-8.
    fn get(&self, key: &str) -> Option<String>;

    /// Whether the variable is set to a non-empty value.
    fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    /// Current value or the empty string.
    fn get_or_empty(&self, key: &str) -> String {
        self.get(key).unwrap_or_default()
    }
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// An in-memory environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a variable, replacing any existing value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvStore for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Several stores read in priority order.
///
/// A lookup returns the first non-empty value, so an empty variable in a
/// higher layer never hides a value below it.
#[derive(Default)]
pub struct Layered<'a> {
    layers: Vec<&'a dyn EnvStore>,
}

impl<'a> Layered<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer below the ones already present.
    pub fn then(mut self, store: &'a dyn EnvStore) -> Self {
        self.layers.push(store);
        self
    }
}

impl EnvStore for Layered<'_> {
    fn get(&self, key: &str) -> Option<String> {
        let mut empty = None;
        for layer in &self.layers {
            match layer.get(key) {
                Some(value) if !value.is_empty() => return Some(value),
                Some(value) => empty = empty.or(Some(value)),
                None => {}
            }
        }
        empty
    }
}
