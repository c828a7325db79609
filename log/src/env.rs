//! Environment variable access and typed parsing.
//!
//! Resolution reads the environment through [`EnvReader`] so that callers
//! (and tests) can supply their own view of it instead of mutating the
//! process environment.

use std::collections::HashMap;

/// Read-only view of environment variables.
pub trait EnvReader: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvReader for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }
}

impl EnvReader for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Look up `key` as given, then lower-cased, then upper-cased.
///
/// Returns the key that matched along with its value. Empty values count as
/// undefined.
pub fn any_case(env: &dyn EnvReader, key: &str) -> Option<(String, String)> {
    [key.to_string(), key.to_lowercase(), key.to_uppercase()]
        .into_iter()
        .find_map(|k| env.var(&k).filter(|v| !v.is_empty()).map(|v| (k, v)))
}

/// A raw environment value sorted into the shape it looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl EnvValue {
    pub fn parse(raw: &str) -> EnvValue {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return EnvValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return EnvValue::Bool(false);
        }
        match trimmed.parse::<i64>() {
            Ok(n) => EnvValue::Int(n),
            Err(_) => EnvValue::Text(raw.to_string()),
        }
    }
}

/// Outcome of probing the environment for one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    Absent,
    Found {
        key: String,
        value: T,
    },
    Malformed {
        key: String,
        raw: String,
        expected: &'static str,
    },
}
