use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());
static PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9_-]+)=([A-Za-z0-9_-]+)").unwrap());

pub fn is_token(s: &str) -> bool {
    TOKEN.is_match(s)
}

/// Key/value constraints identifying a challenge.
///
/// Every key and value is a restricted token, so the rendered form
/// `k1=v1 k2=v2` can always be parsed back from a line of prose.
/// Entries keep insertion order; overwriting a key keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    entries: Vec<(String, String)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str, value: &str) -> Result<()> {
        if !is_token(key) || !is_token(value) {
            return Err(Error::InvalidToken {
                key: key.to_string(),
                value: value.to_string(),
            });
        }

        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Builder form of [`Filters::add`].
    pub fn with(mut self, key: &str, value: &str) -> Result<Self> {
        self.add(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Result<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| Error::MissingFilter {
                name: key.to_string(),
            })
    }

    pub fn get_or_default(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Right-biased union: values from `other` win on collision.
    pub fn merge(&self, other: &Filters) -> Filters {
        let mut merged = self.clone();
        for (k, v) in &other.entries {
            match merged.entries.iter_mut().find(|(mk, _)| mk == k) {
                Some((_, mv)) => *mv = v.clone(),
                None => merged.entries.push((k.clone(), v.clone())),
            }
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Extract every `key=value` pair from an arbitrary line, ignoring the
    /// prose around them.
    pub fn parse(line: &str) -> Filters {
        let mut output = Filters::new();
        for caps in PAIR.captures_iter(line) {
            // both groups already match the token pattern
            let _ = output.add(&caps[1], &caps[2]);
        }
        output
    }
}

impl fmt::Display for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
