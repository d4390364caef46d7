// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr};

use super::supported_configurations::SupportedConfigurations;

/// Where a configuration value was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueOrigin {
    #[cfg(test)]
    Default,
    EnvVar,
    #[cfg(test)]
    Code,
}

#[derive(Debug, PartialEq)]
pub(crate) struct SourcedValue<T> {
    pub(crate) value: T,
    pub(crate) origin: ValueOrigin,
}

/// A raw value that a source provided but that could not be parsed
#[derive(Debug, PartialEq)]
pub(crate) struct RejectedValue {
    pub(crate) raw: String,
    pub(crate) origin: ValueOrigin,
    pub(crate) reason: String,
}

impl fmt::Display for RejectedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} from {:?}: {}", self.raw, self.origin, self.reason)
    }
}

/// Result of looking a key up in a [`SourceChain`]
#[derive(Debug, PartialEq)]
pub(crate) struct Lookup<T> {
    pub(crate) key: SupportedConfigurations,
    pub(crate) found: Option<SourcedValue<T>>,
    /// Values of higher precedence sources that failed to parse
    pub(crate) rejected: Vec<RejectedValue>,
}

impl<T> Lookup<T> {
    pub(crate) fn into_value(self) -> Option<T> {
        self.found.map(|found| found.value)
    }
}

/// A provider of raw configuration values
pub(crate) trait ConfigSource {
    fn origin(&self) -> ValueOrigin;

    /// Raw value of `key`, `None` when the source doesn't set it
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Configuration sources, highest precedence first.
///
/// A value that fails to parse is skipped and the next source is tried.
pub(crate) struct SourceChain {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl SourceChain {
    pub(crate) fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub(crate) fn from_env() -> Self {
        let mut chain = Self::empty();
        chain.push(EnvSource);
        chain
    }

    /// Add a source with a lower precedence than the ones already in the chain
    pub(crate) fn push<S: ConfigSource + 'static>(&mut self, source: S) {
        self.sources.push(Box::new(source));
    }

    pub(crate) fn lookup_str(&self, key: SupportedConfigurations) -> Lookup<String> {
        self.lookup(key)
    }

    pub(crate) fn lookup<T>(&self, key: SupportedConfigurations) -> Lookup<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let mut rejected = Vec::new();
        for source in &self.sources {
            let Some(raw) = source.lookup(key.as_str()) else {
                continue;
            };
            match raw.parse::<T>() {
                Ok(value) => {
                    return Lookup {
                        key,
                        found: Some(SourcedValue {
                            value,
                            origin: source.origin(),
                        }),
                        rejected,
                    }
                }
                Err(e) => rejected.push(RejectedValue {
                    raw,
                    origin: source.origin(),
                    reason: e.to_string(),
                }),
            }
        }
        Lookup {
            key,
            found: None,
            rejected,
        }
    }
}

/// Process environment, blank values count as unset
pub(crate) struct EnvSource;

impl ConfigSource for EnvSource {
    fn origin(&self) -> ValueOrigin {
        ValueOrigin::EnvVar
    }

    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Fixed set of values, used by tests in place of the environment
#[cfg(test)]
pub(crate) struct MapSource {
    values: std::collections::HashMap<String, String>,
    origin: ValueOrigin,
}

#[cfg(test)]
impl MapSource {
    pub(crate) fn new<K, V>(values: impl IntoIterator<Item = (K, V)>, origin: ValueOrigin) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            origin,
        }
    }
}

#[cfg(test)]
impl ConfigSource for MapSource {
    fn origin(&self) -> ValueOrigin {
        self.origin
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
