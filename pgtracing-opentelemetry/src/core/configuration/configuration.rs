// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt, str::FromStr, time::Duration};

use super::sources::{Lookup, SourceChain};
use super::supported_configurations::SupportedConfigurations;
use crate::core::constants::{
    DEFAULT_OTLP_GRPC_ENDPOINT, DEFAULT_SERVICE_NAME, DEFAULT_SPANS_RELATION,
};
use crate::core::log::LevelFilter;
use crate::{pgt_debug, pgt_warn};

/// Name of the relation the span rows are read from.
///
/// The name is interpolated in the query text, so it is restricted to ascii alphanumerics,
/// `_` and `.` (for schema qualified names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationName(Cow<'static, str>);

impl RelationName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RelationName {
    fn default() -> Self {
        RelationName(Cow::Borrowed(DEFAULT_SPANS_RELATION))
    }
}

impl FromStr for RelationName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("relation name can't be empty");
        }
        if s.starts_with('.') || s.ends_with('.') {
            return Err("relation name can't start or end with '.'");
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err("relation name should only contain ascii alphanumerics, '_' and '.'");
        }
        Ok(RelationName(Cow::Owned(s.to_string())))
    }
}

impl fmt::Display for RelationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Duration expressed as a number of milliseconds in the configuration sources
struct Millis(Duration);

impl FromStr for Millis {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(|ms| Millis(Duration::from_millis(ms)))
    }
}

#[derive(Clone)]
#[non_exhaustive]
/// Configuration of a forwarding run
///
/// # Usage
/// ```
/// use pgtracing_opentelemetry::core::configuration::Config;
///
/// // This pulls configuration from the environment
/// let mut builder = Config::builder();
///
/// // Manual overrides
/// builder
///     .set_service("pg-replica".to_string())
///     .set_otlp_endpoint("http://collector:4317".to_string());
///
/// let config = builder.build();
/// assert_eq!(config.service(), "pg-replica");
/// ```
pub struct Config {
    // # Source store
    /// Connection descriptor, handed as is to the postgres connector
    database_url: Option<String>,
    /// Relation exposing the captured spans
    spans_relation: RelationName,

    // # Collector
    otlp_endpoint: Cow<'static, str>,
    otlp_timeout: Duration,

    /// Bound on the startup connections to the store and the collector
    connect_timeout: Duration,

    service: String,
    log_level: LevelFilter,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The connection descriptor may carry credentials
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("spans_relation", &self.spans_relation)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .field("otlp_timeout", &self.otlp_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("service", &self.service)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    fn from_sources(sources: &SourceChain) -> Self {
        let default = Config::default();

        /// Keep the parsed value, and report values that were set but invalid
        fn to_val<T>(lookup: Lookup<T>) -> Option<T> {
            for rejected in &lookup.rejected {
                pgt_warn!("ignoring {} value {}", lookup.key.as_str(), rejected);
            }
            if let Some(found) = &lookup.found {
                pgt_debug!("{} set from {:?}", lookup.key.as_str(), found.origin);
            }
            lookup.into_value()
        }

        Self {
            database_url: to_val(sources.lookup_str(SupportedConfigurations::DATABASE_URL))
                .or(default.database_url),
            spans_relation: to_val(
                sources.lookup(SupportedConfigurations::PGTRACING_SPANS_RELATION),
            )
            .unwrap_or(default.spans_relation),
            otlp_endpoint: to_val(
                sources.lookup_str(SupportedConfigurations::OTEL_EXPORTER_OTLP_TRACES_ENDPOINT),
            )
            .or_else(|| {
                to_val(sources.lookup_str(SupportedConfigurations::OTEL_EXPORTER_OTLP_ENDPOINT))
            })
            .map(Cow::Owned)
            .unwrap_or(default.otlp_endpoint),
            otlp_timeout: to_val(
                sources.lookup::<Millis>(SupportedConfigurations::OTEL_EXPORTER_OTLP_TIMEOUT),
            )
            .map(|Millis(d)| d)
            .unwrap_or(default.otlp_timeout),
            connect_timeout: to_val(
                sources.lookup::<Millis>(SupportedConfigurations::PGTRACING_CONNECT_TIMEOUT),
            )
            .map(|Millis(d)| d)
            .unwrap_or(default.connect_timeout),
            service: to_val(sources.lookup_str(SupportedConfigurations::OTEL_SERVICE_NAME))
                .unwrap_or(default.service),
            log_level: to_val(sources.lookup(SupportedConfigurations::PGTRACING_LOG_LEVEL))
                .unwrap_or(default.log_level),
        }
    }

    fn builder_with_sources(sources: &SourceChain) -> ConfigBuilder {
        ConfigBuilder {
            config: Config::from_sources(sources),
        }
    }

    /// Creates a new builder to set overrides detected configuration
    pub fn builder() -> ConfigBuilder {
        Self::builder_with_sources(&SourceChain::from_env())
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn spans_relation(&self) -> &RelationName {
        &self.spans_relation
    }

    pub fn otlp_endpoint(&self) -> &str {
        &self.otlp_endpoint
    }

    pub fn otlp_timeout(&self) -> Duration {
        self.otlp_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            spans_relation: RelationName::default(),
            otlp_endpoint: Cow::Borrowed(DEFAULT_OTLP_GRPC_ENDPOINT),
            otlp_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(1),
            service: DEFAULT_SERVICE_NAME.to_string(),
            log_level: LevelFilter::default(),
        }
    }
}

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Finalizes the builder and returns the configuration
    pub fn build(self) -> Config {
        self.config
    }

    pub fn set_database_url(&mut self, database_url: String) -> &mut Self {
        self.config.database_url = Some(database_url);
        self
    }

    pub fn set_spans_relation(&mut self, relation: RelationName) -> &mut Self {
        self.config.spans_relation = relation;
        self
    }

    pub fn set_otlp_endpoint(&mut self, endpoint: String) -> &mut Self {
        self.config.otlp_endpoint = Cow::Owned(endpoint);
        self
    }

    pub fn set_otlp_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.otlp_timeout = timeout;
        self
    }

    pub fn set_connect_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn set_service(&mut self, service: String) -> &mut Self {
        self.config.service = service;
        self
    }

    pub fn set_log_level(&mut self, log_level: LevelFilter) -> &mut Self {
        self.config.log_level = log_level;
        self
    }
}
