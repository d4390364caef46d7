// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Replays the spans captured by the `pg_tracing` postgres extension into an OpenTelemetry
//! collector.
//!
//! Spans keep the trace id, span id, parent id and timestamps recorded by postgres, so the
//! backend shows the same trees the database recorded.

pub mod core;

mod attributes;
mod forwarder;
mod id_generator;
mod span_exporter;
mod span_reader;
mod span_record;
mod span_replay;

use std::sync::Arc;

use opentelemetry::KeyValue;
use opentelemetry_sdk::{
    trace::{Sampler, SdkTracerProvider, TracerProviderBuilder},
    Resource,
};
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;

pub use attributes::AttributeSet;
pub use crate::core::{configuration::Config, Error, Result};
pub use forwarder::SpanForwarder;
pub use id_generator::{
    narrow_span_id, narrow_trace_id, widen_span_id, widen_trace_id, PendingSpanIds,
    ReplayIdGenerator, SpanIdSource,
};
pub use span_exporter::connect_otlp_exporter;
pub use span_reader::{spans_query, SpanReader};
pub use span_record::{BlockStats, BlockTime, JitUsage, PlanEstimates, SpanRecord, WalUsage};
pub use span_replay::{forward_spans, SpanReplayer};

/// Create the tracer provider replaying spans with the ids stored in `pending`.
///
/// Every span is sampled, the sampling decision was taken by postgres when it captured it.
/// Exporters and processors are set by the caller on `tracer_provider_builder`.
///
/// # Usage
/// ```no_run
/// use std::sync::Arc;
///
/// use opentelemetry::trace::TracerProvider;
/// use opentelemetry_sdk::trace::SdkTracerProvider;
/// use pgtracing_opentelemetry::{make_tracer_provider, Config, PendingSpanIds, SpanReplayer};
///
/// let config = Config::builder().build();
/// let pending = Arc::new(PendingSpanIds::new());
/// let provider = make_tracer_provider(&config, SdkTracerProvider::builder(), pending.clone());
/// let mut replayer = SpanReplayer::new(provider.tracer("pgtracing-tracer"), pending);
/// ```
pub fn make_tracer_provider(
    config: &Config,
    tracer_provider_builder: TracerProviderBuilder,
    pending: Arc<PendingSpanIds>,
) -> SdkTracerProvider {
    let resource = Resource::builder()
        .with_attribute(KeyValue::new(SERVICE_NAME, config.service().to_string()))
        .build();

    tracer_provider_builder
        .with_resource(resource)
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(ReplayIdGenerator::new(pending))
        .build()
}

/// Apply the configured log level to the `pgt_*` macros
pub fn init_logging(config: &Config) {
    crate::core::log::set_max_level(config.log_level());
}
