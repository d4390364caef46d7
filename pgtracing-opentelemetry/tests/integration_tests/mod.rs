// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider, SpanData};
use pgtracing_opentelemetry::{make_tracer_provider, Config, PendingSpanIds, SpanRecord, SpanReplayer};

mod forwarder;
mod postgres;

/// 2024-01-01T00:00:00Z
pub fn test_epoch() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_704_067_200)
}

/// A successful span starting `start_offset` after [`test_epoch`]
pub fn span_record(
    trace_id: u64,
    parent_id: u64,
    span_id: u64,
    operation: &str,
    start_offset: Duration,
    duration_nanos: u64,
) -> SpanRecord {
    SpanRecord {
        trace_id,
        parent_id,
        span_id,
        span_type: String::new(),
        span_operation: operation.to_string(),
        deparse_info: None,
        parameters: None,
        span_start: test_epoch() + start_offset,
        span_start_ns: 0,
        duration_nanos,
        pid: None,
        subxact_count: None,
        sql_error_code: Some("00000".to_string()),
        rows: None,
        plan: Default::default(),
        shared_blocks: Default::default(),
        local_blocks: Default::default(),
        block_time: Default::default(),
        temp_blocks: Default::default(),
        temp_block_time: Default::default(),
        wal: Default::default(),
        jit: Default::default(),
    }
}

pub struct TestReplayer {
    pub provider: SdkTracerProvider,
    pub exporter: InMemorySpanExporter,
    pub replayer: SpanReplayer,
}

impl TestReplayer {
    pub fn new(config: &Config) -> Self {
        let exporter = InMemorySpanExporter::default();
        let pending = Arc::new(PendingSpanIds::new());
        let provider = make_tracer_provider(
            config,
            SdkTracerProvider::builder().with_simple_exporter(exporter.clone()),
            pending.clone(),
        );
        let replayer = SpanReplayer::new(provider.tracer("pgtracing-test"), pending);
        Self {
            provider,
            exporter,
            replayer,
        }
    }

    pub fn finished_spans(&self) -> Vec<SpanData> {
        self.exporter
            .get_finished_spans()
            .expect("failed to get finished spans")
    }
}
