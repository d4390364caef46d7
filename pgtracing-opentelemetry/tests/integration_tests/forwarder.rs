// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{collections::HashSet, time::Duration};

use futures_util::stream;
use opentelemetry_sdk::{
    error::OTelSdkResult,
    trace::{InMemorySpanExporter, SpanData, SpanExporter},
};
use pgtracing_opentelemetry::{
    forward_spans, narrow_span_id, Config, Error, Result, SpanForwarder, SpanRecord,
};

use super::span_record;

/// Exporter much slower than the replay, keeps its spans after shutdown
#[derive(Debug, Clone, Default)]
struct SlowExporter {
    inner: InMemorySpanExporter,
}

impl SpanExporter for SlowExporter {
    async fn export(&self, batch: Vec<SpanData>) -> OTelSdkResult {
        std::thread::sleep(Duration::from_millis(5));
        self.inner.export(batch).await
    }
}

impl SlowExporter {
    fn exported_span_ids(&self) -> Vec<u64> {
        self.inner
            .get_finished_spans()
            .expect("failed to get finished spans")
            .iter()
            .map(|span| narrow_span_id(span.span_context.span_id()))
            .collect()
    }
}

#[tokio::test]
async fn test_every_span_is_exported_after_shutdown() {
    const SPANS: u64 = 10_000;
    let exporter = SlowExporter::default();
    let mut forwarder = SpanForwarder::new(&Config::default(), exporter.clone());

    let records = (1..=SPANS).map(|span_id| {
        Ok(span_record(
            7,
            0,
            span_id,
            "Executor",
            Duration::from_micros(span_id),
            1_000,
        ))
    });
    let count = forward_spans(stream::iter(records), forwarder.replayer())
        .await
        .unwrap();
    assert_eq!(count, SPANS as usize);

    let replayed = forwarder.shutdown().await.unwrap();
    assert_eq!(replayed, SPANS as usize);

    let exported = exporter.exported_span_ids();
    assert_eq!(exported.len(), SPANS as usize);
    let unique: HashSet<u64> = exported.into_iter().collect();
    assert_eq!(unique, (1..=SPANS).collect());
}

#[tokio::test]
async fn test_spans_before_a_failure_are_exported_on_shutdown() {
    let exporter = SlowExporter::default();
    let mut forwarder = SpanForwarder::new(&Config::default(), exporter.clone());

    let records: Vec<Result<SpanRecord>> = vec![
        Ok(span_record(3, 0, 30, "Planner", Duration::ZERO, 100)),
        Ok(span_record(3, 30, 31, "Executor", Duration::from_nanos(10), 50)),
        Err(Error::msg("span 32 has a negative duration -1")),
    ];
    let err = forward_spans(stream::iter(records), forwarder.replayer())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "span 32 has a negative duration -1");

    // nothing forces a flush before shutdown with so few spans
    assert_eq!(forwarder.shutdown().await.unwrap(), 2);
    let mut exported = exporter.exported_span_ids();
    exported.sort_unstable();
    assert_eq!(exported, [30, 31]);
}
