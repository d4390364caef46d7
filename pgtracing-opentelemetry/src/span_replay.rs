// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use opentelemetry::{
    trace::{Span, SpanContext, SpanKind, TraceContextExt, TraceFlags, TraceState, Tracer},
    Context,
};
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};

use crate::{
    attributes::AttributeSet,
    core::{Result, ResultExt},
    id_generator::{widen_span_id, widen_trace_id, PendingSpanIds},
    pgt_debug,
    span_record::SpanRecord,
};

/// Emits captured spans through the otel SDK, keeping their recorded ids and timestamps.
///
/// The tracer must come from a provider built with a
/// [`ReplayIdGenerator`](crate::id_generator::ReplayIdGenerator) reading the same
/// [`PendingSpanIds`], see [`crate::make_tracer_provider`].
#[derive(Debug)]
pub struct SpanReplayer {
    tracer: SdkTracer,
    pending: Arc<PendingSpanIds>,
    replayed: usize,
    backpressure: Option<Backpressure>,
}

/// Periodic flush of the provider, so a bounded export queue never fills up
#[derive(Debug)]
struct Backpressure {
    provider: SdkTracerProvider,
    flush_every: usize,
}

impl SpanReplayer {
    pub fn new(tracer: SdkTracer, pending: Arc<PendingSpanIds>) -> Self {
        Self {
            tracer,
            pending,
            replayed: 0,
            backpressure: None,
        }
    }

    /// Flush `provider` every `flush_every` replayed spans.
    ///
    /// Needed with a batch processor: replaying is much faster than exporting, and the batch
    /// queue drops the spans it has no room for.
    pub fn with_backpressure(mut self, provider: SdkTracerProvider, flush_every: usize) -> Self {
        self.backpressure = Some(Backpressure {
            provider,
            flush_every: flush_every.max(1),
        });
        self
    }

    /// Wait for the export of the queued spans when a flush is due
    pub(crate) async fn apply_backpressure(&self) -> Result<()> {
        let Some(backpressure) = &self.backpressure else {
            return Ok(());
        };
        if self.replayed == 0 || self.replayed % backpressure.flush_every != 0 {
            return Ok(());
        }
        pgt_debug!("flushing after {} replayed spans", self.replayed);
        let provider = backpressure.provider.clone();
        tokio::task::spawn_blocking(move || provider.force_flush())
            .await
            .context("failed to flush replayed spans")?
            .context("failed to flush replayed spans")
    }

    /// Start and end the span of `record`.
    ///
    /// Takes `&mut self`: the pending ids are a single slot, two spans started concurrently
    /// would read each other's ids.
    pub fn replay(&mut self, record: &SpanRecord) {
        let parent_cx = Context::new().with_remote_span_context(SpanContext::new(
            widen_trace_id(record.trace_id),
            widen_span_id(record.parent_id),
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        ));
        let start_time = record.start_time();
        let end_time = record.end_time();

        self.pending.set(record.trace_id, record.span_id);
        let mut span = self
            .tracer
            .span_builder(record.span_name())
            .with_kind(SpanKind::Server)
            .with_start_time(start_time)
            .with_attributes(AttributeSet::from(record))
            .start_with_context(&self.tracer, &parent_cx);
        span.end_with_timestamp(end_time);

        self.replayed += 1;
    }

    /// Number of spans emitted so far
    pub fn replayed(&self) -> usize {
        self.replayed
    }
}

/// Replay every record of `records`, in order.
///
/// Stops at the first error, spans emitted before it are kept in the exporter. Returns the
/// number of spans replayed. Flushes are awaited between records when the replayer was built
/// [`with_backpressure`](SpanReplayer::with_backpressure).
pub async fn forward_spans<S>(records: S, replayer: &mut SpanReplayer) -> Result<usize>
where
    S: Stream<Item = Result<SpanRecord>>,
{
    let mut records = std::pin::pin!(records);
    let mut count = 0;
    while let Some(record) = records.next().await {
        let record = record?;
        pgt_debug!(
            "traceId: {}, parentId: {}, spanId: {}, span_operation: {}, start: {:?}, start_ns: {}, duration: {}",
            record.trace_id,
            record.parent_id,
            record.span_id,
            record.span_operation,
            record.span_start,
            record.span_start_ns,
            record.duration_nanos
        );
        replayer.replay(&record);
        replayer.apply_backpressure().await?;
        count += 1;
    }
    Ok(count)
}
