// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::{
    BatchConfigBuilder, BatchSpanProcessor, SdkTracerProvider, SpanExporter,
};

use crate::{
    core::{
        configuration::Config,
        constants::{FLUSH_EVERY_SPANS, MAX_EXPORT_BATCH_SIZE, MAX_QUEUED_SPANS, TRACER_NAME},
        Result, ResultExt,
    },
    id_generator::PendingSpanIds,
    make_tracer_provider, pgt_debug,
    span_replay::SpanReplayer,
};

/// Replay pipeline of a forwarding run: a batch processor over `exporter`, and a replayer
/// flushing it often enough that the batch queue never drops a span.
///
/// # Usage
/// ```no_run
/// # async fn run(
/// #     config: pgtracing_opentelemetry::Config,
/// #     exporter: opentelemetry_sdk::trace::InMemorySpanExporter,
/// # ) -> pgtracing_opentelemetry::Result<()> {
/// use pgtracing_opentelemetry::{forward_spans, SpanForwarder, SpanReader};
///
/// let mut forwarder = SpanForwarder::new(&config, exporter);
/// let reader = SpanReader::connect(&config).await?;
/// forward_spans(reader.consume_spans().await?, forwarder.replayer()).await?;
/// let replayed = forwarder.shutdown().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SpanForwarder {
    provider: SdkTracerProvider,
    replayer: SpanReplayer,
}

impl SpanForwarder {
    pub fn new<E: SpanExporter + 'static>(config: &Config, exporter: E) -> Self {
        let batch_config = BatchConfigBuilder::default()
            .with_max_queue_size(MAX_QUEUED_SPANS)
            .with_max_export_batch_size(MAX_EXPORT_BATCH_SIZE)
            .build();
        let processor = BatchSpanProcessor::builder(exporter)
            .with_batch_config(batch_config)
            .build();

        let pending = Arc::new(PendingSpanIds::new());
        let provider = make_tracer_provider(
            config,
            SdkTracerProvider::builder().with_span_processor(processor),
            pending.clone(),
        );
        let replayer = SpanReplayer::new(provider.tracer(TRACER_NAME), pending)
            .with_backpressure(provider.clone(), FLUSH_EVERY_SPANS);

        Self { provider, replayer }
    }

    pub fn replayer(&mut self) -> &mut SpanReplayer {
        &mut self.replayer
    }

    /// Export the spans still queued and shut the exporter down.
    ///
    /// Returns the number of spans replayed during the run.
    pub async fn shutdown(self) -> Result<usize> {
        let Self { provider, replayer } = self;
        let replayed = replayer.replayed();
        pgt_debug!("flushing the last spans of {} replayed", replayed);

        // the export of the last batches blocks
        tokio::task::spawn_blocking(move || provider.shutdown())
            .await
            .context("failed to shut down the tracer provider")?
            .context("failed to flush replayed spans")?;
        Ok(replayed)
    }
}
