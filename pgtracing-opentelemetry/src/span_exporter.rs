// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use opentelemetry_otlp::{SpanExporter, WithExportConfig, WithTonicConfig};
use tonic::transport::Channel;

use crate::{
    core::{configuration::Config, Result, ResultExt},
    pgt_debug,
};

/// Create the OTLP/gRPC exporter shipping replayed spans to the collector.
///
/// The channel is connected before the exporter is built, so an unreachable collector fails
/// the run at startup instead of at the first export. The connection attempt is bounded by
/// the connect timeout.
pub async fn connect_otlp_exporter(config: &Config) -> Result<SpanExporter> {
    let endpoint = config.otlp_endpoint();
    pgt_debug!("connecting to collector at {}", endpoint);

    let channel = Channel::from_shared(endpoint.to_string())
        .context("failed to create gRPC connection to collector")?
        .connect_timeout(config.connect_timeout())
        .timeout(config.otlp_timeout());
    let channel = tokio::time::timeout(config.connect_timeout(), channel.connect())
        .await
        .context("failed to create gRPC connection to collector")?
        .context("failed to create gRPC connection to collector")?;

    SpanExporter::builder()
        .with_tonic()
        .with_channel(channel)
        .with_timeout(config.otlp_timeout())
        .build()
        .context("failed to create trace exporter")
}
