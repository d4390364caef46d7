// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::process::ExitCode;

use pgtracing_opentelemetry::{
    connect_otlp_exporter, core::ResultExt, forward_spans, init_logging, pgt_error, pgt_info,
    pgt_warn, Config, Result, SpanForwarder, SpanReader, SpanReplayer,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::builder().build();
    init_logging(&config);

    match run(&config).await {
        Ok(count) => {
            pgt_info!("Done! replayed {} spans", count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            pgt_error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<usize> {
    pgt_info!("Waiting for connection...");
    let exporter = connect_otlp_exporter(config).await?;
    let mut forwarder = SpanForwarder::new(config, exporter);

    let replayed = replay_spans(config, forwarder.replayer()).await;

    // spans replayed before a failure are still exported
    let exported = forwarder.shutdown().await;
    replayed?;
    exported
}

async fn replay_spans(config: &Config, replayer: &mut SpanReplayer) -> Result<()> {
    let reader = SpanReader::connect(config).await?;
    let records = reader.consume_spans().await?;

    let interrupted = tokio::select! {
        res = forward_spans(records, replayer) => {
            res?;
            false
        }
        res = tokio::signal::ctrl_c() => {
            res.context("failed to listen for the interrupt signal")?;
            true
        }
    };
    if interrupted {
        pgt_warn!("Interrupted, stopping after {} spans", replayer.replayed());
    }
    Ok(())
}
