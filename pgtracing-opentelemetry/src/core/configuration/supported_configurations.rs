// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SupportedConfigurations {
    DATABASE_URL,
    OTEL_EXPORTER_OTLP_ENDPOINT,
    OTEL_EXPORTER_OTLP_TRACES_ENDPOINT,
    OTEL_EXPORTER_OTLP_TIMEOUT,
    OTEL_SERVICE_NAME,
    PGTRACING_CONNECT_TIMEOUT,
    PGTRACING_LOG_LEVEL,
    PGTRACING_SPANS_RELATION,
}

impl SupportedConfigurations {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SupportedConfigurations::DATABASE_URL => "DATABASE_URL",
            SupportedConfigurations::OTEL_EXPORTER_OTLP_ENDPOINT => "OTEL_EXPORTER_OTLP_ENDPOINT",
            SupportedConfigurations::OTEL_EXPORTER_OTLP_TRACES_ENDPOINT => {
                "OTEL_EXPORTER_OTLP_TRACES_ENDPOINT"
            }
            SupportedConfigurations::OTEL_EXPORTER_OTLP_TIMEOUT => "OTEL_EXPORTER_OTLP_TIMEOUT",
            SupportedConfigurations::OTEL_SERVICE_NAME => "OTEL_SERVICE_NAME",
            SupportedConfigurations::PGTRACING_CONNECT_TIMEOUT => "PGTRACING_CONNECT_TIMEOUT",
            SupportedConfigurations::PGTRACING_LOG_LEVEL => "PGTRACING_LOG_LEVEL",
            SupportedConfigurations::PGTRACING_SPANS_RELATION => "PGTRACING_SPANS_RELATION",
        }
    }
}
