// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

pub const TRACER_NAME: &str = "pgtracing-tracer";
pub const DEFAULT_SERVICE_NAME: &str = "PostgreSQL-server";
pub const DEFAULT_OTLP_GRPC_ENDPOINT: &str = "http://localhost:4317";
pub const DEFAULT_SPANS_RELATION: &str = "pg_tracing_consume_spans";

/// Capacity of the batch processor queue
pub const MAX_QUEUED_SPANS: usize = 4096;
pub const MAX_EXPORT_BATCH_SIZE: usize = 512;
/// Replayed spans between two blocking flushes, at most half the queue
pub const FLUSH_EVERY_SPANS: usize = MAX_QUEUED_SPANS / 2;

/// SQLSTATE of a statement that completed without error
pub const SQL_SUCCESS_CODE: &str = "00000";

pub const SPAN_TYPE_KEY: &str = "span.type";
pub const QUERY_PARAMETERS_KEY: &str = "query.parameters";

pub const ROWS_KEY: &str = "rows";
pub const PID_KEY: &str = "pid";
pub const SUBXACT_COUNT_KEY: &str = "subxact_count";

pub const BLOCK_SHARED_HIT_KEY: &str = "block.shared.hit";
pub const BLOCK_SHARED_READ_KEY: &str = "block.shared.read";
pub const BLOCK_SHARED_DIRTIED_KEY: &str = "block.shared.dirtied";
pub const BLOCK_SHARED_WRITTEN_KEY: &str = "block.shared.written";

pub const BLOCK_LOCAL_HIT_KEY: &str = "block.local.hit";
pub const BLOCK_LOCAL_READ_KEY: &str = "block.local.read";
pub const BLOCK_LOCAL_DIRTIED_KEY: &str = "block.local.dirtied";
pub const BLOCK_LOCAL_WRITTEN_KEY: &str = "block.local.written";

pub const BLOCK_READ_TIME_KEY: &str = "block.read_time";
pub const BLOCK_WRITE_TIME_KEY: &str = "block.write_time";

pub const BLOCK_TEMP_READ_KEY: &str = "block.temp.read";
pub const BLOCK_TEMP_WRITTEN_KEY: &str = "block.temp.written";
pub const BLOCK_TEMP_READ_TIME_KEY: &str = "block.temp.read_time";
pub const BLOCK_TEMP_WRITE_TIME_KEY: &str = "block.temp.write_time";

pub const WAL_RECORDS_KEY: &str = "wal.records";
pub const WAL_FPI_KEY: &str = "wal.fpi";
pub const WAL_BYTES_KEY: &str = "wal.bytes";

pub const PLAN_STARTUP_COST_KEY: &str = "plan.startup_cost";
pub const PLAN_TOTAL_COST_KEY: &str = "plan.total_cost";
pub const PLAN_ROWS_KEY: &str = "plan.rows";
pub const PLAN_WIDTH_KEY: &str = "plan.width";

pub const JIT_FUNCTIONS_KEY: &str = "jit.functions";
pub const JIT_GENERATION_TIME_KEY: &str = "jit.generation_time";
pub const JIT_INLINING_TIME_KEY: &str = "jit.inlining_time";
pub const JIT_OPTIMIZATION_TIME_KEY: &str = "jit.optimization_time";
pub const JIT_EMISSION_TIME_KEY: &str = "jit.emission_time";

pub const ERROR_MSG_KEY: &str = "error.msg";
pub const ERROR_CODE_KEY: &str = "error.code";
pub const QUERY_ERROR_MSG: &str = "Query error";
