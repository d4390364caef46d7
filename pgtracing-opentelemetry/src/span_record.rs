// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::{Duration, SystemTime};

use tokio_postgres::Row;

use crate::core::{constants::SQL_SUCCESS_CODE, Error};

/// Block counters of one buffer kind (shared, local or temp)
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BlockStats {
    pub hit: Option<i64>,
    pub read: Option<i64>,
    pub dirtied: Option<i64>,
    pub written: Option<i64>,
}

/// Time spent reading and writing blocks, in milliseconds
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BlockTime {
    pub read_time: Option<f64>,
    pub write_time: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PlanEstimates {
    pub startup_cost: Option<f64>,
    pub total_cost: Option<f64>,
    pub rows: Option<f64>,
    pub width: Option<i64>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WalUsage {
    pub records: Option<i64>,
    pub fpi: Option<i64>,
    pub bytes: Option<i64>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct JitUsage {
    pub functions: Option<i64>,
    pub generation_time: Option<f64>,
    pub inlining_time: Option<f64>,
    pub optimization_time: Option<f64>,
    pub emission_time: Option<f64>,
}

/// A span captured by `pg_tracing`, as read from the spans relation.
///
/// Ids are the raw bigint values reinterpreted as unsigned.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanRecord {
    pub trace_id: u64,
    pub parent_id: u64,
    pub span_id: u64,

    pub span_type: String,
    pub span_operation: String,
    pub deparse_info: Option<String>,
    pub parameters: Option<String>,

    pub span_start: SystemTime,
    /// Nanoseconds below the microsecond precision of `span_start`
    pub span_start_ns: i16,
    pub duration_nanos: u64,

    pub pid: Option<i32>,
    pub subxact_count: Option<i32>,
    pub sql_error_code: Option<String>,
    pub rows: Option<i64>,

    pub plan: PlanEstimates,
    pub shared_blocks: BlockStats,
    pub local_blocks: BlockStats,
    pub block_time: BlockTime,
    pub temp_blocks: BlockStats,
    pub temp_block_time: BlockTime,
    pub wal: WalUsage,
    pub jit: JitUsage,
}

impl SpanRecord {
    /// Name of the emitted span: the operation, followed by the deparse info if any
    pub fn span_name(&self) -> String {
        match &self.deparse_info {
            Some(deparse_info) => format!("{} {}", self.span_operation, deparse_info),
            None => self.span_operation.clone(),
        }
    }

    pub fn start_time(&self) -> SystemTime {
        let offset = Duration::from_nanos(u64::from(self.span_start_ns.unsigned_abs()));
        if self.span_start_ns >= 0 {
            self.span_start + offset
        } else {
            self.span_start - offset
        }
    }

    pub fn end_time(&self) -> SystemTime {
        self.start_time() + Duration::from_nanos(self.duration_nanos)
    }

    /// SQLSTATE of the traced statement when it failed
    pub fn sql_error(&self) -> Option<&str> {
        self.sql_error_code
            .as_deref()
            .filter(|code| *code != SQL_SUCCESS_CODE)
    }
}

impl TryFrom<&Row> for SpanRecord {
    type Error = Error;

    /// Decode a row of the spans query, see [`crate::span_reader::spans_query`] for the column
    /// names and types.
    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        let span_id = row.try_get::<_, i64>("span_id")? as u64;
        let duration: i64 = row.try_get("duration")?;
        let duration_nanos = u64::try_from(duration)
            .map_err(|_| Error::msg(format!("span {span_id} has a negative duration {duration}")))?;

        Ok(SpanRecord {
            trace_id: row.try_get::<_, i64>("trace_id")? as u64,
            parent_id: row.try_get::<_, i64>("parent_id")? as u64,
            span_id,
            span_type: row.try_get("span_type")?,
            span_operation: row.try_get("span_operation")?,
            deparse_info: row.try_get("deparse_info")?,
            parameters: row.try_get("parameters")?,
            span_start: row.try_get("span_start")?,
            span_start_ns: row.try_get("span_start_ns")?,
            duration_nanos,
            pid: row.try_get("pid")?,
            subxact_count: row.try_get("subxact_count")?,
            sql_error_code: row.try_get("sql_error_code")?,
            rows: row.try_get("rows")?,
            plan: PlanEstimates {
                startup_cost: row.try_get("plan_startup_cost")?,
                total_cost: row.try_get("plan_total_cost")?,
                rows: row.try_get("plan_rows")?,
                width: row.try_get("plan_width")?,
            },
            shared_blocks: BlockStats {
                hit: row.try_get("shared_blks_hit")?,
                read: row.try_get("shared_blks_read")?,
                dirtied: row.try_get("shared_blks_dirtied")?,
                written: row.try_get("shared_blks_written")?,
            },
            local_blocks: BlockStats {
                hit: row.try_get("local_blks_hit")?,
                read: row.try_get("local_blks_read")?,
                dirtied: row.try_get("local_blks_dirtied")?,
                written: row.try_get("local_blks_written")?,
            },
            block_time: BlockTime {
                read_time: row.try_get("blk_read_time")?,
                write_time: row.try_get("blk_write_time")?,
            },
            // postgres only tracks reads and writes of temp blocks
            temp_blocks: BlockStats {
                read: row.try_get("temp_blks_read")?,
                written: row.try_get("temp_blks_written")?,
                ..BlockStats::default()
            },
            temp_block_time: BlockTime {
                read_time: row.try_get("temp_blk_read_time")?,
                write_time: row.try_get("temp_blk_write_time")?,
            },
            wal: WalUsage {
                records: row.try_get("wal_records")?,
                fpi: row.try_get("wal_fpi")?,
                bytes: row.try_get("wal_bytes")?,
            },
            jit: JitUsage {
                functions: row.try_get("jit_functions")?,
                generation_time: row.try_get("jit_generation_time")?,
                inlining_time: row.try_get("jit_inlining_time")?,
                optimization_time: row.try_get("jit_optimization_time")?,
                emission_time: row.try_get("jit_emission_time")?,
            },
        })
    }
}
