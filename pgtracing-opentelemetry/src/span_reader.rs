// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use futures_util::{Stream, TryStreamExt};
use tokio_postgres::{types::ToSql, Client, NoTls};

use crate::{
    core::{
        configuration::{Config, RelationName},
        Error, Result, ResultExt,
    },
    pgt_error, pgt_info,
    span_record::SpanRecord,
};

/// Selected columns, cast to the types [`SpanRecord`] decodes
const SPAN_COLUMNS: &str = "\
    trace_id::int8, parent_id::int8, span_id::int8, \
    span_type::text, span_operation::text, deparse_info::text, parameters::text, \
    span_start::timestamptz, span_start_ns::int2, duration::int8, \
    pid::int4, subxact_count::int4, \
    sql_error_code::text, \
    rows::int8, \
    plan_startup_cost::float8, plan_total_cost::float8, plan_rows::float8, plan_width::int8, \
    shared_blks_hit::int8, shared_blks_read::int8, shared_blks_dirtied::int8, shared_blks_written::int8, \
    local_blks_hit::int8, local_blks_read::int8, local_blks_dirtied::int8, local_blks_written::int8, \
    blk_read_time::float8, blk_write_time::float8, \
    temp_blks_read::int8, temp_blks_written::int8, temp_blk_read_time::float8, temp_blk_write_time::float8, \
    wal_records::int8, wal_fpi::int8, wal_bytes::int8, \
    jit_functions::int8, jit_generation_time::float8, jit_inlining_time::float8, \
    jit_optimization_time::float8, jit_emission_time::float8";

/// Query reading every span currently exposed by `relation`, oldest first
pub fn spans_query(relation: &RelationName) -> String {
    format!("SELECT {SPAN_COLUMNS} FROM {relation} ORDER BY span_start")
}

/// Connection to the store holding the captured spans
pub struct SpanReader {
    client: Client,
    relation: RelationName,
}

impl SpanReader {
    /// Connect to the store at `DATABASE_URL`, within the connect timeout.
    ///
    /// The connection itself is driven by a task spawned on the current tokio runtime.
    pub async fn connect(config: &Config) -> Result<Self> {
        let database_url = config
            .database_url()
            .ok_or_else(|| Error::msg("DATABASE_URL is not set"))?;

        let (client, connection) = tokio::time::timeout(
            config.connect_timeout(),
            tokio_postgres::connect(database_url, NoTls),
        )
        .await
        .context("failed to connect to the source database")?
        .context("failed to connect to the source database")?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                pgt_error!("source database connection error: {}", e);
            }
        });

        Ok(Self {
            client,
            relation: config.spans_relation().clone(),
        })
    }

    /// Issue the spans query and lazily decode its rows.
    ///
    /// The rows are fetched as the stream is polled. The relation is expected to consume the
    /// captured spans it returns, a second call only sees spans captured in between.
    pub async fn consume_spans(&self) -> Result<impl Stream<Item = Result<SpanRecord>>> {
        let query = spans_query(&self.relation);
        pgt_info!("Query: {}", query);

        let rows = self
            .client
            .query_raw(query.as_str(), std::iter::empty::<&(dyn ToSql + Sync)>())
            .await
            .context("failed to query spans")?;

        Ok(rows
            .map_err(Error::from)
            .and_then(|row| async move { SpanRecord::try_from(&row) }))
    }
}

impl std::fmt::Debug for SpanReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanReader")
            .field("relation", &self.relation)
            .finish_non_exhaustive()
    }
}
