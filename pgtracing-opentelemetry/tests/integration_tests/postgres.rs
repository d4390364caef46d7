// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Round trip through a real postgres server.
//!
//! Runs only when `PGTRACING_TEST_DATABASE_URL` points at a database where the test can create
//! and drop tables.

use std::time::Duration;

use futures_util::TryStreamExt;
use pgtracing_opentelemetry::{
    forward_spans, narrow_span_id, Config, SpanReader, SpanRecord,
};
use tokio_postgres::NoTls;

use super::{test_epoch, TestReplayer};

const TEST_DATABASE_URL: &str = "PGTRACING_TEST_DATABASE_URL";

/// Columns of the pg_tracing spans view, with the upstream types
const SPANS_TABLE_COLUMNS: &str = "
    trace_id bigint, parent_id bigint, span_id bigint,
    span_type text, span_operation text, deparse_info text, parameters text,
    span_start timestamp with time zone, span_start_ns smallint, duration bigint,
    startup bigint, pid int, subxact_count smallint,
    sql_error_code character(5),
    rows bigint,
    plan_startup_cost float8, plan_total_cost float8, plan_rows float8, plan_width int,
    shared_blks_hit bigint, shared_blks_read bigint, shared_blks_dirtied bigint, shared_blks_written bigint,
    local_blks_hit bigint, local_blks_read bigint, local_blks_dirtied bigint, local_blks_written bigint,
    blk_read_time float8, blk_write_time float8,
    temp_blks_read bigint, temp_blks_written bigint, temp_blk_read_time float8, temp_blk_write_time float8,
    wal_records bigint, wal_fpi bigint, wal_bytes numeric,
    jit_functions int, jit_generation_time float8, jit_inlining_time float8,
    jit_optimization_time float8, jit_emission_time float8";

struct SpansTable {
    client: tokio_postgres::Client,
    name: String,
}

impl SpansTable {
    /// `label` keeps the tables of concurrent tests apart
    async fn create(database_url: &str, label: &str) -> Self {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .expect("failed to connect to the test database");
        tokio::spawn(connection);

        let name = format!("pgtracing_test_{label}_{}", std::process::id());
        client
            .batch_execute(&format!(
                "DROP TABLE IF EXISTS {name}; CREATE TABLE {name} ({SPANS_TABLE_COLUMNS});"
            ))
            .await
            .expect("failed to create the spans table");
        Self { client, name }
    }

    async fn insert(&self, values: &str) {
        self.client
            .batch_execute(&format!(
                "INSERT INTO {} (trace_id, parent_id, span_id, span_type, span_operation, \
                 deparse_info, span_start, span_start_ns, duration, pid, subxact_count, \
                 sql_error_code, rows, plan_total_cost, plan_width, shared_blks_hit, wal_bytes) \
                 VALUES {values};",
                self.name
            ))
            .await
            .expect("failed to insert spans");
    }

    async fn remove(self) {
        self.client
            .batch_execute(&format!("DROP TABLE {};", self.name))
            .await
            .expect("failed to drop the spans table");
    }
}

#[tokio::test]
async fn test_spans_are_read_and_replayed_in_start_order() {
    let Ok(database_url) = std::env::var(TEST_DATABASE_URL) else {
        return;
    };
    let table = SpansTable::create(&database_url, "ordered").await;
    // Inserted out of order, -1 is the bigint image of u64::MAX
    table
        .insert(
            "(-1, 10, 11, 'Select query', 'Executor', NULL, \
              '2024-01-01 00:00:00.000010+00', 500, 40, 4242, 0, \
              '00000', 3, 8.25, 4, 12, 2048), \
             (-1, 0, 10, 'Select query', 'Planner', 'SELECT * FROM t WHERE a = $1', \
              '2024-01-01 00:00:00+00', 0, 100000, 4242, 0, \
              '22012', NULL, NULL, NULL, 0, NULL)",
        )
        .await;

    let mut builder = Config::builder();
    builder
        .set_database_url(database_url.clone())
        .set_spans_relation(table.name.parse().unwrap())
        .set_connect_timeout(Duration::from_secs(5));
    let config = builder.build();

    let reader = SpanReader::connect(&config).await.unwrap();
    let records: Vec<SpanRecord> = reader
        .consume_spans()
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    let (root, child) = (&records[0], &records[1]);

    assert_eq!(root.trace_id, u64::MAX);
    assert_eq!(root.parent_id, 0);
    assert_eq!(root.span_id, 10);
    assert_eq!(root.span_name(), "Planner SELECT * FROM t WHERE a = $1");
    assert_eq!(root.span_start, test_epoch());
    assert_eq!(root.duration_nanos, 100_000);
    assert_eq!(root.sql_error(), Some("22012"));
    assert_eq!(root.rows, None);
    assert_eq!(root.shared_blocks.hit, Some(0));

    assert_eq!(child.parent_id, 10);
    assert_eq!(child.span_start, test_epoch() + Duration::from_micros(10));
    assert_eq!(child.span_start_ns, 500);
    assert_eq!(child.pid, Some(4242));
    assert_eq!(child.sql_error(), None);
    assert_eq!(child.rows, Some(3));
    assert_eq!(child.plan.total_cost, Some(8.25));
    assert_eq!(child.plan.width, Some(4));
    assert_eq!(child.wal.bytes, Some(2048));

    let mut test = TestReplayer::new(&config);
    let count = forward_spans(
        futures_util::stream::iter(records.clone().into_iter().map(Ok)),
        &mut test.replayer,
    )
    .await
    .unwrap();
    assert_eq!(count, 2);

    let spans = test.finished_spans();
    assert_eq!(spans[1].parent_span_id, spans[0].span_context.span_id());
    assert_eq!(narrow_span_id(spans[1].span_context.span_id()), 11);
    assert_eq!(
        spans[1].start_time,
        test_epoch() + Duration::from_nanos(10_500)
    );

    table.remove().await;
}

#[tokio::test]
async fn test_negative_duration_stops_the_replay() {
    let Ok(database_url) = std::env::var(TEST_DATABASE_URL) else {
        return;
    };
    let table = SpansTable::create(&database_url, "negative").await;
    table
        .insert(
            "(5, 0, 20, 'Select query', 'Planner', NULL, \
              '2024-01-01 00:00:00+00', 0, 100, 4242, 0, \
              '00000', NULL, NULL, NULL, NULL, NULL), \
             (5, 20, 21, 'Select query', 'Executor', NULL, \
              '2024-01-01 00:00:00.000001+00', 0, -5, 4242, 0, \
              '00000', NULL, NULL, NULL, NULL, NULL), \
             (5, 20, 22, 'Select query', 'Executor', NULL, \
              '2024-01-01 00:00:00.000002+00', 0, 10, 4242, 0, \
              '00000', NULL, NULL, NULL, NULL, NULL)",
        )
        .await;

    let mut builder = Config::builder();
    builder
        .set_database_url(database_url)
        .set_spans_relation(table.name.parse().unwrap())
        .set_connect_timeout(Duration::from_secs(5));
    let config = builder.build();

    let reader = SpanReader::connect(&config).await.unwrap();
    let records = reader.consume_spans().await.unwrap();
    let mut test = TestReplayer::new(&config);
    let err = forward_spans(records, &mut test.replayer)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "span 21 has a negative duration -5");
    assert_eq!(test.replayer.replayed(), 1);
    let spans = test.finished_spans();
    assert_eq!(spans.len(), 1);
    assert_eq!(narrow_span_id(spans[0].span_context.span_id()), 20);

    table.remove().await;
}

#[tokio::test]
async fn test_missing_relation_fails_the_query() {
    let Ok(database_url) = std::env::var(TEST_DATABASE_URL) else {
        return;
    };
    let mut builder = Config::builder();
    builder
        .set_database_url(database_url)
        .set_spans_relation("pgtracing_test_no_such_relation".parse().unwrap());
    let config = builder.build();

    let reader = SpanReader::connect(&config).await.unwrap();
    let err = reader.consume_spans().await.err().unwrap();
    assert!(err.to_string().starts_with("failed to query spans: "), "{err}");
}
