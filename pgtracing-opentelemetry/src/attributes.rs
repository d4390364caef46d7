// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use opentelemetry::KeyValue;

use crate::core::constants::*;
use crate::span_record::{BlockStats, BlockTime, SpanRecord};

/// Ordered attributes of a replayed span.
///
/// Metrics that are absent or zero are left out, most spans only carry a handful of them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AttributeSet {
    attributes: Vec<KeyValue>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_i64(&mut self, key: &'static str, value: Option<i64>) {
        match value {
            Some(v) if v != 0 => self.attributes.push(KeyValue::new(key, v)),
            _ => {}
        }
    }

    pub fn push_f64(&mut self, key: &'static str, value: Option<f64>) {
        match value {
            Some(v) if v != 0.0 => self.attributes.push(KeyValue::new(key, v)),
            _ => {}
        }
    }

    pub fn push_str(&mut self, key: &'static str, value: Option<&str>) {
        match value {
            Some(v) if !v.is_empty() => self.attributes.push(KeyValue::new(key, v.to_string())),
            _ => {}
        }
    }

    pub fn get(&self, key: &str) -> Option<&KeyValue> {
        self.attributes.iter().find(|kv| kv.key.as_str() == key)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn push_block_stats(&mut self, keys: [&'static str; 4], stats: &BlockStats) {
        let [hit, read, dirtied, written] = keys;
        self.push_i64(hit, stats.hit);
        self.push_i64(read, stats.read);
        self.push_i64(dirtied, stats.dirtied);
        self.push_i64(written, stats.written);
    }

    fn push_block_time(&mut self, keys: [&'static str; 2], time: &BlockTime) {
        let [read_time, write_time] = keys;
        self.push_f64(read_time, time.read_time);
        self.push_f64(write_time, time.write_time);
    }
}

impl IntoIterator for AttributeSet {
    type Item = KeyValue;
    type IntoIter = std::vec::IntoIter<KeyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}

impl From<&SpanRecord> for AttributeSet {
    fn from(record: &SpanRecord) -> Self {
        let mut attributes = AttributeSet::new();

        attributes.push_str(SPAN_TYPE_KEY, Some(record.span_type.as_str()));
        attributes.push_str(QUERY_PARAMETERS_KEY, record.parameters.as_deref());

        attributes.push_i64(ROWS_KEY, record.rows);
        attributes.push_i64(PID_KEY, record.pid.map(i64::from));
        attributes.push_i64(SUBXACT_COUNT_KEY, record.subxact_count.map(i64::from));

        attributes.push_block_stats(
            [
                BLOCK_SHARED_HIT_KEY,
                BLOCK_SHARED_READ_KEY,
                BLOCK_SHARED_DIRTIED_KEY,
                BLOCK_SHARED_WRITTEN_KEY,
            ],
            &record.shared_blocks,
        );
        attributes.push_block_stats(
            [
                BLOCK_LOCAL_HIT_KEY,
                BLOCK_LOCAL_READ_KEY,
                BLOCK_LOCAL_DIRTIED_KEY,
                BLOCK_LOCAL_WRITTEN_KEY,
            ],
            &record.local_blocks,
        );
        attributes.push_block_time(
            [BLOCK_READ_TIME_KEY, BLOCK_WRITE_TIME_KEY],
            &record.block_time,
        );

        attributes.push_i64(BLOCK_TEMP_READ_KEY, record.temp_blocks.read);
        attributes.push_i64(BLOCK_TEMP_WRITTEN_KEY, record.temp_blocks.written);
        attributes.push_block_time(
            [BLOCK_TEMP_READ_TIME_KEY, BLOCK_TEMP_WRITE_TIME_KEY],
            &record.temp_block_time,
        );

        attributes.push_i64(WAL_RECORDS_KEY, record.wal.records);
        attributes.push_i64(WAL_FPI_KEY, record.wal.fpi);
        attributes.push_i64(WAL_BYTES_KEY, record.wal.bytes);

        attributes.push_f64(PLAN_STARTUP_COST_KEY, record.plan.startup_cost);
        attributes.push_f64(PLAN_TOTAL_COST_KEY, record.plan.total_cost);
        attributes.push_f64(PLAN_ROWS_KEY, record.plan.rows);
        attributes.push_i64(PLAN_WIDTH_KEY, record.plan.width);

        attributes.push_i64(JIT_FUNCTIONS_KEY, record.jit.functions);
        attributes.push_f64(JIT_GENERATION_TIME_KEY, record.jit.generation_time);
        attributes.push_f64(JIT_INLINING_TIME_KEY, record.jit.inlining_time);
        attributes.push_f64(JIT_OPTIMIZATION_TIME_KEY, record.jit.optimization_time);
        attributes.push_f64(JIT_EMISSION_TIME_KEY, record.jit.emission_time);

        // Failed statements are still replayed, the backend flags them through these
        if let Some(code) = record.sql_error() {
            attributes.push_str(ERROR_MSG_KEY, Some(QUERY_ERROR_MSG));
            attributes.push_str(ERROR_CODE_KEY, Some(code));
        }

        attributes
    }
}
